// ABOUTME: Circuit breaker for external product source calls
// ABOUTME: Skips a failing source without a network call until its recovery timeout elapses
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, AtomicU8, Ordering};
use std::time::{Duration, Instant};

use tracing::{info, warn};

use crate::errors::{AppError, AppResult};

/// Circuit breaker states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    /// Normal operation - requests pass through
    Closed,
    /// Circuit is open - requests fail immediately
    Open,
    /// Testing recovery - one trial at a time
    HalfOpen,
}

impl CircuitState {
    const fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Closed,
            1 => Self::Open,
            _ => Self::HalfOpen,
        }
    }

    const fn to_u8(self) -> u8 {
        match self {
            Self::Closed => 0,
            Self::Open => 1,
            Self::HalfOpen => 2,
        }
    }
}

/// Configuration for circuit breaker behavior
#[derive(Debug, Clone)]
pub struct CircuitBreakerConfig {
    /// Consecutive failures before the circuit opens
    pub failure_threshold: u32,
    /// Time the circuit stays open before a recovery trial
    pub recovery_timeout: Duration,
    /// Consecutive half-open successes needed to close again
    pub success_threshold: u32,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            recovery_timeout: Duration::from_secs(30),
            success_threshold: 1,
        }
    }
}

impl CircuitBreakerConfig {
    /// Create a new circuit breaker configuration
    #[must_use]
    pub const fn new(
        failure_threshold: u32,
        recovery_timeout: Duration,
        success_threshold: u32,
    ) -> Self {
        Self {
            failure_threshold,
            recovery_timeout,
            success_threshold,
        }
    }
}

/// Lock-free circuit breaker guarding one product source
///
/// Only external failures (transport errors, bad statuses, malformed bodies,
/// timeouts) count towards opening the circuit. A clean "not found" is a
/// success.
pub struct CircuitBreaker {
    source_name: String,
    state: AtomicU8,
    failure_count: AtomicU32,
    success_count: AtomicU32,
    /// Set while a half-open trial is running
    trial_in_flight: AtomicBool,
    /// Millis since `start_instant` when the circuit last opened
    opened_at_ms: AtomicU64,
    config: CircuitBreakerConfig,
    start_instant: Instant,
}

impl CircuitBreaker {
    /// Create a new circuit breaker with default configuration
    #[must_use]
    pub fn new(source_name: &str) -> Self {
        Self::with_config(source_name, CircuitBreakerConfig::default())
    }

    /// Create a new circuit breaker with custom configuration
    #[must_use]
    pub fn with_config(source_name: &str, config: CircuitBreakerConfig) -> Self {
        Self {
            source_name: source_name.to_owned(),
            state: AtomicU8::new(CircuitState::Closed.to_u8()),
            failure_count: AtomicU32::new(0),
            success_count: AtomicU32::new(0),
            trial_in_flight: AtomicBool::new(false),
            opened_at_ms: AtomicU64::new(0),
            config,
            start_instant: Instant::now(),
        }
    }

    /// Get current circuit state
    #[must_use]
    pub fn state(&self) -> CircuitState {
        CircuitState::from_u8(self.state.load(Ordering::SeqCst))
    }

    /// Get current consecutive failure count
    #[must_use]
    pub fn failure_count(&self) -> u32 {
        self.failure_count.load(Ordering::SeqCst)
    }

    /// Check if the circuit lets a request through
    ///
    /// An open circuit past its recovery timeout moves to half-open. A
    /// half-open circuit lets one trial through at a time.
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        self.admit().is_some()
    }

    /// `Some(true)` when the admitted request is a half-open trial
    fn admit(&self) -> Option<bool> {
        match self.state() {
            CircuitState::Closed => Some(false),
            CircuitState::Open => self.try_half_open().then_some(true),
            CircuitState::HalfOpen => self.claim_trial().then_some(true),
        }
    }

    fn claim_trial(&self) -> bool {
        self.trial_in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    fn try_half_open(&self) -> bool {
        if self.millis_since_open() < self.recovery_millis() || !self.claim_trial() {
            return false;
        }
        let moved = self
            .state
            .compare_exchange(
                CircuitState::Open.to_u8(),
                CircuitState::HalfOpen.to_u8(),
                Ordering::SeqCst,
                Ordering::SeqCst,
            )
            .is_ok();
        if moved {
            info!(source = %self.source_name, "Circuit half-open, probing source");
        } else {
            self.trial_in_flight.store(false, Ordering::SeqCst);
        }
        moved
    }

    fn elapsed_millis(&self) -> u64 {
        self.start_instant.elapsed().as_millis() as u64
    }

    fn recovery_millis(&self) -> u64 {
        self.config.recovery_timeout.as_millis() as u64
    }

    fn millis_since_open(&self) -> u64 {
        self.elapsed_millis()
            .saturating_sub(self.opened_at_ms.load(Ordering::SeqCst))
    }

    fn open(&self) {
        self.state
            .store(CircuitState::Open.to_u8(), Ordering::SeqCst);
        self.opened_at_ms
            .store(self.elapsed_millis(), Ordering::SeqCst);
        self.success_count.store(0, Ordering::SeqCst);
        self.trial_in_flight.store(false, Ordering::SeqCst);
    }

    /// Record a successful call
    pub fn record_success(&self) {
        match self.state() {
            CircuitState::Closed => self.failure_count.store(0, Ordering::SeqCst),
            CircuitState::HalfOpen => {
                self.trial_in_flight.store(false, Ordering::SeqCst);
                let count = self.success_count.fetch_add(1, Ordering::SeqCst) + 1;
                if count >= self.config.success_threshold {
                    self.reset_counts();
                    self.state
                        .store(CircuitState::Closed.to_u8(), Ordering::SeqCst);
                    info!(source = %self.source_name, "Circuit closed, source recovered");
                }
            }
            CircuitState::Open => {}
        }
    }

    /// Record a failed call
    pub fn record_failure(&self) {
        match self.state() {
            CircuitState::Closed => {
                let count = self.failure_count.fetch_add(1, Ordering::SeqCst) + 1;
                if count >= self.config.failure_threshold {
                    self.open();
                    warn!(
                        source = %self.source_name,
                        failures = count,
                        recovery_timeout_secs = self.config.recovery_timeout.as_secs(),
                        "Circuit opened, source failing"
                    );
                }
            }
            CircuitState::HalfOpen => {
                self.open();
                warn!(source = %self.source_name, "Circuit re-opened, recovery trial failed");
            }
            CircuitState::Open => self
                .opened_at_ms
                .store(self.elapsed_millis(), Ordering::SeqCst),
        }
    }

    /// Run `operation` under circuit protection
    ///
    /// # Errors
    ///
    /// Returns an "unavailable" error without polling `operation` when the
    /// circuit is open; otherwise returns the operation's own result.
    pub async fn call<F, T>(&self, operation: F) -> AppResult<T>
    where
        F: Future<Output = AppResult<T>>,
    {
        let Some(is_trial) = self.admit() else {
            return Err(AppError::external_unavailable(
                &self.source_name,
                format!(
                    "circuit open, retry in {}s",
                    self.seconds_until_recovery()
                ),
            ));
        };

        let mut guard = TrialGuard {
            breaker: self,
            armed: is_trial,
        };
        let result = operation.await;
        guard.armed = false;
        match &result {
            Ok(_) => self.record_success(),
            Err(error) if error.code.is_external() => self.record_failure(),
            // Non-external errors say nothing about source health
            Err(_) if is_trial => self.release_trial(),
            Err(_) => {}
        }
        result
    }

    /// A half-open trial that ended without a verdict goes back to open
    ///
    /// The recovery window has already elapsed, so the next call tries again.
    fn release_trial(&self) {
        self.trial_in_flight.store(false, Ordering::SeqCst);
        let _ = self.state.compare_exchange(
            CircuitState::HalfOpen.to_u8(),
            CircuitState::Open.to_u8(),
            Ordering::SeqCst,
            Ordering::SeqCst,
        );
    }

    fn seconds_until_recovery(&self) -> u64 {
        self.recovery_millis()
            .saturating_sub(self.millis_since_open())
            .saturating_add(999)
            / 1000
    }

    fn reset_counts(&self) {
        self.failure_count.store(0, Ordering::SeqCst);
        self.success_count.store(0, Ordering::SeqCst);
        self.trial_in_flight.store(false, Ordering::SeqCst);
    }

    /// Force the circuit closed
    pub fn reset(&self) {
        self.reset_counts();
        self.state
            .store(CircuitState::Closed.to_u8(), Ordering::SeqCst);
        info!(source = %self.source_name, "Circuit manually reset");
    }
}

/// Releases a half-open trial whose future was dropped before it finished
struct TrialGuard<'a> {
    breaker: &'a CircuitBreaker,
    armed: bool,
}

impl Drop for TrialGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            warn!(source = %self.breaker.source_name, "Recovery trial abandoned");
            self.breaker.release_trial();
        }
    }
}
