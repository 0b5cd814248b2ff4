// ABOUTME: Helper modules for tattvam-cli
// ABOUTME: Service wiring and output formatting shared by every command
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

pub mod context;
pub mod display;
