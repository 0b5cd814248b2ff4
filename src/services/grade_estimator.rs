// ABOUTME: Last-resort grade estimation for records whose source reported no grade
// ABOUTME: Asks the AI dietitian prompt for a JSON verdict, falling back to E on failure or the calculator when no AI is configured
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Grade Estimation
//!
//! The AI reply is expected to be a JSON object
//! `{"nutriScore": "C", "cleanIngredients": [...], "badIngredients": [...]}`,
//! possibly wrapped in a markdown code fence. A reply that cannot be read, or
//! whose grade is not a letter A to E, counts as a failure and the record is
//! graded [`AI_FAILURE_GRADE`].

use std::sync::{Arc, LazyLock};

use regex::Regex;
use serde::Deserialize;
use tattvam_analysis::HealthAnalyzer;
use tracing::{debug, warn};

use crate::errors::{AppError, AppResult};
use crate::llm::prompts::grade_estimation_prompt;
use crate::llm::{ChatMessage, ChatRequest, LlmProvider};
use crate::logging::AppLogger;
use crate::models::{GradeOrigin, NutriScore, ProductRecord};

/// Grade applied when the AI collaborator fails
pub const AI_FAILURE_GRADE: NutriScore = NutriScore::E;

const AI_SERVICE: &str = "AI grade estimation";

/// Leading and trailing markdown code fences, with an optional language tag
static CODE_FENCE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*```[a-zA-Z]*\s*$").ok());

/// Outermost JSON object in a reply
static JSON_OBJECT: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"(?s)\{.*\}").ok());

/// Parsed AI verdict
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiGradeReply {
    /// Letter grade as written by the model
    #[serde(default)]
    pub nutri_score: String,
    /// Ingredient list rewritten in plain names
    #[serde(default)]
    pub clean_ingredients: Vec<String>,
    /// Ingredients the model considers harmful
    #[serde(default)]
    pub bad_ingredients: Vec<String>,
}

impl AiGradeReply {
    /// Extract the verdict from a raw completion
    ///
    /// # Errors
    ///
    /// Returns an external service error when no JSON object can be found or
    /// decoded, or when the grade is not A to E
    pub fn parse(raw: &str) -> AppResult<(Self, NutriScore)> {
        let unfenced = CODE_FENCE
            .as_ref()
            .map_or_else(|| raw.to_owned(), |re| re.replace_all(raw, "").into_owned());
        let object = JSON_OBJECT
            .as_ref()
            .and_then(|re| re.find(&unfenced))
            .map(|m| m.as_str())
            .ok_or_else(|| AppError::external_service(AI_SERVICE, "reply contains no JSON object"))?;

        let reply: Self = serde_json::from_str(object).map_err(|e| {
            AppError::external_service(AI_SERVICE, format!("reply is not valid JSON: {e}"))
        })?;
        let grade = NutriScore::parse(&reply.nutri_score).ok_or_else(|| {
            AppError::external_service(
                AI_SERVICE,
                format!("reply grade '{}' is not A to E", reply.nutri_score),
            )
        })?;
        Ok((reply, grade))
    }

    fn clean_ingredients(&self) -> Vec<String> {
        self.clean_ingredients
            .iter()
            .map(|entry| entry.trim())
            .filter(|entry| !entry.is_empty())
            .map(str::to_owned)
            .collect()
    }
}

/// Grades records that arrived without one
#[derive(Clone)]
pub struct GradeEstimator {
    llm: Option<Arc<dyn LlmProvider>>,
    analyzer: HealthAnalyzer,
}

impl GradeEstimator {
    /// Create an estimator; `llm` is `None` when no AI key is configured
    #[must_use]
    pub fn new(llm: Option<Arc<dyn LlmProvider>>, analyzer: HealthAnalyzer) -> Self {
        Self { llm, analyzer }
    }

    /// Whether an AI collaborator is configured
    #[must_use]
    pub fn has_ai(&self) -> bool {
        self.llm.is_some()
    }

    /// Fill in `record.nutri_score` and report where it came from
    ///
    /// A record that already carries a grade is left untouched and reported as
    /// [`GradeOrigin::Source`]. On AI success a non-empty clean ingredient
    /// list replaces the raw one.
    pub async fn apply(&self, record: &mut ProductRecord) -> GradeOrigin {
        if record.nutri_score.is_some() {
            return GradeOrigin::Source;
        }

        let Some(llm) = &self.llm else {
            let grade = self.analyzer.calculator_grade(record).nutri_score;
            record.nutri_score = Some(grade);
            AppLogger::log_grade_estimation(
                &record.barcode,
                GradeOrigin::Calculator.as_str(),
                grade.as_str(),
                Some("no AI configured"),
            );
            return GradeOrigin::Calculator;
        };

        match Self::ask(llm.as_ref(), record).await {
            Ok((reply, grade)) => {
                let clean = reply.clean_ingredients();
                if !clean.is_empty() {
                    record.ingredients = clean;
                }
                record.nutri_score = Some(grade);
                debug!(bad = ?reply.bad_ingredients, "AI flagged ingredients");
                AppLogger::log_grade_estimation(
                    &record.barcode,
                    GradeOrigin::AiEstimate.as_str(),
                    grade.as_str(),
                    None,
                );
                GradeOrigin::AiEstimate
            }
            Err(e) => {
                warn!(product.barcode = %record.barcode, error = %e, "AI grade estimation failed");
                record.nutri_score = Some(AI_FAILURE_GRADE);
                AppLogger::log_grade_estimation(
                    &record.barcode,
                    GradeOrigin::AiFailureDefault.as_str(),
                    AI_FAILURE_GRADE.as_str(),
                    Some(&e.message),
                );
                GradeOrigin::AiFailureDefault
            }
        }
    }

    async fn ask(
        llm: &dyn LlmProvider,
        record: &ProductRecord,
    ) -> AppResult<(AiGradeReply, NutriScore)> {
        let mut request = ChatRequest::new(vec![
            ChatMessage::system("You are an expert dietitian. Reply with JSON only."),
            ChatMessage::user(grade_estimation_prompt(record)),
        ])
        .with_temperature(0.0);
        if llm.capabilities().supports_json_mode() {
            request = request.with_json_mode();
        }

        let response = llm.complete(&request).await?;
        AiGradeReply::parse(&response.content)
    }
}
