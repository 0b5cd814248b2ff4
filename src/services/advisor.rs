// ABOUTME: Product advisor answering free-text questions about a stored product
// ABOUTME: Renders the advisor prompt from the stored record and its displayed grade and returns plain text
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tattvam_analysis::HealthAnalyzer;
use tracing::instrument;

use crate::database::ProductStore;
use crate::errors::{AppError, AppResult};
use crate::llm::prompts::product_advisor_prompt;
use crate::llm::{ChatMessage, ChatRequest, LlmProvider};
use crate::models::GradeOrigin;

/// Upper bound on the advisor's reply length
const MAX_ANSWER_TOKENS: u32 = 300;

/// Answer to a product question
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvisorAnswer {
    /// Product barcode
    pub barcode: String,
    /// Plain-text answer
    pub answer: String,
}

/// Answers questions about stored products
pub struct ProductAdvisor {
    store: Arc<dyn ProductStore>,
    llm: Arc<dyn LlmProvider>,
    analyzer: HealthAnalyzer,
}

impl ProductAdvisor {
    /// Create an advisor
    #[must_use]
    pub fn new(
        store: Arc<dyn ProductStore>,
        llm: Arc<dyn LlmProvider>,
        analyzer: HealthAnalyzer,
    ) -> Self {
        Self {
            store,
            llm,
            analyzer,
        }
    }

    /// Ask a question about the product with `barcode`
    ///
    /// # Errors
    ///
    /// Returns `MissingRequiredField` for an empty question, `ResourceNotFound`
    /// when the product is not stored, and the AI error when completion fails
    #[instrument(skip(self, question), fields(barcode = %barcode))]
    pub async fn ask(&self, barcode: &str, question: &str) -> AppResult<AdvisorAnswer> {
        if question.trim().is_empty() {
            return Err(AppError::missing_field("question"));
        }

        let record = self
            .store
            .find_by_barcode(barcode.trim())
            .await?
            .ok_or_else(|| AppError::not_found(format!("Product {}", barcode.trim())))?;
        let view = self.analyzer.view(&record, GradeOrigin::Stored);

        let request = ChatRequest::new(vec![ChatMessage::user(product_advisor_prompt(
            &record,
            view.nutri_score.as_str(),
            question,
        ))])
        .with_temperature(0.3)
        .with_max_tokens(MAX_ANSWER_TOKENS);
        let response = self.llm.complete(&request).await?;

        Ok(AdvisorAnswer {
            barcode: record.barcode,
            answer: strip_markdown_emphasis(&response.content),
        })
    }
}

/// Drop `**` and `*` emphasis markers the model sometimes emits anyway
fn strip_markdown_emphasis(text: &str) -> String {
    text.replace("**", "").replace('*', "").trim().to_owned()
}
