// ABOUTME: Nutri-Score letter grades, star ratings, and graded results with warnings
// ABOUTME: NutriScore, Grade, GradeResult, and GradeOrigin definitions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::constants::labels::UNKNOWN_GRADE;

/// Nutri-Score style letter grade, A (best) to E (worst)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NutriScore {
    /// Best grade
    #[serde(alias = "a")]
    A,
    /// Good
    #[serde(alias = "b")]
    B,
    /// Average
    #[serde(alias = "c")]
    C,
    /// Poor
    #[serde(alias = "d")]
    D,
    /// Worst grade
    #[serde(alias = "e")]
    E,
}

impl NutriScore {
    /// All grades from best to worst
    pub const ALL: [Self; 5] = [Self::A, Self::B, Self::C, Self::D, Self::E];

    /// Star rating for this grade: A=5.0 down to E=1.0
    #[must_use]
    pub const fn rating(self) -> f64 {
        match self {
            Self::A => 5.0,
            Self::B => 4.0,
            Self::C => 3.0,
            Self::D => 2.0,
            Self::E => 1.0,
        }
    }

    /// Uppercase letter
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::E => "E",
        }
    }

    /// Parse a letter, case-insensitive and ignoring surrounding whitespace
    ///
    /// Anything other than a single letter A-E (including `"?"`, `"unknown"`,
    /// and `"not-applicable"`) yields `None`.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "A" => Some(Self::A),
            "B" => Some(Self::B),
            "C" => Some(Self::C),
            "D" => Some(Self::D),
            "E" => Some(Self::E),
            _ => None,
        }
    }

    /// Whether this grade counts as a healthy alternative (A or B)
    #[must_use]
    pub const fn is_healthy(self) -> bool {
        matches!(self, Self::A | Self::B)
    }
}

impl fmt::Display for NutriScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Letter grade with its star rating
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Grade {
    /// Letter grade
    pub nutri_score: NutriScore,
    /// Star rating derived from the letter
    pub rating: f64,
}

impl From<NutriScore> for Grade {
    fn from(nutri_score: NutriScore) -> Self {
        Self {
            nutri_score,
            rating: nutri_score.rating(),
        }
    }
}

/// Grade plus every warning that applies to the product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeResult {
    /// Letter grade
    pub nutri_score: NutriScore,
    /// Star rating in `[1.0, 5.0]`
    pub rating: f64,
    /// Unique warnings in first-seen order
    pub warnings: Vec<String>,
}

/// Where the grade shown to the caller came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradeOrigin {
    /// Reported by the external source that supplied the record
    Source,
    /// Estimated by the AI collaborator
    AiEstimate,
    /// AI estimation failed and the worst-case default was applied
    AiFailureDefault,
    /// Computed by the nutrition grade calculator
    Calculator,
    /// Read back from the product store
    Stored,
}

impl GradeOrigin {
    /// Convert to string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Source => "source",
            Self::AiEstimate => "ai_estimate",
            Self::AiFailureDefault => "ai_failure_default",
            Self::Calculator => "calculator",
            Self::Stored => "stored",
        }
    }
}

/// Serialize an optional grade, writing `"?"` for an unknown grade
#[allow(clippy::ref_option, clippy::trivially_copy_pass_by_ref)] // serde `serialize_with` signature
pub(super) fn serialize_optional_grade<S>(
    grade: &Option<NutriScore>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(grade.map_or(UNKNOWN_GRADE, NutriScore::as_str))
}

/// Deserialize an optional grade; `null`, `"?"`, and unrecognized strings are unknown
pub(super) fn deserialize_optional_grade<'de, D>(
    deserializer: D,
) -> Result<Option<NutriScore>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(NutriScore::parse))
}
