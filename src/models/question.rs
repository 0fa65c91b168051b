// src/models/question.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::config::MIN_OPTION_COUNT;

/// Question category. Closed set; authored questions default to Uncategorized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "OOP")]
    Oop,
    WebDev,
    LanguageBasics,
    DataStructures,
    HumanResources,
    #[default]
    Uncategorized,
}

/// A quiz question document. Immutable after creation; never mutated by
/// scoring.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,

    /// The prompt shown to the user.
    pub text: String,

    /// Ordered answer options; `correct_option_index` points into this list.
    pub options: Vec<String>,

    pub correct_option_index: usize,

    /// Reward for the first correct answer, 1..=10.
    pub points: i64,

    #[serde(default)]
    pub category: Category,

    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

/// DTO for authoring a new question.
///
/// The cross-field check that `correct_option_index` lands inside `options`
/// happens in the handler, where both fields are in hand.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuestionRequest {
    #[validate(length(min = 1, max = 1000))]
    pub text: String,
    #[validate(custom(function = validate_options))]
    pub options: Vec<String>,
    pub correct_option_index: usize,
    #[validate(range(min = 1, max = 10))]
    pub points: i64,
    #[serde(default)]
    pub category: Category,
}

fn validate_options(options: &[String]) -> Result<(), validator::ValidationError> {
    if options.len() < MIN_OPTION_COUNT {
        return Err(validator::ValidationError::new("too_few_options"));
    }
    for opt in options {
        if opt.is_empty() || opt.len() > 500 {
            return Err(validator::ValidationError::new("bad_option_length"));
        }
    }
    Ok(())
}
