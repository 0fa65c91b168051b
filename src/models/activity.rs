use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One entry in a user's activity history. Immutable once appended; the
/// scoring engine produces exactly one per answer submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEvent {
    pub date: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    pub question_id: String,
    pub result: AnswerResult,
}

/// Mode the answer was submitted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    #[default]
    Practice,
    Daily,
    Interview,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerResult {
    Correct,
    Incorrect,
}
