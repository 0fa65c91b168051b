// src/models/user.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::AppError;
use crate::models::activity::{ActivityEvent, ActivityKind};

/// A user's progress document. One per authenticated identity, keyed by the
/// opaque id the identity provider hands us. Stats fields move only through
/// the scoring engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: String,
    pub email: String,
    pub name: String,
    pub photo_url: Option<String>,
    pub bio: Option<String>,
    pub country: Option<String>,

    /// Total of scored answers. Monotonically non-decreasing.
    pub points: i64,

    /// Counts every scoring attempt, correct or not, repeats included.
    pub total_questions_answered: i64,

    pub correct_answers: i64,

    /// Consecutive-day counter, see `scoring::streak`.
    pub streak: i64,

    /// Derived, cached by the leaderboard; never an input to scoring.
    pub rank: i64,

    /// Ids of questions ever answered correctly. Membership means the
    /// question was scored exactly once.
    pub completed_questions: Vec<String>,

    /// Starred question ids, independent of completion.
    pub favorite_questions: Vec<String>,

    pub notification_settings: NotificationSettings,

    /// Append-only, ordered by event time.
    pub activity_history: Vec<ActivityEvent>,

    pub created_at: DateTime<Utc>,
    pub last_login_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSettings {
    pub email: bool,
    pub push: bool,
    pub daily_reminder: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self { email: true, push: true, daily_reminder: true }
    }
}

/// Raw document schema for decoding stored profiles. Every field is typed
/// but optional, so a document written by an older revision still decodes;
/// `UserRecord::from_doc` fills the documented defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawUserDoc {
    email: Option<String>,
    name: Option<String>,
    photo_url: Option<String>,
    bio: Option<String>,
    country: Option<String>,
    points: Option<i64>,
    total_questions_answered: Option<i64>,
    correct_answers: Option<i64>,
    streak: Option<i64>,
    rank: Option<i64>,
    completed_questions: Option<Vec<String>>,
    favorite_questions: Option<Vec<String>>,
    notification_settings: Option<NotificationSettings>,
    activity_history: Option<Vec<serde_json::Value>>,
    created_at: Option<DateTime<Utc>>,
    last_login_at: Option<DateTime<Utc>>,
}

/// What had to be repaired while decoding a stored document. Callers log
/// the anomaly; the read itself still succeeds.
#[derive(Debug, Default)]
pub struct DecodeGaps {
    pub missing_fields: Vec<&'static str>,
    pub dropped_events: usize,
}

impl DecodeGaps {
    pub fn is_clean(&self) -> bool {
        self.missing_fields.is_empty() && self.dropped_events == 0
    }
}

impl UserRecord {
    /// A freshly provisioned record with zeroed stats.
    pub fn new(id: String, email: String, name: String, now: DateTime<Utc>) -> Self {
        Self {
            id,
            email,
            name,
            photo_url: None,
            bio: None,
            country: None,
            points: 0,
            total_questions_answered: 0,
            correct_answers: 0,
            streak: 0,
            rank: 0,
            completed_questions: Vec::new(),
            favorite_questions: Vec::new(),
            notification_settings: NotificationSettings::default(),
            activity_history: Vec::new(),
            created_at: now,
            last_login_at: now,
        }
    }

    /// Decodes a stored document. Missing fields fill their documented
    /// defaults (counters 0, sets empty); individual history entries that
    /// fail to decode are dropped. Both degradations are reported back so
    /// the store can log them. An entirely undecodable document is an
    /// error, never a silently zeroed record.
    pub fn from_doc(id: &str, doc: serde_json::Value) -> Result<(Self, DecodeGaps), AppError> {
        let raw: RawUserDoc = serde_json::from_value(doc)
            .map_err(|e| AppError::MalformedRecord(format!("profile '{id}': {e}")))?;

        let mut gaps = DecodeGaps::default();
        let now = Utc::now();

        let activity_history = match raw.activity_history {
            Some(events) => {
                let mut history = Vec::with_capacity(events.len());
                for event in events {
                    match serde_json::from_value::<ActivityEvent>(event) {
                        Ok(event) => history.push(event),
                        Err(_) => gaps.dropped_events += 1,
                    }
                }
                history
            }
            None => {
                gaps.missing_fields.push("activityHistory");
                Vec::new()
            }
        };

        let record = Self {
            id: id.to_owned(),
            email: fill(raw.email, String::new(), "email", &mut gaps),
            name: fill(raw.name, String::new(), "name", &mut gaps),
            photo_url: raw.photo_url,
            bio: raw.bio,
            country: raw.country,
            points: fill(raw.points, 0, "points", &mut gaps),
            total_questions_answered: fill(
                raw.total_questions_answered,
                0,
                "totalQuestionsAnswered",
                &mut gaps,
            ),
            correct_answers: fill(raw.correct_answers, 0, "correctAnswers", &mut gaps),
            streak: fill(raw.streak, 0, "streak", &mut gaps),
            rank: fill(raw.rank, 0, "rank", &mut gaps),
            completed_questions: fill(
                raw.completed_questions,
                Vec::new(),
                "completedQuestions",
                &mut gaps,
            ),
            favorite_questions: fill(
                raw.favorite_questions,
                Vec::new(),
                "favoriteQuestions",
                &mut gaps,
            ),
            notification_settings: fill(
                raw.notification_settings,
                NotificationSettings::default(),
                "notificationSettings",
                &mut gaps,
            ),
            activity_history,
            created_at: fill(raw.created_at, now, "createdAt", &mut gaps),
            last_login_at: fill(raw.last_login_at, now, "lastLoginAt", &mut gaps),
        };

        Ok((record, gaps))
    }

    /// Encodes the record as its stored document form.
    pub fn to_doc(&self) -> Result<serde_json::Value, AppError> {
        serde_json::to_value(self).map_err(|e| AppError::InternalServerError(e.to_string()))
    }
}

/// Default-fill for one document field, noting its name when absent.
fn fill<T>(value: Option<T>, default: T, name: &'static str, gaps: &mut DecodeGaps) -> T {
    match value {
        Some(value) => value,
        None => {
            gaps.missing_fields.push(name);
            default
        }
    }
}

/// DTO for provisioning a profile at account-creation time.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProvisionUserRequest {
    #[validate(length(min = 1, max = 128))]
    pub id: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
}

/// DTO for submitting an answer.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAnswerRequest {
    pub question_id: String,
    pub selected_index: usize,
    /// Defaults to practice when the client does not say.
    #[serde(default)]
    pub mode: ActivityKind,
}

/// Outcome of a scoring attempt, returned to the client.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerResponse {
    pub correct: bool,
    pub already_completed: bool,
    pub points_awarded: i64,
    pub total_points: i64,
    pub streak: i64,
}

/// One leaderboard row.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub rank: i64,
    pub id: String,
    pub name: String,
    pub points: i64,
    pub streak: i64,
    pub country: Option<String>,
}

impl From<&UserRecord> for LeaderboardEntry {
    fn from(record: &UserRecord) -> Self {
        Self {
            rank: record.rank,
            id: record.id.clone(),
            name: record.name.clone(),
            points: record.points,
            streak: record.streak,
            country: record.country.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_doc_full_document_is_clean() {
        let record = UserRecord::new(
            "u1".to_string(),
            "u1@example.com".to_string(),
            "User One".to_string(),
            Utc::now(),
        );
        let doc = record.to_doc().unwrap();

        let (decoded, gaps) = UserRecord::from_doc("u1", doc).unwrap();
        assert!(gaps.is_clean());
        assert_eq!(decoded.email, "u1@example.com");
        assert_eq!(decoded.points, 0);
    }

    #[test]
    fn test_from_doc_fills_missing_fields() {
        let doc = json!({ "name": "Ghost", "points": 12 });

        let (decoded, gaps) = UserRecord::from_doc("ghost", doc).unwrap();
        assert_eq!(decoded.name, "Ghost");
        assert_eq!(decoded.points, 12);
        assert_eq!(decoded.correct_answers, 0);
        assert_eq!(decoded.streak, 0);
        assert!(decoded.completed_questions.is_empty());
        assert!(gaps.missing_fields.contains(&"correctAnswers"));
        assert!(gaps.missing_fields.contains(&"activityHistory"));
        assert!(!gaps.missing_fields.contains(&"points"));
    }

    #[test]
    fn test_from_doc_drops_undecodable_events() {
        let doc = json!({
            "activityHistory": [
                {
                    "date": "2025-03-10T12:00:00Z",
                    "type": "practice",
                    "questionId": "q1",
                    "result": "correct"
                },
                { "garbage": true }
            ]
        });

        let (decoded, gaps) = UserRecord::from_doc("u1", doc).unwrap();
        assert_eq!(decoded.activity_history.len(), 1);
        assert_eq!(gaps.dropped_events, 1);
    }

    #[test]
    fn test_from_doc_rejects_garbled_document() {
        let doc = json!({ "points": "twelve" });
        assert!(UserRecord::from_doc("u1", doc).is_err());
    }
}
