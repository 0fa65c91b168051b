use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    error::AppError,
    models::{question::Question, user::UserRecord},
    scoring::daily::DailyQuestionState,
    store::{ProfileStore, QuestionCatalog},
};

/// In-memory document store. Profiles are held as the same raw JSON
/// documents the Postgres store persists, so reads exercise the identical
/// lenient decode path. Backs the integration tests and local development.
#[derive(Clone, Default)]
pub struct MemoryStore {
    profiles: Arc<RwLock<BTreeMap<String, serde_json::Value>>>,
    daily: Arc<RwLock<HashMap<String, DailyQuestionState>>>,
    questions: Arc<RwLock<Vec<Question>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a raw profile document, bypassing the typed encode. Lets tests
    /// stage partial or damaged documents.
    pub async fn seed_profile_doc(&self, user_id: &str, doc: serde_json::Value) {
        self.profiles.write().await.insert(user_id.to_owned(), doc);
    }
}

fn decode_profile(id: &str, doc: serde_json::Value) -> Result<UserRecord, AppError> {
    let (record, gaps) = UserRecord::from_doc(id, doc)?;
    if !gaps.is_clean() {
        tracing::warn!(
            "profile '{}' decoded with defaults: missing {:?}, {} history entries dropped",
            id,
            gaps.missing_fields,
            gaps.dropped_events
        );
    }
    Ok(record)
}

#[async_trait]
impl ProfileStore for MemoryStore {
    async fn get(&self, user_id: &str) -> Result<Option<UserRecord>, AppError> {
        let doc = self.profiles.read().await.get(user_id).cloned();
        doc.map(|doc| decode_profile(user_id, doc)).transpose()
    }

    async fn create(&self, record: &UserRecord) -> Result<(), AppError> {
        let mut profiles = self.profiles.write().await;
        if profiles.contains_key(&record.id) {
            return Err(AppError::StoreConflict(format!(
                "Profile '{}' already exists",
                record.id
            )));
        }
        profiles.insert(record.id.clone(), record.to_doc()?);
        Ok(())
    }

    async fn save(&self, record: &UserRecord) -> Result<(), AppError> {
        self.profiles
            .write()
            .await
            .insert(record.id.clone(), record.to_doc()?);
        Ok(())
    }

    async fn save_rank(&self, user_id: &str, rank: i64) -> Result<(), AppError> {
        let mut profiles = self.profiles.write().await;
        if let Some(serde_json::Value::Object(doc)) = profiles.get_mut(user_id) {
            doc.insert("rank".to_string(), serde_json::json!(rank));
        }
        Ok(())
    }

    async fn list(&self) -> Result<Vec<UserRecord>, AppError> {
        let profiles = self.profiles.read().await;
        let mut records = Vec::with_capacity(profiles.len());
        for (id, doc) in profiles.iter() {
            match decode_profile(id, doc.clone()) {
                Ok(record) => records.push(record),
                Err(e) => tracing::error!("skipping profile '{}': {}", id, e),
            }
        }
        Ok(records)
    }

    async fn daily_state(&self, user_id: &str) -> Result<Option<DailyQuestionState>, AppError> {
        Ok(self.daily.read().await.get(user_id).cloned())
    }

    async fn save_daily_state(
        &self,
        user_id: &str,
        state: &DailyQuestionState,
    ) -> Result<(), AppError> {
        self.daily
            .write()
            .await
            .insert(user_id.to_owned(), state.clone());
        Ok(())
    }
}

#[async_trait]
impl QuestionCatalog for MemoryStore {
    async fn list(&self) -> Result<Vec<Question>, AppError> {
        let mut questions = self.questions.read().await.clone();
        questions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(questions)
    }

    async fn list_by_author(&self, author_id: &str) -> Result<Vec<Question>, AppError> {
        let mut questions: Vec<Question> = self
            .questions
            .read()
            .await
            .iter()
            .filter(|q| q.created_by == author_id)
            .cloned()
            .collect();
        questions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(questions)
    }

    async fn get(&self, question_id: &str) -> Result<Option<Question>, AppError> {
        Ok(self
            .questions
            .read()
            .await
            .iter()
            .find(|q| q.id == question_id)
            .cloned())
    }

    async fn insert(&self, question: &Question) -> Result<(), AppError> {
        let mut questions = self.questions.write().await;
        if questions.iter().any(|q| q.id == question.id) {
            return Err(AppError::StoreConflict(format!(
                "Question '{}' already exists",
                question.id
            )));
        }
        questions.push(question.clone());
        Ok(())
    }
}
