use async_trait::async_trait;
use sqlx::PgPool;

use crate::{
    error::AppError,
    models::{question::Question, user::UserRecord},
    scoring::daily::DailyQuestionState,
    store::{ProfileStore, QuestionCatalog},
};

/// Profile documents in a JSONB table, one row per user id.
#[derive(Clone)]
pub struct PgProfileStore {
    pool: PgPool,
}

impl PgProfileStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
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
impl ProfileStore for PgProfileStore {
    async fn get(&self, user_id: &str) -> Result<Option<UserRecord>, AppError> {
        let row: Option<(serde_json::Value,)> =
            sqlx::query_as("SELECT doc FROM profiles WHERE id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;

        row.map(|(doc,)| decode_profile(user_id, doc)).transpose()
    }

    async fn create(&self, record: &UserRecord) -> Result<(), AppError> {
        let result =
            sqlx::query("INSERT INTO profiles (id, doc) VALUES ($1, $2) ON CONFLICT (id) DO NOTHING")
                .bind(&record.id)
                .bind(record.to_doc()?)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::StoreConflict(format!(
                "Profile '{}' already exists",
                record.id
            )));
        }
        Ok(())
    }

    async fn save(&self, record: &UserRecord) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO profiles (id, doc, updated_at) VALUES ($1, $2, now())
             ON CONFLICT (id) DO UPDATE SET doc = EXCLUDED.doc, updated_at = now()",
        )
        .bind(&record.id)
        .bind(record.to_doc()?)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn save_rank(&self, user_id: &str, rank: i64) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE profiles SET doc = jsonb_set(doc, '{rank}', to_jsonb($2::BIGINT)), updated_at = now()
             WHERE id = $1",
        )
        .bind(user_id)
        .bind(rank)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list(&self) -> Result<Vec<UserRecord>, AppError> {
        let rows: Vec<(String, serde_json::Value)> =
            sqlx::query_as("SELECT id, doc FROM profiles ORDER BY id")
                .fetch_all(&self.pool)
                .await?;

        let mut records = Vec::with_capacity(rows.len());
        for (id, doc) in rows {
            match decode_profile(&id, doc) {
                Ok(record) => records.push(record),
                Err(e) => tracing::error!("skipping profile '{}': {}", id, e),
            }
        }
        Ok(records)
    }

    async fn daily_state(&self, user_id: &str) -> Result<Option<DailyQuestionState>, AppError> {
        let row: Option<(serde_json::Value,)> =
            sqlx::query_as("SELECT doc FROM daily_states WHERE user_id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;

        row.map(|(doc,)| serde_json::from_value(doc).map_err(AppError::from))
            .transpose()
    }

    async fn save_daily_state(
        &self,
        user_id: &str,
        state: &DailyQuestionState,
    ) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO daily_states (user_id, doc, updated_at) VALUES ($1, $2, now())
             ON CONFLICT (user_id) DO UPDATE SET doc = EXCLUDED.doc, updated_at = now()",
        )
        .bind(user_id)
        .bind(serde_json::to_value(state)?)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

/// Question documents; `created_by` and `created_at` are mirrored into
/// columns so listing can filter and order without decoding.
#[derive(Clone)]
pub struct PgQuestionCatalog {
    pool: PgPool,
}

impl PgQuestionCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn decode_question(id: &str, doc: serde_json::Value) -> Result<Question, AppError> {
    serde_json::from_value(doc).map_err(|e| AppError::MalformedRecord(format!("question '{id}': {e}")))
}

#[async_trait]
impl QuestionCatalog for PgQuestionCatalog {
    async fn list(&self) -> Result<Vec<Question>, AppError> {
        let rows: Vec<(String, serde_json::Value)> =
            sqlx::query_as("SELECT id, doc FROM questions ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await?;

        rows.into_iter()
            .map(|(id, doc)| decode_question(&id, doc))
            .collect()
    }

    async fn list_by_author(&self, author_id: &str) -> Result<Vec<Question>, AppError> {
        let rows: Vec<(String, serde_json::Value)> = sqlx::query_as(
            "SELECT id, doc FROM questions WHERE created_by = $1 ORDER BY created_at DESC",
        )
        .bind(author_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|(id, doc)| decode_question(&id, doc))
            .collect()
    }

    async fn get(&self, question_id: &str) -> Result<Option<Question>, AppError> {
        let row: Option<(serde_json::Value,)> =
            sqlx::query_as("SELECT doc FROM questions WHERE id = $1")
                .bind(question_id)
                .fetch_optional(&self.pool)
                .await?;

        row.map(|(doc,)| decode_question(question_id, doc)).transpose()
    }

    async fn insert(&self, question: &Question) -> Result<(), AppError> {
        sqlx::query("INSERT INTO questions (id, doc, created_by, created_at) VALUES ($1, $2, $3, $4)")
            .bind(&question.id)
            .bind(serde_json::to_value(question)?)
            .bind(&question.created_by)
            .bind(question.created_at)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
