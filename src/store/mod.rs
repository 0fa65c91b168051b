pub mod memory;
pub mod postgres;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::{
    error::AppError,
    models::{question::Question, user::UserRecord},
    scoring::daily::DailyQuestionState,
};

/// Document store for user progress records, keyed by user id.
///
/// Whole-document saves are last-write-wins; `save_rank` is the one
/// field-level merge, so persisting the derived rank cannot clobber a
/// concurrent scoring write. Storage abstraction so the handlers can be
/// exercised in isolation.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn get(&self, user_id: &str) -> Result<Option<UserRecord>, AppError>;

    /// Creates the document; conflicts if the id already exists.
    async fn create(&self, record: &UserRecord) -> Result<(), AppError>;

    /// Replaces the whole document. Last write wins.
    async fn save(&self, record: &UserRecord) -> Result<(), AppError>;

    /// Merges only the cached rank into the document.
    async fn save_rank(&self, user_id: &str, rank: i64) -> Result<(), AppError>;

    /// Every profile, in stable id order. Undecodable documents are logged
    /// and skipped; the leaderboard snapshot tolerates gaps.
    async fn list(&self) -> Result<Vec<UserRecord>, AppError>;

    async fn daily_state(&self, user_id: &str) -> Result<Option<DailyQuestionState>, AppError>;

    async fn save_daily_state(
        &self,
        user_id: &str,
        state: &DailyQuestionState,
    ) -> Result<(), AppError>;
}

/// Read interface over the immutable question documents, plus the
/// authoring insert. The scoring core only ever reads.
#[async_trait]
pub trait QuestionCatalog: Send + Sync {
    /// All questions, newest first.
    async fn list(&self) -> Result<Vec<Question>, AppError>;

    async fn list_by_author(&self, author_id: &str) -> Result<Vec<Question>, AppError>;

    async fn get(&self, question_id: &str) -> Result<Option<Question>, AppError>;

    async fn insert(&self, question: &Question) -> Result<(), AppError>;
}

/// One async mutex per user id: the single-writer queue that serializes
/// read-modify-write cycles on a user's document within this process. The
/// store itself stays last-write-wins, so this is the only thing standing
/// between two same-user submissions and a lost update.
#[derive(Clone, Default)]
pub struct UserLocks {
    inner: Arc<Mutex<HashMap<String, Arc<Mutex<()>>>>>,
}

impl UserLocks {
    /// Waits for and holds the user's writer slot. Dropping the guard
    /// releases it.
    pub async fn acquire(&self, user_id: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut map = self.inner.lock().await;
            map.entry(user_id.to_owned()).or_default().clone()
        };
        lock.lock_owned().await
    }
}
