use std::sync::Arc;

use crate::config::Config;
use crate::store::{ProfileStore, QuestionCatalog, UserLocks};

#[derive(Clone)]
pub struct AppState {
    pub profiles: Arc<dyn ProfileStore>,
    pub catalog: Arc<dyn QuestionCatalog>,
    pub locks: UserLocks,
    pub config: Config,
}
