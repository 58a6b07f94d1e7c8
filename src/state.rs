//! Application state: the one-shot deck load result and the session registry.
//!
//! The card pool is loaded once at startup. A failed load is remembered
//! instead of aborting: the server still runs, and every attempt to start a
//! session is answered with the stored error. Sessions live in memory, keyed
//! by uuid; restart re-derives deck order from the pool without touching the
//! file again.

use std::{collections::HashMap, sync::Arc};

use tokio::sync::RwLock;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::deck::{load_deck_from_env, DataError};
use crate::domain::Card;
use crate::engine::QuizSession;

pub struct AppState {
    pool: Result<Arc<Vec<Card>>, DataError>,
    sessions: RwLock<HashMap<String, QuizSession>>,
}

impl AppState {
    /// Build state from env: load the deck file and start with an empty
    /// session registry.
    #[instrument(level = "info", skip_all)]
    pub fn new() -> Self {
        match load_deck_from_env(&mut rand::thread_rng()) {
            Ok(cards) => Self::with_pool(cards),
            Err(e) => Self::with_load_error(e),
        }
    }

    /// State over an already-loaded card pool.
    pub fn with_pool(cards: Vec<Card>) -> Self {
        info!(target: "quiz", cards = cards.len(), "Card pool ready");
        Self {
            pool: Ok(Arc::new(cards)),
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// State that remembers why the deck could not be loaded.
    pub fn with_load_error(e: DataError) -> Self {
        warn!(target: "quiz", error = %e, "Serving without a card pool");
        Self {
            pool: Err(e),
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// The loaded pool, or the error that prevented loading it.
    pub fn pool(&self) -> Result<&Arc<Vec<Card>>, &DataError> {
        self.pool.as_ref()
    }

    /// Register a session under a fresh id.
    #[instrument(level = "debug", skip_all)]
    pub async fn insert_session(&self, session: QuizSession) -> String {
        let id = Uuid::new_v4().to_string();
        self.sessions.write().await.insert(id.clone(), session);
        id
    }

    /// Run `f` against the named session. `None` if the id is unknown.
    pub async fn with_session<T>(
        &self,
        id: &str,
        f: impl FnOnce(&mut QuizSession) -> T,
    ) -> Option<T> {
        let mut sessions = self.sessions.write().await;
        sessions.get_mut(id).map(f)
    }

    /// Number of live sessions.
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}
