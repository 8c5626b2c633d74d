use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use shared::word_bank::WordBank;

use crate::models::UserProgress;

#[derive(Debug)]
pub enum StoreError {
    Unavailable(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable(reason) => write!(f, "Progress store unavailable: {}", reason),
        }
    }
}

impl std::error::Error for StoreError {}

/// Per-user progress keyed by an opaque user id.
///
/// `get_or_create` hands out a copy that `update` writes back whole, so
/// interleaved copy/write cycles can lose a write. Changes that must not be
/// lost go through `modify`, which runs under the store's lock.
pub trait ProgressStore: Send + Sync {
    fn get_or_create(&self, user_id: &str) -> Result<UserProgress, StoreError>;
    fn update(&self, user_id: &str, progress: UserProgress) -> Result<(), StoreError>;
    fn modify(&self, user_id: &str, f: &mut dyn FnMut(&mut UserProgress)) -> Result<(), StoreError>;
}

/// Runs `f` against the user's progress atomically and hands back its result.
pub fn modify_progress<S, T, F>(store: &S, user_id: &str, f: F) -> Result<T, StoreError>
where
    S: ProgressStore + ?Sized,
    F: FnOnce(&mut UserProgress) -> T,
{
    let mut f = Some(f);
    let mut result = None;
    store.modify(user_id, &mut |progress| {
        if let Some(f) = f.take() {
            result = Some(f(progress));
        }
    })?;
    result.ok_or_else(|| StoreError::Unavailable(format!("no progress change applied for {}", user_id)))
}

/// Process-lifetime store. Nothing is ever evicted.
pub struct InMemoryProgressStore {
    bank: Arc<WordBank>,
    users: Mutex<HashMap<String, UserProgress>>,
}

impl InMemoryProgressStore {
    pub fn new(bank: Arc<WordBank>) -> Self {
        Self {
            bank,
            users: Mutex::new(HashMap::new()),
        }
    }

    pub fn user_count(&self) -> Result<usize, StoreError> {
        Ok(self.lock()?.len())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, UserProgress>>, StoreError> {
        self.users
            .lock()
            .map_err(|e| StoreError::Unavailable(e.to_string()))
    }
}

impl ProgressStore for InMemoryProgressStore {
    fn get_or_create(&self, user_id: &str) -> Result<UserProgress, StoreError> {
        let mut users = self.lock()?;
        let progress = users
            .entry(user_id.to_string())
            .or_insert_with(|| UserProgress::new(&self.bank));
        Ok(progress.clone())
    }

    fn update(&self, user_id: &str, progress: UserProgress) -> Result<(), StoreError> {
        self.lock()?.insert(user_id.to_string(), progress);
        Ok(())
    }

    fn modify(&self, user_id: &str, f: &mut dyn FnMut(&mut UserProgress)) -> Result<(), StoreError> {
        let mut users = self.lock()?;
        let progress = users
            .entry(user_id.to_string())
            .or_insert_with(|| UserProgress::new(&self.bank));
        f(progress);
        Ok(())
    }
}
