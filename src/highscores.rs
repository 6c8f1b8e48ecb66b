//! Best-score persistence
//!
//! The best score is the only state that outlives a session. It is read once
//! when the controller is built and written once per session that beats it.
//! Storage is best-effort: failures are logged and play carries on with the
//! in-memory value.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use thiserror::Error;

/// Default storage key for the best score
pub const BEST_SCORE_KEY: &str = "deepwork_best";

/// Key-value store failures
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage is not available")]
    Unavailable,

    #[error("failed to read {key}: {reason}")]
    Read { key: String, reason: String },

    #[error("failed to write {key}: {reason}")]
    Write { key: String, reason: String },

    #[error("stored value for {key} is not a score: {value:?}")]
    Corrupt { key: String, value: String },
}

/// External key-value store holding integer scores
pub trait ScoreStore {
    fn get(&self, key: &str) -> Result<Option<u32>, StorageError>;
    fn set(&mut self, key: &str, value: u32) -> Result<(), StorageError>;
}

/// In-memory store. Clones share the same map, so a host or test can keep a
/// handle and inspect what the controller persisted.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: Rc<RefCell<HashMap<String, u32>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with one value
    pub fn with_value(key: &str, value: u32) -> Self {
        let store = Self::new();
        store.values.borrow_mut().insert(key.to_string(), value);
        store
    }

    pub fn value(&self, key: &str) -> Option<u32> {
        self.values.borrow().get(key).copied()
    }
}

impl ScoreStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<u32>, StorageError> {
        Ok(self.value(key))
    }

    fn set(&mut self, key: &str, value: u32) -> Result<(), StorageError> {
        self.values.borrow_mut().insert(key.to_string(), value);
        Ok(())
    }
}

/// Browser LocalStorage; scores are stored as decimal strings
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Default)]
pub struct LocalStorageStore;

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    fn storage() -> Result<web_sys::Storage, StorageError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(StorageError::Unavailable)
    }
}

#[cfg(target_arch = "wasm32")]
impl ScoreStore for LocalStorageStore {
    fn get(&self, key: &str) -> Result<Option<u32>, StorageError> {
        let raw = Self::storage()?
            .get_item(key)
            .map_err(|e| StorageError::Read {
                key: key.to_string(),
                reason: format!("{:?}", e),
            })?;
        raw.map(|value| parse_score(key, &value)).transpose()
    }

    fn set(&mut self, key: &str, value: u32) -> Result<(), StorageError> {
        Self::storage()?
            .set_item(key, &value.to_string())
            .map_err(|e| StorageError::Write {
                key: key.to_string(),
                reason: format!("{:?}", e),
            })
    }
}

/// Parse a stored score string
pub fn parse_score(key: &str, value: &str) -> Result<u32, StorageError> {
    value.trim().parse().map_err(|_| StorageError::Corrupt {
        key: key.to_string(),
        value: value.to_string(),
    })
}

/// Best score backed by a store
pub struct BestScore {
    key: String,
    value: u32,
    store: Box<dyn ScoreStore>,
}

impl std::fmt::Debug for BestScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BestScore")
            .field("key", &self.key)
            .field("value", &self.value)
            .finish()
    }
}

impl BestScore {
    /// Read the persisted best once; any failure starts from 0
    pub fn load(key: impl Into<String>, store: Box<dyn ScoreStore>) -> Self {
        let key = key.into();
        let value = match store.get(&key) {
            Ok(Some(value)) => {
                log::info!("Loaded best score {}", value);
                value
            }
            Ok(None) => {
                log::info!("No best score found, starting fresh");
                0
            }
            Err(e) => {
                log::warn!("Best score unavailable: {}", e);
                0
            }
        };
        Self { key, value, store }
    }

    pub fn get(&self) -> u32 {
        self.value
    }

    /// Check if a score beats the current best
    pub fn qualifies(&self, score: u32) -> bool {
        score > self.value
    }

    /// Record a finished session's score.
    ///
    /// Returns true when it is a new best. The new value is kept in memory
    /// even if persisting it fails.
    pub fn submit(&mut self, score: u32) -> bool {
        if !self.qualifies(score) {
            return false;
        }
        self.value = score;
        match self.store.set(&self.key, score) {
            Ok(()) => log::info!("Best score saved ({})", score),
            Err(e) => log::warn!("Failed to persist best score: {}", e),
        }
        true
    }
}
