//! In-memory store backend.
//!
//! Volatile storage for tests and embedders that do not need durability.
//! Uses `BTreeMap` for deterministic iteration.

use super::StateStore;
use crate::ExamError;
use std::collections::BTreeMap;

/// A volatile string-keyed byte store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, Vec<u8>>,
}

impl MemoryStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether the store holds no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl StateStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, ExamError> {
        Ok(self.entries.get(key).cloned())
    }

    fn put(&mut self, key: &str, bytes: &[u8]) -> Result<(), ExamError> {
        self.entries.insert(key.to_owned(), bytes.to_vec());
        Ok(())
    }

    fn put_many(&mut self, entries: &[(&str, Vec<u8>)]) -> Result<(), ExamError> {
        // Infallible once reached, so the all-or-nothing contract holds.
        for (key, bytes) in entries {
            self.entries.insert((*key).to_owned(), bytes.clone());
        }
        Ok(())
    }
}
