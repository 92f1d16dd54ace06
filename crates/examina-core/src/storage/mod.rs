//! # Key-Value Storage
//!
//! The abstract persistent store behind the repository.
//!
//! The engine treats persistence as a synchronous string-keyed byte store:
//! three top-level records (`users`, `exams`, `results`), each a serialized
//! JSON array. Two backends implement it:
//! - [`MemoryStore`]: volatile `BTreeMap`, for tests and throwaway sessions
//! - [`RedbStore`]: disk-backed via redb, ACID, survives restarts

pub mod memory;
pub mod redb_store;

pub use memory::MemoryStore;
pub use redb_store::RedbStore;

use crate::ExamError;

/// Synchronous string-keyed byte store.
///
/// `put_many` must be atomic: either every entry becomes visible or none
/// does. The repository relies on this for cascade deletion.
pub trait StateStore {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, ExamError>;

    /// Write `bytes` under `key`, replacing any previous value.
    fn put(&mut self, key: &str, bytes: &[u8]) -> Result<(), ExamError>;

    /// Write several entries as one atomic unit.
    fn put_many(&mut self, entries: &[(&str, Vec<u8>)]) -> Result<(), ExamError>;
}

/// Storage backend for a [`Repository`](crate::Repository).
///
/// Does NOT implement `Clone`: a database handle cannot be safely cloned.
#[derive(Debug)]
pub enum StorageBackend {
    /// In-memory store (fast, volatile).
    InMemory(MemoryStore),
    /// Disk-backed store using redb (ACID, persistent).
    Persistent(RedbStore),
}

impl Default for StorageBackend {
    fn default() -> Self {
        Self::InMemory(MemoryStore::new())
    }
}

impl StateStore for StorageBackend {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, ExamError> {
        match self {
            Self::InMemory(store) => store.get(key),
            Self::Persistent(store) => store.get(key),
        }
    }

    fn put(&mut self, key: &str, bytes: &[u8]) -> Result<(), ExamError> {
        match self {
            Self::InMemory(store) => store.put(key, bytes),
            Self::Persistent(store) => store.put(key, bytes),
        }
    }

    fn put_many(&mut self, entries: &[(&str, Vec<u8>)]) -> Result<(), ExamError> {
        match self {
            Self::InMemory(store) => store.put_many(entries),
            Self::Persistent(store) => store.put_many(entries),
        }
    }
}
