//! # redb-backed Store
//!
//! A disk-backed key-value store using the redb embedded database.
//!
//! One table maps string keys to serialized collection bytes. redb provides:
//! - ACID transactions
//! - Crash safety (copy-on-write B-trees)
//! - Zero configuration
//!
//! Each `put` (and each `put_many`) is a single committed write transaction,
//! so a mutating repository call is either fully durable or not visible at
//! all.

use super::StateStore;
use crate::ExamError;
use redb::{Database, ReadableDatabase, TableDefinition};
use std::path::Path;

/// Table for persisted collections: key string -> serialized JSON bytes.
const STATE: TableDefinition<&str, &[u8]> = TableDefinition::new("state");

/// A disk-backed string-keyed byte store using redb.
pub struct RedbStore {
    db: Database,
}

impl std::fmt::Debug for RedbStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbStore").finish_non_exhaustive()
    }
}

impl RedbStore {
    /// Open or create a store at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ExamError> {
        let db =
            Database::create(path.as_ref()).map_err(|e| ExamError::Storage(e.to_string()))?;

        // Initialize the table if it doesn't exist
        {
            let write_txn = db
                .begin_write()
                .map_err(|e| ExamError::Storage(e.to_string()))?;
            let _ = write_txn
                .open_table(STATE)
                .map_err(|e| ExamError::Storage(e.to_string()))?;
            write_txn
                .commit()
                .map_err(|e| ExamError::Storage(e.to_string()))?;
        }

        Ok(Self { db })
    }

    /// Compact the database file (optional optimization).
    pub fn compact(&mut self) -> Result<(), ExamError> {
        self.db
            .compact()
            .map_err(|e| ExamError::Storage(e.to_string()))?;
        Ok(())
    }
}

impl StateStore for RedbStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, ExamError> {
        let read_txn = self
            .db
            .begin_read()
            .map_err(|e| ExamError::Storage(e.to_string()))?;
        let table = read_txn
            .open_table(STATE)
            .map_err(|e| ExamError::Storage(e.to_string()))?;
        let value = table
            .get(key)
            .map_err(|e| ExamError::Storage(e.to_string()))?
            .map(|v| v.value().to_vec());
        Ok(value)
    }

    fn put(&mut self, key: &str, bytes: &[u8]) -> Result<(), ExamError> {
        self.put_many(&[(key, bytes.to_vec())])
    }

    fn put_many(&mut self, entries: &[(&str, Vec<u8>)]) -> Result<(), ExamError> {
        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| ExamError::Storage(e.to_string()))?;
        {
            let mut table = write_txn
                .open_table(STATE)
                .map_err(|e| ExamError::Storage(e.to_string()))?;
            for (key, bytes) in entries {
                table
                    .insert(*key, bytes.as_slice())
                    .map_err(|e| ExamError::Storage(e.to_string()))?;
            }
        }
        write_txn
            .commit()
            .map_err(|e| ExamError::Storage(e.to_string()))?;
        Ok(())
    }
}
