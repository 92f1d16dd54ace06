//! # Identity Service
//!
//! Generation of globally unique identifiers for new entities.
//!
//! Identifiers are random 128-bit UUIDs in string form: unique well beyond
//! the process lifetime, stable under serialization, and opaque to every
//! other module. No two calls ever return the same value.

use crate::{ExamId, QuestionId, ResultId, UserId};
use uuid::Uuid;

/// Stateless generator for entity identifiers.
pub struct IdGenerator;

impl IdGenerator {
    /// Generate a fresh opaque identifier in string form.
    #[must_use]
    pub fn new_id() -> String {
        Uuid::new_v4().to_string()
    }

    /// Generate a fresh exam id.
    #[must_use]
    pub fn exam_id() -> ExamId {
        ExamId::new(Self::new_id())
    }

    /// Generate a fresh user id.
    #[must_use]
    pub fn user_id() -> UserId {
        UserId::new(Self::new_id())
    }

    /// Generate a fresh question id.
    #[must_use]
    pub fn question_id() -> QuestionId {
        QuestionId::new(Self::new_id())
    }

    /// Generate a fresh result id.
    #[must_use]
    pub fn result_id() -> ResultId {
        ResultId::new(Self::new_id())
    }
}
