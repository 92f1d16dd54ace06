//! # Core Type Definitions
//!
//! All core types for the Examina exam engine:
//! - Opaque string identifiers (`UserId`, `ExamId`, `QuestionId`, `ResultId`)
//! - The exam data model (`User`, `Question`, `Exam`, `ExamResult`)
//! - Error types (`ExamError`)
//!
//! ## Determinism Guarantees
//!
//! All types in this module:
//! - Use integer arithmetic only (no floating-point)
//! - Implement `Ord` for deterministic ordering in `BTreeMap`/`BTreeSet`
//! - Serialize to the persisted JSON layout (camelCase fields, tagged
//!   question variants)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

// =============================================================================
// IDENTIFIERS
// =============================================================================

macro_rules! string_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Create an identifier from its string form.
            #[must_use]
            pub fn new(s: impl Into<String>) -> Self {
                Self(s.into())
            }

            /// Get the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id! {
    /// Unique identifier for a registered user.
    UserId
}

string_id! {
    /// Unique identifier for an exam.
    ExamId
}

string_id! {
    /// Identifier for a question, unique within its parent exam.
    QuestionId
}

string_id! {
    /// Unique identifier for a recorded result.
    ResultId
}

// =============================================================================
// USER
// =============================================================================

/// Role of a registered user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Can browse exams, take attempts, and view own results.
    Student,
    /// Can additionally author exams and review aggregate statistics.
    Admin,
}

impl Role {
    /// Check whether this role grants authoring rights.
    #[must_use]
    pub fn is_admin(self) -> bool {
        matches!(self, Role::Admin)
    }
}

/// A registered user.
///
/// Created at registration and never deleted in scope. The credential is an
/// opaque secret; hashing is an explicit non-goal and lives outside the CORE.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    /// Unique key across the user collection.
    pub email: String,
    pub credential: String,
    pub role: Role,
}

// =============================================================================
// QUESTION
// =============================================================================

/// The kind-specific payload of a question.
///
/// Tagged sum type validated at the construction boundary: for
/// `MultipleChoice`, `correct_answer` always equals one of `options` once the
/// parent exam has passed validation, and read sites rely on that.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuestionKind {
    /// Scored automatically by exact string match against the correct option.
    #[serde(rename_all = "camelCase")]
    MultipleChoice {
        /// Ordered answer options, at least two, all non-empty.
        options: Vec<String>,
        /// The designated correct option.
        correct_answer: String,
    },
    /// Free-text question excluded from automated scoring.
    Essay,
}

/// A single question, owned exclusively by its parent exam.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: QuestionId,
    pub text: String,
    /// Point value, always >= 1.
    pub points: u32,
    #[serde(flatten)]
    pub kind: QuestionKind,
}

impl Question {
    /// Check whether this question takes part in automated scoring.
    #[must_use]
    pub fn is_multiple_choice(&self) -> bool {
        matches!(self.kind, QuestionKind::MultipleChoice { .. })
    }
}

// =============================================================================
// EXAM
// =============================================================================

/// An authored exam with its embedded questions.
///
/// Mutable (title, description, duration, passing score, questions) only by
/// its creator; `id`, `created_by`, and `created_at` never change after
/// creation. Deletion cascades to all results referencing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exam {
    pub id: ExamId,
    pub title: String,
    pub description: String,
    /// Allowed time for an attempt, in `[5, 180]` minutes.
    pub duration_minutes: u32,
    /// Threshold an attempt's score must reach to pass, in `[1, 100]`.
    pub passing_score_percent: u8,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
    /// Ordered questions, at least one.
    pub questions: Vec<Question>,
}

impl Exam {
    /// Look up a question by id.
    #[must_use]
    pub fn question(&self, id: &QuestionId) -> Option<&Question> {
        self.questions.iter().find(|q| &q.id == id)
    }

    /// Total points across multiple-choice questions, the automated-score
    /// denominator.
    #[must_use]
    pub fn mcq_points_total(&self) -> u64 {
        self.questions
            .iter()
            .filter(|q| q.is_multiple_choice())
            .map(|q| u64::from(q.points))
            .sum()
    }
}

// =============================================================================
// RESULT
// =============================================================================

/// A recorded attempt outcome.
///
/// Created exactly once per (user, exam) pair on submission, immutable
/// thereafter, and destroyed only as a cascade of exam deletion. `passed` is
/// evaluated against the exam's passing score as of submission; later exam
/// edits never reclassify stored results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamResult {
    pub id: ResultId,
    pub user_id: UserId,
    pub exam_id: ExamId,
    /// Submitted answer per question id. Unanswered questions are absent.
    pub answers: BTreeMap<QuestionId, String>,
    /// Automated score in integer percent, `[0, 100]`.
    pub score: u8,
    pub passed: bool,
    pub time_spent_seconds: u64,
    pub submitted_at: DateTime<Utc>,
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors surfaced by the Examina engine.
///
/// All errors are local to a single call and caller-recoverable; no operation
/// is ever partially applied and nothing here is fatal to the process.
#[derive(Debug, Error)]
pub enum ExamError {
    /// A malformed or incomplete exam/question spec was rejected.
    #[error("validation failed: {0}")]
    Validation(String),

    /// An operation referenced a missing exam, result, or user.
    #[error("not found: {0}")]
    NotFound(String),

    /// A uniqueness rule was violated (duplicate email, duplicate attempt).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Bad credentials, or a role/ownership check failed.
    #[error("unauthorized: {0}")]
    Auth(String),

    /// The key-value store failed to read or write.
    #[error("storage error: {0}")]
    Storage(String),

    /// A persisted collection could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(String),
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    fn mcq(id: &str, correct: &str) -> Question {
        Question {
            id: QuestionId::new(id),
            text: format!("question {id}"),
            points: 10,
            kind: QuestionKind::MultipleChoice {
                options: vec!["A".into(), "B".into(), correct.into()],
                correct_answer: correct.into(),
            },
        }
    }

    #[test]
    fn question_kind_serializes_with_type_tag() {
        let question = mcq("q1", "C");
        let json = serde_json::to_value(&question).unwrap();
        assert_eq!(json["type"], "multiple_choice");
        assert_eq!(json["correctAnswer"], "C");

        let essay = Question {
            id: QuestionId::new("q2"),
            text: "explain".into(),
            points: 20,
            kind: QuestionKind::Essay,
        };
        let json = serde_json::to_value(&essay).unwrap();
        assert_eq!(json["type"], "essay");
        assert!(json.get("options").is_none());
    }

    #[test]
    fn question_round_trips_through_json() {
        let question = mcq("q1", "B");
        let bytes = serde_json::to_vec(&question).unwrap();
        let back: Question = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(back, question);
    }

    #[test]
    fn mcq_points_total_excludes_essays() {
        let exam = Exam {
            id: ExamId::new("e1"),
            title: "t".into(),
            description: String::new(),
            duration_minutes: 30,
            passing_score_percent: 70,
            created_by: UserId::new("u1"),
            created_at: Utc::now(),
            questions: vec![
                mcq("q1", "A"),
                Question {
                    id: QuestionId::new("q2"),
                    text: "essay".into(),
                    points: 20,
                    kind: QuestionKind::Essay,
                },
            ],
        };
        assert_eq!(exam.mcq_points_total(), 10);
    }

    #[test]
    fn role_serializes_snake_case() {
        assert_eq!(
            serde_json::to_value(Role::Student).unwrap(),
            serde_json::Value::String("student".into())
        );
        assert!(Role::Admin.is_admin());
        assert!(!Role::Student.is_admin());
    }

    #[test]
    fn ids_order_deterministically() {
        let mut ids = vec![
            QuestionId::new("1-3"),
            QuestionId::new("1-1"),
            QuestionId::new("1-2"),
        ];
        ids.sort();
        assert_eq!(
            ids,
            vec![
                QuestionId::new("1-1"),
                QuestionId::new("1-2"),
                QuestionId::new("1-3"),
            ]
        );
    }
}
