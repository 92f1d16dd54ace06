//! # examina-core
//!
//! The deterministic exam engine for Examina - THE LOGIC.
//!
//! This crate implements the core of a self-contained exam platform:
//! authoring and validating exams, gating sessions, walking an attempt
//! through its lifecycle, scoring answers, and aggregating statistics,
//! all on top of an embedded key-value store.
//!
//! ## Architectural Constraints
//!
//! The core:
//! - Is the ONLY place where exam state exists (stateful)
//! - Owns all validation; callers hand in drafts, never finished records
//! - Is deterministic: integer-only scoring, ordered collections
//! - Has NO async, NO network dependencies (pure Rust)

// =============================================================================
// MODULES
// =============================================================================

pub mod draft;
pub mod gate;
pub mod identity;
pub mod lifecycle;
pub mod primitives;
pub mod repository;
pub mod scoring;
pub mod seed;
pub mod stats;
pub mod storage;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{
    Exam, ExamError, ExamId, ExamResult, Question, QuestionId, QuestionKind, ResultId, Role,
    User, UserId,
};

// =============================================================================
// RE-EXPORTS: Exam Engine
// =============================================================================

pub use draft::{ExamDraft, ExamPatch, QuestionDraft, validate_exam};
pub use gate::SessionGate;
pub use identity::IdGenerator;
pub use lifecycle::{
    AttemptQuestion, AttemptQuestionKind, AttemptSheet, AttemptState, LifecycleController,
};
pub use repository::{Repository, ResultSpec};
pub use scoring::{ScoreReport, ScoringEngine};
pub use stats::{CreatorOverview, ExamStatistics, StatsEngine, UserSummary};

// =============================================================================
// RE-EXPORTS: Storage
// =============================================================================

pub use storage::{MemoryStore, RedbStore, StateStore, StorageBackend};
