//! # Innate Primitives
//!
//! Hardcoded limits and authoring defaults for the Examina CORE.
//!
//! Examina starts with zero data but fixed rules. These values are compiled
//! into the binary and are immutable at runtime; there is no configuration
//! surface in scope.

// =============================================================================
// STORE KEYS
// =============================================================================

/// Store key under which the user collection is persisted.
pub const KEY_USERS: &str = "users";

/// Store key under which the exam collection is persisted.
pub const KEY_EXAMS: &str = "exams";

/// Store key under which the result collection is persisted.
pub const KEY_RESULTS: &str = "results";

// =============================================================================
// VALIDATION LIMITS
// =============================================================================

/// Shortest allowed exam duration, in minutes.
pub const MIN_DURATION_MINUTES: u32 = 5;

/// Longest allowed exam duration, in minutes.
pub const MAX_DURATION_MINUTES: u32 = 180;

/// Lowest allowed passing score, in percent.
///
/// A passing score of 0 would mark every attempt as passed, so the floor is 1.
pub const MIN_PASSING_SCORE: u8 = 1;

/// Highest allowed passing score, in percent.
pub const MAX_PASSING_SCORE: u8 = 100;

/// Minimum number of options a multiple-choice question must offer.
pub const MIN_OPTIONS: usize = 2;

// =============================================================================
// AUTHORING DEFAULTS
// =============================================================================

/// Default exam duration on a fresh draft, in minutes.
pub const DEFAULT_DURATION_MINUTES: u32 = 30;

/// Default passing score on a fresh draft, in percent.
pub const DEFAULT_PASSING_SCORE: u8 = 70;

/// Default point value of a fresh question draft.
pub const DEFAULT_POINTS: u32 = 10;

/// Number of empty option slots a fresh multiple-choice draft starts with.
pub const DEFAULT_OPTION_SLOTS: usize = 4;
