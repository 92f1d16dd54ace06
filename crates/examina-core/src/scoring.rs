//! # Scoring Engine
//!
//! Automated scoring of a submitted answer set against an exam definition.
//!
//! - Pure function: identical inputs always yield identical output
//! - Integer arithmetic only, round-half-up to the nearest percent
//! - Essay questions are ungraded and excluded from both the numerator and
//!   the denominator of the automated percentage

use crate::{Exam, QuestionId, QuestionKind};
use std::collections::BTreeMap;

/// Divide with round-half-up semantics on non-negative integers.
///
/// Returns 0 when the denominator is 0. Matches the rounding of the original
/// scoring and statistics paths without touching floating point.
pub(crate) fn div_round_half_up(numerator: u64, denominator: u64) -> u64 {
    if denominator == 0 {
        return 0;
    }
    numerator
        .saturating_mul(2)
        .saturating_add(denominator)
        / denominator.saturating_mul(2)
}

/// `part / whole` as a round-half-up integer percent, clamped to `[0, 100]`.
pub(crate) fn percent_round_half_up(part: u64, whole: u64) -> u8 {
    div_round_half_up(part.saturating_mul(100), whole).min(100) as u8
}

/// The outcome of scoring one attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreReport {
    /// Aggregate automated score in integer percent, `[0, 100]`.
    pub score: u8,
    /// Whether `score` reached the exam's passing threshold.
    pub passed: bool,
    /// Per-question correctness: `Some(bool)` for multiple choice,
    /// `None` for essay questions awaiting manual grading.
    pub per_question: BTreeMap<QuestionId, Option<bool>>,
}

/// The Scoring Engine computes correctness and the pass/fail verdict.
pub struct ScoringEngine;

impl ScoringEngine {
    /// Score an answer set against an exam.
    ///
    /// For each question in order:
    /// - multiple choice: correct iff the submitted answer exactly matches
    ///   the designated option; a missing answer counts as incorrect
    /// - essay: ungraded (`None`), contributing no points either way
    ///
    /// The aggregate score is `round(100 * earned / possible)` over
    /// multiple-choice points only; an exam with no multiple-choice
    /// questions scores 0.
    #[must_use]
    pub fn score(exam: &Exam, answers: &BTreeMap<QuestionId, String>) -> ScoreReport {
        let mut earned: u64 = 0;
        let mut possible: u64 = 0;
        let mut per_question = BTreeMap::new();

        for question in &exam.questions {
            match &question.kind {
                QuestionKind::MultipleChoice { correct_answer, .. } => {
                    possible = possible.saturating_add(u64::from(question.points));
                    let correct = answers
                        .get(&question.id)
                        .is_some_and(|answer| answer == correct_answer);
                    if correct {
                        earned = earned.saturating_add(u64::from(question.points));
                    }
                    per_question.insert(question.id.clone(), Some(correct));
                }
                QuestionKind::Essay => {
                    per_question.insert(question.id.clone(), None);
                }
            }
        }

        let score = percent_round_half_up(earned, possible);
        ScoreReport {
            score,
            passed: score >= exam.passing_score_percent,
            per_question,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
