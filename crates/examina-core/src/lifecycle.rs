//! # Exam Lifecycle Controller
//!
//! The state machine governing one user's engagement with one exam.
//!
//! Two states in scope: **Available** (no result exists) and **Submitted**
//! (a result exists). Only submission is durable; starting an attempt
//! persists nothing. The timed in-progress state is deliberately out of
//! scope.

use crate::repository::{Repository, ResultSpec};
use crate::scoring::ScoringEngine;
use crate::{Exam, ExamError, ExamId, ExamResult, QuestionId, QuestionKind, UserId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

// =============================================================================
// ATTEMPT STATE
// =============================================================================

/// Lifecycle state of a (user, exam) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptState {
    /// No result exists; the user may start an attempt.
    Available,
    /// A result exists; terminal under the single-attempt policy.
    Submitted,
}

impl AttemptState {
    /// Check whether this state is terminal.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, AttemptState::Submitted)
    }
}

// =============================================================================
// ATTEMPT SHEET
// =============================================================================

/// The kind-specific payload of a question as presented to a candidate.
///
/// Multiple-choice questions expose their options but never the designated
/// correct answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AttemptQuestionKind {
    MultipleChoice { options: Vec<String> },
    Essay,
}

/// A question as rendered during an attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptQuestion {
    pub id: QuestionId,
    pub text: String,
    pub points: u32,
    #[serde(flatten)]
    pub kind: AttemptQuestionKind,
}

/// The exam content needed to render an attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptSheet {
    pub exam_id: ExamId,
    pub title: String,
    pub description: String,
    pub duration_minutes: u32,
    pub passing_score_percent: u8,
    pub questions: Vec<AttemptQuestion>,
}

impl AttemptSheet {
    fn from_exam(exam: &Exam) -> Self {
        let questions = exam
            .questions
            .iter()
            .map(|question| AttemptQuestion {
                id: question.id.clone(),
                text: question.text.clone(),
                points: question.points,
                kind: match &question.kind {
                    QuestionKind::MultipleChoice { options, .. } => {
                        AttemptQuestionKind::MultipleChoice {
                            options: options.clone(),
                        }
                    }
                    QuestionKind::Essay => AttemptQuestionKind::Essay,
                },
            })
            .collect();
        Self {
            exam_id: exam.id.clone(),
            title: exam.title.clone(),
            description: exam.description.clone(),
            duration_minutes: exam.duration_minutes,
            passing_score_percent: exam.passing_score_percent,
            questions,
        }
    }
}

// =============================================================================
// CONTROLLER
// =============================================================================

/// The Lifecycle Controller drives attempts from Available to Submitted.
pub struct LifecycleController;

impl LifecycleController {
    /// Current lifecycle state for a (user, exam) pair.
    #[must_use]
    pub fn state(repo: &Repository, user_id: &UserId, exam_id: &ExamId) -> AttemptState {
        if repo.has_result(user_id, exam_id) {
            AttemptState::Submitted
        } else {
            AttemptState::Available
        }
    }

    /// Begin an attempt.
    ///
    /// Returns the content needed to render the attempt. Persists nothing:
    /// only submission is durable. Fails with `ExamError::NotFound` when the
    /// exam is absent and `ExamError::Conflict` when the pair already has a
    /// recorded result.
    pub fn start_attempt(
        repo: &Repository,
        user_id: &UserId,
        exam_id: &ExamId,
    ) -> Result<AttemptSheet, ExamError> {
        let exam = repo
            .exam(exam_id)
            .ok_or_else(|| ExamError::NotFound(format!("exam '{exam_id}'")))?;
        if repo.has_result(user_id, exam_id) {
            return Err(ExamError::Conflict(format!(
                "user '{user_id}' already submitted exam '{exam_id}'"
            )));
        }
        debug!(user = %user_id, exam = %exam_id, "attempt started");
        Ok(AttemptSheet::from_exam(exam))
    }

    /// Submit an attempt.
    ///
    /// Scores the answers against the exam as of submission (later edits to
    /// the passing score never reclassify the stored result), then records
    /// the result. The repository re-checks the single-attempt policy, so a
    /// double submit surfaces `ExamError::Conflict` even if both racers got
    /// past `start_attempt`.
    pub fn submit(
        repo: &mut Repository,
        user_id: &UserId,
        exam_id: &ExamId,
        answers: BTreeMap<QuestionId, String>,
        time_spent_seconds: u64,
    ) -> Result<ExamResult, ExamError> {
        let exam = repo
            .exam(exam_id)
            .ok_or_else(|| ExamError::NotFound(format!("exam '{exam_id}'")))?;
        let report = ScoringEngine::score(exam, &answers);

        repo.submit_result(ResultSpec {
            user_id: user_id.clone(),
            exam_id: exam_id.clone(),
            answers,
            score: report.score,
            passed: report.passed,
            time_spent_seconds,
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================
