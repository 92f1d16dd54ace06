//! # Authoring Drafts
//!
//! Write-side inputs for exam authoring and the single validation boundary.
//!
//! - Drafts carry the authoring defaults the UI starts from
//! - Validation runs on the fully built exam, for create and for the merged
//!   result of an update alike
//! - A draft that fails validation is rejected whole; nothing is applied

use crate::primitives::{
    DEFAULT_DURATION_MINUTES, DEFAULT_OPTION_SLOTS, DEFAULT_PASSING_SCORE, DEFAULT_POINTS,
    MAX_DURATION_MINUTES, MAX_PASSING_SCORE, MIN_DURATION_MINUTES, MIN_OPTIONS, MIN_PASSING_SCORE,
};
use crate::{Exam, ExamError, QuestionId, QuestionKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// =============================================================================
// DRAFTS
// =============================================================================

/// A question under authoring.
///
/// The id is optional: the repository assigns a fresh one when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<QuestionId>,
    pub text: String,
    pub points: u32,
    #[serde(flatten)]
    pub kind: QuestionKind,
}

impl Default for QuestionDraft {
    /// A fresh multiple-choice draft: four empty option slots, 10 points.
    fn default() -> Self {
        Self {
            id: None,
            text: String::new(),
            points: DEFAULT_POINTS,
            kind: QuestionKind::MultipleChoice {
                options: vec![String::new(); DEFAULT_OPTION_SLOTS],
                correct_answer: String::new(),
            },
        }
    }
}

/// An exam under authoring, passed to `Repository::create_exam`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamDraft {
    pub title: String,
    pub description: String,
    pub duration_minutes: u32,
    pub passing_score_percent: u8,
    pub questions: Vec<QuestionDraft>,
}

impl Default for ExamDraft {
    /// A fresh exam draft: 30 minutes, passing score 70, no questions yet.
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            duration_minutes: DEFAULT_DURATION_MINUTES,
            passing_score_percent: DEFAULT_PASSING_SCORE,
            questions: Vec::new(),
        }
    }
}

/// A partial update merged into an existing exam by `Repository::update_exam`.
///
/// Absent fields keep their current value. `id`, `created_by`, and
/// `created_at` are not representable here and can never change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passing_score_percent: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub questions: Option<Vec<QuestionDraft>>,
}

// =============================================================================
// VALIDATION
// =============================================================================

/// Validate a fully built exam against the authoring rules.
///
/// Rules:
/// - title non-empty after trimming
/// - at least one question
/// - duration within `[5, 180]` minutes
/// - passing score within `[1, 100]` percent
/// - every question: non-empty text, points >= 1
/// - multiple-choice: at least two options, all non-empty, and the correct
///   answer equal to one of them
/// - question ids unique within the exam
///
/// Returns `ExamError::Validation` naming the first violated rule.
pub fn validate_exam(exam: &Exam) -> Result<(), ExamError> {
    if exam.title.trim().is_empty() {
        return Err(ExamError::Validation("exam title must not be empty".into()));
    }
    if exam.questions.is_empty() {
        return Err(ExamError::Validation(
            "exam must contain at least one question".into(),
        ));
    }
    if !(MIN_DURATION_MINUTES..=MAX_DURATION_MINUTES).contains(&exam.duration_minutes) {
        return Err(ExamError::Validation(format!(
            "duration must be between {MIN_DURATION_MINUTES} and {MAX_DURATION_MINUTES} minutes, got {}",
            exam.duration_minutes
        )));
    }
    if !(MIN_PASSING_SCORE..=MAX_PASSING_SCORE).contains(&exam.passing_score_percent) {
        return Err(ExamError::Validation(format!(
            "passing score must be between {MIN_PASSING_SCORE} and {MAX_PASSING_SCORE} percent, got {}",
            exam.passing_score_percent
        )));
    }

    let mut seen = BTreeSet::new();
    for question in &exam.questions {
        if !seen.insert(&question.id) {
            return Err(ExamError::Validation(format!(
                "duplicate question id '{}'",
                question.id
            )));
        }
        validate_question(question)?;
    }
    Ok(())
}

fn validate_question(question: &crate::Question) -> Result<(), ExamError> {
    if question.text.trim().is_empty() {
        return Err(ExamError::Validation(format!(
            "question '{}' has empty text",
            question.id
        )));
    }
    if question.points == 0 {
        return Err(ExamError::Validation(format!(
            "question '{}' must be worth at least one point",
            question.id
        )));
    }
    if let QuestionKind::MultipleChoice {
        options,
        correct_answer,
    } = &question.kind
    {
        if options.len() < MIN_OPTIONS {
            return Err(ExamError::Validation(format!(
                "question '{}' needs at least {MIN_OPTIONS} options",
                question.id
            )));
        }
        if options.iter().any(|option| option.trim().is_empty()) {
            return Err(ExamError::Validation(format!(
                "question '{}' has a blank option",
                question.id
            )));
        }
        if !options.contains(correct_answer) {
            return Err(ExamError::Validation(format!(
                "question '{}' correct answer is not one of its options",
                question.id
            )));
        }
    }
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================
