//! # Statistics Engine
//!
//! Aggregations over stored results: per-exam pass rates, a creator-facing
//! overview, and a per-user history summary. All arithmetic is integer-only
//! with half-up rounding, so identical inputs always aggregate identically.

use crate::repository::Repository;
use crate::scoring::{div_round_half_up, percent_round_half_up};
use crate::{ExamId, UserId};
use serde::Serialize;

// =============================================================================
// REPORT TYPES
// =============================================================================

/// Aggregate figures for a single exam.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamStatistics {
    pub exam_id: ExamId,
    pub title: String,
    pub total_attempts: u64,
    pub pass_count: u64,
    /// Percentage of attempts that passed, rounded half-up. Zero when the
    /// exam has no attempts.
    pub pass_rate: u8,
    /// Mean score across attempts, rounded half-up. Zero when the exam has
    /// no attempts.
    pub average_score: u8,
}

/// Dashboard figures for everything one admin has authored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatorOverview {
    pub total_exams: u64,
    pub total_attempts: u64,
    /// Mean of the per-exam pass rates, counting only exams with at least
    /// one attempt. Zero when nothing has been attempted.
    pub average_pass_rate: u8,
    pub per_exam: Vec<ExamStatistics>,
}

/// One student's history at a glance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub taken: u64,
    pub passed: u64,
    /// Mean score across the user's attempts, rounded half-up.
    pub average_score: u8,
}

// =============================================================================
// ENGINE
// =============================================================================

/// Stateless aggregator over a repository snapshot.
pub struct StatsEngine;

impl StatsEngine {
    /// Statistics for a single exam, `None` when the exam does not exist.
    #[must_use]
    pub fn exam_statistics(repo: &Repository, exam_id: &ExamId) -> Option<ExamStatistics> {
        let exam = repo.exam(exam_id)?;
        let results = repo.results_by_exam(exam_id);

        let total_attempts = results.len() as u64;
        let pass_count = results.iter().filter(|r| r.passed).count() as u64;
        let score_sum: u64 = results.iter().map(|r| u64::from(r.score)).sum();

        Some(ExamStatistics {
            exam_id: exam.id.clone(),
            title: exam.title.clone(),
            total_attempts,
            pass_count,
            pass_rate: percent_round_half_up(pass_count, total_attempts),
            average_score: div_round_half_up(score_sum, total_attempts).min(100) as u8,
        })
    }

    /// Overview across all exams authored by `creator`.
    ///
    /// Exams appear in repository order. `average_pass_rate` averages the
    /// pass rates of attempted exams only, so an unattempted exam does not
    /// drag the figure toward zero.
    #[must_use]
    pub fn creator_overview(repo: &Repository, creator: &UserId) -> CreatorOverview {
        let per_exam: Vec<ExamStatistics> = repo
            .exams()
            .iter()
            .filter(|e| &e.created_by == creator)
            .filter_map(|e| Self::exam_statistics(repo, &e.id))
            .collect();

        let total_attempts: u64 = per_exam.iter().map(|s| s.total_attempts).sum();
        let attempted: Vec<&ExamStatistics> = per_exam
            .iter()
            .filter(|s| s.total_attempts > 0)
            .collect();
        let rate_sum: u64 = attempted.iter().map(|s| u64::from(s.pass_rate)).sum();

        CreatorOverview {
            total_exams: per_exam.len() as u64,
            total_attempts,
            average_pass_rate: div_round_half_up(rate_sum, attempted.len() as u64).min(100)
                as u8,
            per_exam,
        }
    }

    /// Summary of one user's attempt history.
    #[must_use]
    pub fn user_summary(repo: &Repository, user_id: &UserId) -> UserSummary {
        let results = repo.results_by_user(user_id);
        let taken = results.len() as u64;
        let passed = results.iter().filter(|r| r.passed).count() as u64;
        let score_sum: u64 = results.iter().map(|r| u64::from(r.score)).sum();

        UserSummary {
            taken,
            passed,
            average_score: div_round_half_up(score_sum, taken).min(100) as u8,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
