//! # Seed Data
//!
//! The sample exam the store is initialized with when the `exams` record is
//! absent at startup.

use crate::{Exam, ExamId, Question, QuestionId, QuestionKind, UserId};
use chrono::Utc;

/// Build the initial exam collection: one "JavaScript Basics" sample exam.
///
/// Field values match the persisted layout exactly, including the literal
/// `"1"` / `"1-1"` style ids.
#[must_use]
pub fn sample_exams() -> Vec<Exam> {
    vec![Exam {
        id: ExamId::new("1"),
        title: "JavaScript Basics".into(),
        description: "Test your knowledge of JavaScript fundamentals".into(),
        duration_minutes: 30,
        passing_score_percent: 70,
        created_by: UserId::new("admin"),
        created_at: Utc::now(),
        questions: vec![
            Question {
                id: QuestionId::new("1-1"),
                text: "Which of the following is not a JavaScript data type?".into(),
                points: 10,
                kind: QuestionKind::MultipleChoice {
                    options: vec![
                        "String".into(),
                        "Boolean".into(),
                        "Float".into(),
                        "Object".into(),
                    ],
                    correct_answer: "Float".into(),
                },
            },
            Question {
                id: QuestionId::new("1-2"),
                text: "What does DOM stand for?".into(),
                points: 10,
                kind: QuestionKind::MultipleChoice {
                    options: vec![
                        "Document Object Model".into(),
                        "Data Object Model".into(),
                        "Document Oriented Model".into(),
                        "Digital Ordinance Model".into(),
                    ],
                    correct_answer: "Document Object Model".into(),
                },
            },
            Question {
                id: QuestionId::new("1-3"),
                text: "Explain the concept of closures in JavaScript.".into(),
                points: 20,
                kind: QuestionKind::Essay,
            },
        ],
    }]
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::draft::validate_exam;

    #[test]
    fn sample_exam_is_valid() {
        let exams = sample_exams();
        assert_eq!(exams.len(), 1);
        validate_exam(&exams[0]).expect("seed exam must satisfy authoring rules");
    }

    #[test]
    fn sample_exam_shape_matches_source_data() {
        let exam = &sample_exams()[0];
        assert_eq!(exam.id, ExamId::new("1"));
        assert_eq!(exam.title, "JavaScript Basics");
        assert_eq!(exam.duration_minutes, 30);
        assert_eq!(exam.passing_score_percent, 70);
        assert_eq!(exam.questions.len(), 3);
        assert_eq!(exam.mcq_points_total(), 20);
        assert!(matches!(exam.questions[2].kind, QuestionKind::Essay));
    }
}
