//! # Data Repository
//!
//! Canonical owner of the user, exam, and result collections.
//!
//! - Reloads all collections from the key-value store on construction,
//!   seeding the exam collection on first run
//! - Every mutating call persists the affected collection(s) before the
//!   in-memory state changes, so a failed write leaves nothing applied
//! - Enforces the referential rules: deleting an exam cascades to its
//!   results, and at most one result exists per (user, exam) pair

use crate::draft::{ExamDraft, ExamPatch, QuestionDraft, validate_exam};
use crate::identity::IdGenerator;
use crate::primitives::{KEY_EXAMS, KEY_RESULTS, KEY_USERS};
use crate::seed;
use crate::storage::{MemoryStore, RedbStore, StateStore, StorageBackend};
use crate::{Exam, ExamError, ExamId, ExamResult, Question, QuestionId, ResultId, User, UserId};
use chrono::Utc;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

/// Input to [`Repository::submit_result`], produced by the lifecycle
/// controller after scoring.
#[derive(Debug, Clone)]
pub struct ResultSpec {
    pub user_id: UserId,
    pub exam_id: ExamId,
    pub answers: BTreeMap<QuestionId, String>,
    pub score: u8,
    pub passed: bool,
    pub time_spent_seconds: u64,
}

/// The Data Repository over a storage backend.
#[derive(Debug)]
pub struct Repository {
    backend: StorageBackend,
    users: Vec<User>,
    exams: Vec<Exam>,
    results: Vec<ExamResult>,
}

impl Repository {
    /// Create a repository over a volatile in-memory store.
    pub fn in_memory() -> Result<Self, ExamError> {
        Self::from_backend(StorageBackend::InMemory(MemoryStore::new()))
    }

    /// Open a repository over a disk-backed store at the given path.
    ///
    /// Collections persisted by a previous process are reloaded; an absent
    /// exam record is seeded with the sample exam and persisted immediately.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ExamError> {
        Self::from_backend(StorageBackend::Persistent(RedbStore::open(path)?))
    }

    /// Create a repository over an existing backend.
    pub fn from_backend(mut backend: StorageBackend) -> Result<Self, ExamError> {
        let users: Vec<User> = Self::load(&backend, KEY_USERS)?.unwrap_or_default();
        let results: Vec<ExamResult> = Self::load(&backend, KEY_RESULTS)?.unwrap_or_default();
        let exams: Vec<Exam> = match Self::load(&backend, KEY_EXAMS)? {
            Some(exams) => exams,
            None => {
                let seeded = seed::sample_exams();
                backend.put(KEY_EXAMS, &Self::encode(&seeded)?)?;
                info!(count = seeded.len(), "seeded exam collection");
                seeded
            }
        };
        debug!(
            users = users.len(),
            exams = exams.len(),
            results = results.len(),
            "repository loaded"
        );
        Ok(Self {
            backend,
            users,
            exams,
            results,
        })
    }

    fn load<T: DeserializeOwned>(
        backend: &StorageBackend,
        key: &str,
    ) -> Result<Option<Vec<T>>, ExamError> {
        match backend.get(key)? {
            Some(bytes) => serde_json::from_slice(&bytes)
                .map(Some)
                .map_err(|e| ExamError::Serialization(e.to_string())),
            None => Ok(None),
        }
    }

    fn encode<T: Serialize>(collection: &[T]) -> Result<Vec<u8>, ExamError> {
        serde_json::to_vec(collection).map_err(|e| ExamError::Serialization(e.to_string()))
    }

    fn build_questions(drafts: Vec<QuestionDraft>) -> Vec<Question> {
        drafts
            .into_iter()
            .map(|draft| Question {
                id: draft.id.unwrap_or_else(IdGenerator::question_id),
                text: draft.text,
                points: draft.points,
                kind: draft.kind,
            })
            .collect()
    }

    // =========================================================================
    // EXAMS
    // =========================================================================

    /// Create an exam from a draft.
    ///
    /// Assigns a fresh id and creation timestamp, fills in missing question
    /// ids, validates, and persists. Rejects with `ExamError::Validation`
    /// without applying anything when the draft breaks an authoring rule.
    pub fn create_exam(
        &mut self,
        draft: ExamDraft,
        created_by: &UserId,
    ) -> Result<Exam, ExamError> {
        let exam = Exam {
            id: IdGenerator::exam_id(),
            title: draft.title,
            description: draft.description,
            duration_minutes: draft.duration_minutes,
            passing_score_percent: draft.passing_score_percent,
            created_by: created_by.clone(),
            created_at: Utc::now(),
            questions: Self::build_questions(draft.questions),
        };
        validate_exam(&exam)?;

        let mut next = self.exams.clone();
        next.push(exam.clone());
        self.backend.put(KEY_EXAMS, &Self::encode(&next)?)?;
        self.exams = next;
        info!(exam = %exam.id, questions = exam.questions.len(), "created exam");
        Ok(exam)
    }

    /// Merge a partial update into an existing exam.
    ///
    /// The merged exam is re-validated against the same rules as create.
    /// `id`, `created_by`, and `created_at` never change. Fails with
    /// `ExamError::NotFound` when the exam is absent.
    pub fn update_exam(&mut self, exam_id: &ExamId, patch: ExamPatch) -> Result<Exam, ExamError> {
        let index = self
            .exams
            .iter()
            .position(|exam| &exam.id == exam_id)
            .ok_or_else(|| ExamError::NotFound(format!("exam '{exam_id}'")))?;

        let mut merged = self.exams[index].clone();
        if let Some(title) = patch.title {
            merged.title = title;
        }
        if let Some(description) = patch.description {
            merged.description = description;
        }
        if let Some(duration_minutes) = patch.duration_minutes {
            merged.duration_minutes = duration_minutes;
        }
        if let Some(passing_score_percent) = patch.passing_score_percent {
            merged.passing_score_percent = passing_score_percent;
        }
        if let Some(questions) = patch.questions {
            merged.questions = Self::build_questions(questions);
        }
        validate_exam(&merged)?;

        let mut next = self.exams.clone();
        next[index] = merged.clone();
        self.backend.put(KEY_EXAMS, &Self::encode(&next)?)?;
        self.exams = next;
        debug!(exam = %merged.id, "updated exam");
        Ok(merged)
    }

    /// Delete an exam and, atomically, every result referencing it.
    ///
    /// Idempotent: deleting a non-existent id is a no-op, not an error.
    pub fn delete_exam(&mut self, exam_id: &ExamId) -> Result<(), ExamError> {
        if !self.exams.iter().any(|exam| &exam.id == exam_id) {
            return Ok(());
        }

        let next_exams: Vec<Exam> = self
            .exams
            .iter()
            .filter(|exam| &exam.id != exam_id)
            .cloned()
            .collect();
        let next_results: Vec<ExamResult> = self
            .results
            .iter()
            .filter(|result| &result.exam_id != exam_id)
            .cloned()
            .collect();
        let cascaded = self.results.len() - next_results.len();

        // Both records land in one store transaction; the in-memory swap
        // happens only after the write succeeds.
        self.backend.put_many(&[
            (KEY_EXAMS, Self::encode(&next_exams)?),
            (KEY_RESULTS, Self::encode(&next_results)?),
        ])?;
        self.exams = next_exams;
        self.results = next_results;
        info!(exam = %exam_id, cascaded, "deleted exam");
        Ok(())
    }

    /// Look up an exam by id.
    #[must_use]
    pub fn exam(&self, exam_id: &ExamId) -> Option<&Exam> {
        self.exams.iter().find(|exam| &exam.id == exam_id)
    }

    /// All exams in insertion order.
    #[must_use]
    pub fn exams(&self) -> &[Exam] {
        &self.exams
    }

    // =========================================================================
    // RESULTS
    // =========================================================================

    /// Record a submitted attempt.
    ///
    /// Enforces the referential rules at write time: the exam and user must
    /// exist (`ExamError::NotFound`) and no result may already exist for the
    /// (user, exam) pair (`ExamError::Conflict`, single-attempt policy).
    pub fn submit_result(&mut self, spec: ResultSpec) -> Result<ExamResult, ExamError> {
        if self.exam(&spec.exam_id).is_none() {
            return Err(ExamError::NotFound(format!("exam '{}'", spec.exam_id)));
        }
        if self.user(&spec.user_id).is_none() {
            return Err(ExamError::NotFound(format!("user '{}'", spec.user_id)));
        }
        if self.has_result(&spec.user_id, &spec.exam_id) {
            return Err(ExamError::Conflict(format!(
                "user '{}' already submitted exam '{}'",
                spec.user_id, spec.exam_id
            )));
        }

        let result = ExamResult {
            id: IdGenerator::result_id(),
            user_id: spec.user_id,
            exam_id: spec.exam_id,
            answers: spec.answers,
            score: spec.score,
            passed: spec.passed,
            time_spent_seconds: spec.time_spent_seconds,
            submitted_at: Utc::now(),
        };

        let mut next = self.results.clone();
        next.push(result.clone());
        self.backend.put(KEY_RESULTS, &Self::encode(&next)?)?;
        self.results = next;
        info!(
            result = %result.id,
            exam = %result.exam_id,
            score = result.score,
            passed = result.passed,
            "recorded result"
        );
        Ok(result)
    }

    /// Look up a result by id.
    #[must_use]
    pub fn result(&self, result_id: &ResultId) -> Option<&ExamResult> {
        self.results.iter().find(|result| &result.id == result_id)
    }

    /// All results submitted by a user, in submission order.
    #[must_use]
    pub fn results_by_user(&self, user_id: &UserId) -> Vec<&ExamResult> {
        self.results
            .iter()
            .filter(|result| &result.user_id == user_id)
            .collect()
    }

    /// All results recorded for an exam, in submission order.
    #[must_use]
    pub fn results_by_exam(&self, exam_id: &ExamId) -> Vec<&ExamResult> {
        self.results
            .iter()
            .filter(|result| &result.exam_id == exam_id)
            .collect()
    }

    /// Check the single-attempt policy for a (user, exam) pair.
    #[must_use]
    pub fn has_result(&self, user_id: &UserId, exam_id: &ExamId) -> bool {
        self.results
            .iter()
            .any(|result| &result.user_id == user_id && &result.exam_id == exam_id)
    }

    // =========================================================================
    // USERS
    // =========================================================================

    /// Insert a registered user.
    ///
    /// Fails with `ExamError::Conflict` when the email is already taken.
    pub fn add_user(&mut self, user: User) -> Result<User, ExamError> {
        if self.user_by_email(&user.email).is_some() {
            return Err(ExamError::Conflict(format!(
                "email '{}' is already registered",
                user.email
            )));
        }

        let mut next = self.users.clone();
        next.push(user.clone());
        self.backend.put(KEY_USERS, &Self::encode(&next)?)?;
        self.users = next;
        info!(user = %user.id, role = ?user.role, "registered user");
        Ok(user)
    }

    /// Look up a user by id.
    #[must_use]
    pub fn user(&self, user_id: &UserId) -> Option<&User> {
        self.users.iter().find(|user| &user.id == user_id)
    }

    /// Look up a user by email, the unique key.
    #[must_use]
    pub fn user_by_email(&self, email: &str) -> Option<&User> {
        self.users.iter().find(|user| user.email == email)
    }

    /// All registered users.
    #[must_use]
    pub fn users(&self) -> &[User] {
        &self.users
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::QuestionKind;
    use crate::types::Role;

    fn draft_with_one_mcq(title: &str) -> ExamDraft {
        ExamDraft {
            title: title.into(),
            description: "desc".into(),
            questions: vec![QuestionDraft {
                id: None,
                text: "Pick A".into(),
                points: 10,
                kind: QuestionKind::MultipleChoice {
                    options: vec!["A".into(), "B".into()],
                    correct_answer: "A".into(),
                },
            }],
            ..ExamDraft::default()
        }
    }

    fn student(repo: &mut Repository, email: &str) -> User {
        repo.add_user(User {
            id: IdGenerator::user_id(),
            name: "Student".into(),
            email: email.into(),
            credential: "pw".into(),
            role: Role::Student,
        })
        .unwrap()
    }

    fn spec_for(user: &UserId, exam: &ExamId) -> ResultSpec {
        ResultSpec {
            user_id: user.clone(),
            exam_id: exam.clone(),
            answers: BTreeMap::new(),
            score: 50,
            passed: false,
            time_spent_seconds: 60,
        }
    }

    #[test]
    fn fresh_repository_carries_seed_exam() {
        let repo = Repository::in_memory().unwrap();
        assert_eq!(repo.exams().len(), 1);
        assert_eq!(repo.exam(&ExamId::new("1")).unwrap().title, "JavaScript Basics");
    }

    #[test]
    fn create_exam_assigns_id_and_question_ids() {
        let mut repo = Repository::in_memory().unwrap();
        let admin = UserId::new("admin-1");

        let exam = repo.create_exam(draft_with_one_mcq("Rust Basics"), &admin).unwrap();
        assert!(!exam.id.as_str().is_empty());
        assert!(!exam.questions[0].id.as_str().is_empty());
        assert_eq!(exam.created_by, admin);
        assert_eq!(repo.exams().len(), 2);
    }

    #[test]
    fn invalid_draft_leaves_collection_unchanged() {
        let mut repo = Repository::in_memory().unwrap();
        let before = repo.exams().to_vec();

        let mut draft = draft_with_one_mcq("ignored");
        draft.title = String::new();
        let err = repo.create_exam(draft, &UserId::new("admin-1")).unwrap_err();
        assert!(matches!(err, ExamError::Validation(_)));
        assert_eq!(repo.exams(), before.as_slice());
    }

    #[test]
    fn update_merges_and_preserves_creation_fields() {
        let mut repo = Repository::in_memory().unwrap();
        let admin = UserId::new("admin-1");
        let exam = repo.create_exam(draft_with_one_mcq("Before"), &admin).unwrap();

        let updated = repo
            .update_exam(
                &exam.id,
                ExamPatch {
                    title: Some("After".into()),
                    passing_score_percent: Some(90),
                    ..ExamPatch::default()
                },
            )
            .unwrap();

        assert_eq!(updated.title, "After");
        assert_eq!(updated.passing_score_percent, 90);
        assert_eq!(updated.id, exam.id);
        assert_eq!(updated.created_by, exam.created_by);
        assert_eq!(updated.created_at, exam.created_at);
        assert_eq!(updated.description, "desc");
    }

    #[test]
    fn update_validates_merged_exam() {
        let mut repo = Repository::in_memory().unwrap();
        let exam = repo
            .create_exam(draft_with_one_mcq("Valid"), &UserId::new("admin-1"))
            .unwrap();

        let err = repo
            .update_exam(
                &exam.id,
                ExamPatch {
                    duration_minutes: Some(500),
                    ..ExamPatch::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, ExamError::Validation(_)));
        assert_eq!(repo.exam(&exam.id).unwrap().duration_minutes, 30);
    }

    #[test]
    fn empty_patch_is_a_no_op() {
        let mut repo = Repository::in_memory().unwrap();
        let exam = repo
            .create_exam(draft_with_one_mcq("Stable"), &UserId::new("admin-1"))
            .unwrap();

        let updated = repo.update_exam(&exam.id, ExamPatch::default()).unwrap();
        assert_eq!(updated, exam);
    }

    #[test]
    fn update_missing_exam_is_not_found() {
        let mut repo = Repository::in_memory().unwrap();
        let err = repo
            .update_exam(&ExamId::new("ghost"), ExamPatch::default())
            .unwrap_err();
        assert!(matches!(err, ExamError::NotFound(_)));
    }

    #[test]
    fn delete_is_idempotent() {
        let mut repo = Repository::in_memory().unwrap();
        let exam_id = ExamId::new("1");

        repo.delete_exam(&exam_id).unwrap();
        assert!(repo.exam(&exam_id).is_none());

        // Second delete of the same id, and a delete of a never-existing id,
        // are both no-ops.
        repo.delete_exam(&exam_id).unwrap();
        repo.delete_exam(&ExamId::new("ghost")).unwrap();
        assert!(repo.exams().is_empty());
    }

    #[test]
    fn delete_cascades_to_results_only_for_that_exam() {
        let mut repo = Repository::in_memory().unwrap();
        let admin = UserId::new("admin-1");
        let keep = repo.create_exam(draft_with_one_mcq("Keep"), &admin).unwrap();
        let doomed = repo.create_exam(draft_with_one_mcq("Drop"), &admin).unwrap();
        let user = student(&mut repo, "s@example.com");

        repo.submit_result(spec_for(&user.id, &keep.id)).unwrap();
        repo.submit_result(spec_for(&user.id, &doomed.id)).unwrap();
        assert_eq!(repo.results_by_user(&user.id).len(), 2);

        repo.delete_exam(&doomed.id).unwrap();
        assert!(repo.results_by_exam(&doomed.id).is_empty());
        assert_eq!(repo.results_by_exam(&keep.id).len(), 1);
        assert_eq!(repo.results_by_user(&user.id).len(), 1);
    }

    #[test]
    fn second_submission_conflicts_and_keeps_original() {
        let mut repo = Repository::in_memory().unwrap();
        let exam_id = ExamId::new("1");
        let user = student(&mut repo, "s@example.com");

        let first = repo.submit_result(spec_for(&user.id, &exam_id)).unwrap();
        let mut second = spec_for(&user.id, &exam_id);
        second.score = 100;
        second.passed = true;

        let err = repo.submit_result(second).unwrap_err();
        assert!(matches!(err, ExamError::Conflict(_)));

        let stored = repo.results_by_user(&user.id);
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].id, first.id);
        assert_eq!(stored[0].score, 50);
    }

    #[test]
    fn submission_requires_existing_exam_and_user() {
        let mut repo = Repository::in_memory().unwrap();
        let user = student(&mut repo, "s@example.com");

        let err = repo
            .submit_result(spec_for(&user.id, &ExamId::new("ghost")))
            .unwrap_err();
        assert!(matches!(err, ExamError::NotFound(_)));

        let err = repo
            .submit_result(spec_for(&UserId::new("ghost"), &ExamId::new("1")))
            .unwrap_err();
        assert!(matches!(err, ExamError::NotFound(_)));
    }

    #[test]
    fn duplicate_email_conflicts() {
        let mut repo = Repository::in_memory().unwrap();
        student(&mut repo, "a@x.com");

        let err = repo
            .add_user(User {
                id: IdGenerator::user_id(),
                name: "Bob".into(),
                email: "a@x.com".into(),
                credential: "pw2".into(),
                role: Role::Student,
            })
            .unwrap_err();
        assert!(matches!(err, ExamError::Conflict(_)));
        assert_eq!(
            repo.users().iter().filter(|u| u.email == "a@x.com").count(),
            1
        );
    }
}
