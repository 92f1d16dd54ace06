//! # Session/Identity Gate
//!
//! Registration, authentication, and the authorization rules guarding
//! lifecycle and repository operations.
//!
//! Credentials are opaque secrets compared in constant time; hashing is an
//! explicit non-goal and belongs to the embedding application.

use crate::identity::IdGenerator;
use crate::repository::Repository;
use crate::{Exam, ExamError, ExamResult, Role, User};
use subtle::ConstantTimeEq;
use tracing::{debug, warn};

/// The Session Gate resolves the acting user and enforces role/ownership.
pub struct SessionGate;

impl SessionGate {
    // =========================================================================
    // IDENTITY
    // =========================================================================

    /// Register a new user.
    ///
    /// Fails with `ExamError::Validation` when name, email, or credential is
    /// empty and `ExamError::Conflict` when the email is already registered.
    pub fn register(
        repo: &mut Repository,
        name: &str,
        email: &str,
        credential: &str,
        role: Role,
    ) -> Result<User, ExamError> {
        if name.trim().is_empty() {
            return Err(ExamError::Validation("name must not be empty".into()));
        }
        if email.trim().is_empty() {
            return Err(ExamError::Validation("email must not be empty".into()));
        }
        if credential.is_empty() {
            return Err(ExamError::Validation("credential must not be empty".into()));
        }

        repo.add_user(User {
            id: IdGenerator::user_id(),
            name: name.trim().to_owned(),
            email: email.trim().to_owned(),
            credential: credential.to_owned(),
            role,
        })
    }

    /// Register a new user with the default student role.
    pub fn register_student(
        repo: &mut Repository,
        name: &str,
        email: &str,
        credential: &str,
    ) -> Result<User, ExamError> {
        Self::register(repo, name, email, credential, Role::Student)
    }

    /// Authenticate by email and credential.
    ///
    /// The credential comparison is constant-time. A missing email and a
    /// wrong credential surface the same `ExamError::Auth` so the gate leaks
    /// nothing about which part failed.
    pub fn authenticate(
        repo: &Repository,
        email: &str,
        credential: &str,
    ) -> Result<User, ExamError> {
        let invalid = || ExamError::Auth("invalid credentials".into());

        let user = repo.user_by_email(email).ok_or_else(|| {
            warn!(email, "authentication failed: unknown email");
            invalid()
        })?;

        let matches: bool = user
            .credential
            .as_bytes()
            .ct_eq(credential.as_bytes())
            .into();
        if !matches {
            warn!(user = %user.id, "authentication failed: bad credential");
            return Err(invalid());
        }
        debug!(user = %user.id, "authenticated");
        Ok(user.clone())
    }

    /// Role of the acting user.
    #[must_use]
    pub fn current_role(user: &User) -> Role {
        user.role
    }

    // =========================================================================
    // AUTHORIZATION
    // =========================================================================

    /// Authorize exam creation: admin role required.
    pub fn authorize_exam_create(user: &User) -> Result<(), ExamError> {
        if user.role.is_admin() {
            Ok(())
        } else {
            Err(ExamError::Auth(format!(
                "user '{}' is not an admin",
                user.id
            )))
        }
    }

    /// Authorize exam update/deletion: admin role and creator ownership.
    pub fn authorize_exam_write(user: &User, exam: &Exam) -> Result<(), ExamError> {
        Self::authorize_exam_create(user)?;
        if exam.created_by != user.id {
            return Err(ExamError::Auth(format!(
                "exam '{}' was not created by user '{}'",
                exam.id, user.id
            )));
        }
        Ok(())
    }

    /// Authorize viewing a result: owner only.
    pub fn authorize_result_view(user: &User, result: &ExamResult) -> Result<(), ExamError> {
        if result.user_id == user.id {
            Ok(())
        } else {
            Err(ExamError::Auth(format!(
                "result '{}' does not belong to user '{}'",
                result.id, user.id
            )))
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::draft::{ExamDraft, QuestionDraft};
    use crate::{QuestionKind, ResultId, UserId};
    use chrono::Utc;
    use std::collections::BTreeMap;

    fn exam_by(creator: &UserId) -> Exam {
        Exam {
            id: crate::ExamId::new("e1"),
            title: "T".into(),
            description: String::new(),
            duration_minutes: 30,
            passing_score_percent: 70,
            created_by: creator.clone(),
            created_at: Utc::now(),
            questions: Vec::new(),
        }
    }

    #[test]
    fn register_then_authenticate_round_trips() {
        let mut repo = Repository::in_memory().unwrap();
        let alice =
            SessionGate::register_student(&mut repo, "Alice", "a@x.com", "pw").unwrap();
        assert_eq!(alice.role, Role::Student);
        assert_eq!(SessionGate::current_role(&alice), Role::Student);

        let back = SessionGate::authenticate(&repo, "a@x.com", "pw").unwrap();
        assert_eq!(back.id, alice.id);
    }

    #[test]
    fn duplicate_email_registration_conflicts() {
        let mut repo = Repository::in_memory().unwrap();
        SessionGate::register_student(&mut repo, "Alice", "a@x.com", "pw").unwrap();

        let err = SessionGate::register_student(&mut repo, "Bob", "a@x.com", "pw2").unwrap_err();
        assert!(matches!(err, ExamError::Conflict(_)));
        assert_eq!(
            repo.users().iter().filter(|u| u.email == "a@x.com").count(),
            1
        );
    }

    #[test]
    fn empty_fields_rejected_at_registration() {
        let mut repo = Repository::in_memory().unwrap();
        for (name, email, credential) in
            [("", "a@x.com", "pw"), ("Alice", " ", "pw"), ("Alice", "a@x.com", "")]
        {
            let err =
                SessionGate::register_student(&mut repo, name, email, credential).unwrap_err();
            assert!(matches!(err, ExamError::Validation(_)));
        }
        assert!(repo.users().is_empty());
    }

    #[test]
    fn bad_credentials_fail_uniformly() {
        let mut repo = Repository::in_memory().unwrap();
        SessionGate::register_student(&mut repo, "Alice", "a@x.com", "pw").unwrap();

        let wrong_pw = SessionGate::authenticate(&repo, "a@x.com", "nope").unwrap_err();
        let wrong_email = SessionGate::authenticate(&repo, "b@x.com", "pw").unwrap_err();
        assert_eq!(wrong_pw.to_string(), wrong_email.to_string());
    }

    #[test]
    fn students_cannot_author_exams() {
        let mut repo = Repository::in_memory().unwrap();
        let student =
            SessionGate::register_student(&mut repo, "Alice", "a@x.com", "pw").unwrap();
        assert!(matches!(
            SessionGate::authorize_exam_create(&student),
            Err(ExamError::Auth(_))
        ));
    }

    #[test]
    fn only_the_creator_may_modify_an_exam() {
        let mut repo = Repository::in_memory().unwrap();
        let owner =
            SessionGate::register(&mut repo, "Own", "o@x.com", "pw", Role::Admin).unwrap();
        let other =
            SessionGate::register(&mut repo, "Other", "t@x.com", "pw", Role::Admin).unwrap();
        let exam = exam_by(&owner.id);

        assert!(SessionGate::authorize_exam_write(&owner, &exam).is_ok());
        assert!(matches!(
            SessionGate::authorize_exam_write(&other, &exam),
            Err(ExamError::Auth(_))
        ));
    }

    #[test]
    fn results_are_visible_to_their_owner_only() {
        let mut repo = Repository::in_memory().unwrap();
        let alice = SessionGate::register_student(&mut repo, "Alice", "a@x.com", "pw").unwrap();
        let bob = SessionGate::register_student(&mut repo, "Bob", "b@x.com", "pw").unwrap();

        let result = ExamResult {
            id: ResultId::new("r1"),
            user_id: alice.id.clone(),
            exam_id: crate::ExamId::new("1"),
            answers: BTreeMap::new(),
            score: 50,
            passed: false,
            time_spent_seconds: 0,
            submitted_at: Utc::now(),
        };

        assert!(SessionGate::authorize_result_view(&alice, &result).is_ok());
        assert!(matches!(
            SessionGate::authorize_result_view(&bob, &result),
            Err(ExamError::Auth(_))
        ));
    }

    #[test]
    fn admin_can_author_through_the_gate_and_repository() {
        let mut repo = Repository::in_memory().unwrap();
        let admin =
            SessionGate::register(&mut repo, "Admin", "ad@x.com", "pw", Role::Admin).unwrap();
        SessionGate::authorize_exam_create(&admin).unwrap();

        let exam = repo
            .create_exam(
                ExamDraft {
                    title: "Authored".into(),
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
                },
                &admin.id,
            )
            .unwrap();
        assert!(SessionGate::authorize_exam_write(&admin, &exam).is_ok());
    }
}
