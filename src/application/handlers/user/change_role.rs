//! ChangeRoleHandler - Promotes or demotes a user.
//!
//! Loads the user, its role record and the courses tied to it, builds a
//! [`RoleTransitionPlan`] and hands it to the [`RoleTransitionStore`] as one
//! atomic unit.

use std::sync::Arc;
use tracing::{error, info};

use crate::domain::foundation::{AuthenticatedUser, CourseId, DomainError, ErrorCode, Role, UserId};
use crate::domain::user::{RoleTransitionPlan, User, UserError};
use crate::ports::{CourseRepository, RoleRecordRepository, RoleTransitionStore, UserRepository};

#[derive(Debug, Clone)]
pub struct ChangeRoleCommand {
    pub user_id: UserId,
    pub role: Role,
}

pub struct ChangeRoleHandler {
    users: Arc<dyn UserRepository>,
    records: Arc<dyn RoleRecordRepository>,
    courses: Arc<dyn CourseRepository>,
    store: Arc<dyn RoleTransitionStore>,
}

impl ChangeRoleHandler {
    pub fn new(
        users: Arc<dyn UserRepository>,
        records: Arc<dyn RoleRecordRepository>,
        courses: Arc<dyn CourseRepository>,
        store: Arc<dyn RoleTransitionStore>,
    ) -> Self {
        Self {
            users,
            records,
            courses,
            store,
        }
    }

    pub async fn handle(&self, actor: &AuthenticatedUser, cmd: ChangeRoleCommand) -> Result<User, UserError> {
        if !actor.role.can_manage_users() {
            return Err(UserError::Forbidden);
        }

        let user = self
            .users
            .find_by_id(&cmd.user_id)
            .await?
            .ok_or(UserError::NotFound(cmd.user_id))?;
        if !actor.can_manage_institute(user.institute_id()) {
            return Err(UserError::Forbidden);
        }

        let record = self.records.find_by_user(user.id()).await?;
        let linked = linked_courses(self.courses.as_ref(), &user).await?;
        let plan = RoleTransitionPlan::role_change(&user, record.as_ref(), cmd.role, &linked)?;

        self.store
            .apply(&plan)
            .await
            .map_err(|e| apply_error(&user, e))?;

        info!(
            user_id = %user.id(),
            from = %user.role(),
            to = %cmd.role,
            courses_deleted = plan.delete_courses.len(),
            courses_unenrolled = plan.unenroll_from.len(),
            changed_by = %actor.id,
            "Role changed"
        );

        plan.updated_user()
            .cloned()
            .ok_or_else(|| UserError::infrastructure("role change plan without user update"))
    }
}

/// Courses the course collection ties to `user`: enrollments for a
/// student, ownership for a teacher.
pub(super) async fn linked_courses(
    courses: &dyn CourseRepository,
    user: &User,
) -> Result<Vec<CourseId>, DomainError> {
    match user.role() {
        Role::Student => courses.find_ids_by_member(user.id()).await,
        Role::Teacher => courses.find_ids_by_teacher(user.id()).await,
        Role::Director | Role::Admin => Ok(Vec::new()),
    }
}

pub(super) fn apply_error(user: &User, err: DomainError) -> UserError {
    match err.code {
        ErrorCode::RoleRecordNotFound => UserError::RoleRecordNotFound {
            user_id: *user.id(),
            role: user.role(),
        },
        ErrorCode::ConcurrentModification => UserError::ConcurrentModification(*user.id()),
        _ => {
            error!(user_id = %user.id(), error = %err, "Role transition failed to apply");
            UserError::from(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::application::handlers::test_support::{actor, enroll, seed_course, seed_user};
    use crate::domain::foundation::{InstituteId, StateMachine};

    fn handler(store: &InMemoryStore) -> ChangeRoleHandler {
        let shared = Arc::new(store.clone());
        ChangeRoleHandler::new(shared.clone(), shared.clone(), shared.clone(), shared)
    }

    fn cmd(user: &User, role: Role) -> ChangeRoleCommand {
        ChangeRoleCommand {
            user_id: *user.id(),
            role,
        }
    }

    #[tokio::test]
    async fn student_to_teacher_leaves_every_course() {
        let store = InMemoryStore::new();
        let institute = InstituteId::new();
        let director = actor(&seed_user(&store, "Dora", Role::Director, institute).await);
        let teacher = seed_user(&store, "Tom", Role::Teacher, institute).await;
        let student = seed_user(&store, "Sam", Role::Student, institute).await;
        let math = seed_course(&store, &teacher, "Math").await;
        let art = seed_course(&store, &teacher, "Art").await;
        enroll(&store, &math, &student).await;
        enroll(&store, &art, &student).await;

        let updated = handler(&store)
            .handle(&director, cmd(&student, Role::Teacher))
            .await
            .unwrap();

        assert_eq!(updated.role(), Role::Teacher);
        let record = store.find_by_user(student.id()).await.unwrap().unwrap();
        assert_eq!(record.role(), Role::Teacher);
        assert!(record.courses().is_empty());
        assert_eq!(record.institute_id(), &institute);
        assert!(store.find_ids_by_member(student.id()).await.unwrap().is_empty());
        for course in [&math, &art] {
            let course = CourseRepository::find_by_id(&store, course.id()).await.unwrap().unwrap();
            assert!(course.members().is_empty());
        }
    }

    #[tokio::test]
    async fn leaving_student_role_discards_kolb_result_and_survey_answers() {
        use crate::domain::kolb::{AnswerMatrix, KolbSubmission, LearningProfile};
        use crate::domain::survey::SurveyResponse;
        use crate::ports::{KolbRepository, SurveyRepository};

        let store = InMemoryStore::new();
        let institute = InstituteId::new();
        let director = actor(&seed_user(&store, "Dora", Role::Director, institute).await);
        let teacher = seed_user(&store, "Tom", Role::Teacher, institute).await;
        let student = seed_user(&store, "Sam", Role::Student, institute).await;
        let course = seed_course(&store, &teacher, "Math").await;
        enroll(&store, &course, &student).await;

        let answers = AnswerMatrix::new(vec![vec![1, 4, 3, 2]; 12]).unwrap();
        KolbRepository::upsert(&store, &KolbSubmission::new(*student.id(), answers, LearningProfile::Assimilator))
            .await
            .unwrap();
        let answer = SurveyResponse::new(*course.id(), *student.id(), 5, None).unwrap();
        SurveyRepository::upsert(&store, &answer).await.unwrap();

        let handler = handler(&store);
        handler.handle(&director, cmd(&student, Role::Teacher)).await.unwrap();
        assert!(store.find_by_student(student.id()).await.unwrap().is_none());
        assert!(store.find_by_course(course.id()).await.unwrap().is_empty());

        let promoted = UserRepository::find_by_id(&store, student.id()).await.unwrap().unwrap();
        handler.handle(&director, cmd(&promoted, Role::Student)).await.unwrap();
        let record = store.find_by_user(student.id()).await.unwrap().unwrap();
        assert_eq!(record.learning_profile(), None);
        assert!(store.find_by_student(student.id()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn teacher_demotion_deletes_owned_courses_and_student_links() {
        for target in [Role::Student, Role::Director] {
            let store = InMemoryStore::new();
            let institute = InstituteId::new();
            let director = actor(&seed_user(&store, "Dora", Role::Director, institute).await);
            let teacher = seed_user(&store, "Tom", Role::Teacher, institute).await;
            let student = seed_user(&store, "Sam", Role::Student, institute).await;
            let course = seed_course(&store, &teacher, "Math").await;
            enroll(&store, &course, &student).await;

            let updated = handler(&store)
                .handle(&director, cmd(&teacher, target))
                .await
                .unwrap();

            assert_eq!(updated.role(), target);
            assert_eq!(store.course_count().await, 0);
            let student_record = store.find_by_user(student.id()).await.unwrap().unwrap();
            assert!(student_record.courses().is_empty());
            let teacher_record = store.find_by_user(teacher.id()).await.unwrap().unwrap();
            assert_eq!(teacher_record.role(), target);
            assert!(teacher_record.courses().is_empty());
        }
    }

    #[tokio::test]
    async fn disallowed_transitions_change_nothing() {
        let store = InMemoryStore::new();
        let institute = InstituteId::new();
        let admin = actor(&seed_user(&store, "Root", Role::Admin, InstituteId::new()).await);
        let handler = handler(&store);

        for from in [Role::Student, Role::Teacher, Role::Director] {
            let user = seed_user(&store, &format!("{}x", from.as_str()), from, institute).await;
            for to in Role::ALL {
                if from.can_transition_to(&to) {
                    continue;
                }
                let result = handler.handle(&admin, cmd(&user, to)).await;
                assert_eq!(result.unwrap_err(), UserError::InvalidTransition { from, to });
                let current = UserRepository::find_by_id(&store, user.id()).await.unwrap().unwrap();
                assert_eq!(current.role(), from);
                let record = store.find_by_user(user.id()).await.unwrap().unwrap();
                assert_eq!(record.role(), from);
            }
        }
    }

    #[tokio::test]
    async fn failed_apply_leaves_old_state() {
        let store = InMemoryStore::new();
        let institute = InstituteId::new();
        let director = actor(&seed_user(&store, "Dora", Role::Director, institute).await);
        let teacher = seed_user(&store, "Tom", Role::Teacher, institute).await;
        let student = seed_user(&store, "Sam", Role::Student, institute).await;
        let course = seed_course(&store, &teacher, "Math").await;
        enroll(&store, &course, &student).await;

        store.fail_next_apply();
        let result = handler(&store).handle(&director, cmd(&teacher, Role::Student)).await;

        assert!(matches!(result, Err(UserError::Infrastructure(_))));
        let current = UserRepository::find_by_id(&store, teacher.id()).await.unwrap().unwrap();
        assert_eq!(current.role(), Role::Teacher);
        assert_eq!(store.course_count().await, 1);
        let record = store.find_by_user(student.id()).await.unwrap().unwrap();
        assert_eq!(record.courses().len(), 1);
    }

    #[tokio::test]
    async fn missing_role_record_is_surfaced() {
        let store = InMemoryStore::new();
        let institute = InstituteId::new();
        let director = actor(&seed_user(&store, "Dora", Role::Director, institute).await);
        let orphan = User::new(institute, "o@school.test", "Or", "Phan", "h".into(), Role::Student).unwrap();
        UserRepository::create(&store, &orphan, None).await.unwrap();

        let result = handler(&store).handle(&director, cmd(&orphan, Role::Teacher)).await;
        assert_eq!(
            result.unwrap_err(),
            UserError::RoleRecordNotFound {
                user_id: *orphan.id(),
                role: Role::Student
            }
        );
    }

    #[tokio::test]
    async fn director_of_another_institute_is_forbidden() {
        let store = InMemoryStore::new();
        let director = actor(&seed_user(&store, "Dora", Role::Director, InstituteId::new()).await);
        let student = seed_user(&store, "Sam", Role::Student, InstituteId::new()).await;

        let result = handler(&store).handle(&director, cmd(&student, Role::Teacher)).await;
        assert_eq!(result.unwrap_err(), UserError::Forbidden);
    }

    #[tokio::test]
    async fn teacher_cannot_change_roles() {
        let store = InMemoryStore::new();
        let institute = InstituteId::new();
        let teacher = actor(&seed_user(&store, "Tom", Role::Teacher, institute).await);
        let student = seed_user(&store, "Sam", Role::Student, institute).await;

        let result = handler(&store).handle(&teacher, cmd(&student, Role::Teacher)).await;
        assert_eq!(result.unwrap_err(), UserError::Forbidden);
    }

    #[tokio::test]
    async fn unknown_user_is_not_found() {
        let store = InMemoryStore::new();
        let admin = actor(&seed_user(&store, "Root", Role::Admin, InstituteId::new()).await);
        let missing = UserId::new();

        let result = handler(&store)
            .handle(&admin, ChangeRoleCommand { user_id: missing, role: Role::Teacher })
            .await;
        assert_eq!(result.unwrap_err(), UserError::NotFound(missing));
    }

    /// Two racing transitions for one user: the first to apply wins and the
    /// other fails without partial writes. Which one wins is not guaranteed.
    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn concurrent_transitions_are_best_effort() {
        let store = InMemoryStore::new();
        let institute = InstituteId::new();
        let director = actor(&seed_user(&store, "Dora", Role::Director, institute).await);
        let teacher = seed_user(&store, "Tom", Role::Teacher, institute).await;
        seed_course(&store, &teacher, "Math").await;
        let handler = Arc::new(handler(&store));

        let a = {
            let (handler, director, cmd) = (handler.clone(), director.clone(), cmd(&teacher, Role::Student));
            tokio::spawn(async move { handler.handle(&director, cmd).await })
        };
        let b = {
            let (handler, director, cmd) = (handler.clone(), director.clone(), cmd(&teacher, Role::Director));
            tokio::spawn(async move { handler.handle(&director, cmd).await })
        };
        let results = [a.await.unwrap(), b.await.unwrap()];

        let winners: Vec<&User> = results.iter().filter_map(|r| r.as_ref().ok()).collect();
        assert_eq!(winners.len(), 1);
        for loser in results.iter().filter_map(|r| r.as_ref().err()) {
            assert!(matches!(
                loser,
                UserError::ConcurrentModification(_) | UserError::InvalidTransition { .. }
            ));
        }

        let current = UserRepository::find_by_id(&store, teacher.id()).await.unwrap().unwrap();
        let record = store.find_by_user(teacher.id()).await.unwrap().unwrap();
        assert_eq!(record.role(), current.role());
        assert_eq!(store.course_count().await, 0);
    }
}
