//! In-memory store implementing every persistence port.
//!
//! All collections live behind one lock, so each port call is atomic.
//! Multi-step writes run against a staged copy that replaces the live state
//! only when every step succeeded.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::course::{Content, Course, Section};
use crate::domain::foundation::{
    CourseId, DomainError, ErrorCode, InstituteId, Role, SectionId, Timestamp, UserId,
};
use crate::domain::kolb::KolbSubmission;
use crate::domain::survey::SurveyResponse;
use crate::domain::user::{
    insert_course_link, remove_course_link, MemberLink, RoleRecord, RoleTransitionPlan, User,
    UserWrite,
};
use crate::ports::{
    CourseRepository, KolbRepository, RoleRecordRepository, RoleTransitionStore, SurveyRepository,
    UserRepository,
};

#[derive(Debug, Clone, Default)]
struct State {
    users: HashMap<UserId, User>,
    records: HashMap<UserId, RoleRecord>,
    courses: HashMap<CourseId, Course>,
    kolb: HashMap<UserId, KolbSubmission>,
    surveys: HashMap<(CourseId, UserId), SurveyResponse>,
}

/// Shared in-memory storage; clones share the same data.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: Arc<RwLock<State>>,
    fail_next_apply: Arc<AtomicBool>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next `apply` fail after performing its writes on the
    /// staged copy, as a database error mid-transaction would.
    pub fn fail_next_apply(&self) {
        self.fail_next_apply.store(true, Ordering::SeqCst);
    }

    pub async fn user_count(&self) -> usize {
        self.state.read().await.users.len()
    }

    pub async fn course_count(&self) -> usize {
        self.state.read().await.courses.len()
    }
}

fn course_not_found(id: &CourseId) -> DomainError {
    DomainError::new(ErrorCode::CourseNotFound, format!("Course not found: {}", id))
        .with_detail("course_id", id.to_string())
}

fn record_not_found(user_id: &UserId) -> DomainError {
    DomainError::new(
        ErrorCode::RoleRecordNotFound,
        format!("Role record missing for user {}", user_id),
    )
    .with_detail("user_id", user_id.to_string())
}

impl State {
    /// Removes a course and every link pointing at it.
    fn delete_course(&mut self, id: &CourseId) -> bool {
        let Some(course) = self.courses.remove(id) else {
            return false;
        };
        let linked = course
            .members()
            .iter()
            .map(|m| m.id)
            .chain(std::iter::once(*course.teacher_id()));
        for user_id in linked {
            if let Some(links) = self.records.get_mut(&user_id).and_then(RoleRecord::courses_mut) {
                remove_course_link(links, id);
            }
        }
        self.surveys.retain(|(course_id, _), _| course_id != id);
        true
    }

    fn unenroll(&mut self, course_id: &CourseId, user_id: &UserId) -> bool {
        let removed = self
            .courses
            .get_mut(course_id)
            .map_or(false, |course| course.remove_member(user_id));
        if let Some(links) = self.records.get_mut(user_id).and_then(RoleRecord::courses_mut) {
            remove_course_link(links, course_id);
        }
        removed
    }

    fn apply(&mut self, plan: &RoleTransitionPlan) -> Result<(), DomainError> {
        let user_id = *plan.user_id();
        let concurrent = || {
            DomainError::new(
                ErrorCode::ConcurrentModification,
                format!("User {} changed before the transition was applied", user_id),
            )
            .with_detail("user_id", user_id.to_string())
        };

        let expected_role = match &plan.user_write {
            UserWrite::UpdateRole { expected_role, .. } | UserWrite::Delete { expected_role, .. } => {
                *expected_role
            }
        };
        match self.users.get(&user_id) {
            Some(current) if current.role() == expected_role => {}
            _ => return Err(concurrent()),
        }

        if let Some(role) = plan.drop_record {
            match self.records.get(&user_id) {
                Some(record) if record.role() == role => {}
                _ => return Err(record_not_found(&user_id)),
            }
        }

        // Links made after planning are cascaded too.
        let mut linked: Vec<CourseId> = self
            .courses
            .values()
            .filter(|c| c.is_member(&user_id) || c.is_owner(&user_id))
            .map(|c| *c.id())
            .chain(plan.unenroll_from.iter().copied())
            .chain(plan.delete_courses.iter().copied())
            .collect();
        linked.sort();
        linked.dedup();

        match plan.drop_record {
            Some(Role::Student) => {
                for course_id in &linked {
                    self.unenroll(course_id, &user_id);
                }
            }
            Some(Role::Teacher) => {
                for course_id in &linked {
                    self.delete_course(course_id);
                }
            }
            _ => {}
        }

        if plan.drop_record.is_some() {
            self.records.remove(&user_id);
        }
        if plan.drops_student_data() {
            self.kolb.remove(&user_id);
            self.surveys.retain(|(_, student), _| student != &user_id);
        }
        if let Some(record) = &plan.create_record {
            self.records.insert(user_id, record.clone());
        }

        match &plan.user_write {
            UserWrite::UpdateRole { user, .. } => {
                self.users.insert(user_id, user.clone());
            }
            UserWrite::Delete { .. } => {
                self.users.remove(&user_id);
            }
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create(&self, user: &User, record: Option<&RoleRecord>) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        if state.users.values().any(|u| u.email() == user.email()) {
            return Err(DomainError::new(
                ErrorCode::Conflict,
                format!("Email already registered: {}", user.email()),
            )
            .with_detail("email", user.email()));
        }
        state.users.insert(*user.id(), user.clone());
        if let Some(record) = record {
            state.records.insert(*user.id(), record.clone());
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        Ok(self.state.read().await.users.get(id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let state = self.state.read().await;
        Ok(state.users.values().find(|u| u.email() == email).cloned())
    }

    async fn list(
        &self,
        institute: Option<&InstituteId>,
        role: Option<Role>,
    ) -> Result<Vec<User>, DomainError> {
        let state = self.state.read().await;
        let mut users: Vec<User> = state
            .users
            .values()
            .filter(|u| institute.map_or(true, |i| u.institute_id() == i))
            .filter(|u| role.map_or(true, |r| u.role() == r))
            .cloned()
            .collect();
        users.sort_by(|a, b| {
            (a.last_name(), a.first_name()).cmp(&(b.last_name(), b.first_name()))
        });
        Ok(users)
    }
}

#[async_trait]
impl RoleRecordRepository for InMemoryStore {
    async fn find_by_user(&self, user_id: &UserId) -> Result<Option<RoleRecord>, DomainError> {
        Ok(self.state.read().await.records.get(user_id).cloned())
    }
}

#[async_trait]
impl CourseRepository for InMemoryStore {
    async fn create(&self, course: &Course) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        let teacher = course.teacher_id();
        match state.records.get_mut(teacher) {
            Some(RoleRecord::Teacher(record)) => {
                insert_course_link(&mut record.courses, course.link());
            }
            _ => return Err(record_not_found(teacher)),
        }
        state.courses.insert(*course.id(), course.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &CourseId) -> Result<Option<Course>, DomainError> {
        Ok(self.state.read().await.courses.get(id).cloned())
    }

    async fn list_by_institute(&self, institute: &InstituteId) -> Result<Vec<Course>, DomainError> {
        let state = self.state.read().await;
        let mut courses: Vec<Course> = state
            .courses
            .values()
            .filter(|c| c.institute_id() == institute)
            .cloned()
            .collect();
        courses.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(courses)
    }

    async fn find_ids_by_teacher(&self, teacher: &UserId) -> Result<Vec<CourseId>, DomainError> {
        let state = self.state.read().await;
        Ok(state
            .courses
            .values()
            .filter(|c| c.is_owner(teacher))
            .map(|c| *c.id())
            .collect())
    }

    async fn find_ids_by_member(&self, member: &UserId) -> Result<Vec<CourseId>, DomainError> {
        let state = self.state.read().await;
        Ok(state
            .courses
            .values()
            .filter(|c| c.is_member(member))
            .map(|c| *c.id())
            .collect())
    }

    async fn add_member(&self, course_id: &CourseId, member: &MemberLink) -> Result<bool, DomainError> {
        let mut state = self.state.write().await;
        let State { courses, records, .. } = &mut *state;

        let course = courses.get_mut(course_id).ok_or_else(|| course_not_found(course_id))?;
        let record = match records.get_mut(&member.id) {
            Some(RoleRecord::Student(record)) => record,
            _ => return Err(record_not_found(&member.id)),
        };
        if !course.add_member(member.clone()) {
            return Ok(false);
        }
        insert_course_link(&mut record.courses, course.link());
        Ok(true)
    }

    async fn remove_member(&self, course_id: &CourseId, member: &UserId) -> Result<bool, DomainError> {
        let mut state = self.state.write().await;
        if !state.courses.contains_key(course_id) {
            return Err(course_not_found(course_id));
        }
        Ok(state.unenroll(course_id, member))
    }

    async fn add_section(&self, course_id: &CourseId, section: &Section) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        let course = state
            .courses
            .get_mut(course_id)
            .ok_or_else(|| course_not_found(course_id))?;
        course.add_section(section.clone());
        Ok(())
    }

    async fn add_content(
        &self,
        course_id: &CourseId,
        section_id: &SectionId,
        content: &Content,
    ) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        let course = state
            .courses
            .get_mut(course_id)
            .ok_or_else(|| course_not_found(course_id))?;
        course.add_content(section_id, content.clone()).map_err(|_| {
            DomainError::new(
                ErrorCode::SectionNotFound,
                format!("Section not found: {}", section_id),
            )
            .with_detail("section_id", section_id.to_string())
        })
    }

    async fn delete_cascade(&self, course_id: &CourseId) -> Result<bool, DomainError> {
        Ok(self.state.write().await.delete_course(course_id))
    }

    async fn publish_due_contents(&self, now: Timestamp) -> Result<u64, DomainError> {
        let mut state = self.state.write().await;
        let published: usize = state
            .courses
            .values_mut()
            .map(|course| course.publish_due(&now))
            .sum();
        Ok(published as u64)
    }
}

#[async_trait]
impl KolbRepository for InMemoryStore {
    async fn upsert(&self, submission: &KolbSubmission) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        match state.records.get_mut(&submission.student_id) {
            Some(RoleRecord::Student(record)) => {
                record.learning_profile = Some(submission.profile);
            }
            _ => return Err(record_not_found(&submission.student_id)),
        }
        state.kolb.insert(submission.student_id, submission.clone());
        Ok(())
    }

    async fn find_by_student(&self, student: &UserId) -> Result<Option<KolbSubmission>, DomainError> {
        Ok(self.state.read().await.kolb.get(student).cloned())
    }
}

#[async_trait]
impl SurveyRepository for InMemoryStore {
    async fn upsert(&self, response: &SurveyResponse) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        if !state.courses.contains_key(&response.course_id) {
            return Err(course_not_found(&response.course_id));
        }
        state
            .surveys
            .insert((response.course_id, response.student_id), response.clone());
        Ok(())
    }

    async fn find_by_course(&self, course_id: &CourseId) -> Result<Vec<SurveyResponse>, DomainError> {
        let state = self.state.read().await;
        let mut responses: Vec<SurveyResponse> = state
            .surveys
            .values()
            .filter(|r| &r.course_id == course_id)
            .cloned()
            .collect();
        responses.sort_by_key(|r| r.submitted_at);
        Ok(responses)
    }
}

#[async_trait]
impl RoleTransitionStore for InMemoryStore {
    async fn apply(&self, plan: &RoleTransitionPlan) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        let mut staged = state.clone();
        staged.apply(plan)?;
        if self.fail_next_apply.swap(false, Ordering::SeqCst) {
            return Err(DomainError::database("injected failure before commit"));
        }
        *state = staged;
        Ok(())
    }
}
