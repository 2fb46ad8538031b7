//! Fixtures shared by handler tests.

use crate::adapters::memory::InMemoryStore;
use crate::domain::course::Course;
use crate::domain::foundation::{AuthError, AuthenticatedUser, InstituteId, Role};
use crate::domain::user::{MemberLink, RoleRecord, User};
use crate::ports::{CourseRepository, PasswordHasher, UserRepository};

/// Reversible stand-in for argon2 so tests stay fast.
pub struct PlainHasher;

impl PasswordHasher for PlainHasher {
    fn hash(&self, password: &str) -> Result<String, AuthError> {
        Ok(format!("plain${}", password))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        Ok(hash == format!("plain${}", password))
    }
}

pub fn actor(user: &User) -> AuthenticatedUser {
    AuthenticatedUser::new(*user.id(), user.email(), user.role(), *user.institute_id())
}

pub async fn seed_user(store: &InMemoryStore, name: &str, role: Role, institute: InstituteId) -> User {
    let email = format!("{}@school.test", name.to_lowercase());
    let user = User::new(
        institute,
        &email,
        name,
        "Tester",
        PlainHasher.hash("correct horse").unwrap(),
        role,
    )
    .unwrap();
    let record = RoleRecord::empty_for(role, *user.id(), institute);
    UserRepository::create(store, &user, record.as_ref()).await.unwrap();
    user
}

pub async fn seed_course(store: &InMemoryStore, teacher: &User, name: &str) -> Course {
    let course = Course::new(*teacher.institute_id(), *teacher.id(), name, "").unwrap();
    CourseRepository::create(store, &course).await.unwrap();
    course
}

pub async fn enroll(store: &InMemoryStore, course: &Course, student: &User) {
    store
        .add_member(course.id(), &MemberLink::new(*student.id(), student.full_name()))
        .await
        .unwrap();
}
