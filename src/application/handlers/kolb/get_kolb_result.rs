//! GetKolbResultHandler - Reads a student's latest Kolb test.

use std::sync::Arc;

use crate::domain::foundation::{AuthenticatedUser, Role, UserId};
use crate::domain::kolb::{KolbError, KolbSubmission};
use crate::ports::{KolbRepository, UserRepository};

pub struct GetKolbResultHandler {
    kolb: Arc<dyn KolbRepository>,
    users: Arc<dyn UserRepository>,
}

impl GetKolbResultHandler {
    pub fn new(kolb: Arc<dyn KolbRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { kolb, users }
    }

    /// The student itself, or staff of the student's institute.
    pub async fn handle(&self, actor: &AuthenticatedUser, student_id: UserId) -> Result<KolbSubmission, KolbError> {
        if actor.id != student_id {
            if actor.role == Role::Student {
                return Err(KolbError::Forbidden);
            }
            let student = self
                .users
                .find_by_id(&student_id)
                .await?
                .ok_or(KolbError::ResultNotFound(student_id))?;
            if !actor.can_access_institute(student.institute_id()) {
                return Err(KolbError::Forbidden);
            }
        }

        self.kolb
            .find_by_student(&student_id)
            .await?
            .ok_or(KolbError::ResultNotFound(student_id))
    }
}
