//! PostgreSQL implementation of RoleTransitionStore.
//!
//! A plan runs inside one transaction. The user row is locked first and its
//! role compared with the role the plan was computed from, so two racing
//! transitions for the same user serialize and the later one fails with
//! `ConcurrentModification` instead of applying on stale data.
//!
//! Lock order, shared with every other writer in this module tree:
//!
//! 1. the user row
//! 2. course rows, ascending by id
//! 3. role records
//!
//! Courses are locked by id and by a link predicate evaluated inside the
//! transaction, so a course linked after planning is cascaded as well.
//!
//! A role change locks the user `FOR NO KEY UPDATE`, which leaves foreign key
//! checks from concurrent survey and Kolb inserts unblocked. Removal needs
//! `FOR UPDATE`.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::foundation::{DomainError, ErrorCode, Role, UserId};
use crate::domain::user::{CourseLink, RoleTransitionPlan, UserWrite};
use crate::ports::RoleTransitionStore;

use super::course_repository::{delete_course, lock_linked_courses, unenroll};
use super::role_record_repository::{insert_record, lock_record, record_not_found};

pub struct PostgresRoleTransitionStore {
    pool: PgPool,
}

impl PostgresRoleTransitionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn concurrent_modification(user_id: &UserId) -> DomainError {
    DomainError::new(
        ErrorCode::ConcurrentModification,
        format!("User {} changed before the transition was applied", user_id),
    )
    .with_detail("user_id", user_id.to_string())
}

#[async_trait]
impl RoleTransitionStore for PostgresRoleTransitionStore {
    async fn apply(&self, plan: &RoleTransitionPlan) -> Result<(), DomainError> {
        let user_id = *plan.user_id();
        let expected_role = match &plan.user_write {
            UserWrite::UpdateRole { expected_role, .. } | UserWrite::Delete { expected_role, .. } => {
                *expected_role
            }
        };

        let mut tx = self.pool.begin().await.map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to begin transaction: {}", e))
        })?;

        let lock_user = match &plan.user_write {
            UserWrite::UpdateRole { .. } => "SELECT role FROM users WHERE id = $1 FOR NO KEY UPDATE",
            UserWrite::Delete { .. } => "SELECT role FROM users WHERE id = $1 FOR UPDATE",
        };
        let current: Option<String> = sqlx::query_scalar(lock_user)
            .bind(user_id.as_uuid())
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| DomainError::new(ErrorCode::DatabaseError, format!("Failed to lock user: {}", e)))?;
        if current.as_deref() != Some(expected_role.as_str()) {
            return Err(concurrent_modification(&user_id));
        }

        let planned: Vec<_> = plan
            .unenroll_from
            .iter()
            .chain(&plan.delete_courses)
            .copied()
            .collect();
        let linked = lock_linked_courses(&mut tx, &user_id, &planned).await?;

        if let Some(role) = plan.drop_record {
            let record = match lock_record(&mut tx, &user_id).await? {
                Some(record) if record.role() == role => record,
                _ => return Err(record_not_found(&user_id)),
            };
            // A link committed while this transaction waited for the record
            // belongs to a course it has not locked. Planned ids cover links
            // to courses that no longer exist.
            let unlocked = |link: &CourseLink| !linked.contains(&link.id) && !planned.contains(&link.id);
            if record.courses().iter().any(unlocked) {
                return Err(concurrent_modification(&user_id));
            }
        }

        match plan.drop_record {
            Some(Role::Student) => {
                for course_id in &linked {
                    unenroll(&mut tx, course_id, &user_id).await?;
                }
            }
            Some(Role::Teacher) => {
                for course_id in &linked {
                    delete_course(&mut tx, course_id).await?;
                }
            }
            _ => {}
        }

        if plan.drop_record.is_some() {
            sqlx::query("DELETE FROM role_records WHERE user_id = $1")
                .bind(user_id.as_uuid())
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    DomainError::new(ErrorCode::DatabaseError, format!("Failed to delete role record: {}", e))
                })?;
        }
        if plan.drops_student_data() {
            sqlx::query("DELETE FROM kolb_submissions WHERE student_id = $1")
                .bind(user_id.as_uuid())
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    DomainError::new(ErrorCode::DatabaseError, format!("Failed to delete kolb result: {}", e))
                })?;
            sqlx::query("DELETE FROM survey_responses WHERE student_id = $1")
                .bind(user_id.as_uuid())
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    DomainError::new(ErrorCode::DatabaseError, format!("Failed to delete survey answers: {}", e))
                })?;
        }
        if let Some(record) = &plan.create_record {
            insert_record(&mut tx, record).await?;
        }

        match &plan.user_write {
            UserWrite::UpdateRole { user, .. } => {
                sqlx::query("UPDATE users SET role = $2, updated_at = $3 WHERE id = $1")
                    .bind(user_id.as_uuid())
                    .bind(user.role().as_str())
                    .bind(user.updated_at().as_datetime())
                    .execute(&mut *tx)
                    .await
                    .map_err(|e| {
                        DomainError::new(ErrorCode::DatabaseError, format!("Failed to update user role: {}", e))
                    })?;
            }
            UserWrite::Delete { .. } => {
                sqlx::query("DELETE FROM users WHERE id = $1")
                    .bind(user_id.as_uuid())
                    .execute(&mut *tx)
                    .await
                    .map_err(|e| {
                        DomainError::new(ErrorCode::DatabaseError, format!("Failed to delete user: {}", e))
                    })?;
            }
        }

        tx.commit().await.map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to commit transaction: {}", e))
        })?;

        Ok(())
    }
}
