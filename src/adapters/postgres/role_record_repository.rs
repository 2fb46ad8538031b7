//! PostgreSQL implementation of RoleRecordRepository.
//!
//! Also hosts the row helpers other repositories use inside their own
//! transactions when they touch a record's course links.

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::domain::foundation::{DomainError, ErrorCode, InstituteId, Role, UserId};
use crate::domain::kolb::LearningProfile;
use crate::domain::user::{CourseLink, DirectorRecord, RoleRecord, StudentRecord, TeacherRecord};
use crate::ports::RoleRecordRepository;

pub struct PostgresRoleRecordRepository {
    pool: PgPool,
}

impl PostgresRoleRecordRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct RoleRecordRow {
    user_id: Uuid,
    kind: String,
    institute_id: Uuid,
    learning_profile: Option<String>,
    courses: Json<Vec<CourseLink>>,
}

impl TryFrom<RoleRecordRow> for RoleRecord {
    type Error = DomainError;

    fn try_from(row: RoleRecordRow) -> Result<Self, Self::Error> {
        let user_id = UserId::from_uuid(row.user_id);
        let institute_id = InstituteId::from_uuid(row.institute_id);
        let kind: Role = row.kind.parse().map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Invalid record kind: {}", e))
        })?;

        Ok(match kind {
            Role::Student => RoleRecord::Student(StudentRecord {
                user_id,
                institute_id,
                learning_profile: row
                    .learning_profile
                    .map(|p| p.parse::<LearningProfile>())
                    .transpose()
                    .map_err(|e| {
                        DomainError::new(ErrorCode::DatabaseError, format!("Invalid learning profile: {}", e))
                    })?,
                courses: row.courses.0,
            }),
            Role::Teacher => RoleRecord::Teacher(TeacherRecord {
                user_id,
                institute_id,
                courses: row.courses.0,
            }),
            Role::Director => RoleRecord::Director(DirectorRecord { user_id, institute_id }),
            Role::Admin => {
                return Err(DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Admin user {} has a role record", user_id),
                ))
            }
        })
    }
}

pub(super) fn record_not_found(user_id: &UserId) -> DomainError {
    DomainError::new(
        ErrorCode::RoleRecordNotFound,
        format!("Role record missing for user {}", user_id),
    )
    .with_detail("user_id", user_id.to_string())
}

pub(super) async fn insert_record(
    tx: &mut Transaction<'_, Postgres>,
    record: &RoleRecord,
) -> Result<(), DomainError> {
    sqlx::query(
        r#"
        INSERT INTO role_records (user_id, kind, institute_id, learning_profile, courses)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(record.user_id().as_uuid())
    .bind(record.role().as_str())
    .bind(record.institute_id().as_uuid())
    .bind(record.learning_profile().map(|p| p.as_str()))
    .bind(Json(record.courses()))
    .execute(&mut **tx)
    .await
    .map_err(|e| DomainError::new(ErrorCode::DatabaseError, format!("Failed to insert role record: {}", e)))?;

    Ok(())
}

/// Loads a record and holds its row lock until the transaction ends.
pub(super) async fn lock_record(
    tx: &mut Transaction<'_, Postgres>,
    user_id: &UserId,
) -> Result<Option<RoleRecord>, DomainError> {
    let row: Option<RoleRecordRow> = sqlx::query_as(
        r#"
        SELECT user_id, kind, institute_id, learning_profile, courses
        FROM role_records
        WHERE user_id = $1
        FOR UPDATE
        "#,
    )
    .bind(user_id.as_uuid())
    .fetch_optional(&mut **tx)
    .await
    .map_err(|e| DomainError::new(ErrorCode::DatabaseError, format!("Failed to lock role record: {}", e)))?;

    row.map(RoleRecord::try_from).transpose()
}

pub(super) async fn save_record_links(
    tx: &mut Transaction<'_, Postgres>,
    record: &RoleRecord,
) -> Result<(), DomainError> {
    sqlx::query("UPDATE role_records SET courses = $2, learning_profile = $3 WHERE user_id = $1")
        .bind(record.user_id().as_uuid())
        .bind(Json(record.courses()))
        .bind(record.learning_profile().map(|p| p.as_str()))
        .execute(&mut **tx)
        .await
        .map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to update role record: {}", e))
        })?;

    Ok(())
}

/// Applies `edit` to the user's record links, if the user has a record
/// with a course list.
pub(super) async fn edit_record_links<F>(
    tx: &mut Transaction<'_, Postgres>,
    user_id: &UserId,
    edit: F,
) -> Result<(), DomainError>
where
    F: FnOnce(&mut Vec<CourseLink>) -> bool + Send,
{
    let Some(mut record) = lock_record(tx, user_id).await? else {
        return Ok(());
    };
    let changed = record.courses_mut().map_or(false, edit);
    if changed {
        save_record_links(tx, &record).await?;
    }
    Ok(())
}

#[async_trait]
impl RoleRecordRepository for PostgresRoleRecordRepository {
    async fn find_by_user(&self, user_id: &UserId) -> Result<Option<RoleRecord>, DomainError> {
        let row: Option<RoleRecordRow> = sqlx::query_as(
            r#"
            SELECT user_id, kind, institute_id, learning_profile, courses
            FROM role_records
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::new(ErrorCode::DatabaseError, format!("Failed to fetch role record: {}", e)))?;

        row.map(RoleRecord::try_from).transpose()
    }
}
