//! PostgreSQL implementation of UserRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::domain::foundation::{DomainError, ErrorCode, InstituteId, Role, Timestamp, UserId};
use crate::domain::user::{RoleRecord, User};
use crate::ports::UserRepository;

use super::role_record_repository::insert_record;

/// PostgreSQL implementation of the UserRepository port.
///
/// Account and role record are inserted in one transaction.
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a user.
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    institute_id: Uuid,
    email: String,
    first_name: String,
    last_name: String,
    password_hash: String,
    role: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = DomainError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role: Role = row
            .role
            .parse()
            .map_err(|e| DomainError::new(ErrorCode::DatabaseError, format!("Invalid role: {}", e)))?;

        Ok(User::reconstitute(
            UserId::from_uuid(row.id),
            InstituteId::from_uuid(row.institute_id),
            row.email,
            row.first_name,
            row.last_name,
            row.password_hash,
            role,
            Timestamp::from_datetime(row.created_at),
            Timestamp::from_datetime(row.updated_at),
        ))
    }
}

const USER_COLUMNS: &str =
    "id, institute_id, email, first_name, last_name, password_hash, role, created_at, updated_at";

/// Takes a key-share lock on the user row, blocking only a concurrent
/// account removal. Returns false when the user does not exist.
///
/// Writers that go on to lock the user's role record call this first so the
/// user row is always locked before the record.
pub(super) async fn share_user(
    tx: &mut Transaction<'_, Postgres>,
    user_id: &UserId,
) -> Result<bool, DomainError> {
    let found: Option<i32> = sqlx::query_scalar("SELECT 1 FROM users WHERE id = $1 FOR KEY SHARE")
        .bind(user_id.as_uuid())
        .fetch_optional(&mut **tx)
        .await
        .map_err(|e| DomainError::new(ErrorCode::DatabaseError, format!("Failed to lock user: {}", e)))?;
    Ok(found.is_some())
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: &User, record: Option<&RoleRecord>) -> Result<(), DomainError> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to begin transaction: {}", e))
        })?;

        sqlx::query(
            r#"
            INSERT INTO users (
                id, institute_id, email, first_name, last_name,
                password_hash, role, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(user.id().as_uuid())
        .bind(user.institute_id().as_uuid())
        .bind(user.email())
        .bind(user.first_name())
        .bind(user.last_name())
        .bind(user.password_hash())
        .bind(user.role().as_str())
        .bind(user.created_at().as_datetime())
        .bind(user.updated_at().as_datetime())
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.constraint() == Some("users_email_key") {
                    return DomainError::new(
                        ErrorCode::Conflict,
                        format!("Email already registered: {}", user.email()),
                    )
                    .with_detail("email", user.email());
                }
            }
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to insert user: {}", e))
        })?;

        if let Some(record) = record {
            insert_record(&mut tx, record).await?;
        }

        tx.commit().await.map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to commit transaction: {}", e))
        })?;

        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS))
                .bind(id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| DomainError::new(ErrorCode::DatabaseError, format!("Failed to fetch user: {}", e)))?;

        row.map(User::try_from).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS))
                .bind(email)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    DomainError::new(ErrorCode::DatabaseError, format!("Failed to fetch user by email: {}", e))
                })?;

        row.map(User::try_from).transpose()
    }

    async fn list(
        &self,
        institute: Option<&InstituteId>,
        role: Option<Role>,
    ) -> Result<Vec<User>, DomainError> {
        let rows: Vec<UserRow> = sqlx::query_as(&format!(
            r#"
            SELECT {}
            FROM users
            WHERE ($1::uuid IS NULL OR institute_id = $1)
              AND ($2::text IS NULL OR role = $2)
            ORDER BY last_name, first_name
            "#,
            USER_COLUMNS
        ))
        .bind(institute.map(|i| *i.as_uuid()))
        .bind(role.map(|r| r.as_str()))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::new(ErrorCode::DatabaseError, format!("Failed to list users: {}", e)))?;

        rows.into_iter().map(User::try_from).collect()
    }
}
