//! PostgreSQL implementation of KolbRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{DomainError, ErrorCode, Timestamp, UserId};
use crate::domain::kolb::{AnswerMatrix, KolbScores, KolbSubmission, LearningProfile};
use crate::domain::user::RoleRecord;
use crate::ports::KolbRepository;

use super::role_record_repository::{lock_record, record_not_found, save_record_links};
use super::user_repository::share_user;

pub struct PostgresKolbRepository {
    pool: PgPool,
}

impl PostgresKolbRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct KolbRow {
    student_id: Uuid,
    answers: Json<AnswerMatrix>,
    scores: Json<KolbScores>,
    profile: String,
    submitted_at: DateTime<Utc>,
}

impl TryFrom<KolbRow> for KolbSubmission {
    type Error = DomainError;

    fn try_from(row: KolbRow) -> Result<Self, Self::Error> {
        let profile: LearningProfile = row.profile.parse().map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Invalid learning profile: {}", e))
        })?;

        Ok(KolbSubmission {
            student_id: UserId::from_uuid(row.student_id),
            answers: row.answers.0,
            scores: row.scores.0,
            profile,
            submitted_at: Timestamp::from_datetime(row.submitted_at),
        })
    }
}

#[async_trait]
impl KolbRepository for PostgresKolbRepository {
    async fn upsert(&self, submission: &KolbSubmission) -> Result<(), DomainError> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to begin transaction: {}", e))
        })?;

        let student = &submission.student_id;
        if !share_user(&mut tx, student).await? {
            return Err(record_not_found(student));
        }
        let mut record = match lock_record(&mut tx, student).await? {
            Some(RoleRecord::Student(record)) => record,
            _ => return Err(record_not_found(student)),
        };

        sqlx::query(
            r#"
            INSERT INTO kolb_submissions (student_id, answers, scores, profile, submitted_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (student_id) DO UPDATE SET
                answers = EXCLUDED.answers,
                scores = EXCLUDED.scores,
                profile = EXCLUDED.profile,
                submitted_at = EXCLUDED.submitted_at
            "#,
        )
        .bind(student.as_uuid())
        .bind(Json(&submission.answers))
        .bind(Json(&submission.scores))
        .bind(submission.profile.as_str())
        .bind(submission.submitted_at.as_datetime())
        .execute(&mut *tx)
        .await
        .map_err(|e| DomainError::new(ErrorCode::DatabaseError, format!("Failed to save kolb result: {}", e)))?;

        record.learning_profile = Some(submission.profile);
        save_record_links(&mut tx, &RoleRecord::Student(record)).await?;

        tx.commit().await.map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to commit transaction: {}", e))
        })?;

        Ok(())
    }

    async fn find_by_student(&self, student: &UserId) -> Result<Option<KolbSubmission>, DomainError> {
        let row: Option<KolbRow> = sqlx::query_as(
            r#"
            SELECT student_id, answers, scores, profile, submitted_at
            FROM kolb_submissions
            WHERE student_id = $1
            "#,
        )
        .bind(student.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::new(ErrorCode::DatabaseError, format!("Failed to fetch kolb result: {}", e)))?;

        row.map(KolbSubmission::try_from).transpose()
    }
}
