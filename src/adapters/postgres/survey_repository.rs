//! PostgreSQL implementation of SurveyRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{
    CourseId, DomainError, ErrorCode, SurveyResponseId, Timestamp, UserId,
};
use crate::domain::survey::SurveyResponse;
use crate::ports::SurveyRepository;

use super::course_repository::course_not_found;

pub struct PostgresSurveyRepository {
    pool: PgPool,
}

impl PostgresSurveyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct SurveyRow {
    id: Uuid,
    course_id: Uuid,
    student_id: Uuid,
    rating: i16,
    comment: Option<String>,
    submitted_at: DateTime<Utc>,
}

impl TryFrom<SurveyRow> for SurveyResponse {
    type Error = DomainError;

    fn try_from(row: SurveyRow) -> Result<Self, Self::Error> {
        let rating = u8::try_from(row.rating)
            .ok()
            .filter(|r| (1..=5).contains(r))
            .ok_or_else(|| {
                DomainError::new(ErrorCode::DatabaseError, format!("Invalid rating: {}", row.rating))
            })?;

        Ok(SurveyResponse {
            id: SurveyResponseId::from_uuid(row.id),
            course_id: CourseId::from_uuid(row.course_id),
            student_id: UserId::from_uuid(row.student_id),
            rating,
            comment: row.comment,
            submitted_at: Timestamp::from_datetime(row.submitted_at),
        })
    }
}

#[async_trait]
impl SurveyRepository for PostgresSurveyRepository {
    /// One response per student and course; resubmitting replaces it.
    async fn upsert(&self, response: &SurveyResponse) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO survey_responses (id, course_id, student_id, rating, comment, submitted_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT ON CONSTRAINT survey_responses_course_student_key DO UPDATE SET
                rating = EXCLUDED.rating,
                comment = EXCLUDED.comment,
                submitted_at = EXCLUDED.submitted_at
            "#,
        )
        .bind(response.id.as_uuid())
        .bind(response.course_id.as_uuid())
        .bind(response.student_id.as_uuid())
        .bind(i16::from(response.rating))
        .bind(response.comment.as_deref())
        .bind(response.submitted_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.constraint() == Some("survey_responses_course_id_fkey") {
                    return course_not_found(&response.course_id);
                }
            }
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to save survey response: {}", e))
        })?;

        Ok(())
    }

    async fn find_by_course(&self, course_id: &CourseId) -> Result<Vec<SurveyResponse>, DomainError> {
        let rows: Vec<SurveyRow> = sqlx::query_as(
            r#"
            SELECT id, course_id, student_id, rating, comment, submitted_at
            FROM survey_responses
            WHERE course_id = $1
            ORDER BY submitted_at
            "#,
        )
        .bind(course_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to fetch survey responses: {}", e))
        })?;

        rows.into_iter().map(SurveyResponse::try_from).collect()
    }
}
