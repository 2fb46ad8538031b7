//! PostgreSQL implementation of CourseRepository.
//!
//! A course row stores its member links and section tree as JSONB.
//! `next_visible_from` mirrors [`Course::next_publication`] so the visibility
//! job only touches courses that have something due.
//!
//! Every write locks the course row, applies the change through the
//! aggregate and rewrites the documents. Record links on the other side are
//! updated in the same transaction, always after the course lock.
//!
//! Course rows are locked `FOR NO KEY UPDATE`: writers serialize with each
//! other while survey inserts, which only need the key, go through.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::domain::course::{Content, Course, Section};
use crate::domain::foundation::{
    CourseId, DomainError, ErrorCode, InstituteId, SectionId, Timestamp, UserId,
};
use crate::domain::user::{insert_course_link, remove_course_link, MemberLink, RoleRecord};
use crate::ports::CourseRepository;

use super::role_record_repository::{edit_record_links, lock_record, record_not_found, save_record_links};
use super::user_repository::share_user;

pub struct PostgresCourseRepository {
    pool: PgPool,
}

impl PostgresCourseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CourseRow {
    id: Uuid,
    institute_id: Uuid,
    teacher_id: Uuid,
    name: String,
    description: String,
    members: Json<Vec<MemberLink>>,
    sections: Json<Vec<Section>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CourseRow> for Course {
    fn from(row: CourseRow) -> Self {
        Course::reconstitute(
            CourseId::from_uuid(row.id),
            InstituteId::from_uuid(row.institute_id),
            UserId::from_uuid(row.teacher_id),
            row.name,
            row.description,
            row.members.0,
            row.sections.0,
            Timestamp::from_datetime(row.created_at),
            Timestamp::from_datetime(row.updated_at),
        )
    }
}

const COURSE_COLUMNS: &str =
    "id, institute_id, teacher_id, name, description, members, sections, created_at, updated_at";

pub(super) fn course_not_found(id: &CourseId) -> DomainError {
    DomainError::new(ErrorCode::CourseNotFound, format!("Course not found: {}", id))
        .with_detail("course_id", id.to_string())
}

async fn begin(pool: &PgPool) -> Result<Transaction<'static, Postgres>, DomainError> {
    pool.begin().await.map_err(|e| {
        DomainError::new(ErrorCode::DatabaseError, format!("Failed to begin transaction: {}", e))
    })
}

async fn commit(tx: Transaction<'_, Postgres>) -> Result<(), DomainError> {
    tx.commit().await.map_err(|e| {
        DomainError::new(ErrorCode::DatabaseError, format!("Failed to commit transaction: {}", e))
    })
}

async fn lock_course(
    tx: &mut Transaction<'_, Postgres>,
    id: &CourseId,
) -> Result<Option<Course>, DomainError> {
    let row: Option<CourseRow> = sqlx::query_as(&format!(
        "SELECT {} FROM courses WHERE id = $1 FOR NO KEY UPDATE",
        COURSE_COLUMNS
    ))
    .bind(id.as_uuid())
    .fetch_optional(&mut **tx)
    .await
    .map_err(|e| DomainError::new(ErrorCode::DatabaseError, format!("Failed to lock course: {}", e)))?;

    Ok(row.map(Course::from))
}

/// Locks, in ascending id order, the listed courses plus every course the
/// user currently owns or attends. Returns the ids that were locked.
///
/// The predicate runs inside the caller's transaction, so an enrolment that
/// committed after the caller planned its work is still picked up.
pub(super) async fn lock_linked_courses(
    tx: &mut Transaction<'_, Postgres>,
    user_id: &UserId,
    planned: &[CourseId],
) -> Result<Vec<CourseId>, DomainError> {
    let planned: Vec<Uuid> = planned.iter().map(|id| *id.as_uuid()).collect();

    let ids: Vec<Uuid> = sqlx::query_scalar(
        r#"
        SELECT id FROM courses
        WHERE id = ANY($1) OR teacher_id = $2 OR members @> $3
        ORDER BY id
        FOR NO KEY UPDATE
        "#,
    )
    .bind(&planned)
    .bind(user_id.as_uuid())
    .bind(Json(json!([{ "id": user_id }])))
    .fetch_all(&mut **tx)
    .await
    .map_err(|e| DomainError::new(ErrorCode::DatabaseError, format!("Failed to lock courses: {}", e)))?;

    Ok(ids.into_iter().map(CourseId::from_uuid).collect())
}

async fn save_course(tx: &mut Transaction<'_, Postgres>, course: &Course) -> Result<(), DomainError> {
    sqlx::query(
        r#"
        UPDATE courses SET
            members = $2,
            sections = $3,
            next_visible_from = $4,
            updated_at = $5
        WHERE id = $1
        "#,
    )
    .bind(course.id().as_uuid())
    .bind(Json(course.members()))
    .bind(Json(course.sections()))
    .bind(course.next_publication().map(|t| *t.as_datetime()))
    .bind(course.updated_at().as_datetime())
    .execute(&mut **tx)
    .await
    .map_err(|e| DomainError::new(ErrorCode::DatabaseError, format!("Failed to update course: {}", e)))?;

    Ok(())
}

/// Removes `user_id` from the course members and the course from the
/// user's record. Returns whether the user was a member.
pub(super) async fn unenroll(
    tx: &mut Transaction<'_, Postgres>,
    course_id: &CourseId,
    user_id: &UserId,
) -> Result<bool, DomainError> {
    let mut removed = false;
    if let Some(mut course) = lock_course(tx, course_id).await? {
        removed = course.remove_member(user_id);
        if removed {
            save_course(tx, &course).await?;
        }
    }
    let course_id = *course_id;
    edit_record_links(tx, user_id, move |links| remove_course_link(links, &course_id)).await?;
    Ok(removed)
}

/// Deletes a course after dropping its link from the owner and every
/// member. Survey responses go with it by foreign key.
pub(super) async fn delete_course(
    tx: &mut Transaction<'_, Postgres>,
    course_id: &CourseId,
) -> Result<bool, DomainError> {
    let Some(course) = lock_course(tx, course_id).await? else {
        return Ok(false);
    };

    let linked: Vec<UserId> = course
        .members()
        .iter()
        .map(|m| m.id)
        .chain(std::iter::once(*course.teacher_id()))
        .collect();
    for user_id in &linked {
        let id = *course_id;
        edit_record_links(tx, user_id, move |links| remove_course_link(links, &id)).await?;
    }

    sqlx::query("DELETE FROM courses WHERE id = $1")
        .bind(course_id.as_uuid())
        .execute(&mut **tx)
        .await
        .map_err(|e| DomainError::new(ErrorCode::DatabaseError, format!("Failed to delete course: {}", e)))?;

    Ok(true)
}

#[async_trait]
impl CourseRepository for PostgresCourseRepository {
    async fn create(&self, course: &Course) -> Result<(), DomainError> {
        let mut tx = begin(&self.pool).await?;

        let teacher = course.teacher_id();
        if !share_user(&mut tx, teacher).await? {
            return Err(record_not_found(teacher));
        }
        let mut record = match lock_record(&mut tx, teacher).await? {
            Some(record @ RoleRecord::Teacher(_)) => record,
            _ => return Err(record_not_found(teacher)),
        };

        sqlx::query(
            r#"
            INSERT INTO courses (
                id, institute_id, teacher_id, name, description,
                members, sections, next_visible_from, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(course.id().as_uuid())
        .bind(course.institute_id().as_uuid())
        .bind(teacher.as_uuid())
        .bind(course.name())
        .bind(course.description())
        .bind(Json(course.members()))
        .bind(Json(course.sections()))
        .bind(course.next_publication().map(|t| *t.as_datetime()))
        .bind(course.created_at().as_datetime())
        .bind(course.updated_at().as_datetime())
        .execute(&mut *tx)
        .await
        .map_err(|e| DomainError::new(ErrorCode::DatabaseError, format!("Failed to insert course: {}", e)))?;

        if let Some(links) = record.courses_mut() {
            insert_course_link(links, course.link());
        }
        save_record_links(&mut tx, &record).await?;

        commit(tx).await
    }

    async fn find_by_id(&self, id: &CourseId) -> Result<Option<Course>, DomainError> {
        let row: Option<CourseRow> =
            sqlx::query_as(&format!("SELECT {} FROM courses WHERE id = $1", COURSE_COLUMNS))
                .bind(id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| DomainError::new(ErrorCode::DatabaseError, format!("Failed to fetch course: {}", e)))?;

        Ok(row.map(Course::from))
    }

    async fn list_by_institute(&self, institute: &InstituteId) -> Result<Vec<Course>, DomainError> {
        let rows: Vec<CourseRow> = sqlx::query_as(&format!(
            "SELECT {} FROM courses WHERE institute_id = $1 ORDER BY name",
            COURSE_COLUMNS
        ))
        .bind(institute.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::new(ErrorCode::DatabaseError, format!("Failed to list courses: {}", e)))?;

        Ok(rows.into_iter().map(Course::from).collect())
    }

    async fn find_ids_by_teacher(&self, teacher: &UserId) -> Result<Vec<CourseId>, DomainError> {
        let ids: Vec<Uuid> = sqlx::query_scalar("SELECT id FROM courses WHERE teacher_id = $1")
            .bind(teacher.as_uuid())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                DomainError::new(ErrorCode::DatabaseError, format!("Failed to list teacher courses: {}", e))
            })?;

        Ok(ids.into_iter().map(CourseId::from_uuid).collect())
    }

    async fn find_ids_by_member(&self, member: &UserId) -> Result<Vec<CourseId>, DomainError> {
        let ids: Vec<Uuid> = sqlx::query_scalar("SELECT id FROM courses WHERE members @> $1")
            .bind(Json(json!([{ "id": member }])))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                DomainError::new(ErrorCode::DatabaseError, format!("Failed to list member courses: {}", e))
            })?;

        Ok(ids.into_iter().map(CourseId::from_uuid).collect())
    }

    async fn add_member(&self, course_id: &CourseId, member: &MemberLink) -> Result<bool, DomainError> {
        let mut tx = begin(&self.pool).await?;

        let mut course = lock_course(&mut tx, course_id)
            .await?
            .ok_or_else(|| course_not_found(course_id))?;
        let mut record = match lock_record(&mut tx, &member.id).await? {
            Some(record @ RoleRecord::Student(_)) => record,
            _ => return Err(record_not_found(&member.id)),
        };

        if !course.add_member(member.clone()) {
            return Ok(false);
        }
        save_course(&mut tx, &course).await?;
        if let Some(links) = record.courses_mut() {
            insert_course_link(links, course.link());
        }
        save_record_links(&mut tx, &record).await?;

        commit(tx).await?;
        Ok(true)
    }

    async fn remove_member(&self, course_id: &CourseId, member: &UserId) -> Result<bool, DomainError> {
        let mut tx = begin(&self.pool).await?;

        if lock_course(&mut tx, course_id).await?.is_none() {
            return Err(course_not_found(course_id));
        }
        let removed = unenroll(&mut tx, course_id, member).await?;

        commit(tx).await?;
        Ok(removed)
    }

    async fn add_section(&self, course_id: &CourseId, section: &Section) -> Result<(), DomainError> {
        let mut tx = begin(&self.pool).await?;

        let mut course = lock_course(&mut tx, course_id)
            .await?
            .ok_or_else(|| course_not_found(course_id))?;
        course.add_section(section.clone());
        save_course(&mut tx, &course).await?;

        commit(tx).await
    }

    async fn add_content(
        &self,
        course_id: &CourseId,
        section_id: &SectionId,
        content: &Content,
    ) -> Result<(), DomainError> {
        let mut tx = begin(&self.pool).await?;

        let mut course = lock_course(&mut tx, course_id)
            .await?
            .ok_or_else(|| course_not_found(course_id))?;
        course.add_content(section_id, content.clone()).map_err(|_| {
            DomainError::new(ErrorCode::SectionNotFound, format!("Section not found: {}", section_id))
                .with_detail("section_id", section_id.to_string())
        })?;
        save_course(&mut tx, &course).await?;

        commit(tx).await
    }

    async fn delete_cascade(&self, course_id: &CourseId) -> Result<bool, DomainError> {
        let mut tx = begin(&self.pool).await?;
        let deleted = delete_course(&mut tx, course_id).await?;
        commit(tx).await?;
        Ok(deleted)
    }

    async fn publish_due_contents(&self, now: Timestamp) -> Result<u64, DomainError> {
        let mut tx = begin(&self.pool).await?;

        // Rows locked by a concurrent writer are picked up on the next run.
        let rows: Vec<CourseRow> = sqlx::query_as(&format!(
            r#"
            SELECT {}
            FROM courses
            WHERE next_visible_from <= $1
            FOR UPDATE SKIP LOCKED
            "#,
            COURSE_COLUMNS
        ))
        .bind(now.as_datetime())
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| DomainError::new(ErrorCode::DatabaseError, format!("Failed to fetch due courses: {}", e)))?;

        let mut published = 0u64;
        for row in rows {
            let mut course = Course::from(row);
            published += course.publish_due(&now) as u64;
            save_course(&mut tx, &course).await?;
        }

        commit(tx).await?;
        Ok(published)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::course::{ContentKind, NewContent};

    #[test]
    fn row_converts_to_course_with_documents() {
        let now = Utc::now();
        let mut section = Section::new("Week 1").unwrap();
        section.contents.push(
            NewContent::new("Intro", ContentKind::Text, "Hello", None)
                .unwrap()
                .into_content(&Timestamp::from_datetime(now)),
        );
        let member = MemberLink::new(UserId::new(), "Ada Lovelace");
        let row = CourseRow {
            id: Uuid::new_v4(),
            institute_id: Uuid::new_v4(),
            teacher_id: Uuid::new_v4(),
            name: "Physics".to_string(),
            description: String::new(),
            members: Json(vec![member.clone()]),
            sections: Json(vec![section.clone()]),
            created_at: now,
            updated_at: now,
        };

        let course = Course::from(row);
        assert_eq!(course.members(), &[member][..]);
        assert_eq!(course.sections(), &[section][..]);
    }

    #[test]
    fn member_filter_matches_stored_link_shape() {
        let member = MemberLink::new(UserId::new(), "Ada Lovelace");
        let stored = serde_json::to_value(vec![member.clone()]).unwrap();
        let filter = json!([{ "id": member.id }]);
        assert_eq!(stored[0]["id"], filter[0]["id"]);
    }
}
