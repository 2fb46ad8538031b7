//! HTTP DTOs for course and survey endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::course::{ContentKind, Course, Section};
use crate::domain::foundation::{CourseId, InstituteId, Timestamp, UserId};
use crate::domain::user::MemberLink;

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Deserialize)]
pub struct CreateCourseRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EnrollRequest {
    pub student_id: UserId,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddSectionRequest {
    pub title: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddContentRequest {
    pub title: String,
    pub kind: ContentKind,
    #[serde(default)]
    pub body: String,
    /// Hidden until this instant when set in the future.
    #[serde(default)]
    pub visible_from: Option<Timestamp>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubmitSurveyRequest {
    pub rating: u8,
    #[serde(default)]
    pub comment: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
pub struct CourseResponse {
    pub id: CourseId,
    pub institute_id: InstituteId,
    pub teacher_id: UserId,
    pub name: String,
    pub description: String,
    pub members: Vec<MemberLink>,
    pub sections: Vec<Section>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<&Course> for CourseResponse {
    fn from(course: &Course) -> Self {
        Self {
            id: *course.id(),
            institute_id: *course.institute_id(),
            teacher_id: *course.teacher_id(),
            name: course.name().to_string(),
            description: course.description().to_string(),
            members: course.members().to_vec(),
            sections: course.sections().to_vec(),
            created_at: *course.created_at(),
            updated_at: *course.updated_at(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EnrollmentResponse {
    pub course_id: CourseId,
    pub student_id: UserId,
    /// False when the student was already a member.
    pub enrolled: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_request_parses_kind_and_schedule() {
        let request: AddContentRequest = serde_json::from_value(serde_json::json!({
            "title": "Slides",
            "kind": "LINK",
            "body": "https://school.test/slides",
            "visible_from": "2030-01-01T08:00:00Z"
        }))
        .unwrap();
        assert_eq!(request.kind, ContentKind::Link);
        assert!(request.visible_from.is_some());
    }

    #[test]
    fn course_response_lists_members() {
        let mut course = Course::new(InstituteId::new(), UserId::new(), "Math", "").unwrap();
        let student = UserId::new();
        course.add_member(MemberLink::new(student, "Sam Student"));
        let json = serde_json::to_value(CourseResponse::from(&course)).unwrap();
        assert_eq!(json["name"], "Math");
        assert_eq!(json["members"][0]["id"], student.to_string());
        assert_eq!(json["sections"], serde_json::json!([]));
    }

    #[test]
    fn survey_comment_is_optional() {
        let request: SubmitSurveyRequest = serde_json::from_value(serde_json::json!({ "rating": 4 })).unwrap();
        assert_eq!(request.rating, 4);
        assert!(request.comment.is_none());
    }
}
