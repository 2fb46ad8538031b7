//! Satisfaction survey responses and their summary.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{CourseId, SurveyResponseId, Timestamp, UserId, ValidationError};

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;
pub const MAX_COMMENT_LENGTH: usize = 2000;

/// One student's answer to a course survey.
///
/// A student holds at most one response per course; answering again
/// replaces the earlier one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyResponse {
    pub id: SurveyResponseId,
    pub course_id: CourseId,
    pub student_id: UserId,
    pub rating: u8,
    pub comment: Option<String>,
    pub submitted_at: Timestamp,
}

impl SurveyResponse {
    pub fn new(
        course_id: CourseId,
        student_id: UserId,
        rating: u8,
        comment: Option<&str>,
    ) -> Result<Self, ValidationError> {
        if !(MIN_RATING..=MAX_RATING).contains(&rating) {
            return Err(ValidationError::out_of_range(
                "rating",
                MIN_RATING as i64,
                MAX_RATING as i64,
                rating as i64,
            ));
        }
        let comment = comment.map(str::trim).filter(|c| !c.is_empty());
        if let Some(comment) = comment {
            let len = comment.chars().count();
            if len > MAX_COMMENT_LENGTH {
                return Err(ValidationError::out_of_range(
                    "comment",
                    0,
                    MAX_COMMENT_LENGTH as i64,
                    len as i64,
                ));
            }
        }
        Ok(Self {
            id: SurveyResponseId::new(),
            course_id,
            student_id,
            rating,
            comment: comment.map(str::to_string),
            submitted_at: Timestamp::now(),
        })
    }
}

/// Aggregate view of a course's responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveySummary {
    pub course_id: CourseId,
    pub responses: u32,
    pub average_rating: Option<f64>,
    /// Count of ratings 1 through 5, in order.
    pub distribution: [u32; 5],
    pub comments: Vec<String>,
}

impl SurveySummary {
    pub fn from_responses(course_id: CourseId, responses: &[SurveyResponse]) -> Self {
        let mut distribution = [0u32; 5];
        let mut total = 0u32;
        for response in responses {
            distribution[usize::from(response.rating - MIN_RATING)] += 1;
            total += u32::from(response.rating);
        }
        let count = responses.len() as u32;
        let average_rating = (count > 0).then(|| f64::from(total) / f64::from(count));
        Self {
            course_id,
            responses: count,
            average_rating,
            distribution,
            comments: responses.iter().filter_map(|r| r.comment.clone()).collect(),
        }
    }
}
