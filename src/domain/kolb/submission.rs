//! Stored Kolb test attempt.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Timestamp, UserId};

use super::{AnswerMatrix, KolbScores, LearningProfile};

/// The latest Kolb test a student submitted.
///
/// There is at most one per student; a new attempt replaces the old one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KolbSubmission {
    pub student_id: UserId,
    pub answers: AnswerMatrix,
    pub scores: KolbScores,
    pub profile: LearningProfile,
    pub submitted_at: Timestamp,
}

impl KolbSubmission {
    pub fn new(student_id: UserId, answers: AnswerMatrix, profile: LearningProfile) -> Self {
        let scores = KolbScores::from_matrix(&answers);
        Self {
            student_id,
            answers,
            scores,
            profile,
            submitted_at: Timestamp::now(),
        }
    }
}
