//! Kolb learning-style test.
//!
//! A student ranks four options for each of twelve questions. The resulting
//! [`AnswerMatrix`] is classified into a [`LearningProfile`] that is stored on
//! the student's role record.

mod answer_matrix;
mod classifier;
mod errors;
mod profile;
mod submission;

pub use answer_matrix::{AnswerMatrix, OPTION_COUNT, QUESTION_COUNT, ROW_SUM};
pub use classifier::{classify, classify_with, KolbScores};
pub use errors::KolbError;
pub use profile::LearningProfile;
pub use submission::KolbSubmission;
