//! Course satisfaction surveys.

mod errors;
mod response;

pub use errors::SurveyError;
pub use response::{SurveyResponse, SurveySummary, MAX_COMMENT_LENGTH, MAX_RATING, MIN_RATING};
