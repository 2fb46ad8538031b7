//! Survey handlers.

mod get_survey_summary;
mod submit_survey;

pub use get_survey_summary::GetSurveySummaryHandler;
pub use submit_survey::{SubmitSurveyCommand, SubmitSurveyHandler};
