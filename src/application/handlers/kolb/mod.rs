//! Kolb test handlers.

mod get_kolb_result;

pub use get_kolb_result::GetKolbResultHandler;
pub use submit_kolb_test::{SubmitKolbTestCommand, SubmitKolbTestHandler};
