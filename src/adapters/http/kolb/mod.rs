//! Kolb test HTTP adapter.

mod handlers;
mod routes;

pub use handlers::{handle_kolb_error, KolbApiError, KolbResultResponse, SubmitKolbRequest};
pub use routes::kolb_routes;
