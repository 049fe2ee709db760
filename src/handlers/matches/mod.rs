//! Match handlers

mod handler;
pub mod request;
pub mod response;

pub use handler::*;
pub use request::*;
pub use response::*;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

/// Match routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::list_matches).post(handler::create_match))
        .route("/pending-verification", get(handler::pending_verification))
        .route("/{id}", get(handler::get_match))
        .route("/{id}/verify", post(handler::verify_match))
        .route("/{id}/reject", post(handler::reject_match))
        .route("/{id}/verification-status", get(handler::verification_status))
}
