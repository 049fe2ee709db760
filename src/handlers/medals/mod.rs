//! Medal handlers

mod handler;
pub mod response;

pub use handler::*;
pub use response::*;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

/// Medal routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(handler::my_medals))
        .route("/user/{user_id}", get(handler::user_medals))
        .route("/tournament/{id}", get(handler::tournament_medals))
        .route("/tournament/{id}/award", post(handler::award_medals))
}
