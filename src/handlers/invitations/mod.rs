//! Invitation handlers (invitee side)

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

/// Invitation routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/mine", get(handler::my_invitations))
        .route("/{id}/respond", post(handler::respond_to_invitation))
}
