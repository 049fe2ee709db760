//! Tournament handlers

mod handler;
pub mod request;
pub mod response;

pub use handler::*;
pub use request::*;
pub use response::*;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::state::AppState;

/// Tournament routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handler::list_tournaments).post(handler::create_tournament),
        )
        .route(
            "/{id}",
            get(handler::get_tournament).put(handler::update_tournament),
        )
        .route("/{id}/open", post(handler::open_tournament))
        .route("/{id}/start", post(handler::start_tournament))
        .route("/{id}/complete", post(handler::complete_tournament))
        .route("/{id}/activate", post(handler::activate_tournament))
        .route("/{id}/deactivate", post(handler::deactivate_tournament))
        .route("/{id}/participants", get(handler::list_participants))
        .route(
            "/{id}/participants/{user_id}",
            delete(handler::remove_participant),
        )
        .route("/{id}/invitations", get(handler::list_invitations))
        .route("/{id}/invite/{user_id}", post(handler::invite_user))
        .route("/{id}/leaderboard", get(handler::leaderboard))
        .route("/{id}/stats", get(handler::stats))
}
