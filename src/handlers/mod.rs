//! HTTP Request Handlers
//!
//! This module contains all HTTP request handlers organized by domain.

pub mod auth;
pub mod health;
pub mod invitations;
pub mod matches;
pub mod medals;
pub mod roles;
pub mod tournaments;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Create all API routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .nest("/auth", auth::routes())
        .nest("/users", users::routes())
        .nest("/roles", roles::routes())
        .nest("/permissions", roles::permission_routes())
        .nest("/matches", matches::routes())
        .nest("/tournaments", tournaments::routes())
        .nest("/invitations", invitations::routes())
        .nest("/medals", medals::routes())
}
