//! Authentication middleware
//!
//! The middleware never rejects. It resolves the `Authorization` header
//! into either an [`AuthenticatedUser`] or a [`CredentialRejection`] and
//! stores that in the request extensions; handlers that need an acting user
//! take [`AuthenticatedUser`], which turns a missing or bad credential into
//! the matching 401. Public routes ignore the header entirely.

use axum::{
    body::Body,
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{error::AppError, services::AuthService, state::AppState};

/// Authenticated user extracted from JWT.
///
/// Carries identity only; permissions are always looked up in the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub id: i64,
    pub username: String,
}

/// Why a supplied credential could not be turned into a user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialRejection {
    /// Header present but not `Bearer <token>`
    Malformed,
    Invalid,
    Expired,
}

impl From<CredentialRejection> for AppError {
    fn from(rejection: CredentialRejection) -> Self {
        match rejection {
            CredentialRejection::Malformed => AppError::Unauthorized,
            CredentialRejection::Invalid => AppError::InvalidToken,
            CredentialRejection::Expired => AppError::TokenExpired,
        }
    }
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthenticatedUser>() {
            return Ok(user.clone());
        }

        Err(parts
            .extensions
            .get::<CredentialRejection>()
            .map_or(AppError::Unauthorized, |rejection| (*rejection).into()))
    }
}

/// Authentication middleware
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let Some(auth_header) = request.headers().get(AUTHORIZATION) else {
        return next.run(request).await;
    };

    let path = request.uri().path().to_string();
    let header = auth_header.to_str().ok().map(str::to_owned);

    match resolve(header.as_deref(), &state.config().jwt.secret) {
        Ok(user) => {
            debug!(path = %path, user_id = user.id, username = %user.username, "User authenticated");
            request.extensions_mut().insert(user);
        }
        Err(rejection) => {
            debug!(path = %path, ?rejection, "Credential not accepted");
            request.extensions_mut().insert(rejection);
        }
    }

    next.run(request).await
}

fn resolve(header: Option<&str>, secret: &str) -> Result<AuthenticatedUser, CredentialRejection> {
    let token = header
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or(CredentialRejection::Malformed)?;

    let claims = AuthService::verify_token(token, secret).map_err(|e| match e {
        AppError::TokenExpired => CredentialRejection::Expired,
        _ => CredentialRejection::Invalid,
    })?;

    let id = claims
        .sub
        .parse()
        .map_err(|_| CredentialRejection::Invalid)?;

    Ok(AuthenticatedUser {
        id,
        username: claims.username,
    })
}
