use std::collections::BTreeSet;
use std::sync::Arc;

use auth::Authenticator;
use axum::extract::Request;
use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;
use chrono::Utc;

use super::handlers::ApiError;
use crate::domain::user::models::Role;

/// Access rule attached to a group of routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteAccess {
    /// Any valid token is accepted.
    Authenticated,
    /// The token must carry this role.
    Role(Role),
}

impl RouteAccess {
    pub fn required_role(&self) -> Option<&'static str> {
        match self {
            RouteAccess::Authenticated => None,
            RouteAccess::Role(role) => Some(role.as_str()),
        }
    }
}

/// State handed to [`guard`] for one route group.
#[derive(Clone)]
pub struct GuardState {
    authenticator: Arc<Authenticator>,
    access: RouteAccess,
}

impl GuardState {
    pub fn new(authenticator: Arc<Authenticator>, access: RouteAccess) -> Self {
        Self {
            authenticator,
            access,
        }
    }
}

/// Extension type to store the authenticated principal in request extensions
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub username: String,
    pub roles: BTreeSet<String>,
}

/// Middleware that validates the bearer token and enforces the route's access rule.
///
/// Missing or invalid tokens get 401. A valid token without the required role gets 403.
pub async fn guard(
    State(state): State<GuardState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_token_from_header(&req)?;

    let claims = state
        .authenticator
        .validate_token(token, Utc::now())
        .map_err(|e| {
            let subject = state.authenticator.parse_subject(token).ok();
            tracing::warn!(reason = %e, subject = ?subject, "Token rejected");
            ApiError::Unauthorized("Invalid or expired token".to_string())
        })?;

    let required_role = state.access.required_role();
    if !auth::authorize(&claims.roles, required_role) {
        tracing::warn!(
            username = %claims.sub,
            required_role = ?required_role,
            "Access denied"
        );
        return Err(ApiError::Forbidden("Access denied".to_string()));
    }

    req.extensions_mut().insert(AuthenticatedUser {
        username: claims.sub,
        roles: claims.roles,
    });

    Ok(next.run(req).await)
}

fn extract_token_from_header(req: &Request) -> Result<&str, ApiError> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?;

    let value = header
        .to_str()
        .map_err(|_| ApiError::Unauthorized("Invalid Authorization header".to_string()))?;

    match value.split_once(' ') {
        Some((scheme, token))
            if scheme.eq_ignore_ascii_case("Bearer") && !token.trim().is_empty() =>
        {
            Ok(token.trim())
        }
        _ => Err(ApiError::Unauthorized(
            "Invalid Authorization header format. Expected: Bearer <token>".to_string(),
        )),
    }
}
