//! Sample protected resources used to exercise the access guard.
use axum::Extension;

use crate::inbound::http::middleware::AuthenticatedUser;

pub const USER_CONTENT: &str = "User content";
pub const ADMIN_CONTENT: &str = "Admin content";

pub async fn user_content(Extension(user): Extension<AuthenticatedUser>) -> &'static str {
    tracing::debug!(username = %user.username, "Serving user content");
    USER_CONTENT
}

pub async fn admin_content(Extension(user): Extension<AuthenticatedUser>) -> &'static str {
    tracing::debug!(username = %user.username, "Serving admin content");
    ADMIN_CONTENT
}
