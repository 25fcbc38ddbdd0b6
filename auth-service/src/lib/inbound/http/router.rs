use std::sync::Arc;
use std::time::Duration;

use auth::Authenticator;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::content::admin_content;
use super::handlers::content::user_content;
use super::handlers::sign_in::sign_in;
use super::handlers::sign_up::sign_up;
use super::middleware::guard;
use super::middleware::GuardState;
use super::middleware::RouteAccess;
use crate::domain::user::models::Role;
use crate::domain::user::ports::AuthenticationServicePort;

#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthenticationServicePort>,
}

pub fn create_router(
    auth_service: Arc<dyn AuthenticationServicePort>,
    authenticator: Arc<Authenticator>,
) -> Router {
    let state = AppState { auth_service };

    let public_routes = Router::new()
        .route("/api/auth/signup", post(sign_up))
        .route("/api/auth/signin", post(sign_in));

    let user_routes = Router::new()
        .route("/api/test/user", get(user_content))
        .route_layer(middleware::from_fn_with_state(
            GuardState::new(Arc::clone(&authenticator), RouteAccess::Authenticated),
            guard,
        ));

    let admin_routes = Router::new()
        .route("/api/test/admin", get(admin_content))
        .route_layer(middleware::from_fn_with_state(
            GuardState::new(authenticator, RouteAccess::Role(Role::Admin)),
            guard,
        ));

    // Headers are left out of the span so bearer tokens never reach the logs.
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(user_routes)
        .merge(admin_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
