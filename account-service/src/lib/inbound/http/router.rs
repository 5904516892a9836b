use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::cookies::SessionCookies;
use super::handlers::current_session::current_session;
use super::handlers::list_users::list_users;
use super::handlers::login::login;
use super::handlers::logout::logout;
use super::handlers::register::register;
use super::middleware::resolve_request_context;
use crate::domain::account::ports::Database;
use crate::domain::account::service::AccountService;

pub struct AppState<D: Database> {
    pub database: D,
    pub account_service: Arc<AccountService>,
    pub cookies: SessionCookies,
}

impl<D: Database> Clone for AppState<D> {
    fn clone(&self) -> Self {
        Self {
            database: self.database.clone(),
            account_service: Arc::clone(&self.account_service),
            cookies: self.cookies,
        }
    }
}

pub fn create_router<D: Database>(
    database: D,
    account_service: Arc<AccountService>,
    cookies: SessionCookies,
) -> Router {
    let state = AppState {
        database,
        account_service,
        cookies,
    };

    let auth_routes = Router::new()
        .route("/login", post(login::<D>))
        .route("/register", post(register::<D>))
        .route("/logout", post(logout::<D>));

    let api_routes = Router::new()
        .route("/api/users", get(list_users::<D>))
        .route("/api/session", get(current_session::<D>));

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
        .merge(auth_routes)
        .merge(api_routes)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            resolve_request_context::<D>,
        ))
        .layer(trace_layer)
        .with_state(state)
}
