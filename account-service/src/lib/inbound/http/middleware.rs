use axum::extract::Request;
use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use axum_extra::extract::cookie::CookieJar;

use super::cookies::SESSION_COOKIE_NAME;
use crate::domain::account::ports::Database;
use crate::domain::session::models::Session;
use crate::domain::user::models::User;
use crate::inbound::http::router::AppState;

/// Per-request view of the caller, built once by [`resolve_request_context`].
#[derive(Clone)]
pub struct RequestContext<D: Database> {
    pub db: D,
    pub session: Option<Session>,
    pub user: Option<User>,
}

impl<D: Database> RequestContext<D> {
    pub fn anonymous(db: D) -> Self {
        Self {
            db,
            session: None,
            user: None,
        }
    }
}

/// Middleware that resolves the session cookie into a [`RequestContext`].
///
/// Never rejects a request: a missing, unknown or expired token leaves the
/// context anonymous, and a storage failure is logged and treated the same
/// way with the cookie left untouched. A valid session re-sets the cookie so
/// renewals reach the client; a rejected one clears it. Handlers that write
/// the session cookie themselves take precedence.
pub async fn resolve_request_context<D: Database>(
    State(state): State<AppState<D>>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Response {
    let mut context = RequestContext::anonymous(state.database.clone());
    let mut cookie_update = None;

    if let Some(token) = state.cookies.session_token(&jar) {
        match state
            .account_service
            .session_manager()
            .validate_session_token(&context.db, &token)
            .await
        {
            Ok(Some(validated)) => {
                cookie_update = Some(state.cookies.set_session_token_cookie(
                    CookieJar::new(),
                    &token,
                    validated.session.expires_at,
                ));
                context.session = Some(validated.session);
                context.user = Some(validated.user);
            }
            Ok(None) => {
                cookie_update = Some(state.cookies.delete_session_token_cookie(CookieJar::new()));
            }
            Err(e) => {
                tracing::warn!(error = %e, "Session validation failed, continuing anonymously");
            }
        }
    }

    req.extensions_mut().insert(context);

    let response = next.run(req).await;

    match cookie_update {
        Some(update) if !writes_session_cookie(&response) => (update, response).into_response(),
        _ => response,
    }
}

fn writes_session_cookie(response: &Response) -> bool {
    let prefix = format!("{}=", SESSION_COOKIE_NAME);
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .any(|value| value.starts_with(&prefix))
}
