use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum_extra::extract::cookie::CookieJar;

use super::ApiError;
use crate::domain::account::ports::Database;
use crate::inbound::http::middleware::RequestContext;
use crate::inbound::http::router::AppState;

pub async fn logout<D: Database>(
    State(state): State<AppState<D>>,
    Extension(context): Extension<RequestContext<D>>,
    jar: CookieJar,
) -> Result<(CookieJar, StatusCode), ApiError> {
    state
        .account_service
        .logout(&context.db, context.session.as_ref())
        .await?;

    Ok((
        state.cookies.delete_session_token_cookie(jar),
        StatusCode::NO_CONTENT,
    ))
}
