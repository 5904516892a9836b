use axum::http::StatusCode;
use axum::Extension;
use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::domain::account::errors::AccountError;
use crate::domain::account::ports::Database;
use crate::inbound::http::middleware::RequestContext;

/// Who the session cookie belongs to, and until when.
pub async fn current_session<D: Database>(
    Extension(context): Extension<RequestContext<D>>,
) -> Result<ApiSuccess<CurrentSessionResponseData>, ApiError> {
    match (&context.user, &context.session) {
        (Some(user), Some(session)) => Ok(ApiSuccess::new(
            StatusCode::OK,
            CurrentSessionResponseData {
                user: user.into(),
                expires_at: session.expires_at,
            },
        )),
        _ => Err(AccountError::Unauthenticated.into()),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrentSessionResponseData {
    pub user: UserData,
    pub expires_at: DateTime<Utc>,
}
