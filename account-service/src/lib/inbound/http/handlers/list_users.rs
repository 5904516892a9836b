use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::domain::account::ports::Database;
use crate::inbound::http::middleware::RequestContext;
use crate::inbound::http::router::AppState;

pub async fn list_users<D: Database>(
    State(state): State<AppState<D>>,
    Extension(context): Extension<RequestContext<D>>,
) -> Result<ApiSuccess<Vec<UserData>>, ApiError> {
    state
        .account_service
        .list_users(&context.db)
        .await
        .map_err(ApiError::from)
        .map(|users| ApiSuccess::new(StatusCode::OK, users.iter().map(UserData::from).collect()))
}
