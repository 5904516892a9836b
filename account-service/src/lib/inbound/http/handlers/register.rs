use axum::extract::State;
use axum::response::Redirect;
use axum::Extension;
use axum::Form;
use axum_extra::extract::cookie::CookieJar;
use axum_extra::extract::WithRejection;
use serde::Deserialize;

use super::ApiError;
use super::ValidationErrors;
use crate::domain::account::models::RegisterCommand;
use crate::domain::account::models::REGISTER_REDIRECT;
use crate::domain::account::ports::Database;
use crate::domain::user::models::Password;
use crate::domain::user::models::Username;
use crate::inbound::http::middleware::RequestContext;
use crate::inbound::http::router::AppState;

pub async fn register<D: Database>(
    State(state): State<AppState<D>>,
    Extension(context): Extension<RequestContext<D>>,
    jar: CookieJar,
    WithRejection(Form(body), _): WithRejection<Form<RegisterRequest>, ApiError>,
) -> Result<(CookieJar, Redirect), ApiError> {
    let command = body.try_into_command()?;

    let issued = state
        .account_service
        .register(&context.db, command)
        .await?;

    let jar = state
        .cookies
        .set_session_token_cookie(jar, &issued.token, issued.session.expires_at);

    Ok((jar, Redirect::to(REGISTER_REDIRECT)))
}

/// HTTP form body for registering (raw, unvalidated)
#[derive(Clone, Default, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

impl RegisterRequest {
    fn try_into_command(self) -> Result<RegisterCommand, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let username = errors.check("username", Username::new(self.username));
        let password = errors.check("password", Password::new(self.password));

        match (username, password) {
            (Some(username), Some(password)) => Ok(RegisterCommand { username, password }),
            _ => Err(errors),
        }
    }
}
