use axum::extract::State;
use axum::response::Redirect;
use axum::Extension;
use axum::Form;
use axum_extra::extract::cookie::CookieJar;
use axum_extra::extract::WithRejection;
use serde::Deserialize;
use thiserror::Error;

use super::ApiError;
use super::ValidationErrors;
use crate::domain::account::models::LoginCommand;
use crate::domain::account::models::DEFAULT_LOGIN_REDIRECT;
use crate::domain::account::ports::Database;
use crate::domain::user::models::Password;
use crate::domain::user::models::Username;
use crate::inbound::http::middleware::RequestContext;
use crate::inbound::http::router::AppState;

pub async fn login<D: Database>(
    State(state): State<AppState<D>>,
    Extension(context): Extension<RequestContext<D>>,
    jar: CookieJar,
    WithRejection(Form(body), _): WithRejection<Form<LoginRequest>, ApiError>,
) -> Result<(CookieJar, Redirect), ApiError> {
    let command = body.try_into_command()?;

    let issued = state.account_service.login(&context.db, &command).await?;

    let jar = state
        .cookies
        .set_session_token_cookie(jar, &issued.token, issued.session.expires_at);

    Ok((jar, Redirect::to(&command.redirect_to)))
}

/// HTTP form body for logging in (raw, unvalidated)
#[derive(Clone, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
    #[serde(default, rename = "redirectTo")]
    redirect_to: Option<String>,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RedirectTargetError {
    #[error("Redirect target must be a path on this site")]
    NotLocal,
}

impl LoginRequest {
    fn try_into_command(self) -> Result<LoginCommand, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let username = errors.check("username", Username::new(self.username));
        let password = errors.check("password", Password::new(self.password));
        let redirect_to = errors.check("redirectTo", parse_redirect_target(self.redirect_to));

        match (username, password, redirect_to) {
            (Some(username), Some(password), Some(redirect_to)) => Ok(LoginCommand {
                username,
                password,
                redirect_to,
            }),
            _ => Err(errors),
        }
    }
}

/// Accept only same-origin absolute paths. Empty means the default landing page.
fn parse_redirect_target(target: Option<String>) -> Result<String, RedirectTargetError> {
    match target.filter(|target| !target.is_empty()) {
        None => Ok(DEFAULT_LOGIN_REDIRECT.to_string()),
        Some(target)
            if target.starts_with('/')
                && !target.starts_with("//")
                && target.chars().all(|c| c.is_ascii_graphic() && c != '\\') =>
        {
            Ok(target)
        }
        Some(_) => Err(RedirectTargetError::NotLocal),
    }
}
