use std::fmt;

use axum::extract::rejection::FormRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Serialize;

use crate::domain::account::errors::AccountError;
use crate::domain::user::models::User;

pub mod current_session;
pub mod list_users;
pub mod login;
pub mod logout;
pub mod register;

/// Message returned for every failure the client cannot act on.
pub const GENERIC_ERROR_MESSAGE: &str = "An error has occurred, please try again later.";

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<ApiResponseBody<T>>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(ApiResponseBody::new(status, data)))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Internal detail; logged, never sent to the client.
    InternalServerError(String),
    Validation(ValidationErrors),
    Conflict(String),
    Unauthorized(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, issues) = match self {
            ApiError::InternalServerError(detail) => {
                tracing::error!(error = %detail, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    GENERIC_ERROR_MESSAGE.to_string(),
                    None,
                )
            }
            ApiError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                errors.to_string(),
                Some(errors.into_issues()),
            ),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg, None),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg, None),
        };

        (status, Json(ApiErrorBody::new(status, message, issues))).into_response()
    }
}

impl From<AccountError> for ApiError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::InvalidCredentials | AccountError::Unauthenticated => {
                ApiError::Unauthorized(err.to_string())
            }
            AccountError::UsernameAlreadyExists => ApiError::Conflict(err.to_string()),
            AccountError::Hashing(_) | AccountError::User(_) | AccountError::Session(_) => {
                ApiError::InternalServerError(err.to_string())
            }
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::Validation(errors)
    }
}

/// Body that is not a readable form: wrong content type or undecodable fields.
impl From<FormRejection> for ApiError {
    fn from(rejection: FormRejection) -> Self {
        ApiError::Validation(ValidationErrors(vec![FieldIssue {
            field: "form",
            message: rejection.body_text(),
        }]))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    status_code: u16,
    data: T,
}

impl<T: Serialize + PartialEq> ApiResponseBody<T> {
    pub fn new(status_code: StatusCode, data: T) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorBody {
    status_code: u16,
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    issues: Option<Vec<FieldIssue>>,
}

impl ApiErrorBody {
    pub fn new(status_code: StatusCode, error: String, issues: Option<Vec<FieldIssue>>) -> Self {
        Self {
            status_code: status_code.as_u16(),
            error,
            issues,
        }
    }
}

/// A rejected form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldIssue {
    pub field: &'static str,
    pub message: String,
}

/// Every field error of one request, collected before any storage access.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldIssue>);

impl ValidationErrors {
    /// Record the error of `result` against `field`, passing the value through.
    pub fn check<T, E: fmt::Display>(
        &mut self,
        field: &'static str,
        result: Result<T, E>,
    ) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                self.0.push(FieldIssue {
                    field,
                    message: e.to_string(),
                });
                None
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn issues(&self) -> &[FieldIssue] {
        &self.0
    }

    pub fn into_issues(self) -> Vec<FieldIssue> {
        self.0
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.first() {
            Some(issue) => f.write_str(&issue.message),
            None => f.write_str("Invalid input"),
        }
    }
}

/// Public view of a user. The password hash never leaves the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserData {
    pub id: String,
    pub username: String,
}

impl From<&User> for UserData {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username.as_str().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::session::errors::SessionError;
    use crate::user::errors::UserError;

    #[test]
    fn test_account_errors_map_to_status() {
        let cases = [
            (AccountError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (AccountError::Unauthenticated, StatusCode::UNAUTHORIZED),
            (AccountError::UsernameAlreadyExists, StatusCode::CONFLICT),
            (
                AccountError::User(UserError::DatabaseError("down".to_string())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                AccountError::Session(SessionError::DatabaseError("down".to_string())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(ApiError::from(err).into_response().status(), status);
        }
    }

    #[test]
    fn test_internal_error_hides_detail() {
        let body = ApiErrorBody::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            GENERIC_ERROR_MESSAGE.to_string(),
            None,
        );
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["status_code"], 500);
        assert_eq!(json["error"], GENERIC_ERROR_MESSAGE);
        assert!(json.get("issues").is_none());
    }

    #[test]
    fn test_validation_errors_collect_every_field() {
        let mut errors = ValidationErrors::default();
        let ok: Option<u8> = errors.check("username", Ok::<u8, String>(1));
        let first: Option<u8> = errors.check("username", Err("too short"));
        let second: Option<u8> = errors.check("password", Err("too long"));

        assert_eq!(ok, Some(1));
        assert!(first.is_none() && second.is_none());
        assert_eq!(errors.issues().len(), 2);
        assert_eq!(errors.issues()[1].field, "password");
        assert_eq!(errors.to_string(), "too short");
    }

    #[test]
    fn test_user_data_omits_password_hash() {
        let user = User {
            id: crate::domain::user::models::UserId::from_string("abc"),
            username: crate::domain::user::models::Username::new("alice".to_string()).unwrap(),
            password_hash: "salt:key".to_string(),
        };

        let json = serde_json::to_value(UserData::from(&user)).unwrap();

        assert_eq!(json, serde_json::json!({"id": "abc", "username": "alice"}));
    }
}
