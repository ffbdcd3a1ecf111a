//! `{success, message, ...}` envelopes and error-to-status mapping

use crate::repository::RepositoryError;
use crate::services::ServiceError;
use crate::users::UserError;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Map, Value};
use tracing::error;

/// Errors surfaced to HTTP clients
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(m)
            | ApiError::NotFound(m)
            | ApiError::Conflict(m)
            | ApiError::Internal(m) => m,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            // Internal details stay in the log
            ApiError::Internal(detail) => {
                error!("Request failed: {}", detail);
                "Internal server error".to_string()
            }
            other => other.message().to_string(),
        };
        (status, Json(json!({ "success": false, "message": message }))).into_response()
    }
}

impl From<RepositoryError> for ApiError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::Validation(m) => ApiError::BadRequest(m),
            RepositoryError::NotFound(uid) => {
                ApiError::NotFound(format!("Initiative not found: {}", uid))
            }
            RepositoryError::Conflict(uid) => {
                ApiError::Conflict(format!("Initiative already exists: {}", uid))
            }
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<UserError> for ApiError {
    fn from(e: UserError) -> Self {
        match e {
            UserError::Validation(m) => ApiError::BadRequest(m),
            UserError::NotFound(id) => ApiError::NotFound(format!("User not found: {}", id)),
            UserError::Conflict(email) => {
                ApiError::Conflict(format!("Email already registered: {}", email))
            }
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::NotFound(id) => ApiError::NotFound(format!("Not found: {}", id)),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

pub type ApiResult = Result<(StatusCode, Json<Value>), ApiError>;

/// Success envelope. Object payload fields are merged next to `success` and
/// `message`.
pub fn envelope(status: StatusCode, message: impl Into<String>, payload: Value) -> ApiResult {
    let mut body = Map::new();
    body.insert("success".to_string(), Value::Bool(true));
    body.insert("message".to_string(), Value::String(message.into()));
    if let Value::Object(fields) = payload {
        body.extend(fields);
    }
    Ok((status, Json(Value::Object(body))))
}

pub fn ok(message: impl Into<String>, payload: Value) -> ApiResult {
    envelope(StatusCode::OK, message, payload)
}

/// Unwrap a JSON body, turning malformed input into a 400
pub fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload.map(|Json(value)| value).map_err(ApiError::from)
}

pub fn to_value<T: serde::Serialize>(value: &T) -> Result<Value, ApiError> {
    serde_json::to_value(value).map_err(|e| ApiError::Internal(e.to_string()))
}
