//! HTTP error mapping.

use axum::{
    extract::{rejection::JsonRejection, FromRequest},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use tracing::error;
use vetclinic_core::ClinicError;

/// Body returned to callers on any 500.
pub const SERVER_ERROR: &str = "Error en el servidor";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    /// Detail is logged, never sent.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ClinicError> for ApiError {
    fn from(e: ClinicError) -> Self {
        match e {
            ClinicError::Validation(message) => ApiError::BadRequest(message),
            ClinicError::NotFound(message) => ApiError::NotFound(message),
            ClinicError::Auth(message) => ApiError::Unauthorized(message),
            ClinicError::Token(_) => ApiError::Unauthorized("Sesión inválida".into()),
            internal => ApiError::Internal(internal.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(format!("JSON inválido: {}", rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            ApiError::Internal(detail) => {
                error!(%detail, "Request failed");
                SERVER_ERROR.to_string()
            }
            ApiError::BadRequest(m) | ApiError::Unauthorized(m) | ApiError::NotFound(m) => m,
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// `Json` extractor whose rejections answer `{"error": ...}` with 400.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

#[derive(Debug, Serialize)]
pub struct MessageBody {
    pub message: String,
}

pub fn message(text: impl Into<String>) -> Json<MessageBody> {
    Json(MessageBody {
        message: text.into(),
    })
}

/// Parse a path id, answering 400 for anything but an integer.
pub fn parse_id(raw: &str) -> ApiResult<i64> {
    raw.parse()
        .map_err(|_| ApiError::BadRequest("ID inválido".into()))
}
