use axum::{
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Resource error envelope: the status code repeats in the body so browser
/// clients never have to read it off the transport.
#[derive(Serialize, Debug)]
pub struct ErrorBody {
    pub success: bool,
    pub error: u16,
    pub message: String,
}

#[derive(Debug)]
pub enum ApiError {
    NotFound { resource: &'static str },
    BadRequest { message: String },
    Unprocessable,
    Internal { message: Option<String> },
}

impl ApiError {
    pub fn not_found(resource: &'static str) -> Self {
        Self::NotFound { resource }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    pub fn internal<E: std::fmt::Display>(e: E) -> Self {
        Self::Internal {
            message: Some(e.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, error_code) = match self {
            ApiError::NotFound { resource } => (
                StatusCode::NOT_FOUND,
                format!("{resource} not found"),
                "not_found",
            ),
            ApiError::BadRequest { message } => (StatusCode::BAD_REQUEST, message, "bad_request"),
            ApiError::Unprocessable => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "unprocessable".to_string(),
                "unprocessable",
            ),
            ApiError::Internal { message } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                message.unwrap_or_else(|| "internal server error".to_string()),
                "internal_error",
            ),
        };

        let body = ErrorBody {
            success: false,
            error: status.as_u16(),
            message,
        };
        let mut resp = (status, Json(body)).into_response();
        if let Ok(val) = HeaderValue::from_str(error_code) {
            resp.headers_mut().insert("X-Error-Code", val);
        }
        resp
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
