use axum::response::{IntoResponse, Response};
use common_auth::AuthError;
use common_http_errors::ApiError;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Handler-level error. Authorization failures keep the guard's
/// `{code, description}` envelope; everything else speaks the resource
/// envelope.
#[derive(Debug)]
pub enum ServiceError {
    Auth(AuthError),
    Api(ApiError),
}

impl From<AuthError> for ServiceError {
    fn from(err: AuthError) -> Self {
        Self::Auth(err)
    }
}

impl From<ApiError> for ServiceError {
    fn from(err: ApiError) -> Self {
        Self::Api(err)
    }
}

impl From<sqlx::Error> for ServiceError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => Self::Api(ApiError::not_found("drink")),
            sqlx::Error::Database(db)
                if matches!(db.kind(), sqlx::error::ErrorKind::UniqueViolation) =>
            {
                Self::Api(ApiError::Unprocessable)
            }
            _ => Self::Api(ApiError::internal(err)),
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        match self {
            Self::Auth(err) => err.into_response(),
            Self::Api(err) => err.into_response(),
        }
    }
}
