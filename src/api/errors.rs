use crate::db::RepositoryError;
use actix_web::error::JsonPayloadError;
use actix_web::http::StatusCode;
use actix_web::{Error, HttpRequest, HttpResponse, ResponseError};
use log::error;
use serde::Serialize;
use utoipa::ToSchema;

/// Wire shape of every failure; `code` is the machine-readable kind clients
/// dispatch on.
#[derive(Serialize, ToSchema)]
pub struct ErrorBody {
    pub status: String,
    pub code: String,
    pub error: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    BadInput(String),
    #[error("Cart is empty")]
    EmptyCart,
    #[error("No delivery person available")]
    NoCourierAvailable,
    #[error("internal server error")]
    Internal,
}

impl ApiError {
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::Forbidden(_) => "FORBIDDEN",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::BadInput(_) => "BAD_USER_INPUT",
            ApiError::EmptyCart => "EMPTY_CART",
            ApiError::NoCourierAvailable => "NO_DELIVERY_PERSON_AVAILABLE",
            ApiError::Internal => "INTERNAL_SERVER_ERROR",
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadInput(_) | ApiError::EmptyCart | ApiError::NoCourierAvailable => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody {
            status: "error".to_string(),
            code: self.code().to_string(),
            error: self.to_string(),
        })
    }
}

impl From<RepositoryError> for ApiError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::NotFound(msg) => ApiError::NotFound(msg),
            RepositoryError::Forbidden(msg) => ApiError::Forbidden(msg),
            RepositoryError::ValidationError(msg) => ApiError::BadInput(msg),
            RepositoryError::EmptyCart => ApiError::EmptyCart,
            RepositoryError::NoCourierAvailable => ApiError::NoCourierAvailable,
            RepositoryError::InvalidCredentials => {
                ApiError::Unauthorized("Invalid credentials".to_string())
            }
            // Store diagnostics stay in the logs, never in the response.
            RepositoryError::DatabaseError(err) => {
                error!("database error: {}", err);
                ApiError::Internal
            }
            RepositoryError::ConnectionPoolError(err) => {
                error!("connection pool error: {}", err);
                ApiError::Internal
            }
            RepositoryError::Internal(msg) => {
                error!("internal error: {}", msg);
                ApiError::Internal
            }
        }
    }
}

pub fn default_error_handler(err: JsonPayloadError, req: &HttpRequest) -> Error {
    error!("Error in request: {} \n Error: {}", req.full_url(), err);
    ApiError::BadInput("malformed request body".to_string()).into()
}
