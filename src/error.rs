//! Error types for the clients and contracts service.
//!
//! `ContractsError` is what the data layer returns. `ApiError` is what handlers return and
//! renders as an `application/problem+json` document.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use thiserror::Error;

use crate::validation::ValidationError;

/// Main error type for client and contract operations.
#[derive(Error, Debug)]
pub enum ContractsError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] diesel::result::Error),

    /// Connection pool errors
    #[error("Connection pool error: {0}")]
    Pool(String),

    #[error("Client with id {0} was not found.")]
    ClientNotFound(i64),

    #[error("Contract with id {0} was not found.")]
    ContractNotFound(i64),

    /// Business rule violations (the message is shown to the caller)
    #[error("{0}")]
    Validation(String),

    /// Internal error (unexpected)
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error type for API operations (converts to HTTP responses).
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation failed: {}", first_message(.0))]
    Validation(Vec<ValidationError>),

    #[error("Malformed request body: {0}")]
    MalformedBody(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Internal server error: {0}")]
    InternalServerError(String),
}

fn first_message(errors: &[ValidationError]) -> &str {
    errors
        .first()
        .map(|e| e.message.as_str())
        .unwrap_or("Request is invalid.")
}

impl ApiError {
    fn title(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "Bad Request",
            ApiError::NotFound(_) => "Not Found",
            ApiError::Validation(_) => "Validation Failed",
            ApiError::MalformedBody(_) => "Malformed Request Body",
            ApiError::ServiceUnavailable(_) => "Service Unavailable",
            ApiError::InternalServerError(_) => "Internal Server Error",
        }
    }

    fn detail(&self) -> &str {
        match self {
            ApiError::BadRequest(d)
            | ApiError::NotFound(d)
            | ApiError::MalformedBody(d)
            | ApiError::ServiceUnavailable(d)
            | ApiError::InternalServerError(d) => d,
            ApiError::Validation(errors) => first_message(errors),
        }
    }

    /// The RFC 7807 body for this error.
    pub fn problem(&self) -> serde_json::Value {
        let mut body = serde_json::json!({
            "type": "about:blank",
            "title": self.title(),
            "status": self.status_code().as_u16(),
            "detail": self.detail(),
        });
        if let ApiError::Validation(errors) = self {
            body["errors"] = serde_json::json!(
                errors
                    .iter()
                    .map(|e| serde_json::json!({ "field": e.field, "message": e.message }))
                    .collect::<Vec<_>>()
            );
        }
        body
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::Validation(_) | ApiError::MalformedBody(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .content_type("application/problem+json")
            .body(self.problem().to_string())
    }
}

impl From<ContractsError> for ApiError {
    fn from(err: ContractsError) -> Self {
        match err {
            ContractsError::ClientNotFound(_) | ContractsError::ContractNotFound(_) => {
                ApiError::NotFound(err.to_string())
            }
            ContractsError::Validation(message) => ApiError::BadRequest(message),
            ContractsError::Database(e) => {
                log::error!("Database error: {}", e);
                ApiError::InternalServerError("Database error".to_string())
            }
            ContractsError::Pool(e) => {
                log::error!("Pool error: {}", e);
                ApiError::ServiceUnavailable("Database connection unavailable".to_string())
            }
            ContractsError::Internal(e) => {
                log::error!("Internal error: {}", e);
                ApiError::InternalServerError("Internal server error".to_string())
            }
        }
    }
}

impl From<Vec<ValidationError>> for ApiError {
    fn from(errors: Vec<ValidationError>) -> Self {
        ApiError::Validation(errors)
    }
}

/// Result type alias for data-layer operations.
pub type ContractsResult<T> = Result<T, ContractsError>;

/// Result type alias for API operations.
pub type ApiResult<T> = Result<T, ApiError>;
