use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use derive_more::{Display, Error};
use serde_json::json;

/// Errors raised by the vacation rules and the storage behind them.
/// Every variant is terminal for the call that produced it.
#[derive(Debug, Display, Error, PartialEq, Eq)]
pub enum VacationError {
    /// A business rule rejected caller input (quota, interval, author, decision)
    #[display(fmt = "{}", message)]
    InvalidRequest { message: String },

    /// A status filter token did not name a known status
    #[display(fmt = "{}", message)]
    InvalidFilter { message: String },

    #[display(fmt = "{}", message)]
    NotFound { message: String },

    /// The request was already resolved
    #[display(fmt = "{}", message)]
    Conflict { message: String },

    #[display(fmt = "{}", message)]
    Storage { message: String },
}

impl VacationError {
    pub fn invalid_request(message: impl Into<String>) -> Self {
        VacationError::InvalidRequest {
            message: message.into(),
        }
    }

    pub fn invalid_filter(message: impl Into<String>) -> Self {
        VacationError::InvalidFilter {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        VacationError::NotFound {
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        VacationError::Conflict {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        VacationError::Storage {
            message: message.into(),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            VacationError::InvalidRequest { .. } => "invalid_request",
            VacationError::InvalidFilter { .. } => "invalid_filter",
            VacationError::NotFound { .. } => "not_found",
            VacationError::Conflict { .. } => "conflict",
            VacationError::Storage { .. } => "storage",
        }
    }
}

impl ResponseError for VacationError {
    fn status_code(&self) -> StatusCode {
        match self {
            VacationError::InvalidRequest { .. } | VacationError::InvalidFilter { .. } => {
                StatusCode::BAD_REQUEST
            }
            VacationError::NotFound { .. } => StatusCode::NOT_FOUND,
            VacationError::Conflict { .. } => StatusCode::CONFLICT,
            VacationError::Storage { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        // storage details stay in the log
        let message = match self {
            VacationError::Storage { .. } => "Internal Server Error".to_string(),
            other => other.to_string(),
        };

        HttpResponse::build(self.status_code()).json(json!({
            "error": self.kind(),
            "message": message
        }))
    }
}
