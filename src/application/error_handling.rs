// src/application/error_handling.rs
//
// Error Handling for Commands
//
// ARCHITECTURE:
// - Maps internal errors → user-friendly responses
// - Provides a consistent error format for the CLI and its JSON output
// - Logs the full error, shows only what the user can act on

use serde::{Deserialize, Serialize};
use std::fmt;
use crate::error::AppError;

/// Standard error response for the user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error_type: ErrorType,
    pub message: String,
    pub details: Option<String>,
}

/// Error categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// Resource not found
    NotFound,

    /// Invalid input/validation error
    Validation,

    /// Domain invariant violation
    DomainError,

    /// Database/persistence error
    Database,

    /// Server or network error
    Network,

    /// Invalid configuration file
    Configuration,

    /// File system error
    FileSystem,

    /// Other/unknown error
    Internal,
}

impl ErrorResponse {
    fn new(error_type: ErrorType, message: impl Into<String>, details: Option<String>) -> Self {
        Self {
            success: false,
            error_type,
            message: message.into(),
            details,
        }
    }

    /// Create error response from AppError
    pub fn from_app_error(error: AppError) -> Self {
        match error {
            AppError::NotFound => Self::new(ErrorType::NotFound, "Resource not found", None),

            AppError::Domain(domain_error) => Self::new(
                ErrorType::DomainError,
                "Domain validation failed",
                Some(domain_error.to_string()),
            ),

            AppError::Database(db_error) => {
                log::error!("Database error: {:?}", db_error);
                Self::new(
                    ErrorType::Database,
                    "Database operation failed",
                    Some("Check logs for details".to_string()),
                )
            }

            AppError::Pool(pool_error) => {
                log::error!("Connection pool error: {}", pool_error);
                Self::new(ErrorType::Database, "Database connection failed", None)
            }

            AppError::Serialization(serde_error) => {
                log::error!("Serialization error: {:?}", serde_error);
                Self::new(ErrorType::Internal, "Data serialization failed", None)
            }

            AppError::Io(io_error) => {
                log::error!("IO error: {:?}", io_error);
                Self::new(
                    ErrorType::FileSystem,
                    "File system operation failed",
                    Some(io_error.to_string()),
                )
            }

            AppError::Http(http_error) => {
                log::warn!("HTTP error: {:?}", http_error);
                Self::new(
                    ErrorType::Network,
                    "Server request failed",
                    Some(http_error.to_string()),
                )
            }

            AppError::InvalidUrl(url_error) => Self::new(
                ErrorType::Validation,
                "Invalid server address",
                Some(url_error.to_string()),
            ),

            AppError::Discovery(message) => {
                log::warn!("Discovery error: {}", message);
                Self::new(ErrorType::Network, "Local server discovery failed", Some(message))
            }

            AppError::Config(message) => {
                Self::new(ErrorType::Configuration, "Invalid configuration", Some(message))
            }

            AppError::Other(message) => {
                log::error!("Other error: {}", message);
                Self::new(ErrorType::Internal, message, None)
            }
        }
    }

    /// Create validation error
    pub fn validation(message: String) -> Self {
        Self::new(ErrorType::Validation, message, None)
    }

    /// Create not found error
    pub fn not_found(resource: &str) -> Self {
        Self::new(ErrorType::NotFound, format!("{} not found", resource), None)
    }
}

impl From<AppError> for ErrorResponse {
    fn from(error: AppError) -> Self {
        Self::from_app_error(error)
    }
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.details {
            Some(details) => write!(f, "{}: {}", self.message, details),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for ErrorResponse {}

/// Helper trait to convert Results to an ErrorResponse
pub trait ToErrorResponse<T> {
    fn to_error_response(self) -> Result<T, ErrorResponse>;
}

impl<T> ToErrorResponse<T> for Result<T, AppError> {
    fn to_error_response(self) -> Result<T, ErrorResponse> {
        self.map_err(ErrorResponse::from_app_error)
    }
}
