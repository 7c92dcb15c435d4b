//! Error types for Atrium services
//!
//! Provides a single error taxonomy with:
//! - Distinct kinds for auth, tenancy, validation, and storage failures
//! - HTTP status code mapping
//! - Structured error responses that never expose internal detail
//! - Machine-readable error codes for client handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

/// Error codes for machine-readable error identification
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Validation errors (1xxx)
    ValidationError,
    MissingField,

    // Authentication errors (2xxx)
    Unauthorized,
    InvalidCredential,
    MissingTenant,

    // Authorization errors (3xxx)
    TenantMismatch,

    // Resource errors (4xxx)
    NotFound,

    // Tenancy errors (5xxx)
    ServiceNotFound,

    // Database errors (7xxx)
    DatabaseError,
    ConnectionError,
    TimeoutError,

    // External service errors (8xxx)
    UpstreamError,

    // Internal errors (9xxx)
    InternalError,
    ConfigurationError,
    SerializationError,
}

impl ErrorCode {
    /// Get the numeric code for this error
    pub fn as_code(&self) -> u16 {
        match self {
            ErrorCode::ValidationError => 1001,
            ErrorCode::MissingField => 1002,

            ErrorCode::Unauthorized => 2001,
            ErrorCode::InvalidCredential => 2002,
            ErrorCode::MissingTenant => 2003,

            ErrorCode::TenantMismatch => 3001,

            ErrorCode::NotFound => 4001,

            ErrorCode::ServiceNotFound => 5001,

            ErrorCode::DatabaseError => 7001,
            ErrorCode::ConnectionError => 7002,
            ErrorCode::TimeoutError => 7003,

            ErrorCode::UpstreamError => 8001,

            ErrorCode::InternalError => 9001,
            ErrorCode::ConfigurationError => 9002,
            ErrorCode::SerializationError => 9003,
        }
    }
}

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Validation errors
    #[error("validation failed: {message}")]
    Validation { message: String },

    #[error("required field missing: {field}")]
    MissingField { field: String },

    // Authentication errors
    #[error("unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("invalid access token")]
    InvalidCredential,

    #[error("missing X-Tenant-Id header")]
    MissingTenant,

    // Authorization errors
    #[error("tenant mismatch")]
    TenantMismatch,

    // Resource errors
    #[error("{resource} not found: {id}")]
    NotFound { resource: &'static str, id: String },

    // Tenancy errors
    #[error("service {service} not found for tenant {tenant}")]
    ServiceNotFound { tenant: String, service: String },

    // Database errors
    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("database connection error: {message}")]
    DatabaseConnection { message: String },

    #[error("database statement timed out after {elapsed_ms}ms")]
    DatabaseTimeout { elapsed_ms: u64 },

    // External service errors
    #[error("identity provider error: {message}")]
    ExternalService { message: String },

    // Internal errors
    #[error("internal server error: {message}")]
    Internal { message: String },

    #[error("configuration error: {message}")]
    Configuration { message: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // Generic
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// Get the error code for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Validation { .. } => ErrorCode::ValidationError,
            AppError::MissingField { .. } => ErrorCode::MissingField,
            AppError::Unauthorized { .. } => ErrorCode::Unauthorized,
            AppError::InvalidCredential => ErrorCode::InvalidCredential,
            AppError::MissingTenant => ErrorCode::MissingTenant,
            AppError::TenantMismatch => ErrorCode::TenantMismatch,
            AppError::NotFound { .. } => ErrorCode::NotFound,
            AppError::ServiceNotFound { .. } => ErrorCode::ServiceNotFound,
            AppError::Database(_) => ErrorCode::DatabaseError,
            AppError::DatabaseConnection { .. } => ErrorCode::ConnectionError,
            AppError::DatabaseTimeout { .. } => ErrorCode::TimeoutError,
            AppError::ExternalService { .. } => ErrorCode::UpstreamError,
            AppError::Internal { .. } => ErrorCode::InternalError,
            AppError::Configuration { .. } => ErrorCode::ConfigurationError,
            AppError::Serialization(_) => ErrorCode::SerializationError,
            AppError::Other(_) => ErrorCode::InternalError,
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 400 Bad Request
            AppError::Validation { .. }
            | AppError::MissingField { .. }
            | AppError::ServiceNotFound { .. } => StatusCode::BAD_REQUEST,

            // 401 Unauthorized
            AppError::Unauthorized { .. }
            | AppError::InvalidCredential
            | AppError::MissingTenant => StatusCode::UNAUTHORIZED,

            // 403 Forbidden
            AppError::TenantMismatch => StatusCode::FORBIDDEN,

            // 404 Not Found
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,

            // 502 Bad Gateway
            AppError::ExternalService { .. } => StatusCode::BAD_GATEWAY,

            // 500 Internal Server Error
            AppError::Database(_)
            | AppError::DatabaseConnection { .. }
            | AppError::DatabaseTimeout { .. }
            | AppError::Internal { .. }
            | AppError::Configuration { .. }
            | AppError::Serialization(_)
            | AppError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Check if this error should be logged at error level
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }

    /// Check if this error is a client error
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }

    /// The message exposed to callers. Client errors carry their own safe
    /// message; server-side failures are collapsed to a canned phrase so
    /// storage and provider internals never leave the process.
    pub fn public_message(&self) -> String {
        if self.is_server_error() {
            match self {
                AppError::ExternalService { .. } => "identity provider unavailable".to_string(),
                AppError::DatabaseTimeout { .. } => "storage request timed out".to_string(),
                _ => "internal server error".to_string(),
            }
        } else {
            self.to_string()
        }
    }
}

/// Structured error response for the API surface
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetails,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetails {
    pub code: ErrorCode,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code();

        // Log based on severity; the full message stays server-side
        if self.is_server_error() {
            tracing::error!(
                error = %self,
                code = ?code,
                status = status.as_u16(),
                "server error"
            );
        } else {
            tracing::warn!(
                error = %self,
                code = ?code,
                status = status.as_u16(),
                "client error"
            );
        }

        let body = ErrorResponse {
            error: ErrorDetails {
                code,
                message: self.public_message(),
            },
        };

        (status, Json(body)).into_response()
    }
}

impl async_graphql::ErrorExtensions for AppError {
    /// GraphQL rendering of the error: the safe message plus a `code`
    /// extension. Resolvers call `.extend()` at the boundary so storage
    /// and provider internals never reach the GraphQL response.
    fn extend(&self) -> async_graphql::Error {
        if self.is_server_error() {
            tracing::error!(error = %self, code = ?self.code(), "graphql server error");
        }
        async_graphql::Error::new(self.public_message())
            .extend_with(|_, ext| ext.set("code", format!("{:?}", self.code())))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal {
            message: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::ExternalService {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_mapping() {
        let err = AppError::NotFound {
            resource: "user",
            id: "u1".into(),
        };
        assert_eq!(err.code(), ErrorCode::NotFound);
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);

        let err = AppError::TenantMismatch;
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(err.code().as_code(), 3001);
    }

    #[test]
    fn test_service_not_found_is_distinct() {
        let err = AppError::ServiceNotFound {
            tenant: "t1".into(),
            service: "jira".into(),
        };
        assert_eq!(err.code(), ErrorCode::ServiceNotFound);
        // an unresolvable tenant/service pair is the caller's fault
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_public_message_hides_storage_detail() {
        let err = AppError::Database(sea_orm::DbErr::Custom(
            "connection string postgres://admin:hunter2@db".into(),
        ));
        assert!(!err.public_message().contains("hunter2"));
        assert_eq!(err.public_message(), "internal server error");
    }

    #[test]
    fn test_graphql_rendering_carries_code_not_internals() {
        use async_graphql::ErrorExtensions;

        let err = AppError::Database(sea_orm::DbErr::Custom("pg password leaked".into()));
        let gql = err.extend();
        assert_eq!(gql.message, "internal server error");

        let err = AppError::InvalidCredential;
        let gql = err.extend();
        assert_eq!(gql.message, "invalid access token");
        let ext = gql.extensions.expect("code extension");
        assert!(format!("{ext:?}").contains("InvalidCredential"));
    }

    #[test]
    fn test_client_errors_keep_message() {
        let err = AppError::MissingField {
            field: "email".into(),
        };
        assert!(!err.is_server_error());
        assert_eq!(err.public_message(), "required field missing: email");
    }
}
