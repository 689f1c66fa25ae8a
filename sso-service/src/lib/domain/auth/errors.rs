use thiserror::Error;

use crate::domain::auth::models::AppId;

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Invalid email format: {0}")]
    InvalidFormat(String),
}

/// Outbound error taxonomy.
///
/// Transport adapters map these onto protocol status codes; they never see
/// the underlying cause of an `Internal` failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidCredentials,
    AlreadyExists,
    NotFound,
    Internal,
    Canceled,
}

/// Top-level error for all authentication operations
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    /// Unknown email or wrong password; the two are never distinguished.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User already exists: {0}")]
    UserAlreadyExists(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("App not found: {0}")]
    AppNotFound(AppId),

    #[error("Operation canceled")]
    Canceled,

    #[error("Password error: {0}")]
    Password(#[from] auth::PasswordError),

    #[error("Token error: {0}")]
    Token(#[from] auth::JwtError),

    // Infrastructure errors
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl AuthError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::InvalidCredentials => ErrorKind::InvalidCredentials,
            AuthError::UserAlreadyExists(_) => ErrorKind::AlreadyExists,
            AuthError::UserNotFound(_) => ErrorKind::NotFound,
            AuthError::Canceled => ErrorKind::Canceled,
            // Application IDs come from trusted client configuration, so a
            // dangling one is a deployment fault rather than a caller error.
            AuthError::AppNotFound(_)
            | AuthError::Password(_)
            | AuthError::Token(_)
            | AuthError::DatabaseError(_)
            | AuthError::Unknown(_) => ErrorKind::Internal,
        }
    }
}

impl From<sqlx::Error> for AuthError {
    fn from(err: sqlx::Error) -> Self {
        AuthError::DatabaseError(err.to_string())
    }
}
