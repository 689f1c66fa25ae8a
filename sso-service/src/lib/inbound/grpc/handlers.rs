use tonic::Status;

use super::deadline::RequestDeadline;
use crate::domain::auth::errors::AuthError;
use crate::domain::auth::errors::ErrorKind;

pub mod is_admin;
pub mod login;
pub mod register;

/// Translate a domain failure into a gRPC status.
///
/// Internal failures only ever carry `internal_message`; the cause has
/// already been logged by the domain service.
fn status_from(err: AuthError, deadline: &RequestDeadline, internal_message: &str) -> Status {
    match err.kind() {
        ErrorKind::InvalidCredentials => Status::invalid_argument("invalid email or password"),
        ErrorKind::AlreadyExists => Status::already_exists("user already exists"),
        ErrorKind::NotFound => Status::not_found("user not found"),
        ErrorKind::Canceled if deadline.is_expired() => {
            Status::deadline_exceeded("deadline exceeded")
        }
        ErrorKind::Canceled => Status::cancelled("request canceled"),
        ErrorKind::Internal => Status::internal(internal_message),
    }
}
