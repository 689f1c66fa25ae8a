use thiserror::Error;
use tonic::Status;

use super::status_from;
use crate::domain::auth::errors::EmailError;
use crate::domain::auth::models::EmailAddress;
use crate::domain::auth::models::RegisterUserCommand;
use crate::domain::auth::ports::AuthServicePort;
use crate::inbound::grpc::deadline::RequestDeadline;
use crate::proto::RegisterRequest;
use crate::proto::RegisterResponse;

pub async fn register<S: AuthServicePort>(
    service: &S,
    request: RegisterRequest,
    deadline: &RequestDeadline,
) -> Result<RegisterResponse, Status> {
    let command = request.try_into_command()?;

    service
        .register_new_user(command, deadline.token())
        .await
        .map(|user_id| RegisterResponse { user_id: user_id.0 })
        .map_err(|e| status_from(e, deadline, "failed to register user"))
}

#[derive(Debug, Clone, Error)]
enum ParseRegisterRequestError {
    #[error("email is required")]
    MissingEmail,

    #[error("password is required")]
    MissingPassword,

    #[error("invalid email: {0}")]
    Email(#[from] EmailError),
}

impl RegisterRequest {
    fn try_into_command(self) -> Result<RegisterUserCommand, ParseRegisterRequestError> {
        if self.email.is_empty() {
            return Err(ParseRegisterRequestError::MissingEmail);
        }
        if self.password.is_empty() {
            return Err(ParseRegisterRequestError::MissingPassword);
        }

        let email = EmailAddress::new(self.email)?;
        Ok(RegisterUserCommand::new(email, self.password))
    }
}

impl From<ParseRegisterRequestError> for Status {
    fn from(err: ParseRegisterRequestError) -> Self {
        Status::invalid_argument(err.to_string())
    }
}
