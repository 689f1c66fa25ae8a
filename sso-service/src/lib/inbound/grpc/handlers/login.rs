use thiserror::Error;
use tonic::Status;

use super::status_from;
use crate::domain::auth::models::AppId;
use crate::domain::auth::models::LoginCommand;
use crate::domain::auth::ports::AuthServicePort;
use crate::inbound::grpc::deadline::RequestDeadline;
use crate::proto::LoginRequest;
use crate::proto::LoginResponse;

pub async fn login<S: AuthServicePort>(
    service: &S,
    request: LoginRequest,
    deadline: &RequestDeadline,
) -> Result<LoginResponse, Status> {
    let command = request.try_into_command()?;

    service
        .login(command, deadline.token())
        .await
        .map(|token| LoginResponse {
            token: token.into_inner(),
        })
        .map_err(|e| status_from(e, deadline, "failed to login"))
}

#[derive(Debug, Clone, Error)]
enum ParseLoginRequestError {
    #[error("email is required")]
    MissingEmail,

    #[error("password is required")]
    MissingPassword,

    #[error("app_id is required")]
    MissingAppId,
}

impl LoginRequest {
    fn try_into_command(self) -> Result<LoginCommand, ParseLoginRequestError> {
        if self.email.is_empty() {
            return Err(ParseLoginRequestError::MissingEmail);
        }
        if self.password.is_empty() {
            return Err(ParseLoginRequestError::MissingPassword);
        }
        if self.app_id == 0 {
            return Err(ParseLoginRequestError::MissingAppId);
        }

        Ok(LoginCommand::new(self.email, self.password, AppId(self.app_id)))
    }
}

impl From<ParseLoginRequestError> for Status {
    fn from(err: ParseLoginRequestError) -> Self {
        Status::invalid_argument(err.to_string())
    }
}
