use tonic::Status;

use super::status_from;
use crate::domain::auth::models::UserId;
use crate::domain::auth::ports::AuthServicePort;
use crate::inbound::grpc::deadline::RequestDeadline;
use crate::proto::IsAdminRequest;
use crate::proto::IsAdminResponse;

pub async fn is_admin<S: AuthServicePort>(
    service: &S,
    request: IsAdminRequest,
    deadline: &RequestDeadline,
) -> Result<IsAdminResponse, Status> {
    if request.user_id == 0 {
        return Err(Status::invalid_argument("user_id is required"));
    }

    service
        .is_admin(UserId(request.user_id), deadline.token())
        .await
        .map(|is_admin| IsAdminResponse { is_admin })
        .map_err(|e| status_from(e, deadline, "failed to check admin status"))
}
