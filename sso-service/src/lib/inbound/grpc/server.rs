use std::any::Any;
use std::future::Future;

use tonic::body::BoxBody;
use tonic::codegen::http;
use tonic::transport::server::TcpIncoming;
use tonic::transport::Server;
use tonic::Status;
use tower_http::catch_panic::CatchPanicLayer;

use super::AuthGrpcService;
use crate::domain::auth::ports::AuthServicePort;
use crate::proto::auth_server::AuthServer;

/// Serve the `sso.Auth` service on `incoming` until `shutdown` resolves.
///
/// Every call runs inside a `grpc_request` span, and a panicking handler
/// answers with `INTERNAL` instead of resetting the stream.
pub async fn serve<S, F>(
    service: AuthGrpcService<S>,
    incoming: TcpIncoming,
    shutdown: F,
) -> Result<(), tonic::transport::Error>
where
    S: AuthServicePort,
    F: Future<Output = ()>,
{
    Server::builder()
        .trace_fn(|request| {
            tracing::info_span!(
                "grpc_request",
                method = %request.uri().path(),
            )
        })
        .layer(CatchPanicLayer::custom(panic_response))
        .add_service(AuthServer::new(service))
        .serve_with_incoming_shutdown(incoming, shutdown)
        .await
}

fn panic_response(panic: Box<dyn Any + Send + 'static>) -> http::Response<BoxBody> {
    let detail = if let Some(message) = panic.downcast_ref::<String>() {
        message.as_str()
    } else if let Some(message) = panic.downcast_ref::<&str>() {
        message
    } else {
        "unknown panic payload"
    };
    tracing::error!(panic = detail, "gRPC handler panicked");

    Status::internal("internal error").to_http()
}
