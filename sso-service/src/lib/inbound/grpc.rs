pub mod deadline;
pub mod grpc_auth_server;
pub mod handlers;
pub mod server;

pub use grpc_auth_server::AuthGrpcService;
pub use server::serve;
