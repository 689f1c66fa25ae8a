use std::net::SocketAddr;
use std::sync::Arc;

use auth::Authenticator;
use sso_service::config::Config;
use sso_service::config::Env;
use sso_service::domain::auth::service::AuthService;
use sso_service::inbound::grpc::serve;
use sso_service::inbound::grpc::AuthGrpcService;
use sso_service::outbound::repositories::SqliteCredentialStore;
use tokio::net::TcpListener;
use tokio::signal::unix::signal;
use tokio::signal::unix::SignalKind;
use tonic::transport::server::TcpIncoming;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

fn init_tracing(env: Env) {
    let default_filter = match env {
        Env::Local | Env::Dev => "sso_service=debug,auth=debug,tonic=info",
        Env::Prod => "sso_service=info",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let registry = tracing_subscriber::registry().with(filter);
    match env {
        Env::Local => registry.with(tracing_subscriber::fmt::layer()).init(),
        Env::Dev | Env::Prod => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
    }
}

async fn shutdown_signal() {
    let mut terminate = match signal(SignalKind::terminate()) {
        Ok(stream) => stream,
        Err(e) => {
            tracing::error!(error = %e, "Failed to install SIGTERM handler");
            let _ = tokio::signal::ctrl_c().await;
            return;
        }
    };

    tokio::select! {
        _ = tokio::signal::ctrl_c() => tracing::info!(signal = "SIGINT", "Shutdown requested"),
        _ = terminate.recv() => tracing::info!(signal = "SIGTERM", "Shutdown requested"),
    }
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let config = Config::load()?;
    init_tracing(config.env);

    tracing::info!(
        service = "sso-service",
        version = env!("CARGO_PKG_VERSION"),
        env = ?config.env,
        storage_url = %config.storage.url,
        grpc_port = config.grpc.port,
        grpc_timeout_ms = config.grpc.timeout_ms,
        "Configuration loaded"
    );

    let store = Arc::new(
        SqliteCredentialStore::connect(&config.storage.url, config.storage.max_connections)
            .await?,
    );
    tracing::info!(
        max_connections = config.storage.max_connections,
        database = "sqlite",
        "Database connection pool created"
    );

    store.migrate().await?;
    tracing::info!(database = "sqlite", "Database migrations completed");

    let authenticator = Authenticator::new(config.token.ttl());
    tracing::info!(
        token_ttl_seconds = authenticator.token_ttl().num_seconds(),
        "Session tokens configured"
    );

    let auth_service = Arc::new(AuthService::new(
        Arc::clone(&store),
        Arc::clone(&store),
        Arc::clone(&store),
        authenticator,
    ));

    let grpc_address: SocketAddr = format!("0.0.0.0:{}", config.grpc.port).parse()?;
    let listener = TcpListener::bind(grpc_address).await?;
    let incoming =
        TcpIncoming::from_listener(listener, true, None).map_err(|e| anyhow::anyhow!(e))?;
    let grpc_service = AuthGrpcService::new(auth_service, config.grpc.timeout());
    tracing::info!(
        address = %grpc_address,
        port = config.grpc.port,
        protocol = "grpc",
        "gRpc server listening"
    );

    let served = serve(grpc_service, incoming, shutdown_signal()).await;

    match &served {
        Ok(()) => tracing::info!("gRpc server stopped gracefully"),
        Err(e) => tracing::error!(error = %e, "gRpc server error"),
    }

    store.close().await;
    tracing::info!("Storage closed");

    served.map_err(Into::into)
}
