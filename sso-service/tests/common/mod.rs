use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use auth::Authenticator;
use auth::SessionClaims;
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::sqlite::SqliteJournalMode;
use sqlx::ConnectOptions;
use sqlx::SqliteConnection;
use sso_service::domain::auth::ports::AuthServicePort;
use sso_service::domain::auth::service::AuthService;
use sso_service::inbound::grpc::serve;
use sso_service::inbound::grpc::AuthGrpcService;
use sso_service::outbound::repositories::SqliteCredentialStore;
use sso_service::proto::auth_client::AuthClient;
use sso_service::proto::IsAdminRequest;
use sso_service::proto::LoginRequest;
use sso_service::proto::RegisterRequest;
use tempfile::TempDir;
use tokio::net::TcpListener;
use tonic::transport::server::TcpIncoming;
use tonic::transport::Channel;
use tonic::Request;
use tonic::Status;

pub const APP_ID: i32 = 1;
pub const APP_SECRET: &str = "test-secret";
pub const OTHER_APP_ID: i32 = 2;
pub const OTHER_APP_SECRET: &str = "other-secret";
pub const TOKEN_TTL_SECONDS: i64 = 3600;
pub const SERVER_TIMEOUT: Duration = Duration::from_secs(10);

pub type Service =
    AuthService<SqliteCredentialStore, SqliteCredentialStore, SqliteCredentialStore>;

/// Test application that serves gRPC on a random local port
pub struct TestApp {
    pub client: AuthClient<Channel>,
    pub service: Arc<Service>,
    pub store: Arc<SqliteCredentialStore>,
    pub db_url: String,
    pub authenticator: Authenticator,
    _db_dir: TempDir,
}

/// Serve `service` in a background task and return a connected client
pub async fn spawn_server<S: AuthServicePort>(service: Arc<S>) -> AuthClient<Channel> {
    // Use random port (0 = OS assigns)
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let address = format!("http://{}", listener.local_addr().unwrap());
    let incoming =
        TcpIncoming::from_listener(listener, true, None).expect("Failed to wrap listener");

    let grpc = AuthGrpcService::new(service, SERVER_TIMEOUT);
    tokio::spawn(serve(grpc, incoming, std::future::pending()));

    AuthClient::connect(address)
        .await
        .expect("Failed to connect to test server")
}

impl TestApp {
    /// Spawn the app on a fresh database file with two registered apps
    pub async fn spawn() -> Self {
        let db_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let db_url = format!("sqlite://{}", db_dir.path().join("sso.db").display());

        let store = Arc::new(
            SqliteCredentialStore::connect(&db_url, 5)
                .await
                .expect("Failed to open database"),
        );
        store.migrate().await.expect("Failed to run migrations");

        for (id, name, secret) in [
            (APP_ID, "test", APP_SECRET),
            (OTHER_APP_ID, "other", OTHER_APP_SECRET),
        ] {
            sqlx::query("INSERT INTO apps (id, name, secret) VALUES (?, ?, ?)")
                .bind(id)
                .bind(name)
                .bind(secret)
                .execute(store.pool())
                .await
                .expect("Failed to seed apps");
        }

        let authenticator = Authenticator::new(chrono::Duration::seconds(TOKEN_TTL_SECONDS));
        let service = Arc::new(AuthService::new(
            Arc::clone(&store),
            Arc::clone(&store),
            Arc::clone(&store),
            authenticator.clone(),
        ));
        let client = spawn_server(Arc::clone(&service)).await;

        Self {
            client,
            service,
            store,
            db_url,
            authenticator,
            _db_dir: db_dir,
        }
    }

    pub fn client(&self) -> AuthClient<Channel> {
        self.client.clone()
    }

    pub async fn register(&self, email: &str, password: &str) -> Result<i64, Status> {
        let response = self
            .client()
            .register(Request::new(RegisterRequest {
                email: email.to_string(),
                password: password.to_string(),
            }))
            .await?;
        Ok(response.into_inner().user_id)
    }

    pub async fn login(&self, email: &str, password: &str, app_id: i32) -> Result<String, Status> {
        let response = self
            .client()
            .login(Request::new(LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
                app_id,
            }))
            .await?;
        Ok(response.into_inner().token)
    }

    pub async fn is_admin(&self, user_id: i64) -> Result<bool, Status> {
        let response = self
            .client()
            .is_admin(Request::new(IsAdminRequest { user_id }))
            .await?;
        Ok(response.into_inner().is_admin)
    }

    pub async fn make_admin(&self, user_id: i64) {
        sqlx::query("UPDATE users SET is_admin = TRUE WHERE id = ?")
            .bind(user_id)
            .execute(self.store.pool())
            .await
            .expect("Failed to promote user");
    }

    pub async fn user_count(&self) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(self.store.pool())
            .await
            .expect("Failed to count users")
    }

    /// Open a separate connection holding the database write lock until
    /// it runs `ROLLBACK`
    pub async fn hold_write_lock(&self) -> SqliteConnection {
        let mut writer = SqliteConnectOptions::from_str(&self.db_url)
            .expect("Invalid database url")
            .journal_mode(SqliteJournalMode::Wal)
            .connect()
            .await
            .expect("Failed to open lock connection");
        sqlx::query("BEGIN IMMEDIATE")
            .execute(&mut writer)
            .await
            .expect("Failed to take write lock");
        writer
    }

    pub fn decode(&self, token: &str, secret: &str) -> Result<SessionClaims, auth::JwtError> {
        self.authenticator.validate_token(token, secret.as_bytes())
    }
}
