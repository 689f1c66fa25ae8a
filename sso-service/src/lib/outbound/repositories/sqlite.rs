use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::migrate::MigrateError;
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::sqlite::SqliteJournalMode;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::FromRow;
use sqlx::SqlitePool;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::models::App;
use crate::domain::auth::models::AppId;
use crate::domain::auth::models::EmailAddress;
use crate::domain::auth::models::User;
use crate::domain::auth::models::UserId;
use crate::domain::auth::ports::AppProvider;
use crate::domain::auth::ports::UserProvider;
use crate::domain::auth::ports::UserSaver;

/// How long a writer waits on a locked database before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Credential store backed by SQLite.
///
/// Implements every store port; the service receives the same instance
/// once per port. Email uniqueness is a table constraint, so racing
/// registrations are settled by the engine.
pub struct SqliteCredentialStore {
    pool: SqlitePool,
}

#[derive(FromRow)]
struct UserRow {
    id: i64,
    email: String,
    pass_hash: Vec<u8>,
    is_admin: bool,
}

impl TryFrom<UserRow> for User {
    type Error = AuthError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let password_hash = String::from_utf8(row.pass_hash).map_err(|e| {
            AuthError::DatabaseError(format!("Corrupt password digest for user {}: {}", row.id, e))
        })?;

        Ok(User {
            id: UserId(row.id),
            email: row.email,
            password_hash,
            is_admin: row.is_admin,
        })
    }
}

#[derive(FromRow)]
struct AppRow {
    id: i32,
    name: String,
    secret: String,
}

impl From<AppRow> for App {
    fn from(row: AppRow) -> Self {
        App {
            id: AppId(row.id),
            name: row.name,
            secret: row.secret,
        }
    }
}

impl SqliteCredentialStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open a pool on `url`, creating the database file if it is missing.
    ///
    /// `sqlite::memory:` gives a private in-memory database; use a single
    /// connection for it, since additional connections would not share
    /// writes reliably.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(BUSY_TIMEOUT);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        Ok(Self::new(pool))
    }

    /// Apply embedded schema migrations.
    pub async fn migrate(&self) -> Result<(), MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl UserSaver for SqliteCredentialStore {
    async fn save_user(
        &self,
        email: &EmailAddress,
        password_hash: &str,
    ) -> Result<UserId, AuthError> {
        // Dropping `tx` before commit rolls the insert back on its connection
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            INSERT INTO users (email, pass_hash)
            VALUES (?, ?)
            "#,
        )
        .bind(email.as_str())
        .bind(password_hash.as_bytes())
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AuthError::UserAlreadyExists(email.to_string());
                }
            }
            AuthError::DatabaseError(e.to_string())
        })?;

        tx.commit().await?;

        Ok(UserId(result.last_insert_rowid()))
    }
}

#[async_trait]
impl UserProvider for SqliteCredentialStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, pass_hash, is_admin
            FROM users
            WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }

    async fn is_admin(&self, user_id: UserId) -> Result<Option<bool>, AuthError> {
        let is_admin = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT is_admin
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(user_id.0)
        .fetch_optional(&self.pool)
        .await?;

        Ok(is_admin)
    }
}

#[async_trait]
impl AppProvider for SqliteCredentialStore {
    async fn find_app(&self, id: AppId) -> Result<Option<App>, AuthError> {
        let row = sqlx::query_as::<_, AppRow>(
            r#"
            SELECT id, name, secret
            FROM apps
            WHERE id = ?
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(App::from))
    }
}
