use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use auth::Authenticator;
use chrono::Utc;
use tokio_util::sync::CancellationToken;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::errors::ErrorKind;
use crate::domain::auth::models::LoginCommand;
use crate::domain::auth::models::RegisterUserCommand;
use crate::domain::auth::models::SessionToken;
use crate::domain::auth::models::UserId;
use crate::domain::auth::ports::AppProvider;
use crate::domain::auth::ports::AuthServicePort;
use crate::domain::auth::ports::UserProvider;
use crate::domain::auth::ports::UserSaver;

/// Domain service implementation for authentication operations.
///
/// Holds no mutable state: the store collaborators are shared handles and
/// are expected to be safe for concurrent use on their own.
pub struct AuthService<US, UP, AP>
where
    US: UserSaver,
    UP: UserProvider,
    AP: AppProvider,
{
    user_saver: Arc<US>,
    user_provider: Arc<UP>,
    app_provider: Arc<AP>,
    authenticator: Authenticator,
}

impl<US, UP, AP> AuthService<US, UP, AP>
where
    US: UserSaver,
    UP: UserProvider,
    AP: AppProvider,
{
    /// Create a new auth service with injected dependencies.
    ///
    /// A single store implementing all three ports is passed as three
    /// clones of the same `Arc`.
    pub fn new(
        user_saver: Arc<US>,
        user_provider: Arc<UP>,
        app_provider: Arc<AP>,
        authenticator: Authenticator,
    ) -> Self {
        Self {
            user_saver,
            user_provider,
            app_provider,
            authenticator,
        }
    }
}

/// Race `operation` against `cancel`; cancellation wins ties.
async fn until_cancelled<T, F>(cancel: &CancellationToken, operation: F) -> Result<T, AuthError>
where
    F: Future<Output = Result<T, AuthError>>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(AuthError::Canceled),
        result = operation => result,
    }
}

/// Run CPU-heavy work (Argon2) on the blocking pool.
async fn blocking<T, F>(cancel: &CancellationToken, work: F) -> Result<T, AuthError>
where
    F: FnOnce() -> Result<T, AuthError> + Send + 'static,
    T: Send + 'static,
{
    until_cancelled(cancel, async move {
        tokio::task::spawn_blocking(work)
            .await
            .map_err(|e| AuthError::Unknown(format!("Blocking task failed: {}", e)))?
    })
    .await
}

fn log_failure(op: &'static str, err: &AuthError) {
    match err.kind() {
        ErrorKind::Canceled => tracing::info!(op, "operation canceled"),
        ErrorKind::InvalidCredentials | ErrorKind::AlreadyExists | ErrorKind::NotFound => {
            tracing::warn!(op, error = %err, "request rejected")
        }
        ErrorKind::Internal => tracing::error!(op, error = %err, "operation failed"),
    }
}

#[async_trait]
impl<US, UP, AP> AuthServicePort for AuthService<US, UP, AP>
where
    US: UserSaver,
    UP: UserProvider,
    AP: AppProvider,
{
    async fn register_new_user(
        &self,
        command: RegisterUserCommand,
        cancel: &CancellationToken,
    ) -> Result<UserId, AuthError> {
        const OP: &str = "auth.register_new_user";
        let RegisterUserCommand { email, password } = command;

        tracing::info!(op = OP, email = %email, "registering user");

        let authenticator = self.authenticator.clone();
        let password_hash = blocking(cancel, move || {
            authenticator
                .hash_password(&password)
                .map_err(AuthError::from)
        })
        .await
        .inspect_err(|e| log_failure(OP, e))?;

        let user_id = until_cancelled(cancel, self.user_saver.save_user(&email, &password_hash))
            .await
            .inspect_err(|e| log_failure(OP, e))?;

        tracing::info!(op = OP, user_id = %user_id, "user registered");
        Ok(user_id)
    }

    async fn login(
        &self,
        command: LoginCommand,
        cancel: &CancellationToken,
    ) -> Result<SessionToken, AuthError> {
        const OP: &str = "auth.login";
        let LoginCommand {
            email,
            password,
            app_id,
        } = command;

        tracing::info!(op = OP, email = %email, app_id = %app_id, "attempting to login user");

        let user = until_cancelled(cancel, self.user_provider.find_by_email(&email))
            .await
            .inspect_err(|e| log_failure(OP, e))?
            .ok_or_else(|| {
                tracing::warn!(op = OP, email = %email, "user not found");
                AuthError::InvalidCredentials
            })?;

        let authenticator = self.authenticator.clone();
        let digest = user.password_hash.clone();
        let password_matches = blocking(cancel, move || {
            authenticator
                .verify_password(&password, &digest)
                .map_err(AuthError::from)
        })
        .await
        .inspect_err(|e| log_failure(OP, e))?;

        if !password_matches {
            tracing::info!(op = OP, user_id = %user.id, "invalid credentials");
            return Err(AuthError::InvalidCredentials);
        }

        let app = until_cancelled(cancel, self.app_provider.find_app(app_id))
            .await
            .inspect_err(|e| log_failure(OP, e))?
            .ok_or(AuthError::AppNotFound(app_id))
            .inspect_err(|e| log_failure(OP, e))?;

        if cancel.is_cancelled() {
            log_failure(OP, &AuthError::Canceled);
            return Err(AuthError::Canceled);
        }

        let token = self
            .authenticator
            .issue_token(
                user.id.0,
                &user.email,
                app.id.0,
                app.secret.as_bytes(),
                Utc::now(),
            )
            .map_err(AuthError::from)
            .inspect_err(|e| log_failure(OP, e))?;

        tracing::info!(op = OP, user_id = %user.id, app_id = %app.id, "user logged in successfully");
        Ok(SessionToken(token))
    }

    async fn is_admin(
        &self,
        user_id: UserId,
        cancel: &CancellationToken,
    ) -> Result<bool, AuthError> {
        const OP: &str = "auth.is_admin";

        tracing::info!(op = OP, user_id = %user_id, "checking if user is admin");

        let is_admin = until_cancelled(cancel, self.user_provider.is_admin(user_id))
            .await
            .inspect_err(|e| log_failure(OP, e))?
            .ok_or_else(|| AuthError::UserNotFound(user_id.to_string()))
            .inspect_err(|e| log_failure(OP, e))?;

        tracing::info!(op = OP, user_id = %user_id, is_admin, "checked if user is admin");
        Ok(is_admin)
    }
}
