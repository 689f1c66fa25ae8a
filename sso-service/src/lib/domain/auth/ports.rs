use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::models::App;
use crate::domain::auth::models::AppId;
use crate::domain::auth::models::EmailAddress;
use crate::domain::auth::models::LoginCommand;
use crate::domain::auth::models::RegisterUserCommand;
use crate::domain::auth::models::SessionToken;
use crate::domain::auth::models::User;
use crate::domain::auth::models::UserId;

/// Port for authentication domain operations.
///
/// Every operation observes `cancel`: once it fires, outstanding store calls
/// are abandoned and the operation returns `Canceled`.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Register a new user.
    ///
    /// # Returns
    /// ID assigned by the credential store
    ///
    /// # Errors
    /// * `UserAlreadyExists` - Email is already registered
    /// * `Canceled` - Cancellation fired before completion
    /// * `Password` / `DatabaseError` - Hashing or storage failed
    async fn register_new_user(
        &self,
        command: RegisterUserCommand,
        cancel: &CancellationToken,
    ) -> Result<UserId, AuthError>;

    /// Verify credentials and issue a session token for an application.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email or wrong password
    /// * `AppNotFound` - Application does not exist
    /// * `Canceled` - Cancellation fired before completion
    /// * `Password` / `Token` / `DatabaseError` - Infrastructure failure
    async fn login(
        &self,
        command: LoginCommand,
        cancel: &CancellationToken,
    ) -> Result<SessionToken, AuthError>;

    /// Report whether a user has administrator rights.
    ///
    /// # Errors
    /// * `UserNotFound` - User does not exist
    /// * `Canceled` - Cancellation fired before completion
    /// * `DatabaseError` - Database operation failed
    async fn is_admin(&self, user_id: UserId, cancel: &CancellationToken)
        -> Result<bool, AuthError>;
}

/// Persists new users.
#[async_trait]
pub trait UserSaver: Send + Sync + 'static {
    /// Insert a user record.
    ///
    /// Email uniqueness must be enforced atomically by the store itself, so
    /// that concurrent inserts of the same address cannot both succeed.
    ///
    /// # Errors
    /// * `UserAlreadyExists` - Email is already registered
    /// * `DatabaseError` - Database operation failed
    async fn save_user(
        &self,
        email: &EmailAddress,
        password_hash: &str,
    ) -> Result<UserId, AuthError>;
}

/// Reads users.
#[async_trait]
pub trait UserProvider: Send + Sync + 'static {
    /// Retrieve user by exact email.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError>;

    /// Retrieve the administrator flag of a user.
    ///
    /// # Returns
    /// Optional flag (None if the user does not exist)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn is_admin(&self, user_id: UserId) -> Result<Option<bool>, AuthError>;
}

/// Reads applications.
#[async_trait]
pub trait AppProvider: Send + Sync + 'static {
    /// Retrieve application by identifier.
    ///
    /// # Returns
    /// Optional application (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_app(&self, id: AppId) -> Result<Option<App>, AuthError>;
}
