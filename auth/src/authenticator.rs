use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::jwt::SessionClaims;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

/// Authentication coordinator combining password digests and session tokens.
///
/// Holds no signing secret of its own: every token is signed with the secret
/// of the application it is issued for, passed in per call. Only the token
/// time-to-live is fixed at construction.
#[derive(Debug, Clone)]
pub struct Authenticator {
    password_hasher: PasswordHasher,
    token_ttl: Duration,
}

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// # Arguments
    /// * `token_ttl` - Lifetime of every issued session token
    pub fn new(token_ttl: Duration) -> Self {
        Self {
            password_hasher: PasswordHasher::new(),
            token_ttl,
        }
    }

    pub fn token_ttl(&self) -> Duration {
        self.token_ttl
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `HashingFailed` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Verify a plaintext password against a stored digest.
    ///
    /// # Errors
    /// * `VerificationFailed` - Stored digest is malformed
    pub fn verify_password(&self, password: &str, digest: &str) -> Result<bool, PasswordError> {
        self.password_hasher.verify(password, digest)
    }

    /// Issue a session token for a user logging in to an application.
    ///
    /// # Arguments
    /// * `user_id` - Subject user ID
    /// * `email` - Subject email
    /// * `app_id` - Application the session belongs to
    /// * `app_secret` - That application's signing secret
    /// * `issued_at` - Issuance instant; expiration is this plus the TTL
    ///
    /// # Errors
    /// * `EncodingFailed` - Token signing failed
    pub fn issue_token(
        &self,
        user_id: i64,
        email: &str,
        app_id: i32,
        app_secret: &[u8],
        issued_at: DateTime<Utc>,
    ) -> Result<String, JwtError> {
        let claims = SessionClaims::new(user_id, email, app_id, issued_at, self.token_ttl);
        JwtHandler::new(app_secret).encode(&claims)
    }

    /// Validate a session token against an application's secret.
    ///
    /// # Errors
    /// * `JwtError` - Token is malformed, expired or signed with another secret
    pub fn validate_token(&self, token: &str, app_secret: &[u8]) -> Result<SessionClaims, JwtError> {
        JwtHandler::new(app_secret).decode(token)
    }
}
