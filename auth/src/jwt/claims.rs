use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Claims carried by a session token.
///
/// A token asserts that user `uid` (`email`) logged in to application
/// `app_id`, and is valid until `exp`. Timestamps are Unix seconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionClaims {
    /// Subject user ID
    pub uid: i64,

    /// Subject email as stored
    pub email: String,

    /// Application the token was issued for
    pub app_id: i32,

    /// Expiration time
    pub exp: i64,

    /// Issued at
    pub iat: i64,
}

impl SessionClaims {
    /// Build claims for a session starting at `issued_at`.
    ///
    /// The claims are a pure function of their inputs: `exp` is always
    /// `issued_at + ttl`.
    pub fn new(
        uid: i64,
        email: impl Into<String>,
        app_id: i32,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Self {
        Self {
            uid,
            email: email.into(),
            app_id,
            exp: (issued_at + ttl).timestamp(),
            iat: issued_at.timestamp(),
        }
    }
}
