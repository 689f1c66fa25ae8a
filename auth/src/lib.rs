//! Authentication primitives for the SSO service
//!
//! - Password digests (Argon2id)
//! - Session tokens signed per application (HS256 JWT)
//! - An `Authenticator` tying both to a fixed token lifetime
//!
//! Nothing here touches storage: callers look up users and application
//! secrets themselves and hand the relevant values in.
//!
//! # Examples
//!
//! ```
//! use auth::Authenticator;
//! use chrono::{Duration, Utc};
//!
//! let auth = Authenticator::new(Duration::hours(1));
//!
//! // Register: hash password
//! let digest = auth.hash_password("password123").unwrap();
//!
//! // Login: verify, then sign with the application's secret
//! assert!(auth.verify_password("password123", &digest).unwrap());
//! let token = auth
//!     .issue_token(1, "alice@example.com", 7, b"app-7-secret", Utc::now())
//!     .unwrap();
//!
//! // Only the same application's secret validates it
//! let claims = auth.validate_token(&token, b"app-7-secret").unwrap();
//! assert_eq!(claims.app_id, 7);
//! assert!(auth.validate_token(&token, b"app-8-secret").is_err());
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;

pub use authenticator::Authenticator;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use jwt::SessionClaims;
pub use password::PasswordError;
pub use password::PasswordHasher;
