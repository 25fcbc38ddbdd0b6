//! Authentication core library
//!
//! Provides the credential and token machinery used by the authentication service:
//! - Password hashing (Argon2id) behind the `CredentialHasher` trait
//! - Signed, expiring access tokens (HS256 JWT)
//! - Authentication coordination (credential check + token issuance)
//! - Role-based authorization decisions
//!
//! Persistence and transport stay in the service; this crate holds no mutable state
//! beyond its signing configuration.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::CredentialHasher;
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! let is_valid = hasher.verify("my_password", &hash).unwrap();
//! assert!(is_valid);
//! ```
//!
//! ## Access Tokens
//! ```
//! use auth::TokenCodec;
//! use chrono::Duration;
//! use chrono::Utc;
//!
//! let codec = TokenCodec::new(b"secret_key_at_least_32_bytes_long!", Duration::hours(24));
//! let now = Utc::now();
//! let token = codec.issue("alice", ["USER"], now).unwrap();
//! assert!(codec.verify(&token, "alice", now));
//! assert!(!codec.verify(&token, "bob", now));
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use auth::authorize;
//! use auth::Authenticator;
//! use auth::PasswordHasher;
//! use auth::Principal;
//! use auth::TokenCodec;
//! use chrono::Duration;
//! use chrono::Utc;
//!
//! let codec = TokenCodec::new(b"secret_key_at_least_32_bytes_long!", Duration::hours(24));
//! let auth = Authenticator::new(PasswordHasher::new(), codec);
//!
//! // Register: hash password
//! let hash = auth.hash_password("password123").unwrap();
//!
//! // Sign in: verify and issue token
//! let principal = Principal::new("alice", hash, ["USER"]);
//! let result = auth.authenticate("password123", &principal, Utc::now()).unwrap();
//!
//! // Later request: validate token and check the route's role
//! let claims = auth.validate_token(&result.access_token, Utc::now()).unwrap();
//! assert!(authorize(&claims.roles, None));
//! assert!(!authorize(&claims.roles, Some("ADMIN")));
//! ```

pub mod authenticator;
pub mod authorization;
pub mod jwt;
pub mod password;
pub mod principal;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::AuthenticationResult;
pub use authenticator::Authenticator;
pub use authorization::authorize;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::TokenCodec;
pub use password::CredentialHasher;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use principal::Principal;
