use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

use crate::jwt::Claims;
use crate::jwt::JwtError;
use crate::jwt::TokenCodec;
use crate::password::CredentialHasher;
use crate::password::PasswordError;
use crate::password::PasswordHasher;
use crate::principal::Principal;

const DECOY_PASSWORD: &str = "decoy-password-for-unknown-principals";

/// Authentication coordinator combining password verification and token issuance.
///
/// Provides high-level authentication operations by coordinating a credential
/// hasher and the token codec.
pub struct Authenticator<H = PasswordHasher>
where
    H: CredentialHasher,
{
    password_hasher: H,
    token_codec: TokenCodec,
    decoy_hash: Option<String>,
}

/// Result of successful authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticationResult {
    /// Signed access token
    pub access_token: String,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("JWT error: {0}")]
    JwtError(#[from] JwtError),
}

impl<H> Authenticator<H>
where
    H: CredentialHasher,
{
    /// Create a new authenticator.
    ///
    /// Hashes a decoy password up front so [`Authenticator::reject_unknown`] costs a
    /// single verification from the first call on.
    ///
    /// # Arguments
    /// * `password_hasher` - One-way hash/verify primitive for passwords
    /// * `token_codec` - Codec used to issue and check access tokens
    ///
    /// # Returns
    /// Configured Authenticator instance
    pub fn new(password_hasher: H, token_codec: TokenCodec) -> Self {
        let decoy_hash = password_hasher.hash(DECOY_PASSWORD).ok();

        Self {
            password_hasher,
            token_codec,
            decoy_hash,
        }
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Verify credentials and issue an access token.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `principal` - Identity and stored hash being authenticated
    /// * `now` - Issuance instant for the token
    ///
    /// # Returns
    /// AuthenticationResult with access token bound to the principal's username and roles
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `PasswordError` - Stored hash is unusable
    /// * `JwtError` - Token generation failed
    pub fn authenticate(
        &self,
        password: &str,
        principal: &Principal,
        now: DateTime<Utc>,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        let is_valid = self
            .password_hasher
            .verify(password, principal.password_hash())?;

        if !is_valid {
            return Err(AuthenticationError::InvalidCredentials);
        }

        let access_token = self
            .token_codec
            .issue(principal.username(), principal.roles(), now)?;

        Ok(AuthenticationResult { access_token })
    }

    /// Reject a sign-in attempt for which no principal exists.
    ///
    /// Runs a password verification against a decoy hash first so the caller
    /// spends the same hashing work as for a wrong password.
    pub fn reject_unknown(&self, password: &str) -> AuthenticationError {
        if let Some(hash) = &self.decoy_hash {
            let _ = self.password_hasher.verify(password, hash);
        }

        AuthenticationError::InvalidCredentials
    }

    /// Validate a token's signature and expiry.
    ///
    /// # Errors
    /// * `TokenExpired` - Token is past its expiry
    /// * `InvalidToken` - Token signature is invalid or malformed
    pub fn validate_token(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, JwtError> {
        self.token_codec.validate(token, now)
    }

    /// Check that a token is valid for `subject` at `now`.
    pub fn verify_token(&self, token: &str, subject: &str, now: DateTime<Utc>) -> bool {
        self.token_codec.verify(token, subject, now)
    }

    /// Untrusted subject of a token, for diagnostics only.
    pub fn parse_subject(&self, token: &str) -> Result<String, JwtError> {
        self.token_codec.parse_subject(token)
    }

    /// Lifetime of issued tokens.
    pub fn token_ttl(&self) -> Duration {
        self.token_codec.ttl()
    }
}
