use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::errors::JwtError;

/// Issues and verifies signed, expiring access tokens.
///
/// Tokens are compact JWTs (`header.claims.signature`, base64url segments) signed
/// with HS256. The validity window is fixed when the codec is built and cannot be
/// changed per token.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    ttl: Duration,
}

impl TokenCodec {
    /// Create a new codec with a secret key and token lifetime.
    ///
    /// # Arguments
    /// * `secret` - Secret key for signing tokens (should be stored securely)
    /// * `ttl` - Lifetime of every issued token
    ///
    /// # Returns
    /// TokenCodec instance configured with HS256 algorithm
    ///
    /// # Security Notes
    /// - The secret should be at least 256 bits (32 bytes) for HS256
    /// - Store secrets in environment variables or secure vaults, never in code
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
            ttl,
        }
    }

    /// Lifetime applied to every issued token.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a token for `subject` carrying `roles`, valid from `now` for the configured TTL.
    ///
    /// `now` is truncated to whole seconds, so the token stops verifying at
    /// `floor(now) + ttl`.
    ///
    /// # Errors
    /// * `EncodingFailed` - Claims could not be serialized or signed, or the
    ///   expiry falls outside the representable time range
    pub fn issue<I, R>(&self, subject: &str, roles: I, now: DateTime<Utc>) -> Result<String, JwtError>
    where
        I: IntoIterator<Item = R>,
        R: ToString,
    {
        let claims = Claims::new(subject, roles, now, self.ttl)?;
        let header = Header::new(self.algorithm);

        encode(&header, &claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    /// Read the subject of a token without checking its signature or expiry.
    ///
    /// # Security Warning
    /// The returned subject is untrusted. Only use it for logging and diagnostics,
    /// never for authorization decisions.
    ///
    /// # Errors
    /// * `InvalidToken` - Token structure or claims are malformed
    pub fn parse_subject(&self, token: &str) -> Result<String, JwtError> {
        let mut validation = self.validation();
        validation.insecure_disable_signature_validation();

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims.sub)
            .map_err(|e| JwtError::InvalidToken(e.to_string()))
    }

    /// Check that a token was issued by this codec for `expected_subject` and is
    /// still valid at `now`.
    ///
    /// Every failure (tampered, foreign key, malformed, expired, other subject)
    /// yields `false`. Use [`TokenCodec::verify_strict`] to learn which one.
    pub fn verify(&self, token: &str, expected_subject: &str, now: DateTime<Utc>) -> bool {
        match self.verify_strict(token, expected_subject, now) {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!(reason = %e, "Token rejected");
                false
            }
        }
    }

    /// Verify a token for `expected_subject`, reporting the kind of failure.
    ///
    /// # Errors
    /// * `TokenExpired` - `now` is at or past the expiry
    /// * `InvalidToken` - Signature mismatch, malformed token, or subject mismatch
    pub fn verify_strict(
        &self,
        token: &str,
        expected_subject: &str,
        now: DateTime<Utc>,
    ) -> Result<Claims, JwtError> {
        let claims = self.validate(token, now)?;

        if claims.sub != expected_subject {
            return Err(JwtError::InvalidToken("subject mismatch".to_string()));
        }

        Ok(claims)
    }

    /// Verify signature and expiry of a token and return its claims.
    ///
    /// # Errors
    /// * `TokenExpired` - `now` is at or past the expiry
    /// * `InvalidToken` - Signature mismatch or malformed token
    pub fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, JwtError> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation()).map_err(|e| {
                match e.kind() {
                    ErrorKind::InvalidSignature => {
                        JwtError::InvalidToken("signature mismatch".to_string())
                    }
                    _ => JwtError::InvalidToken(e.to_string()),
                }
            })?;

        let claims = token_data.claims;
        if claims.is_expired(now.timestamp()) {
            return Err(JwtError::TokenExpired);
        }

        Ok(claims)
    }

    // Expiry is checked against the caller's clock, so the library's own
    // wall-clock check and leeway are turned off.
    fn validation(&self) -> Validation {
        let mut validation = Validation::new(self.algorithm);
        validation.required_spec_claims.clear();
        validation.validate_exp = false;
        validation.leeway = 0;
        validation
    }
}
