use std::collections::BTreeSet;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::errors::JwtError;

/// Claims carried by an access token.
///
/// `iat` and `exp` are Unix timestamps in whole seconds. The issuance instant is
/// truncated to the second, so the validity window is `[iat, iat + ttl)` and a
/// token issued at `t0` expires up to one second before `t0 + ttl`. Role claims
/// are kept sorted so the serialized payload is deterministic for a given
/// subject and role set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (username of the authenticated user)
    pub sub: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp, exclusive)
    pub exp: i64,

    /// Granted roles
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub roles: BTreeSet<String>,
}

impl Claims {
    /// Create claims for a subject issued at `issued_at` and valid for `ttl`.
    ///
    /// # Arguments
    /// * `subject` - Subject identifier (username)
    /// * `roles` - Role claims to embed
    /// * `issued_at` - Issuance instant
    /// * `ttl` - Validity window starting at `issued_at`
    ///
    /// # Returns
    /// Claims with sub, iat, exp and roles set
    ///
    /// # Errors
    /// * `EncodingFailed` - `issued_at + ttl` is outside the representable time range
    pub fn new<I, R>(
        subject: impl ToString,
        roles: I,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<Self, JwtError>
    where
        I: IntoIterator<Item = R>,
        R: ToString,
    {
        let iat = issued_at.timestamp();
        let exp = DateTime::<Utc>::from_timestamp(iat, 0)
            .and_then(|issued| issued.checked_add_signed(ttl))
            .map(|expiration| expiration.timestamp())
            .ok_or_else(|| JwtError::EncodingFailed("token expiry out of range".to_string()))?;

        Ok(Self {
            sub: subject.to_string(),
            iat,
            exp,
            roles: roles.into_iter().map(|role| role.to_string()).collect(),
        })
    }

    /// Check if the token is expired at `current_timestamp`.
    ///
    /// Expiry is exclusive: a token is no longer valid at the second equal to `exp`.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        current_timestamp >= self.exp
    }

    /// Check whether a role claim is present.
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }
}
