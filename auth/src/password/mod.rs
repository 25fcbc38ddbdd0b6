pub mod argon2;
pub mod errors;

pub use argon2::PasswordHasher;
pub use errors::PasswordError;

/// One-way password hashing with constant-time verification.
///
/// Implementations must never return or log the plaintext.
pub trait CredentialHasher: Send + Sync {
    /// Hash a plaintext password for storage.
    fn hash(&self, password: &str) -> Result<String, PasswordError>;

    /// Check a plaintext password against a stored hash.
    ///
    /// Returns `Ok(false)` on mismatch; errors are reserved for unusable hashes.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError>;
}
