use std::collections::BTreeSet;
use std::fmt;

/// Identity being authenticated, as seen by the credential check.
///
/// Built from a stored user record for a single sign-in and dropped afterwards.
#[derive(Clone, PartialEq, Eq)]
pub struct Principal {
    username: String,
    password_hash: String,
    roles: BTreeSet<String>,
}

impl Principal {
    pub fn new<I, R>(username: impl Into<String>, password_hash: impl Into<String>, roles: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: ToString,
    {
        Self {
            username: username.into(),
            password_hash: password_hash.into(),
            roles: roles.into_iter().map(|role| role.to_string()).collect(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn roles(&self) -> &BTreeSet<String> {
        &self.roles
    }
}

impl fmt::Debug for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Principal")
            .field("username", &self.username)
            .field("password_hash", &"[REDACTED]")
            .field("roles", &self.roles)
            .finish()
    }
}
