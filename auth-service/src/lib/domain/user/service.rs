use std::sync::Arc;

use async_trait::async_trait;
use auth::AuthenticationError;
use auth::AuthenticationResult;
use auth::Authenticator;
use auth::Principal;
use chrono::Utc;

use crate::domain::user::models::RegisterCommand;
use crate::domain::user::models::SignInCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::Username;
use crate::user::errors::UserError;
use crate::user::ports::AuthenticationServicePort;
use crate::user::ports::UserRepository;

/// Domain service implementation for registration and sign-in.
///
/// Owns the registration uniqueness checks and delegates credential checks and
/// token issuance to the injected [`Authenticator`].
pub struct AuthenticationService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    authenticator: Arc<Authenticator>,
}

impl<UR> AuthenticationService<UR>
where
    UR: UserRepository,
{
    /// Create a new authentication service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - User persistence implementation
    /// * `authenticator` - Credential hasher and token codec
    ///
    /// # Returns
    /// Configured authentication service instance
    pub fn new(repository: Arc<UR>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            repository,
            authenticator,
        }
    }

    async fn find_for_sign_in(&self, username: String) -> Result<Option<User>, UserError> {
        match Username::new(username) {
            Ok(username) => self.repository.find_by_username(&username).await,
            Err(_) => Ok(None),
        }
    }
}

#[async_trait]
impl<UR> AuthenticationServicePort for AuthenticationService<UR>
where
    UR: UserRepository,
{
    async fn register(&self, command: RegisterCommand) -> Result<User, UserError> {
        if self
            .repository
            .find_by_username(&command.username)
            .await?
            .is_some()
        {
            return Err(UserError::DuplicateUsername(command.username.to_string()));
        }

        if self
            .repository
            .find_by_email(&command.email)
            .await?
            .is_some()
        {
            return Err(UserError::DuplicateEmail(command.email.to_string()));
        }

        let password_hash = self
            .authenticator
            .hash_password(command.password.expose())?;

        // The store re-checks uniqueness on insert and reports a lost race with
        // the same duplicate errors.
        let user = self
            .repository
            .create(User::register(command.username, command.email, password_hash))
            .await?;

        tracing::info!(
            user_id = %user.id,
            username = %user.username,
            "User registered"
        );

        Ok(user)
    }

    async fn sign_in(&self, command: SignInCommand) -> Result<AuthenticationResult, UserError> {
        let SignInCommand { username, password } = command;

        let Some(user) = self.find_for_sign_in(username).await? else {
            tracing::warn!("Sign-in rejected: invalid credentials");
            return Err(self.authenticator.reject_unknown(password.expose()).into());
        };

        let principal = Principal::from(&user);

        self.authenticator
            .authenticate(password.expose(), &principal, Utc::now())
            .map_err(|e| {
                if matches!(e, AuthenticationError::InvalidCredentials) {
                    tracing::warn!("Sign-in rejected: invalid credentials");
                }
                UserError::from(e)
            })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use auth::PasswordHasher;
    use auth::TokenCodec;
    use chrono::Duration;
    use mockall::mock;

    use super::*;
    use crate::domain::user::models::EmailAddress;
    use crate::domain::user::models::PlaintextPassword;
    use crate::domain::user::models::Role;
    use crate::outbound::repositories::memory::InMemoryUserRepository;

    const SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

    // Define mocks in the test module using mockall
    mock! {
        pub TestUserRepository {}

        #[async_trait]
        impl UserRepository for TestUserRepository {
            async fn create(&self, user: User) -> Result<User, UserError>;
            async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError>;
            async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError>;
        }
    }

    fn authenticator() -> Arc<Authenticator> {
        Arc::new(Authenticator::new(
            PasswordHasher::new(),
            TokenCodec::new(SECRET, Duration::hours(24)),
        ))
    }

    fn register_command(username: &str, email: &str, password: &str) -> RegisterCommand {
        RegisterCommand::new(
            Username::new(username.to_string()).unwrap(),
            EmailAddress::new(email.to_string()).unwrap(),
            PlaintextPassword::new(password.to_string()).unwrap(),
        )
    }

    fn sign_in_command(username: &str, password: &str) -> SignInCommand {
        SignInCommand::new(
            username.to_string(),
            PlaintextPassword::new(password.to_string()).unwrap(),
        )
    }

    fn stored_user(authenticator: &Authenticator, password: &str) -> User {
        User::register(
            Username::new("testuser".to_string()).unwrap(),
            EmailAddress::new("test@test.com".to_string()).unwrap(),
            authenticator.hash_password(password).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_register_success() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_username()
            .times(1)
            .returning(|_| Ok(None));
        repository
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(None));
        repository
            .expect_create()
            .withf(|user| {
                user.username.as_str() == "testuser"
                    && user.email.as_str() == "test@test.com"
                    && user.password_hash.starts_with("$argon2")
                    && user.roles == BTreeSet::from([Role::User])
            })
            .times(1)
            .returning(|user| Ok(user));

        let service = AuthenticationService::new(Arc::new(repository), authenticator());

        let user = service
            .register(register_command("testuser", "test@test.com", "password"))
            .await
            .expect("Registration failed");

        assert_eq!(user.username.as_str(), "testuser");
        assert_eq!(user.email.as_str(), "test@test.com");
        // Password is hashed with real Argon2
        assert!(user.password_hash.starts_with("$argon2"));
        assert_ne!(user.password_hash, "password");
    }

    #[tokio::test]
    async fn test_register_duplicate_username() {
        let mut repository = MockTestUserRepository::new();
        let authenticator = authenticator();
        let existing = stored_user(&authenticator, "password");

        repository
            .expect_find_by_username()
            .times(1)
            .returning(move |_| Ok(Some(existing.clone())));
        repository.expect_find_by_email().times(0);
        repository.expect_create().times(0);

        let service = AuthenticationService::new(Arc::new(repository), authenticator);

        let result = service
            .register(register_command("testuser", "other@test.com", "password"))
            .await;

        assert!(matches!(
            result.unwrap_err(),
            UserError::DuplicateUsername(name) if name == "testuser"
        ));
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let mut repository = MockTestUserRepository::new();
        let authenticator = authenticator();
        let existing = stored_user(&authenticator, "password");

        repository
            .expect_find_by_username()
            .times(1)
            .returning(|_| Ok(None));
        repository
            .expect_find_by_email()
            .times(1)
            .returning(move |_| Ok(Some(existing.clone())));
        repository.expect_create().times(0);

        let service = AuthenticationService::new(Arc::new(repository), authenticator);

        let result = service
            .register(register_command("otheruser", "test@test.com", "password"))
            .await;

        assert!(matches!(
            result.unwrap_err(),
            UserError::DuplicateEmail(email) if email == "test@test.com"
        ));
    }

    #[tokio::test]
    async fn test_register_username_takes_precedence_over_email() {
        let repository = Arc::new(InMemoryUserRepository::new());
        let service = AuthenticationService::new(Arc::clone(&repository), authenticator());

        service
            .register(register_command("testuser", "test@test.com", "password"))
            .await
            .expect("Registration failed");

        let result = service
            .register(register_command("testuser", "test@test.com", "password"))
            .await;

        assert!(matches!(
            result.unwrap_err(),
            UserError::DuplicateUsername(_)
        ));
    }

    #[tokio::test]
    async fn test_register_store_level_duplicate_is_reported() {
        let mut repository = MockTestUserRepository::new();

        // Both checks pass, then a concurrent registration wins the insert.
        repository
            .expect_find_by_username()
            .times(1)
            .returning(|_| Ok(None));
        repository
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(None));
        repository.expect_create().times(1).returning(|user| {
            Err(UserError::DuplicateUsername(
                user.username.as_str().to_string(),
            ))
        });

        let service = AuthenticationService::new(Arc::new(repository), authenticator());

        let result = service
            .register(register_command("testuser", "test@test.com", "password"))
            .await;

        assert!(matches!(
            result.unwrap_err(),
            UserError::DuplicateUsername(_)
        ));
    }

    #[tokio::test]
    async fn test_register_database_error_propagates() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_username()
            .times(1)
            .returning(|_| Err(UserError::DatabaseError("connection reset".to_string())));

        let service = AuthenticationService::new(Arc::new(repository), authenticator());

        let result = service
            .register(register_command("testuser", "test@test.com", "password"))
            .await;

        assert!(matches!(result.unwrap_err(), UserError::DatabaseError(_)));
    }

    #[tokio::test]
    async fn test_sign_in_success() {
        let mut repository = MockTestUserRepository::new();
        let authenticator = authenticator();
        let existing = stored_user(&authenticator, "password");

        repository
            .expect_find_by_username()
            .withf(|username| username.as_str() == "testuser")
            .times(1)
            .returning(move |_| Ok(Some(existing.clone())));

        let service = AuthenticationService::new(Arc::new(repository), Arc::clone(&authenticator));

        let result = service
            .sign_in(sign_in_command("testuser", "password"))
            .await
            .expect("Sign-in failed");

        let claims = authenticator
            .validate_token(&result.access_token, Utc::now())
            .expect("Token validation failed");
        assert_eq!(claims.sub, "testuser");
        assert!(claims.has_role("USER"));
        assert!(!claims.has_role("ADMIN"));
    }

    #[tokio::test]
    async fn test_sign_in_wrong_password_and_unknown_user_are_indistinguishable() {
        let mut repository = MockTestUserRepository::new();
        let authenticator = authenticator();
        let existing = stored_user(&authenticator, "password");

        repository
            .expect_find_by_username()
            .returning(move |username| {
                if username.as_str() == "testuser" {
                    Ok(Some(existing.clone()))
                } else {
                    Ok(None)
                }
            });

        let service = AuthenticationService::new(Arc::new(repository), authenticator);

        let wrong_password = service
            .sign_in(sign_in_command("testuser", "wrong-password"))
            .await
            .unwrap_err();
        let unknown_user = service
            .sign_in(sign_in_command("nobody", "password"))
            .await
            .unwrap_err();

        assert!(matches!(wrong_password, UserError::InvalidCredentials));
        assert!(matches!(unknown_user, UserError::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown_user.to_string());
    }

    #[tokio::test]
    async fn test_sign_in_malformed_username_is_invalid_credentials() {
        let mut repository = MockTestUserRepository::new();
        repository.expect_find_by_username().times(0);

        let service = AuthenticationService::new(Arc::new(repository), authenticator());

        let result = service.sign_in(sign_in_command("x", "password")).await;

        assert!(matches!(result.unwrap_err(), UserError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_register_then_sign_in() {
        let repository = Arc::new(InMemoryUserRepository::new());
        let authenticator = authenticator();
        let service = AuthenticationService::new(repository, Arc::clone(&authenticator));

        service
            .register(register_command("testuser", "test@test.com", "password"))
            .await
            .expect("Registration failed");

        let result = service
            .sign_in(sign_in_command("testuser", "password"))
            .await
            .expect("Sign-in failed");

        assert_eq!(
            authenticator.parse_subject(&result.access_token),
            Ok("testuser".to_string())
        );
        assert!(authenticator.verify_token(&result.access_token, "testuser", Utc::now()));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_registrations_admit_one_winner() {
        let repository = Arc::new(InMemoryUserRepository::new());
        let service = Arc::new(AuthenticationService::new(repository, authenticator()));

        let first = {
            let service = Arc::clone(&service);
            tokio::spawn(async move {
                service
                    .register(register_command("testuser", "first@test.com", "password"))
                    .await
            })
        };
        let second = {
            let service = Arc::clone(&service);
            tokio::spawn(async move {
                service
                    .register(register_command("testuser", "second@test.com", "password"))
                    .await
            })
        };

        let results = [first.await.unwrap(), second.await.unwrap()];

        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(results
            .iter()
            .any(|r| matches!(r, Err(UserError::DuplicateUsername(_)))));
    }
}
