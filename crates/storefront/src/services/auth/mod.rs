//! Authentication service.
//!
//! Username and password accounts with Argon2id hashes. Self-service sign-up
//! may only pick the customer or shop owner role; admins are created through
//! the CLI with [`AuthService::create_user`].

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sqlx::PgPool;
use tracing::instrument;

use corner_shop_core::forms::{SignupInput, check_email, check_password, check_username};
use corner_shop_core::{Email, Role, ValidationErrors};

use crate::db::RepositoryError;
use crate::db::users::UserRepository;
use crate::models::User;

const USERNAME_TAKEN: &str = "A user with that username already exists.";

/// Authentication service.
///
/// Handles user registration and login.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    /// Register a new account from the sign-up form.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Validation` with every failing rule, or with a
    /// single username error if the name is already taken.
    pub async fn register(&self, input: &SignupInput) -> Result<User, AuthError> {
        let registration = input.validate()?;

        let user = self
            .insert(
                &registration.username,
                registration.email.as_ref().map(Email::as_str),
                &registration.password,
                registration.role,
            )
            .await?;

        tracing::info!(user_id = %user.id, role = %user.role, "Registered user");
        Ok(user)
    }

    /// Create an account with any role, admins included.
    ///
    /// The same username and password rules as sign-up apply.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Validation` if the username or password breaks a
    /// rule or the username is taken.
    pub async fn create_user(
        &self,
        username: &str,
        email: Option<&str>,
        password: &str,
        role: Role,
    ) -> Result<User, AuthError> {
        let mut errors = ValidationErrors::new();
        check_username(&mut errors, username);
        check_password(&mut errors, "password", password);
        let email = email.and_then(|email| check_email(&mut errors, email));
        errors.finish(())?;

        self.insert(username, email.as_ref().map(Email::as_str), password, role)
            .await
    }

    /// Login with username and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the username or password is wrong.
    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<User, AuthError> {
        let (user, password_hash) = self
            .users
            .get_password_hash(username.trim())
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        Ok(user)
    }

    async fn insert(
        &self,
        username: &str,
        email: Option<&str>,
        password: &str,
        role: Role,
    ) -> Result<User, AuthError> {
        let password_hash = hash_password(password)?;

        self.users
            .create(username, email, &password_hash, role)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => {
                    AuthError::Validation(ValidationErrors::single("username", USERNAME_TAKEN))
                }
                other => AuthError::Repository(other),
            })
    }
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use sqlx::postgres::PgPoolOptions;

    use super::*;

    #[test]
    fn test_hash_then_verify() {
        let hash = hash_password("Secr3t!pw").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("Secr3t!pw", &hash).is_ok());
        assert!(matches!(
            verify_password("secr3t!pw", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_garbage_hash_is_invalid_credentials() {
        assert!(matches!(
            verify_password("anything", "not-a-phc-string"),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_salts_differ() {
        let a = hash_password("Secr3t!pw").unwrap();
        let b = hash_password("Secr3t!pw").unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_create_user_rejects_malformed_email_before_touching_the_database() {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/unused")
            .unwrap();

        let err = AuthService::new(&pool)
            .create_user("corner_owner", Some("owner-at-shop"), "Secr3t!pw", Role::Owner)
            .await
            .unwrap_err();
        let AuthError::Validation(errors) = err else {
            panic!("expected validation error, got {err:?}");
        };
        assert_eq!(errors.for_field("email"), vec!["Enter a valid email address."]);
    }
}
