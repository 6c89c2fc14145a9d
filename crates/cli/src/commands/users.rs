//! User management commands.
//!
//! # Usage
//!
//! ```bash
//! # Create the site administrator (admins cannot sign up through the site)
//! cs-cli user create -u site_admin -p 'Adm1n!pass' -r admin
//!
//! # Create a shop owner with an email address
//! cs-cli user create -u corner_owner -p 'Own3r!pass' -r owner -e owner@example.com
//! ```

use thiserror::Error;

use corner_shop_core::{Role, UnknownRole, UserId};
use corner_shop_storefront::services::{AuthError, AuthService};

use super::{ConnectError, connect};

/// Errors that can occur during user operations.
#[derive(Debug, Error)]
pub enum UserError {
    #[error(transparent)]
    Connect(#[from] ConnectError),

    /// Invalid role.
    #[error("{0}. Valid roles: enduser, owner, admin")]
    InvalidRole(#[from] UnknownRole),

    /// Username or password rejected.
    #[error("{}", .0.messages().join(" "))]
    Invalid(corner_shop_core::ValidationErrors),

    #[error("{0}")]
    Auth(AuthError),
}

impl From<AuthError> for UserError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Validation(errors) => Self::Invalid(errors),
            other => Self::Auth(other),
        }
    }
}

/// Create a user with any role.
///
/// # Returns
///
/// The ID of the created user.
///
/// # Errors
///
/// Returns an error if the role is unknown, the username or password breaks
/// a rule, the username is taken, or the database is unreachable.
pub async fn create(
    username: &str,
    password: &str,
    role: &str,
    email: Option<&str>,
) -> Result<UserId, UserError> {
    let role: Role = role.parse()?;
    let pool = connect().await?;

    let user = AuthService::new(&pool)
        .create_user(username, email, password, role)
        .await?;

    tracing::info!(
        user_id = %user.id,
        username = %user.username,
        role = %user.role,
        "User created"
    );
    Ok(user.id)
}
