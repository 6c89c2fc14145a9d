//! User domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use corner_shop_core::{Role, UserId, Viewer};

/// A storefront account (domain type).
///
/// The password hash never leaves the repository layer.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Login name.
    pub username: String,
    /// Optional contact address.
    pub email: Option<String>,
    /// Role assigned at creation.
    pub role: Role,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
}

impl User {
    /// This user as the caller of an operation.
    #[must_use]
    pub const fn viewer(&self) -> Viewer {
        Viewer::new(self.id, self.role)
    }
}
