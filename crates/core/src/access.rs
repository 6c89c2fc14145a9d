//! The authorization gate.
//!
//! Every gated operation calls [`authorize`] with the caller (if any) and the
//! action it wants to perform. Authentication is checked first; only then is
//! the caller's [`Role`] consulted.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{Role, UserId};

/// The authenticated caller of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewer {
    /// The caller's user ID.
    pub id: UserId,
    /// The caller's role.
    pub role: Role,
}

impl Viewer {
    /// Create a viewer.
    #[must_use]
    pub const fn new(id: UserId, role: Role) -> Self {
        Self { id, role }
    }
}

/// Something a caller may try to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Browse the home and shop pages.
    BrowseCatalog,
    /// Add a new product to the catalog.
    CreateProduct,
    /// Reach the edit/delete forms at all, before any particular product is
    /// looked up.
    ManageProducts,
    /// Edit an existing product.
    UpdateProduct {
        /// The product's creator, `None` if the creator was removed.
        creator: Option<UserId>,
    },
    /// Remove a product from the catalog.
    DeleteProduct {
        /// The product's creator, `None` if the creator was removed.
        creator: Option<UserId>,
    },
    /// Add to or view one's own cart.
    UseCart,
    /// Check out one's own cart or view the resulting confirmation.
    Checkout,
    /// View order history (scoped by role separately).
    ViewOrderHistory,
}

/// Why an action was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AccessError {
    /// No one is logged in.
    #[error("authentication required")]
    Unauthenticated,

    /// Logged in, but the role or ownership check failed.
    #[error("{0}")]
    Forbidden(&'static str),
}

/// Decide whether `viewer` may perform `action`.
///
/// Returns the viewer back on success so call sites can bind it.
///
/// # Errors
///
/// Returns `AccessError::Unauthenticated` if `viewer` is `None`.
/// Returns `AccessError::Forbidden` if the role or ownership check fails.
pub fn authorize(viewer: Option<Viewer>, action: Action) -> Result<Viewer, AccessError> {
    let viewer = viewer.ok_or(AccessError::Unauthenticated)?;

    let allowed = match action {
        Action::CreateProduct | Action::ManageProducts => match viewer.role {
            Role::Admin | Role::Owner => true,
            Role::EndUser => false,
        },
        Action::UpdateProduct { creator } | Action::DeleteProduct { creator } => {
            match viewer.role {
                Role::Admin => true,
                Role::Owner => creator == Some(viewer.id),
                Role::EndUser => false,
            }
        }
        Action::UseCart | Action::Checkout => match viewer.role {
            Role::EndUser => true,
            Role::Owner | Role::Admin => false,
        },
        Action::BrowseCatalog | Action::ViewOrderHistory => true,
    };

    if allowed {
        Ok(viewer)
    } else {
        Err(AccessError::Forbidden(denial_message(action)))
    }
}

const fn denial_message(action: Action) -> &'static str {
    match action {
        Action::BrowseCatalog => "You are not allowed to browse the shop.",
        Action::CreateProduct => "You are not allowed to add products.",
        Action::ManageProducts => "You are not allowed to manage products.",
        Action::UpdateProduct { .. } => "You are not allowed to update this item.",
        Action::DeleteProduct { .. } => "You are not allowed to delete this item.",
        Action::UseCart | Action::Checkout => "Only customers can shop.",
        Action::ViewOrderHistory => "You are not allowed to view orders.",
    }
}
