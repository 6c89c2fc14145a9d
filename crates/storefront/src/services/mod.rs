//! Business logic services for storefront.
//!
//! # Services
//!
//! - `auth` - Registration and password login
//! - `catalog` - Product listing and owner/admin product management
//! - `cart` - Per-customer cart
//! - `checkout` - Cart-to-order transition
//! - `orders` - Role-scoped order history
//!
//! Every gated operation takes the caller as `Option<Viewer>` and runs it
//! through [`corner_shop_core::authorize`] before touching the database.

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod orders;

use thiserror::Error;

use corner_shop_core::{AccessError, ValidationErrors};

use crate::db::RepositoryError;

pub use auth::{AuthError, AuthService};
pub use cart::{CartService, CartView};
pub use catalog::{CatalogService, ShopPage};
pub use checkout::{CheckoutService, CheckoutSummary, SHIPPING_FEE};
pub use orders::OrderHistoryService;

/// Errors returned by the shop services.
#[derive(Debug, Error)]
pub enum ShopError {
    /// The referenced product, cart or order does not exist.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Submitted form data failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    /// The caller may not perform the operation.
    #[error(transparent)]
    Access(#[from] AccessError),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

impl From<sqlx::Error> for ShopError {
    fn from(err: sqlx::Error) -> Self {
        Self::Repository(RepositoryError::Database(err))
    }
}
