//! Catalog domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use corner_shop_core::{Availability, Price, ProductId, UserId};

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub category: String,
    pub availability: Availability,
    pub description: Option<String>,
    /// Reference into file storage; the image itself is stored elsewhere.
    pub image_url: Option<String>,
    /// The owner or admin who added it. `None` once that account is gone.
    pub added_by: Option<UserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
