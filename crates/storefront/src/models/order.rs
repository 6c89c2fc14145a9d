//! Order domain types.
//!
//! Orders and their lines are snapshots taken at checkout. Line names and
//! prices are those at that moment and do not follow later catalog edits or
//! deletions.

use chrono::{DateTime, Utc};
use serde::Serialize;

use corner_shop_core::{OrderId, OrderItemId, PaymentMethod, Price, ProductId, UserId};

/// A placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Order {
    pub id: OrderId,
    /// The purchasing user.
    pub user_id: UserId,
    /// The purchasing user's login name, for order history listings.
    pub username: String,
    pub full_name: String,
    pub address: String,
    pub phone: String,
    pub payment_method: PaymentMethod,
    pub total_price: Price,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Customer-facing order number.
    #[must_use]
    pub fn order_number(&self) -> String {
        self.id.order_number()
    }
}

/// One purchased product within an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderLine {
    pub id: OrderItemId,
    pub order_id: OrderId,
    /// `None` once the product has been removed from the catalog.
    pub product_id: Option<ProductId>,
    /// Product name captured at checkout.
    pub product_name: String,
    /// Creator of the product, used to scope what shop owners see.
    pub product_added_by: Option<UserId>,
    pub quantity: u32,
    /// Unit price captured at checkout.
    pub price: Price,
    pub created_at: DateTime<Utc>,
}

/// An order together with the lines the current viewer may see.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderWithLines {
    #[serde(flatten)]
    pub order: Order,
    pub order_number: String,
    pub items: Vec<OrderLine>,
}

impl OrderWithLines {
    /// Pair an order with its lines.
    #[must_use]
    pub fn new(order: Order, items: Vec<OrderLine>) -> Self {
        let order_number = order.order_number();
        Self {
            order,
            order_number,
            items,
        }
    }
}
