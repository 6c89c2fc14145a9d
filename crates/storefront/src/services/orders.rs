//! Role-scoped order history.
//!
//! - Admins see every order with every line.
//! - Shop owners see each order that contains one of their products, once,
//!   with only their own lines.
//! - Customers see the orders they placed, with every line.
//!
//! The database query already narrows orders per role; [`visible_orders`]
//! applies the same rules to what was loaded and fixes the ordering.

use std::collections::{HashMap, HashSet};

use sqlx::PgPool;
use tracing::instrument;

use corner_shop_core::{Action, OrderId, Role, Viewer, authorize};

use super::ShopError;
use crate::db::OrderRepository;
use crate::models::{Order, OrderLine, OrderWithLines};

/// Order history service.
pub struct OrderHistoryService<'a> {
    orders: OrderRepository<'a>,
}

impl<'a> OrderHistoryService<'a> {
    /// Create a new order history service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            orders: OrderRepository::new(pool),
        }
    }

    /// The orders the caller may see, newest first.
    ///
    /// # Errors
    ///
    /// Returns `ShopError::Access` if the caller is not logged in.
    #[instrument(skip(self))]
    pub async fn history(&self, viewer: Option<Viewer>) -> Result<Vec<OrderWithLines>, ShopError> {
        let viewer = authorize(viewer, Action::ViewOrderHistory)?;

        let orders = match viewer.role {
            Role::Admin => self.orders.list_all().await?,
            Role::Owner => self.orders.list_for_owner(viewer.id).await?,
            Role::EndUser => self.orders.list_for_customer(viewer.id).await?,
        };
        let ids: Vec<OrderId> = orders.iter().map(|o| o.id).collect();
        let lines = self.orders.lines_for_orders(&ids).await?;

        let visible = visible_orders(viewer, orders, lines);
        tracing::debug!(count = visible.len(), "Loaded order history");
        Ok(visible)
    }
}

/// Apply the per-role visibility rules to loaded orders and lines.
///
/// Orders come back newest first, ties broken by lower id first. Each order
/// appears at most once. For owners, orders without any of their lines are
/// dropped.
#[must_use]
pub fn visible_orders(
    viewer: Viewer,
    orders: Vec<Order>,
    lines: Vec<OrderLine>,
) -> Vec<OrderWithLines> {
    let mut lines_by_order: HashMap<OrderId, Vec<OrderLine>> = HashMap::new();
    for line in lines {
        let keep = match viewer.role {
            Role::Admin | Role::EndUser => true,
            Role::Owner => line.product_added_by == Some(viewer.id),
        };
        if keep {
            lines_by_order.entry(line.order_id).or_default().push(line);
        }
    }

    let mut seen = HashSet::new();
    let mut orders: Vec<Order> = orders
        .into_iter()
        .filter(|order| seen.insert(order.id))
        .filter(|order| match viewer.role {
            Role::Admin => true,
            Role::Owner => lines_by_order.contains_key(&order.id),
            Role::EndUser => order.user_id == viewer.id,
        })
        .collect();
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));

    orders
        .into_iter()
        .map(|order| {
            let mut items = lines_by_order.remove(&order.id).unwrap_or_default();
            items.sort_by_key(|line| line.id);
            OrderWithLines::new(order, items)
        })
        .collect()
}
