//! Cart-to-order transition.
//!
//! Placing an order prices the cart at current catalog prices, adds the flat
//! shipping fee, writes the order and its lines, and empties the cart. All of
//! it happens in one transaction with the cart lines locked.

use serde::Serialize;
use sqlx::PgPool;
use tracing::instrument;

use corner_shop_core::forms::CheckoutInput;
use corner_shop_core::{Action, Price, Viewer, authorize};

use super::ShopError;
use super::cart::{CartView, CartViewLine, subtotal};
use crate::db::{CartRepository, OrderRepository};
use crate::models::{CartLine, OrderWithLines};

/// Flat shipping fee added to every order.
pub const SHIPPING_FEE: Price = Price::from_cents(5000);

/// Preview of what checking out the current cart would cost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckoutSummary {
    pub items: Vec<CartViewLine>,
    pub subtotal: Price,
    pub shipping: Price,
    pub total: Price,
}

impl CheckoutSummary {
    /// Price the given cart lines.
    #[must_use]
    pub fn from_lines(lines: Vec<CartLine>) -> Self {
        let view = CartView::from_lines(lines);
        Self {
            subtotal: view.total,
            shipping: SHIPPING_FEE,
            total: view.total + SHIPPING_FEE,
            items: view.items,
        }
    }
}

/// Order total for `lines`: the subtotal plus shipping.
#[must_use]
pub fn order_total(lines: &[CartLine]) -> Price {
    subtotal(lines) + SHIPPING_FEE
}

/// Checkout service.
pub struct CheckoutService<'a> {
    pool: &'a PgPool,
    carts: CartRepository<'a>,
    orders: OrderRepository<'a>,
}

impl<'a> CheckoutService<'a> {
    /// Create a new checkout service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            pool,
            carts: CartRepository::new(pool),
            orders: OrderRepository::new(pool),
        }
    }

    /// What the caller's cart would cost if checked out now.
    ///
    /// # Errors
    ///
    /// Returns `ShopError::Access` unless the caller is a logged-in customer.
    /// Returns `ShopError::NotFound` if the caller has no cart.
    pub async fn summary(&self, viewer: Option<Viewer>) -> Result<CheckoutSummary, ShopError> {
        let viewer = authorize(viewer, Action::Checkout)?;

        let cart = self
            .carts
            .find_for_user(viewer.id)
            .await?
            .ok_or(ShopError::NotFound("cart"))?;
        let lines = self.carts.lines(cart.id).await?;

        Ok(CheckoutSummary::from_lines(lines))
    }

    /// Turn the caller's cart into an order.
    ///
    /// On success the cart is empty and the new order, with every line, is
    /// returned. On any failure nothing is written.
    ///
    /// # Errors
    ///
    /// Returns `ShopError::Access` unless the caller is a logged-in customer.
    /// Returns `ShopError::NotFound` if the caller has no cart.
    /// Returns `ShopError::Validation` if the form is invalid.
    #[instrument(skip(self, input))]
    pub async fn checkout(
        &self,
        viewer: Option<Viewer>,
        input: &CheckoutInput,
    ) -> Result<OrderWithLines, ShopError> {
        let viewer = authorize(viewer, Action::Checkout)?;

        let mut tx = self.pool.begin().await?;

        let cart = CartRepository::lock_for_user(&mut tx, viewer.id)
            .await?
            .ok_or(ShopError::NotFound("cart"))?;
        let shipping = input.validate()?;

        let lines = CartRepository::lines_for_update(&mut tx, cart.id).await?;

        let total = order_total(&lines);
        let order_id = OrderRepository::insert_order(&mut tx, viewer.id, &shipping, total).await?;
        for line in &lines {
            OrderRepository::insert_item(
                &mut tx,
                order_id,
                line.product_id,
                &line.product_name,
                line.quantity,
                line.unit_price,
            )
            .await?;
        }
        CartRepository::clear(&mut tx, cart.id).await?;

        tx.commit().await?;

        tracing::info!(
            order_id = %order_id,
            items = lines.len(),
            total = %total,
            "Order placed"
        );

        let order = self
            .orders
            .get(order_id)
            .await?
            .ok_or(ShopError::NotFound("order"))?;
        let items = self.orders.lines_for_orders(&[order_id]).await?;
        Ok(OrderWithLines::new(order, items))
    }

    /// The caller's most recent order, if they have placed one.
    ///
    /// # Errors
    ///
    /// Returns `ShopError::Access` unless the caller is a logged-in customer.
    pub async fn confirmation(
        &self,
        viewer: Option<Viewer>,
    ) -> Result<Option<OrderWithLines>, ShopError> {
        let viewer = authorize(viewer, Action::Checkout)?;

        let Some(order) = self.orders.latest_for_customer(viewer.id).await? else {
            return Ok(None);
        };
        let items = self.orders.lines_for_orders(&[order.id]).await?;

        Ok(Some(OrderWithLines::new(order, items)))
    }
}
