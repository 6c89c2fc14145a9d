//! Per-customer shopping cart.

use serde::Serialize;
use sqlx::PgPool;
use tracing::instrument;

use corner_shop_core::{Action, Price, ProductId, Viewer, authorize};

use super::ShopError;
use crate::db::{CartRepository, ProductRepository};
use crate::models::{CartItem, CartLine};

/// A cart line with its computed total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartViewLine {
    #[serde(flatten)]
    pub line: CartLine,
    pub line_total: Price,
}

/// The cart as shown to its owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct CartView {
    pub items: Vec<CartViewLine>,
    /// Sum of the line totals at current catalog prices.
    pub total: Price,
}

impl CartView {
    /// Price the given lines.
    #[must_use]
    pub fn from_lines(lines: Vec<CartLine>) -> Self {
        let total = subtotal(&lines);
        let items = lines
            .into_iter()
            .map(|line| CartViewLine {
                line_total: line.line_total(),
                line,
            })
            .collect();
        Self { items, total }
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Σ(unit price × quantity) over `lines`.
#[must_use]
pub fn subtotal(lines: &[CartLine]) -> Price {
    lines.iter().map(CartLine::line_total).sum()
}

/// Cart service.
pub struct CartService<'a> {
    carts: CartRepository<'a>,
    products: ProductRepository<'a>,
}

impl<'a> CartService<'a> {
    /// Create a new cart service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            carts: CartRepository::new(pool),
            products: ProductRepository::new(pool),
        }
    }

    /// Add one unit of a product to the caller's cart, creating the cart on
    /// first use.
    ///
    /// # Errors
    ///
    /// Returns `ShopError::Access` unless the caller is a logged-in customer.
    /// Returns `ShopError::NotFound` if the product does not exist.
    #[instrument(skip(self))]
    pub async fn add(
        &self,
        viewer: Option<Viewer>,
        product_id: ProductId,
    ) -> Result<CartItem, ShopError> {
        let viewer = authorize(viewer, Action::UseCart)?;

        if self.products.get(product_id).await?.is_none() {
            return Err(ShopError::NotFound("product"));
        }

        let cart = self.carts.get_or_create(viewer.id).await?;
        let item = self.carts.add_product(cart.id, product_id).await?;

        tracing::debug!(cart_id = %cart.id, quantity = item.quantity, "Added to cart");
        Ok(item)
    }

    /// The caller's cart. A customer who never added anything sees an empty
    /// cart; no cart row is created.
    ///
    /// # Errors
    ///
    /// Returns `ShopError::Access` unless the caller is a logged-in customer.
    #[instrument(skip(self))]
    pub async fn view(&self, viewer: Option<Viewer>) -> Result<CartView, ShopError> {
        let viewer = authorize(viewer, Action::UseCart)?;

        let Some(cart) = self.carts.find_for_user(viewer.id).await? else {
            return Ok(CartView::default());
        };
        let lines = self.carts.lines(cart.id).await?;

        Ok(CartView::from_lines(lines))
    }

    /// Total number of units in the caller's cart.
    ///
    /// # Errors
    ///
    /// Returns `ShopError::Access` unless the caller is a logged-in customer.
    pub async fn count(&self, viewer: Option<Viewer>) -> Result<i64, ShopError> {
        let viewer = authorize(viewer, Action::UseCart)?;
        Ok(self.carts.item_count(viewer.id).await?)
    }
}
