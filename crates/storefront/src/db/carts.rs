//! Cart repository for database operations.
//!
//! Functions taking a `&mut PgConnection` are meant to run inside the
//! checkout transaction; the rest use the pool directly.

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};

use corner_shop_core::{CartId, CartItemId, Price, ProductId, UserId};

use super::{RepositoryError, quantity_from_db};
use crate::models::{Cart, CartItem, CartLine};

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct CartRow {
    id: CartId,
    user_id: UserId,
    created_at: DateTime<Utc>,
}

impl From<CartRow> for Cart {
    fn from(row: CartRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CartItemRow {
    id: CartItemId,
    cart_id: CartId,
    product_id: ProductId,
    quantity: i32,
}

impl TryFrom<CartItemRow> for CartItem {
    type Error = RepositoryError;

    fn try_from(row: CartItemRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            cart_id: row.cart_id,
            product_id: row.product_id,
            quantity: quantity_from_db(row.quantity)?,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CartLineRow {
    item_id: CartItemId,
    product_id: ProductId,
    product_name: String,
    unit_price: Price,
    quantity: i32,
}

impl TryFrom<CartLineRow> for CartLine {
    type Error = RepositoryError;

    fn try_from(row: CartLineRow) -> Result<Self, Self::Error> {
        Ok(Self {
            item_id: row.item_id,
            product_id: row.product_id,
            product_name: row.product_name,
            unit_price: row.unit_price,
            quantity: quantity_from_db(row.quantity)?,
        })
    }
}

fn into_lines(rows: Vec<CartLineRow>) -> Result<Vec<CartLine>, RepositoryError> {
    rows.into_iter().map(CartLine::try_from).collect()
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for cart database operations.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Find the user's cart without creating one.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_for_user(&self, user_id: UserId) -> Result<Option<Cart>, RepositoryError> {
        let row = sqlx::query_as::<_, CartRow>(
            "SELECT id, user_id, created_at FROM storefront.carts WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Cart::from))
    }

    /// Return the user's cart, creating it if it does not exist yet.
    ///
    /// Concurrent callers for the same user always end up with the same cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_or_create(&self, user_id: UserId) -> Result<Cart, RepositoryError> {
        let row = sqlx::query_as::<_, CartRow>(
            r"
            INSERT INTO storefront.carts (user_id)
            VALUES ($1)
            ON CONFLICT (user_id) DO UPDATE SET user_id = EXCLUDED.user_id
            RETURNING id, user_id, created_at
            ",
        )
        .bind(user_id)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Add one unit of a product to a cart.
    ///
    /// Creates the line with quantity 1 or increments the existing line in a
    /// single statement.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the upsert fails.
    pub async fn add_product(
        &self,
        cart_id: CartId,
        product_id: ProductId,
    ) -> Result<CartItem, RepositoryError> {
        let row = sqlx::query_as::<_, CartItemRow>(
            r"
            INSERT INTO storefront.cart_items (cart_id, product_id, quantity)
            VALUES ($1, $2, 1)
            ON CONFLICT (cart_id, product_id)
            DO UPDATE SET quantity = storefront.cart_items.quantity + 1
            RETURNING id, cart_id, product_id, quantity
            ",
        )
        .bind(cart_id)
        .bind(product_id)
        .fetch_one(self.pool)
        .await?;

        row.try_into()
    }

    /// The cart's lines with current product names and prices, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` on a non-positive quantity.
    pub async fn lines(&self, cart_id: CartId) -> Result<Vec<CartLine>, RepositoryError> {
        let rows = sqlx::query_as::<_, CartLineRow>(
            r"
            SELECT ci.id AS item_id, ci.product_id, p.name AS product_name,
                   p.price AS unit_price, ci.quantity
            FROM storefront.cart_items ci
            JOIN storefront.products p ON p.id = ci.product_id
            WHERE ci.cart_id = $1
            ORDER BY ci.id ASC
            ",
        )
        .bind(cart_id)
        .fetch_all(self.pool)
        .await?;

        into_lines(rows)
    }

    /// Total quantity across the user's cart lines, 0 if there is no cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn item_count(&self, user_id: UserId) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar(
            r"
            SELECT COALESCE(SUM(ci.quantity), 0)::BIGINT
            FROM storefront.carts c
            JOIN storefront.cart_items ci ON ci.cart_id = c.id
            WHERE c.user_id = $1
            ",
        )
        .bind(user_id)
        .fetch_one(self.pool)
        .await?;

        Ok(count)
    }

    /// Find the user's cart and lock it for the rest of the transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn lock_for_user(
        conn: &mut PgConnection,
        user_id: UserId,
    ) -> Result<Option<Cart>, RepositoryError> {
        let row = sqlx::query_as::<_, CartRow>(
            r"
            SELECT id, user_id, created_at
            FROM storefront.carts
            WHERE user_id = $1
            FOR UPDATE
            ",
        )
        .bind(user_id)
        .fetch_optional(conn)
        .await?;

        Ok(row.map(Cart::from))
    }

    /// The cart's lines, locking the item rows for the rest of the transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` on a non-positive quantity.
    pub async fn lines_for_update(
        conn: &mut PgConnection,
        cart_id: CartId,
    ) -> Result<Vec<CartLine>, RepositoryError> {
        let rows = sqlx::query_as::<_, CartLineRow>(
            r"
            SELECT ci.id AS item_id, ci.product_id, p.name AS product_name,
                   p.price AS unit_price, ci.quantity
            FROM storefront.cart_items ci
            JOIN storefront.products p ON p.id = ci.product_id
            WHERE ci.cart_id = $1
            ORDER BY ci.id ASC
            FOR UPDATE OF ci
            ",
        )
        .bind(cart_id)
        .fetch_all(conn)
        .await?;

        into_lines(rows)
    }

    /// Remove every line from a cart. The cart itself is kept.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn clear(conn: &mut PgConnection, cart_id: CartId) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM storefront.cart_items WHERE cart_id = $1")
            .bind(cart_id)
            .execute(conn)
            .await?;

        Ok(result.rows_affected())
    }
}
