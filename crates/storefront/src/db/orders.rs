//! Order repository for database operations.
//!
//! Orders are only ever inserted (inside the checkout transaction) and read.

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};

use corner_shop_core::{
    OrderId, OrderItemId, PaymentMethod, Price, ProductId, UserId, forms::ShippingDetails,
};

use super::{RepositoryError, quantity_from_db};
use crate::models::{Order, OrderLine};

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: OrderId,
    user_id: UserId,
    username: String,
    full_name: String,
    address: String,
    phone: String,
    payment_method: PaymentMethod,
    total_price: Price,
    created_at: DateTime<Utc>,
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            username: row.username,
            full_name: row.full_name,
            address: row.address,
            phone: row.phone,
            payment_method: row.payment_method,
            total_price: row.total_price,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct OrderLineRow {
    id: OrderItemId,
    order_id: OrderId,
    product_id: Option<ProductId>,
    product_name: String,
    product_added_by: Option<UserId>,
    quantity: i32,
    price: Price,
    created_at: DateTime<Utc>,
}

impl TryFrom<OrderLineRow> for OrderLine {
    type Error = RepositoryError;

    fn try_from(row: OrderLineRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            order_id: row.order_id,
            product_id: row.product_id,
            product_name: row.product_name,
            product_added_by: row.product_added_by,
            quantity: quantity_from_db(row.quantity)?,
            price: row.price,
            created_at: row.created_at,
        })
    }
}

const ORDER_SELECT: &str = r"
    SELECT o.id, o.user_id, u.username, o.full_name, o.address, o.phone,
           o.payment_method, o.total_price, o.created_at
    FROM storefront.orders o
    JOIN storefront.users u ON u.id = o.user_id
";

// =============================================================================
// Repository
// =============================================================================

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert an order header.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn insert_order(
        conn: &mut PgConnection,
        user_id: UserId,
        shipping: &ShippingDetails,
        total_price: Price,
    ) -> Result<OrderId, RepositoryError> {
        let id: OrderId = sqlx::query_scalar(
            r"
            INSERT INTO storefront.orders
                (user_id, full_name, address, phone, payment_method, total_price)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            ",
        )
        .bind(user_id)
        .bind(&shipping.full_name)
        .bind(&shipping.address)
        .bind(&shipping.phone)
        .bind(shipping.payment_method)
        .bind(total_price)
        .fetch_one(conn)
        .await?;

        Ok(id)
    }

    /// Insert one order line with the product name and unit price captured now.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn insert_item(
        conn: &mut PgConnection,
        order_id: OrderId,
        product_id: ProductId,
        product_name: &str,
        quantity: u32,
        unit_price: Price,
    ) -> Result<OrderItemId, RepositoryError> {
        let quantity = i32::try_from(quantity).map_err(|_| {
            RepositoryError::DataCorruption(format!("quantity {quantity} out of range"))
        })?;

        let id: OrderItemId = sqlx::query_scalar(
            r"
            INSERT INTO storefront.order_items
                (order_id, product_id, product_name, quantity, price)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            ",
        )
        .bind(order_id)
        .bind(product_id)
        .bind(product_name)
        .bind(quantity)
        .bind(unit_price)
        .fetch_one(conn)
        .await?;

        Ok(id)
    }

    /// Get one order header.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!("{ORDER_SELECT} WHERE o.id = $1"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(row.map(Order::from))
    }

    /// Every order, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "{ORDER_SELECT} ORDER BY o.created_at DESC, o.id ASC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Order::from).collect())
    }

    /// Orders containing at least one product added by `owner`, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_owner(&self, owner: UserId) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            r"{ORDER_SELECT}
            WHERE EXISTS (
                SELECT 1
                FROM storefront.order_items oi
                JOIN storefront.products p ON p.id = oi.product_id
                WHERE oi.order_id = o.id AND p.added_by = $1
            )
            ORDER BY o.created_at DESC, o.id ASC
            "
        ))
        .bind(owner)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Order::from).collect())
    }

    /// Orders placed by `customer`, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_customer(
        &self,
        customer: UserId,
    ) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "{ORDER_SELECT} WHERE o.user_id = $1 ORDER BY o.created_at DESC, o.id ASC"
        ))
        .bind(customer)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Order::from).collect())
    }

    /// The most recent order placed by `customer`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn latest_for_customer(
        &self,
        customer: UserId,
    ) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "{ORDER_SELECT} WHERE o.user_id = $1 ORDER BY o.created_at DESC, o.id DESC LIMIT 1"
        ))
        .bind(customer)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Order::from))
    }

    /// All lines of the given orders with the product's current creator, in
    /// insertion order. Lines whose product was deleted have no creator.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` on a non-positive quantity.
    pub async fn lines_for_orders(
        &self,
        order_ids: &[OrderId],
    ) -> Result<Vec<OrderLine>, RepositoryError> {
        if order_ids.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = order_ids.iter().map(|id| id.as_i64()).collect();

        let rows = sqlx::query_as::<_, OrderLineRow>(
            r"
            SELECT oi.id, oi.order_id, oi.product_id, oi.product_name,
                   p.added_by AS product_added_by, oi.quantity, oi.price, oi.created_at
            FROM storefront.order_items oi
            LEFT JOIN storefront.products p ON p.id = oi.product_id
            WHERE oi.order_id = ANY($1)
            ORDER BY oi.id ASC
            ",
        )
        .bind(ids)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(OrderLine::try_from).collect()
    }
}
