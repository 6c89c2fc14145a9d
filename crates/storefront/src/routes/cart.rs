//! Cart route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use tracing::instrument;

use corner_shop_core::ProductId;

use crate::error::{Result, add_breadcrumb};
use crate::middleware::OptionalAuth;
use crate::models::CartItem;
use crate::services::{CartService, CartView};
use crate::state::AppState;

/// Cart badge payload.
#[derive(Debug, Serialize)]
pub struct CartCount {
    pub count: i64,
}

/// The caller's cart with line and grand totals.
#[instrument(skip(state, auth))]
pub async fn show(State(state): State<AppState>, auth: OptionalAuth) -> Result<Json<CartView>> {
    let view = CartService::new(state.pool()).view(auth.viewer()).await?;
    Ok(Json(view))
}

/// Add one unit of a product to the caller's cart.
#[instrument(skip(state, auth))]
pub async fn add(
    State(state): State<AppState>,
    auth: OptionalAuth,
    Path(product_id): Path<ProductId>,
) -> Result<Json<CartItem>> {
    let item = CartService::new(state.pool())
        .add(auth.viewer(), product_id)
        .await?;

    add_breadcrumb(
        "cart",
        "Added to cart",
        Some(&[("product_id", product_id.to_string().as_str())]),
    );
    Ok(Json(item))
}

/// Number of units in the caller's cart.
#[instrument(skip(state, auth))]
pub async fn count(State(state): State<AppState>, auth: OptionalAuth) -> Result<Json<CartCount>> {
    let count = CartService::new(state.pool()).count(auth.viewer()).await?;
    Ok(Json(CartCount { count }))
}
