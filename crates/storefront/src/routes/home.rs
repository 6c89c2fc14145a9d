//! Home and shop page handlers.

use axum::{Json, extract::State};
use tracing::instrument;

use crate::error::Result;
use crate::middleware::OptionalAuth;
use crate::models::Product;
use crate::services::{CatalogService, ShopPage};
use crate::state::AppState;

/// Latest products for the home page.
#[instrument(skip(state, auth))]
pub async fn home(
    State(state): State<AppState>,
    auth: OptionalAuth,
) -> Result<Json<Vec<Product>>> {
    let products = CatalogService::new(state.pool()).home(auth.viewer()).await?;
    Ok(Json(products))
}

/// Whole catalog plus the latest additions.
#[instrument(skip(state, auth))]
pub async fn shop(State(state): State<AppState>, auth: OptionalAuth) -> Result<Json<ShopPage>> {
    let page = CatalogService::new(state.pool()).shop(auth.viewer()).await?;
    Ok(Json(page))
}
