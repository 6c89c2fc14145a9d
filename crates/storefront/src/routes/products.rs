//! Product route handlers.
//!
//! Anyone may view a product. Creating needs an owner or admin; editing and
//! deleting need the product's creator or an admin.

use axum::{
    Form, Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;

use corner_shop_core::ProductId;
use corner_shop_core::forms::ProductInput;

use crate::error::Result;
use crate::middleware::OptionalAuth;
use crate::models::Product;
use crate::services::CatalogService;
use crate::state::AppState;

/// Product detail.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<Product>> {
    let product = CatalogService::new(state.pool()).detail(id).await?;
    Ok(Json(product))
}

/// Create a product owned by the caller.
#[instrument(skip(state, auth, form))]
pub async fn create(
    State(state): State<AppState>,
    auth: OptionalAuth,
    Form(form): Form<ProductInput>,
) -> Result<(StatusCode, Json<Product>)> {
    let product = CatalogService::new(state.pool())
        .create(auth.viewer(), &form)
        .await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// Update a product.
#[instrument(skip(state, auth, form))]
pub async fn update(
    State(state): State<AppState>,
    auth: OptionalAuth,
    Path(id): Path<ProductId>,
    Form(form): Form<ProductInput>,
) -> Result<Json<Product>> {
    let product = CatalogService::new(state.pool())
        .update(auth.viewer(), id, &form)
        .await?;
    Ok(Json(product))
}

/// Delete a product.
#[instrument(skip(state, auth))]
pub async fn delete(
    State(state): State<AppState>,
    auth: OptionalAuth,
    Path(id): Path<ProductId>,
) -> Result<StatusCode> {
    CatalogService::new(state.pool())
        .delete(auth.viewer(), id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
