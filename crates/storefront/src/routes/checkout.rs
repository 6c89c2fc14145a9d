//! Checkout route handlers.

use axum::{Form, Json, extract::State, http::StatusCode};
use tracing::instrument;

use corner_shop_core::forms::CheckoutInput;

use crate::error::{Result, add_breadcrumb};
use crate::middleware::OptionalAuth;
use crate::models::OrderWithLines;
use crate::services::{CheckoutService, CheckoutSummary};
use crate::state::AppState;

/// Price preview of the caller's cart.
#[instrument(skip(state, auth))]
pub async fn summary(
    State(state): State<AppState>,
    auth: OptionalAuth,
) -> Result<Json<CheckoutSummary>> {
    let summary = CheckoutService::new(state.pool())
        .summary(auth.viewer())
        .await?;
    Ok(Json(summary))
}

/// Place an order from the caller's cart.
#[instrument(skip(state, auth, form))]
pub async fn place_order(
    State(state): State<AppState>,
    auth: OptionalAuth,
    Form(form): Form<CheckoutInput>,
) -> Result<(StatusCode, Json<OrderWithLines>)> {
    let order = CheckoutService::new(state.pool())
        .checkout(auth.viewer(), &form)
        .await?;

    add_breadcrumb(
        "checkout",
        "Order placed",
        Some(&[("order_number", order.order_number.as_str())]),
    );
    Ok((StatusCode::CREATED, Json(order)))
}

/// The caller's most recent order, `null` if they have not ordered yet.
#[instrument(skip(state, auth))]
pub async fn confirmation(
    State(state): State<AppState>,
    auth: OptionalAuth,
) -> Result<Json<Option<OrderWithLines>>> {
    let order = CheckoutService::new(state.pool())
        .confirmation(auth.viewer())
        .await?;
    Ok(Json(order))
}
