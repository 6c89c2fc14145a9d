//! Order history handler.

use axum::{Json, extract::State};
use tracing::instrument;

use crate::error::Result;
use crate::middleware::OptionalAuth;
use crate::models::OrderWithLines;
use crate::services::OrderHistoryService;
use crate::state::AppState;

/// Orders the caller may see, newest first.
#[instrument(skip(state, auth))]
pub async fn history(
    State(state): State<AppState>,
    auth: OptionalAuth,
) -> Result<Json<Vec<OrderWithLines>>> {
    let orders = OrderHistoryService::new(state.pool())
        .history(auth.viewer())
        .await?;
    Ok(Json(orders))
}
