//! Tip generation handler

use axum::{Json, extract::State};
use domain::TipRequest;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use validator::Validate;

use crate::{error::ApiError, middleware::ValidatedJson, state::AppState};

/// Tip request body
#[derive(Debug, Deserialize, Validate)]
pub struct TipRequestBody {
    /// What the kid chose, e.g. "buy", "save", "skip"
    pub action: String,
    /// Item the choice is about
    pub item_name: String,
    #[validate(range(min = 0.0, message = "must be non-negative"))]
    pub price: f64,
    #[validate(range(min = 0.0, message = "must be non-negative"))]
    pub balance: f64,
}

/// Tip response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TipResponse {
    pub tip: String,
}

/// Produce a short educational tip
///
/// Only malformed input is rejected; provider trouble yields the
/// rule-based tip with a 200.
#[instrument(skip(state, body), fields(action = %body.action, item = %body.item_name))]
pub async fn generate_tip(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<TipRequestBody>,
) -> Result<Json<TipResponse>, ApiError> {
    let request = TipRequest::new(body.action, body.item_name, body.price, body.balance)?;

    let tip = state.tip_service.generate_tip(&request).await;
    debug!(source = ?tip.source, "Tip ready");

    Ok(Json(TipResponse { tip: tip.text }))
}
