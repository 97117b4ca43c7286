//! # POST /estimate
//!
//! 署名ペイロードからガスとISCN登録手数料を見積もる。

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use iscn_types::{GasAndFee, SignPayload};

use crate::config::GatewayState;
use crate::error::GatewayError;

/// POST /estimate: ガス・手数料の見積もり。
pub async fn handle_estimate(
    State(state): State<Arc<GatewayState>>,
    Json(body): Json<SignPayload>,
) -> Result<Json<GasAndFee>, GatewayError> {
    let estimate = state.registry.estimate_iscn_tx_gas_and_fee(&body).await?;
    Ok(Json(estimate))
}
