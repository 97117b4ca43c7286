//! # GET /txs/{tx_hash}/iscn-ids

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use iscn_types::IscnIdsResponse;

use crate::config::GatewayState;
use crate::error::GatewayError;

/// GET /txs/{tx_hash}/iscn-ids: トランザクションで登録されたISCN ID一覧。
pub async fn handle_tx_iscn_ids(
    State(state): State<Arc<GatewayState>>,
    Path(tx_hash): Path<String>,
) -> Result<Json<IscnIdsResponse>, GatewayError> {
    if tx_hash.is_empty() || !tx_hash.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(GatewayError::BadRequest(format!(
            "トランザクションハッシュは16進数である必要があります: {tx_hash}"
        )));
    }
    let iscn_ids = state.registry.get_iscn_id(&tx_hash).await?;
    Ok(Json(IscnIdsResponse { tx_hash, iscn_ids }))
}
