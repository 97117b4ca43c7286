//! # GET /records?iscn_id=...
//!
//! ISCN IDによるレコード照会。
//! 失敗時のボディは `{ "code": "-1" | "-2", "message": ... }`。

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use iscn_types::IscnRecordsResponse;
use serde::Deserialize;

use crate::config::GatewayState;
use crate::error::GatewayError;

#[derive(Debug, Deserialize)]
pub struct RecordsQuery {
    pub iscn_id: String,
}

/// GET /records: ISCN IDによるレコード照会。
pub async fn handle_records(
    State(state): State<Arc<GatewayState>>,
    Query(query): Query<RecordsQuery>,
) -> Result<Json<IscnRecordsResponse>, GatewayError> {
    let records = state.registry.search_iscn_by_id(&query.iscn_id).await?;
    Ok(Json(records))
}
