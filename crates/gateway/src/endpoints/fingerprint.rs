//! # POST /fingerprint
//!
//! 生のファイルバイト列からSHA-256フィンガープリントを計算する。

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use iscn_types::FingerprintResponse;

use crate::config::GatewayState;
use crate::error::GatewayError;

/// POST /fingerprint: `fileSHA256` と `hash://sha256/...` を返す。
pub async fn handle_fingerprint(
    State(state): State<Arc<GatewayState>>,
    body: Bytes,
) -> Result<Json<FingerprintResponse>, GatewayError> {
    if body.is_empty() {
        return Err(GatewayError::BadRequest("ボディが空です".to_string()));
    }
    if body.len() > state.max_fingerprint_bytes {
        return Err(GatewayError::PayloadTooLarge {
            size: body.len(),
            limit: state.max_fingerprint_bytes,
        });
    }

    let file_sha256 = iscn_core::sha256_hex(&body);
    let fingerprint = iscn_core::sha256_fingerprint(&file_sha256);
    Ok(Json(FingerprintResponse {
        file_sha256,
        fingerprint,
    }))
}
