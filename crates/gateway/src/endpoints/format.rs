//! # POST /format
//!
//! 登録ペイロードを署名ペイロードに整形する。

use axum::Json;
use iscn_types::{RegisterPayload, SignPayload};

use crate::error::GatewayError;

/// POST /format: 登録ペイロードの整形。
///
/// 著者配列の長さが揃っていない場合は422を返す。
pub async fn handle_format(
    Json(body): Json<RegisterPayload>,
) -> Result<Json<SignPayload>, GatewayError> {
    let payload = iscn_core::format_iscn_tx_payload(&body)?;
    tracing::debug!(
        stakeholders = payload.stakeholders.len(),
        fingerprints = payload.content_fingerprints.len(),
        "登録ペイロードを整形しました"
    );
    Ok(Json(payload))
}
