//! # ISCN Registrar Gateway
//!
//! ISCN登録ペイロードの整形、フィンガープリント計算、手数料見積もり、
//! レジストリ照会をHTTPで提供する。
//! 署名はユーザーのウォレットで行うため、署名エンドポイントは持たない。
//!
//! ## API エンドポイント
//! - `POST /format`: 登録ペイロード → 署名ペイロード
//! - `POST /fingerprint`: ファイルバイト列 → SHA-256フィンガープリント
//! - `POST /estimate`: 署名ペイロード → ガス・ISCN登録手数料
//! - `GET /records?iscn_id=...`: ISCN IDによるレコード照会
//! - `GET /txs/{tx_hash}/iscn-ids`: トランザクションのISCN ID一覧

mod config;
mod endpoints;
mod error;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};

use config::{GatewayState, DEFAULT_GATEWAY_ADDR};
use endpoints::*;

/// ルーターを構築する。
fn build_router(state: Arc<GatewayState>) -> axum::Router {
    // フィンガープリントのボディ上限はaxumの既定値(2MB)ではなく設定値に従う
    let fingerprint_limit = DefaultBodyLimit::max(state.max_fingerprint_bytes);

    axum::Router::new()
        .route("/format", post(handle_format))
        .route(
            "/fingerprint",
            post(handle_fingerprint).layer(fingerprint_limit),
        )
        .route("/estimate", post(handle_estimate))
        .route("/records", get(handle_records))
        .route("/txs/{tx_hash}/iscn-ids", get(handle_tx_iscn_ids))
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let state = Arc::new(GatewayState::from_env()?);
    tracing::info!(
        rpc_url = %state.registry.config().rpc_url,
        max_fingerprint_bytes = state.max_fingerprint_bytes,
        "Gateway設定を読み込みました"
    );

    let app = build_router(state);

    let addr =
        std::env::var("GATEWAY_ADDR").unwrap_or_else(|_| DEFAULT_GATEWAY_ADDR.to_string());
    tracing::info!("Gatewayを {} で起動します", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
