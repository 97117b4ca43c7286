//! # Gateway エラー型
//!
//! ハンドラのエラーをHTTPステータスに対応付ける。
//! ISCN IDによる照会の失敗は旧来の番兵コード付きのJSONで返す。

use axum::http::StatusCode;
use axum::Json;
use iscn_client::{ClientError, LookupError};
use iscn_core::FormatError;
use iscn_types::LookupFailure;

/// Gatewayエラー型。
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// 不正なリクエスト
    #[error("不正なリクエスト: {0}")]
    BadRequest(String),
    /// リクエストボディが上限を超えた
    #[error("ボディサイズが上限を超えています: {size} bytes (上限: {limit} bytes)")]
    PayloadTooLarge {
        /// 受信サイズ
        size: usize,
        /// 上限
        limit: usize,
    },
    /// 登録ペイロードの整形に失敗
    #[error(transparent)]
    Format(#[from] FormatError),
    /// ISCN IDによる照会に失敗
    #[error(transparent)]
    Lookup(#[from] LookupError),
    /// ノードとの通信・ノード側のエラー
    #[error(transparent)]
    Node(#[from] ClientError),
}

impl axum::response::IntoResponse for GatewayError {
    fn into_response(self) -> axum::response::Response {
        if let GatewayError::Lookup(err) = &self {
            let status = match err {
                LookupError::InvalidId(_) => StatusCode::BAD_REQUEST,
                LookupError::NotFound(_) => StatusCode::NOT_FOUND,
                LookupError::Other(_) => StatusCode::BAD_GATEWAY,
            };
            let body = LookupFailure {
                code: err.sentinel_code().to_string(),
                message: err.to_string(),
            };
            return (status, Json(body)).into_response();
        }

        let status = match &self {
            GatewayError::BadRequest(_) => StatusCode::BAD_REQUEST,
            GatewayError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            GatewayError::Format(_) => StatusCode::UNPROCESSABLE_ENTITY,
            GatewayError::Node(ClientError::InvalidArgument(_)) => StatusCode::BAD_REQUEST,
            GatewayError::Node(ClientError::NotFound(_)) => StatusCode::NOT_FOUND,
            GatewayError::Node(_) | GatewayError::Lookup(_) => StatusCode::BAD_GATEWAY,
        };
        if status.is_server_error() {
            tracing::warn!(error = %self, "ノードへのリクエストに失敗しました");
        }
        (status, self.to_string()).into_response()
    }
}
