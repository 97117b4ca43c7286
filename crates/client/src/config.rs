//! # ネットワーク設定
//!
//! 接続先ノードと手数料・ブロードキャストの設定。
//! 既定値はLikeCoinメインネットの静的な定数で、環境変数で上書きできる。

use std::time::Duration;

/// 既定の接続先ノード（Cosmos SDK gRPC-gatewayのRESTエンドポイント）
pub const DEFAULT_RPC_URL: &str = "https://mainnet-node.like.co";

/// 既定の手数料単位
pub const DEFAULT_DENOM: &str = "nanolike";

/// 既定のガス価格（1ガスあたりのnanolike）
pub const DEFAULT_GAS_PRICE: u64 = 10;

/// 既定のトランザクションメモ
pub const DEFAULT_MEMO: &str = "app.like.co";

/// ネットワーク設定。
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    /// ノードのRPC(REST)エンドポイント（末尾スラッシュなし）
    pub rpc_url: String,
    /// チェーンID。Noneの場合は接続時にノードから取得する。
    pub chain_id: Option<String>,
    /// 手数料単位
    pub denom: String,
    /// ガス価格
    pub gas_price: u64,
    /// トランザクションメモ
    pub memo: String,
    /// HTTPリクエストのタイムアウト
    pub request_timeout: Duration,
    /// ブロック取り込み待ちのタイムアウト
    pub broadcast_timeout: Duration,
    /// ブロック取り込み確認のポーリング間隔
    pub broadcast_poll_interval: Duration,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            chain_id: None,
            denom: DEFAULT_DENOM.to_string(),
            gas_price: DEFAULT_GAS_PRICE,
            memo: DEFAULT_MEMO.to_string(),
            request_timeout: Duration::from_secs(30),
            broadcast_timeout: Duration::from_secs(60),
            broadcast_poll_interval: Duration::from_millis(3000),
        }
    }
}

impl NetworkConfig {
    /// 指定エンドポイントの設定を作る（その他は既定値）。
    pub fn with_rpc_url(rpc_url: &str) -> Self {
        Self {
            rpc_url: rpc_url.trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }

    /// 環境変数から構築する。
    ///
    /// - `ISCN_RPC_URL`, `ISCN_CHAIN_ID`, `ISCN_DENOM`, `ISCN_GAS_PRICE`, `ISCN_MEMO`
    /// - `ISCN_BROADCAST_TIMEOUT_SECS`, `ISCN_BROADCAST_POLL_INTERVAL_MS`
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();

        let rpc_url =
            std::env::var("ISCN_RPC_URL").unwrap_or_else(|_| DEFAULT_RPC_URL.to_string());
        let chain_id = std::env::var("ISCN_CHAIN_ID").ok().filter(|s| !s.is_empty());
        let denom = std::env::var("ISCN_DENOM").unwrap_or_else(|_| DEFAULT_DENOM.to_string());
        let memo = std::env::var("ISCN_MEMO").unwrap_or_else(|_| DEFAULT_MEMO.to_string());

        let gas_price = match std::env::var("ISCN_GAS_PRICE") {
            Ok(v) => v
                .parse()
                .map_err(|e| anyhow::anyhow!("ISCN_GAS_PRICEは整数である必要があります: {e}"))?,
            Err(_) => DEFAULT_GAS_PRICE,
        };
        let broadcast_timeout = match std::env::var("ISCN_BROADCAST_TIMEOUT_SECS") {
            Ok(v) => Duration::from_secs(v.parse().map_err(|e| {
                anyhow::anyhow!("ISCN_BROADCAST_TIMEOUT_SECSは整数である必要があります: {e}")
            })?),
            Err(_) => defaults.broadcast_timeout,
        };
        let broadcast_poll_interval = match std::env::var("ISCN_BROADCAST_POLL_INTERVAL_MS") {
            Ok(v) => Duration::from_millis(v.parse().map_err(|e| {
                anyhow::anyhow!("ISCN_BROADCAST_POLL_INTERVAL_MSは整数である必要があります: {e}")
            })?),
            Err(_) => defaults.broadcast_poll_interval,
        };

        tracing::info!(rpc_url = %rpc_url, denom = %denom, gas_price, "ネットワーク設定を読み込みました");

        Ok(Self {
            rpc_url: rpc_url.trim_end_matches('/').to_string(),
            chain_id,
            denom,
            gas_price,
            memo,
            request_timeout: defaults.request_timeout,
            broadcast_timeout,
            broadcast_poll_interval,
        })
    }

    /// 設定に従ったHTTPクライアントを構築する。
    pub(crate) fn http_client(&self) -> Result<reqwest::Client, crate::ClientError> {
        reqwest::Client::builder()
            .timeout(self.request_timeout)
            .build()
            .map_err(|e| crate::ClientError::Config(format!("HTTPクライアントの構築に失敗: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_mainnet() {
        let config = NetworkConfig::default();
        assert_eq!(config.rpc_url, DEFAULT_RPC_URL);
        assert_eq!(config.denom, "nanolike");
        assert_eq!(config.memo, "app.like.co");
        assert!(config.chain_id.is_none());
    }

    #[test]
    fn test_with_rpc_url_trims_trailing_slash() {
        let config = NetworkConfig::with_rpc_url("http://127.0.0.1:1317/");
        assert_eq!(config.rpc_url, "http://127.0.0.1:1317");
        assert_eq!(config.gas_price, DEFAULT_GAS_PRICE);
    }
}
