//! # Gateway設定・共有状態
//!
//! 環境変数からの設定読み込みとGatewayの共有状態の定義。

use iscn_client::{NetworkConfig, RestIscnRegistry};

/// 既定の待ち受けアドレス
pub const DEFAULT_GATEWAY_ADDR: &str = "0.0.0.0:3000";

/// フィンガープリント計算で受け付ける既定の最大バイト数（100MB）
pub const DEFAULT_MAX_FINGERPRINT_BYTES: usize = 100 * 1024 * 1024;

/// Gatewayの共有状態。
pub struct GatewayState {
    /// ISCNレジストリ（クライアントは初回利用時に接続）
    pub registry: RestIscnRegistry,
    /// フィンガープリント計算で受け付ける最大バイト数
    pub max_fingerprint_bytes: usize,
}

impl GatewayState {
    /// 環境変数から構築する。
    pub fn from_env() -> anyhow::Result<Self> {
        let network = NetworkConfig::from_env()?;

        let max_fingerprint_bytes = match std::env::var("MAX_FINGERPRINT_BYTES") {
            Ok(v) => v
                .parse()
                .map_err(|e| anyhow::anyhow!("MAX_FINGERPRINT_BYTESは整数である必要があります: {e}"))?,
            Err(_) => DEFAULT_MAX_FINGERPRINT_BYTES,
        };

        Ok(Self {
            registry: RestIscnRegistry::new(network),
            max_fingerprint_bytes,
        })
    }
}
