//! # 照会クライアント
//!
//! ISCNレコードとトランザクションの照会。
//! REST実装はノードのgRPC-gatewayを利用する。

use async_trait::async_trait;
use base64::Engine;
use iscn_types::{Coin, IscnRecordEntry, IscnRecordsResponse};
use serde::Deserialize;

use crate::config::NetworkConfig;
use crate::error::ClientError;
use crate::rest::{self, u64_from_str_or_num};

/// 照会クライアントのトレイト。
#[async_trait]
pub trait QueryClient: Send + Sync {
    /// ノードに接続したクライアントを作る。
    async fn connect(config: &NetworkConfig) -> Result<Self, ClientError>
    where
        Self: Sized;

    /// ISCN IDに対応するレコードを照会する。
    async fn query_records_by_id(&self, iscn_id: &str) -> Result<IscnRecordsResponse, ClientError>;

    /// トランザクションで登録されたISCN IDを照会する。
    async fn query_iscn_ids_by_tx(&self, tx_hash: &str) -> Result<Vec<String>, ClientError>;

    /// レコード1バイトあたりの登録手数料を照会する。
    async fn query_fee_per_byte(&self) -> Result<Coin, ClientError>;
}

#[derive(Debug, Deserialize)]
struct RecordsByIdRaw {
    owner: String,
    #[serde(deserialize_with = "u64_from_str_or_num")]
    latest_version: u64,
    #[serde(default)]
    records: Vec<IscnRecordEntry>,
}

/// レコード本体を正規化する。
///
/// ノードのバージョンによってはレコード本体がBase64エンコードされたJSONで返るため、
/// その場合はデコードしてJSONとして返す。
fn normalize_record_data(data: serde_json::Value) -> Result<serde_json::Value, ClientError> {
    match data {
        serde_json::Value::String(encoded) => {
            let bytes = base64::engine::general_purpose::STANDARD
                .decode(&encoded)
                .map_err(|e| ClientError::Decode(format!("レコードのBase64デコードに失敗: {e}")))?;
            serde_json::from_slice(&bytes)
                .map_err(|e| ClientError::Decode(format!("レコードのパースに失敗: {e}")))
        }
        other => Ok(other),
    }
}

/// gRPC-gatewayを利用する照会クライアント。
pub struct RestQueryClient {
    http: reqwest::Client,
    rpc_url: String,
}

impl RestQueryClient {
    /// 設定から照会クライアントを構築する。
    pub fn new(config: &NetworkConfig) -> Result<Self, ClientError> {
        Ok(Self {
            http: config.http_client()?,
            rpc_url: config.rpc_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl QueryClient for RestQueryClient {
    async fn connect(config: &NetworkConfig) -> Result<Self, ClientError> {
        let client = Self::new(config)?;
        tracing::info!(rpc_url = %client.rpc_url, "照会クライアントを初期化しました");
        Ok(client)
    }

    async fn query_records_by_id(&self, iscn_id: &str) -> Result<IscnRecordsResponse, ClientError> {
        let raw: RecordsByIdRaw = rest::get_json(
            &self.http,
            &self.rpc_url,
            "/iscn/records/id",
            &[("iscn_id", iscn_id)],
        )
        .await?;

        let records = raw
            .records
            .into_iter()
            .map(|entry| {
                Ok(IscnRecordEntry {
                    ipld: entry.ipld,
                    data: normalize_record_data(entry.data)?,
                })
            })
            .collect::<Result<Vec<_>, ClientError>>()?;

        Ok(IscnRecordsResponse {
            owner: raw.owner,
            latest_version: raw.latest_version,
            records,
        })
    }

    async fn query_iscn_ids_by_tx(&self, tx_hash: &str) -> Result<Vec<String>, ClientError> {
        let tx = rest::fetch_tx(&self.http, &self.rpc_url, tx_hash).await?;
        Ok(tx.iscn_ids())
    }

    async fn query_fee_per_byte(&self) -> Result<Coin, ClientError> {
        rest::fetch_fee_per_byte(&self.http, &self.rpc_url).await
    }
}
