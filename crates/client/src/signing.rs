//! # 署名クライアント
//!
//! ISCNレコード作成トランザクションの見積もり・署名・ブロードキャスト。
//!
//! ## 登録フロー
//! 1. 署名者が指定アドレスの鍵を持つことを確認
//! 2. アカウント番号・シーケンスをノードから取得
//! 3. `MsgCreateIscnRecord` と手数料から署名対象ドキュメントを構築
//! 4. 署名者に署名を依頼し、返されたバイト列を `BROADCAST_MODE_SYNC` で送信
//! 5. トランザクションがブロックに取り込まれるまでポーリング

use async_trait::async_trait;
use base64::Engine;
use iscn_core::fee::{estimate_iscn_fee, estimate_iscn_tx_gas};
use iscn_core::record::{build_msg_create_iscn_record, msg_to_any_json};
use iscn_types::{BroadcastTxSuccess, GasAndFee, SignDoc, SignPayload, StdFee};
use serde::{Deserialize, Serialize};

use crate::config::NetworkConfig;
use crate::error::ClientError;
use crate::rest::{self, TxResponse};
use crate::signer::OfflineSigner;

/// 見積もり時に `from` に入れる仮アドレス（実アドレスと同じ長さ）。
const ESTIMATION_ADDRESS: &str = "like1qqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqq";

const BROADCAST_MODE_SYNC: &str = "BROADCAST_MODE_SYNC";

/// トランザクションごとの上書き設定。
#[derive(Debug, Clone, Default)]
pub struct TxOptions {
    /// メモ（Noneなら設定値）
    pub memo: Option<String>,
    /// 手数料（Noneならガス見積もり値）
    pub fee: Option<StdFee>,
}

/// 署名クライアントのトレイト。
#[async_trait]
pub trait SigningClient: Send + Sync {
    /// ノードに接続したクライアントを作る。
    async fn connect(config: &NetworkConfig) -> Result<Self, ClientError>
    where
        Self: Sized;

    /// トランザクションのガスとISCN登録手数料を見積もる。
    async fn estimate_iscn_tx_gas_and_fee(
        &self,
        payload: &SignPayload,
    ) -> Result<GasAndFee, ClientError>;

    /// 呼び出し側の署名者でISCNレコードを作成し、取り込み結果を返す。
    async fn create_iscn_record(
        &self,
        signer: &dyn OfflineSigner,
        address: &str,
        payload: &SignPayload,
        options: &TxOptions,
    ) -> Result<BroadcastTxSuccess, ClientError>;
}

#[derive(Debug, Serialize)]
struct BroadcastTxRequest<'a> {
    tx_bytes: String,
    mode: &'a str,
}

#[derive(Debug, Deserialize)]
struct BroadcastTxResponse {
    tx_response: TxResponse,
}

/// gRPC-gatewayを利用する署名クライアント。
pub struct RestSigningClient {
    http: reqwest::Client,
    config: NetworkConfig,
    chain_id: String,
}

impl RestSigningClient {
    /// 接続先のチェーンID。
    pub fn chain_id(&self) -> &str {
        &self.chain_id
    }

    /// トランザクションがブロックに取り込まれるまで待つ。
    async fn wait_for_inclusion(&self, tx_hash: &str) -> Result<TxResponse, ClientError> {
        let deadline = tokio::time::Instant::now() + self.config.broadcast_timeout;
        loop {
            match rest::fetch_tx(&self.http, &self.config.rpc_url, tx_hash).await {
                Ok(tx) => return Ok(tx),
                Err(e) if rest::is_tx_pending(&e) => {
                    tracing::debug!(tx_hash = %tx_hash, "トランザクションの取り込み待ち");
                }
                Err(e) => return Err(e),
            }

            if tokio::time::Instant::now() >= deadline {
                tracing::warn!(tx_hash = %tx_hash, "取り込み待ちがタイムアウトしました");
                return Err(ClientError::InclusionTimeout {
                    tx_hash: tx_hash.to_string(),
                });
            }
            tokio::time::sleep(self.config.broadcast_poll_interval).await;
        }
    }
}

#[async_trait]
impl SigningClient for RestSigningClient {
    async fn connect(config: &NetworkConfig) -> Result<Self, ClientError> {
        let http = config.http_client()?;
        let chain_id = match &config.chain_id {
            Some(id) => id.clone(),
            None => rest::fetch_chain_id(&http, &config.rpc_url).await?,
        };
        tracing::info!(rpc_url = %config.rpc_url, chain_id = %chain_id, "署名クライアントを接続しました");

        Ok(Self {
            http,
            config: config.clone(),
            chain_id,
        })
    }

    async fn estimate_iscn_tx_gas_and_fee(
        &self,
        payload: &SignPayload,
    ) -> Result<GasAndFee, ClientError> {
        let msg = build_msg_create_iscn_record(ESTIMATION_ADDRESS, payload)?;
        let gas = estimate_iscn_tx_gas(
            &msg,
            &self.config.memo,
            &self.config.denom,
            self.config.gas_price,
        )?;
        let fee_per_byte = rest::fetch_fee_per_byte(&self.http, &self.config.rpc_url).await?;
        let iscn_fee = estimate_iscn_fee(&msg.record, &fee_per_byte)?;

        tracing::debug!(gas = %gas.fee.gas, iscn_fee = %iscn_fee.amount, "ISCN手数料を見積もりました");
        Ok(GasAndFee { gas, iscn_fee })
    }

    async fn create_iscn_record(
        &self,
        signer: &dyn OfflineSigner,
        address: &str,
        payload: &SignPayload,
        options: &TxOptions,
    ) -> Result<BroadcastTxSuccess, ClientError> {
        let accounts = signer.get_accounts().await?;
        if !accounts.iter().any(|a| a.address == address) {
            return Err(ClientError::AccountNotFound(address.to_string()));
        }

        let account = rest::fetch_account(&self.http, &self.config.rpc_url, address).await?;
        let msg = build_msg_create_iscn_record(address, payload)?;
        let memo = options.memo.as_deref().unwrap_or(&self.config.memo);
        let fee = match &options.fee {
            Some(fee) => fee.clone(),
            None => {
                estimate_iscn_tx_gas(&msg, memo, &self.config.denom, self.config.gas_price)?.fee
            }
        };

        let sign_doc = SignDoc {
            chain_id: self.chain_id.clone(),
            account_number: account.account_number,
            sequence: account.sequence,
            fee,
            memo: memo.to_string(),
            msgs: vec![msg_to_any_json(&msg)?],
        };
        let signed = signer.sign(address, &sign_doc).await?;

        let request = BroadcastTxRequest {
            tx_bytes: base64::engine::general_purpose::STANDARD.encode(&signed.tx_bytes),
            mode: BROADCAST_MODE_SYNC,
        };
        let res: BroadcastTxResponse = rest::post_json(
            &self.http,
            &self.config.rpc_url,
            "/cosmos/tx/v1beta1/txs",
            &request,
        )
        .await?;
        let broadcast = res.tx_response;
        if broadcast.code != 0 {
            return Err(ClientError::Broadcast {
                tx_hash: broadcast.txhash,
                code: broadcast.code,
                raw_log: broadcast.raw_log,
            });
        }
        tracing::info!(tx_hash = %broadcast.txhash, address = %address, "トランザクションをブロードキャストしました");

        let tx = self.wait_for_inclusion(&broadcast.txhash).await?;
        if tx.code != 0 {
            return Err(ClientError::Broadcast {
                tx_hash: tx.txhash,
                code: tx.code,
                raw_log: tx.raw_log,
            });
        }
        tracing::info!(tx_hash = %tx.txhash, height = tx.height, "トランザクションがブロックに取り込まれました");

        Ok(BroadcastTxSuccess {
            height: tx.height,
            transaction_hash: tx.txhash,
            code: tx.code,
            raw_log: tx.raw_log,
            gas_used: tx.gas_used,
            gas_wanted: tx.gas_wanted,
        })
    }
}
