//! # オフライン署名者
//!
//! トランザクション署名は呼び出し側が用意する署名者（ブラウザウォレット、
//! ハードウェアウォレット、鍵管理サービス等）に委譲する。
//! このクレートは署名済みのトランザクションバイト列をそのままブロードキャストする。

use async_trait::async_trait;
use iscn_types::SignDoc;
use serde::{Deserialize, Serialize};

/// 署名者が保持するアカウント。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountData {
    /// bech32アドレス
    pub address: String,
    /// 署名アルゴリズム (例: "secp256k1")
    pub algo: String,
    /// 公開鍵
    pub pubkey: Vec<u8>,
}

/// 署名済みトランザクション。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTx {
    /// エンコード済みのトランザクション（TxRawのバイト列）
    pub tx_bytes: Vec<u8>,
}

/// 署名者のエラー型。
#[derive(Debug, thiserror::Error)]
pub enum SignerError {
    /// ユーザーが署名を拒否した
    #[error("署名が拒否されました: {0}")]
    Rejected(String),
    /// 署名処理に失敗した
    #[error("署名に失敗しました: {0}")]
    Failed(String),
}

/// オフライン署名者のトレイト。
#[async_trait]
pub trait OfflineSigner: Send + Sync {
    /// 署名可能なアカウント一覧を返す。
    async fn get_accounts(&self) -> Result<Vec<AccountData>, SignerError>;

    /// 署名対象ドキュメントに署名し、エンコード済みトランザクションを返す。
    async fn sign(&self, signer_address: &str, sign_doc: &SignDoc) -> Result<SignedTx, SignerError>;
}
