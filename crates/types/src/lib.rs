//! # ISCN Registrar 共有型定義
//!
//! ISCN登録に関わるデータ構造をRust構造体として提供する。
//!
//! ## エンコーディング規則
//! - JSONのフィールド名はcamelCase（LikeCoinチェーン/iscn-jsの形式に合わせる）
//! - JSON-LDのキー（`@id`, `@type`, `@context`）はそのまま保持する
//! - Cosmos SDKの数量（amount, gas）は10進数文字列

use serde::{Deserialize, Serialize};

/// schema.orgのauthor貢献種別。
pub const CONTRIBUTION_TYPE_AUTHOR: &str = "http://schema.org/author";

/// schema.orgのPropertyValue型名。
pub const PROPERTY_VALUE_TYPE: &str = "PropertyValue";

// ---------------------------------------------------------------------------
// 登録ペイロード（ユーザー入力）
// ---------------------------------------------------------------------------

/// ユーザーが入力するISCN登録ペイロード。
///
/// 著者に関する配列（`author_names`, `author_urls`, `author_wallets`,
/// `liker_ids`, `descriptions`）は並列配列であり、同じインデックスが同じ著者を指す。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterPayload {
    /// カンマ区切りのタグ文字列
    #[serde(default)]
    pub tags_string: String,
    /// ライセンス識別子（usageInfoとして記録される）
    #[serde(default)]
    pub license: String,
    /// IPFSハッシュ（CID）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipfs_hash: Option<String>,
    /// ファイルのSHA-256ハッシュ（16進数）
    #[serde(rename = "fileSHA256", default, skip_serializing_if = "Option::is_none")]
    pub file_sha256: Option<String>,
    /// 著者名
    #[serde(default)]
    pub author_names: Vec<String>,
    /// 著者ごとの個人URL一覧
    #[serde(default)]
    pub author_urls: Vec<Vec<String>>,
    /// 著者ごとのウォレット一覧
    #[serde(default)]
    pub author_wallets: Vec<Vec<Wallet>>,
    /// 著者ごとのLiker ID
    #[serde(default)]
    pub liker_ids: Vec<String>,
    /// 著者ごとの説明文
    #[serde(default)]
    pub descriptions: Vec<String>,
    /// 登録者のCosmosウォレット。署名ペイロードには転送しない。
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cosmos_wallet: Option<String>,
    /// 作品名
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// 作品の説明
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// 作品のURL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// schema.orgの作品種別 (例: "CreativeWork", "Photo")
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    /// その他の自由形式フィールド（署名ペイロードにそのまま転送される）
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// 著者のウォレット。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallet {
    /// ウォレット種別 ("cosmos", "like", "eth", "sol" 等)
    #[serde(rename = "type")]
    pub wallet_type: String,
    /// ウォレットアドレス
    pub address: String,
}

// ---------------------------------------------------------------------------
// 署名ペイロード（iscn-js ISCNSignPayload 相当）
// ---------------------------------------------------------------------------

/// 署名クライアントが要求する正規形のペイロード。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignPayload {
    /// キーワード一覧
    #[serde(default)]
    pub keywords: Vec<String>,
    /// 利用条件（ライセンス）
    #[serde(default)]
    pub usage_info: String,
    /// コンテンツフィンガープリントURI一覧
    #[serde(default)]
    pub content_fingerprints: Vec<String>,
    /// ステークホルダー一覧
    #[serde(default)]
    pub stakeholders: Vec<Stakeholder>,
    /// 作品名
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// 作品の説明
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// 作品のURL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// schema.orgの作品種別
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    /// メタデータのバージョン
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u64>,
    /// レコードの注記
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record_notes: Option<String>,
    /// その他の自由形式フィールド
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// ステークホルダー（帰属・報酬の対象となる当事者）。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stakeholder {
    /// 当事者のエンティティ情報
    pub entity: StakeholderEntity,
    /// 報酬の配分比（常に1）
    pub reward_proportion: u32,
    /// 貢献種別 (`http://schema.org/author`)
    pub contribution_type: String,
}

/// ステークホルダーのエンティティ情報。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StakeholderEntity {
    /// エンティティID（最初の外部識別子の値、なければ正規URL）
    #[serde(rename = "@id")]
    pub id: String,
    /// 著者名
    pub name: String,
    /// 正規URL
    pub url: String,
    /// 説明
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// 代替URL一覧
    pub same_as: Vec<String>,
    /// 外部識別子（DID）一覧
    pub identifier: Vec<PropertyValue>,
}

/// schema.orgのPropertyValue。ウォレット由来のDIDを表す。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyValue {
    /// 常に "PropertyValue"
    #[serde(rename = "@type")]
    pub value_type: String,
    /// ウォレット種別の表示名
    #[serde(rename = "propertyID")]
    pub property_id: String,
    /// DID文字列
    pub value: String,
}

// ---------------------------------------------------------------------------
// トランザクション関連
// ---------------------------------------------------------------------------

/// Cosmos SDKのコイン（数量は10進数文字列）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    /// 単位 (例: "nanolike")
    pub denom: String,
    /// 数量
    pub amount: String,
}

/// Cosmos SDKの手数料。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StdFee {
    /// 手数料の数量
    pub amount: Vec<Coin>,
    /// ガス上限
    pub gas: String,
}

/// ガス見積もり結果。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GasEstimate {
    /// 推定手数料
    pub fee: StdFee,
}

/// ガスとISCN登録手数料の見積もり結果。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GasAndFee {
    /// トランザクションのガス見積もり
    pub gas: GasEstimate,
    /// ISCNレコードのバイト数に応じた登録手数料
    pub iscn_fee: Coin,
}

/// `MsgCreateIscnRecord` のレコード本体。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IscnRecord {
    /// レコードの注記
    pub record_notes: String,
    /// コンテンツフィンガープリントURI一覧
    pub content_fingerprints: Vec<String>,
    /// ステークホルダー（JSON-LD）
    pub stakeholders: Vec<serde_json::Value>,
    /// コンテンツメタデータ（JSON-LD）
    pub content_metadata: serde_json::Value,
}

/// ISCNレコード作成メッセージ。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MsgCreateIscnRecord {
    /// 登録者アドレス
    pub from: String,
    /// レコード本体
    pub record: IscnRecord,
}

/// 署名者に渡す署名対象ドキュメント。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignDoc {
    /// チェーンID
    pub chain_id: String,
    /// アカウント番号
    pub account_number: u64,
    /// シーケンス番号
    pub sequence: u64,
    /// 手数料
    pub fee: StdFee,
    /// メモ
    pub memo: String,
    /// メッセージ（`@type` 付きJSON）
    pub msgs: Vec<serde_json::Value>,
}

/// ブロードキャスト成功結果。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BroadcastTxSuccess {
    /// 取り込まれたブロック高
    pub height: u64,
    /// トランザクションハッシュ
    pub transaction_hash: String,
    /// 結果コード（成功時は0）
    pub code: u32,
    /// 生ログ
    pub raw_log: String,
    /// 使用ガス
    pub gas_used: u64,
    /// 要求ガス
    pub gas_wanted: u64,
}

/// 署名からISCN ID解決までの結果。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IscnSignResult {
    /// 登録されたISCN ID
    pub iscn_id: String,
    /// トランザクションハッシュ
    pub tx_hash: String,
}

// ---------------------------------------------------------------------------
// クエリ結果
// ---------------------------------------------------------------------------

/// ISCN IDによるレコード照会結果。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IscnRecordsResponse {
    /// レコード所有者アドレス
    pub owner: String,
    /// 最新バージョン
    pub latest_version: u64,
    /// レコード一覧
    pub records: Vec<IscnRecordEntry>,
}

/// ISCNレコード1件。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IscnRecordEntry {
    /// IPLD (CID)
    pub ipld: String,
    /// レコードのJSON-LD本体
    pub data: serde_json::Value,
}

// ---------------------------------------------------------------------------
// Gateway API
// ---------------------------------------------------------------------------

/// `POST /fingerprint` のレスポンス。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FingerprintResponse {
    /// ファイルのSHA-256ハッシュ（16進数）
    #[serde(rename = "fileSHA256")]
    pub file_sha256: String,
    /// `hash://sha256/<hex>` 形式のフィンガープリント
    pub fingerprint: String,
}

/// `GET /txs/{tx_hash}/iscn-ids` のレスポンス。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IscnIdsResponse {
    /// トランザクションハッシュ
    pub tx_hash: String,
    /// トランザクションで登録されたISCN ID一覧
    pub iscn_ids: Vec<String>,
}

/// 照会失敗時のレスポンス。`code` は旧来の番兵コード（"-1" / "-2"）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupFailure {
    /// 番兵コード
    pub code: String,
    /// エラーメッセージ
    pub message: String,
}
