//! # ISCN Registrar Core
//!
//! ユーザー入力の登録ペイロードを、署名クライアントが要求する正規形の
//! 署名ペイロードに変換する。ネットワーク通信は行わない。
//!
//! ## 処理フロー
//! 1. ファイルハッシュとIPFSハッシュからコンテンツフィンガープリントを構築する
//! 2. 著者ごとの並列配列からステークホルダーを導出する
//! 3. タグ文字列をキーワードに分割する
//! 4. 自由形式フィールドをそのまま転送する
//!
//! レコードメッセージの構築は [`record`]、ガス・手数料の見積もり計算は [`fee`] を参照。

pub mod fee;
pub mod record;

use iscn_types::{
    PropertyValue, RegisterPayload, SignPayload, Stakeholder, StakeholderEntity, Wallet,
    CONTRIBUTION_TYPE_AUTHOR, PROPERTY_VALUE_TYPE,
};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

/// Coreモジュールのエラー型
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    /// 著者の並列配列の長さが一致しない
    #[error("著者配列の長さが一致しません: {field} は {actual} 件 (authorNames: {expected} 件)")]
    MismatchedAuthorFields {
        /// 長さが一致しないフィールド名
        field: &'static str,
        /// authorNamesの件数
        expected: usize,
        /// 実際の件数
        actual: usize,
    },
    /// JSONシリアライズエラー
    #[error("シリアライズに失敗しました: {0}")]
    Serialize(String),
    /// Cosmos Dec形式でない数値
    #[error("不正な10進数です: {0}")]
    InvalidDecimal(String),
    /// 手数料計算のオーバーフロー
    #[error("手数料の計算がオーバーフローしました")]
    Overflow,
}

/// LikerLandプロフィールのベースURL。
const LIKER_PROFILE_BASE_URL: &str = "https://like.co";

/// cosmosウォレットのDID生成時に取り除くアドレス先頭の文字数（"cosmos"）。
const COSMOS_ADDRESS_PREFIX_LEN: usize = 6;

/// 署名ペイロード側で値が決まるキー。自由形式フィールドからは転送しない。
const RESERVED_KEYS: &[&str] = &[
    "keywords",
    "usageInfo",
    "contentFingerprints",
    "stakeholders",
];

// ---------------------------------------------------------------------------
// ウォレット種別とDID
// ---------------------------------------------------------------------------

/// 著者ウォレットの種別。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletType {
    /// Cosmos Hub
    Cosmos,
    /// LikeCoinチェーン
    Like,
    /// Ethereum
    Eth,
    /// Solana
    Sol,
    /// その他（種別文字列をそのまま保持）
    Other(String),
}

impl WalletType {
    /// ウォレット種別文字列を解釈する。
    pub fn parse(value: &str) -> Self {
        match value {
            "cosmos" => WalletType::Cosmos,
            "like" => WalletType::Like,
            "eth" => WalletType::Eth,
            "sol" => WalletType::Sol,
            other => WalletType::Other(other.to_string()),
        }
    }

    /// DIDのスキームとして使う種別文字列。
    pub fn as_str(&self) -> &str {
        match self {
            WalletType::Cosmos => "cosmos",
            WalletType::Like => "like",
            WalletType::Eth => "eth",
            WalletType::Sol => "sol",
            WalletType::Other(other) => other,
        }
    }

    /// PropertyValueの`propertyID`に使う表示名。
    pub fn property_id(&self) -> &str {
        match self {
            WalletType::Cosmos => "Cosmos",
            WalletType::Like => "LikeCoin",
            WalletType::Eth => "Ethereum",
            WalletType::Sol => "Solana",
            WalletType::Other(other) => other,
        }
    }
}

/// ウォレットからDIDを生成する。
///
/// cosmosウォレットはアドレス先頭6文字を取り除いて `did:cosmos:<残り>` とする。
/// それ以外は `did:<type>:<address>`。
pub fn wallet_did(wallet: &Wallet) -> String {
    match WalletType::parse(&wallet.wallet_type) {
        WalletType::Cosmos => {
            let stripped: String = wallet
                .address
                .chars()
                .skip(COSMOS_ADDRESS_PREFIX_LEN)
                .collect();
            format!("did:cosmos:{stripped}")
        }
        other => format!("did:{}:{}", other.as_str(), wallet.address),
    }
}

/// ウォレットからPropertyValue形式の外部識別子を生成する。
pub fn wallet_identifier(wallet: &Wallet) -> PropertyValue {
    let wallet_type = WalletType::parse(&wallet.wallet_type);
    PropertyValue {
        value_type: PROPERTY_VALUE_TYPE.to_string(),
        property_id: wallet_type.property_id().to_string(),
        value: wallet_did(wallet),
    }
}

// ---------------------------------------------------------------------------
// フィンガープリント・キーワード
// ---------------------------------------------------------------------------

/// SHA-256ハッシュを16進数文字列で返す。
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// ファイルハッシュの `hash://sha256/<hex>` 形式。
pub fn sha256_fingerprint(file_sha256: &str) -> String {
    format!("hash://sha256/{file_sha256}")
}

/// IPFSハッシュの `ipfs://<cid>` 形式。
pub fn ipfs_fingerprint(ipfs_hash: &str) -> String {
    format!("ipfs://{ipfs_hash}")
}

/// コンテンツフィンガープリントを構築する。順序は常に hash → ipfs。
pub fn content_fingerprints(file_sha256: Option<&str>, ipfs_hash: Option<&str>) -> Vec<String> {
    let mut fingerprints = Vec::new();
    if let Some(hash) = file_sha256.filter(|h| !h.is_empty()) {
        fingerprints.push(sha256_fingerprint(hash));
    }
    if let Some(cid) = ipfs_hash.filter(|c| !c.is_empty()) {
        fingerprints.push(ipfs_fingerprint(cid));
    }
    fingerprints
}

/// カンマ区切りのタグ文字列をキーワードに分割する。
/// 要素はそのまま残すが、空文字列からはキーワードを作らない。
pub fn parse_keywords(tags: &str) -> Vec<String> {
    if tags.is_empty() {
        return Vec::new();
    }
    tags.split(',').map(str::to_string).collect()
}

// ---------------------------------------------------------------------------
// ステークホルダー
// ---------------------------------------------------------------------------

/// 1人分の著者情報（並列配列の同一インデックスを束ねたもの）。
#[derive(Debug, Clone, Copy)]
pub struct AuthorRef<'a> {
    /// 著者名
    pub name: &'a str,
    /// 個人URL一覧
    pub urls: &'a [String],
    /// ウォレット一覧
    pub wallets: &'a [Wallet],
    /// Liker ID（空文字列は未設定扱い）
    pub liker_id: Option<&'a str>,
    /// 説明
    pub description: Option<&'a str>,
}

/// 並列配列を検証し、著者ごとに束ねて返す。
///
/// `authorUrls` と `authorWallets` は `authorNames` と同じ長さでなければならない。
/// `likerIds` と `descriptions` は短くてもよく、欠けている要素は未設定として扱う。
pub fn collect_authors(payload: &RegisterPayload) -> Result<Vec<AuthorRef<'_>>, FormatError> {
    let expected = payload.author_names.len();
    if payload.author_urls.len() != expected {
        return Err(FormatError::MismatchedAuthorFields {
            field: "authorUrls",
            expected,
            actual: payload.author_urls.len(),
        });
    }
    if payload.author_wallets.len() != expected {
        return Err(FormatError::MismatchedAuthorFields {
            field: "authorWallets",
            expected,
            actual: payload.author_wallets.len(),
        });
    }

    let authors = payload
        .author_names
        .iter()
        .enumerate()
        .map(|(i, name)| AuthorRef {
            name: name.as_str(),
            urls: &payload.author_urls[i],
            wallets: &payload.author_wallets[i],
            liker_id: payload
                .liker_ids
                .get(i)
                .map(String::as_str)
                .filter(|id| !id.is_empty()),
            description: payload.descriptions.get(i).map(String::as_str),
        })
        .collect();
    Ok(authors)
}

/// 著者1人分のステークホルダーを導出する。
///
/// 正規URL、著者名、外部識別子のいずれも空の場合は `None`。
pub fn build_stakeholder(author: &AuthorRef<'_>) -> Option<Stakeholder> {
    let url = match author.liker_id {
        Some(liker_id) => format!("{LIKER_PROFILE_BASE_URL}/{liker_id}"),
        None => author
            .urls
            .iter()
            .find(|u| !u.is_empty())
            .cloned()
            .unwrap_or_else(|| author.name.to_string()),
    };

    let identifier: Vec<PropertyValue> = author.wallets.iter().map(wallet_identifier).collect();
    let same_as: Vec<String> = author
        .urls
        .iter()
        .filter(|u| !u.is_empty())
        .cloned()
        .collect();

    if url.is_empty() && author.name.is_empty() && identifier.is_empty() {
        return None;
    }

    let id = identifier
        .first()
        .map(|i| i.value.clone())
        .unwrap_or_else(|| url.clone());

    Some(Stakeholder {
        entity: StakeholderEntity {
            id,
            name: author.name.to_string(),
            url,
            description: author.description.map(str::to_string),
            same_as,
            identifier,
        },
        reward_proportion: 1,
        contribution_type: CONTRIBUTION_TYPE_AUTHOR.to_string(),
    })
}

// ---------------------------------------------------------------------------
// 署名ペイロード
// ---------------------------------------------------------------------------

/// 型変換できた場合に限り、自由形式フィールドから値を取り出す。
/// 変換できない値は自由形式フィールドに残る。
fn take_typed<T>(
    extra: &mut Map<String, Value>,
    key: &str,
    convert: impl FnOnce(&Value) -> Option<T>,
) -> Option<T> {
    let value = extra.get(key).and_then(convert)?;
    extra.remove(key);
    Some(value)
}

/// 登録ペイロードを署名ペイロードに変換する。
///
/// `cosmosWallet` は転送しない。`version` と `recordNotes` は自由形式フィールドから
/// 型付きフィールドに移し、署名ペイロード側で決まるキーは自由形式フィールドから取り除く。
pub fn format_iscn_tx_payload(payload: &RegisterPayload) -> Result<SignPayload, FormatError> {
    let content_fingerprints = content_fingerprints(
        payload.file_sha256.as_deref(),
        payload.ipfs_hash.as_deref(),
    );

    let stakeholders: Vec<Stakeholder> = collect_authors(payload)?
        .iter()
        .filter_map(build_stakeholder)
        .collect();

    let mut extra = payload.extra.clone();
    for key in RESERVED_KEYS {
        extra.remove(*key);
    }
    let version = take_typed(&mut extra, "version", Value::as_u64);
    let record_notes = take_typed(&mut extra, "recordNotes", |v| v.as_str().map(str::to_string));

    Ok(SignPayload {
        keywords: parse_keywords(&payload.tags_string),
        usage_info: payload.license.clone(),
        content_fingerprints,
        stakeholders,
        name: payload.name.clone(),
        description: payload.description.clone(),
        url: payload.url.clone(),
        content_type: payload.content_type.clone(),
        version,
        record_notes,
        extra,
    })
}
