//! # ISCNレコードメッセージ構築
//!
//! 署名ペイロードから `MsgCreateIscnRecord` を組み立てる。
//! contentMetadataはschema.orgのJSON-LDとして構築し、自由形式フィールドは
//! 既定値より優先して上書きする。

use iscn_types::{IscnRecord, MsgCreateIscnRecord, SignPayload};
use serde_json::{Map, Value};

use crate::FormatError;

/// `MsgCreateIscnRecord` のProtobuf型URL。
pub const MSG_CREATE_ISCN_RECORD_TYPE_URL: &str = "/likechain.iscn.MsgCreateIscnRecord";

/// `MsgCreateIscnRecord` のAmino型名（ガス見積もり用のStdTx表現で使用）。
pub const MSG_CREATE_ISCN_RECORD_AMINO_TYPE: &str = "likecoin-chain/MsgCreateIscnRecord";

/// contentMetadataの `@context`。
const SCHEMA_ORG_CONTEXT: &str = "http://schema.org/";

/// 作品種別の既定値。
const DEFAULT_CONTENT_TYPE: &str = "CreativeWork";

/// メタデータバージョンの既定値。
const DEFAULT_METADATA_VERSION: u64 = 1;

/// contentMetadata（JSON-LD）を構築する。
pub fn build_content_metadata(payload: &SignPayload) -> Value {
    let mut metadata = Map::new();
    metadata.insert("@context".to_string(), Value::from(SCHEMA_ORG_CONTEXT));
    metadata.insert(
        "@type".to_string(),
        Value::from(
            payload
                .content_type
                .as_deref()
                .unwrap_or(DEFAULT_CONTENT_TYPE),
        ),
    );
    if let Some(name) = &payload.name {
        metadata.insert("name".to_string(), Value::from(name.as_str()));
    }
    if let Some(description) = &payload.description {
        metadata.insert("description".to_string(), Value::from(description.as_str()));
    }
    metadata.insert(
        "version".to_string(),
        Value::from(payload.version.unwrap_or(DEFAULT_METADATA_VERSION)),
    );
    if let Some(url) = &payload.url {
        metadata.insert("url".to_string(), Value::from(url.as_str()));
    }
    metadata.insert(
        "keywords".to_string(),
        Value::from(payload.keywords.join(",")),
    );
    metadata.insert(
        "usageInfo".to_string(),
        Value::from(payload.usage_info.as_str()),
    );
    for (key, value) in &payload.extra {
        metadata.insert(key.clone(), value.clone());
    }
    Value::Object(metadata)
}

/// 署名ペイロードからISCNレコード本体を構築する。
pub fn build_iscn_record(payload: &SignPayload) -> Result<IscnRecord, FormatError> {
    let stakeholders = payload
        .stakeholders
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| FormatError::Serialize(format!("ステークホルダー: {e}")))?;

    Ok(IscnRecord {
        record_notes: payload.record_notes.clone().unwrap_or_default(),
        content_fingerprints: payload.content_fingerprints.clone(),
        stakeholders,
        content_metadata: build_content_metadata(payload),
    })
}

/// `MsgCreateIscnRecord` を構築する。
pub fn build_msg_create_iscn_record(
    from: &str,
    payload: &SignPayload,
) -> Result<MsgCreateIscnRecord, FormatError> {
    Ok(MsgCreateIscnRecord {
        from: from.to_string(),
        record: build_iscn_record(payload)?,
    })
}

/// メッセージを `@type` 付きのJSON（Any形式）に変換する。
pub fn msg_to_any_json(msg: &MsgCreateIscnRecord) -> Result<Value, FormatError> {
    let value =
        serde_json::to_value(msg).map_err(|e| FormatError::Serialize(format!("メッセージ: {e}")))?;
    let mut any = Map::new();
    any.insert(
        "@type".to_string(),
        Value::from(MSG_CREATE_ISCN_RECORD_TYPE_URL),
    );
    if let Value::Object(fields) = value {
        any.extend(fields);
    }
    Ok(Value::Object(any))
}
