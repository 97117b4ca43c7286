//! # ノードREST通信
//!
//! Cosmos SDK gRPC-gatewayへのJSONリクエストと、署名・照会クライアントで共有する
//! レスポンス型。エラーレスポンス `{"code": <gRPC code>, "message": ...}` は
//! [`ClientError::from_status`] で型付きエラーに変換する。

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ClientError;

/// ISCNレコード作成時にチェーンが発行するイベント種別。
pub(crate) const ISCN_RECORD_EVENT_TYPE: &str = "iscn_record";

/// ISCN IDのイベント属性キー。
pub(crate) const ISCN_ID_ATTRIBUTE_KEY: &str = "iscn_id";

/// gRPC-gatewayのエラーボディ。
#[derive(Debug, Deserialize)]
struct GatewayErrorBody {
    code: Option<i64>,
    message: Option<String>,
    error: Option<String>,
}

/// Cosmos SDKは64bit整数を文字列で返すため、文字列・数値の両方を受け付ける。
pub(crate) fn u64_from_str_or_num<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StrOrNum {
        Str(String),
        Num(u64),
    }

    match StrOrNum::deserialize(deserializer)? {
        StrOrNum::Num(n) => Ok(n),
        StrOrNum::Str(s) if s.is_empty() => Ok(0),
        StrOrNum::Str(s) => s.parse().map_err(serde::de::Error::custom),
    }
}

/// HTTPエラーレスポンスを型付きエラーに変換する。
///
/// gRPCステータスを含まないボディは [`ClientError::Http`] になる。
pub(crate) fn error_from_response(status: reqwest::StatusCode, body: &str) -> ClientError {
    let parsed: Option<GatewayErrorBody> = serde_json::from_str(body).ok();
    let message = parsed
        .as_ref()
        .and_then(|b| b.message.clone().or_else(|| b.error.clone()))
        .unwrap_or_else(|| body.to_string());

    match parsed.and_then(|b| b.code) {
        Some(code) if code != 0 => ClientError::from_status(code, message),
        _ => ClientError::Http {
            status: status.as_u16(),
            message,
        },
    }
}

async fn decode_response<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ClientError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| ClientError::Transport(format!("レスポンス読み取り失敗: {e}")))?;

    if !status.is_success() {
        return Err(error_from_response(status, &body));
    }

    serde_json::from_str(&body).map_err(|e| ClientError::Decode(format!("{e}: {body}")))
}

/// GETリクエストを送り、JSONレスポンスをデシリアライズする。
pub(crate) async fn get_json<T: DeserializeOwned>(
    http: &reqwest::Client,
    base_url: &str,
    path: &str,
    query: &[(&str, &str)],
) -> Result<T, ClientError> {
    let url = format!("{base_url}{path}");
    let response = http
        .get(&url)
        .query(query)
        .send()
        .await
        .map_err(|e| ClientError::Transport(format!("HTTP送信失敗 ({url}): {e}")))?;
    decode_response(response).await
}

/// POSTリクエストを送り、JSONレスポンスをデシリアライズする。
pub(crate) async fn post_json<B: Serialize, T: DeserializeOwned>(
    http: &reqwest::Client,
    base_url: &str,
    path: &str,
    body: &B,
) -> Result<T, ClientError> {
    let url = format!("{base_url}{path}");
    let response = http
        .post(&url)
        .json(body)
        .send()
        .await
        .map_err(|e| ClientError::Transport(format!("HTTP送信失敗 ({url}): {e}")))?;
    decode_response(response).await
}

// ---------------------------------------------------------------------------
// トランザクション
// ---------------------------------------------------------------------------

/// イベント属性。
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct EventAttribute {
    pub key: String,
    #[serde(default)]
    pub value: String,
}

/// トランザクションイベント。
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TxEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub attributes: Vec<EventAttribute>,
}

/// メッセージごとのログ。
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TxLog {
    #[serde(default)]
    pub events: Vec<TxEvent>,
}

/// `tx_response` の必要な部分。
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TxResponse {
    #[serde(default, deserialize_with = "u64_from_str_or_num")]
    pub height: u64,
    pub txhash: String,
    #[serde(default)]
    pub code: u32,
    #[serde(default)]
    pub raw_log: String,
    #[serde(default, deserialize_with = "u64_from_str_or_num")]
    pub gas_used: u64,
    #[serde(default, deserialize_with = "u64_from_str_or_num")]
    pub gas_wanted: u64,
    #[serde(default)]
    pub logs: Vec<TxLog>,
    #[serde(default)]
    pub events: Vec<TxEvent>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GetTxResponse {
    pub tx_response: TxResponse,
}

impl TxResponse {
    /// `iscn_record` イベントからISCN IDを出現順・重複なしで抽出する。
    ///
    /// 古いSDKはメッセージごとの `logs`、新しいSDKはトップレベルの `events` に記録する。
    pub fn iscn_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = Vec::new();
        let events = self
            .logs
            .iter()
            .flat_map(|log| log.events.iter())
            .chain(self.events.iter());

        for event in events.filter(|e| e.event_type == ISCN_RECORD_EVENT_TYPE) {
            for attr in event
                .attributes
                .iter()
                .filter(|a| a.key == ISCN_ID_ATTRIBUTE_KEY)
            {
                // typed eventの値はJSON文字列として引用符付きで入る
                let id = attr.value.trim_matches('"').to_string();
                if !id.is_empty() && !ids.contains(&id) {
                    ids.push(id);
                }
            }
        }
        ids
    }
}

/// トランザクションをハッシュで取得する。
pub(crate) async fn fetch_tx(
    http: &reqwest::Client,
    base_url: &str,
    tx_hash: &str,
) -> Result<TxResponse, ClientError> {
    let path = format!("/cosmos/tx/v1beta1/txs/{tx_hash}");
    let res: GetTxResponse = get_json(http, base_url, &path, &[]).await?;
    Ok(res.tx_response)
}

/// 取り込み前のトランザクションに対してノードが返すエラーかどうか。
///
/// gRPC-gatewayは未取り込みのトランザクションに NotFound を返すが、
/// 一部のノードは "tx not found" を含む Unknown/Internal で返す。
/// gRPCステータスのない404（接続先URLの誤り等）は取り込み待ちとみなさない。
pub(crate) fn is_tx_pending(err: &ClientError) -> bool {
    match err {
        ClientError::NotFound(_) => true,
        ClientError::Rpc { message, .. } => message.contains("not found"),
        _ => false,
    }
}

// ---------------------------------------------------------------------------
// パラメータ・アカウント・ノード情報
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct IscnParamsResponse {
    pub params: IscnParams,
}

#[derive(Debug, Deserialize)]
pub(crate) struct IscnParams {
    pub fee_per_byte: iscn_types::Coin,
}

#[derive(Debug, Deserialize)]
pub(crate) struct NodeInfoResponse {
    pub default_node_info: DefaultNodeInfo,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DefaultNodeInfo {
    pub network: String,
}

/// オンチェーンアカウントの番号とシーケンス。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct OnChainAccount {
    pub account_number: u64,
    pub sequence: u64,
}

#[derive(Debug, Deserialize)]
struct BaseAccountFields {
    #[serde(default, deserialize_with = "u64_from_str_or_num")]
    account_number: u64,
    #[serde(default, deserialize_with = "u64_from_str_or_num")]
    sequence: u64,
}

#[derive(Debug, Deserialize)]
struct AccountResponse {
    account: serde_json::Value,
}

/// アカウント番号とシーケンスを取得する。
///
/// BaseAccountに加え、ベスティングアカウント（`base_vesting_account.base_account`）にも対応する。
pub(crate) async fn fetch_account(
    http: &reqwest::Client,
    base_url: &str,
    address: &str,
) -> Result<OnChainAccount, ClientError> {
    let path = format!("/cosmos/auth/v1beta1/accounts/{address}");
    let res: AccountResponse = get_json(http, base_url, &path, &[]).await?;

    let base = if res.account.get("account_number").is_some() {
        &res.account
    } else if let Some(base) = res.account.get("base_account") {
        base
    } else if let Some(base) = res
        .account
        .get("base_vesting_account")
        .and_then(|v| v.get("base_account"))
    {
        base
    } else {
        return Err(ClientError::Decode(format!(
            "アカウント番号が見つかりません: {}",
            res.account
        )));
    };

    let fields: BaseAccountFields = serde_json::from_value(base.clone())
        .map_err(|e| ClientError::Decode(format!("アカウントのパースに失敗: {e}")))?;
    Ok(OnChainAccount {
        account_number: fields.account_number,
        sequence: fields.sequence,
    })
}

/// ISCNモジュールの `fee_per_byte` を取得する。
pub(crate) async fn fetch_fee_per_byte(
    http: &reqwest::Client,
    base_url: &str,
) -> Result<iscn_types::Coin, ClientError> {
    let res: IscnParamsResponse = get_json(http, base_url, "/iscn/params", &[]).await?;
    Ok(res.params.fee_per_byte)
}

/// ノードのチェーンIDを取得する。
pub(crate) async fn fetch_chain_id(
    http: &reqwest::Client,
    base_url: &str,
) -> Result<String, ClientError> {
    let res: NodeInfoResponse =
        get_json(http, base_url, "/cosmos/base/tendermint/v1beta1/node_info", &[]).await?;
    Ok(res.default_node_info.network)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_from_grpc_body() {
        let err = error_from_response(
            reqwest::StatusCode::BAD_REQUEST,
            r#"{"code": 3, "message": "invalid ISCN ID: iscn://bad", "details": []}"#,
        );
        assert!(matches!(err, ClientError::InvalidArgument(ref m) if m.contains("iscn://bad")));

        let err = error_from_response(
            reqwest::StatusCode::NOT_FOUND,
            r#"{"code": 5, "message": "tx not found: ABCD", "details": []}"#,
        );
        assert!(matches!(err, ClientError::NotFound(_)));

        let err = error_from_response(
            reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            r#"{"code": 13, "message": "panic", "details": []}"#,
        );
        assert!(matches!(err, ClientError::Rpc { code: 13, .. }));
    }

    #[test]
    fn test_error_from_plain_body_is_http() {
        let err = error_from_response(reqwest::StatusCode::NOT_FOUND, "404 page not found");
        assert!(
            matches!(err, ClientError::Http { status: 404, ref message } if message == "404 page not found")
        );

        let err = error_from_response(reqwest::StatusCode::BAD_GATEWAY, "upstream down");
        assert!(matches!(err, ClientError::Http { status: 502, .. }));

        let err = error_from_response(reqwest::StatusCode::BAD_REQUEST, r#""bad request""#);
        assert!(matches!(err, ClientError::Http { status: 400, .. }));
    }

    #[test]
    fn test_iscn_ids_from_logs_and_events() {
        let json = serde_json::json!({
            "height": "1234",
            "txhash": "ABCD",
            "code": 0,
            "raw_log": "",
            "gas_used": "90000",
            "gas_wanted": "120000",
            "logs": [{
                "events": [
                    {"type": "message", "attributes": [{"key": "action", "value": "create_iscn_record"}]},
                    {"type": "iscn_record", "attributes": [
                        {"key": "iscn_id", "value": "iscn://likecoin-chain/abc/1"},
                        {"key": "owner", "value": "like1owner"}
                    ]}
                ]
            }],
            "events": [
                {"type": "iscn_record", "attributes": [
                    {"key": "iscn_id", "value": "\"iscn://likecoin-chain/abc/1\""},
                    {"key": "iscn_id", "value": "\"iscn://likecoin-chain/def/1\""}
                ]}
            ]
        });

        let tx: TxResponse = serde_json::from_value(json).unwrap();
        assert_eq!(tx.height, 1234);
        assert_eq!(tx.gas_used, 90000);
        assert_eq!(
            tx.iscn_ids(),
            vec!["iscn://likecoin-chain/abc/1", "iscn://likecoin-chain/def/1"]
        );
    }

    #[test]
    fn test_is_tx_pending() {
        assert!(is_tx_pending(&ClientError::NotFound("tx".to_string())));
        assert!(is_tx_pending(&ClientError::Rpc {
            code: 2,
            message: "tx (ABCD) not found".to_string()
        }));
        assert!(!is_tx_pending(&ClientError::Transport("reset".to_string())));
        // gRPCステータスのない404は取り込み待ちではない
        let err = error_from_response(reqwest::StatusCode::NOT_FOUND, "404 page not found");
        assert!(!is_tx_pending(&err));
    }
}
