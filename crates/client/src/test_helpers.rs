//! # テスト用共通ヘルパー
//!
//! 署名・照会・レジストリのテストで共有するモックノードとモック署名者。

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use base64::Engine;
use iscn_types::SignDoc;
use serde_json::{json, Value};

use crate::signer::{AccountData, OfflineSigner, SignedTx, SignerError};

pub const MOCK_CHAIN_ID: &str = "likecoin-mainnet-2";
pub const MOCK_TX_HASH: &str = "6A1B2C3D4E5F60718293A4B5C6D7E8F90A1B2C3D4E5F60718293A4B5C6D7E8F9";
pub const MOCK_ISCN_ID: &str = "iscn://likecoin-chain/dLbKMa8EVO9RF4UmoWKk2ocUq7IsxMcnQL1_Ps5Vg80/1";
pub const MOCK_ADDRESS: &str = "like13f4glvg80zvfrrs7utft5p68pct4mcq7t5atf6";

/// モックノードの挙動と記録。
pub struct MockNodeState {
    pub chain_id: String,
    /// トランザクション取得でNotFoundを返す残り回数
    pub pending_polls: AtomicUsize,
    /// ブロードキャスト(CheckTx)の結果コード
    pub broadcast_code: u32,
    /// 取り込み後(DeliverTx)の結果コード
    pub tx_code: u32,
    /// 取り込み後のトランザクションに `iscn_record` イベントを含めるか
    pub tx_has_iscn_id: bool,
    /// レコード本体をBase64文字列で返すか
    pub records_as_base64: bool,
    /// トランザクション取得のルートがないノード（gRPCステータスのない404）を模すか
    pub tx_route_missing: bool,
    pub node_info_calls: AtomicUsize,
    pub tx_polls: AtomicUsize,
    pub broadcasts: Mutex<Vec<Value>>,
}

impl Default for MockNodeState {
    fn default() -> Self {
        Self {
            chain_id: MOCK_CHAIN_ID.to_string(),
            pending_polls: AtomicUsize::new(0),
            broadcast_code: 0,
            tx_code: 0,
            tx_has_iscn_id: true,
            records_as_base64: false,
            tx_route_missing: false,
            node_info_calls: AtomicUsize::new(0),
            tx_polls: AtomicUsize::new(0),
            broadcasts: Mutex::new(Vec::new()),
        }
    }
}

type Shared = State<Arc<MockNodeState>>;

fn grpc_error(status: StatusCode, code: i64, message: &str) -> (StatusCode, Json<Value>) {
    (
        status,
        Json(json!({ "code": code, "message": message, "details": [] })),
    )
}

fn mock_record_data() -> Value {
    json!({
        "@context": "http://iscn.io/",
        "@id": MOCK_ISCN_ID,
        "recordNotes": "",
        "contentFingerprints": ["hash://sha256/9564b85669d5e96ac969dd0161b8475bbced9e5999c6ec598da718a3045d6f2e"],
        "stakeholders": [],
        "contentMetadata": {
            "@context": "http://schema.org/",
            "@type": "Photo",
            "name": "Sunset",
            "version": 1,
        },
    })
}

async fn node_info(State(state): Shared) -> Json<Value> {
    state.node_info_calls.fetch_add(1, Ordering::SeqCst);
    Json(json!({
        "default_node_info": { "network": state.chain_id, "moniker": "mock" },
        "application_version": {},
    }))
}

async fn account(Path(address): Path<String>) -> (StatusCode, Json<Value>) {
    match address.as_str() {
        "like1unknown" => grpc_error(
            StatusCode::NOT_FOUND,
            5,
            "rpc error: code = NotFound desc = account like1unknown not found",
        ),
        "like1vesting" => (
            StatusCode::OK,
            Json(json!({
                "account": {
                    "@type": "/cosmos.vesting.v1beta1.DelayedVestingAccount",
                    "base_vesting_account": {
                        "base_account": {
                            "address": address,
                            "account_number": "99",
                            "sequence": "3",
                        },
                        "original_vesting": [],
                    },
                    "end_time": "0",
                }
            })),
        ),
        _ => (
            StatusCode::OK,
            Json(json!({
                "account": {
                    "@type": "/cosmos.auth.v1beta1.BaseAccount",
                    "address": address,
                    "pub_key": null,
                    "account_number": "42",
                    "sequence": "7",
                }
            })),
        ),
    }
}

async fn iscn_params() -> Json<Value> {
    Json(json!({
        "params": {
            "registry_name": "likecoin-chain",
            "fee_per_byte": { "denom": "nanolike", "amount": "10000.000000000000000000" },
        }
    }))
}

async fn broadcast(State(state): Shared, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if body["mode"] != "BROADCAST_MODE_SYNC" || !body["tx_bytes"].is_string() {
        return grpc_error(StatusCode::BAD_REQUEST, 3, "invalid broadcast request");
    }
    state
        .broadcasts
        .lock()
        .unwrap()
        .push(body);

    let raw_log = if state.broadcast_code == 0 {
        "[]"
    } else {
        "insufficient fees"
    };
    (
        StatusCode::OK,
        Json(json!({
            "tx_response": {
                "height": "0",
                "txhash": MOCK_TX_HASH,
                "code": state.broadcast_code,
                "raw_log": raw_log,
            }
        })),
    )
}

async fn get_tx(State(state): Shared, Path(hash): Path<String>) -> (StatusCode, Json<Value>) {
    state.tx_polls.fetch_add(1, Ordering::SeqCst);
    if state.tx_route_missing {
        return (
            StatusCode::NOT_FOUND,
            Json(Value::String("404 page not found".to_string())),
        );
    }
    let not_found = format!("tx not found: {hash}");
    if hash != MOCK_TX_HASH {
        return grpc_error(StatusCode::NOT_FOUND, 5, &not_found);
    }
    let pending = state
        .pending_polls
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok();
    if pending {
        return grpc_error(StatusCode::NOT_FOUND, 5, &not_found);
    }

    let events = if state.tx_has_iscn_id {
        json!([{
            "type": "iscn_record",
            "attributes": [
                { "key": "iscn_id", "value": MOCK_ISCN_ID },
                { "key": "owner", "value": MOCK_ADDRESS },
            ]
        }])
    } else {
        json!([])
    };
    let raw_log = if state.tx_code == 0 { "" } else { "out of gas" };
    (
        StatusCode::OK,
        Json(json!({
            "tx": {},
            "tx_response": {
                "height": "1234567",
                "txhash": MOCK_TX_HASH,
                "code": state.tx_code,
                "raw_log": raw_log,
                "gas_wanted": "200000",
                "gas_used": "150000",
                "logs": [{ "msg_index": 0, "events": events }],
                "events": [],
            }
        })),
    )
}

async fn records_by_id(
    State(state): Shared,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    let iscn_id = params.get("iscn_id").cloned().unwrap_or_default();
    if !iscn_id.starts_with("iscn://") {
        return grpc_error(StatusCode::BAD_REQUEST, 3, "invalid ISCN ID");
    }
    if iscn_id.contains("/boom/") {
        return grpc_error(StatusCode::INTERNAL_SERVER_ERROR, 13, "internal error");
    }
    if iscn_id != MOCK_ISCN_ID {
        return grpc_error(StatusCode::NOT_FOUND, 5, "record not found");
    }

    let data = if state.records_as_base64 {
        let bytes = serde_json::to_vec(&mock_record_data()).unwrap();
        Value::from(base64::engine::general_purpose::STANDARD.encode(bytes))
    } else {
        mock_record_data()
    };
    (
        StatusCode::OK,
        Json(json!({
            "owner": "like1owner",
            "latest_version": "1",
            "records": [{ "ipld": "baguqeeracd6ot5tymgjvqhoppxfafmy7wbeb4xvyrsbvekcvjt4tvkwnqdma", "data": data }],
        })),
    )
}

/// モックノードを起動し、ベースURLを返す。
pub async fn start_mock_node(state: Arc<MockNodeState>) -> String {
    use axum::routing::{get, post};

    let app = axum::Router::new()
        .route("/cosmos/base/tendermint/v1beta1/node_info", get(node_info))
        .route("/cosmos/auth/v1beta1/accounts/{address}", get(account))
        .route("/cosmos/tx/v1beta1/txs", post(broadcast))
        .route("/cosmos/tx/v1beta1/txs/{hash}", get(get_tx))
        .route("/iscn/params", get(iscn_params))
        .route("/iscn/records/id", get(records_by_id))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    format!("http://127.0.0.1:{port}")
}

/// 署名ドキュメントをJSONにしてそのままトランザクションバイト列とするモック署名者。
pub struct MockSigner {
    pub address: String,
    pub reject: bool,
    pub signed: Mutex<Vec<SignDoc>>,
}

impl MockSigner {
    pub fn new(address: &str) -> Self {
        Self {
            address: address.to_string(),
            reject: false,
            signed: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl OfflineSigner for MockSigner {
    async fn get_accounts(&self) -> Result<Vec<AccountData>, SignerError> {
        Ok(vec![AccountData {
            address: self.address.clone(),
            algo: "secp256k1".to_string(),
            pubkey: vec![2u8; 33],
        }])
    }

    async fn sign(&self, signer_address: &str, sign_doc: &SignDoc) -> Result<SignedTx, SignerError> {
        if self.reject {
            return Err(SignerError::Rejected("Request rejected".to_string()));
        }
        assert_eq!(signer_address, self.address);
        self.signed.lock().unwrap().push(sign_doc.clone());
        Ok(SignedTx {
            tx_bytes: serde_json::to_vec(sign_doc).unwrap(),
        })
    }
}
