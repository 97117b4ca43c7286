//! # クライアントエラー型
//!
//! 署名クライアント・照会クライアント・レジストリサービスで共通のエラー型。
//! ノードが返すgRPCステータスコードから型付きのバリアントに振り分ける。

use iscn_core::FormatError;

use crate::signer::SignerError;

/// gRPCステータス: InvalidArgument
pub const GRPC_CODE_INVALID_ARGUMENT: i64 = 3;

/// gRPCステータス: NotFound
pub const GRPC_CODE_NOT_FOUND: i64 = 5;

/// クライアントエラー型。
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// ノードへのHTTP通信に失敗
    #[error("ノードとの通信に失敗: {0}")]
    Transport(String),
    /// レスポンスのパースに失敗
    #[error("レスポンスのパースに失敗: {0}")]
    Decode(String),
    /// 不正な引数（ISCN ID・トランザクションハッシュの形式不正等）
    #[error("不正な引数: {0}")]
    InvalidArgument(String),
    /// 対象が存在しない
    #[error("見つかりません: {0}")]
    NotFound(String),
    /// gRPCステータスを含まないHTTPエラー（接続先URLの誤り等）
    #[error("HTTPエラー (status {status}): {message}")]
    Http {
        /// HTTPステータス
        status: u16,
        /// レスポンスボディ
        message: String,
    },
    /// 上記以外のノードエラー
    #[error("RPCエラー (code {code}): {message}")]
    Rpc {
        /// gRPCステータスコード
        code: i64,
        /// エラーメッセージ
        message: String,
    },
    /// 署名者のエラー
    #[error(transparent)]
    Signer(#[from] SignerError),
    /// 署名者が指定アドレスの鍵を持っていない
    #[error("署名者にアドレス {0} のアカウントがありません")]
    AccountNotFound(String),
    /// トランザクションがチェーン上で失敗した
    #[error("トランザクション {tx_hash} が失敗しました (code {code}): {raw_log}")]
    Broadcast {
        /// トランザクションハッシュ
        tx_hash: String,
        /// 結果コード
        code: u32,
        /// 生ログ
        raw_log: String,
    },
    /// タイムアウトまでにブロックに取り込まれなかった
    #[error("トランザクション {tx_hash} がタイムアウトまでにブロックに取り込まれませんでした")]
    InclusionTimeout {
        /// トランザクションハッシュ
        tx_hash: String,
    },
    /// トランザクションからISCN IDが得られなかった
    #[error("トランザクション {0} にISCN IDが含まれていません")]
    NoIscnId(String),
    /// ペイロード整形エラー
    #[error(transparent)]
    Format(#[from] FormatError),
    /// 設定エラー
    #[error("設定エラー: {0}")]
    Config(String),
}

impl ClientError {
    /// gRPCステータスコードとメッセージから型付きエラーを作る。
    pub fn from_status(code: i64, message: String) -> Self {
        match code {
            GRPC_CODE_INVALID_ARGUMENT => ClientError::InvalidArgument(message),
            GRPC_CODE_NOT_FOUND => ClientError::NotFound(message),
            _ => ClientError::Rpc { code, message },
        }
    }
}

/// ISCN IDによる照会の失敗。
///
/// 旧来の番兵コードが必要な呼び出し側は [`LookupError::sentinel_code`] を使う。
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    /// ISCN IDの形式が不正
    #[error("不正なISCN ID: {0}")]
    InvalidId(String),
    /// ISCN IDに対応するレコードが存在しない
    #[error("ISCNレコードが見つかりません: {0}")]
    NotFound(String),
    /// その他の失敗
    #[error("ISCNレコードの照会に失敗: {0}")]
    Other(#[source] ClientError),
}

/// 不正ID・未登録を表す番兵コード。
pub const LOOKUP_SENTINEL_INVALID: &str = "-1";

/// その他の失敗を表す番兵コード。
pub const LOOKUP_SENTINEL_OTHER: &str = "-2";

impl LookupError {
    /// クライアントエラーを照会失敗に分類する。
    ///
    /// 型付きのバリアントを優先し、それ以外のRPCエラーに限り
    /// メッセージ中の "invalid"（大文字小文字を区別）で不正IDと判定する。
    pub fn classify(err: ClientError) -> Self {
        match err {
            ClientError::InvalidArgument(message) => LookupError::InvalidId(message),
            ClientError::NotFound(message) => LookupError::NotFound(message),
            ClientError::Rpc { message, .. } if message.contains("invalid") => {
                LookupError::InvalidId(message)
            }
            other => LookupError::Other(other),
        }
    }

    /// 旧来の番兵コード（不正ID・未登録は "-1"、それ以外は "-2"）。
    pub fn sentinel_code(&self) -> &'static str {
        match self {
            LookupError::InvalidId(_) | LookupError::NotFound(_) => LOOKUP_SENTINEL_INVALID,
            LookupError::Other(_) => LOOKUP_SENTINEL_OTHER,
        }
    }
}
