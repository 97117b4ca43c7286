//! # iscn-client
//!
//! LikeCoinチェーンへのISCN登録・照会クライアント。
//!
//! - [`SigningClient`]: ガス・手数料の見積もりとISCNレコード作成
//! - [`QueryClient`]: ISCN ID・トランザクションによる照会
//! - [`OfflineSigner`]: 呼び出し側が用意する署名者
//! - [`IscnRegistry`]: 上記クライアントを遅延接続で所有するサービス

pub mod config;
pub mod error;
pub mod query;
pub mod registry;
mod rest;
pub mod signer;
pub mod signing;

#[cfg(test)]
mod test_helpers;

pub use config::NetworkConfig;
pub use error::{ClientError, LookupError, LOOKUP_SENTINEL_INVALID, LOOKUP_SENTINEL_OTHER};
pub use query::{QueryClient, RestQueryClient};
pub use registry::{IscnRegistry, RestIscnRegistry};
pub use signer::{AccountData, OfflineSigner, SignedTx, SignerError};
pub use signing::{RestSigningClient, SigningClient, TxOptions};
