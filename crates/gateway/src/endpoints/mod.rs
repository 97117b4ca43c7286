//! # Gatewayエンドポイント

pub mod estimate;
pub mod fingerprint;
pub mod format;
pub mod records;
pub mod tx_ids;

pub use estimate::handle_estimate;
pub use fingerprint::handle_fingerprint;
pub use format::handle_format;
pub use records::handle_records;
pub use tx_ids::handle_tx_iscn_ids;
