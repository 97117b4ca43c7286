//! # ガス・ISCN手数料の見積もり
//!
//! ガスはトランザクション（Amino StdTx JSON）のバイト数からの線形推定、
//! ISCN登録手数料はレコードJSONのバイト数 × チェーンの `fee_per_byte` で求める。
//!
//! ```text
//! gas      = (bytes * 10 + 75000) + round((bytes * 10 + 75000) * 0.5)
//! fee      = gas * gas_price
//! iscn_fee = ceil(record_bytes * fee_per_byte)
//! ```

use iscn_types::{Coin, GasEstimate, IscnRecord, MsgCreateIscnRecord, StdFee};
use serde_json::json;

use crate::record::MSG_CREATE_ISCN_RECORD_AMINO_TYPE;
use crate::FormatError;

/// ガス推定の切片。
pub const GAS_ESTIMATOR_INTERCEPT: u64 = 75_000;

/// ガス推定の傾き（1バイトあたりのガス）。
pub const GAS_ESTIMATOR_SLOPE: u64 = 10;

/// Cosmos SDK `Dec` の小数点以下桁数。
const DEC_PRECISION: u32 = 18;

/// 見積もり用StdTxに埋める仮の手数料・署名。実際の署名と同じ長さにする。
const PLACEHOLDER_FEE_AMOUNT: &str = "200000";
const PLACEHOLDER_PUBKEY_LEN: usize = 44;
const PLACEHOLDER_SIGNATURE_LEN: usize = 88;

/// メッセージを含むStdTx JSONのバイト数を返す。
pub fn std_tx_byte_size(
    msg: &MsgCreateIscnRecord,
    memo: &str,
    denom: &str,
) -> Result<usize, FormatError> {
    let std_tx = json!({
        "type": "cosmos-sdk/StdTx",
        "value": {
            "msg": [{
                "type": MSG_CREATE_ISCN_RECORD_AMINO_TYPE,
                "value": msg,
            }],
            "fee": {
                "amount": [{ "denom": denom, "amount": PLACEHOLDER_FEE_AMOUNT }],
                "gas": PLACEHOLDER_FEE_AMOUNT,
            },
            "signatures": [{
                "pub_key": {
                    "type": "tendermint/PubKeySecp256k1",
                    "value": "A".repeat(PLACEHOLDER_PUBKEY_LEN),
                },
                "signature": "A".repeat(PLACEHOLDER_SIGNATURE_LEN),
            }],
            "memo": memo,
        }
    });
    serde_json::to_vec(&std_tx)
        .map(|bytes| bytes.len())
        .map_err(|e| FormatError::Serialize(format!("StdTx: {e}")))
}

/// バイト数からガス量を推定する（50%のバッファ込み）。
pub fn estimate_gas_from_bytes(byte_size: usize) -> u64 {
    let before_buffer = byte_size as u64 * GAS_ESTIMATOR_SLOPE + GAS_ESTIMATOR_INTERCEPT;
    // round(x * 0.5)
    let buffer = (before_buffer + 1) / 2;
    before_buffer + buffer
}

/// ISCNレコード作成トランザクションのガスと手数料を見積もる。
pub fn estimate_iscn_tx_gas(
    msg: &MsgCreateIscnRecord,
    memo: &str,
    denom: &str,
    gas_price: u64,
) -> Result<GasEstimate, FormatError> {
    let gas = estimate_gas_from_bytes(std_tx_byte_size(msg, memo, denom)?);
    let amount = gas.checked_mul(gas_price).ok_or(FormatError::Overflow)?;
    Ok(GasEstimate {
        fee: StdFee {
            amount: vec![Coin {
                denom: denom.to_string(),
                amount: amount.to_string(),
            }],
            gas: gas.to_string(),
        },
    })
}

/// Cosmos SDK `Dec` 文字列を 10^18 倍した整数に変換する。
pub fn parse_dec(value: &str) -> Result<u128, FormatError> {
    let invalid = || FormatError::InvalidDecimal(value.to_string());
    let (int_part, frac_part) = match value.split_once('.') {
        Some((i, f)) => (i, f),
        None => (value, ""),
    };
    if int_part.is_empty()
        || frac_part.len() > DEC_PRECISION as usize
        || !int_part.bytes().all(|b| b.is_ascii_digit())
        || !frac_part.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(invalid());
    }

    let scale = 10u128.pow(DEC_PRECISION);
    let int_value: u128 = int_part.parse().map_err(|_| invalid())?;
    let frac_value: u128 = if frac_part.is_empty() {
        0
    } else {
        let padded = format!("{frac_part:0<width$}", width = DEC_PRECISION as usize);
        padded.parse().map_err(|_| invalid())?
    };
    int_value
        .checked_mul(scale)
        .and_then(|v| v.checked_add(frac_value))
        .ok_or(FormatError::Overflow)
}

/// レコードJSONのバイト数からISCN登録手数料を見積もる。
pub fn estimate_iscn_fee(record: &IscnRecord, fee_per_byte: &Coin) -> Result<Coin, FormatError> {
    let byte_size = serde_json::to_vec(record)
        .map_err(|e| FormatError::Serialize(format!("レコード: {e}")))?
        .len() as u128;
    let per_byte = parse_dec(&fee_per_byte.amount)?;
    let scale = 10u128.pow(DEC_PRECISION);

    let scaled = byte_size.checked_mul(per_byte).ok_or(FormatError::Overflow)?;
    let amount = scaled.div_ceil(scale);

    Ok(Coin {
        denom: fee_per_byte.denom.clone(),
        amount: amount.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::build_msg_create_iscn_record;
    use iscn_types::SignPayload;

    fn sample_msg() -> MsgCreateIscnRecord {
        let payload = SignPayload {
            keywords: vec!["art".to_string()],
            usage_info: "CC-BY-4.0".to_string(),
            content_fingerprints: vec!["ipfs://QmCid".to_string()],
            ..Default::default()
        };
        build_msg_create_iscn_record("like1sender", &payload).unwrap()
    }

    #[test]
    fn test_estimate_gas_from_bytes() {
        // 0バイト: 75000 + 37500
        assert_eq!(estimate_gas_from_bytes(0), 112_500);
        // 1バイト: 75010 + 37505
        assert_eq!(estimate_gas_from_bytes(1), 112_515);
        // 奇数の中間値は切り上げ: 75000 + 10*3 = 75030 -> 37515
        assert_eq!(estimate_gas_from_bytes(3), 112_545);
    }

    #[test]
    fn test_estimate_iscn_tx_gas() {
        let msg = sample_msg();
        let bytes = std_tx_byte_size(&msg, "app.like.co", "nanolike").unwrap();
        let estimate = estimate_iscn_tx_gas(&msg, "app.like.co", "nanolike", 10).unwrap();

        let gas = estimate_gas_from_bytes(bytes);
        assert_eq!(estimate.fee.gas, gas.to_string());
        assert_eq!(estimate.fee.amount.len(), 1);
        assert_eq!(estimate.fee.amount[0].denom, "nanolike");
        assert_eq!(estimate.fee.amount[0].amount, (gas * 10).to_string());
    }

    #[test]
    fn test_longer_memo_costs_more_gas() {
        let msg = sample_msg();
        let short = std_tx_byte_size(&msg, "", "nanolike").unwrap();
        let long = std_tx_byte_size(&msg, "app.like.co", "nanolike").unwrap();
        assert_eq!(long - short, "app.like.co".len());
    }

    #[test]
    fn test_parse_dec() {
        let scale = 10u128.pow(18);
        assert_eq!(parse_dec("10000.000000000000000000").unwrap(), 10_000 * scale);
        assert_eq!(parse_dec("1").unwrap(), scale);
        assert_eq!(parse_dec("0.5").unwrap(), scale / 2);
        assert_eq!(parse_dec("0.000000000000000001").unwrap(), 1);

        assert!(parse_dec("").is_err());
        assert!(parse_dec(".5").is_err());
        assert!(parse_dec("-1").is_err());
        assert!(parse_dec("1.0000000000000000001").is_err());
        assert!(parse_dec("abc").is_err());
    }

    #[test]
    fn test_estimate_iscn_fee_rounds_up() {
        let msg = sample_msg();
        let bytes = serde_json::to_vec(&msg.record).unwrap().len() as u128;

        let fee = estimate_iscn_fee(
            &msg.record,
            &Coin {
                denom: "nanolike".to_string(),
                amount: "10000.000000000000000000".to_string(),
            },
        )
        .unwrap();
        assert_eq!(fee.denom, "nanolike");
        assert_eq!(fee.amount, (bytes * 10_000).to_string());

        // 1バイトあたり0.5 → 端数は切り上げ
        let fee = estimate_iscn_fee(
            &msg.record,
            &Coin {
                denom: "nanolike".to_string(),
                amount: "0.5".to_string(),
            },
        )
        .unwrap();
        assert_eq!(fee.amount, bytes.div_ceil(2).to_string());
    }
}
