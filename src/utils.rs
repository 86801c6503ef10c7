use alloy::primitives::{B256, U256};
use bigdecimal::BigDecimal;
use bigdecimal::num_bigint::{BigInt, Sign};
use chrono::{DateTime, Utc};

use crate::{Result, ensure};

/// Decimals used by POLY, ETH and every 18-decimal on-chain quantity.
pub const FULL_DECIMALS: u8 = 18;

/// Decimals of on-chain percentages: `10^18` represents 100%.
pub const PERCENTAGE_DECIMALS: u8 = 16;

/// Converts a decimal value to its on-chain integer representation.
/// Digits below `10^-decimals` are truncated.
/// Fails with `InvalidData` for negative values or values that overflow 256 bits.
pub fn value_to_wei(value: &BigDecimal, decimals: u8) -> Result<U256> {
    let scaled = value * BigDecimal::new(BigInt::from(1), -i64::from(decimals));
    let (int, _) = scaled.with_scale(0).into_bigint_and_exponent();
    let (sign, bytes) = int.to_bytes_be();
    ensure!(sign != Sign::Minus, InvalidData, "Value {value} must not be negative");
    ensure!(
        bytes.len() <= 32,
        InvalidData,
        "Value {value} does not fit into 256 bits"
    );
    Ok(U256::from_be_slice(&bytes))
}

/// Converts an on-chain integer to a decimal value with the given decimals.
pub fn wei_to_value(wei: U256, decimals: u8) -> BigDecimal {
    let int = BigInt::from_bytes_be(Sign::Plus, &wei.to_be_bytes::<32>());
    BigDecimal::new(int, i64::from(decimals))
}

/// Converts an 18-decimal on-chain integer to a decimal value.
pub fn wei_to_eth(wei: U256) -> BigDecimal {
    wei_to_value(wei, FULL_DECIMALS)
}

/// Converts a decimal value to an 18-decimal on-chain integer.
pub fn eth_to_wei(eth: &BigDecimal) -> Result<U256> {
    value_to_wei(eth, FULL_DECIMALS)
}

/// Encodes a percentage (0-100) with [`PERCENTAGE_DECIMALS`].
pub fn percentage_to_wei(percentage: &BigDecimal) -> Result<U256> {
    value_to_wei(percentage, PERCENTAGE_DECIMALS)
}

/// Packs a string into a right zero-padded `bytes32`.
pub fn string_to_bytes32(value: &str) -> Result<B256> {
    let bytes = value.as_bytes();
    ensure!(
        bytes.len() <= 32,
        InvalidData,
        "'{value}' is {} bytes long, bytes32 holds at most 32",
        bytes.len()
    );
    let mut word = B256::ZERO;
    word[..bytes.len()].copy_from_slice(bytes);
    Ok(word)
}

/// Unpacks a `bytes32` string, dropping the trailing zero padding.
pub fn bytes32_to_string(value: B256) -> Result<String> {
    let end = value
        .iter()
        .rposition(|byte| *byte != 0)
        .map_or(0, |last| last + 1);
    String::from_utf8(value[..end].to_vec())
        .map_err(|e| crate::Error::InvalidData(format!("bytes32 is not valid UTF-8: {e}")))
}

pub fn strings_to_bytes32(values: &[String]) -> Result<Vec<B256>> {
    values.iter().map(|v| string_to_bytes32(v)).collect()
}

pub fn bytes32_to_strings(values: Vec<B256>) -> Result<Vec<String>> {
    values.into_iter().map(bytes32_to_string).collect()
}

/// Converts a date to a Unix timestamp in seconds.
/// Dates before the epoch are clamped to zero.
pub fn date_to_timestamp(date: DateTime<Utc>) -> U256 {
    U256::from(u64::try_from(date.timestamp()).unwrap_or_default())
}

/// Converts a date to `uint64` seconds. Dates before the epoch are `InvalidData`.
pub fn date_to_seconds(date: DateTime<Utc>) -> Result<u64> {
    u64::try_from(date.timestamp())
        .map_err(|_| crate::Error::InvalidData(format!("Date {date} is before the Unix epoch")))
}

/// Converts a Unix timestamp in seconds to a date.
pub fn timestamp_to_date(timestamp: U256) -> Result<DateTime<Utc>> {
    let seconds = i64::try_from(timestamp)
        .map_err(|_| crate::Error::InvalidData(format!("Timestamp {timestamp} is out of range")))?;
    DateTime::from_timestamp(seconds, 0)
        .ok_or_else(|| crate::Error::InvalidData(format!("Timestamp {timestamp} is out of range")))
}

/// Narrows an on-chain integer to `u64`.
pub fn to_u64(value: U256, field: &str) -> Result<u64> {
    u64::try_from(value)
        .map_err(|_| crate::Error::InvalidData(format!("{field} {value} does not fit into u64")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorCode;
    use chrono::TimeZone;
    use std::str::FromStr;

    #[test]
    fn test_value_to_wei() {
        let one = BigDecimal::from(1);
        assert_eq!(
            value_to_wei(&one, 18).unwrap(),
            U256::from(1_000_000_000_000_000_000u128)
        );
        let fraction = BigDecimal::from_str("1.5").unwrap();
        assert_eq!(value_to_wei(&fraction, 6).unwrap(), U256::from(1_500_000u64));
        assert_eq!(value_to_wei(&fraction, 0).unwrap(), U256::from(1u64));
    }

    #[test]
    fn test_value_to_wei_truncates_sub_unit_digits() {
        let value = BigDecimal::from_str("0.1234567").unwrap();
        assert_eq!(value_to_wei(&value, 4).unwrap(), U256::from(1234u64));
    }

    #[test]
    fn test_value_to_wei_rejects_negative() {
        let err = value_to_wei(&BigDecimal::from(-1), 18).unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::InvalidData));
    }

    #[test]
    fn test_value_to_wei_rejects_overflow() {
        let huge = wei_to_value(U256::MAX, 0) * BigDecimal::from(10);
        let err = value_to_wei(&huge, 0).unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::InvalidData));
    }

    #[test]
    fn test_wei_to_value() {
        let raw = U256::from(1_000_000_000_000_000_000u128);
        assert_eq!(wei_to_value(raw, 18), BigDecimal::from(1));
        assert_eq!(
            wei_to_value(U256::from(25u64), 1),
            BigDecimal::from_str("2.5").unwrap()
        );
        assert_eq!(wei_to_value(U256::ZERO, 18), BigDecimal::from(0));
    }

    #[test]
    fn test_unit_conversion_is_stable() {
        let samples = [
            ("0", 18),
            ("1", 0),
            ("3.14159", 4),
            ("123456789.987654321", 18),
            ("0.000000000000000001", 18),
            ("42.42", 16),
        ];
        for (value, decimals) in samples {
            let first = value_to_wei(&BigDecimal::from_str(value).unwrap(), decimals).unwrap();
            let back = wei_to_value(first, decimals);
            assert_eq!(value_to_wei(&back, decimals).unwrap(), first, "{value}");
        }
        let max = wei_to_value(U256::MAX, 18);
        assert_eq!(value_to_wei(&max, 18).unwrap(), U256::MAX);
    }

    #[test]
    fn test_percentage_scaling() {
        assert_eq!(
            percentage_to_wei(&BigDecimal::from(100)).unwrap(),
            U256::from(1_000_000_000_000_000_000u128)
        );
        assert_eq!(
            percentage_to_wei(&BigDecimal::from(1)).unwrap(),
            U256::from(10_000_000_000_000_000u128)
        );
    }

    #[test]
    fn test_bytes32_round_trip() {
        for s in ["", "ADMIN", "tickerRegFee", "exactly thirty-two bytes long!!!"] {
            let packed = string_to_bytes32(s).unwrap();
            assert_eq!(bytes32_to_string(packed).unwrap(), s);
        }
        let packed = string_to_bytes32("ADMIN").unwrap();
        assert_eq!(&packed[..5], b"ADMIN");
        assert!(packed[5..].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_bytes32_rejects_long_strings() {
        let err = string_to_bytes32("this string is clearly longer than 32 bytes").unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::InvalidData));
    }

    #[test]
    fn test_bytes32_rejects_invalid_utf8() {
        let mut word = B256::ZERO;
        word[0] = 0xff;
        assert!(bytes32_to_string(word).is_err());
    }

    #[test]
    fn test_timestamp_round_trip() {
        let date = Utc.with_ymd_and_hms(2030, 1, 15, 12, 30, 0).unwrap();
        let timestamp = date_to_timestamp(date);
        assert_eq!(timestamp, U256::from(date.timestamp() as u64));
        assert_eq!(timestamp_to_date(timestamp).unwrap(), date);
        assert!(timestamp_to_date(U256::MAX).is_err());
    }

    #[test]
    fn test_seconds_before_epoch() {
        let date = Utc.with_ymd_and_hms(1969, 12, 31, 23, 59, 59).unwrap();
        let err = date_to_seconds(date).unwrap_err();
        assert_eq!(err.code(), Some(crate::ErrorCode::InvalidData));
        assert_eq!(date_to_seconds(DateTime::UNIX_EPOCH).unwrap(), 0);
    }
}
