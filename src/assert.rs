//! Pre-flight assertions.
//!
//! Each check either returns `Ok(())` or fails with the tagged error a
//! reverting contract would have produced, so no fee is spent on a call that
//! is known to fail.

use alloy::primitives::{Address, U256};
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};

use crate::{Result, ensure};

pub fn is_non_zero_address(field: &str, address: Address) -> Result<()> {
    ensure!(
        !address.is_zero(),
        InvalidData,
        "Invalid {field} address {address}"
    );
    Ok(())
}

pub fn are_non_zero_addresses(field: &str, addresses: &[Address]) -> Result<()> {
    addresses
        .iter()
        .try_for_each(|address| is_non_zero_address(field, *address))
}

/// Fails with `TooEarly` unless `date` is strictly after now.
pub fn is_future_date(date: DateTime<Utc>, message: &str) -> Result<()> {
    ensure!(date > Utc::now(), TooEarly, "{message}");
    Ok(())
}

/// Fails with `InvalidData` unless `0 <= value <= 100`.
pub fn is_percentage(field: &str, value: &BigDecimal) -> Result<()> {
    ensure!(
        *value >= BigDecimal::from(0) && *value <= BigDecimal::from(100),
        InvalidData,
        "Invalid percentage for {field}: {value}"
    );
    Ok(())
}

pub fn is_positive(field: &str, value: &BigDecimal) -> Result<()> {
    ensure!(
        *value > BigDecimal::from(0),
        InvalidData,
        "{field} must be greater than 0"
    );
    Ok(())
}

pub fn is_non_empty_string(field: &str, value: &str) -> Result<()> {
    ensure!(!value.is_empty(), InvalidData, "{field} must not be empty");
    Ok(())
}

pub fn is_bytes32_string(field: &str, value: &str) -> Result<()> {
    ensure!(
        value.len() <= 32,
        InvalidData,
        "{field} must be at most 32 bytes long"
    );
    Ok(())
}

/// Ticker symbols are 1 to 10 bytes.
pub fn is_valid_ticker(ticker: &str) -> Result<()> {
    ensure!(
        !ticker.is_empty() && ticker.len() <= 10,
        InvalidData,
        "Ticker '{ticker}' must be between 1 and 10 characters"
    );
    Ok(())
}

/// Bulk operations take parallel arrays of equal length.
pub fn are_same_length(lengths: &[(&str, usize)]) -> Result<()> {
    if let Some((first_name, first_len)) = lengths.first() {
        for (name, len) in &lengths[1..] {
            ensure!(
                len == first_len,
                MismatchedArrayLength,
                "Length of {name} ({len}) does not match length of {first_name} ({first_len})"
            );
        }
    }
    Ok(())
}

pub fn is_non_empty_list<T>(field: &str, values: &[T]) -> Result<()> {
    ensure!(!values.is_empty(), InvalidData, "{field} must not be empty");
    Ok(())
}

pub fn is_non_zero(field: &str, value: U256) -> Result<()> {
    ensure!(!value.is_zero(), InvalidData, "{field} must be greater than 0");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorCode;
    use chrono::Duration;
    use std::str::FromStr;

    #[test]
    fn test_non_zero_address() {
        assert!(is_non_zero_address("holder", Address::repeat_byte(1)).is_ok());
        let err = is_non_zero_address("holder", Address::ZERO).unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::InvalidData));
    }

    #[test]
    fn test_future_date() {
        assert!(is_future_date(Utc::now() + Duration::hours(1), "start").is_ok());
        let err = is_future_date(Utc::now() - Duration::hours(1), "start").unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::TooEarly));
    }

    #[test]
    fn test_percentage() {
        assert!(is_percentage("allowed", &BigDecimal::from(100)).is_ok());
        assert!(is_percentage("allowed", &BigDecimal::from_str("0.5").unwrap()).is_ok());
        assert!(is_percentage("allowed", &BigDecimal::from_str("100.01").unwrap()).is_err());
        assert!(is_percentage("allowed", &BigDecimal::from(-1)).is_err());
    }

    #[test]
    fn test_same_length() {
        assert!(are_same_length(&[("holders", 3), ("amounts", 3), ("dates", 3)]).is_ok());
        assert!(are_same_length(&[]).is_ok());
        let err = are_same_length(&[("holders", 3), ("allowedTokens", 2)]).unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::MismatchedArrayLength));
    }

    #[test]
    fn test_ticker() {
        assert!(is_valid_ticker("POLY").is_ok());
        assert!(is_valid_ticker("").is_err());
        assert!(is_valid_ticker("ELEVENCHARS").is_err());
    }
}
