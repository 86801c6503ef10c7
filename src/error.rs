use displaydoc::Display;
use thiserror::Error;

/// Tag of a client-side failure.
/// Every pre-flight assertion fails with exactly one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum ErrorCode {
    /// InvalidData
    InvalidData,
    /// Unauthorized
    Unauthorized,
    /// PreconditionRequired
    PreconditionRequired,
    /// AlreadyExists
    AlreadyExists,
    /// NotFound
    NotFound,
    /// MismatchedArrayLength
    MismatchedArrayLength,
    /// InvalidBound
    InvalidBound,
    /// InvalidVersion
    InvalidVersion,
    /// TooEarly
    TooEarly,
    /// ContractPaused
    ContractPaused,
    /// InvalidTransfer
    InvalidTransfer,
}

/// Errors returned by the contract wrappers.
///
/// Client-side variants are raised before any state-changing call is sent.
/// Remote failures are passed through untouched.
#[derive(Debug, Display, Error)]
pub enum Error {
    /// Invalid data: {0}
    InvalidData(String),
    /// Unauthorized: {0}
    Unauthorized(String),
    /// Precondition required: {0}
    PreconditionRequired(String),
    /// Already exists: {0}
    AlreadyExists(String),
    /// Not found: {0}
    NotFound(String),
    /// Mismatched array length: {0}
    MismatchedArrayLength(String),
    /// Invalid bound: {0}
    InvalidBound(String),
    /// Invalid version: {0}
    InvalidVersion(String),
    /// Too early: {0}
    TooEarly(String),
    /// Contract paused: {0}
    ContractPaused(String),
    /// Invalid transfer: {0}
    InvalidTransfer(String),
    /// Contract call failed: {0}
    Contract(#[from] alloy::contract::Error),
    /// Transport error: {0}
    Transport(#[from] alloy::transports::TransportError),
}

impl Error {
    /// Builds a client-side error from its tag.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        let message = message.into();
        match code {
            ErrorCode::InvalidData => Self::InvalidData(message),
            ErrorCode::Unauthorized => Self::Unauthorized(message),
            ErrorCode::PreconditionRequired => Self::PreconditionRequired(message),
            ErrorCode::AlreadyExists => Self::AlreadyExists(message),
            ErrorCode::NotFound => Self::NotFound(message),
            ErrorCode::MismatchedArrayLength => Self::MismatchedArrayLength(message),
            ErrorCode::InvalidBound => Self::InvalidBound(message),
            ErrorCode::InvalidVersion => Self::InvalidVersion(message),
            ErrorCode::TooEarly => Self::TooEarly(message),
            ErrorCode::ContractPaused => Self::ContractPaused(message),
            ErrorCode::InvalidTransfer => Self::InvalidTransfer(message),
        }
    }

    /// Returns the tag of a client-side failure, `None` for remote errors.
    pub fn code(&self) -> Option<ErrorCode> {
        Some(match self {
            Self::InvalidData(_) => ErrorCode::InvalidData,
            Self::Unauthorized(_) => ErrorCode::Unauthorized,
            Self::PreconditionRequired(_) => ErrorCode::PreconditionRequired,
            Self::AlreadyExists(_) => ErrorCode::AlreadyExists,
            Self::NotFound(_) => ErrorCode::NotFound,
            Self::MismatchedArrayLength(_) => ErrorCode::MismatchedArrayLength,
            Self::InvalidBound(_) => ErrorCode::InvalidBound,
            Self::InvalidVersion(_) => ErrorCode::InvalidVersion,
            Self::TooEarly(_) => ErrorCode::TooEarly,
            Self::ContractPaused(_) => ErrorCode::ContractPaused,
            Self::InvalidTransfer(_) => ErrorCode::InvalidTransfer,
            Self::Contract(_) | Self::Transport(_) => return None,
        })
    }
}

/// Crate-wide result type.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Returns early with a tagged error when the condition does not hold.
///
/// ```ignore
/// ensure!(amount > U256::ZERO, InvalidData, "Amount must be greater than zero");
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $code:ident, $($arg:tt)+) => {
        if !$cond {
            return Err($crate::Error::new($crate::ErrorCode::$code, format!($($arg)+)));
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(value: u32) -> Result<u32> {
        ensure!(value < 10, InvalidBound, "{value} is out of range");
        Ok(value)
    }

    #[test]
    fn test_ensure_tags_error() {
        assert_eq!(check(3).unwrap(), 3);
        let err = check(42).unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::InvalidBound));
        assert_eq!(err.to_string(), "Invalid bound: 42 is out of range");
    }

    #[test]
    fn test_code_round_trip() {
        for code in [
            ErrorCode::InvalidData,
            ErrorCode::Unauthorized,
            ErrorCode::TooEarly,
            ErrorCode::ContractPaused,
            ErrorCode::InvalidTransfer,
        ] {
            assert_eq!(Error::new(code, "x").code(), Some(code));
        }
    }
}
