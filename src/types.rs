//! Domain enums shared by the wrappers, with their on-chain encodings.

use alloy::primitives::B256;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Declares a `#[repr(u8)]` enum with `TryFrom<u8>` and `From<Self> for u8`.
macro_rules! u8_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($(#[$vmeta:meta])* $variant:ident = $code:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[repr(u8)]
        pub enum $name {
            $($(#[$vmeta])* $variant = $code),+
        }

        impl TryFrom<u8> for $name {
            type Error = Error;

            fn try_from(code: u8) -> Result<Self> {
                match code {
                    $($code => Ok(Self::$variant),)+
                    _ => Err(Error::InvalidData(format!(
                        "{code} is not a valid {}",
                        stringify!($name)
                    ))),
                }
            }
        }

        impl From<$name> for u8 {
            fn from(value: $name) -> u8 {
                value as u8
            }
        }
    };
}

u8_enum! {
    /// Kind of module attached to a security token.
    pub enum ModuleType {
        PermissionManager = 1,
        TransferManager = 2,
        Sto = 3,
        Dividends = 4,
        Burn = 5,
        Data = 6,
        Wallet = 7,
    }
}

/// Module permissions checked through the security token's permission manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Permission {
    Admin,
    Operator,
}

impl Permission {
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::Admin => "ADMIN",
            Permission::Operator => "OPERATOR",
        }
    }

    /// The `bytes32` form passed to `checkPermission`.
    pub fn to_bytes32(self) -> B256 {
        B256::right_padding_from(self.as_str().as_bytes())
    }
}

u8_enum! {
    /// How a volume restriction interprets its allowed amount.
    pub enum RestrictionType {
        /// A fixed amount of tokens, scaled by the token's decimals.
        Fixed = 0,
        /// A percentage of the total supply, scaled by 16 decimals.
        Percentage = 1,
    }
}

u8_enum! {
    /// Currency an STO accepts.
    pub enum FundRaiseType {
        Eth = 0,
        Poly = 1,
        StableCoin = 2,
    }
}

u8_enum! {
    /// Investor flags stored by the general transfer manager.
    pub enum FlagsType {
        IsAccredited = 0,
        CanNotBuyFromSto = 1,
        IsVolRestricted = 2,
    }
}

u8_enum! {
    /// Transfer category used by transfer requirements.
    pub enum TransferType {
        General = 0,
        Issuance = 1,
        Redemption = 2,
    }
}

u8_enum! {
    /// State of a vesting schedule.
    pub enum ScheduleState {
        Created = 0,
        Started = 1,
        Completed = 2,
    }
}

/// Which security token version bound of a module factory to change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoundType {
    LowerBound,
    UpperBound,
}

impl BoundType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BoundType::LowerBound => "lowerBound",
            BoundType::UpperBound => "upperBound",
        }
    }
}

/// Registry fees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeeType {
    TickerRegistration,
    SecurityTokenLaunch,
}

impl FeeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeeType::TickerRegistration => "tickerRegFee",
            FeeType::SecurityTokenLaunch => "stLaunchFee",
        }
    }

    pub fn to_bytes32(self) -> B256 {
        B256::right_padding_from(self.as_str().as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::bytes32_to_string;

    #[test]
    fn test_module_type_codes() {
        assert_eq!(ModuleType::try_from(2).unwrap(), ModuleType::TransferManager);
        assert_eq!(u8::from(ModuleType::Wallet), 7);
        for code in 1..=7u8 {
            assert_eq!(u8::from(ModuleType::try_from(code).unwrap()), code);
        }
        assert!(ModuleType::try_from(0).is_err());
        assert!(ModuleType::try_from(8).is_err());
    }

    #[test]
    fn test_restriction_type_codes() {
        assert_eq!(RestrictionType::try_from(0).unwrap(), RestrictionType::Fixed);
        assert_eq!(RestrictionType::try_from(1).unwrap(), RestrictionType::Percentage);
        assert!(RestrictionType::try_from(2).is_err());
    }

    #[test]
    fn test_permission_bytes32() {
        assert_eq!(bytes32_to_string(Permission::Admin.to_bytes32()).unwrap(), "ADMIN");
        assert_eq!(
            bytes32_to_string(Permission::Operator.to_bytes32()).unwrap(),
            "OPERATOR"
        );
    }

    #[test]
    fn test_fee_type_bytes32() {
        assert_eq!(
            bytes32_to_string(FeeType::SecurityTokenLaunch.to_bytes32()).unwrap(),
            "stLaunchFee"
        );
    }
}
