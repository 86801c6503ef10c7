use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result, ensure};

/// A `major.minor.patch` version as stored on-chain (`uint8[3]`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Version {
    pub major: u8,
    pub minor: u8,
    pub patch: u8,
}

impl Version {
    pub const fn new(major: u8, minor: u8, patch: u8) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Builds a version from the `uint8[]` a contract returns.
    pub fn from_parts(parts: &[u8]) -> Result<Self> {
        ensure!(
            parts.len() == 3,
            InvalidData,
            "Version must have 3 components, got {}",
            parts.len()
        );
        Ok(Self::new(parts[0], parts[1], parts[2]))
    }

    pub fn to_parts(self) -> Vec<u8> {
        vec![self.major, self.minor, self.patch]
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for Version {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let parts = s
            .trim()
            .split('.')
            .map(|part| {
                part.parse::<u8>()
                    .map_err(|e| Error::InvalidData(format!("Invalid version '{s}': {e}")))
            })
            .collect::<Result<Vec<_>>>()?;
        Self::from_parts(&parts)
    }
}

/// Deployed contract versions with distinct wrapper surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContractVersion {
    V3_0_0,
    V3_1_0,
}

impl ContractVersion {
    pub fn version(&self) -> Version {
        match self {
            ContractVersion::V3_0_0 => Version::new(3, 0, 0),
            ContractVersion::V3_1_0 => Version::new(3, 1, 0),
        }
    }
}

impl fmt::Display for ContractVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.version().fmt(f)
    }
}

impl TryFrom<Version> for ContractVersion {
    type Error = Error;

    fn try_from(version: Version) -> Result<Self> {
        match (version.major, version.minor, version.patch) {
            (3, 0, 0) => Ok(ContractVersion::V3_0_0),
            (3, 1, 0) => Ok(ContractVersion::V3_1_0),
            _ => Err(Error::InvalidVersion(format!(
                "Contract version {version} is not supported"
            ))),
        }
    }
}

impl FromStr for ContractVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let version = s
            .parse::<Version>()
            .map_err(|e| Error::InvalidVersion(e.to_string()))?;
        version.try_into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorCode;

    #[test]
    fn test_version_ordering() {
        let v300 = Version::new(3, 0, 0);
        assert!(Version::new(2, 9, 9) < v300);
        assert!(Version::new(3, 0, 1) > v300);
        assert!(Version::new(3, 1, 0) > Version::new(3, 0, 9));
        assert_eq!(Version::new(0, 0, 0).max(v300), v300);
    }

    #[test]
    fn test_version_parsing() {
        assert_eq!("3.1.0".parse::<Version>().unwrap(), Version::new(3, 1, 0));
        assert_eq!(Version::from_parts(&[2, 0, 1]).unwrap().to_string(), "2.0.1");
        assert!("3.1".parse::<Version>().is_err());
        assert!("3.x.0".parse::<Version>().is_err());
        assert!("3.256.0".parse::<Version>().is_err());
    }

    #[test]
    fn test_contract_version_parsing() {
        assert_eq!(
            "3.0.0".parse::<ContractVersion>().unwrap(),
            ContractVersion::V3_0_0
        );
        assert_eq!(
            "3.1.0".parse::<ContractVersion>().unwrap(),
            ContractVersion::V3_1_0
        );
        let err = "2.1.0".parse::<ContractVersion>().unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::InvalidVersion));
        let err = "garbage".parse::<ContractVersion>().unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::InvalidVersion));
    }
}
