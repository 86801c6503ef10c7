//! # Polymath contract wrappers
//!
//! Typed Rust wrappers for the Polymath security token contracts: module
//! factories, security token offerings, transfer managers, the vesting escrow
//! wallet and the module and security token registries.
//!
//! Read calls return host types (`BigDecimal` amounts, `DateTime<Utc>` dates,
//! strings for `bytes32`). State-changing calls run the same authorization and
//! business checks the contract would, and fail with a tagged [`Error`] before
//! anything is sent when a call is known to revert. Calls that pass are sent
//! with a gas limit of the node's estimate times a safety factor and return
//! the pending transaction.
//!
//! ```no_run
//! # async fn run() -> anyhow::Result<()> {
//! use polymath_contract_wrappers::{Address, PolymathClient, Url};
//!
//! let client = PolymathClient::builder()
//!     .rpc_url(Url::parse("http://localhost:8545")?)
//!     .build();
//! let factory = client.module_factory(Address::ZERO);
//! println!("{} {}", factory.name().await?, factory.version().await?);
//! # Ok(())
//! # }
//! ```
//!
//! # Versions
//!
//! The tiered offering exists in versions 3.0.0 and 3.1.0.
//! [`PolymathClient::usd_tiered_sto`] reads the version from the module's
//! factory and returns a [`UsdTieredSto`] whose 3.1.0-only calls are reachable
//! through [`UsdTieredSto::as_v3_1_0`].

/// Re-export commonly used types from `alloy`.
pub use alloy::primitives::{Address, B256, U256};
pub use alloy::signers::local::PrivateKeySigner;
pub use alloy::transports::http::reqwest::Url;
pub use bigdecimal::BigDecimal;

pub use client::{PolymathClient, TransactionConfig};
pub use contract::{OwnableContract, PausableContract};
pub use error::{Error, ErrorCode, Result};
pub use module::PermissionedModule;
pub use tx::{PendingTx, TxParams};
pub use types::{
    BoundType, FeeType, FlagsType, FundRaiseType, ModuleType, Permission, RestrictionType,
    ScheduleState, TransferType,
};
pub use usd_tiered_sto::UsdTieredSto;
pub use version::{ContractVersion, Version};

/// Solidity bindings of the wrapped contracts.
pub mod abi;

/// Pre-flight assertions shared by the wrappers.
pub mod assert;

/// Client handing out contract wrappers.
pub mod client;

/// Base wrapper and capability traits.
pub mod contract;

pub mod error;

/// Event schemas, log queries and subscriptions.
pub mod events;

pub mod module;
pub mod module_factory;

pub mod sto;
pub mod capped_sto;
pub mod usd_tiered_sto;

pub mod general_transfer_manager;
pub mod volume_restriction_tm;

pub mod vesting_escrow_wallet;

pub mod module_registry;
pub mod security_token_registry;

/// Transaction parameters and sending.
pub mod tx;

/// Domain enums and their on-chain codes.
pub mod types;

/// Unit, string and date conversions.
pub mod utils;

pub mod version;
