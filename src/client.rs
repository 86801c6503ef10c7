use std::sync::Arc;

use alloy::primitives::Address;
use alloy::providers::{DynProvider, Provider, ProviderBuilder, WsConnect};
use alloy::signers::local::PrivateKeySigner;
use alloy::transports::http::reqwest::Url;
use bon::bon;

use crate::Result;
use crate::capped_sto::{CAPPED_STO_EVENTS, CappedStoWrapper};
use crate::contract::ContractWrapper;
use crate::events::EventSchema;
use crate::general_transfer_manager::{GENERAL_TRANSFER_MANAGER_EVENTS, GeneralTransferManagerWrapper};
use crate::module::{MODULE_EVENTS, ModuleWrapper};
use crate::module_factory::{MODULE_FACTORY_EVENTS, ModuleFactoryWrapper};
use crate::module_registry::{MODULE_REGISTRY_EVENTS, ModuleRegistryWrapper};
use crate::security_token_registry::{
    SECURITY_TOKEN_REGISTRY_EVENTS, SecurityTokenRegistryWrapper,
};
use crate::usd_tiered_sto::{USD_TIERED_STO_EVENTS, UsdTieredSto};
use crate::version::ContractVersion;
use crate::vesting_escrow_wallet::{VESTING_ESCROW_WALLET_EVENTS, VestingEscrowWalletWrapper};
use crate::volume_restriction_tm::{VOLUME_RESTRICTION_TM_EVENTS, VolumeRestrictionTmWrapper};

/// Defaults applied to every transaction sent through a client.
#[derive(Debug, Clone)]
pub struct TransactionConfig {
    /// Multiplier applied to the node's gas estimate when no gas is given.
    pub gas_safety_factor: f64,
}

impl Default for TransactionConfig {
    fn default() -> Self {
        Self {
            gas_safety_factor: 1.2,
        }
    }
}

/// Entry point handing out typed wrappers for deployed contracts.
///
/// All wrappers built by one client share its provider, default sender and
/// transaction config.
#[derive(Clone)]
pub struct PolymathClient {
    provider: DynProvider,
    default_from: Option<Address>,
    tx_config: Arc<TransactionConfig>,
}

#[bon]
impl PolymathClient {
    /// Connects over HTTP. With a `wallet`, transactions are signed locally
    /// and sent from the wallet address unless `TxParams::from` says otherwise.
    #[builder]
    pub fn new(
        rpc_url: Url,
        wallet: Option<PrivateKeySigner>,
        tx_config: Option<TransactionConfig>,
    ) -> Self {
        let default_from = wallet.as_ref().map(PrivateKeySigner::address);
        let provider = match wallet {
            Some(signer) => ProviderBuilder::new()
                .wallet(signer)
                .connect_http(rpc_url)
                .erased(),
            None => ProviderBuilder::new().connect_http(rpc_url).erased(),
        };
        Self::from_provider(provider, default_from, tx_config.unwrap_or_default())
    }
}

impl PolymathClient {
    /// Wraps an existing provider, e.g. one over a custom transport.
    pub fn from_provider(
        provider: DynProvider,
        default_from: Option<Address>,
        tx_config: TransactionConfig,
    ) -> Self {
        Self {
            provider,
            default_from,
            tx_config: Arc::new(tx_config),
        }
    }

    /// Connects over a websocket, which log subscriptions require.
    pub async fn connect_ws(ws_url: Url, wallet: Option<PrivateKeySigner>) -> anyhow::Result<Self> {
        let default_from = wallet.as_ref().map(PrivateKeySigner::address);
        let ws = WsConnect::new(ws_url.clone());
        let provider = match wallet {
            Some(signer) => ProviderBuilder::new()
                .wallet(signer)
                .connect_ws(ws)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to connect to {ws_url}: {e}"))?
                .erased(),
            None => ProviderBuilder::new()
                .connect_ws(ws)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to connect to {ws_url}: {e}"))?
                .erased(),
        };
        log::info!("Connected to {ws_url}");
        Ok(Self::from_provider(
            provider,
            default_from,
            TransactionConfig::default(),
        ))
    }

    pub fn provider(&self) -> &DynProvider {
        &self.provider
    }

    /// Sender used when `TxParams::from` is unset.
    pub fn default_from(&self) -> Option<Address> {
        self.default_from
    }

    pub fn tx_config(&self) -> &TransactionConfig {
        &self.tx_config
    }

    /// Accounts managed by the node.
    pub async fn get_accounts(&self) -> Result<Vec<Address>> {
        Ok(self.provider.get_accounts().await?)
    }

    fn contract(&self, address: Address, events: &'static [EventSchema]) -> ContractWrapper {
        ContractWrapper::new(
            self.provider.clone(),
            address,
            self.default_from,
            self.tx_config.clone(),
            events,
        )
    }

    /// Any attached module, for the calls all modules share.
    pub fn module(&self, address: Address) -> ModuleWrapper {
        ModuleWrapper::new(self.contract(address, MODULE_EVENTS))
    }

    pub fn module_factory(&self, address: Address) -> ModuleFactoryWrapper {
        ModuleFactoryWrapper::new(self.contract(address, MODULE_FACTORY_EVENTS))
    }

    pub fn capped_sto(&self, address: Address) -> CappedStoWrapper {
        CappedStoWrapper::new(self.contract(address, CAPPED_STO_EVENTS))
    }

    /// Builds the tiered offering wrapper matching the version of the
    /// factory that deployed it.
    ///
    /// Fails with `InvalidVersion` when that version has no wrapper.
    pub async fn usd_tiered_sto(&self, address: Address) -> Result<UsdTieredSto> {
        let factory = self.module(address).factory().await?;
        let version = self.module_factory(factory).contract_version().await?;
        log::debug!("Tiered offering {address} has version {version}");
        Ok(self.usd_tiered_sto_with_version(address, version))
    }

    /// Same as [`Self::usd_tiered_sto`] when the version is already known.
    pub fn usd_tiered_sto_with_version(
        &self,
        address: Address,
        version: ContractVersion,
    ) -> UsdTieredSto {
        UsdTieredSto::new(self.contract(address, USD_TIERED_STO_EVENTS), version)
    }

    pub fn general_transfer_manager(&self, address: Address) -> GeneralTransferManagerWrapper {
        GeneralTransferManagerWrapper::new(self.contract(address, GENERAL_TRANSFER_MANAGER_EVENTS))
    }

    pub fn volume_restriction_tm(&self, address: Address) -> VolumeRestrictionTmWrapper {
        VolumeRestrictionTmWrapper::new(self.contract(address, VOLUME_RESTRICTION_TM_EVENTS))
    }

    pub fn vesting_escrow_wallet(&self, address: Address) -> VestingEscrowWalletWrapper {
        VestingEscrowWalletWrapper::new(self.contract(address, VESTING_ESCROW_WALLET_EVENTS))
    }

    pub fn module_registry(&self, address: Address) -> ModuleRegistryWrapper {
        ModuleRegistryWrapper::new(self.contract(address, MODULE_REGISTRY_EVENTS))
    }

    pub fn security_token_registry(&self, address: Address) -> SecurityTokenRegistryWrapper {
        SecurityTokenRegistryWrapper::new(self.contract(address, SECURITY_TOKEN_REGISTRY_EVENTS))
    }
}
