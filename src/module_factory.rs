use alloy::primitives::Address;
use alloy::providers::DynProvider;
use async_trait::async_trait;
use bigdecimal::BigDecimal;

use crate::abi::ModuleFactory;
use crate::assert;
use crate::contract::{ContractWrapper, OwnableContract};
use crate::events::{EventSchema, IndexedKind};
use crate::tx::{PendingTx, TxParams};
use crate::types::{BoundType, ModuleType};
use crate::utils::{bytes32_to_string, bytes32_to_strings, eth_to_wei, string_to_bytes32, wei_to_eth};
use crate::version::{ContractVersion, Version};
use crate::{Result, ensure};

pub const MODULE_FACTORY_EVENTS: &[EventSchema] = &[
    EventSchema::of::<ModuleFactory::ChangeSetupCost>(&[]),
    EventSchema::of::<ModuleFactory::ChangeCostType>(&[]),
    EventSchema::of::<ModuleFactory::GenerateModuleFromFactory>(&[
        ("_moduleName", IndexedKind::Bytes32),
        ("_moduleFactory", IndexedKind::Address),
    ]),
    EventSchema::of::<ModuleFactory::ChangeSTVersionBound>(&[]),
    EventSchema::of::<ModuleFactory::OwnershipTransferred>(&[
        ("previousOwner", IndexedKind::Address),
        ("newOwner", IndexedKind::Address),
    ]),
];

/// Factory that deploys and describes one kind of module.
#[derive(Clone)]
pub struct ModuleFactoryWrapper {
    contract: ContractWrapper,
    factory: ModuleFactory::ModuleFactoryInstance<DynProvider>,
}

impl ModuleFactoryWrapper {
    pub(crate) fn new(contract: ContractWrapper) -> Self {
        let factory = ModuleFactory::new(contract.address(), contract.provider().clone());
        Self { contract, factory }
    }

    pub fn address(&self) -> Address {
        self.contract.address()
    }

    pub async fn name(&self) -> Result<String> {
        bytes32_to_string(self.factory.name().call().await?)
    }

    pub async fn title(&self) -> Result<String> {
        Ok(self.factory.title().call().await?)
    }

    pub async fn description(&self) -> Result<String> {
        Ok(self.factory.description().call().await?)
    }

    /// Version string of the modules this factory deploys, e.g. `3.1.0`.
    pub async fn version(&self) -> Result<String> {
        log::debug!("version of factory {}", self.address());
        Ok(self.factory.version().call().await?)
    }

    /// Fails with `InvalidVersion` for versions without a wrapper.
    pub async fn contract_version(&self) -> Result<ContractVersion> {
        self.version().await?.parse()
    }

    pub async fn types(&self) -> Result<Vec<ModuleType>> {
        let types = self.factory.getTypes().call().await?;
        types.into_iter().map(ModuleType::try_from).collect()
    }

    pub async fn tags(&self) -> Result<Vec<String>> {
        bytes32_to_strings(self.factory.getTags().call().await?)
    }

    /// Setup cost in USD.
    pub async fn setup_cost(&self) -> Result<BigDecimal> {
        Ok(wei_to_eth(self.factory.setupCost().call().await?))
    }

    /// Setup cost converted to POLY at the current oracle rate.
    pub async fn setup_cost_in_poly(&self) -> Result<BigDecimal> {
        Ok(wei_to_eth(self.factory.setupCostInPoly().call().await?))
    }

    pub async fn is_cost_in_poly(&self) -> Result<bool> {
        Ok(self.factory.isCostInPoly().call().await?)
    }

    pub async fn polymath_registry(&self) -> Result<Address> {
        Ok(self.factory.polymathRegistry().call().await?)
    }

    pub async fn lower_st_version_bounds(&self) -> Result<Version> {
        Version::from_parts(&self.factory.getLowerSTVersionBounds().call().await?)
    }

    pub async fn upper_st_version_bounds(&self) -> Result<Version> {
        Version::from_parts(&self.factory.getUpperSTVersionBounds().call().await?)
    }

    pub async fn change_setup_cost(&self, setup_cost: &BigDecimal, tx: &TxParams) -> Result<PendingTx> {
        let from = self.contract.get_caller_address(tx).await?;
        self.check_only_owner(from).await?;
        let cost = eth_to_wei(setup_cost)?;
        self.contract
            .send(self.factory.changeSetupCost(cost), from, tx)
            .await
    }

    pub async fn change_cost_and_type(
        &self,
        setup_cost: &BigDecimal,
        is_cost_in_poly: bool,
        tx: &TxParams,
    ) -> Result<PendingTx> {
        let from = self.contract.get_caller_address(tx).await?;
        self.check_only_owner(from).await?;
        let cost = eth_to_wei(setup_cost)?;
        self.contract
            .send(self.factory.changeCostAndType(cost, is_cost_in_poly), from, tx)
            .await
    }

    pub async fn change_title(&self, title: &str, tx: &TxParams) -> Result<PendingTx> {
        let from = self.contract.get_caller_address(tx).await?;
        self.check_only_owner(from).await?;
        assert::is_non_empty_string("title", title)?;
        self.contract
            .send(self.factory.changeTitle(title.to_string()), from, tx)
            .await
    }

    pub async fn change_description(&self, description: &str, tx: &TxParams) -> Result<PendingTx> {
        let from = self.contract.get_caller_address(tx).await?;
        self.check_only_owner(from).await?;
        assert::is_non_empty_string("description", description)?;
        self.contract
            .send(self.factory.changeDescription(description.to_string()), from, tx)
            .await
    }

    pub async fn change_name(&self, name: &str, tx: &TxParams) -> Result<PendingTx> {
        let from = self.contract.get_caller_address(tx).await?;
        self.check_only_owner(from).await?;
        assert::is_non_empty_string("name", name)?;
        let name = string_to_bytes32(name)?;
        self.contract
            .send(self.factory.changeName(name), from, tx)
            .await
    }

    pub async fn change_tags(&self, tags: &[String], tx: &TxParams) -> Result<PendingTx> {
        let from = self.contract.get_caller_address(tx).await?;
        self.check_only_owner(from).await?;
        assert::is_non_empty_list("tags", tags)?;
        let tags = tags
            .iter()
            .map(|tag| {
                assert::is_bytes32_string("tag", tag)?;
                string_to_bytes32(tag)
            })
            .collect::<Result<Vec<_>>>()?;
        self.contract
            .send(self.factory.changeTags(tags), from, tx)
            .await
    }

    /// Widens the range of security token versions the modules attach to.
    ///
    /// A new lower bound must not exceed the current one and a new upper bound
    /// must not be below the current one, otherwise `InvalidBound`.
    pub async fn change_st_version_bounds(
        &self,
        bound_type: BoundType,
        new_version: Version,
        tx: &TxParams,
    ) -> Result<PendingTx> {
        let from = self.contract.get_caller_address(tx).await?;
        self.check_only_owner(from).await?;
        match bound_type {
            BoundType::LowerBound => {
                let current = self.lower_st_version_bounds().await?;
                ensure!(
                    new_version <= current,
                    InvalidBound,
                    "New lower bound {new_version} must be less than or equal to {current}"
                );
            }
            BoundType::UpperBound => {
                let current = self.upper_st_version_bounds().await?;
                ensure!(
                    new_version >= current,
                    InvalidBound,
                    "New upper bound {new_version} must be greater than or equal to {current}"
                );
            }
        }
        self.contract
            .send(
                self.factory
                    .changeSTVersionBounds(bound_type.as_str().to_string(), new_version.to_parts()),
                from,
                tx,
            )
            .await
    }
}

#[async_trait]
impl OwnableContract for ModuleFactoryWrapper {
    fn contract(&self) -> &ContractWrapper {
        &self.contract
    }

    async fn owner(&self) -> Result<Address> {
        Ok(self.factory.owner().call().await?)
    }

    async fn transfer_ownership(&self, new_owner: Address, tx: &TxParams) -> Result<PendingTx> {
        let from = self.contract.get_caller_address(tx).await?;
        self.check_only_owner(from).await?;
        assert::is_non_zero_address("new owner", new_owner)?;
        self.contract
            .send(self.factory.transferOwnership(new_owner), from, tx)
            .await
    }
}
