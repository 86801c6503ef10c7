//! Registry of the module factories security tokens may attach.

use alloy::primitives::Address;
use alloy::providers::DynProvider;
use async_trait::async_trait;
use futures::future::try_join_all;
use serde::Serialize;

use crate::abi::ModuleRegistry;
use crate::assert;
use crate::contract::{ContractWrapper, OwnableContract, PausableContract};
use crate::events::{EventSchema, IndexedKind};
use crate::module_factory::{MODULE_FACTORY_EVENTS, ModuleFactoryWrapper};
use crate::tx::{PendingTx, TxParams};
use crate::types::ModuleType;
use crate::utils::bytes32_to_strings;
use crate::{Result, ensure};

const MODULE_FACTORY: (&str, IndexedKind) = ("_moduleFactory", IndexedKind::Address);

pub const MODULE_REGISTRY_EVENTS: &[EventSchema] = &[
    EventSchema::of::<ModuleRegistry::Pause>(&[]),
    EventSchema::of::<ModuleRegistry::Unpause>(&[]),
    EventSchema::of::<ModuleRegistry::ModuleUsed>(&[
        MODULE_FACTORY,
        ("_securityToken", IndexedKind::Address),
    ]),
    EventSchema::of::<ModuleRegistry::ModuleRegistered>(&[
        MODULE_FACTORY,
        ("_owner", IndexedKind::Address),
    ]),
    EventSchema::of::<ModuleRegistry::ModuleVerified>(&[MODULE_FACTORY]),
    EventSchema::of::<ModuleRegistry::ModuleUnverified>(&[MODULE_FACTORY]),
    EventSchema::of::<ModuleRegistry::ModuleRemoved>(&[
        MODULE_FACTORY,
        ("_decisionMaker", IndexedKind::Address),
    ]),
    EventSchema::of::<ModuleRegistry::OwnershipTransferred>(&[
        ("previousOwner", IndexedKind::Address),
        ("newOwner", IndexedKind::Address),
    ]),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FactoryDetails {
    pub is_verified: bool,
    pub owner: Address,
    /// Security tokens that attached a module from this factory.
    pub using_tokens: Vec<Address>,
}

/// Tags of the factories available for a module type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleTags {
    pub tags: Vec<String>,
    pub factories: Vec<Address>,
}

#[derive(Clone)]
pub struct ModuleRegistryWrapper {
    contract: ContractWrapper,
    registry: ModuleRegistry::ModuleRegistryInstance<DynProvider>,
}

impl ModuleRegistryWrapper {
    pub(crate) fn new(contract: ContractWrapper) -> Self {
        let registry = ModuleRegistry::new(contract.address(), contract.provider().clone());
        Self { contract, registry }
    }

    pub fn address(&self) -> Address {
        self.contract.address()
    }

    fn factory(&self, address: Address) -> ModuleFactoryWrapper {
        ModuleFactoryWrapper::new(self.contract.at(address, MODULE_FACTORY_EVENTS))
    }

    /// Verified factories of `module_type`.
    pub async fn modules_by_type(&self, module_type: ModuleType) -> Result<Vec<Address>> {
        Ok(self
            .registry
            .getModulesByType(module_type.into())
            .call()
            .await?)
    }

    /// Every registered factory of `module_type`, verified or not.
    pub async fn all_modules_by_type(&self, module_type: ModuleType) -> Result<Vec<Address>> {
        Ok(self
            .registry
            .getAllModulesByType(module_type.into())
            .call()
            .await?)
    }

    /// Factories of `module_type` usable by `security_token`.
    pub async fn modules_by_type_and_token(
        &self,
        module_type: ModuleType,
        security_token: Address,
    ) -> Result<Vec<Address>> {
        Ok(self
            .registry
            .getModulesByTypeAndToken(module_type.into(), security_token)
            .call()
            .await?)
    }

    pub async fn factory_details(&self, factory: Address) -> Result<FactoryDetails> {
        let details = self.registry.getFactoryDetails(factory).call().await?;
        Ok(FactoryDetails {
            is_verified: details.isVerified,
            owner: details.factoryOwner,
            using_tokens: details.usingTokens,
        })
    }

    pub async fn tags_by_type(&self, module_type: ModuleType) -> Result<ModuleTags> {
        let tags = self.registry.getTagsByType(module_type.into()).call().await?;
        Ok(ModuleTags {
            tags: bytes32_to_strings(tags.tags)?,
            factories: tags.factories,
        })
    }

    pub async fn tags_by_type_and_token(
        &self,
        module_type: ModuleType,
        security_token: Address,
    ) -> Result<ModuleTags> {
        let tags = self
            .registry
            .getTagsByTypeAndToken(module_type.into(), security_token)
            .call()
            .await?;
        Ok(ModuleTags {
            tags: bytes32_to_strings(tags.tags)?,
            factories: tags.factories,
        })
    }

    pub async fn is_compatible_module(&self, factory: Address, security_token: Address) -> Result<bool> {
        Ok(self
            .registry
            .isCompatibleModule(factory, security_token)
            .call()
            .await?)
    }

    /// Whether `factory` is registered for any of the module types it declares.
    pub async fn is_registered(&self, factory: Address) -> Result<bool> {
        let types = self.factory(factory).types().await?;
        let registered = try_join_all(types.into_iter().map(|t| self.all_modules_by_type(t))).await?;
        Ok(registered.iter().any(|factories| factories.contains(&factory)))
    }

    /// Registry owner or owner of the factory.
    async fn check_registry_or_factory_owner(&self, caller: Address, factory: Address) -> Result<()> {
        if self.is_owner(caller).await? {
            return Ok(());
        }
        ensure!(
            self.factory(factory).is_owner(caller).await?,
            Unauthorized,
            "{caller} owns neither the registry nor factory {factory}"
        );
        Ok(())
    }

    async fn check_registered(&self, factory: Address) -> Result<()> {
        ensure!(
            self.is_registered(factory).await?,
            NotFound,
            "Module factory {factory} is not registered"
        );
        Ok(())
    }

    pub async fn register_module(&self, factory: Address, tx: &TxParams) -> Result<PendingTx> {
        let from = self.contract.get_caller_address(tx).await?;
        self.check_not_paused().await?;
        assert::is_non_zero_address("module factory", factory)?;
        self.check_registry_or_factory_owner(from, factory).await?;
        ensure!(
            !self.is_registered(factory).await?,
            AlreadyExists,
            "Module factory {factory} is already registered"
        );
        self.contract
            .send(self.registry.registerModule(factory), from, tx)
            .await
    }

    pub async fn remove_module(&self, factory: Address, tx: &TxParams) -> Result<PendingTx> {
        let from = self.contract.get_caller_address(tx).await?;
        assert::is_non_zero_address("module factory", factory)?;
        self.check_registered(factory).await?;
        self.check_registry_or_factory_owner(from, factory).await?;
        self.contract
            .send(self.registry.removeModule(factory), from, tx)
            .await
    }

    pub async fn verify_module(&self, factory: Address, tx: &TxParams) -> Result<PendingTx> {
        let from = self.contract.get_caller_address(tx).await?;
        self.check_only_owner(from).await?;
        self.check_registered(factory).await?;
        self.contract
            .send(self.registry.verifyModule(factory), from, tx)
            .await
    }

    pub async fn unverify_module(&self, factory: Address, tx: &TxParams) -> Result<PendingTx> {
        let from = self.contract.get_caller_address(tx).await?;
        self.check_only_owner(from).await?;
        self.check_registered(factory).await?;
        self.contract
            .send(self.registry.unverifyModule(factory), from, tx)
            .await
    }

    /// Sends the registry's whole balance of `token` to the owner.
    pub async fn reclaim_erc20(&self, token: Address, tx: &TxParams) -> Result<PendingTx> {
        let from = self.contract.get_caller_address(tx).await?;
        self.check_only_owner(from).await?;
        assert::is_non_zero_address("token contract", token)?;
        self.contract
            .send(self.registry.reclaimERC20(token), from, tx)
            .await
    }
}

#[async_trait]
impl OwnableContract for ModuleRegistryWrapper {
    fn contract(&self) -> &ContractWrapper {
        &self.contract
    }

    async fn owner(&self) -> Result<Address> {
        Ok(self.registry.owner().call().await?)
    }

    async fn transfer_ownership(&self, new_owner: Address, tx: &TxParams) -> Result<PendingTx> {
        let from = self.contract.get_caller_address(tx).await?;
        self.check_only_owner(from).await?;
        assert::is_non_zero_address("new owner", new_owner)?;
        self.contract
            .send(self.registry.transferOwnership(new_owner), from, tx)
            .await
    }
}

#[async_trait]
impl PausableContract for ModuleRegistryWrapper {
    async fn paused(&self) -> Result<bool> {
        Ok(self.registry.isPaused().call().await?)
    }

    async fn pause(&self, tx: &TxParams) -> Result<PendingTx> {
        let from = self.contract.get_caller_address(tx).await?;
        self.check_only_owner(from).await?;
        ensure!(!self.paused().await?, PreconditionRequired, "Registry is already paused");
        self.contract.send(self.registry.pause(), from, tx).await
    }

    async fn unpause(&self, tx: &TxParams) -> Result<PendingTx> {
        let from = self.contract.get_caller_address(tx).await?;
        self.check_only_owner(from).await?;
        ensure!(self.paused().await?, PreconditionRequired, "Registry is not paused");
        self.contract.send(self.registry.unpause(), from, tx).await
    }
}
