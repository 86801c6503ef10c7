//! Security token modules.
//!
//! Every module is attached to one security token and checks callers against
//! that token's owner and permission manager.

use alloy::primitives::{Address, U256};
use alloy::providers::DynProvider;
use async_trait::async_trait;

use crate::abi::{IModule, ISecurityToken};
use crate::assert;
use crate::contract::ContractWrapper;
use crate::events::EventSchema;
use crate::tx::{PendingTx, TxParams};
use crate::types::Permission;
use crate::utils::bytes32_to_strings;
use crate::{Result, ensure};

pub(crate) type SecurityTokenInstance = ISecurityToken::ISecurityTokenInstance<DynProvider>;

pub const MODULE_EVENTS: &[EventSchema] = &[
    EventSchema::of::<IModule::Pause>(&[]),
    EventSchema::of::<IModule::Unpause>(&[]),
];

/// Calls common to every module.
#[derive(Clone)]
pub struct ModuleWrapper {
    contract: ContractWrapper,
    module: IModule::IModuleInstance<DynProvider>,
}

impl ModuleWrapper {
    pub(crate) fn new(contract: ContractWrapper) -> Self {
        let module = IModule::new(contract.address(), contract.provider().clone());
        Self { contract, module }
    }

    pub fn contract(&self) -> &ContractWrapper {
        &self.contract
    }

    pub fn address(&self) -> Address {
        self.contract.address()
    }

    pub async fn security_token(&self) -> Result<Address> {
        log::debug!("securityToken of {}", self.address());
        Ok(self.module.securityToken().call().await?)
    }

    pub async fn factory(&self) -> Result<Address> {
        log::debug!("factory of {}", self.address());
        Ok(self.module.factory().call().await?)
    }

    pub async fn paused(&self) -> Result<bool> {
        Ok(self.module.paused().call().await?)
    }

    /// Permission names the module checks.
    pub async fn permissions(&self) -> Result<Vec<String>> {
        let permissions = self.module.getPermissions().call().await?;
        bytes32_to_strings(permissions)
    }

    pub(crate) async fn security_token_instance(&self) -> Result<SecurityTokenInstance> {
        let token = self.security_token().await?;
        Ok(ISecurityToken::new(token, self.contract.provider().clone()))
    }

    pub async fn security_token_owner(&self) -> Result<Address> {
        let token = self.security_token_instance().await?;
        Ok(token.owner().call().await?)
    }

    /// Decimals of the attached security token.
    pub async fn security_token_decimals(&self) -> Result<u8> {
        let token = self.security_token_instance().await?;
        let decimals = token.decimals().call().await?;
        log::trace!("Security token {} has {decimals} decimals", token.address());
        Ok(decimals)
    }

    pub async fn security_token_granularity(&self) -> Result<U256> {
        let token = self.security_token_instance().await?;
        Ok(token.granularity().call().await?)
    }

    pub async fn is_security_token_owner(&self, caller: Address) -> Result<bool> {
        Ok(self.security_token_owner().await? == caller)
    }

    /// True for the token owner, otherwise asks the token's permission manager.
    pub async fn is_allowed(&self, caller: Address, permission: Permission) -> Result<bool> {
        let token = self.security_token_instance().await?;
        let owner = token.owner().call().await?;
        if owner == caller {
            return Ok(true);
        }
        log::debug!(
            "Checking {} permission of {caller} on {}",
            permission.as_str(),
            self.address()
        );
        Ok(token
            .checkPermission(caller, self.address(), permission.to_bytes32())
            .call()
            .await?)
    }

    pub async fn is_caller_the_security_token_owner(&self, tx: &TxParams) -> Result<bool> {
        let caller = self.contract.get_caller_address(tx).await?;
        self.is_security_token_owner(caller).await
    }

    pub async fn is_caller_allowed(&self, tx: &TxParams, permission: Permission) -> Result<bool> {
        let caller = self.contract.get_caller_address(tx).await?;
        self.is_allowed(caller, permission).await
    }

    pub async fn check_security_token_owner(&self, caller: Address) -> Result<()> {
        ensure!(
            self.is_security_token_owner(caller).await?,
            Unauthorized,
            "{caller} is not the owner of the security token"
        );
        Ok(())
    }

    pub async fn check_permission(&self, caller: Address, permission: Permission) -> Result<()> {
        ensure!(
            self.is_allowed(caller, permission).await?,
            Unauthorized,
            "{caller} is not allowed, {} permission required",
            permission.as_str()
        );
        Ok(())
    }

    pub async fn check_not_paused(&self) -> Result<()> {
        ensure!(!self.paused().await?, ContractPaused, "Module {} is paused", self.address());
        Ok(())
    }

    pub async fn pause(&self, tx: &TxParams) -> Result<PendingTx> {
        let from = self.contract.get_caller_address(tx).await?;
        self.check_security_token_owner(from).await?;
        ensure!(!self.paused().await?, PreconditionRequired, "Module is already paused");
        self.contract.send(self.module.pause(), from, tx).await
    }

    pub async fn unpause(&self, tx: &TxParams) -> Result<PendingTx> {
        let from = self.contract.get_caller_address(tx).await?;
        self.check_security_token_owner(from).await?;
        ensure!(self.paused().await?, PreconditionRequired, "Module is not paused");
        self.contract.send(self.module.unpause(), from, tx).await
    }

    /// Sends the module's balance of an ERC20 token to the token owner.
    pub async fn reclaim_erc20(&self, token: Address, tx: &TxParams) -> Result<PendingTx> {
        let from = self.contract.get_caller_address(tx).await?;
        self.check_security_token_owner(from).await?;
        assert::is_non_zero_address("token", token)?;
        self.contract
            .send(self.module.reclaimERC20(token), from, tx)
            .await
    }
}

/// A module whose writes are gated by the attached token's permissions.
#[async_trait]
pub trait PermissionedModule: Sync {
    fn module(&self) -> &ModuleWrapper;

    async fn security_token(&self) -> Result<Address> {
        self.module().security_token().await
    }

    async fn factory(&self) -> Result<Address> {
        self.module().factory().await
    }

    async fn permissions(&self) -> Result<Vec<String>> {
        self.module().permissions().await
    }

    async fn is_caller_allowed(&self, tx: &TxParams, permission: Permission) -> Result<bool> {
        self.module().is_caller_allowed(tx, permission).await
    }

    async fn is_caller_the_security_token_owner(&self, tx: &TxParams) -> Result<bool> {
        self.module().is_caller_the_security_token_owner(tx).await
    }
}

/// Implements the module capability traits for a wrapper with a `module` field.
macro_rules! impl_module {
    ($wrapper:ty) => {
        impl $crate::module::PermissionedModule for $wrapper {
            fn module(&self) -> &$crate::module::ModuleWrapper {
                &self.module
            }
        }

        #[async_trait::async_trait]
        impl $crate::contract::PausableContract for $wrapper {
            async fn paused(&self) -> $crate::Result<bool> {
                self.module.paused().await
            }

            async fn pause(
                &self,
                tx: &$crate::tx::TxParams,
            ) -> $crate::Result<$crate::tx::PendingTx> {
                self.module.pause(tx).await
            }

            async fn unpause(
                &self,
                tx: &$crate::tx::TxParams,
            ) -> $crate::Result<$crate::tx::PendingTx> {
                self.module.unpause(tx).await
            }
        }
    };
}

pub(crate) use impl_module;

