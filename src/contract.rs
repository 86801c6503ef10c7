//! Behaviour shared by every contract wrapper.

use std::sync::Arc;

use alloy::contract::SolCallBuilder;
use alloy::primitives::{Address, B256};
use alloy::providers::{DynProvider, Provider};
use alloy_sol_types::{SolCall, SolEventInterface};
use async_trait::async_trait;

use crate::client::TransactionConfig;
use crate::events::{self, BlockRange, DecodedLog, EventSchema, IndexFilter, LogSubscription};
use crate::tx::{self, PendingTx, TxParams};
use crate::{Error, Result, ensure};

/// Address, provider and sender defaults of a deployed contract.
#[derive(Clone)]
pub struct ContractWrapper {
    provider: DynProvider,
    address: Address,
    default_from: Option<Address>,
    tx_config: Arc<TransactionConfig>,
    events: &'static [EventSchema],
}

impl ContractWrapper {
    pub(crate) fn new(
        provider: DynProvider,
        address: Address,
        default_from: Option<Address>,
        tx_config: Arc<TransactionConfig>,
        events: &'static [EventSchema],
    ) -> Self {
        Self {
            provider,
            address,
            default_from,
            tx_config,
            events,
        }
    }

    /// Same provider and defaults, different contract.
    pub(crate) fn at(&self, address: Address, events: &'static [EventSchema]) -> Self {
        Self {
            address,
            events,
            ..self.clone()
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn provider(&self) -> &DynProvider {
        &self.provider
    }

    /// Names of the events this contract emits.
    pub fn event_names(&self) -> Vec<&'static str> {
        self.events.iter().map(EventSchema::name).collect()
    }

    /// Resolves the sender of a transaction.
    ///
    /// Order: `tx.from`, the client wallet, the node's first account.
    pub async fn get_caller_address(&self, tx: &TxParams) -> Result<Address> {
        if let Some(from) = tx.from.or(self.default_from) {
            return Ok(from);
        }
        log::warn!("No sender configured, using the first account of the node");
        let accounts = self.provider.get_accounts().await?;
        accounts.first().copied().ok_or_else(|| {
            Error::PreconditionRequired("No account available to send the transaction".into())
        })
    }

    pub(crate) async fn send<C: SolCall>(
        &self,
        call: SolCallBuilder<&DynProvider, C>,
        from: Address,
        tx: &TxParams,
    ) -> Result<PendingTx> {
        log::debug!("Transaction to {} from {from}", self.address);
        tx::send(call, from, tx, self.tx_config.gas_safety_factor).await
    }

    /// Fetches and decodes past logs of the named event.
    pub async fn get_logs<E: SolEventInterface>(
        &self,
        event_name: &str,
        range: BlockRange,
        filter: &IndexFilter,
    ) -> Result<Vec<DecodedLog<E>>> {
        let schema = events::find_schema(self.events, event_name)?;
        let filter = schema.filter(self.address, range, filter)?;
        log::debug!("Fetching {event_name} logs of {}", self.address);
        events::get_logs(&self.provider, &filter).await
    }

    /// Subscribes to new logs of the named event. Requires a pub/sub transport.
    pub async fn subscribe<E>(
        &self,
        event_name: &str,
        filter: &IndexFilter,
    ) -> Result<LogSubscription<E>>
    where
        E: SolEventInterface + Send + 'static,
    {
        let schema = events::find_schema(self.events, event_name)?;
        let filter = schema.filter(self.address, BlockRange::from_latest(), filter)?;
        log::debug!("Subscribing to {event_name} logs of {}", self.address);
        events::subscribe(&self.provider, &filter).await
    }

    pub async fn unsubscribe(&self, id: B256) -> Result<()> {
        log::debug!("Unsubscribing {id}");
        Ok(self.provider.unsubscribe(id).await?)
    }
}

/// Contracts with a single owner.
#[async_trait]
pub trait OwnableContract: Sync {
    fn contract(&self) -> &ContractWrapper;

    async fn owner(&self) -> Result<Address>;

    async fn transfer_ownership(&self, new_owner: Address, tx: &TxParams) -> Result<PendingTx>;

    async fn is_owner(&self, caller: Address) -> Result<bool> {
        Ok(self.owner().await? == caller)
    }

    async fn is_caller_the_owner(&self, tx: &TxParams) -> Result<bool> {
        let caller = self.contract().get_caller_address(tx).await?;
        self.is_owner(caller).await
    }

    async fn check_only_owner(&self, caller: Address) -> Result<()> {
        ensure!(
            self.is_owner(caller).await?,
            Unauthorized,
            "{caller} is not the owner of {}",
            self.contract().address()
        );
        Ok(())
    }
}

/// Contracts that can be paused by their administrator.
#[async_trait]
pub trait PausableContract: Sync {
    async fn paused(&self) -> Result<bool>;

    /// Fails with `PreconditionRequired` when already paused.
    async fn pause(&self, tx: &TxParams) -> Result<PendingTx>;

    /// Fails with `PreconditionRequired` when not paused.
    async fn unpause(&self, tx: &TxParams) -> Result<PendingTx>;

    async fn check_not_paused(&self) -> Result<()> {
        ensure!(!self.paused().await?, ContractPaused, "Contract is paused");
        Ok(())
    }
}
