use alloy::primitives::Address;
use alloy::providers::DynProvider;
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::abi::{CappedSTO, IModule, ISTO};
use crate::assert;
use crate::contract::ContractWrapper;
use crate::events::{EventSchema, IndexedKind};
use crate::module::{ModuleWrapper, impl_module};
use crate::sto::StoWrapper;
use crate::tx::{PendingTx, TxParams};
use crate::types::{FundRaiseType, Permission};
use crate::utils::{eth_to_wei, timestamp_to_date, to_u64, wei_to_eth, wei_to_value};
use crate::{Result, ensure};

pub const CAPPED_STO_EVENTS: &[EventSchema] = &[
    EventSchema::of::<CappedSTO::TokenPurchase>(&[
        ("purchaser", IndexedKind::Address),
        ("beneficiary", IndexedKind::Address),
    ]),
    EventSchema::of::<CappedSTO::SetAllowBeneficialInvestments>(&[]),
    EventSchema::of::<ISTO::SetFundRaiseTypes>(&[]),
    EventSchema::of::<IModule::Pause>(&[]),
    EventSchema::of::<IModule::Unpause>(&[]),
];

/// Snapshot of a capped offering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CappedStoDetails {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Maximum number of tokens sold.
    pub cap: BigDecimal,
    /// Tokens per unit of the raise currency.
    pub rate: BigDecimal,
    pub funds_raised: BigDecimal,
    pub investor_count: u64,
    pub total_tokens_sold: BigDecimal,
    pub is_raised_in_poly: bool,
}

/// Offering selling a fixed number of tokens at a fixed rate.
#[derive(Clone)]
pub struct CappedStoWrapper {
    module: ModuleWrapper,
    sto: StoWrapper,
    capped: CappedSTO::CappedSTOInstance<DynProvider>,
}

impl_module!(CappedStoWrapper);

impl CappedStoWrapper {
    pub(crate) fn new(contract: ContractWrapper) -> Self {
        let capped = CappedSTO::new(contract.address(), contract.provider().clone());
        let module = ModuleWrapper::new(contract);
        Self {
            sto: StoWrapper::new(module.clone()),
            module,
            capped,
        }
    }

    pub fn address(&self) -> Address {
        self.module.address()
    }

    /// Reads shared with the other offerings.
    pub fn sto(&self) -> &StoWrapper {
        &self.sto
    }

    pub async fn rate(&self) -> Result<BigDecimal> {
        Ok(wei_to_eth(self.capped.rate().call().await?))
    }

    pub async fn cap(&self) -> Result<BigDecimal> {
        let cap = self.capped.cap().call().await?;
        let decimals = self.module.security_token_decimals().await?;
        Ok(wei_to_value(cap, decimals))
    }

    pub async fn total_tokens_sold(&self) -> Result<BigDecimal> {
        let sold = self.capped.totalTokensSold().call().await?;
        let decimals = self.module.security_token_decimals().await?;
        Ok(wei_to_value(sold, decimals))
    }

    pub async fn details(&self) -> Result<CappedStoDetails> {
        let details = self.capped.getSTODetails().call().await?;
        let decimals = self.module.security_token_decimals().await?;
        Ok(CappedStoDetails {
            start_time: timestamp_to_date(details.startTime)?,
            end_time: timestamp_to_date(details.endTime)?,
            cap: wei_to_value(details.cap, decimals),
            rate: wei_to_eth(details.rate),
            funds_raised: wei_to_eth(details.fundsRaised),
            investor_count: to_u64(details.investorCount, "investor count")?,
            total_tokens_sold: wei_to_value(details.totalTokensSold, decimals),
            is_raised_in_poly: details.isRaisedInPoly,
        })
    }

    async fn check_cap_not_reached(&self) -> Result<()> {
        let sold = self.capped.totalTokensSold().call().await?;
        let cap = self.capped.cap().call().await?;
        ensure!(sold < cap, PreconditionRequired, "The offering cap is reached");
        Ok(())
    }

    async fn check_can_buy(
        &self,
        caller: Address,
        beneficiary: Address,
        fund_raise_type: FundRaiseType,
    ) -> Result<()> {
        self.sto.check_open().await?;
        self.sto.check_fund_raise_type(fund_raise_type).await?;
        self.sto.check_beneficiary(caller, beneficiary).await?;
        self.check_cap_not_reached().await
    }

    /// Buys tokens for `beneficiary`, paying `value` ETH.
    pub async fn buy_tokens(
        &self,
        beneficiary: Address,
        value: &BigDecimal,
        tx: &TxParams,
    ) -> Result<PendingTx> {
        let from = self.module.contract().get_caller_address(tx).await?;
        assert::is_non_zero_address("beneficiary", beneficiary)?;
        assert::is_positive("value", value)?;
        self.check_can_buy(from, beneficiary, FundRaiseType::Eth).await?;
        let value = eth_to_wei(value)?;
        self.module
            .contract()
            .send(self.capped.buyTokens(beneficiary).value(value), from, tx)
            .await
    }

    /// Buys tokens for the caller, paying `amount` POLY.
    pub async fn buy_tokens_with_poly(&self, amount: &BigDecimal, tx: &TxParams) -> Result<PendingTx> {
        let from = self.module.contract().get_caller_address(tx).await?;
        assert::is_positive("amount", amount)?;
        self.check_can_buy(from, from, FundRaiseType::Poly).await?;
        let amount = eth_to_wei(amount)?;
        self.module
            .contract()
            .send(self.capped.buyTokensWithPoly(amount), from, tx)
            .await
    }

    pub async fn change_allow_beneficial_investments(
        &self,
        allow: bool,
        tx: &TxParams,
    ) -> Result<PendingTx> {
        let from = self.module.contract().get_caller_address(tx).await?;
        self.module.check_permission(from, Permission::Operator).await?;
        ensure!(
            self.sto.allow_beneficial_investments().await? != allow,
            PreconditionRequired,
            "Beneficial investments are already {}",
            if allow { "allowed" } else { "disallowed" }
        );
        self.module
            .contract()
            .send(self.capped.changeAllowBeneficialInvestments(allow), from, tx)
            .await
    }
}
