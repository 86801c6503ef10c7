//! Calls shared by every security token offering.

use alloy::primitives::Address;
use alloy::providers::DynProvider;
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};

use crate::abi::ISTO;
use crate::module::ModuleWrapper;
use crate::types::FundRaiseType;
use crate::utils::{timestamp_to_date, to_u64, wei_to_eth, wei_to_value};
use crate::{Result, ensure};

#[derive(Clone)]
pub struct StoWrapper {
    module: ModuleWrapper,
    sto: ISTO::ISTOInstance<DynProvider>,
}

impl StoWrapper {
    pub(crate) fn new(module: ModuleWrapper) -> Self {
        let sto = ISTO::new(module.address(), module.contract().provider().clone());
        Self { module, sto }
    }

    pub fn module(&self) -> &ModuleWrapper {
        &self.module
    }

    pub async fn start_time(&self) -> Result<DateTime<Utc>> {
        timestamp_to_date(self.sto.startTime().call().await?)
    }

    pub async fn end_time(&self) -> Result<DateTime<Utc>> {
        timestamp_to_date(self.sto.endTime().call().await?)
    }

    /// Wallet receiving the raised funds.
    pub async fn wallet(&self) -> Result<Address> {
        Ok(self.sto.wallet().call().await?)
    }

    pub async fn investor_count(&self) -> Result<u64> {
        to_u64(self.sto.investorCount().call().await?, "investor count")
    }

    /// Tokens sold so far, in security token units.
    pub async fn tokens_sold(&self) -> Result<BigDecimal> {
        let sold = self.sto.getTokensSold().call().await?;
        let decimals = self.module.security_token_decimals().await?;
        Ok(wei_to_value(sold, decimals))
    }

    /// Funds raised in the given currency.
    pub async fn raised(&self, fund_raise_type: FundRaiseType) -> Result<BigDecimal> {
        let raised = self.sto.getRaised(fund_raise_type.into()).call().await?;
        Ok(wei_to_eth(raised))
    }

    pub async fn is_fund_raise_type(&self, fund_raise_type: FundRaiseType) -> Result<bool> {
        Ok(self
            .sto
            .fundRaiseTypes(fund_raise_type.into())
            .call()
            .await?)
    }

    pub async fn allow_beneficial_investments(&self) -> Result<bool> {
        Ok(self.sto.allowBeneficialInvestments().call().await?)
    }

    /// Fails unless purchases are possible right now.
    ///
    /// Paused is `ContractPaused`, before the start `TooEarly` and after the
    /// end `PreconditionRequired`.
    pub async fn check_open(&self) -> Result<()> {
        self.module.check_not_paused().await?;
        let now = Utc::now();
        let start = self.start_time().await?;
        ensure!(now >= start, TooEarly, "The offering starts at {start}");
        let end = self.end_time().await?;
        ensure!(now < end, PreconditionRequired, "The offering ended at {end}");
        Ok(())
    }

    pub async fn check_fund_raise_type(&self, fund_raise_type: FundRaiseType) -> Result<()> {
        ensure!(
            self.is_fund_raise_type(fund_raise_type).await?,
            InvalidData,
            "The offering does not accept {fund_raise_type:?}"
        );
        Ok(())
    }

    /// Buying for someone else requires beneficial investments to be enabled.
    pub async fn check_beneficiary(&self, caller: Address, beneficiary: Address) -> Result<()> {
        if caller != beneficiary {
            ensure!(
                self.allow_beneficial_investments().await?,
                InvalidData,
                "Beneficiary {beneficiary} must be the caller {caller} unless beneficial investments are allowed"
            );
        }
        Ok(())
    }

    /// Fails with `PreconditionRequired` once the offering has started.
    pub async fn check_not_started(&self) -> Result<()> {
        let start = self.start_time().await?;
        ensure!(
            Utc::now() < start,
            PreconditionRequired,
            "The offering already started at {start}"
        );
        Ok(())
    }
}
