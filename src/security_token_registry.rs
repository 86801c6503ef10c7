//! Ticker reservations and security token deployment.

use alloy::primitives::{Address, U256};
use alloy::providers::DynProvider;
use async_trait::async_trait;
use bigdecimal::BigDecimal;
use bon::Builder;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::abi::SecurityTokenRegistry;
use crate::assert;
use crate::contract::{ContractWrapper, OwnableContract, PausableContract};
use crate::events::{EventSchema, IndexedKind};
use crate::tx::{PendingTx, TxParams};
use crate::types::FeeType;
use crate::utils::{bytes32_to_strings, eth_to_wei, timestamp_to_date, to_u64, wei_to_eth};
use crate::version::Version;
use crate::{Result, ensure};

pub const SECURITY_TOKEN_REGISTRY_EVENTS: &[EventSchema] = &[
    EventSchema::of::<SecurityTokenRegistry::Pause>(&[]),
    EventSchema::of::<SecurityTokenRegistry::Unpause>(&[]),
    EventSchema::of::<SecurityTokenRegistry::ChangeExpiryLimit>(&[]),
    EventSchema::of::<SecurityTokenRegistry::ChangeTickerOwnership>(&[
        ("_oldOwner", IndexedKind::Address),
        ("_newOwner", IndexedKind::Address),
    ]),
    EventSchema::of::<SecurityTokenRegistry::RegisterTicker>(&[
        ("_owner", IndexedKind::Address),
        ("_registrationDate", IndexedKind::Uint),
        ("_expiryDate", IndexedKind::Uint),
    ]),
    EventSchema::of::<SecurityTokenRegistry::TickerRemoved>(&[]),
    EventSchema::of::<SecurityTokenRegistry::NewSecurityToken>(&[
        ("_securityTokenAddress", IndexedKind::Address),
        ("_owner", IndexedKind::Address),
    ]),
    EventSchema::of::<SecurityTokenRegistry::ChangeTickerRegistrationFee>(&[]),
    EventSchema::of::<SecurityTokenRegistry::ChangeSecurityTokenLaunchFee>(&[]),
    EventSchema::of::<SecurityTokenRegistry::OwnershipTransferred>(&[
        ("previousOwner", IndexedKind::Address),
        ("newOwner", IndexedKind::Address),
    ]),
];

/// Shortest ticker reservation the registry accepts, in seconds.
pub const MIN_EXPIRY_LIMIT: u64 = 86_400;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TickerDetails {
    pub owner: Address,
    pub registration_date: DateTime<Utc>,
    pub expiry_date: DateTime<Utc>,
    pub token_name: String,
    /// Whether a security token was deployed for the ticker.
    pub status: bool,
}

impl TickerDetails {
    /// Reserved tickers are unavailable until they expire without a token.
    pub fn is_available(&self, now: DateTime<Utc>) -> bool {
        self.owner.is_zero() || (!self.status && self.expiry_date < now)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecurityTokenData {
    pub ticker: String,
    pub owner: Address,
    pub details: String,
    pub deployed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Fees {
    pub usd: BigDecimal,
    pub poly: BigDecimal,
}

#[derive(Debug, Clone, Builder)]
pub struct NewSecurityTokenParams {
    #[builder(into)]
    pub name: String,
    #[builder(into)]
    pub ticker: String,
    #[builder(into, default)]
    pub details: String,
    #[builder(default = true)]
    pub divisible: bool,
    pub treasury_wallet: Address,
    /// Zero deploys the latest protocol version.
    #[builder(default)]
    pub protocol_version: u64,
}

#[derive(Clone)]
pub struct SecurityTokenRegistryWrapper {
    contract: ContractWrapper,
    registry: SecurityTokenRegistry::SecurityTokenRegistryInstance<DynProvider>,
}

impl SecurityTokenRegistryWrapper {
    pub(crate) fn new(contract: ContractWrapper) -> Self {
        let registry = SecurityTokenRegistry::new(contract.address(), contract.provider().clone());
        Self { contract, registry }
    }

    pub fn address(&self) -> Address {
        self.contract.address()
    }

    pub async fn ticker_details(&self, ticker: &str) -> Result<TickerDetails> {
        let ticker = ticker.to_uppercase();
        log::debug!("getTickerDetails({ticker}) on {}", self.address());
        let details = self.registry.getTickerDetails(ticker).call().await?;
        Ok(TickerDetails {
            owner: details.owner,
            registration_date: timestamp_to_date(details.registrationDate)?,
            expiry_date: timestamp_to_date(details.expiryDate)?,
            token_name: details.tokenName,
            status: details.status,
        })
    }

    /// Zero when no token was deployed for `ticker`.
    pub async fn security_token_address(&self, ticker: &str) -> Result<Address> {
        Ok(self
            .registry
            .getSecurityTokenAddress(ticker.to_uppercase())
            .call()
            .await?)
    }

    pub async fn security_token_data(&self, security_token: Address) -> Result<SecurityTokenData> {
        let data = self.registry.getSecurityTokenData(security_token).call().await?;
        Ok(SecurityTokenData {
            ticker: data.ticker,
            owner: data.owner,
            details: data.details,
            deployed_at: timestamp_to_date(data.deployedAt)?,
        })
    }

    pub async fn tickers_by_owner(&self, owner: Address) -> Result<Vec<String>> {
        bytes32_to_strings(self.registry.getTickersByOwner(owner).call().await?)
    }

    pub async fn tokens_by_owner(&self, owner: Address) -> Result<Vec<Address>> {
        Ok(self.registry.getTokensByOwner(owner).call().await?)
    }

    pub async fn tokens(&self) -> Result<Vec<Address>> {
        Ok(self.registry.getTokens().call().await?)
    }

    pub async fn is_security_token(&self, address: Address) -> Result<bool> {
        Ok(self.registry.isSecurityToken(address).call().await?)
    }

    /// Seconds a ticker stays reserved without a deployed token.
    pub async fn expiry_limit(&self) -> Result<u64> {
        to_u64(self.registry.getExpiryLimit().call().await?, "expiry limit")
    }

    /// Ticker registration fee in USD.
    pub async fn ticker_registration_fee(&self) -> Result<BigDecimal> {
        Ok(wei_to_eth(
            self.registry.getTickerRegistrationFee().call().await?,
        ))
    }

    /// Security token launch fee in USD.
    pub async fn security_token_launch_fee(&self) -> Result<BigDecimal> {
        Ok(wei_to_eth(
            self.registry.getSecurityTokenLaunchFee().call().await?,
        ))
    }

    /// Current fee in USD and its POLY equivalent.
    pub async fn fees(&self, fee_type: FeeType) -> Result<Fees> {
        let fees = self.registry.getFees(fee_type.to_bytes32()).call().await?;
        Ok(Fees {
            usd: wei_to_eth(fees.usdFee),
            poly: wei_to_eth(fees.polyFee),
        })
    }

    pub async fn latest_protocol_version(&self) -> Result<Version> {
        Version::from_parts(&self.registry.getLatestProtocolVersion().call().await?)
    }

    /// Reserves `ticker` for `owner`.
    pub async fn register_new_ticker(
        &self,
        owner: Address,
        ticker: &str,
        tx: &TxParams,
    ) -> Result<PendingTx> {
        let from = self.contract.get_caller_address(tx).await?;
        self.check_not_paused().await?;
        assert::is_non_zero_address("owner", owner)?;
        assert::is_valid_ticker(ticker)?;
        let details = self.ticker_details(ticker).await?;
        ensure!(
            details.is_available(Utc::now()),
            AlreadyExists,
            "Ticker {ticker} is already reserved by {}",
            details.owner
        );
        self.contract
            .send(
                self.registry.registerNewTicker(owner, ticker.to_uppercase()),
                from,
                tx,
            )
            .await
    }

    pub async fn transfer_ticker_ownership(
        &self,
        new_owner: Address,
        ticker: &str,
        tx: &TxParams,
    ) -> Result<PendingTx> {
        let from = self.contract.get_caller_address(tx).await?;
        assert::is_valid_ticker(ticker)?;
        assert::is_non_zero_address("new owner", new_owner)?;
        self.check_ticker_owner(from, ticker).await?;
        self.contract
            .send(
                self.registry
                    .transferTickerOwnership(new_owner, ticker.to_uppercase()),
                from,
                tx,
            )
            .await
    }

    pub async fn change_expiry_limit(&self, seconds: u64, tx: &TxParams) -> Result<PendingTx> {
        let from = self.contract.get_caller_address(tx).await?;
        self.check_only_owner(from).await?;
        ensure!(
            seconds >= MIN_EXPIRY_LIMIT,
            InvalidData,
            "Expiry limit must be at least {MIN_EXPIRY_LIMIT} seconds, got {seconds}"
        );
        self.contract
            .send(self.registry.changeExpiryLimit(U256::from(seconds)), from, tx)
            .await
    }

    pub async fn remove_ticker(&self, ticker: &str, tx: &TxParams) -> Result<PendingTx> {
        let from = self.contract.get_caller_address(tx).await?;
        self.check_only_owner(from).await?;
        assert::is_valid_ticker(ticker)?;
        ensure!(
            !self.ticker_details(ticker).await?.owner.is_zero(),
            NotFound,
            "Ticker {ticker} is not registered"
        );
        self.contract
            .send(self.registry.removeTicker(ticker.to_uppercase()), from, tx)
            .await
    }

    /// New fee in USD.
    pub async fn change_ticker_registration_fee(
        &self,
        fee: &BigDecimal,
        tx: &TxParams,
    ) -> Result<PendingTx> {
        let from = self.contract.get_caller_address(tx).await?;
        self.check_only_owner(from).await?;
        let fee = eth_to_wei(fee)?;
        ensure!(
            self.registry.getTickerRegistrationFee().call().await? != fee,
            InvalidData,
            "The new ticker registration fee equals the current one"
        );
        self.contract
            .send(self.registry.changeTickerRegistrationFee(fee), from, tx)
            .await
    }

    /// New fee in USD.
    pub async fn change_security_token_launch_fee(
        &self,
        fee: &BigDecimal,
        tx: &TxParams,
    ) -> Result<PendingTx> {
        let from = self.contract.get_caller_address(tx).await?;
        self.check_only_owner(from).await?;
        let fee = eth_to_wei(fee)?;
        ensure!(
            self.registry.getSecurityTokenLaunchFee().call().await? != fee,
            InvalidData,
            "The new security token launch fee equals the current one"
        );
        self.contract
            .send(self.registry.changeSecurityTokenLaunchFee(fee), from, tx)
            .await
    }

    /// Deploys a token for a ticker the caller reserved.
    pub async fn generate_new_security_token(
        &self,
        params: &NewSecurityTokenParams,
        tx: &TxParams,
    ) -> Result<PendingTx> {
        let from = self.contract.get_caller_address(tx).await?;
        self.check_not_paused().await?;
        assert::is_valid_ticker(&params.ticker)?;
        assert::is_non_empty_string("name", &params.name)?;
        assert::is_non_zero_address("treasury wallet", params.treasury_wallet)?;
        let details = self.ticker_details(&params.ticker).await?;
        ensure!(
            details.owner == from,
            Unauthorized,
            "{from} does not own ticker {}",
            params.ticker
        );
        ensure!(
            !details.status,
            AlreadyExists,
            "A security token was already deployed for {}",
            params.ticker
        );
        ensure!(
            details.expiry_date >= Utc::now(),
            PreconditionRequired,
            "The reservation of {} expired at {}",
            params.ticker,
            details.expiry_date
        );
        self.contract
            .send(
                self.registry.generateNewSecurityToken(
                    params.name.clone(),
                    params.ticker.to_uppercase(),
                    params.details.clone(),
                    params.divisible,
                    params.treasury_wallet,
                    U256::from(params.protocol_version),
                ),
                from,
                tx,
            )
            .await
    }

    async fn check_ticker_owner(&self, caller: Address, ticker: &str) -> Result<()> {
        let owner = self.ticker_details(ticker).await?.owner;
        ensure!(owner == caller, Unauthorized, "{caller} does not own ticker {ticker}");
        Ok(())
    }
}

#[async_trait]
impl OwnableContract for SecurityTokenRegistryWrapper {
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
impl PausableContract for SecurityTokenRegistryWrapper {
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

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn details(owner: Address, status: bool, expiry: DateTime<Utc>) -> TickerDetails {
        TickerDetails {
            owner,
            registration_date: expiry - Duration::days(60),
            expiry_date: expiry,
            token_name: String::new(),
            status,
        }
    }

    #[test]
    fn test_ticker_availability() {
        let now = Utc::now();
        let owner = Address::repeat_byte(7);
        assert!(details(Address::ZERO, false, now).is_available(now));
        assert!(details(owner, false, now - Duration::days(1)).is_available(now));
        assert!(!details(owner, false, now + Duration::days(1)).is_available(now));
        assert!(!details(owner, true, now - Duration::days(1)).is_available(now));
    }
}
