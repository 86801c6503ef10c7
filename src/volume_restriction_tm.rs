//! Volume restriction transfer manager.
//!
//! Caps how many tokens a holder may sell within a rolling window of days,
//! either as a fixed amount or as a percentage of the total supply. Individual
//! restrictions override the default one; daily restrictions are restrictions
//! with a rolling period of exactly one day.

use alloy::primitives::{Address, U256};
use alloy::providers::DynProvider;
use bigdecimal::BigDecimal;
use bon::Builder;
use chrono::{DateTime, Utc};
use futures::future::try_join_all;
use serde::Serialize;

use crate::abi::{IModule, VolumeRestrictionTM};
use crate::assert;
use crate::contract::ContractWrapper;
use crate::events::{EventSchema, IndexedKind};
use crate::module::{ModuleWrapper, impl_module};
use crate::tx::{PendingTx, TxParams};
use crate::types::{Permission, RestrictionType};
use crate::utils::{
    PERCENTAGE_DECIMALS, date_to_timestamp, percentage_to_wei, timestamp_to_date, to_u64,
    value_to_wei, wei_to_value,
};
use crate::{Result, ensure};

const HOLDER: &[(&str, IndexedKind)] = &[("_holder", IndexedKind::Address)];

pub const VOLUME_RESTRICTION_TM_EVENTS: &[EventSchema] = &[
    EventSchema::of::<VolumeRestrictionTM::ChangedExemptWalletList>(&[(
        "_wallet",
        IndexedKind::Address,
    )]),
    EventSchema::of::<VolumeRestrictionTM::AddIndividualRestriction>(HOLDER),
    EventSchema::of::<VolumeRestrictionTM::AddIndividualDailyRestriction>(HOLDER),
    EventSchema::of::<VolumeRestrictionTM::ModifyIndividualRestriction>(HOLDER),
    EventSchema::of::<VolumeRestrictionTM::ModifyIndividualDailyRestriction>(HOLDER),
    EventSchema::of::<VolumeRestrictionTM::AddDefaultRestriction>(&[]),
    EventSchema::of::<VolumeRestrictionTM::AddDefaultDailyRestriction>(&[]),
    EventSchema::of::<VolumeRestrictionTM::ModifyDefaultRestriction>(&[]),
    EventSchema::of::<VolumeRestrictionTM::ModifyDefaultDailyRestriction>(&[]),
    EventSchema::of::<VolumeRestrictionTM::IndividualRestrictionRemoved>(HOLDER),
    EventSchema::of::<VolumeRestrictionTM::IndividualDailyRestrictionRemoved>(HOLDER),
    EventSchema::of::<VolumeRestrictionTM::DefaultRestrictionRemoved>(&[]),
    EventSchema::of::<VolumeRestrictionTM::DefaultDailyRestrictionRemoved>(&[]),
    EventSchema::of::<IModule::Pause>(&[]),
    EventSchema::of::<IModule::Unpause>(&[]),
];

pub const MAX_ROLLING_PERIOD_IN_DAYS: u64 = 365;

const SECONDS_PER_DAY: i64 = 86_400;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Restriction {
    /// Token amount for `Fixed`, percentage of the supply for `Percentage`.
    pub allowed_tokens: BigDecimal,
    pub start_time: DateTime<Utc>,
    pub rolling_period_in_days: u64,
    pub end_time: DateTime<Utc>,
    pub restriction_type: RestrictionType,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HolderRestriction {
    pub holder: Address,
    pub restriction: Restriction,
}

/// Trading history the restriction is evaluated against.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketDetails {
    pub last_traded_day_time: DateTime<Utc>,
    pub sum_of_last_period: BigDecimal,
    pub days_covered: u64,
    pub daily_last_traded_day_time: DateTime<Utc>,
    pub last_traded_timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Builder)]
pub struct RestrictionParams {
    pub allowed_tokens: BigDecimal,
    pub start_time: DateTime<Utc>,
    pub rolling_period_in_days: u64,
    pub end_time: DateTime<Utc>,
    pub restriction_type: RestrictionType,
}

/// A restriction with a one day rolling period.
#[derive(Debug, Clone, Builder)]
pub struct DailyRestrictionParams {
    pub allowed_tokens: BigDecimal,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub restriction_type: RestrictionType,
}

impl From<&DailyRestrictionParams> for RestrictionParams {
    fn from(daily: &DailyRestrictionParams) -> Self {
        Self {
            allowed_tokens: daily.allowed_tokens.clone(),
            start_time: daily.start_time,
            rolling_period_in_days: 1,
            end_time: daily.end_time,
            restriction_type: daily.restriction_type,
        }
    }
}

/// Parallel arrays, one entry per holder.
#[derive(Debug, Clone, Builder)]
pub struct RestrictionMultiParams {
    pub holders: Vec<Address>,
    pub allowed_tokens: Vec<BigDecimal>,
    pub start_times: Vec<DateTime<Utc>>,
    pub rolling_period_in_days: Vec<u64>,
    pub end_times: Vec<DateTime<Utc>>,
    pub restriction_types: Vec<RestrictionType>,
}

impl RestrictionMultiParams {
    fn check_lengths(&self) -> Result<()> {
        assert::are_same_length(&[
            ("holders", self.holders.len()),
            ("allowedTokens", self.allowed_tokens.len()),
            ("startTimes", self.start_times.len()),
            ("rollingPeriodInDays", self.rolling_period_in_days.len()),
            ("endTimes", self.end_times.len()),
            ("restrictionTypes", self.restriction_types.len()),
        ])
    }

    fn items(&self) -> Vec<RestrictionParams> {
        (0..self.holders.len())
            .map(|i| RestrictionParams {
                allowed_tokens: self.allowed_tokens[i].clone(),
                start_time: self.start_times[i],
                rolling_period_in_days: self.rolling_period_in_days[i],
                end_time: self.end_times[i],
                restriction_type: self.restriction_types[i],
            })
            .collect()
    }
}

/// Parallel arrays of daily restrictions, one entry per holder.
#[derive(Debug, Clone, Builder)]
pub struct DailyRestrictionMultiParams {
    pub holders: Vec<Address>,
    pub allowed_tokens: Vec<BigDecimal>,
    pub start_times: Vec<DateTime<Utc>>,
    pub end_times: Vec<DateTime<Utc>>,
    pub restriction_types: Vec<RestrictionType>,
}

impl DailyRestrictionMultiParams {
    fn check_lengths(&self) -> Result<()> {
        assert::are_same_length(&[
            ("holders", self.holders.len()),
            ("allowedTokens", self.allowed_tokens.len()),
            ("startTimes", self.start_times.len()),
            ("endTimes", self.end_times.len()),
            ("restrictionTypes", self.restriction_types.len()),
        ])
    }

    fn items(&self) -> Vec<RestrictionParams> {
        (0..self.holders.len())
            .map(|i| RestrictionParams {
                allowed_tokens: self.allowed_tokens[i].clone(),
                start_time: self.start_times[i],
                rolling_period_in_days: 1,
                end_time: self.end_times[i],
                restriction_type: self.restriction_types[i],
            })
            .collect()
    }
}

/// Business rules every new or modified restriction must satisfy.
pub fn check_restriction(params: &RestrictionParams) -> Result<()> {
    assert::is_future_date(params.start_time, "Start time must be in the future")?;
    assert::is_positive("allowed tokens", &params.allowed_tokens)?;
    if params.restriction_type == RestrictionType::Percentage {
        assert::is_percentage("allowed tokens", &params.allowed_tokens)?;
    }
    ensure!(
        (1..=MAX_ROLLING_PERIOD_IN_DAYS).contains(&params.rolling_period_in_days),
        InvalidData,
        "Rolling period must be between 1 and {MAX_ROLLING_PERIOD_IN_DAYS} days, got {}",
        params.rolling_period_in_days
    );
    let span = span_in_days(params.start_time, params.end_time);
    ensure!(
        span >= i64::try_from(params.rolling_period_in_days).unwrap_or(i64::MAX),
        InvalidData,
        "Restriction spans {span} days, shorter than its rolling period of {} days",
        params.rolling_period_in_days
    );
    Ok(())
}

/// Whole days between two dates, rounding up.
pub fn span_in_days(start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    let seconds = (end - start).num_seconds();
    seconds.div_euclid(SECONDS_PER_DAY) + i64::from(seconds.rem_euclid(SECONDS_PER_DAY) != 0)
}

/// A restriction exactly as returned by the contract.
#[derive(Debug, Clone, Copy)]
struct RawRestriction {
    allowed_tokens: U256,
    start_time: U256,
    rolling_period_in_days: U256,
    end_time: U256,
    restriction_type: u8,
}

macro_rules! raw_restriction {
    ($ret:expr) => {{
        let ret = $ret;
        RawRestriction {
            allowed_tokens: ret.allowedTokens,
            start_time: ret.startTime,
            rolling_period_in_days: ret.rollingPeriodInDays,
            end_time: ret.endTime,
            restriction_type: ret.restrictionType,
        }
    }};
}

impl RawRestriction {
    fn exists(&self) -> bool {
        !self.end_time.is_zero()
    }

    fn has_started(&self) -> bool {
        self.start_time <= date_to_timestamp(Utc::now())
    }

    /// Still being enforced, so a new one cannot be added.
    fn is_active(&self) -> bool {
        self.exists() && self.end_time >= date_to_timestamp(Utc::now())
    }
}

/// A restriction ready to be passed to the contract.
struct EncodedRestriction {
    allowed_tokens: U256,
    start_time: U256,
    rolling_period_in_days: U256,
    end_time: U256,
    restriction_type: u8,
}

fn encode(params: &RestrictionParams, decimals: Option<u8>) -> Result<EncodedRestriction> {
    let allowed_tokens = match (params.restriction_type, decimals) {
        (RestrictionType::Percentage, _) => percentage_to_wei(&params.allowed_tokens)?,
        (RestrictionType::Fixed, Some(decimals)) => value_to_wei(&params.allowed_tokens, decimals)?,
        (RestrictionType::Fixed, None) => {
            return Err(crate::Error::PreconditionRequired(
                "Token decimals are required to encode a fixed restriction".into(),
            ));
        }
    };
    Ok(EncodedRestriction {
        allowed_tokens,
        start_time: date_to_timestamp(params.start_time),
        rolling_period_in_days: U256::from(params.rolling_period_in_days),
        end_time: date_to_timestamp(params.end_time),
        restriction_type: params.restriction_type.into(),
    })
}

#[derive(Clone)]
pub struct VolumeRestrictionTmWrapper {
    module: ModuleWrapper,
    vrtm: VolumeRestrictionTM::VolumeRestrictionTMInstance<DynProvider>,
}

impl_module!(VolumeRestrictionTmWrapper);

impl VolumeRestrictionTmWrapper {
    pub(crate) fn new(contract: ContractWrapper) -> Self {
        let vrtm = VolumeRestrictionTM::new(contract.address(), contract.provider().clone());
        Self {
            module: ModuleWrapper::new(contract),
            vrtm,
        }
    }

    pub fn address(&self) -> Address {
        self.module.address()
    }

    fn contract(&self) -> &ContractWrapper {
        self.module.contract()
    }

    /// Decimals needed to encode `items`, read only when one is fixed.
    async fn decimals_for(&self, items: &[RestrictionParams]) -> Result<Option<u8>> {
        if items
            .iter()
            .any(|item| item.restriction_type == RestrictionType::Fixed)
        {
            Ok(Some(self.module.security_token_decimals().await?))
        } else {
            Ok(None)
        }
    }

    async fn decode(&self, raw: RawRestriction) -> Result<Restriction> {
        let restriction_type = RestrictionType::try_from(raw.restriction_type)?;
        let decimals = match restriction_type {
            RestrictionType::Fixed => self.module.security_token_decimals().await?,
            RestrictionType::Percentage => PERCENTAGE_DECIMALS,
        };
        decode_with(raw, restriction_type, decimals)
    }

    async fn raw_individual(&self, holder: Address) -> Result<RawRestriction> {
        log::debug!("getIndividualRestriction({holder}) on {}", self.address());
        Ok(raw_restriction!(
            self.vrtm.getIndividualRestriction(holder).call().await?
        ))
    }

    async fn raw_individual_daily(&self, holder: Address) -> Result<RawRestriction> {
        Ok(raw_restriction!(
            self.vrtm.getIndividualDailyRestriction(holder).call().await?
        ))
    }

    async fn raw_default(&self) -> Result<RawRestriction> {
        Ok(raw_restriction!(self.vrtm.getDefaultRestriction().call().await?))
    }

    async fn raw_default_daily(&self) -> Result<RawRestriction> {
        Ok(raw_restriction!(
            self.vrtm.getDefaultDailyRestriction().call().await?
        ))
    }

    pub async fn individual_restriction(&self, holder: Address) -> Result<Restriction> {
        let raw = self.raw_individual(holder).await?;
        self.decode(raw).await
    }

    pub async fn individual_daily_restriction(&self, holder: Address) -> Result<Restriction> {
        let raw = self.raw_individual_daily(holder).await?;
        self.decode(raw).await
    }

    pub async fn default_restriction(&self) -> Result<Restriction> {
        let raw = self.raw_default().await?;
        self.decode(raw).await
    }

    pub async fn default_daily_restriction(&self) -> Result<Restriction> {
        let raw = self.raw_default_daily().await?;
        self.decode(raw).await
    }

    /// Wallets no restriction applies to.
    pub async fn exempt_addresses(&self) -> Result<Vec<Address>> {
        Ok(self.vrtm.getExemptAddress().call().await?)
    }

    /// Individual restrictions of every holder.
    pub async fn restriction_data(&self) -> Result<Vec<HolderRestriction>> {
        let data = self.vrtm.getRestrictionData().call().await?;
        assert::are_same_length(&[
            ("allAddresses", data.allAddresses.len()),
            ("allowedTokens", data.allowedTokens.len()),
            ("startTime", data.startTime.len()),
            ("rollingPeriodInDays", data.rollingPeriodInDays.len()),
            ("endTime", data.endTime.len()),
            ("typeOfRestriction", data.typeOfRestriction.len()),
        ])?;
        let decimals = if data
            .typeOfRestriction
            .contains(&u8::from(RestrictionType::Fixed))
        {
            self.module.security_token_decimals().await?
        } else {
            PERCENTAGE_DECIMALS
        };
        (0..data.allAddresses.len())
            .map(|i| {
                let raw = RawRestriction {
                    allowed_tokens: data.allowedTokens[i],
                    start_time: data.startTime[i],
                    rolling_period_in_days: data.rollingPeriodInDays[i],
                    end_time: data.endTime[i],
                    restriction_type: data.typeOfRestriction[i],
                };
                let restriction_type = RestrictionType::try_from(raw.restriction_type)?;
                let decimals = match restriction_type {
                    RestrictionType::Fixed => decimals,
                    RestrictionType::Percentage => PERCENTAGE_DECIMALS,
                };
                Ok(HolderRestriction {
                    holder: data.allAddresses[i],
                    restriction: decode_with(raw, restriction_type, decimals)?,
                })
            })
            .collect()
    }

    pub async fn individual_bucket_details(&self, user: Address) -> Result<BucketDetails> {
        let details = self.vrtm.getIndividualBucketDetailsToUser(user).call().await?;
        let decimals = self.module.security_token_decimals().await?;
        Ok(BucketDetails {
            last_traded_day_time: timestamp_to_date(details.lastTradedDayTime)?,
            sum_of_last_period: wei_to_value(details.sumOfLastPeriod, decimals),
            days_covered: to_u64(details.daysCovered, "days covered")?,
            daily_last_traded_day_time: timestamp_to_date(details.dailyLastTradedDayTime)?,
            last_traded_timestamp: timestamp_to_date(details.lastTradedTimestamp)?,
        })
    }

    pub async fn default_bucket_details(&self, user: Address) -> Result<BucketDetails> {
        let details = self.vrtm.getDefaultBucketDetailsToUser(user).call().await?;
        let decimals = self.module.security_token_decimals().await?;
        Ok(BucketDetails {
            last_traded_day_time: timestamp_to_date(details.lastTradedDayTime)?,
            sum_of_last_period: wei_to_value(details.sumOfLastPeriod, decimals),
            days_covered: to_u64(details.daysCovered, "days covered")?,
            daily_last_traded_day_time: timestamp_to_date(details.dailyLastTradedDayTime)?,
            last_traded_timestamp: timestamp_to_date(details.lastTradedTimestamp)?,
        })
    }

    /// Tokens `user` traded on the day starting at `at`.
    pub async fn total_traded_by_user(&self, user: Address, at: DateTime<Utc>) -> Result<BigDecimal> {
        let traded = self
            .vrtm
            .getTotalTradedByUser(user, date_to_timestamp(at))
            .call()
            .await?;
        let decimals = self.module.security_token_decimals().await?;
        Ok(wei_to_value(traded, decimals))
    }

    /// Adds `wallet` to, or removes it from, the exempt list.
    pub async fn change_exempt_wallet_list(
        &self,
        wallet: Address,
        exempted: bool,
        tx: &TxParams,
    ) -> Result<PendingTx> {
        let from = self.contract().get_caller_address(tx).await?;
        self.module.check_permission(from, Permission::Admin).await?;
        assert::is_non_zero_address("wallet", wallet)?;
        let listed = self.exempt_addresses().await?.contains(&wallet);
        if exempted {
            ensure!(!listed, AlreadyExists, "{wallet} is already exempted");
        } else {
            ensure!(listed, NotFound, "{wallet} is not exempted");
        }
        self.contract()
            .send(self.vrtm.changeExemptWalletList(wallet, exempted), from, tx)
            .await
    }

    pub async fn add_individual_restriction(
        &self,
        holder: Address,
        params: &RestrictionParams,
        tx: &TxParams,
    ) -> Result<PendingTx> {
        let from = self.contract().get_caller_address(tx).await?;
        self.module.check_permission(from, Permission::Admin).await?;
        assert::is_non_zero_address("holder", holder)?;
        check_restriction(params)?;
        ensure!(
            !self.raw_individual(holder).await?.is_active(),
            AlreadyExists,
            "{holder} already has an individual restriction"
        );
        let r = encode(params, self.decimals_for(std::slice::from_ref(params)).await?)?;
        self.contract()
            .send(
                self.vrtm.addIndividualRestriction(
                    holder,
                    r.allowed_tokens,
                    r.start_time,
                    r.rolling_period_in_days,
                    r.end_time,
                    r.restriction_type,
                ),
                from,
                tx,
            )
            .await
    }

    pub async fn add_individual_restriction_multi(
        &self,
        params: &RestrictionMultiParams,
        tx: &TxParams,
    ) -> Result<PendingTx> {
        params.check_lengths()?;
        let from = self.contract().get_caller_address(tx).await?;
        self.module.check_permission(from, Permission::Admin).await?;
        assert::is_non_empty_list("holders", &params.holders)?;
        assert::are_non_zero_addresses("holder", &params.holders)?;
        let items = params.items();
        items.iter().try_for_each(check_restriction)?;
        self.check_none_active(&params.holders, false).await?;
        let encoded = self.encode_all(&items).await?;
        self.contract()
            .send(
                self.vrtm.addIndividualRestrictionMulti(
                    params.holders.clone(),
                    encoded.allowed_tokens,
                    encoded.start_times,
                    encoded.rolling_periods,
                    encoded.end_times,
                    encoded.restriction_types,
                ),
                from,
                tx,
            )
            .await
    }

    pub async fn add_individual_daily_restriction(
        &self,
        holder: Address,
        params: &DailyRestrictionParams,
        tx: &TxParams,
    ) -> Result<PendingTx> {
        let from = self.contract().get_caller_address(tx).await?;
        self.module.check_permission(from, Permission::Admin).await?;
        assert::is_non_zero_address("holder", holder)?;
        let params = RestrictionParams::from(params);
        check_restriction(&params)?;
        ensure!(
            !self.raw_individual_daily(holder).await?.is_active(),
            AlreadyExists,
            "{holder} already has an individual daily restriction"
        );
        let r = encode(&params, self.decimals_for(std::slice::from_ref(&params)).await?)?;
        self.contract()
            .send(
                self.vrtm.addIndividualDailyRestriction(
                    holder,
                    r.allowed_tokens,
                    r.start_time,
                    r.end_time,
                    r.restriction_type,
                ),
                from,
                tx,
            )
            .await
    }

    pub async fn add_individual_daily_restriction_multi(
        &self,
        params: &DailyRestrictionMultiParams,
        tx: &TxParams,
    ) -> Result<PendingTx> {
        params.check_lengths()?;
        let from = self.contract().get_caller_address(tx).await?;
        self.module.check_permission(from, Permission::Admin).await?;
        assert::is_non_empty_list("holders", &params.holders)?;
        assert::are_non_zero_addresses("holder", &params.holders)?;
        let items = params.items();
        items.iter().try_for_each(check_restriction)?;
        self.check_none_active(&params.holders, true).await?;
        let encoded = self.encode_all(&items).await?;
        self.contract()
            .send(
                self.vrtm.addIndividualDailyRestrictionMulti(
                    params.holders.clone(),
                    encoded.allowed_tokens,
                    encoded.start_times,
                    encoded.end_times,
                    encoded.restriction_types,
                ),
                from,
                tx,
            )
            .await
    }

    pub async fn add_default_restriction(
        &self,
        params: &RestrictionParams,
        tx: &TxParams,
    ) -> Result<PendingTx> {
        let from = self.contract().get_caller_address(tx).await?;
        self.module.check_permission(from, Permission::Admin).await?;
        check_restriction(params)?;
        ensure!(
            !self.raw_default().await?.is_active(),
            AlreadyExists,
            "A default restriction already exists"
        );
        let r = encode(params, self.decimals_for(std::slice::from_ref(params)).await?)?;
        self.contract()
            .send(
                self.vrtm.addDefaultRestriction(
                    r.allowed_tokens,
                    r.start_time,
                    r.rolling_period_in_days,
                    r.end_time,
                    r.restriction_type,
                ),
                from,
                tx,
            )
            .await
    }

    pub async fn add_default_daily_restriction(
        &self,
        params: &DailyRestrictionParams,
        tx: &TxParams,
    ) -> Result<PendingTx> {
        let from = self.contract().get_caller_address(tx).await?;
        self.module.check_permission(from, Permission::Admin).await?;
        let params = RestrictionParams::from(params);
        check_restriction(&params)?;
        ensure!(
            !self.raw_default_daily().await?.is_active(),
            AlreadyExists,
            "A default daily restriction already exists"
        );
        let r = encode(&params, self.decimals_for(std::slice::from_ref(&params)).await?)?;
        self.contract()
            .send(
                self.vrtm.addDefaultDailyRestriction(
                    r.allowed_tokens,
                    r.start_time,
                    r.end_time,
                    r.restriction_type,
                ),
                from,
                tx,
            )
            .await
    }

    pub async fn modify_individual_restriction(
        &self,
        holder: Address,
        params: &RestrictionParams,
        tx: &TxParams,
    ) -> Result<PendingTx> {
        let from = self.contract().get_caller_address(tx).await?;
        self.module.check_permission(from, Permission::Admin).await?;
        assert::is_non_zero_address("holder", holder)?;
        check_restriction(params)?;
        check_modifiable(holder, self.raw_individual(holder).await?)?;
        let r = encode(params, self.decimals_for(std::slice::from_ref(params)).await?)?;
        self.contract()
            .send(
                self.vrtm.modifyIndividualRestriction(
                    holder,
                    r.allowed_tokens,
                    r.start_time,
                    r.rolling_period_in_days,
                    r.end_time,
                    r.restriction_type,
                ),
                from,
                tx,
            )
            .await
    }

    pub async fn modify_individual_restriction_multi(
        &self,
        params: &RestrictionMultiParams,
        tx: &TxParams,
    ) -> Result<PendingTx> {
        params.check_lengths()?;
        let from = self.contract().get_caller_address(tx).await?;
        self.module.check_permission(from, Permission::Admin).await?;
        assert::is_non_empty_list("holders", &params.holders)?;
        assert::are_non_zero_addresses("holder", &params.holders)?;
        let items = params.items();
        items.iter().try_for_each(check_restriction)?;
        let existing = try_join_all(
            params
                .holders
                .iter()
                .map(|holder| self.raw_individual(*holder)),
        )
        .await?;
        for (holder, raw) in params.holders.iter().zip(existing) {
            check_modifiable(*holder, raw)?;
        }
        let encoded = self.encode_all(&items).await?;
        self.contract()
            .send(
                self.vrtm.modifyIndividualRestrictionMulti(
                    params.holders.clone(),
                    encoded.allowed_tokens,
                    encoded.start_times,
                    encoded.rolling_periods,
                    encoded.end_times,
                    encoded.restriction_types,
                ),
                from,
                tx,
            )
            .await
    }

    pub async fn modify_individual_daily_restriction(
        &self,
        holder: Address,
        params: &DailyRestrictionParams,
        tx: &TxParams,
    ) -> Result<PendingTx> {
        let from = self.contract().get_caller_address(tx).await?;
        self.module.check_permission(from, Permission::Admin).await?;
        assert::is_non_zero_address("holder", holder)?;
        let params = RestrictionParams::from(params);
        check_restriction(&params)?;
        check_modifiable(holder, self.raw_individual_daily(holder).await?)?;
        let r = encode(&params, self.decimals_for(std::slice::from_ref(&params)).await?)?;
        self.contract()
            .send(
                self.vrtm.modifyIndividualDailyRestriction(
                    holder,
                    r.allowed_tokens,
                    r.start_time,
                    r.end_time,
                    r.restriction_type,
                ),
                from,
                tx,
            )
            .await
    }

    pub async fn modify_individual_daily_restriction_multi(
        &self,
        params: &DailyRestrictionMultiParams,
        tx: &TxParams,
    ) -> Result<PendingTx> {
        params.check_lengths()?;
        let from = self.contract().get_caller_address(tx).await?;
        self.module.check_permission(from, Permission::Admin).await?;
        assert::is_non_empty_list("holders", &params.holders)?;
        assert::are_non_zero_addresses("holder", &params.holders)?;
        let items = params.items();
        items.iter().try_for_each(check_restriction)?;
        let existing = try_join_all(
            params
                .holders
                .iter()
                .map(|holder| self.raw_individual_daily(*holder)),
        )
        .await?;
        for (holder, raw) in params.holders.iter().zip(existing) {
            check_modifiable(*holder, raw)?;
        }
        let encoded = self.encode_all(&items).await?;
        self.contract()
            .send(
                self.vrtm.modifyIndividualDailyRestrictionMulti(
                    params.holders.clone(),
                    encoded.allowed_tokens,
                    encoded.start_times,
                    encoded.end_times,
                    encoded.restriction_types,
                ),
                from,
                tx,
            )
            .await
    }

    pub async fn modify_default_restriction(
        &self,
        params: &RestrictionParams,
        tx: &TxParams,
    ) -> Result<PendingTx> {
        let from = self.contract().get_caller_address(tx).await?;
        self.module.check_permission(from, Permission::Admin).await?;
        check_restriction(params)?;
        check_modifiable_default(self.raw_default().await?)?;
        let r = encode(params, self.decimals_for(std::slice::from_ref(params)).await?)?;
        self.contract()
            .send(
                self.vrtm.modifyDefaultRestriction(
                    r.allowed_tokens,
                    r.start_time,
                    r.rolling_period_in_days,
                    r.end_time,
                    r.restriction_type,
                ),
                from,
                tx,
            )
            .await
    }

    pub async fn modify_default_daily_restriction(
        &self,
        params: &DailyRestrictionParams,
        tx: &TxParams,
    ) -> Result<PendingTx> {
        let from = self.contract().get_caller_address(tx).await?;
        self.module.check_permission(from, Permission::Admin).await?;
        let params = RestrictionParams::from(params);
        check_restriction(&params)?;
        check_modifiable_default(self.raw_default_daily().await?)?;
        let r = encode(&params, self.decimals_for(std::slice::from_ref(&params)).await?)?;
        self.contract()
            .send(
                self.vrtm.modifyDefaultDailyRestriction(
                    r.allowed_tokens,
                    r.start_time,
                    r.end_time,
                    r.restriction_type,
                ),
                from,
                tx,
            )
            .await
    }

    pub async fn remove_individual_restriction(
        &self,
        holder: Address,
        tx: &TxParams,
    ) -> Result<PendingTx> {
        let from = self.contract().get_caller_address(tx).await?;
        self.module.check_permission(from, Permission::Admin).await?;
        assert::is_non_zero_address("holder", holder)?;
        ensure!(
            self.raw_individual(holder).await?.exists(),
            NotFound,
            "{holder} has no individual restriction"
        );
        self.contract()
            .send(self.vrtm.removeIndividualRestriction(holder), from, tx)
            .await
    }

    pub async fn remove_individual_restriction_multi(
        &self,
        holders: &[Address],
        tx: &TxParams,
    ) -> Result<PendingTx> {
        let from = self.contract().get_caller_address(tx).await?;
        self.module.check_permission(from, Permission::Admin).await?;
        assert::is_non_empty_list("holders", holders)?;
        assert::are_non_zero_addresses("holder", holders)?;
        let existing =
            try_join_all(holders.iter().map(|holder| self.raw_individual(*holder))).await?;
        for (holder, raw) in holders.iter().zip(existing) {
            ensure!(raw.exists(), NotFound, "{holder} has no individual restriction");
        }
        self.contract()
            .send(
                self.vrtm.removeIndividualRestrictionMulti(holders.to_vec()),
                from,
                tx,
            )
            .await
    }

    pub async fn remove_individual_daily_restriction(
        &self,
        holder: Address,
        tx: &TxParams,
    ) -> Result<PendingTx> {
        let from = self.contract().get_caller_address(tx).await?;
        self.module.check_permission(from, Permission::Admin).await?;
        assert::is_non_zero_address("holder", holder)?;
        ensure!(
            self.raw_individual_daily(holder).await?.exists(),
            NotFound,
            "{holder} has no individual daily restriction"
        );
        self.contract()
            .send(self.vrtm.removeIndividualDailyRestriction(holder), from, tx)
            .await
    }

    pub async fn remove_individual_daily_restriction_multi(
        &self,
        holders: &[Address],
        tx: &TxParams,
    ) -> Result<PendingTx> {
        let from = self.contract().get_caller_address(tx).await?;
        self.module.check_permission(from, Permission::Admin).await?;
        assert::is_non_empty_list("holders", holders)?;
        assert::are_non_zero_addresses("holder", holders)?;
        let existing =
            try_join_all(holders.iter().map(|holder| self.raw_individual_daily(*holder))).await?;
        for (holder, raw) in holders.iter().zip(existing) {
            ensure!(raw.exists(), NotFound, "{holder} has no individual daily restriction");
        }
        self.contract()
            .send(
                self.vrtm.removeIndividualDailyRestrictionMulti(holders.to_vec()),
                from,
                tx,
            )
            .await
    }

    pub async fn remove_default_restriction(&self, tx: &TxParams) -> Result<PendingTx> {
        let from = self.contract().get_caller_address(tx).await?;
        self.module.check_permission(from, Permission::Admin).await?;
        ensure!(
            self.raw_default().await?.exists(),
            NotFound,
            "There is no default restriction"
        );
        self.contract()
            .send(self.vrtm.removeDefaultRestriction(), from, tx)
            .await
    }

    pub async fn remove_default_daily_restriction(&self, tx: &TxParams) -> Result<PendingTx> {
        let from = self.contract().get_caller_address(tx).await?;
        self.module.check_permission(from, Permission::Admin).await?;
        ensure!(
            self.raw_default_daily().await?.exists(),
            NotFound,
            "There is no default daily restriction"
        );
        self.contract()
            .send(self.vrtm.removeDefaultDailyRestriction(), from, tx)
            .await
    }

    /// Fails with `AlreadyExists` if any holder has an active restriction.
    async fn check_none_active(&self, holders: &[Address], daily: bool) -> Result<()> {
        let existing = try_join_all(holders.iter().map(|holder| async move {
            if daily {
                self.raw_individual_daily(*holder).await
            } else {
                self.raw_individual(*holder).await
            }
        }))
        .await?;
        let kind = if daily { "individual daily" } else { "individual" };
        for (holder, raw) in holders.iter().zip(existing) {
            ensure!(
                !raw.is_active(),
                AlreadyExists,
                "{holder} already has an {kind} restriction"
            );
        }
        Ok(())
    }

    async fn encode_all(&self, items: &[RestrictionParams]) -> Result<EncodedBatch> {
        let decimals = self.decimals_for(items).await?;
        let mut batch = EncodedBatch::default();
        for item in items {
            let r = encode(item, decimals)?;
            batch.allowed_tokens.push(r.allowed_tokens);
            batch.start_times.push(r.start_time);
            batch.rolling_periods.push(r.rolling_period_in_days);
            batch.end_times.push(r.end_time);
            batch.restriction_types.push(r.restriction_type);
        }
        Ok(batch)
    }
}

#[derive(Default)]
struct EncodedBatch {
    allowed_tokens: Vec<U256>,
    start_times: Vec<U256>,
    rolling_periods: Vec<U256>,
    end_times: Vec<U256>,
    restriction_types: Vec<u8>,
}

fn decode_with(
    raw: RawRestriction,
    restriction_type: RestrictionType,
    decimals: u8,
) -> Result<Restriction> {
    Ok(Restriction {
        allowed_tokens: wei_to_value(raw.allowed_tokens, decimals),
        start_time: timestamp_to_date(raw.start_time)?,
        rolling_period_in_days: to_u64(raw.rolling_period_in_days, "rolling period")?,
        end_time: timestamp_to_date(raw.end_time)?,
        restriction_type,
    })
}

/// An existing restriction can only be modified before it starts.
fn check_modifiable(holder: Address, raw: RawRestriction) -> Result<()> {
    ensure!(raw.exists(), NotFound, "{holder} has no restriction to modify");
    ensure!(
        !raw.has_started(),
        PreconditionRequired,
        "The restriction of {holder} already started"
    );
    Ok(())
}

fn check_modifiable_default(raw: RawRestriction) -> Result<()> {
    ensure!(raw.exists(), NotFound, "There is no default restriction to modify");
    ensure!(
        !raw.has_started(),
        PreconditionRequired,
        "The default restriction already started"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorCode;
    use chrono::Duration;

    fn params(rolling: u64, span: Duration) -> RestrictionParams {
        let start = Utc::now() + Duration::days(1);
        RestrictionParams::builder()
            .allowed_tokens(BigDecimal::from(10))
            .start_time(start)
            .rolling_period_in_days(rolling)
            .end_time(start + span)
            .restriction_type(RestrictionType::Fixed)
            .build()
    }

    #[test]
    fn test_span_in_days_rounds_up() {
        let start = Utc::now();
        assert_eq!(span_in_days(start, start + Duration::days(3)), 3);
        assert_eq!(span_in_days(start, start + Duration::days(3) + Duration::seconds(1)), 4);
        assert_eq!(span_in_days(start, start + Duration::hours(1)), 1);
        assert_eq!(span_in_days(start, start), 0);
    }

    #[test]
    fn test_valid_restriction() {
        assert!(check_restriction(&params(3, Duration::days(3))).is_ok());
        assert!(check_restriction(&params(3, Duration::days(2) + Duration::hours(1))).is_ok());
        assert!(check_restriction(&params(365, Duration::days(400))).is_ok());
    }

    #[test]
    fn test_rolling_period_bounds() {
        for rolling in [0, 366] {
            let err = check_restriction(&params(rolling, Duration::days(500))).unwrap_err();
            assert_eq!(err.code(), Some(ErrorCode::InvalidData), "{rolling}");
        }
    }

    #[test]
    fn test_span_shorter_than_rolling_period() {
        let err = check_restriction(&params(5, Duration::days(4))).unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::InvalidData));
    }

    #[test]
    fn test_start_in_the_past() {
        let mut p = params(1, Duration::days(2));
        p.start_time = Utc::now() - Duration::minutes(5);
        let err = check_restriction(&p).unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::TooEarly));
    }

    #[test]
    fn test_percentage_limit() {
        let mut p = params(1, Duration::days(2));
        p.restriction_type = RestrictionType::Percentage;
        p.allowed_tokens = BigDecimal::from(100);
        assert!(check_restriction(&p).is_ok());
        p.allowed_tokens = BigDecimal::from(101);
        assert_eq!(check_restriction(&p).unwrap_err().code(), Some(ErrorCode::InvalidData));
        p.allowed_tokens = BigDecimal::from(0);
        assert_eq!(check_restriction(&p).unwrap_err().code(), Some(ErrorCode::InvalidData));
    }

    #[test]
    fn test_daily_params_use_one_day() {
        let start = Utc::now() + Duration::hours(2);
        let daily = DailyRestrictionParams::builder()
            .allowed_tokens(BigDecimal::from(1))
            .start_time(start)
            .end_time(start + Duration::days(1))
            .restriction_type(RestrictionType::Fixed)
            .build();
        let params = RestrictionParams::from(&daily);
        assert_eq!(params.rolling_period_in_days, 1);
        assert!(check_restriction(&params).is_ok());
    }

    #[test]
    fn test_encode_scales_by_type() {
        let mut p = params(1, Duration::days(1));
        let fixed = encode(&p, Some(2)).unwrap();
        assert_eq!(fixed.allowed_tokens, U256::from(1000u64));
        assert!(encode(&p, None).is_err());
        p.restriction_type = RestrictionType::Percentage;
        let percentage = encode(&p, None).unwrap();
        assert_eq!(percentage.allowed_tokens, U256::from(100_000_000_000_000_000u128));
        assert_eq!(percentage.restriction_type, 1);
    }
}
