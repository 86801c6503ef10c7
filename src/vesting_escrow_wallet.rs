use alloy::primitives::{Address, B256, U256};
use alloy::providers::DynProvider;
use bigdecimal::BigDecimal;
use bon::Builder;
use chrono::{DateTime, Utc};
use futures::future::try_join_all;
use serde::Serialize;

use crate::abi::{IModule, VestingEscrowWallet};
use crate::assert;
use crate::contract::ContractWrapper;
use crate::events::{EventSchema, IndexedKind};
use crate::module::{ModuleWrapper, impl_module};
use crate::tx::{PendingTx, TxParams};
use crate::types::{Permission, ScheduleState};
use crate::utils::{
    bytes32_to_string, bytes32_to_strings, date_to_timestamp, string_to_bytes32,
    strings_to_bytes32, timestamp_to_date, to_u64, value_to_wei, wei_to_value,
};
use crate::{Result, ensure};

const BENEFICIARY: &[(&str, IndexedKind)] = &[("_beneficiary", IndexedKind::Address)];

pub const VESTING_ESCROW_WALLET_EVENTS: &[EventSchema] = &[
    EventSchema::of::<VestingEscrowWallet::AddSchedule>(BENEFICIARY),
    EventSchema::of::<VestingEscrowWallet::ModifySchedule>(BENEFICIARY),
    EventSchema::of::<VestingEscrowWallet::RevokeAllSchedules>(BENEFICIARY),
    EventSchema::of::<VestingEscrowWallet::RevokeSchedule>(BENEFICIARY),
    EventSchema::of::<VestingEscrowWallet::DepositTokens>(&[]),
    EventSchema::of::<VestingEscrowWallet::SendToTreasury>(&[]),
    EventSchema::of::<VestingEscrowWallet::SendTokens>(BENEFICIARY),
    EventSchema::of::<VestingEscrowWallet::AddTemplate>(&[]),
    EventSchema::of::<VestingEscrowWallet::RemoveTemplate>(&[]),
    EventSchema::of::<VestingEscrowWallet::TreasuryWalletChanged>(&[]),
    EventSchema::of::<IModule::Pause>(&[]),
    EventSchema::of::<IModule::Unpause>(&[]),
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Template {
    pub name: String,
    pub number_of_tokens: BigDecimal,
    /// Vesting duration in seconds.
    pub duration: u64,
    /// Seconds between two releases.
    pub frequency: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Schedule {
    pub template_name: String,
    pub number_of_tokens: BigDecimal,
    pub duration: u64,
    pub frequency: u64,
    pub start_time: DateTime<Utc>,
    pub claimed_tokens: BigDecimal,
    pub state: ScheduleState,
}

#[derive(Debug, Clone, Builder)]
pub struct TemplateParams {
    #[builder(into)]
    pub name: String,
    pub number_of_tokens: BigDecimal,
    pub duration: u64,
    pub frequency: u64,
}

#[derive(Debug, Clone, Builder)]
pub struct ScheduleParams {
    pub beneficiary: Address,
    #[builder(into)]
    pub template_name: String,
    pub number_of_tokens: BigDecimal,
    pub duration: u64,
    pub frequency: u64,
    pub start_time: DateTime<Utc>,
}

/// Parallel arrays, one entry per schedule.
#[derive(Debug, Clone, Builder)]
pub struct ScheduleMultiParams {
    pub beneficiaries: Vec<Address>,
    pub template_names: Vec<String>,
    pub number_of_tokens: Vec<BigDecimal>,
    pub durations: Vec<u64>,
    pub frequencies: Vec<u64>,
    pub start_times: Vec<DateTime<Utc>>,
}

/// Parallel arrays pairing beneficiaries with a template and start time.
#[derive(Debug, Clone, Builder)]
pub struct ScheduleFromTemplateMultiParams {
    pub beneficiaries: Vec<Address>,
    pub template_names: Vec<String>,
    pub start_times: Vec<DateTime<Utc>>,
}

impl ScheduleFromTemplateMultiParams {
    fn check_lengths(&self) -> Result<()> {
        assert::are_same_length(&[
            ("beneficiaries", self.beneficiaries.len()),
            ("templateNames", self.template_names.len()),
            ("startTimes", self.start_times.len()),
        ])?;
        assert::is_non_empty_list("beneficiaries", &self.beneficiaries)
    }
}

/// Checks a template's release plan against the token granularity.
///
/// `number_of_tokens` is in on-chain units. The duration must be a whole
/// number of periods and every period must release the same amount, itself a
/// multiple of `granularity`.
pub fn check_template_math(
    number_of_tokens: U256,
    duration: u64,
    frequency: u64,
    granularity: U256,
) -> Result<()> {
    ensure!(frequency > 0, InvalidData, "Frequency must be greater than 0");
    ensure!(
        duration % frequency == 0,
        InvalidData,
        "Duration {duration} is not divisible by frequency {frequency}"
    );
    let periods = U256::from(duration / frequency);
    ensure!(
        !periods.is_zero() && (number_of_tokens % periods).is_zero(),
        InvalidData,
        "Number of tokens must be divisible by the number of periods ({periods})"
    );
    let per_period = number_of_tokens / periods;
    ensure!(
        !granularity.is_zero() && (per_period % granularity).is_zero(),
        InvalidData,
        "Tokens released per period ({per_period}) must be a multiple of the granularity ({granularity})"
    );
    Ok(())
}

fn check_template_shape(name: &str, tokens: &BigDecimal, duration: u64, frequency: u64) -> Result<()> {
    assert::is_non_empty_string("template name", name)?;
    assert::is_bytes32_string("template name", name)?;
    assert::is_positive("number of tokens", tokens)?;
    ensure!(duration > 0, InvalidData, "Duration must be greater than 0");
    ensure!(frequency > 0, InvalidData, "Frequency must be greater than 0");
    ensure!(
        duration % frequency == 0,
        InvalidData,
        "Duration {duration} is not divisible by frequency {frequency}"
    );
    Ok(())
}

/// Token vesting wallet holding schedules per beneficiary.
#[derive(Clone)]
pub struct VestingEscrowWalletWrapper {
    module: ModuleWrapper,
    wallet: VestingEscrowWallet::VestingEscrowWalletInstance<DynProvider>,
}

impl_module!(VestingEscrowWalletWrapper);

impl VestingEscrowWalletWrapper {
    pub(crate) fn new(contract: ContractWrapper) -> Self {
        let wallet = VestingEscrowWallet::new(contract.address(), contract.provider().clone());
        Self {
            module: ModuleWrapper::new(contract),
            wallet,
        }
    }

    pub fn address(&self) -> Address {
        self.module.address()
    }

    fn contract(&self) -> &ContractWrapper {
        self.module.contract()
    }

    pub async fn treasury_wallet(&self) -> Result<Address> {
        Ok(self.wallet.treasuryWallet().call().await?)
    }

    /// Deposited tokens not yet assigned to any schedule.
    pub async fn unassigned_tokens(&self) -> Result<BigDecimal> {
        let unassigned = self.wallet.unassignedTokens().call().await?;
        let decimals = self.module.security_token_decimals().await?;
        Ok(wei_to_value(unassigned, decimals))
    }

    pub async fn beneficiary(&self, index: u64) -> Result<Address> {
        Ok(self.wallet.beneficiaries(U256::from(index)).call().await?)
    }

    pub async fn all_beneficiaries(&self) -> Result<Vec<Address>> {
        Ok(self.wallet.getAllBeneficiaries().call().await?)
    }

    /// Tokens vested for `beneficiary` and not yet sent.
    pub async fn available_tokens(&self, beneficiary: Address) -> Result<BigDecimal> {
        let available = self.wallet.getAvailableTokens(beneficiary).call().await?;
        let decimals = self.module.security_token_decimals().await?;
        Ok(wei_to_value(available, decimals))
    }

    pub async fn all_template_names(&self) -> Result<Vec<String>> {
        bytes32_to_strings(self.wallet.getAllTemplateNames().call().await?)
    }

    pub async fn all_templates(&self) -> Result<Vec<Template>> {
        let templates = self.wallet.getAllTemplates().call().await?;
        assert::are_same_length(&[
            ("names", templates.names.len()),
            ("numberOfTokens", templates.numberOfTokens.len()),
            ("duration", templates.duration.len()),
            ("frequency", templates.frequency.len()),
        ])?;
        let decimals = self.module.security_token_decimals().await?;
        (0..templates.names.len())
            .map(|i| {
                Ok(Template {
                    name: bytes32_to_string(templates.names[i])?,
                    number_of_tokens: wei_to_value(templates.numberOfTokens[i], decimals),
                    duration: to_u64(templates.duration[i], "duration")?,
                    frequency: to_u64(templates.frequency[i], "frequency")?,
                })
            })
            .collect()
    }

    pub async fn template_count(&self) -> Result<u64> {
        to_u64(self.wallet.getTemplateCount().call().await?, "template count")
    }

    pub async fn schedule(&self, beneficiary: Address, template_name: &str) -> Result<Schedule> {
        let name = string_to_bytes32(template_name)?;
        log::debug!("getSchedule({beneficiary}, {template_name}) on {}", self.address());
        let schedule = self.wallet.getSchedule(beneficiary, name).call().await?;
        let decimals = self.module.security_token_decimals().await?;
        Ok(Schedule {
            template_name: template_name.to_owned(),
            number_of_tokens: wei_to_value(schedule.numberOfTokens, decimals),
            duration: to_u64(schedule.duration, "duration")?,
            frequency: to_u64(schedule.frequency, "frequency")?,
            start_time: timestamp_to_date(schedule.startTime)?,
            claimed_tokens: wei_to_value(schedule.claimedTokens, decimals),
            state: ScheduleState::try_from(schedule.state)?,
        })
    }

    /// Names of the templates `beneficiary` has schedules for.
    pub async fn template_names(&self, beneficiary: Address) -> Result<Vec<String>> {
        bytes32_to_strings(self.wallet.getTemplateNames(beneficiary).call().await?)
    }

    pub async fn schedule_count(&self, beneficiary: Address) -> Result<u64> {
        to_u64(
            self.wallet.getScheduleCount(beneficiary).call().await?,
            "schedule count",
        )
    }

    async fn raw_template_names(&self, beneficiary: Address) -> Result<Vec<B256>> {
        Ok(self.wallet.getTemplateNames(beneficiary).call().await?)
    }

    async fn raw_schedule_start(&self, beneficiary: Address, name: B256) -> Result<U256> {
        Ok(self.wallet.getSchedule(beneficiary, name).call().await?.startTime)
    }

    async fn check_template_exists(&self, name: B256, template_name: &str) -> Result<()> {
        ensure!(
            self.wallet.getAllTemplateNames().call().await?.contains(&name),
            NotFound,
            "Template '{template_name}' does not exist"
        );
        Ok(())
    }

    pub async fn change_treasury_wallet(&self, wallet: Address, tx: &TxParams) -> Result<PendingTx> {
        let from = self.contract().get_caller_address(tx).await?;
        self.module.check_security_token_owner(from).await?;
        assert::is_non_zero_address("treasury wallet", wallet)?;
        self.contract()
            .send(self.wallet.changeTreasuryWallet(wallet), from, tx)
            .await
    }

    pub async fn deposit_tokens(&self, amount: &BigDecimal, tx: &TxParams) -> Result<PendingTx> {
        let from = self.contract().get_caller_address(tx).await?;
        self.module.check_permission(from, Permission::Admin).await?;
        assert::is_positive("amount", amount)?;
        let decimals = self.module.security_token_decimals().await?;
        let amount = value_to_wei(amount, decimals)?;
        self.contract()
            .send(self.wallet.depositTokens(amount), from, tx)
            .await
    }

    /// Returns unassigned tokens to the treasury wallet.
    pub async fn send_to_treasury(&self, amount: &BigDecimal, tx: &TxParams) -> Result<PendingTx> {
        let from = self.contract().get_caller_address(tx).await?;
        self.module.check_permission(from, Permission::Admin).await?;
        assert::is_positive("amount", amount)?;
        let unassigned = self.unassigned_tokens().await?;
        ensure!(
            *amount <= unassigned,
            InvalidData,
            "Amount {amount} is greater than the unassigned tokens {unassigned}"
        );
        let decimals = self.module.security_token_decimals().await?;
        let amount = value_to_wei(amount, decimals)?;
        self.contract()
            .send(self.wallet.sendToTreasury(amount), from, tx)
            .await
    }

    pub async fn push_available_tokens(&self, beneficiary: Address, tx: &TxParams) -> Result<PendingTx> {
        let from = self.contract().get_caller_address(tx).await?;
        self.module.check_permission(from, Permission::Operator).await?;
        assert::is_non_zero_address("beneficiary", beneficiary)?;
        self.contract()
            .send(self.wallet.pushAvailableTokens(beneficiary), from, tx)
            .await
    }

    /// Pushes tokens to the beneficiaries in `from_index..=to_index`.
    ///
    /// The indices are forwarded as given.
    pub async fn push_available_tokens_multi(
        &self,
        from_index: u64,
        to_index: u64,
        tx: &TxParams,
    ) -> Result<PendingTx> {
        let from = self.contract().get_caller_address(tx).await?;
        self.module.check_permission(from, Permission::Operator).await?;
        self.contract()
            .send(
                self.wallet
                    .pushAvailableTokensMulti(U256::from(from_index), U256::from(to_index)),
                from,
                tx,
            )
            .await
    }

    /// Sends the caller's vested tokens to the caller.
    pub async fn pull_available_tokens(&self, tx: &TxParams) -> Result<PendingTx> {
        let from = self.contract().get_caller_address(tx).await?;
        self.module.check_not_paused().await?;
        self.contract()
            .send(self.wallet.pullAvailableTokens(), from, tx)
            .await
    }

    pub async fn add_template(&self, params: &TemplateParams, tx: &TxParams) -> Result<PendingTx> {
        let from = self.contract().get_caller_address(tx).await?;
        self.module.check_permission(from, Permission::Admin).await?;
        check_template_shape(
            &params.name,
            &params.number_of_tokens,
            params.duration,
            params.frequency,
        )?;
        let name = string_to_bytes32(&params.name)?;
        ensure!(
            !self.wallet.getAllTemplateNames().call().await?.contains(&name),
            AlreadyExists,
            "Template '{}' already exists",
            params.name
        );
        let decimals = self.module.security_token_decimals().await?;
        let granularity = self.module.security_token_granularity().await?;
        let tokens = value_to_wei(&params.number_of_tokens, decimals)?;
        check_template_math(tokens, params.duration, params.frequency, granularity)?;
        self.contract()
            .send(
                self.wallet.addTemplate(
                    name,
                    tokens,
                    U256::from(params.duration),
                    U256::from(params.frequency),
                ),
                from,
                tx,
            )
            .await
    }

    /// Removes a template. Schedules created from it are not checked.
    pub async fn remove_template(&self, name: &str, tx: &TxParams) -> Result<PendingTx> {
        let from = self.contract().get_caller_address(tx).await?;
        self.module.check_permission(from, Permission::Admin).await?;
        assert::is_non_empty_string("template name", name)?;
        let word = string_to_bytes32(name)?;
        self.check_template_exists(word, name).await?;
        self.contract()
            .send(self.wallet.removeTemplate(word), from, tx)
            .await
    }

    /// Creates a template named `template_name` and a schedule using it.
    pub async fn add_schedule(&self, params: &ScheduleParams, tx: &TxParams) -> Result<PendingTx> {
        let from = self.contract().get_caller_address(tx).await?;
        self.module.check_permission(from, Permission::Admin).await?;
        assert::is_non_zero_address("beneficiary", params.beneficiary)?;
        check_template_shape(
            &params.template_name,
            &params.number_of_tokens,
            params.duration,
            params.frequency,
        )?;
        assert::is_future_date(params.start_time, "Start time must be in the future")?;
        let name = string_to_bytes32(&params.template_name)?;
        ensure!(
            !self.wallet.getAllTemplateNames().call().await?.contains(&name),
            AlreadyExists,
            "Template '{}' already exists",
            params.template_name
        );
        let decimals = self.module.security_token_decimals().await?;
        let granularity = self.module.security_token_granularity().await?;
        let tokens = value_to_wei(&params.number_of_tokens, decimals)?;
        check_template_math(tokens, params.duration, params.frequency, granularity)?;
        self.contract()
            .send(
                self.wallet.addSchedule(
                    params.beneficiary,
                    name,
                    tokens,
                    U256::from(params.duration),
                    U256::from(params.frequency),
                    date_to_timestamp(params.start_time),
                ),
                from,
                tx,
            )
            .await
    }

    pub async fn add_schedule_from_template(
        &self,
        beneficiary: Address,
        template_name: &str,
        start_time: DateTime<Utc>,
        tx: &TxParams,
    ) -> Result<PendingTx> {
        let from = self.contract().get_caller_address(tx).await?;
        self.module.check_permission(from, Permission::Admin).await?;
        assert::is_non_zero_address("beneficiary", beneficiary)?;
        assert::is_non_empty_string("template name", template_name)?;
        assert::is_future_date(start_time, "Start time must be in the future")?;
        let name = string_to_bytes32(template_name)?;
        self.check_template_exists(name, template_name).await?;
        ensure!(
            !self.raw_template_names(beneficiary).await?.contains(&name),
            AlreadyExists,
            "{beneficiary} already has a schedule from template '{template_name}'"
        );
        self.contract()
            .send(
                self.wallet
                    .addScheduleFromTemplate(beneficiary, name, date_to_timestamp(start_time)),
                from,
                tx,
            )
            .await
    }

    /// Moves the start of a schedule that has not started yet.
    pub async fn modify_schedule(
        &self,
        beneficiary: Address,
        template_name: &str,
        start_time: DateTime<Utc>,
        tx: &TxParams,
    ) -> Result<PendingTx> {
        let from = self.contract().get_caller_address(tx).await?;
        self.module.check_permission(from, Permission::Admin).await?;
        assert::is_non_zero_address("beneficiary", beneficiary)?;
        assert::is_non_empty_string("template name", template_name)?;
        assert::is_future_date(start_time, "Start time must be in the future")?;
        let name = string_to_bytes32(template_name)?;
        self.check_modifiable(beneficiary, name, template_name).await?;
        self.contract()
            .send(
                self.wallet
                    .modifySchedule(beneficiary, name, date_to_timestamp(start_time)),
                from,
                tx,
            )
            .await
    }

    pub async fn revoke_schedule(
        &self,
        beneficiary: Address,
        template_name: &str,
        tx: &TxParams,
    ) -> Result<PendingTx> {
        let from = self.contract().get_caller_address(tx).await?;
        self.module.check_permission(from, Permission::Admin).await?;
        assert::is_non_zero_address("beneficiary", beneficiary)?;
        assert::is_non_empty_string("template name", template_name)?;
        let name = string_to_bytes32(template_name)?;
        ensure!(
            self.raw_template_names(beneficiary).await?.contains(&name),
            NotFound,
            "{beneficiary} has no schedule from template '{template_name}'"
        );
        self.contract()
            .send(self.wallet.revokeSchedule(beneficiary, name), from, tx)
            .await
    }

    pub async fn revoke_all_schedules(&self, beneficiary: Address, tx: &TxParams) -> Result<PendingTx> {
        let from = self.contract().get_caller_address(tx).await?;
        self.module.check_permission(from, Permission::Admin).await?;
        assert::is_non_zero_address("beneficiary", beneficiary)?;
        self.contract()
            .send(self.wallet.revokeAllSchedules(beneficiary), from, tx)
            .await
    }

    pub async fn add_schedule_multi(
        &self,
        params: &ScheduleMultiParams,
        tx: &TxParams,
    ) -> Result<PendingTx> {
        assert::are_same_length(&[
            ("beneficiaries", params.beneficiaries.len()),
            ("templateNames", params.template_names.len()),
            ("numberOfTokens", params.number_of_tokens.len()),
            ("durations", params.durations.len()),
            ("frequencies", params.frequencies.len()),
            ("startTimes", params.start_times.len()),
        ])?;
        let from = self.contract().get_caller_address(tx).await?;
        self.module.check_permission(from, Permission::Admin).await?;
        assert::is_non_empty_list("beneficiaries", &params.beneficiaries)?;
        assert::are_non_zero_addresses("beneficiary", &params.beneficiaries)?;
        for i in 0..params.beneficiaries.len() {
            check_template_shape(
                &params.template_names[i],
                &params.number_of_tokens[i],
                params.durations[i],
                params.frequencies[i],
            )?;
            assert::is_future_date(params.start_times[i], "Start time must be in the future")?;
        }
        let names = strings_to_bytes32(&params.template_names)?;
        let existing = self.wallet.getAllTemplateNames().call().await?;
        for (name, word) in params.template_names.iter().zip(&names) {
            ensure!(
                !existing.contains(word),
                AlreadyExists,
                "Template '{name}' already exists"
            );
        }
        let decimals = self.module.security_token_decimals().await?;
        let granularity = self.module.security_token_granularity().await?;
        let tokens = params
            .number_of_tokens
            .iter()
            .map(|amount| value_to_wei(amount, decimals))
            .collect::<Result<Vec<_>>>()?;
        for i in 0..tokens.len() {
            check_template_math(
                tokens[i],
                params.durations[i],
                params.frequencies[i],
                granularity,
            )?;
        }
        let to_u256 = |values: &[u64]| -> Vec<U256> { values.iter().copied().map(U256::from).collect() };
        self.contract()
            .send(
                self.wallet.addScheduleMulti(
                    params.beneficiaries.clone(),
                    names,
                    tokens,
                    to_u256(&params.durations),
                    to_u256(&params.frequencies),
                    params.start_times.iter().copied().map(date_to_timestamp).collect(),
                ),
                from,
                tx,
            )
            .await
    }

    pub async fn add_schedule_from_template_multi(
        &self,
        params: &ScheduleFromTemplateMultiParams,
        tx: &TxParams,
    ) -> Result<PendingTx> {
        params.check_lengths()?;
        let from = self.contract().get_caller_address(tx).await?;
        self.module.check_permission(from, Permission::Admin).await?;
        assert::are_non_zero_addresses("beneficiary", &params.beneficiaries)?;
        params
            .template_names
            .iter()
            .try_for_each(|name| assert::is_non_empty_string("template name", name))?;
        params
            .start_times
            .iter()
            .try_for_each(|start| assert::is_future_date(*start, "Start time must be in the future"))?;
        let names = strings_to_bytes32(&params.template_names)?;
        let templates = self.wallet.getAllTemplateNames().call().await?;
        for (name, word) in params.template_names.iter().zip(&names) {
            ensure!(templates.contains(word), NotFound, "Template '{name}' does not exist");
        }
        let assigned = try_join_all(
            params
                .beneficiaries
                .iter()
                .map(|beneficiary| self.raw_template_names(*beneficiary)),
        )
        .await?;
        for (i, assigned) in assigned.iter().enumerate() {
            ensure!(
                !assigned.contains(&names[i]),
                AlreadyExists,
                "{} already has a schedule from template '{}'",
                params.beneficiaries[i],
                params.template_names[i]
            );
        }
        self.contract()
            .send(
                self.wallet.addScheduleFromTemplateMulti(
                    params.beneficiaries.clone(),
                    names,
                    params.start_times.iter().copied().map(date_to_timestamp).collect(),
                ),
                from,
                tx,
            )
            .await
    }

    pub async fn modify_schedule_multi(
        &self,
        params: &ScheduleFromTemplateMultiParams,
        tx: &TxParams,
    ) -> Result<PendingTx> {
        params.check_lengths()?;
        let from = self.contract().get_caller_address(tx).await?;
        self.module.check_permission(from, Permission::Admin).await?;
        assert::are_non_zero_addresses("beneficiary", &params.beneficiaries)?;
        params
            .start_times
            .iter()
            .try_for_each(|start| assert::is_future_date(*start, "Start time must be in the future"))?;
        let names = strings_to_bytes32(&params.template_names)?;
        try_join_all(
            params
                .beneficiaries
                .iter()
                .zip(&names)
                .zip(&params.template_names)
                .map(|((beneficiary, word), name)| self.check_modifiable(*beneficiary, *word, name)),
        )
        .await?;
        self.contract()
            .send(
                self.wallet.modifyScheduleMulti(
                    params.beneficiaries.clone(),
                    names,
                    params.start_times.iter().copied().map(date_to_timestamp).collect(),
                ),
                from,
                tx,
            )
            .await
    }

    pub async fn revoke_schedules_multi(
        &self,
        beneficiaries: &[Address],
        tx: &TxParams,
    ) -> Result<PendingTx> {
        let from = self.contract().get_caller_address(tx).await?;
        self.module.check_permission(from, Permission::Admin).await?;
        assert::is_non_empty_list("beneficiaries", beneficiaries)?;
        assert::are_non_zero_addresses("beneficiary", beneficiaries)?;
        self.contract()
            .send(self.wallet.revokeSchedulesMulti(beneficiaries.to_vec()), from, tx)
            .await
    }

    /// The schedule must exist and must not have started.
    async fn check_modifiable(&self, beneficiary: Address, name: B256, template_name: &str) -> Result<()> {
        ensure!(
            self.raw_template_names(beneficiary).await?.contains(&name),
            NotFound,
            "{beneficiary} has no schedule from template '{template_name}'"
        );
        let start = self.raw_schedule_start(beneficiary, name).await?;
        ensure!(
            start > date_to_timestamp(Utc::now()),
            PreconditionRequired,
            "The schedule of {beneficiary} from template '{template_name}' already started"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorCode;

    #[test]
    fn test_template_math() {
        // 4 periods of 250 tokens, granularity 50
        assert!(check_template_math(U256::from(1000u64), 400, 100, U256::from(50u64)).is_ok());
        assert!(check_template_math(U256::from(1000u64), 100, 100, U256::from(1u64)).is_ok());
    }

    #[test]
    fn test_template_math_rejects_partial_period() {
        let err = check_template_math(U256::from(1000u64), 450, 100, U256::from(1u64)).unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::InvalidData));
    }

    #[test]
    fn test_template_math_rejects_uneven_release() {
        let err = check_template_math(U256::from(1000u64), 300, 100, U256::from(1u64)).unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::InvalidData));
    }

    #[test]
    fn test_template_math_rejects_granularity_remainder() {
        // 4 periods of 250 tokens, granularity 100
        let err = check_template_math(U256::from(1000u64), 400, 100, U256::from(100u64)).unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::InvalidData));
    }

    #[test]
    fn test_template_shape() {
        let tokens = BigDecimal::from(10);
        assert!(check_template_shape("team", &tokens, 100, 10).is_ok());
        assert!(check_template_shape("", &tokens, 100, 10).is_err());
        assert!(check_template_shape("team", &BigDecimal::from(0), 100, 10).is_err());
        assert!(check_template_shape("team", &tokens, 0, 10).is_err());
        assert!(check_template_shape("team", &tokens, 100, 0).is_err());
        assert!(check_template_shape("team", &tokens, 105, 10).is_err());
    }
}
