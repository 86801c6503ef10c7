use alloy::primitives::{Address, U256};
use alloy::providers::DynProvider;
use bon::Builder;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::abi::{GeneralTransferManager, IModule};
use crate::assert;
use crate::contract::ContractWrapper;
use crate::events::{EventSchema, IndexedKind};
use crate::module::{ModuleWrapper, impl_module};
use crate::tx::{PendingTx, TxParams};
use crate::types::{FlagsType, Permission, TransferType};
use crate::utils::{date_to_seconds, timestamp_to_date};
use crate::Result;

pub const GENERAL_TRANSFER_MANAGER_EVENTS: &[EventSchema] = &[
    EventSchema::of::<GeneralTransferManager::ChangeIssuanceAddress>(&[]),
    EventSchema::of::<GeneralTransferManager::ChangeDefaults>(&[]),
    EventSchema::of::<GeneralTransferManager::ModifyKYCData>(&[
        ("_investor", IndexedKind::Address),
        ("_addedBy", IndexedKind::Address),
    ]),
    EventSchema::of::<GeneralTransferManager::ModifyInvestorFlag>(&[
        ("_investor", IndexedKind::Address),
        ("_flag", IndexedKind::Uint),
    ]),
    EventSchema::of::<GeneralTransferManager::ModifyTransferRequirements>(&[]),
    EventSchema::of::<IModule::Pause>(&[]),
    EventSchema::of::<IModule::Unpause>(&[]),
];

/// Times applied to investors whose KYC entry leaves them unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Defaults {
    pub can_send_after: DateTime<Utc>,
    pub can_receive_after: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct KycData {
    pub investor: Address,
    pub can_send_after: DateTime<Utc>,
    pub can_receive_after: DateTime<Utc>,
    pub expiry_time: DateTime<Utc>,
}

/// Investor flags unpacked from their on-chain bit mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InvestorFlags {
    pub investor: Address,
    pub is_accredited: bool,
    pub can_not_buy_from_sto: bool,
    pub is_vol_restricted: bool,
}

impl InvestorFlags {
    fn from_mask(investor: Address, mask: U256) -> Self {
        let bit = |flag: FlagsType| mask.bit(usize::from(u8::from(flag)));
        Self {
            investor,
            is_accredited: bit(FlagsType::IsAccredited),
            can_not_buy_from_sto: bit(FlagsType::CanNotBuyFromSto),
            is_vol_restricted: bit(FlagsType::IsVolRestricted),
        }
    }
}

/// KYC checks applied to one transfer type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TransferRequirements {
    pub from_valid_kyc: bool,
    pub to_valid_kyc: bool,
    pub from_restricted: bool,
    pub to_restricted: bool,
}

#[derive(Debug, Clone, Builder)]
pub struct KycParams {
    pub investor: Address,
    pub can_send_after: DateTime<Utc>,
    pub can_receive_after: DateTime<Utc>,
    pub expiry_time: DateTime<Utc>,
}

/// Parallel arrays, one entry per investor.
#[derive(Debug, Clone, Builder)]
pub struct KycMultiParams {
    pub investors: Vec<Address>,
    pub can_send_after: Vec<DateTime<Utc>>,
    pub can_receive_after: Vec<DateTime<Utc>>,
    pub expiry_time: Vec<DateTime<Utc>>,
}

#[derive(Debug, Clone, Builder)]
pub struct InvestorFlagMultiParams {
    pub investors: Vec<Address>,
    pub flags: Vec<FlagsType>,
    pub values: Vec<bool>,
}

#[derive(Debug, Clone, Builder)]
pub struct TransferRequirementsParams {
    pub transfer_type: TransferType,
    pub from_valid_kyc: bool,
    pub to_valid_kyc: bool,
    pub from_restricted: bool,
    pub to_restricted: bool,
}

#[derive(Debug, Clone, Builder)]
pub struct TransferRequirementsMultiParams {
    pub transfer_types: Vec<TransferType>,
    pub from_valid_kyc: Vec<bool>,
    pub to_valid_kyc: Vec<bool>,
    pub from_restricted: Vec<bool>,
    pub to_restricted: Vec<bool>,
}

/// Transfer manager whitelisting investors by KYC dates and flags.
#[derive(Clone)]
pub struct GeneralTransferManagerWrapper {
    module: ModuleWrapper,
    gtm: GeneralTransferManager::GeneralTransferManagerInstance<DynProvider>,
}

impl_module!(GeneralTransferManagerWrapper);

fn seconds_to_date(seconds: u64) -> Result<DateTime<Utc>> {
    timestamp_to_date(U256::from(seconds))
}

impl GeneralTransferManagerWrapper {
    pub(crate) fn new(contract: ContractWrapper) -> Self {
        let gtm = GeneralTransferManager::new(contract.address(), contract.provider().clone());
        Self {
            module: ModuleWrapper::new(contract),
            gtm,
        }
    }

    pub fn address(&self) -> Address {
        self.module.address()
    }

    fn contract(&self) -> &ContractWrapper {
        self.module.contract()
    }

    pub async fn defaults(&self) -> Result<Defaults> {
        let defaults = self.gtm.defaults().call().await?;
        Ok(Defaults {
            can_send_after: seconds_to_date(defaults.canSendAfter)?,
            can_receive_after: seconds_to_date(defaults.canReceiveAfter)?,
        })
    }

    /// Address tokens are issued from.
    pub async fn issuance_address(&self) -> Result<Address> {
        Ok(self.gtm.issuanceAddress().call().await?)
    }

    pub async fn nonce_used(&self, signer: Address, nonce: U256) -> Result<bool> {
        Ok(self.gtm.nonceMap(signer, nonce).call().await?)
    }

    pub async fn all_investors(&self) -> Result<Vec<Address>> {
        Ok(self.gtm.getAllInvestors().call().await?)
    }

    /// Investors in the index range `from..=to`.
    pub async fn investors(&self, from: u64, to: u64) -> Result<Vec<Address>> {
        Ok(self
            .gtm
            .getInvestors(U256::from(from), U256::from(to))
            .call()
            .await?)
    }

    pub async fn all_kyc_data(&self) -> Result<Vec<KycData>> {
        let data = self.gtm.getAllKYCData().call().await?;
        assert::are_same_length(&[
            ("investors", data.investors.len()),
            ("canSendAfters", data.canSendAfters.len()),
            ("canReceiveAfters", data.canReceiveAfters.len()),
            ("expiryTimes", data.expiryTimes.len()),
        ])?;
        data.investors
            .into_iter()
            .zip(data.canSendAfters)
            .zip(data.canReceiveAfters)
            .zip(data.expiryTimes)
            .map(|(((investor, send), receive), expiry)| {
                Ok(KycData {
                    investor,
                    can_send_after: timestamp_to_date(send)?,
                    can_receive_after: timestamp_to_date(receive)?,
                    expiry_time: timestamp_to_date(expiry)?,
                })
            })
            .collect()
    }

    pub async fn kyc_data(&self, investors: &[Address]) -> Result<Vec<KycData>> {
        let data = self.gtm.getKYCData(investors.to_vec()).call().await?;
        assert::are_same_length(&[
            ("investors", investors.len()),
            ("canSendAfters", data.canSendAfters.len()),
            ("canReceiveAfters", data.canReceiveAfters.len()),
            ("expiryTimes", data.expiryTimes.len()),
        ])?;
        investors
            .iter()
            .zip(data.canSendAfters)
            .zip(data.canReceiveAfters)
            .zip(data.expiryTimes)
            .map(|(((investor, send), receive), expiry)| {
                Ok(KycData {
                    investor: *investor,
                    can_send_after: timestamp_to_date(send)?,
                    can_receive_after: timestamp_to_date(receive)?,
                    expiry_time: timestamp_to_date(expiry)?,
                })
            })
            .collect()
    }

    pub async fn investor_flag(&self, investor: Address, flag: FlagsType) -> Result<bool> {
        Ok(self
            .gtm
            .getInvestorFlag(investor, flag.into())
            .call()
            .await?)
    }

    pub async fn investor_flags(&self, investor: Address) -> Result<InvestorFlags> {
        let mask = self.gtm.getInvestorFlags(investor).call().await?;
        Ok(InvestorFlags::from_mask(investor, mask))
    }

    pub async fn all_investor_flags(&self) -> Result<Vec<InvestorFlags>> {
        let data = self.gtm.getAllInvestorFlags().call().await?;
        assert::are_same_length(&[
            ("investors", data.investors.len()),
            ("flags", data.flags.len()),
        ])?;
        Ok(data
            .investors
            .into_iter()
            .zip(data.flags)
            .map(|(investor, mask)| InvestorFlags::from_mask(investor, mask))
            .collect())
    }

    pub async fn transfer_requirements(
        &self,
        transfer_type: TransferType,
    ) -> Result<TransferRequirements> {
        let requirements = self
            .gtm
            .transferRequirements(transfer_type.into())
            .call()
            .await?;
        Ok(TransferRequirements {
            from_valid_kyc: requirements.fromValidKYC,
            to_valid_kyc: requirements.toValidKYC,
            from_restricted: requirements.fromRestricted,
            to_restricted: requirements.toRestricted,
        })
    }

    pub async fn change_defaults(
        &self,
        can_send_after: DateTime<Utc>,
        can_receive_after: DateTime<Utc>,
        tx: &TxParams,
    ) -> Result<PendingTx> {
        let from = self.contract().get_caller_address(tx).await?;
        self.module.check_permission(from, Permission::Admin).await?;
        self.contract()
            .send(
                self.gtm.changeDefaults(
                    date_to_seconds(can_send_after)?,
                    date_to_seconds(can_receive_after)?,
                ),
                from,
                tx,
            )
            .await
    }

    pub async fn change_issuance_address(
        &self,
        issuance_address: Address,
        tx: &TxParams,
    ) -> Result<PendingTx> {
        let from = self.contract().get_caller_address(tx).await?;
        self.module.check_permission(from, Permission::Admin).await?;
        assert::is_non_zero_address("issuance", issuance_address)?;
        self.contract()
            .send(self.gtm.changeIssuanceAddress(issuance_address), from, tx)
            .await
    }

    pub async fn modify_kyc_data(&self, params: &KycParams, tx: &TxParams) -> Result<PendingTx> {
        let from = self.contract().get_caller_address(tx).await?;
        self.module.check_permission(from, Permission::Admin).await?;
        assert::is_non_zero_address("investor", params.investor)?;
        self.contract()
            .send(
                self.gtm.modifyKYCData(
                    params.investor,
                    date_to_seconds(params.can_send_after)?,
                    date_to_seconds(params.can_receive_after)?,
                    date_to_seconds(params.expiry_time)?,
                ),
                from,
                tx,
            )
            .await
    }

    pub async fn modify_kyc_data_multi(
        &self,
        params: &KycMultiParams,
        tx: &TxParams,
    ) -> Result<PendingTx> {
        assert::are_same_length(&[
            ("investors", params.investors.len()),
            ("canSendAfter", params.can_send_after.len()),
            ("canReceiveAfter", params.can_receive_after.len()),
            ("expiryTime", params.expiry_time.len()),
        ])?;
        let from = self.contract().get_caller_address(tx).await?;
        self.module.check_permission(from, Permission::Admin).await?;
        assert::is_non_empty_list("investors", &params.investors)?;
        assert::are_non_zero_addresses("investor", &params.investors)?;
        let seconds = |dates: &[DateTime<Utc>]| -> Result<Vec<u64>> {
            dates.iter().copied().map(date_to_seconds).collect()
        };
        self.contract()
            .send(
                self.gtm.modifyKYCDataMulti(
                    params.investors.clone(),
                    seconds(&params.can_send_after)?,
                    seconds(&params.can_receive_after)?,
                    seconds(&params.expiry_time)?,
                ),
                from,
                tx,
            )
            .await
    }

    pub async fn modify_investor_flag(
        &self,
        investor: Address,
        flag: FlagsType,
        value: bool,
        tx: &TxParams,
    ) -> Result<PendingTx> {
        let from = self.contract().get_caller_address(tx).await?;
        self.module.check_permission(from, Permission::Admin).await?;
        assert::is_non_zero_address("investor", investor)?;
        self.contract()
            .send(
                self.gtm.modifyInvestorFlag(investor, flag.into(), value),
                from,
                tx,
            )
            .await
    }

    pub async fn modify_investor_flag_multi(
        &self,
        params: &InvestorFlagMultiParams,
        tx: &TxParams,
    ) -> Result<PendingTx> {
        assert::are_same_length(&[
            ("investors", params.investors.len()),
            ("flags", params.flags.len()),
            ("values", params.values.len()),
        ])?;
        let from = self.contract().get_caller_address(tx).await?;
        self.module.check_permission(from, Permission::Admin).await?;
        assert::is_non_empty_list("investors", &params.investors)?;
        assert::are_non_zero_addresses("investor", &params.investors)?;
        let flags = params.flags.iter().map(|flag| u8::from(*flag)).collect();
        self.contract()
            .send(
                self.gtm.modifyInvestorFlagMulti(
                    params.investors.clone(),
                    flags,
                    params.values.clone(),
                ),
                from,
                tx,
            )
            .await
    }

    pub async fn modify_transfer_requirements(
        &self,
        params: &TransferRequirementsParams,
        tx: &TxParams,
    ) -> Result<PendingTx> {
        let from = self.contract().get_caller_address(tx).await?;
        self.module.check_permission(from, Permission::Admin).await?;
        self.contract()
            .send(
                self.gtm.modifyTransferRequirements(
                    params.transfer_type.into(),
                    params.from_valid_kyc,
                    params.to_valid_kyc,
                    params.from_restricted,
                    params.to_restricted,
                ),
                from,
                tx,
            )
            .await
    }

    pub async fn modify_transfer_requirements_multi(
        &self,
        params: &TransferRequirementsMultiParams,
        tx: &TxParams,
    ) -> Result<PendingTx> {
        assert::are_same_length(&[
            ("transferTypes", params.transfer_types.len()),
            ("fromValidKYC", params.from_valid_kyc.len()),
            ("toValidKYC", params.to_valid_kyc.len()),
            ("fromRestricted", params.from_restricted.len()),
            ("toRestricted", params.to_restricted.len()),
        ])?;
        let from = self.contract().get_caller_address(tx).await?;
        self.module.check_permission(from, Permission::Admin).await?;
        assert::is_non_empty_list("transfer types", &params.transfer_types)?;
        let types = params
            .transfer_types
            .iter()
            .map(|transfer_type| u8::from(*transfer_type))
            .collect();
        self.contract()
            .send(
                self.gtm.modifyTransferRequirementsMulti(
                    types,
                    params.from_valid_kyc.clone(),
                    params.to_valid_kyc.clone(),
                    params.from_restricted.clone(),
                    params.to_restricted.clone(),
                ),
                from,
                tx,
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_investor_flags_from_mask() {
        let investor = Address::repeat_byte(3);
        let flags = InvestorFlags::from_mask(investor, U256::from(0b101u8));
        assert!(flags.is_accredited);
        assert!(!flags.can_not_buy_from_sto);
        assert!(flags.is_vol_restricted);

        let none = InvestorFlags::from_mask(investor, U256::ZERO);
        assert!(!none.is_accredited && !none.can_not_buy_from_sto && !none.is_vol_restricted);
    }
}
