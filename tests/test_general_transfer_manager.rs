use alloy::primitives::{B256, U256};
use chrono::{DateTime, Duration, Utc};
use polymath_contract_wrappers::general_transfer_manager::{
    InvestorFlagMultiParams, KycMultiParams, KycParams,
};
use polymath_contract_wrappers::utils::date_to_timestamp;
use polymath_contract_wrappers::{ErrorCode, FlagsType, TransferType, TxParams};
use polymath_test_utils::{
    CONTRACT, HOLDER, MockChain, SECURITY_TOKEN, STRANGER, TOKEN_OWNER, init_logger,
};

#[tokio::test]
async fn test_kyc_data_pairs_investors_with_dates() -> anyhow::Result<()> {
    init_logger(false);
    let chain = MockChain::new();
    let gtm = chain.client().general_transfer_manager(CONTRACT);
    let now = Utc::now();
    let later = now + Duration::days(365);

    chain.push_return((
        vec![date_to_timestamp(now), U256::ZERO],
        vec![date_to_timestamp(now), U256::ZERO],
        vec![date_to_timestamp(later), U256::ZERO],
    ));
    let data = gtm.kyc_data(&[HOLDER, STRANGER]).await?;
    assert_eq!(data.len(), 2);
    assert_eq!(data[0].investor, HOLDER);
    assert_eq!(data[0].expiry_time.timestamp(), later.timestamp());
    assert_eq!(data[1].investor, STRANGER);
    assert_eq!(data[1].expiry_time.timestamp(), 0);
    Ok(())
}

#[tokio::test]
async fn test_kyc_data_of_wrong_length_is_rejected() -> anyhow::Result<()> {
    init_logger(false);
    let chain = MockChain::new();
    let gtm = chain.client().general_transfer_manager(CONTRACT);

    chain.push_return((vec![U256::ZERO], vec![U256::ZERO], vec![U256::ZERO]));
    let err = gtm.kyc_data(&[HOLDER, STRANGER]).await.unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::MismatchedArrayLength));
    Ok(())
}

#[tokio::test]
async fn test_investor_flags_unpacked() -> anyhow::Result<()> {
    init_logger(false);
    let chain = MockChain::new();
    let gtm = chain.client().general_transfer_manager(CONTRACT);

    chain.push_return((vec![HOLDER, STRANGER], vec![U256::from(1u8), U256::from(6u8)]));
    let flags = gtm.all_investor_flags().await?;
    assert!(flags[0].is_accredited && !flags[0].can_not_buy_from_sto);
    assert!(!flags[1].is_accredited && flags[1].can_not_buy_from_sto && flags[1].is_vol_restricted);

    let json = serde_json::to_value(flags[0])?;
    assert_eq!(json["is_accredited"], true);
    assert_eq!(json["is_vol_restricted"], false);
    Ok(())
}

#[tokio::test]
async fn test_transfer_requirements() -> anyhow::Result<()> {
    init_logger(false);
    let chain = MockChain::new();
    let gtm = chain.client().general_transfer_manager(CONTRACT);

    chain.push_return((true, false, true, false));
    let requirements = gtm.transfer_requirements(TransferType::Issuance).await?;
    assert!(requirements.from_valid_kyc);
    assert!(!requirements.to_valid_kyc);
    assert!(requirements.from_restricted);
    Ok(())
}

#[tokio::test]
async fn test_modify_kyc_data() -> anyhow::Result<()> {
    init_logger(false);
    let chain = MockChain::new();
    let gtm = chain.client_with_sender(TOKEN_OWNER).general_transfer_manager(CONTRACT);
    let now = Utc::now();
    let params = KycParams::builder()
        .investor(HOLDER)
        .can_send_after(now)
        .can_receive_after(now)
        .expiry_time(now + Duration::days(30))
        .build();

    chain.push_return(SECURITY_TOKEN);
    chain.push_return(TOKEN_OWNER);
    chain.push_gas_estimate(70_000);
    chain.push_tx_hash(B256::repeat_byte(0x21));
    gtm.modify_kyc_data(&params, &TxParams::default()).await?;
    Ok(())
}

#[tokio::test]
async fn test_kyc_expiry_before_epoch() -> anyhow::Result<()> {
    init_logger(false);
    let chain = MockChain::new();
    let gtm = chain.client_with_sender(TOKEN_OWNER).general_transfer_manager(CONTRACT);
    let now = Utc::now();
    let params = KycParams::builder()
        .investor(HOLDER)
        .can_send_after(now)
        .can_receive_after(now)
        .expiry_time(DateTime::UNIX_EPOCH - Duration::days(1))
        .build();

    chain.push_return(SECURITY_TOKEN);
    chain.push_return(TOKEN_OWNER);
    let err = gtm
        .modify_kyc_data(&params, &TxParams::default())
        .await
        .unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::InvalidData));
    Ok(())
}

#[tokio::test]
async fn test_kyc_multi_lengths_must_match() -> anyhow::Result<()> {
    init_logger(false);
    let chain = MockChain::new();
    let gtm = chain.client_with_sender(TOKEN_OWNER).general_transfer_manager(CONTRACT);
    let now = Utc::now();
    let params = KycMultiParams::builder()
        .investors(vec![HOLDER, STRANGER])
        .can_send_after(vec![now, now])
        .can_receive_after(vec![now])
        .expiry_time(vec![now, now])
        .build();

    let err = gtm
        .modify_kyc_data_multi(&params, &TxParams::default())
        .await
        .unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::MismatchedArrayLength));
    Ok(())
}

#[tokio::test]
async fn test_flags_require_admin() -> anyhow::Result<()> {
    init_logger(false);
    let chain = MockChain::new();
    let gtm = chain.client_with_sender(STRANGER).general_transfer_manager(CONTRACT);
    let params = InvestorFlagMultiParams::builder()
        .investors(vec![HOLDER])
        .flags(vec![FlagsType::IsAccredited])
        .values(vec![true])
        .build();

    chain.push_return(SECURITY_TOKEN);
    chain.push_return(TOKEN_OWNER);
    chain.push_return(false);
    let err = gtm
        .modify_investor_flag_multi(&params, &TxParams::default())
        .await
        .unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::Unauthorized));
    Ok(())
}
