use std::str::FromStr;

use alloy::primitives::{B256, U256};
use bigdecimal::BigDecimal;
use chrono::{DateTime, Duration, Utc};
use polymath_contract_wrappers::utils::date_to_timestamp;
use polymath_contract_wrappers::volume_restriction_tm::{
    DailyRestrictionMultiParams, DailyRestrictionParams, RestrictionMultiParams,
    RestrictionParams,
};
use polymath_contract_wrappers::{ErrorCode, RestrictionType, TxParams};
use polymath_test_utils::{
    CONTRACT, HOLDER, MockChain, SECURITY_TOKEN, STRANGER, TOKEN_OWNER, init_logger,
};

type RawRestriction = (U256, U256, U256, U256, u8);

fn raw(allowed: U256, start: DateTime<Utc>, rolling: u64, end: DateTime<Utc>, kind: u8) -> RawRestriction {
    (
        allowed,
        date_to_timestamp(start),
        U256::from(rolling),
        date_to_timestamp(end),
        kind,
    )
}

fn none() -> RawRestriction {
    (U256::ZERO, U256::ZERO, U256::ZERO, U256::ZERO, 0)
}

fn restriction(rolling: u64, days: i64) -> RestrictionParams {
    let start = Utc::now() + Duration::hours(1);
    RestrictionParams::builder()
        .allowed_tokens(BigDecimal::from(100))
        .start_time(start)
        .rolling_period_in_days(rolling)
        .end_time(start + Duration::days(days))
        .restriction_type(RestrictionType::Fixed)
        .build()
}

/// Queues the reads of an Admin check passed by the token owner.
fn push_owner_check(chain: &MockChain) {
    chain.push_return(SECURITY_TOKEN);
    chain.push_return(TOKEN_OWNER);
}

#[tokio::test]
async fn test_fixed_restriction_uses_token_decimals() -> anyhow::Result<()> {
    init_logger(false);
    let chain = MockChain::new();
    let vrtm = chain.client().volume_restriction_tm(CONTRACT);
    let start = Utc::now() + Duration::days(1);

    chain.push_return(raw(U256::from(1_500u64), start, 3, start + Duration::days(10), 0));
    chain.push_return(SECURITY_TOKEN);
    chain.push_return(2u8);
    let restriction = vrtm.individual_restriction(HOLDER).await?;
    assert_eq!(restriction.allowed_tokens, BigDecimal::from(15));
    assert_eq!(restriction.restriction_type, RestrictionType::Fixed);
    assert_eq!(restriction.rolling_period_in_days, 3);
    assert_eq!(restriction.start_time.timestamp(), start.timestamp());
    Ok(())
}

#[tokio::test]
async fn test_one_whole_token_at_eighteen_decimals() -> anyhow::Result<()> {
    init_logger(false);
    let chain = MockChain::new();
    let vrtm = chain.client().volume_restriction_tm(CONTRACT);
    let start = Utc::now() + Duration::days(1);

    chain.push_return(raw(
        U256::from(1_000_000_000_000_000_000u128),
        start,
        1,
        start + Duration::days(5),
        0,
    ));
    chain.push_return(SECURITY_TOKEN);
    chain.push_return(18u8);
    let restriction = vrtm.individual_restriction(HOLDER).await?;
    assert_eq!(restriction.allowed_tokens, BigDecimal::from(1));
    assert_eq!(restriction.restriction_type, RestrictionType::Fixed);
    Ok(())
}

#[tokio::test]
async fn test_restriction_data_mixes_fixed_and_percentage() -> anyhow::Result<()> {
    init_logger(false);
    let chain = MockChain::new();
    let vrtm = chain.client().volume_restriction_tm(CONTRACT);
    let start = date_to_timestamp(Utc::now() + Duration::days(1));
    let end = date_to_timestamp(Utc::now() + Duration::days(30));

    chain.push_return((
        vec![HOLDER, STRANGER],
        vec![U256::from(2_500u64), U256::from(50_000_000_000_000_000u128)],
        vec![start, start],
        vec![U256::from(7u8), U256::from(1u8)],
        vec![end, end],
        vec![0u8, 1u8],
    ));
    chain.push_return(SECURITY_TOKEN);
    chain.push_return(3u8);
    let data = vrtm.restriction_data().await?;
    assert_eq!(data.len(), 2);
    assert_eq!(data[0].holder, HOLDER);
    assert_eq!(data[0].restriction.allowed_tokens, "2.5".parse::<BigDecimal>()?);
    assert_eq!(data[0].restriction.restriction_type, RestrictionType::Fixed);
    assert_eq!(data[1].holder, STRANGER);
    assert_eq!(data[1].restriction.allowed_tokens, BigDecimal::from(5));
    assert_eq!(data[1].restriction.restriction_type, RestrictionType::Percentage);
    assert_eq!(data[1].restriction.rolling_period_in_days, 1);
    Ok(())
}

#[tokio::test]
async fn test_restriction_data_of_percentages_skips_decimals() -> anyhow::Result<()> {
    init_logger(false);
    let chain = MockChain::new();
    let vrtm = chain.client().volume_restriction_tm(CONTRACT);
    let start = date_to_timestamp(Utc::now() + Duration::days(1));

    chain.push_return((
        vec![HOLDER],
        vec![U256::from(100_000_000_000_000_000u128)],
        vec![start],
        vec![U256::from(1u8)],
        vec![start],
        vec![1u8],
    ));
    let data = vrtm.restriction_data().await?;
    assert_eq!(data[0].restriction.allowed_tokens, BigDecimal::from(10));
    Ok(())
}

#[tokio::test]
async fn test_percentage_restriction_uses_sixteen_decimals() -> anyhow::Result<()> {
    init_logger(false);
    let chain = MockChain::new();
    let vrtm = chain.client().volume_restriction_tm(CONTRACT);
    let start = Utc::now() + Duration::days(1);

    // 12.5% of the supply, no token decimals read
    chain.push_return(raw(
        U256::from(125_000_000_000_000_000u128),
        start,
        1,
        start + Duration::days(1),
        1,
    ));
    let restriction = vrtm.default_restriction().await?;
    assert_eq!(restriction.allowed_tokens, BigDecimal::from_str("12.5")?);
    assert_eq!(restriction.restriction_type, RestrictionType::Percentage);
    Ok(())
}

#[tokio::test]
async fn test_add_individual_restriction() -> anyhow::Result<()> {
    init_logger(false);
    let chain = MockChain::new();
    let vrtm = chain.client_with_sender(TOKEN_OWNER).volume_restriction_tm(CONTRACT);
    let hash = B256::repeat_byte(0x42);

    push_owner_check(&chain);
    chain.push_return(none());
    chain.push_return(SECURITY_TOKEN);
    chain.push_return(18u8);
    chain.push_gas_estimate(200_000);
    chain.push_tx_hash(hash);
    let pending = vrtm
        .add_individual_restriction(HOLDER, &restriction(3, 3), &TxParams::default())
        .await?;
    assert_eq!(*pending.tx_hash(), hash);
    Ok(())
}

#[tokio::test]
async fn test_restriction_shorter_than_rolling_period() -> anyhow::Result<()> {
    init_logger(false);
    let chain = MockChain::new();
    let vrtm = chain.client_with_sender(TOKEN_OWNER).volume_restriction_tm(CONTRACT);

    push_owner_check(&chain);
    let err = vrtm
        .add_individual_restriction(HOLDER, &restriction(5, 3), &TxParams::default())
        .await
        .unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::InvalidData));
    Ok(())
}

#[tokio::test]
async fn test_restriction_starting_in_the_past() -> anyhow::Result<()> {
    init_logger(false);
    let chain = MockChain::new();
    let vrtm = chain.client_with_sender(TOKEN_OWNER).volume_restriction_tm(CONTRACT);
    let mut params = restriction(1, 2);
    params.start_time = Utc::now() - Duration::hours(1);

    push_owner_check(&chain);
    let err = vrtm
        .add_default_restriction(&params, &TxParams::default())
        .await
        .unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::TooEarly));
    Ok(())
}

#[tokio::test]
async fn test_holder_with_active_restriction() -> anyhow::Result<()> {
    init_logger(false);
    let chain = MockChain::new();
    let vrtm = chain.client_with_sender(TOKEN_OWNER).volume_restriction_tm(CONTRACT);
    let start = Utc::now() - Duration::days(1);

    push_owner_check(&chain);
    chain.push_return(raw(U256::from(1u64), start, 1, start + Duration::days(30), 0));
    let err = vrtm
        .add_individual_restriction(HOLDER, &restriction(3, 3), &TxParams::default())
        .await
        .unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::AlreadyExists));
    Ok(())
}

#[tokio::test]
async fn test_admin_permission_required() -> anyhow::Result<()> {
    init_logger(false);
    let chain = MockChain::new();
    let vrtm = chain.client_with_sender(STRANGER).volume_restriction_tm(CONTRACT);

    chain.push_return(SECURITY_TOKEN);
    chain.push_return(TOKEN_OWNER);
    chain.push_return(false);
    let err = vrtm
        .add_individual_restriction(HOLDER, &restriction(3, 3), &TxParams::default())
        .await
        .unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::Unauthorized));
    Ok(())
}

#[tokio::test]
async fn test_delegate_with_admin_permission() -> anyhow::Result<()> {
    init_logger(false);
    let chain = MockChain::new();
    let vrtm = chain.client_with_sender(STRANGER).volume_restriction_tm(CONTRACT);

    chain.push_return(SECURITY_TOKEN);
    chain.push_return(TOKEN_OWNER);
    chain.push_return(true);
    chain.push_return(vec![HOLDER]);
    chain.push_gas_estimate(60_000);
    chain.push_tx_hash(B256::repeat_byte(3));
    vrtm.change_exempt_wallet_list(HOLDER, false, &TxParams::default())
        .await?;
    Ok(())
}

#[tokio::test]
async fn test_holder_with_active_daily_restriction() -> anyhow::Result<()> {
    init_logger(false);
    let chain = MockChain::new();
    let vrtm = chain.client_with_sender(TOKEN_OWNER).volume_restriction_tm(CONTRACT);
    let start = Utc::now() + Duration::hours(1);
    let params = DailyRestrictionMultiParams::builder()
        .holders(vec![HOLDER])
        .allowed_tokens(vec![BigDecimal::from(10)])
        .start_times(vec![start])
        .end_times(vec![start + Duration::days(2)])
        .restriction_types(vec![RestrictionType::Fixed])
        .build();

    push_owner_check(&chain);
    let active = Utc::now() - Duration::days(1);
    chain.push_return(raw(U256::from(1u64), active, 1, active + Duration::days(30), 0));
    let err = vrtm
        .add_individual_daily_restriction_multi(&params, &TxParams::default())
        .await
        .unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::AlreadyExists));
    assert!(err.to_string().contains("individual daily restriction"));
    Ok(())
}

#[tokio::test]
async fn test_exempting_twice() -> anyhow::Result<()> {
    init_logger(false);
    let chain = MockChain::new();
    let vrtm = chain.client_with_sender(TOKEN_OWNER).volume_restriction_tm(CONTRACT);

    push_owner_check(&chain);
    chain.push_return(vec![HOLDER]);
    let err = vrtm
        .change_exempt_wallet_list(HOLDER, true, &TxParams::default())
        .await
        .unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::AlreadyExists));
    Ok(())
}

#[tokio::test]
async fn test_multi_lengths_checked_before_any_read() -> anyhow::Result<()> {
    init_logger(false);
    let chain = MockChain::new();
    let vrtm = chain.client().volume_restriction_tm(CONTRACT);
    let start = Utc::now() + Duration::days(1);
    let end = start + Duration::days(2);
    let params = RestrictionMultiParams::builder()
        .holders(vec![HOLDER, STRANGER, TOKEN_OWNER])
        .allowed_tokens(vec![BigDecimal::from(1), BigDecimal::from(2)])
        .start_times(vec![start; 3])
        .rolling_period_in_days(vec![1; 3])
        .end_times(vec![end; 3])
        .restriction_types(vec![RestrictionType::Fixed; 3])
        .build();

    // nothing queued: a caller lookup or permission read would fail differently
    let err = vrtm
        .add_individual_restriction_multi(&params, &TxParams::default())
        .await
        .unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::MismatchedArrayLength));
    Ok(())
}

#[tokio::test]
async fn test_modify_started_restriction() -> anyhow::Result<()> {
    init_logger(false);
    let chain = MockChain::new();
    let vrtm = chain.client_with_sender(TOKEN_OWNER).volume_restriction_tm(CONTRACT);
    let start = Utc::now() - Duration::days(2);

    push_owner_check(&chain);
    chain.push_return(raw(U256::from(10u64), start, 1, start + Duration::days(10), 0));
    let err = vrtm
        .modify_individual_restriction(HOLDER, &restriction(3, 3), &TxParams::default())
        .await
        .unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::PreconditionRequired));
    Ok(())
}

#[tokio::test]
async fn test_modify_missing_daily_restriction() -> anyhow::Result<()> {
    init_logger(false);
    let chain = MockChain::new();
    let vrtm = chain.client_with_sender(TOKEN_OWNER).volume_restriction_tm(CONTRACT);
    let start = Utc::now() + Duration::hours(2);
    let daily = DailyRestrictionParams::builder()
        .allowed_tokens(BigDecimal::from(5))
        .start_time(start)
        .end_time(start + Duration::days(5))
        .restriction_type(RestrictionType::Percentage)
        .build();

    push_owner_check(&chain);
    chain.push_return(none());
    let err = vrtm
        .modify_individual_daily_restriction(HOLDER, &daily, &TxParams::default())
        .await
        .unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::NotFound));
    Ok(())
}

#[tokio::test]
async fn test_remove_restrictions_of_several_holders() -> anyhow::Result<()> {
    init_logger(false);
    let chain = MockChain::new();
    let vrtm = chain.client_with_sender(TOKEN_OWNER).volume_restriction_tm(CONTRACT);
    let start = Utc::now() + Duration::days(1);
    let existing = raw(U256::from(10u64), start, 1, start + Duration::days(3), 0);

    push_owner_check(&chain);
    chain.push_return(existing);
    chain.push_return(existing);
    chain.push_gas_estimate(90_000);
    chain.push_tx_hash(B256::repeat_byte(4));
    vrtm.remove_individual_restriction_multi(&[HOLDER, STRANGER], &TxParams::default())
        .await?;
    Ok(())
}

#[tokio::test]
async fn test_remove_missing_default_restriction() -> anyhow::Result<()> {
    init_logger(false);
    let chain = MockChain::new();
    let vrtm = chain.client_with_sender(TOKEN_OWNER).volume_restriction_tm(CONTRACT);

    push_owner_check(&chain);
    chain.push_return(none());
    let err = vrtm
        .remove_default_restriction(&TxParams::default())
        .await
        .unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::NotFound));
    Ok(())
}
