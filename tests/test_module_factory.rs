use alloy::primitives::B256;
use polymath_contract_wrappers::utils::string_to_bytes32;
use polymath_contract_wrappers::{
    BoundType, ContractVersion, ErrorCode, ModuleType, OwnableContract, TxParams, Version,
};
use polymath_test_utils::{CONTRACT, MockChain, STRANGER, TOKEN_OWNER, init_logger};

#[tokio::test]
async fn test_factory_reads() -> anyhow::Result<()> {
    init_logger(false);
    let chain = MockChain::new();
    let factory = chain.client().module_factory(CONTRACT);

    chain.push_return(string_to_bytes32("USDTieredSTO")?);
    assert_eq!(factory.name().await?, "USDTieredSTO");

    chain.push_return("3.1.0".to_string());
    assert_eq!(factory.contract_version().await?, ContractVersion::V3_1_0);

    chain.push_return(vec![3u8]);
    assert_eq!(factory.types().await?, vec![ModuleType::Sto]);

    chain.push_return(vec![2u8, 0, 0]);
    assert_eq!(factory.lower_st_version_bounds().await?, Version::new(2, 0, 0));
    Ok(())
}

#[tokio::test]
async fn test_unsupported_factory_version() -> anyhow::Result<()> {
    init_logger(false);
    let chain = MockChain::new();
    let factory = chain.client().module_factory(CONTRACT);

    chain.push_return("2.1.0".to_string());
    let err = factory.contract_version().await.unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::InvalidVersion));
    Ok(())
}

#[tokio::test]
async fn test_lower_bound_cannot_increase() -> anyhow::Result<()> {
    init_logger(false);
    let chain = MockChain::new();
    let factory = chain.client_with_sender(TOKEN_OWNER).module_factory(CONTRACT);

    chain.push_return(TOKEN_OWNER);
    chain.push_return(vec![3u8, 0, 0]);
    let err = factory
        .change_st_version_bounds(BoundType::LowerBound, Version::new(3, 1, 0), &TxParams::default())
        .await
        .unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::InvalidBound));
    Ok(())
}

#[tokio::test]
async fn test_upper_bound_increase_is_sent() -> anyhow::Result<()> {
    init_logger(false);
    let chain = MockChain::new();
    let factory = chain.client_with_sender(TOKEN_OWNER).module_factory(CONTRACT);
    let hash = B256::repeat_byte(0xab);

    chain.push_return(TOKEN_OWNER);
    chain.push_return(vec![3u8, 0, 0]);
    chain.push_gas_estimate(100_000);
    chain.push_tx_hash(hash);
    let pending = factory
        .change_st_version_bounds(BoundType::UpperBound, Version::new(3, 1, 0), &TxParams::default())
        .await?;
    assert_eq!(*pending.tx_hash(), hash);
    Ok(())
}

/// Sends a bound change against a stored bound of 3.0.0.
async fn change_bound(bound: BoundType, version: Version) -> polymath_contract_wrappers::Result<B256> {
    let chain = MockChain::new();
    let factory = chain.client_with_sender(TOKEN_OWNER).module_factory(CONTRACT);
    let hash = B256::repeat_byte(0xac);

    chain.push_return(TOKEN_OWNER);
    chain.push_return(vec![3u8, 0, 0]);
    chain.push_gas_estimate(100_000);
    chain.push_tx_hash(hash);
    let pending = factory
        .change_st_version_bounds(bound, version, &TxParams::default())
        .await?;
    Ok(*pending.tx_hash())
}

#[tokio::test]
async fn test_lower_bound_may_stay_or_decrease() -> anyhow::Result<()> {
    init_logger(false);
    let hash = B256::repeat_byte(0xac);

    assert_eq!(change_bound(BoundType::LowerBound, Version::new(3, 0, 0)).await?, hash);
    assert_eq!(change_bound(BoundType::LowerBound, Version::new(2, 9, 9)).await?, hash);
    Ok(())
}

#[tokio::test]
async fn test_upper_bound_may_stay() -> anyhow::Result<()> {
    init_logger(false);

    let hash = change_bound(BoundType::UpperBound, Version::new(3, 0, 0)).await?;
    assert_eq!(hash, B256::repeat_byte(0xac));
    Ok(())
}

#[tokio::test]
async fn test_upper_bound_cannot_decrease() -> anyhow::Result<()> {
    init_logger(false);

    let err = change_bound(BoundType::UpperBound, Version::new(2, 9, 0))
        .await
        .unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::InvalidBound));
    Ok(())
}

#[tokio::test]
async fn test_only_owner_changes_factory() -> anyhow::Result<()> {
    init_logger(false);
    let chain = MockChain::new();
    let factory = chain.client_with_sender(STRANGER).module_factory(CONTRACT);

    chain.push_return(TOKEN_OWNER);
    let err = factory
        .change_title("Capped offering", &TxParams::default())
        .await
        .unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::Unauthorized));
    Ok(())
}

#[tokio::test]
async fn test_tags_must_fit_bytes32() -> anyhow::Result<()> {
    init_logger(false);
    let chain = MockChain::new();
    let factory = chain.client_with_sender(TOKEN_OWNER).module_factory(CONTRACT);

    chain.push_return(TOKEN_OWNER);
    let tags = vec![
        "Capped".to_string(),
        "a tag that is much longer than thirty-two bytes".to_string(),
    ];
    let err = factory
        .change_tags(&tags, &TxParams::default())
        .await
        .unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::InvalidData));
    Ok(())
}

#[tokio::test]
async fn test_caller_falls_back_to_node_account() -> anyhow::Result<()> {
    init_logger(false);
    let chain = MockChain::new();
    let factory = chain.client().module_factory(CONTRACT);

    chain.push_accounts(vec![TOKEN_OWNER, STRANGER]);
    chain.push_return(TOKEN_OWNER);
    chain.push_gas_estimate(50_000);
    chain.push_tx_hash(B256::repeat_byte(1));
    factory
        .change_description("Sells tokens in tiers", &TxParams::default())
        .await?;
    Ok(())
}

#[tokio::test]
async fn test_no_account_to_send_from() -> anyhow::Result<()> {
    init_logger(false);
    let chain = MockChain::new();
    let factory = chain.client().module_factory(CONTRACT);

    chain.push_accounts(vec![]);
    let err = factory
        .change_description("Sells tokens in tiers", &TxParams::default())
        .await
        .unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::PreconditionRequired));
    Ok(())
}

#[tokio::test]
async fn test_explicit_gas_skips_estimation() -> anyhow::Result<()> {
    init_logger(false);
    let chain = MockChain::new();
    let factory = chain.client().module_factory(CONTRACT);
    let tx = TxParams::builder().from(TOKEN_OWNER).gas(80_000).build();

    chain.push_return(TOKEN_OWNER);
    chain.push_tx_hash(B256::repeat_byte(2));
    factory.change_title("Tiered offering", &tx).await?;
    Ok(())
}

#[tokio::test]
async fn test_safety_factor_below_one_is_rejected() -> anyhow::Result<()> {
    init_logger(false);
    let chain = MockChain::new();
    let factory = chain.client_with_sender(TOKEN_OWNER).module_factory(CONTRACT);
    let tx = TxParams::builder().safety_factor(0.5).build();

    chain.push_return(TOKEN_OWNER);
    let err = factory.change_title("Tiered offering", &tx).await.unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::InvalidData));
    Ok(())
}

#[tokio::test]
async fn test_transfer_ownership_requires_new_owner() -> anyhow::Result<()> {
    init_logger(false);
    let chain = MockChain::new();
    let factory = chain.client_with_sender(TOKEN_OWNER).module_factory(CONTRACT);

    chain.push_return(TOKEN_OWNER);
    let err = factory
        .transfer_ownership(alloy::primitives::Address::ZERO, &TxParams::default())
        .await
        .unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::InvalidData));
    Ok(())
}

#[tokio::test]
async fn test_remote_errors_pass_through() -> anyhow::Result<()> {
    init_logger(false);
    let chain = MockChain::new();
    let factory = chain.client().module_factory(CONTRACT);

    chain.push_failure("execution reverted");
    let err = factory.title().await.unwrap_err();
    assert_eq!(err.code(), None);
    Ok(())
}
