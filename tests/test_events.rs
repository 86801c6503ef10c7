use alloy::primitives::{B256, Log as LogInner};
use alloy::rpc::types::Log;
use alloy::sol_types::SolEvent;
use polymath_contract_wrappers::abi::ModuleRegistry;
use polymath_contract_wrappers::events::{BlockRange, IndexFilter, IndexFilterValue};
use polymath_contract_wrappers::{ErrorCode, OwnableContract};
use polymath_test_utils::{CONTRACT, FACTORY, MockChain, TOKEN_OWNER, init_logger};

#[tokio::test]
async fn test_registry_logs_are_decoded() -> anyhow::Result<()> {
    init_logger(false);
    let chain = MockChain::new();
    let registry = chain.client().module_registry(CONTRACT);
    let event = ModuleRegistry::ModuleRegistered {
        _moduleFactory: FACTORY,
        _owner: TOKEN_OWNER,
    };
    let log = Log {
        inner: LogInner {
            address: CONTRACT,
            data: event.encode_log_data(),
        },
        block_number: Some(7),
        transaction_hash: Some(B256::repeat_byte(0x61)),
        log_index: Some(0),
        ..Default::default()
    };

    chain.push_logs(vec![log]);
    let filter = IndexFilter::from([(
        "_owner".to_string(),
        IndexFilterValue::from(TOKEN_OWNER),
    )]);
    let logs = registry
        .contract()
        .get_logs::<ModuleRegistry::ModuleRegistryEvents>(
            "ModuleRegistered",
            BlockRange::from_block(1),
            &filter,
        )
        .await?;
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].block_number, Some(7));
    match &logs[0].event {
        ModuleRegistry::ModuleRegistryEvents::ModuleRegistered(registered) => {
            assert_eq!(registered._moduleFactory, FACTORY);
            assert_eq!(registered._owner, TOKEN_OWNER);
        }
        _ => anyhow::bail!("expected a ModuleRegistered event"),
    }
    Ok(())
}

#[tokio::test]
async fn test_unknown_event_name() -> anyhow::Result<()> {
    init_logger(false);
    let chain = MockChain::new();
    let registry = chain.client().module_registry(CONTRACT);

    let err = registry
        .contract()
        .get_logs::<ModuleRegistry::ModuleRegistryEvents>(
            "TickerRegistered",
            BlockRange::default(),
            &IndexFilter::new(),
        )
        .await
        .unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::InvalidData));
    Ok(())
}

#[tokio::test]
async fn test_filter_on_non_indexed_argument() -> anyhow::Result<()> {
    init_logger(false);
    let chain = MockChain::new();
    let registry = chain.client().module_registry(CONTRACT);
    let filter = IndexFilter::from([(
        "account".to_string(),
        IndexFilterValue::from(TOKEN_OWNER),
    )]);

    let err = registry
        .contract()
        .get_logs::<ModuleRegistry::ModuleRegistryEvents>("Pause", BlockRange::default(), &filter)
        .await
        .unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::InvalidData));
    Ok(())
}

#[tokio::test]
async fn test_event_names_of_a_wrapper() -> anyhow::Result<()> {
    init_logger(false);
    let chain = MockChain::new();
    let registry = chain.client().module_registry(CONTRACT);

    let names = registry.contract().event_names();
    assert!(names.contains(&"ModuleRegistered"));
    assert!(names.contains(&"OwnershipTransferred"));
    assert!(!names.contains(&"TickerRegistered"));
    Ok(())
}
