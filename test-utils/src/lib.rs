use alloy::primitives::{Address, B256, Bytes, U64, address};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::Log;
use alloy::sol_types::abi::TokenSeq;
use alloy::sol_types::{SolType, SolValue};
use alloy::transports::mock::Asserter;
use polymath_contract_wrappers::{PolymathClient, TransactionConfig};

/// Owner of the security token the mocked modules are attached to.
pub const TOKEN_OWNER: Address = address!("0x1111111111111111111111111111111111111111");
pub const SECURITY_TOKEN: Address = address!("0x2222222222222222222222222222222222222222");
/// Deployed contract the wrapper under test points at.
pub const CONTRACT: Address = address!("0x3333333333333333333333333333333333333333");
pub const FACTORY: Address = address!("0x4444444444444444444444444444444444444444");
/// An address without any role.
pub const STRANGER: Address = address!("0x5555555555555555555555555555555555555555");
pub const HOLDER: Address = address!("0x6666666666666666666666666666666666666666");

pub fn init_logger(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    let _ = env_logger::builder()
        .is_test(true)
        .filter_level(level)
        .try_init();
}

/// A node answering JSON-RPC requests from a queue.
///
/// Responses are consumed in request order. A request against an empty queue
/// fails, so a rejected call with nothing queued never reached the node.
#[derive(Clone, Default)]
pub struct MockChain {
    asserter: Asserter,
}

impl MockChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Client without a default sender.
    pub fn client(&self) -> PolymathClient {
        self.client_from(None)
    }

    /// Client sending from `from`, as a client with a local wallet does.
    pub fn client_with_sender(&self, from: Address) -> PolymathClient {
        self.client_from(Some(from))
    }

    fn client_from(&self, from: Option<Address>) -> PolymathClient {
        let provider = ProviderBuilder::new()
            .disable_recommended_fillers()
            .connect_mocked_client(self.asserter.clone())
            .erased();
        PolymathClient::from_provider(provider, from, TransactionConfig::default())
    }

    /// Queues the return value of an `eth_call`. Multiple return values are
    /// passed as a tuple.
    pub fn push_return<T: SolValue>(&self, value: T) -> &Self
    where
        for<'a> <T::SolType as SolType>::Token<'a>: TokenSeq<'a>,
    {
        self.asserter
            .push_success(&Bytes::from(value.abi_encode_params()));
        self
    }

    /// Queues the answer to `eth_accounts`.
    pub fn push_accounts(&self, accounts: Vec<Address>) -> &Self {
        self.asserter.push_success(&accounts);
        self
    }

    pub fn push_gas_estimate(&self, gas: u64) -> &Self {
        self.asserter.push_success(&U64::from(gas));
        self
    }

    /// Queues the hash returned by `eth_sendTransaction`.
    pub fn push_tx_hash(&self, hash: B256) -> &Self {
        self.asserter.push_success(&hash);
        self
    }

    /// Queues the answer to `eth_getLogs`.
    pub fn push_logs(&self, logs: Vec<Log>) -> &Self {
        self.asserter.push_success(&logs);
        self
    }

    /// Queues a JSON-RPC error, e.g. a revert.
    pub fn push_failure(&self, message: &'static str) -> &Self {
        self.asserter.push_failure_msg(message);
        self
    }
}
