use std::collections::BTreeMap;
use std::convert::TryFrom;
use std::pin::Pin;

use alloy::eips::BlockNumberOrTag;
use alloy::primitives::{Address, B256, U256};
use alloy::providers::{DynProvider, Provider};
use alloy::rpc::types::Log;
use alloy::rpc::types::eth::Filter;
use alloy_sol_types::{SolEvent, SolEventInterface};
use futures::{Stream, StreamExt};

use crate::{Error, Result, ensure};

/// ABI kind of an indexed event argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexedKind {
    Address,
    Uint,
    Bytes32,
    Bool,
}

/// Value an indexed argument is filtered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexFilterValue {
    Address(Address),
    Uint(U256),
    Bytes32(B256),
    Bool(bool),
}

impl IndexFilterValue {
    pub fn kind(&self) -> IndexedKind {
        match self {
            IndexFilterValue::Address(_) => IndexedKind::Address,
            IndexFilterValue::Uint(_) => IndexedKind::Uint,
            IndexFilterValue::Bytes32(_) => IndexedKind::Bytes32,
            IndexFilterValue::Bool(_) => IndexedKind::Bool,
        }
    }

    /// The topic word a log carries for this value.
    pub fn to_topic(&self) -> B256 {
        match self {
            IndexFilterValue::Address(address) => address.into_word(),
            IndexFilterValue::Uint(value) => B256::from(*value),
            IndexFilterValue::Bytes32(word) => *word,
            IndexFilterValue::Bool(flag) => B256::with_last_byte(u8::from(*flag)),
        }
    }
}

impl From<Address> for IndexFilterValue {
    fn from(address: Address) -> Self {
        IndexFilterValue::Address(address)
    }
}

impl From<U256> for IndexFilterValue {
    fn from(value: U256) -> Self {
        IndexFilterValue::Uint(value)
    }
}

impl From<B256> for IndexFilterValue {
    fn from(word: B256) -> Self {
        IndexFilterValue::Bytes32(word)
    }
}

impl From<bool> for IndexFilterValue {
    fn from(flag: bool) -> Self {
        IndexFilterValue::Bool(flag)
    }
}

/// Indexed argument name to the value it must equal.
pub type IndexFilter = BTreeMap<String, IndexFilterValue>;

/// An event a contract can emit, with its indexed arguments in topic order.
#[derive(Debug, Clone, Copy)]
pub struct EventSchema {
    pub signature: &'static str,
    pub topic0: B256,
    pub indexed: &'static [(&'static str, IndexedKind)],
}

impl EventSchema {
    pub const fn of<E: SolEvent>(indexed: &'static [(&'static str, IndexedKind)]) -> Self {
        Self {
            signature: E::SIGNATURE,
            topic0: E::SIGNATURE_HASH,
            indexed,
        }
    }

    pub fn name(&self) -> &'static str {
        self.signature
            .split_once('(')
            .map_or(self.signature, |(name, _)| name)
    }

    /// Builds a log filter for this event, checking every filter entry
    /// against the indexed arguments.
    pub fn filter(&self, address: Address, range: BlockRange, filter: &IndexFilter) -> Result<Filter> {
        let mut topics: [Option<B256>; 3] = [None; 3];
        for (key, value) in filter {
            let position = self
                .indexed
                .iter()
                .position(|(name, _)| name == key)
                .ok_or_else(|| {
                    Error::InvalidData(format!(
                        "{key} is not an indexed argument of {}",
                        self.name()
                    ))
                })?;
            let expected = self.indexed[position].1;
            ensure!(
                value.kind() == expected,
                InvalidData,
                "{key} of {} expects {expected:?}, got {:?}",
                self.name(),
                value.kind()
            );
            topics[position] = Some(value.to_topic());
        }

        let mut filter = Filter::new()
            .address(address)
            .event_signature(self.topic0)
            .from_block(range.from)
            .to_block(range.to);
        if let Some(topic) = topics[0] {
            filter = filter.topic1(topic);
        }
        if let Some(topic) = topics[1] {
            filter = filter.topic2(topic);
        }
        if let Some(topic) = topics[2] {
            filter = filter.topic3(topic);
        }
        Ok(filter)
    }
}

/// Looks up an event by name among a contract's events.
pub fn find_schema<'a>(schemas: &'a [EventSchema], name: &str) -> Result<&'a EventSchema> {
    schemas
        .iter()
        .find(|schema| schema.name() == name)
        .ok_or_else(|| Error::InvalidData(format!("Unknown event {name}")))
}

/// Block interval of a log query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockRange {
    pub from: BlockNumberOrTag,
    pub to: BlockNumberOrTag,
}

impl Default for BlockRange {
    fn default() -> Self {
        Self {
            from: BlockNumberOrTag::Earliest,
            to: BlockNumberOrTag::Latest,
        }
    }
}

impl BlockRange {
    pub fn new(from: u64, to: u64) -> Self {
        Self {
            from: BlockNumberOrTag::Number(from),
            to: BlockNumberOrTag::Number(to),
        }
    }

    pub fn from_block(from: u64) -> Self {
        Self {
            from: BlockNumberOrTag::Number(from),
            to: BlockNumberOrTag::Latest,
        }
    }

    pub fn from_latest() -> Self {
        Self {
            from: BlockNumberOrTag::Latest,
            to: BlockNumberOrTag::Latest,
        }
    }
}

/// A contract event decoded from a log, with its position on chain.
#[derive(Debug, Clone)]
pub struct DecodedLog<E> {
    pub event: E,
    pub block_number: Option<u64>,
    pub transaction_hash: Option<B256>,
    pub log_index: Option<u64>,
}

impl<E: SolEventInterface> TryFrom<Log> for DecodedLog<E> {
    type Error = Error;

    fn try_from(log: Log) -> Result<Self> {
        let decoded = E::decode_log(&log.inner)
            .map_err(|e| Error::InvalidData(format!("Failed to decode log: {e}")))?;
        Ok(Self {
            event: decoded.data,
            block_number: log.block_number,
            transaction_hash: log.transaction_hash,
            log_index: log.log_index,
        })
    }
}

/// Stream of decoded logs.
pub type LogStream<E> = Pin<Box<dyn Stream<Item = Result<DecodedLog<E>>> + Send>>;

/// A live log subscription. Pass `id` to `unsubscribe` to stop it.
pub struct LogSubscription<E> {
    pub id: B256,
    pub stream: LogStream<E>,
}

pub(crate) async fn get_logs<E: SolEventInterface>(
    provider: &DynProvider,
    filter: &Filter,
) -> Result<Vec<DecodedLog<E>>> {
    let logs = provider.get_logs(filter).await?;
    log::trace!("Fetched {} logs", logs.len());
    logs.into_iter().map(DecodedLog::try_from).collect()
}

pub(crate) async fn subscribe<E>(provider: &DynProvider, filter: &Filter) -> Result<LogSubscription<E>>
where
    E: SolEventInterface + Send + 'static,
{
    let subscription = provider.subscribe_logs(filter).await?;
    let id = *subscription.local_id();
    log::debug!("Subscribed to logs with id {id}");
    Ok(LogSubscription {
        id,
        stream: Box::pin(subscription.into_stream().map(DecodedLog::try_from)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorCode;
    use crate::abi::ModuleRegistry;
    use alloy_sol_types::SolEvent;

    const SCHEMAS: &[EventSchema] = &[
        EventSchema::of::<ModuleRegistry::ModuleRegistered>(&[
            ("_moduleFactory", IndexedKind::Address),
            ("_owner", IndexedKind::Address),
        ]),
        EventSchema::of::<ModuleRegistry::Pause>(&[]),
    ];

    fn filter_of(entries: &[(&str, IndexFilterValue)]) -> IndexFilter {
        entries
            .iter()
            .map(|(key, value)| (key.to_string(), *value))
            .collect()
    }

    #[test]
    fn test_schema_lookup() {
        let schema = find_schema(SCHEMAS, "ModuleRegistered").unwrap();
        assert_eq!(schema.topic0, ModuleRegistry::ModuleRegistered::SIGNATURE_HASH);
        assert_eq!(find_schema(SCHEMAS, "Pause").unwrap().name(), "Pause");
        let err = find_schema(SCHEMAS, "ModuleRemoved").unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::InvalidData));
    }

    #[test]
    fn test_filter_sets_topics_in_order() {
        let owner = Address::repeat_byte(0xaa);
        let schema = find_schema(SCHEMAS, "ModuleRegistered").unwrap();
        let filter = schema
            .filter(
                Address::repeat_byte(1),
                BlockRange::default(),
                &filter_of(&[("_owner", owner.into())]),
            )
            .unwrap();
        assert!(filter.topics[0].matches(&ModuleRegistry::ModuleRegistered::SIGNATURE_HASH));
        assert!(filter.topics[1].is_empty());
        assert!(filter.topics[2].matches(&owner.into_word()));
    }

    #[test]
    fn test_filter_rejects_unknown_argument() {
        let schema = find_schema(SCHEMAS, "ModuleRegistered").unwrap();
        let err = schema
            .filter(
                Address::ZERO,
                BlockRange::default(),
                &filter_of(&[("_factory", Address::ZERO.into())]),
            )
            .unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::InvalidData));
    }

    #[test]
    fn test_filter_rejects_wrong_kind() {
        let schema = find_schema(SCHEMAS, "ModuleRegistered").unwrap();
        let err = schema
            .filter(
                Address::ZERO,
                BlockRange::default(),
                &filter_of(&[("_owner", U256::from(1).into())]),
            )
            .unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::InvalidData));
    }

    #[test]
    fn test_bool_topic() {
        let topic = IndexFilterValue::Bool(true).to_topic();
        assert_eq!(topic[31], 1);
        assert!(topic[..31].iter().all(|b| *b == 0));
    }
}
