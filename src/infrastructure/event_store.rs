use crate::domain::{AccountEvent, StoredEvent};
use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum EventStoreError {
    #[error(
        "optimistic concurrency conflict on stream {stream_id}: expected version {expected}, found {actual}"
    )]
    OptimisticConcurrencyConflict {
        stream_id: String,
        expected: i64,
        actual: i64,
    },
    #[error("serialization error: {0}")]
    Serialization(#[from] Box<bincode::ErrorKind>),
    #[error("event store error: {0}")]
    Storage(String),
}

impl EventStoreError {
    pub fn is_conflict(&self) -> bool {
        matches!(self, EventStoreError::OptimisticConcurrencyConflict { .. })
    }
}

/// Append-only per-stream event log with an optimistic-concurrency contract.
///
/// `append_to_stream` must perform the expected-version check and the append
/// as one atomic operation, and reject with
/// [`EventStoreError::OptimisticConcurrencyConflict`] when another writer got
/// there first. Reading a stream that does not exist yet yields an empty
/// sequence (version -1 after replay).
#[async_trait]
pub trait EventStoreTrait: Send + Sync + 'static {
    async fn append_to_stream(
        &self,
        stream_id: &str,
        expected_version: i64,
        events: Vec<AccountEvent>,
    ) -> Result<(), EventStoreError>;

    async fn read_from_stream(&self, stream_id: &str)
        -> Result<Vec<AccountEvent>, EventStoreError>;
}

/// In-memory event log keyed by stream id. The per-stream entry guard
/// serializes check-and-append, so concurrent writers racing on the same
/// expected version see exactly one success and one conflict.
#[derive(Debug, Default)]
pub struct InMemoryEventStore {
    streams: DashMap<String, Vec<StoredEvent>>,
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self {
            streams: DashMap::new(),
        }
    }

    fn encode(stream_id: &str, version: i64, event: &AccountEvent) -> Result<StoredEvent, EventStoreError> {
        Ok(StoredEvent {
            id: Uuid::new_v4(),
            stream_id: stream_id.to_string(),
            event_type: event.event_type().to_string(),
            payload: bincode::serialize(event)?,
            version,
            timestamp: Utc::now(),
        })
    }
}

#[async_trait]
impl EventStoreTrait for InMemoryEventStore {
    async fn append_to_stream(
        &self,
        stream_id: &str,
        expected_version: i64,
        events: Vec<AccountEvent>,
    ) -> Result<(), EventStoreError> {
        let mut stream = self.streams.entry(stream_id.to_string()).or_default();
        let actual = stream.len() as i64 - 1;
        if actual != expected_version {
            warn!(
                stream_id,
                expected = expected_version,
                actual,
                "concurrent append detected"
            );
            return Err(EventStoreError::OptimisticConcurrencyConflict {
                stream_id: stream_id.to_string(),
                expected: expected_version,
                actual,
            });
        }

        let mut version = actual;
        let mut encoded = Vec::with_capacity(events.len());
        for event in &events {
            version += 1;
            encoded.push(Self::encode(stream_id, version, event)?);
        }
        debug!(
            stream_id,
            appended = encoded.len(),
            new_version = version,
            "events appended"
        );
        stream.extend(encoded);
        Ok(())
    }

    async fn read_from_stream(
        &self,
        stream_id: &str,
    ) -> Result<Vec<AccountEvent>, EventStoreError> {
        let Some(stream) = self.streams.get(stream_id) else {
            return Ok(Vec::new());
        };
        stream
            .iter()
            .map(|stored| bincode::deserialize(&stored.payload).map_err(EventStoreError::from))
            .collect()
    }
}
