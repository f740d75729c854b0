pub mod config;
pub mod event_store;
pub mod logging;

pub use config::AppConfig;
pub use event_store::{EventStoreError, EventStoreTrait, InMemoryEventStore};
pub use logging::{init_logging, LoggingConfig};
