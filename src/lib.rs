pub mod application;
pub mod domain;
pub mod infrastructure;

// Re-export commonly used types
pub use application::{CommandError, CommandHandler, ProcessManager, TransferProcessManager};
pub use domain::{Account, AccountCommand, AccountError, AccountEvent};
pub use infrastructure::{EventStoreError, EventStoreTrait, InMemoryEventStore};
