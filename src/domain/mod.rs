pub mod account;
pub mod commands;
pub mod events;

pub use account::*;
pub use commands::*;
pub use events::*;

pub use account::AccountError;
