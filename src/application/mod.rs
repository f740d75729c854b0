pub mod handlers;
pub mod process_manager;

pub use handlers::*;
pub use process_manager::*;

pub use handlers::CommandHandler;
