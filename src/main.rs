use anyhow::Result;
use ledger_es::infrastructure::{init_logging, AppConfig, LoggingConfig};
use ledger_es::{AccountCommand, CommandHandler, InMemoryEventStore, TransferProcessManager};
use rust_decimal_macros::dec;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let config = AppConfig::from_env();
    let _guard = init_logging(Some(LoggingConfig {
        log_dir: config.log_dir.clone(),
        enable_console: true,
        enable_file: config.enable_file_logging,
        log_level: config.log_level.clone(),
    }))
    .map_err(|e| anyhow::anyhow!("failed to initialize logging: {e}"))?;

    let store = Arc::new(InMemoryEventStore::new());
    let handler = CommandHandler::new(store, Arc::new(TransferProcessManager::new()));

    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();

    handler
        .handle_command(alice, AccountCommand::CreateOnlineAccount { account_id: alice })
        .await?;
    handler
        .handle_command(bob, AccountCommand::CreateOnlineAccount { account_id: bob })
        .await?;
    handler
        .handle_command(
            alice,
            AccountCommand::MakeDeposit {
                account_id: alice,
                amount: dec!(100),
            },
        )
        .await?;
    handler
        .handle_command(
            alice,
            AccountCommand::MakeTransaction {
                account_id: alice,
                amount: dec!(40),
                dest_account: bob,
            },
        )
        .await?;

    let (alice_state, alice_version) = handler.load_account(alice).await?;
    let (bob_state, bob_version) = handler.load_account(bob).await?;
    info!(state = %alice_state, version = alice_version, "source account after transfer");
    info!(state = %bob_state, version = bob_version, "destination account after transfer");

    Ok(())
}
