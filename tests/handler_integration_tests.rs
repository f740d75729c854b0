use async_trait::async_trait;
use ledger_es::application::{CommandError, CommandHandler, TransferProcessManager};
use ledger_es::domain::{Account, AccountCommand, AccountError, AccountEvent};
use ledger_es::infrastructure::{EventStoreError, EventStoreTrait, InMemoryEventStore};
use rust_decimal_macros::dec;
use std::sync::Arc;
use uuid::Uuid;

fn new_handler() -> (CommandHandler, Arc<InMemoryEventStore>) {
    let store = Arc::new(InMemoryEventStore::new());
    let handler = CommandHandler::new(store.clone(), Arc::new(TransferProcessManager::new()));
    (handler, store)
}

async fn open_account(handler: &CommandHandler, id: Uuid) {
    handler
        .handle_command(id, AccountCommand::CreateOnlineAccount { account_id: id })
        .await
        .unwrap();
}

#[tokio::test]
async fn create_deposit_withdraw_round_trip() {
    let (handler, _) = new_handler();
    let id = Uuid::new_v4();

    open_account(&handler, id).await;
    handler
        .handle_command(
            id,
            AccountCommand::MakeDeposit {
                account_id: id,
                amount: dec!(100),
            },
        )
        .await
        .unwrap();
    handler
        .handle_command(
            id,
            AccountCommand::Withdraw {
                account_id: id,
                amount: dec!(30),
            },
        )
        .await
        .unwrap();

    let (state, version) = handler.load_account(id).await.unwrap();
    assert_eq!(
        state,
        Account::Online {
            id,
            balance: dec!(70)
        }
    );
    assert_eq!(version, 2);
}

#[tokio::test]
async fn rejected_command_appends_nothing() {
    let (handler, store) = new_handler();
    let id = Uuid::new_v4();

    open_account(&handler, id).await;
    let err = handler
        .handle_command(
            id,
            AccountCommand::Withdraw {
                account_id: id,
                amount: dec!(1),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        CommandError::Domain(AccountError::Overdraft)
    ));

    let events = store.read_from_stream(&id.to_string()).await.unwrap();
    assert_eq!(events.len(), 1);
}

#[tokio::test]
async fn transfer_saga_credits_the_destination_stream() {
    let (handler, store) = new_handler();
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();

    open_account(&handler, alice).await;
    open_account(&handler, bob).await;
    handler
        .handle_command(
            alice,
            AccountCommand::MakeDeposit {
                account_id: alice,
                amount: dec!(100),
            },
        )
        .await
        .unwrap();

    handler
        .handle_command(
            alice,
            AccountCommand::MakeTransaction {
                account_id: alice,
                amount: dec!(50),
                dest_account: bob,
            },
        )
        .await
        .unwrap();

    let (alice_state, _) = handler.load_account(alice).await.unwrap();
    let (bob_state, _) = handler.load_account(bob).await.unwrap();
    assert_eq!(alice_state.balance(), Some(dec!(50)));
    assert_eq!(bob_state.balance(), Some(dec!(50)));

    let bob_events = store.read_from_stream(&bob.to_string()).await.unwrap();
    assert_eq!(
        bob_events.last(),
        Some(&AccountEvent::TransactionAccountDeposited {
            account_id: bob,
            amount: dec!(50),
            src_account: alice,
        })
    );
}

#[tokio::test]
async fn failed_credit_leaves_the_debit_committed() {
    // The saga has no compensation: when the destination stream cannot take
    // the credit, the already-appended debit stays in the source stream.
    let (handler, _) = new_handler();
    let alice = Uuid::new_v4();
    let missing = Uuid::new_v4();

    open_account(&handler, alice).await;
    handler
        .handle_command(
            alice,
            AccountCommand::MakeDeposit {
                account_id: alice,
                amount: dec!(100),
            },
        )
        .await
        .unwrap();

    let err = handler
        .handle_command(
            alice,
            AccountCommand::MakeTransaction {
                account_id: alice,
                amount: dec!(50),
                dest_account: missing,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        CommandError::Domain(AccountError::InvalidOperation { .. })
    ));

    let (alice_state, _) = handler.load_account(alice).await.unwrap();
    assert_eq!(alice_state.balance(), Some(dec!(50)));

    let (missing_state, version) = handler.load_account(missing).await.unwrap();
    assert_eq!(missing_state, Account::Uninitialized);
    assert_eq!(version, -1);
}

/// Store double that accepts reads but refuses every append with a conflict.
struct ConflictingStore;

#[async_trait]
impl EventStoreTrait for ConflictingStore {
    async fn append_to_stream(
        &self,
        stream_id: &str,
        expected_version: i64,
        _events: Vec<AccountEvent>,
    ) -> Result<(), EventStoreError> {
        Err(EventStoreError::OptimisticConcurrencyConflict {
            stream_id: stream_id.to_string(),
            expected: expected_version,
            actual: expected_version + 1,
        })
    }

    async fn read_from_stream(
        &self,
        _stream_id: &str,
    ) -> Result<Vec<AccountEvent>, EventStoreError> {
        Ok(Vec::new())
    }
}

#[tokio::test]
async fn version_conflicts_surface_without_retry() {
    let handler = CommandHandler::new(
        Arc::new(ConflictingStore),
        Arc::new(TransferProcessManager::new()),
    );
    let id = Uuid::new_v4();

    let err = handler
        .handle_command(id, AccountCommand::CreateOnlineAccount { account_id: id })
        .await
        .unwrap_err();
    match err {
        CommandError::Store(store_err) => assert!(store_err.is_conflict()),
        other => panic!("expected a store conflict, got {other:?}"),
    }
}

/// Store double whose reads fail outright.
struct UnavailableStore;

#[async_trait]
impl EventStoreTrait for UnavailableStore {
    async fn append_to_stream(
        &self,
        _stream_id: &str,
        _expected_version: i64,
        _events: Vec<AccountEvent>,
    ) -> Result<(), EventStoreError> {
        Err(EventStoreError::Storage("store offline".to_string()))
    }

    async fn read_from_stream(
        &self,
        _stream_id: &str,
    ) -> Result<Vec<AccountEvent>, EventStoreError> {
        Err(EventStoreError::Storage("store offline".to_string()))
    }
}

#[tokio::test]
async fn infrastructure_errors_propagate_unchanged() {
    let handler = CommandHandler::new(
        Arc::new(UnavailableStore),
        Arc::new(TransferProcessManager::new()),
    );
    let id = Uuid::new_v4();

    let err = handler
        .handle_command(id, AccountCommand::CreateOnlineAccount { account_id: id })
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        CommandError::Store(EventStoreError::Storage(_))
    ));
}

#[tokio::test]
async fn concurrent_transfers_from_one_account_stay_consistent() {
    let (handler, _) = new_handler();
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();
    let carol = Uuid::new_v4();

    open_account(&handler, alice).await;
    open_account(&handler, bob).await;
    open_account(&handler, carol).await;
    handler
        .handle_command(
            alice,
            AccountCommand::MakeDeposit {
                account_id: alice,
                amount: dec!(100),
            },
        )
        .await
        .unwrap();

    let to_bob = handler.handle_command(
        alice,
        AccountCommand::MakeTransaction {
            account_id: alice,
            amount: dec!(60),
            dest_account: bob,
        },
    );
    let to_carol = handler.handle_command(
        alice,
        AccountCommand::MakeTransaction {
            account_id: alice,
            amount: dec!(60),
            dest_account: carol,
        },
    );
    let (to_bob, to_carol) = tokio::join!(to_bob, to_carol);

    // Either both committed in sequence (the second was rejected for
    // overdraft) or the loser hit a version conflict; the source balance
    // can never go negative either way.
    let outcomes = [to_bob, to_carol];
    assert!(outcomes.iter().any(|r| r.is_ok()));

    let (alice_state, _) = handler.load_account(alice).await.unwrap();
    let balance = alice_state.balance().unwrap();
    assert!(balance >= dec!(0));
    assert!(balance <= dec!(40));
}
