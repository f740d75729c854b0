use crate::domain::{AccountCommand, AccountEvent};
use uuid::Uuid;

/// Stateless reaction table: maps an accepted event to the follow-up commands
/// it requires on other streams. This is the only place where activity on one
/// aggregate causes activity on another.
pub trait ProcessManager: Send + Sync + 'static {
    fn react(&self, event: &AccountEvent) -> Vec<(Uuid, AccountCommand)>;
}

/// Choreography-style money-transfer saga: a debit on the source account
/// triggers the matching credit command on the destination account. No
/// cross-aggregate transaction and no compensation for a failed credit.
#[derive(Debug, Clone, Default)]
pub struct TransferProcessManager;

impl TransferProcessManager {
    pub fn new() -> Self {
        Self
    }
}

impl ProcessManager for TransferProcessManager {
    fn react(&self, event: &AccountEvent) -> Vec<(Uuid, AccountCommand)> {
        match event {
            AccountEvent::TransactionAccountDebited {
                account_id,
                amount,
                dest_account,
            } => vec![(
                *dest_account,
                AccountCommand::TransactionDepositTargetAccount {
                    account_id: *dest_account,
                    amount: *amount,
                    src_account: *account_id,
                },
            )],
            _ => Vec::new(),
        }
    }
}
