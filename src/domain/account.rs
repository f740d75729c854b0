use crate::domain::{AccountCommand, AccountEvent};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Aggregate state for one account stream. Never stored: always recomputed
/// by replaying the stream, which stays the sole source of truth.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Account {
    Uninitialized,
    Online {
        id: Uuid,
        #[serde(with = "crate::domain::events::decimal_str")]
        balance: Decimal,
    },
}

impl Default for Account {
    fn default() -> Self {
        Account::Uninitialized
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Account::Uninitialized => f.write_str("Uninitialized"),
            Account::Online { id, balance } => write!(f, "OnlineAccount({id}, {balance})"),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum AccountError {
    #[error("deposit amount must be positive")]
    NonPositiveDeposit,
    #[error("withdrawal amount must be positive")]
    NonPositiveWithdrawal,
    #[error("transaction amount must be positive")]
    NonPositiveTransaction,
    #[error("overdraft not allowed")]
    Overdraft,
    #[error("invalid operation {command} on current state {state}")]
    InvalidOperation { command: String, state: String },
}

impl Account {
    pub fn balance(&self) -> Option<Decimal> {
        match self {
            Account::Uninitialized => None,
            Account::Online { balance, .. } => Some(*balance),
        }
    }

    /// Total transition function. Pairings outside the table below leave the
    /// state untouched; replay treats them as no-ops rather than corruption.
    pub fn apply(&mut self, event: &AccountEvent) {
        *self = match (std::mem::take(self), event) {
            (Account::Uninitialized, AccountEvent::OnlineAccountCreated { account_id }) => {
                Account::Online {
                    id: *account_id,
                    balance: Decimal::ZERO,
                }
            }
            (Account::Online { id, balance }, AccountEvent::DepositMade { amount, .. }) => {
                Account::Online {
                    id,
                    balance: balance + *amount,
                }
            }
            (Account::Online { id, balance }, AccountEvent::MoneyWithdrawn { amount, .. }) => {
                Account::Online {
                    id,
                    balance: balance - *amount,
                }
            }
            (
                Account::Online { id, balance },
                AccountEvent::TransactionAccountDebited { amount, .. },
            ) => Account::Online {
                id,
                balance: balance - *amount,
            },
            (
                Account::Online { id, balance },
                AccountEvent::TransactionAccountDeposited { amount, .. },
            ) => Account::Online {
                id,
                balance: balance + *amount,
            },
            (state, _) => state,
        };
    }

    /// Folds `apply` over the stream, counting versions from -1 (empty
    /// stream) upward. Pure: same events in, same (state, version) out.
    pub fn replay<'a, I>(events: I) -> (Account, i64)
    where
        I: IntoIterator<Item = &'a AccountEvent>,
    {
        let mut state = Account::Uninitialized;
        let mut version: i64 = -1;
        for event in events {
            state.apply(event);
            version += 1;
        }
        (state, version)
    }

    /// Validates a command against the replayed snapshot and produces the
    /// events to append. Inspects state only; never mutates it.
    pub fn decide(&self, command: &AccountCommand) -> Result<Vec<AccountEvent>, AccountError> {
        match (self, command) {
            (Account::Uninitialized, AccountCommand::CreateOnlineAccount { account_id }) => {
                Ok(vec![AccountEvent::OnlineAccountCreated {
                    account_id: *account_id,
                }])
            }
            (Account::Online { .. }, AccountCommand::MakeDeposit { account_id, amount }) => {
                if *amount <= Decimal::ZERO {
                    return Err(AccountError::NonPositiveDeposit);
                }
                Ok(vec![AccountEvent::DepositMade {
                    account_id: *account_id,
                    amount: *amount,
                }])
            }
            (Account::Online { balance, .. }, AccountCommand::Withdraw { account_id, amount }) => {
                if *amount <= Decimal::ZERO {
                    return Err(AccountError::NonPositiveWithdrawal);
                }
                if *balance - *amount < Decimal::ZERO {
                    return Err(AccountError::Overdraft);
                }
                Ok(vec![AccountEvent::MoneyWithdrawn {
                    account_id: *account_id,
                    amount: *amount,
                }])
            }
            (
                Account::Online { balance, .. },
                AccountCommand::MakeTransaction {
                    account_id,
                    amount,
                    dest_account,
                },
            ) => {
                if *amount <= Decimal::ZERO {
                    return Err(AccountError::NonPositiveTransaction);
                }
                if *balance - *amount < Decimal::ZERO {
                    return Err(AccountError::Overdraft);
                }
                Ok(vec![AccountEvent::TransactionAccountDebited {
                    account_id: *account_id,
                    amount: *amount,
                    dest_account: *dest_account,
                }])
            }
            (
                Account::Online { .. },
                AccountCommand::TransactionDepositTargetAccount {
                    account_id,
                    amount,
                    src_account,
                },
            ) => {
                // Credits are unconditional: the overdraft check lives on the
                // debit side of the transfer.
                if *amount <= Decimal::ZERO {
                    return Err(AccountError::NonPositiveTransaction);
                }
                Ok(vec![AccountEvent::TransactionAccountDeposited {
                    account_id: *account_id,
                    amount: *amount,
                    src_account: *src_account,
                }])
            }
            (state, command) => Err(AccountError::InvalidOperation {
                command: command.command_type().to_string(),
                state: state.to_string(),
            }),
        }
    }
}
