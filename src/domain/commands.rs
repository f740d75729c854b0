use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::events::decimal_str;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum AccountCommand {
    CreateOnlineAccount {
        account_id: Uuid,
    },
    MakeDeposit {
        account_id: Uuid,
        #[serde(with = "decimal_str")]
        amount: Decimal,
    },
    Withdraw {
        account_id: Uuid,
        #[serde(with = "decimal_str")]
        amount: Decimal,
    },
    MakeTransaction {
        account_id: Uuid,
        #[serde(with = "decimal_str")]
        amount: Decimal,
        dest_account: Uuid,
    },
    TransactionDepositTargetAccount {
        account_id: Uuid,
        #[serde(with = "decimal_str")]
        amount: Decimal,
        src_account: Uuid,
    },
}

impl AccountCommand {
    pub fn account_id(&self) -> Uuid {
        match self {
            AccountCommand::CreateOnlineAccount { account_id }
            | AccountCommand::MakeDeposit { account_id, .. }
            | AccountCommand::Withdraw { account_id, .. }
            | AccountCommand::MakeTransaction { account_id, .. }
            | AccountCommand::TransactionDepositTargetAccount { account_id, .. } => *account_id,
        }
    }

    pub fn command_type(&self) -> &'static str {
        match self {
            AccountCommand::CreateOnlineAccount { .. } => "CreateOnlineAccount",
            AccountCommand::MakeDeposit { .. } => "MakeDeposit",
            AccountCommand::Withdraw { .. } => "Withdraw",
            AccountCommand::MakeTransaction { .. } => "MakeTransaction",
            AccountCommand::TransactionDepositTargetAccount { .. } => {
                "TransactionDepositTargetAccount"
            }
        }
    }
}
