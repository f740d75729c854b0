use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// Decimal amounts are serialized as their string form so the bincode
// envelope round-trips them exactly.
pub(crate) mod decimal_str {
    use rust_decimal::Decimal;
    use serde::de::Deserialize;
    use serde::{self, Deserializer, Serializer};

    pub fn serialize<S>(amount: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&amount.to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<Decimal>().map_err(serde::de::Error::custom)
    }
}

/// Envelope persisted by the event store; the payload is the bincode-encoded
/// `AccountEvent`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredEvent {
    pub id: Uuid,
    pub stream_id: String,
    pub event_type: String,
    pub payload: Vec<u8>,
    pub version: i64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum AccountEvent {
    OnlineAccountCreated {
        account_id: Uuid,
    },
    DepositMade {
        account_id: Uuid,
        #[serde(with = "decimal_str")]
        amount: Decimal,
    },
    MoneyWithdrawn {
        account_id: Uuid,
        #[serde(with = "decimal_str")]
        amount: Decimal,
    },
    TransactionAccountDebited {
        account_id: Uuid,
        #[serde(with = "decimal_str")]
        amount: Decimal,
        dest_account: Uuid,
    },
    TransactionAccountDeposited {
        account_id: Uuid,
        #[serde(with = "decimal_str")]
        amount: Decimal,
        src_account: Uuid,
    },
}

impl AccountEvent {
    pub fn aggregate_id(&self) -> Uuid {
        match self {
            AccountEvent::OnlineAccountCreated { account_id }
            | AccountEvent::DepositMade { account_id, .. }
            | AccountEvent::MoneyWithdrawn { account_id, .. }
            | AccountEvent::TransactionAccountDebited { account_id, .. }
            | AccountEvent::TransactionAccountDeposited { account_id, .. } => *account_id,
        }
    }

    pub fn event_type(&self) -> &'static str {
        match self {
            AccountEvent::OnlineAccountCreated { .. } => "OnlineAccountCreated",
            AccountEvent::DepositMade { .. } => "DepositMade",
            AccountEvent::MoneyWithdrawn { .. } => "MoneyWithdrawn",
            AccountEvent::TransactionAccountDebited { .. } => "TransactionAccountDebited",
            AccountEvent::TransactionAccountDeposited { .. } => "TransactionAccountDeposited",
        }
    }
}
