//! Seller wallet.

use chrono::{DateTime, Utc};
use kasuwa_core::{Price, TransactionId, TransactionKind, TransactionStatus};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Current wallet balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletBalance {
    /// Funds that can be withdrawn now.
    pub available: Decimal,
    /// Funds held until orders settle.
    #[serde(default)]
    pub pending: Decimal,
}

impl WalletBalance {
    /// Available balance in naira.
    #[must_use]
    pub const fn available(&self) -> Price {
        Price::naira(self.available)
    }

    /// Pending balance in naira.
    #[must_use]
    pub const fn pending(&self) -> Price {
        Price::naira(self.pending)
    }
}

/// One ledger entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletTransaction {
    pub id: TransactionId,
    pub kind: TransactionKind,
    pub amount: Decimal,
    #[serde(default)]
    pub status: TransactionStatus,
    #[serde(default)]
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl WalletTransaction {
    /// Amount with a sign matching its direction, e.g. `-₦500.00`.
    #[must_use]
    pub fn signed_display(&self) -> String {
        let amount = Price::naira(self.amount).display();
        match self.kind {
            TransactionKind::Credit => format!("+{amount}"),
            TransactionKind::Debit => format!("-{amount}"),
        }
    }
}
