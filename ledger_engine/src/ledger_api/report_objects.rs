use ledger_common::Money;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::db_types::TransactionType;

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct TypeTotal {
    pub tx_type: TransactionType,
    pub count: i64,
    pub total: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct UserTotal {
    pub user_id: i64,
    pub count: i64,
    pub total: Money,
}

/// Ledger activity for one calendar month, `month` formatted as `YYYY-MM`.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct MonthlyTotal {
    pub month: String,
    pub count: i64,
    pub total: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct MonthlySettlement {
    pub month: String,
    pub count: i64,
    pub total_amount: Money,
    pub platform_commission: Money,
    pub producer_earnings: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct SettlementTotals {
    pub producer_id: i64,
    pub count: i64,
    pub total_amount: Money,
    pub platform_commission: Money,
    pub producer_earnings: Money,
}

/// Compares a wallet's stored balance with the sum of its ledger entries.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct WalletAudit {
    pub wallet_id: i64,
    pub balance: Money,
    pub ledger_total: Money,
    pub entries: i64,
}

impl WalletAudit {
    pub fn is_consistent(&self) -> bool {
        self.balance == self.ledger_total
    }

    pub fn discrepancy(&self) -> Money {
        self.balance - self.ledger_total
    }
}
