use chrono::{DateTime, Utc};
use ledger_common::Money;
use serde::{Deserialize, Serialize};

use crate::db_types::TransactionType;

pub const DEFAULT_PAGE_SIZE: i64 = 50;
pub const MAX_PAGE_SIZE: i64 = 500;

/// Criteria for selecting ledger entries. Empty criteria select the whole ledger.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LedgerQueryFilter {
    pub tx_type: Option<TransactionType>,
    pub user_id: Option<i64>,
    pub wallet_id: Option<i64>,
    pub since: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
}

impl LedgerQueryFilter {
    pub fn with_tx_type(mut self, tx_type: TransactionType) -> Self {
        self.tx_type = Some(tx_type);
        self
    }

    pub fn with_user_id(mut self, user_id: i64) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn with_wallet_id(mut self, wallet_id: i64) -> Self {
        self.wallet_id = Some(wallet_id);
        self
    }

    pub fn since(mut self, since: DateTime<Utc>) -> Self {
        self.since = Some(since);
        self
    }

    pub fn until(mut self, until: DateTime<Utc>) -> Self {
        self.until = Some(until);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.tx_type.is_none() &&
            self.user_id.is_none() &&
            self.wallet_id.is_none() &&
            self.since.is_none() &&
            self.until.is_none()
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Pagination {
    pub offset: Option<i64>,
    pub count: Option<i64>,
}

impl Pagination {
    pub fn new(offset: i64, count: i64) -> Self {
        Self { offset: Some(offset), count: Some(count) }
    }

    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }

    pub fn count(&self) -> i64 {
        self.count.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
    }
}

/// The inputs the order subsystem supplies when it asks for an order to be settled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementRequest {
    pub producer_id: i64,
    pub order_id: i64,
    pub total_quantity: i64,
    pub total_amount: Money,
    /// Identifies which of the order's lines belong to this producer
    pub producer_code: String,
}
