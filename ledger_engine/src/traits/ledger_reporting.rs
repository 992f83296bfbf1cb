use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::{
    db_types::TransactionType,
    ledger_api::{
        ledger_objects::LedgerQueryFilter,
        report_objects::{MonthlySettlement, MonthlyTotal, SettlementTotals, TypeTotal, UserTotal, WalletAudit},
    },
};

/// Read-only aggregation views over the transactions ledger and the settlement records.
///
/// These views never lock anything, so they may observe the store between two atomic units but never partway through
/// one.
#[allow(async_fn_in_trait)]
pub trait LedgerReporting {
    /// Count and sum of ledger entries matching `filter`, grouped by transaction type.
    async fn totals_by_type(&self, filter: LedgerQueryFilter) -> Result<Vec<TypeTotal>, ReportingError>;

    /// Count and sum of ledger entries matching `filter`, grouped by user, largest total first.
    async fn totals_by_user(&self, filter: LedgerQueryFilter) -> Result<Vec<UserTotal>, ReportingError>;

    /// Ledger entries grouped by calendar month within `[since, until]`, oldest month first.
    async fn monthly_totals(
        &self,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
        tx_type: Option<TransactionType>,
    ) -> Result<Vec<MonthlyTotal>, ReportingError>;

    /// Settlement records grouped by calendar month within `[since, until]`, oldest month first.
    async fn monthly_settlements(
        &self,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<Vec<MonthlySettlement>, ReportingError>;

    /// Lifetime settlement totals for a producer. A producer with no settlements gets all-zero totals.
    async fn settlement_totals_for_producer(&self, producer_id: i64) -> Result<SettlementTotals, ReportingError>;

    /// Compares the wallet's balance with the sum of its ledger entries. `None` if the wallet does not exist.
    async fn audit_wallet(&self, wallet_id: i64) -> Result<Option<WalletAudit>, ReportingError>;
}

#[derive(Debug, Clone, Error)]
pub enum ReportingError {
    #[error("We have an internal database engine (configuration/uptime etc.) error: {0}")]
    DatabaseError(String),
    #[error("Invalid query: {0}")]
    QueryError(String),
}

impl From<sqlx::Error> for ReportingError {
    fn from(e: sqlx::Error) -> Self {
        ReportingError::DatabaseError(e.to_string())
    }
}
