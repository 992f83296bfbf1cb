use std::fmt::Debug;

use chrono::{DateTime, Utc};

use crate::{
    db_types::TransactionType,
    ledger_api::{
        ledger_objects::LedgerQueryFilter,
        report_objects::{MonthlySettlement, MonthlyTotal, SettlementTotals, TypeTotal, UserTotal, WalletAudit},
    },
    traits::{LedgerReporting, ReportingError},
};

/// Read-only aggregation views over the ledger.
pub struct ReportingApi<B> {
    db: B,
}

impl<B: Debug> Debug for ReportingApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ReportingApi ({:?})", self.db)
    }
}

impl<B> ReportingApi<B>
where B: LedgerReporting
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    pub async fn totals_by_type(&self, filter: LedgerQueryFilter) -> Result<Vec<TypeTotal>, ReportingError> {
        check_range(filter.since, filter.until)?;
        self.db.totals_by_type(filter).await
    }

    pub async fn totals_by_user(&self, filter: LedgerQueryFilter) -> Result<Vec<UserTotal>, ReportingError> {
        check_range(filter.since, filter.until)?;
        self.db.totals_by_user(filter).await
    }

    pub async fn monthly_totals(
        &self,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
        tx_type: Option<TransactionType>,
    ) -> Result<Vec<MonthlyTotal>, ReportingError> {
        check_range(Some(since), Some(until))?;
        self.db.monthly_totals(since, until, tx_type).await
    }

    pub async fn monthly_settlements(
        &self,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<Vec<MonthlySettlement>, ReportingError> {
        check_range(Some(since), Some(until))?;
        self.db.monthly_settlements(since, until).await
    }

    pub async fn producer_settlements(&self, producer_id: i64) -> Result<SettlementTotals, ReportingError> {
        self.db.settlement_totals_for_producer(producer_id).await
    }

    pub async fn audit_wallet(&self, wallet_id: i64) -> Result<Option<WalletAudit>, ReportingError> {
        self.db.audit_wallet(wallet_id).await
    }
}

fn check_range(since: Option<DateTime<Utc>>, until: Option<DateTime<Utc>>) -> Result<(), ReportingError> {
    match (since, until) {
        (Some(since), Some(until)) if since > until => {
            Err(ReportingError::QueryError(format!("The range starts ({since}) after it ends ({until})")))
        },
        _ => Ok(()),
    }
}
