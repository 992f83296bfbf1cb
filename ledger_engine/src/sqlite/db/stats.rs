use chrono::{DateTime, Utc};
use log::trace;
use sqlx::{QueryBuilder, SqliteConnection};

use crate::{
    db_types::TransactionType,
    ledger_api::{
        ledger_objects::LedgerQueryFilter,
        report_objects::{MonthlySettlement, MonthlyTotal, SettlementTotals, TypeTotal, UserTotal, WalletAudit},
    },
    sqlite::db::{sql_timestamp, transactions::push_filter},
    traits::ReportingError,
};

pub async fn totals_by_type(
    filter: LedgerQueryFilter,
    conn: &mut SqliteConnection,
) -> Result<Vec<TypeTotal>, ReportingError> {
    let mut builder = QueryBuilder::new("SELECT tx_type, COUNT(*) AS count, SUM(amount) AS total FROM transactions");
    push_filter(&mut builder, filter);
    builder.push(" GROUP BY tx_type ORDER BY tx_type");
    trace!("📊️ Executing query: {}", builder.sql());
    let totals = builder.build_query_as::<TypeTotal>().fetch_all(conn).await?;
    Ok(totals)
}

pub async fn totals_by_user(
    filter: LedgerQueryFilter,
    conn: &mut SqliteConnection,
) -> Result<Vec<UserTotal>, ReportingError> {
    let mut builder = QueryBuilder::new("SELECT user_id, COUNT(*) AS count, SUM(amount) AS total FROM transactions");
    push_filter(&mut builder, filter);
    builder.push(" GROUP BY user_id ORDER BY total DESC, user_id");
    trace!("📊️ Executing query: {}", builder.sql());
    let totals = builder.build_query_as::<UserTotal>().fetch_all(conn).await?;
    Ok(totals)
}

pub async fn monthly_totals(
    since: DateTime<Utc>,
    until: DateTime<Utc>,
    tx_type: Option<TransactionType>,
    conn: &mut SqliteConnection,
) -> Result<Vec<MonthlyTotal>, ReportingError> {
    let mut builder = QueryBuilder::new(
        "SELECT strftime('%Y-%m', created_at) AS month, COUNT(*) AS count, SUM(amount) AS total FROM transactions \
         WHERE created_at >= ",
    );
    builder.push_bind(sql_timestamp(&since));
    builder.push(" AND created_at <= ");
    builder.push_bind(sql_timestamp(&until));
    if let Some(tx_type) = tx_type {
        builder.push(" AND tx_type = ");
        builder.push_bind(tx_type.to_string());
    }
    builder.push(" GROUP BY month ORDER BY month");
    trace!("📊️ Executing query: {}", builder.sql());
    let totals = builder.build_query_as::<MonthlyTotal>().fetch_all(conn).await?;
    Ok(totals)
}

pub async fn monthly_settlements(
    since: DateTime<Utc>,
    until: DateTime<Utc>,
    conn: &mut SqliteConnection,
) -> Result<Vec<MonthlySettlement>, ReportingError> {
    let totals = sqlx::query_as(
        r#"
        SELECT
            strftime('%Y-%m', created_at) AS month,
            COUNT(*) AS count,
            SUM(total_amount) AS total_amount,
            SUM(platform_commission) AS platform_commission,
            SUM(producer_earnings) AS producer_earnings
        FROM reversements
        WHERE created_at >= $1 AND created_at <= $2
        GROUP BY month
        ORDER BY month"#,
    )
    .bind(sql_timestamp(&since))
    .bind(sql_timestamp(&until))
    .fetch_all(conn)
    .await?;
    Ok(totals)
}

pub async fn settlement_totals_for_producer(
    producer_id: i64,
    conn: &mut SqliteConnection,
) -> Result<SettlementTotals, ReportingError> {
    let totals = sqlx::query_as(
        r#"
        SELECT
            $1 AS producer_id,
            COUNT(*) AS count,
            COALESCE(SUM(total_amount), 0) AS total_amount,
            COALESCE(SUM(platform_commission), 0) AS platform_commission,
            COALESCE(SUM(producer_earnings), 0) AS producer_earnings
        FROM reversements
        WHERE producer_id = $1"#,
    )
    .bind(producer_id)
    .fetch_one(conn)
    .await?;
    Ok(totals)
}

pub async fn audit_wallet(wallet_id: i64, conn: &mut SqliteConnection) -> Result<Option<WalletAudit>, ReportingError> {
    let audit = sqlx::query_as(
        r#"
        SELECT
            wallets.id AS wallet_id,
            wallets.balance AS balance,
            COALESCE(SUM(transactions.amount), 0) AS ledger_total,
            COUNT(transactions.id) AS entries
        FROM wallets LEFT JOIN transactions ON transactions.wallet_id = wallets.id
        WHERE wallets.id = $1
        GROUP BY wallets.id"#,
    )
    .bind(wallet_id)
    .fetch_optional(conn)
    .await?;
    Ok(audit)
}
