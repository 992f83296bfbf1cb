use log::{debug, trace};
use sqlx::{QueryBuilder, SqliteConnection};

use crate::{
    codes::{CodeGenerator, CodeScope, MintedCodes},
    db_types::{NewTransaction, Transaction},
    ledger_api::ledger_objects::{LedgerQueryFilter, Pagination},
    sqlite::db::{codes, sql_timestamp},
    traits::LedgerError,
};

/// Appends an entry to the ledger under a freshly minted reference. This is not atomic on its own; call it inside the
/// unit that also applies the matching balance change.
pub async fn record(
    entry: NewTransaction,
    generator: &CodeGenerator,
    minted: &mut MintedCodes,
    conn: &mut SqliteConnection,
) -> Result<Transaction, LedgerError> {
    let reference = codes::mint(generator, CodeScope::Transaction, minted, &mut *conn).await?;
    insert_transaction(entry, reference, conn).await
}

/// Appends an entry to the ledger under a reference that the caller has already minted.
pub async fn insert_transaction(
    entry: NewTransaction,
    reference: String,
    conn: &mut SqliteConnection,
) -> Result<Transaction, LedgerError> {
    if !entry.amount.is_positive() {
        return Err(LedgerError::InvalidAmount(entry.amount));
    }
    let tx: Transaction = sqlx::query_as(
        r#"
        INSERT INTO transactions (amount, tx_type, wallet_id, user_id, reference, description)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *"#,
    )
    .bind(entry.amount)
    .bind(entry.tx_type)
    .bind(entry.wallet_id)
    .bind(entry.user_id)
    .bind(reference)
    .bind(entry.description)
    .fetch_one(conn)
    .await?;
    debug!("🧾️ {} {} of {} recorded against wallet #{}", tx.tx_type, tx.reference, tx.amount, tx.wallet_id);
    Ok(tx)
}

pub async fn fetch_transaction_by_reference(
    reference: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<Transaction>, LedgerError> {
    let tx = sqlx::query_as("SELECT * FROM transactions WHERE reference = $1")
        .bind(reference)
        .fetch_optional(conn)
        .await?;
    Ok(tx)
}

pub(crate) fn push_filter<'a>(builder: &mut QueryBuilder<'a, sqlx::Sqlite>, filter: LedgerQueryFilter) {
    if filter.is_empty() {
        return;
    }
    builder.push(" WHERE ");
    let mut where_clause = builder.separated(" AND ");
    if let Some(tx_type) = filter.tx_type {
        where_clause.push("tx_type = ");
        where_clause.push_bind_unseparated(tx_type.to_string());
    }
    if let Some(user_id) = filter.user_id {
        where_clause.push("user_id = ");
        where_clause.push_bind_unseparated(user_id);
    }
    if let Some(wallet_id) = filter.wallet_id {
        where_clause.push("wallet_id = ");
        where_clause.push_bind_unseparated(wallet_id);
    }
    if let Some(since) = filter.since {
        where_clause.push("created_at >= ");
        where_clause.push_bind_unseparated(sql_timestamp(&since));
    }
    if let Some(until) = filter.until {
        where_clause.push("created_at <= ");
        where_clause.push_bind_unseparated(sql_timestamp(&until));
    }
}

/// Fetches ledger entries matching the filter, newest first.
pub async fn fetch_transactions(
    filter: LedgerQueryFilter,
    pagination: Pagination,
    conn: &mut SqliteConnection,
) -> Result<Vec<Transaction>, LedgerError> {
    let mut builder = QueryBuilder::new("SELECT * FROM transactions");
    push_filter(&mut builder, filter);
    builder.push(" ORDER BY created_at DESC, id DESC LIMIT ");
    builder.push_bind(pagination.count());
    builder.push(" OFFSET ");
    builder.push_bind(pagination.offset());
    trace!("🧾️ Executing query: {}", builder.sql());
    let transactions = builder.build_query_as::<Transaction>().fetch_all(conn).await?;
    Ok(transactions)
}
