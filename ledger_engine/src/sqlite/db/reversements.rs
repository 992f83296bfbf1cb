use log::debug;
use sqlx::SqliteConnection;

use crate::{
    db_types::{NewSettlement, Reversement},
    traits::LedgerError,
};

pub async fn insert_reversement(
    settlement: &NewSettlement,
    wallet_id: i64,
    transaction_id: Option<i64>,
    reference: String,
    conn: &mut SqliteConnection,
) -> Result<Reversement, LedgerError> {
    let split = settlement.split;
    let reversement: Reversement = sqlx::query_as(
        r#"
        INSERT INTO reversements (
            producer_id,
            order_id,
            total_quantity,
            total_amount,
            platform_commission,
            producer_earnings,
            wallet_id,
            transaction_id,
            reference
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING *"#,
    )
    .bind(settlement.producer_id)
    .bind(settlement.order_id)
    .bind(settlement.total_quantity)
    .bind(split.total())
    .bind(split.platform_commission())
    .bind(split.producer_earnings())
    .bind(wallet_id)
    .bind(transaction_id)
    .bind(reference)
    .fetch_one(conn)
    .await?;
    debug!("🤝️ Settlement record {} saved for order #{}", reversement.reference, reversement.order_id);
    Ok(reversement)
}

pub async fn fetch_reversement(id: i64, conn: &mut SqliteConnection) -> Result<Option<Reversement>, LedgerError> {
    let reversement = sqlx::query_as("SELECT * FROM reversements WHERE id = $1").bind(id).fetch_optional(conn).await?;
    Ok(reversement)
}

pub async fn fetch_reversement_for_order(
    order_id: i64,
    producer_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Option<Reversement>, LedgerError> {
    let reversement = sqlx::query_as("SELECT * FROM reversements WHERE order_id = $1 AND producer_id = $2")
        .bind(order_id)
        .bind(producer_id)
        .fetch_optional(conn)
        .await?;
    Ok(reversement)
}

pub async fn delete_reversement(id: i64, conn: &mut SqliteConnection) -> Result<Reversement, LedgerError> {
    let reversement = sqlx::query_as("DELETE FROM reversements WHERE id = $1 RETURNING *")
        .bind(id)
        .fetch_optional(conn)
        .await?
        .ok_or(LedgerError::ReversementNotFound(id))?;
    Ok(reversement)
}
