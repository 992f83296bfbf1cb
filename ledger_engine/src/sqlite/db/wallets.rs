use ledger_common::Money;
use log::{debug, trace};
use sqlx::SqliteConnection;

use crate::{db_types::Wallet, traits::LedgerError};

pub async fn fetch_wallet_for_user(user_id: i64, conn: &mut SqliteConnection) -> Result<Option<Wallet>, LedgerError> {
    let wallet = sqlx::query_as("SELECT * FROM wallets WHERE user_id = $1").bind(user_id).fetch_optional(conn).await?;
    Ok(wallet)
}

pub async fn fetch_wallet(wallet_id: i64, conn: &mut SqliteConnection) -> Result<Option<Wallet>, LedgerError> {
    let wallet = sqlx::query_as("SELECT * FROM wallets WHERE id = $1").bind(wallet_id).fetch_optional(conn).await?;
    Ok(wallet)
}

/// Takes the write lock for the rest of the current atomic unit and returns the user's wallet as it stands under
/// that lock.
///
/// This must be the first statement of the unit. Returns `None` (still holding the lock) if the user has no wallet.
pub async fn lock_wallet_for_user(user_id: i64, conn: &mut SqliteConnection) -> Result<Option<Wallet>, LedgerError> {
    let wallet: Option<Wallet> =
        sqlx::query_as("UPDATE wallets SET updated_at = CURRENT_TIMESTAMP WHERE user_id = $1 RETURNING *")
            .bind(user_id)
            .fetch_optional(conn)
            .await?;
    if let Some(w) = &wallet {
        trace!("💰️ Wallet #{} of user {user_id} locked", w.id);
    }
    Ok(wallet)
}

/// Locks the platform wallet: the wallet of `platform_user_id` when given, otherwise that of the lowest-id admin.
pub async fn lock_platform_wallet(
    platform_user_id: Option<i64>,
    conn: &mut SqliteConnection,
) -> Result<Option<Wallet>, LedgerError> {
    if let Some(user_id) = platform_user_id {
        return lock_wallet_for_user(user_id, conn).await;
    }
    let wallet = sqlx::query_as(
        r#"
        UPDATE wallets SET updated_at = CURRENT_TIMESTAMP
        WHERE user_id = (SELECT id FROM users WHERE role = 'ADMIN' ORDER BY id LIMIT 1)
        RETURNING *"#,
    )
    .fetch_optional(conn)
    .await?;
    Ok(wallet)
}

/// Adds `amount` to the stored balance. The delta is applied in SQL, never computed from a previously read value.
pub async fn increment_balance(
    wallet_id: i64,
    amount: Money,
    conn: &mut SqliteConnection,
) -> Result<Wallet, LedgerError> {
    if !amount.is_positive() {
        return Err(LedgerError::InvalidAmount(amount));
    }
    let wallet: Wallet = sqlx::query_as(
        "UPDATE wallets SET balance = balance + $1, updated_at = CURRENT_TIMESTAMP WHERE id = $2 RETURNING *",
    )
    .bind(amount)
    .bind(wallet_id)
    .fetch_optional(conn)
    .await?
    .ok_or(LedgerError::WalletIdNotFound(wallet_id))?;
    debug!("💰️ Wallet #{wallet_id} credited with {amount}. New balance: {}", wallet.balance);
    Ok(wallet)
}

pub async fn update_payment_metadata(
    wallet_id: i64,
    payment_method: &str,
    recharge_type: &str,
    conn: &mut SqliteConnection,
) -> Result<Wallet, LedgerError> {
    let wallet = sqlx::query_as(
        r#"
        UPDATE wallets SET payment_method = $1, recharge_type = $2, updated_at = CURRENT_TIMESTAMP
        WHERE id = $3
        RETURNING *"#,
    )
    .bind(payment_method)
    .bind(recharge_type)
    .bind(wallet_id)
    .fetch_optional(conn)
    .await?
    .ok_or(LedgerError::WalletIdNotFound(wallet_id))?;
    Ok(wallet)
}

pub async fn insert_wallet(
    user_id: i64,
    account_number: String,
    conn: &mut SqliteConnection,
) -> Result<Wallet, LedgerError> {
    let wallet: Wallet = sqlx::query_as("INSERT INTO wallets (user_id, account_number) VALUES ($1, $2) RETURNING *")
        .bind(user_id)
        .bind(account_number)
        .fetch_one(conn)
        .await?;
    debug!("💰️ Wallet #{} ({}) opened for user {user_id}", wallet.id, wallet.account_number);
    Ok(wallet)
}
