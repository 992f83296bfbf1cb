//! # SQLite Database methods
//!
//! This module contains "low-level" SQLite database interactions.
//!
//! All these interactions are simple functions (rather than stateful structs) that accept a `&mut SqliteConnection`
//! argument. Callers can obtain a connection from a pool, or open an atomic unit with `pool.begin()` and pass `&mut tx`
//! through to the functions without any other changes.
//!
//! SQLite has no row locks. A unit that intends to write must make a write its *first* statement, which takes the
//! database write lock before anything is read. [`wallets::lock_wallet_for_user`] exists for this purpose.
use std::{env, str::FromStr, time::Duration};

use chrono::{DateTime, Utc};
use log::info;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
    Error as SqlxError,
    SqlitePool,
};

pub mod codes;
pub mod orders;
pub mod reversements;
pub mod stats;
pub mod transactions;
pub mod users;
pub mod wallets;

const SQLITE_DB_URL: &str = "sqlite://data/ledger.db";
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

pub fn db_url() -> String {
    let result = env::var("LGR_DATABASE_URL").unwrap_or_else(|_| {
        info!("LGR_DATABASE_URL is not set. Using the default.");
        SQLITE_DB_URL.to_string()
    });
    info!("Using database URL: {result}");
    result
}

pub async fn new_pool(url: &str, max_connections: u32) -> Result<SqlitePool, SqlxError> {
    let options = SqliteConnectOptions::from_str(url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(BUSY_TIMEOUT);
    let pool = SqlitePoolOptions::new().max_connections(max_connections).connect_with(options).await?;
    Ok(pool)
}

/// Formats a timestamp the way SQLite's `CURRENT_TIMESTAMP` stores it, so that range comparisons on text columns work.
pub(crate) fn sql_timestamp(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d %H:%M:%S").to_string()
}
