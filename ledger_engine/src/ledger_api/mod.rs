//! # Ledger public API
//!
//! The `ledger_api` module exposes the programmatic API of the ledger engine. The API is modular, so that clients can
//! pick the functionality they need.
//!
//! * [`wallet_api`] opens wallets, recharges them and lists their history.
//! * [`settlement_api`] settles a producer's share of an order, splitting it between the producer and the platform.
//! * [`reporting_api`] provides the aggregation views used by dashboards.
//!
//! # API usage
//!
//! An API instance is created by supplying a database backend that implements the backend traits the API needs.
//!
//! ```rust,ignore
//! use ledger_engine::{events::EventProducers, settings::LedgerSettings, SqliteDatabase, WalletApi};
//! let db = SqliteDatabase::new_with_url("sqlite://data/ledger.db", 25).await?;
//! let api = WalletApi::new(db, EventProducers::default(), LedgerSettings::default());
//! let result = api.recharge(user_id, "12.50".parse()?, "card", "online").await?;
//! ```
//!
//! Every money-moving call runs as a single atomic unit with an upper bound on its duration
//! ([`crate::settings::LedgerSettings::unit_timeout`]). The bound covers the unit's work up to its commit. A unit that
//! overruns is abandoned and rolled back, and the caller receives [`LedgerError::Timeout`]. Once the commit has been
//! issued it runs to completion, so a caller that sees `Timeout` knows that nothing was written.
use std::{future::Future, time::Duration};

use crate::traits::LedgerError;

pub mod ledger_objects;
pub mod report_objects;
pub mod reporting_api;
pub mod settlement_api;
pub mod wallet_api;

/// Runs `unit` to completion, or drops it (rolling back any open database transaction) once `limit` has elapsed.
pub(crate) async fn within_limit<T, F>(limit: Duration, unit: F) -> Result<T, LedgerError>
where F: Future<Output = Result<T, LedgerError>> {
    match tokio::time::timeout(limit, unit).await {
        Ok(result) => result,
        Err(_) => Err(LedgerError::Timeout(limit)),
    }
}

/// Runs `stage` within `limit` and hands its output to `commit`, which is never cut short.
pub(crate) async fn stage_then_commit<S, T, F, C, CF>(limit: Duration, stage: F, commit: C) -> Result<T, LedgerError>
where
    F: Future<Output = Result<S, LedgerError>>,
    C: FnOnce(S) -> CF,
    CF: Future<Output = Result<T, LedgerError>>,
{
    let staged = within_limit(limit, stage).await?;
    commit(staged).await
}
