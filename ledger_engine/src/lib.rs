//! Ledger Engine
//!
//! The ledger engine is the financial back office of the marketplace. It keeps one wallet per user, an append-only
//! ledger of every balance change, and settles delivered orders by splitting their value between the producer and
//! the platform.
//!
//! The library is divided into three main sections:
//! 1. Storage ([`mod@sqlite`]). SQLite is the supported backend. You should never need to access the database
//!    directly; use the public API instead. The exception is the data types stored in the database, which are defined
//!    in [`mod@db_types`] and are public.
//! 2. The backend contracts ([`mod@traits`]). Any store that implements these traits can back the public API.
//! 3. The public API ([`mod@ledger_api`]): wallets and recharges, settlements, and reporting.
//!
//! Every operation that moves money runs as one atomic unit. Each balance change is matched by exactly one ledger
//! entry, so that a wallet's balance always equals the sum of its entries.
//!
//! The engine also publishes events after each committed unit ([`mod@events`]), so that notification senders and
//! the like can react without being part of the unit.
pub mod codes;
pub mod commission;
pub mod db_types;
pub mod events;
pub mod ledger_api;
pub mod settings;
#[cfg(feature = "sqlite")]
pub mod sqlite;
pub mod traits;

#[cfg(all(feature = "sqlite", any(feature = "test_utils", test)))]
pub mod test_utils;

pub use ledger_api::{
    ledger_objects,
    report_objects,
    reporting_api::ReportingApi,
    settlement_api::SettlementApi,
    wallet_api::WalletApi,
};
pub use ledger_common::Money;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDatabase;
pub use traits::{LedgerDatabase, LedgerError, LedgerReporting, ReportingError, WalletManagement};
