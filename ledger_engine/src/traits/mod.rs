//! # Backend contracts
//!
//! The ledger APIs are generic over their storage backend. A backend implements the traits in this module.
//!
//! * [`WalletManagement`] reads and opens wallets, and queries the transactions ledger.
//! * [`LedgerDatabase`] is the highest level of behavior. It runs the atomic units of work that move money: wallet
//!   recharges and order settlements. Every balance change goes through one of these, and each one commits or rolls
//!   back as a whole.
//! * [`LedgerReporting`] provides the read-only aggregation views used by dashboards.
mod ledger_database;
mod ledger_reporting;
mod wallet_management;

pub use ledger_database::{LedgerDatabase, LedgerError};
pub use ledger_reporting::{LedgerReporting, ReportingError};
pub use wallet_management::WalletManagement;
