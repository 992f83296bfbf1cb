//! # Ledger server
//! The HTTP face of the marketplace ledger. It exposes the wallet, settlement and reporting APIs of `ledger_engine` as
//! JSON endpoints for the other back-office services (orders, payments, notifications and the admin dashboard).
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! * `/health`: A health check route that returns a 200 OK response.
//! * `/api/wallets/{user_id}`: fetch (`GET`) or open (`POST`) a user's wallet.
//! * `/api/wallets/{user_id}/recharge`: credit a wallet after a captured payment.
//! * `/api/wallets/{user_id}/transactions` and `/api/wallets/{user_id}/audit`: a wallet's ledger and its audit.
//! * `/api/transactions` and `/api/transactions/{reference}`: search the ledger.
//! * `/api/settlements` and `/api/settlements/{id}`: settle, fetch and revoke settlements.
//! * `/api/stats/...`: the aggregation views.
//!
//! Amounts are always sent and received as decimal strings with two fractional digits.

pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
