use std::time::Duration;

use ledger_common::Money;
use thiserror::Error;

use crate::{
    db_types::{NewRecharge, NewSettlement, RechargeResult, Reversement},
    traits::WalletManagement,
};

/// This trait defines the highest level of behaviour for ledger backends.
///
/// Each money-moving method is a single atomic unit: either every write it makes is committed, or none are. Backends
/// must serialize units that touch the same wallet, and must only ever change balances by applying a delta to the
/// stored value.
///
/// The `limit` given to a unit bounds its work up to the commit. A unit that overruns is rolled back and fails with
/// [`LedgerError::Timeout`]. The commit itself is never abandoned, so `Timeout` always means nothing was written.
#[allow(async_fn_in_trait)]
pub trait LedgerDatabase: Clone + WalletManagement {
    /// The URL of the database
    fn url(&self) -> &str;

    /// Credits the user's wallet with `recharge.amount`, in a single atomic unit:
    /// * the wallet is locked,
    /// * a `DEPOSIT` ledger entry is recorded for the amount,
    /// * the balance is incremented,
    /// * the payment method and recharge channel are stored on the wallet.
    ///
    /// Returns the updated wallet and the new ledger entry.
    async fn recharge_wallet(&self, recharge: NewRecharge, limit: Duration) -> Result<RechargeResult, LedgerError>;

    /// Settles one producer's share of an order, in a single atomic unit.
    ///
    /// The platform wallet is the wallet of `platform_user_id` if given, otherwise that of the lowest-id admin.
    /// Preconditions are checked in this order, and the first failure aborts the unit:
    /// 1. the producer has a wallet ([`LedgerError::ProducerOrWalletNotFound`]),
    /// 2. the order exists ([`LedgerError::OrderNotFound`]),
    /// 3. the platform wallet exists ([`LedgerError::PlatformWalletNotFound`]),
    /// 4. the order has not already been settled for this producer ([`LedgerError::AlreadySettled`]).
    ///
    /// On success both wallets have been credited with their share, each credit has its own `DEPOSIT` ledger entry,
    /// the producer's order lines have been marked, and the settlement record is returned.
    async fn settle_order(
        &self,
        settlement: NewSettlement,
        platform_user_id: Option<i64>,
        limit: Duration,
    ) -> Result<Reversement, LedgerError>;

    async fn fetch_reversement(&self, id: i64) -> Result<Option<Reversement>, LedgerError>;

    async fn fetch_reversement_for_order(
        &self,
        order_id: i64,
        producer_id: i64,
    ) -> Result<Option<Reversement>, LedgerError>;

    /// Deletes a settlement record, so that the order can be settled again for that producer.
    /// Ledger entries and balances are left untouched.
    async fn delete_reversement(&self, id: i64) -> Result<Reversement, LedgerError>;

    async fn close(&mut self) -> Result<(), LedgerError> {
        Ok(())
    }
}

#[derive(Debug, Clone, Error)]
pub enum LedgerError {
    #[error("We have an internal database engine (configuration/uptime etc.) error: {0}")]
    DatabaseError(String),
    #[error("Amounts must be greater than zero, but {0} was given")]
    InvalidAmount(Money),
    #[error("Invalid request. {0}")]
    ValidationError(String),
    #[error("User {0} does not exist")]
    UserNotFound(i64),
    #[error("User {0} does not have a wallet")]
    WalletNotFound(i64),
    #[error("Wallet #{0} does not exist")]
    WalletIdNotFound(i64),
    #[error("User {0} already has a wallet")]
    WalletAlreadyExists(i64),
    #[error("Producer {0} does not exist or does not have a wallet")]
    ProducerOrWalletNotFound(i64),
    #[error("Order {0} does not exist")]
    OrderNotFound(i64),
    #[error("The platform wallet does not exist")]
    PlatformWalletNotFound,
    #[error("Order {order_id} has already been settled for producer {producer_id}")]
    AlreadySettled { order_id: i64, producer_id: i64 },
    #[error("Settlement record {0} does not exist")]
    ReversementNotFound(i64),
    #[error("Could not mint a unique code with prefix {prefix} after {attempts} attempts")]
    CodeGenerationExhausted { prefix: String, attempts: usize },
    #[error("The operation did not complete within {0:?} and was rolled back")]
    Timeout(Duration),
}

impl From<sqlx::Error> for LedgerError {
    fn from(e: sqlx::Error) -> Self {
        LedgerError::DatabaseError(e.to_string())
    }
}
