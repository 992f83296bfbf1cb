use std::time::Duration;

use crate::{
    db_types::{Transaction, Wallet},
    ledger_api::ledger_objects::{LedgerQueryFilter, Pagination},
    traits::LedgerError,
};

#[allow(async_fn_in_trait)]
pub trait WalletManagement {
    /// Fetches the wallet belonging to `user_id`. Every user has at most one.
    async fn fetch_wallet_for_user(&self, user_id: i64) -> Result<Option<Wallet>, LedgerError>;

    async fn fetch_wallet(&self, wallet_id: i64) -> Result<Option<Wallet>, LedgerError>;

    /// Opens a zero-balance wallet for the user, with a freshly minted account number.
    ///
    /// Fails with [`LedgerError::UserNotFound`] if the user does not exist, and with
    /// [`LedgerError::WalletAlreadyExists`] if the user already has a wallet. Work up to the commit is bounded by
    /// `limit`, and an overrun fails with [`LedgerError::Timeout`] without writing anything.
    async fn create_wallet_for_user(&self, user_id: i64, limit: Duration) -> Result<Wallet, LedgerError>;

    /// Fetches ledger entries matching `filter`, newest first.
    async fn fetch_transactions(
        &self,
        filter: LedgerQueryFilter,
        pagination: Pagination,
    ) -> Result<Vec<Transaction>, LedgerError>;

    async fn fetch_transaction_by_reference(&self, reference: &str) -> Result<Option<Transaction>, LedgerError>;
}
