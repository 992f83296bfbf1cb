//! `SqliteDatabase` is a concrete implementation of a ledger backend.
//!
//! Unsurprisingly, it uses SQLite as the store and implements all the traits defined in the [`crate::traits`] module.
use std::{fmt::Debug, time::Duration};

use chrono::{DateTime, Utc};
use log::*;
use sqlx::{Sqlite, SqlitePool, Transaction as DbTransaction};

use super::db::{codes, db_url, new_pool, orders, reversements, stats, transactions, users, wallets};
use crate::{
    codes::{CodeGenerator, CodeScope, MintedCodes},
    db_types::{
        NewOrder,
        NewRecharge,
        NewSettlement,
        NewTransaction,
        NewUser,
        Order,
        OrderItem,
        Product,
        RechargeResult,
        Reversement,
        Transaction,
        TransactionType,
        User,
        Wallet,
    },
    ledger_api::{
        ledger_objects::{LedgerQueryFilter, Pagination},
        report_objects::{MonthlySettlement, MonthlyTotal, SettlementTotals, TypeTotal, UserTotal, WalletAudit},
        stage_then_commit,
    },
    traits::{LedgerDatabase, LedgerError, LedgerReporting, ReportingError, WalletManagement},
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
    codes: CodeGenerator,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?}, {:?})", self.pool, self.codes)
    }
}

impl SqliteDatabase {
    /// Creates a new database API object, using the URL in `LGR_DATABASE_URL`.
    pub async fn new(max_connections: u32) -> Result<Self, sqlx::Error> {
        let url = db_url();
        SqliteDatabase::new_with_url(url.as_str(), max_connections).await
    }

    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        trace!("Creating new database connection pool with url {url}");
        let pool = new_pool(url, max_connections).await?;
        let url = url.to_string();
        Ok(Self { url, pool, codes: CodeGenerator::default() })
    }

    /// Replaces the reference code generator. Mostly useful for tests that need predictable or colliding codes.
    pub fn with_code_generator(mut self, codes: CodeGenerator) -> Self {
        self.codes = codes;
        self
    }

    /// Returns a reference to the database connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./src/sqlite/migrations").run(&self.pool).await?;
        info!("🗃️ Database migrations are up to date");
        Ok(())
    }

    pub async fn create_user(&self, user: NewUser) -> Result<User, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        users::insert_user(user, &mut conn).await
    }

    pub async fn fetch_user(&self, user_id: i64) -> Result<Option<User>, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        users::fetch_user(user_id, &mut conn).await
    }

    /// Creates a user and opens their wallet in one atomic unit.
    pub async fn create_user_with_wallet(&self, user: NewUser) -> Result<(User, Wallet), LedgerError> {
        let mut tx = self.pool.begin().await?;
        let user = users::insert_user(user, &mut tx).await?;
        let mut minted = MintedCodes::default();
        let account_number = codes::mint(&self.codes, CodeScope::Wallet, &mut minted, &mut tx).await?;
        let wallet = wallets::insert_wallet(user.id, account_number, &mut tx).await?;
        tx.commit().await?;
        Ok((user, wallet))
    }

    pub async fn create_product(&self, name: &str, producer_code: &str) -> Result<Product, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        orders::insert_product(name, producer_code, &mut conn).await
    }

    pub async fn create_order(&self, order: NewOrder) -> Result<Order, LedgerError> {
        let mut tx = self.pool.begin().await?;
        let order = orders::insert_order(order, &mut tx).await?;
        tx.commit().await?;
        Ok(order)
    }

    pub async fn fetch_order_items(&self, order_id: i64) -> Result<Vec<OrderItem>, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        orders::fetch_order_items(order_id, &mut conn).await
    }
}

impl WalletManagement for SqliteDatabase {
    async fn fetch_wallet_for_user(&self, user_id: i64) -> Result<Option<Wallet>, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        wallets::fetch_wallet_for_user(user_id, &mut conn).await
    }

    async fn fetch_wallet(&self, wallet_id: i64) -> Result<Option<Wallet>, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        wallets::fetch_wallet(wallet_id, &mut conn).await
    }

    async fn create_wallet_for_user(&self, user_id: i64, limit: Duration) -> Result<Wallet, LedgerError> {
        let unit = async {
            let mut tx = self.pool.begin().await?;
            if users::lock_user(user_id, &mut tx).await?.is_none() {
                return Err(LedgerError::UserNotFound(user_id));
            }
            if wallets::fetch_wallet_for_user(user_id, &mut tx).await?.is_some() {
                return Err(LedgerError::WalletAlreadyExists(user_id));
            }
            let mut minted = MintedCodes::default();
            let account_number = codes::mint(&self.codes, CodeScope::Wallet, &mut minted, &mut tx).await?;
            let wallet = wallets::insert_wallet(user_id, account_number, &mut tx).await?;
            Ok::<_, LedgerError>((tx, wallet))
        };
        stage_then_commit(limit, unit, commit).await
    }

    async fn fetch_transactions(
        &self,
        filter: LedgerQueryFilter,
        pagination: Pagination,
    ) -> Result<Vec<Transaction>, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        transactions::fetch_transactions(filter, pagination, &mut conn).await
    }

    async fn fetch_transaction_by_reference(&self, reference: &str) -> Result<Option<Transaction>, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        transactions::fetch_transaction_by_reference(reference, &mut conn).await
    }
}

impl LedgerDatabase for SqliteDatabase {
    fn url(&self) -> &str {
        self.url.as_str()
    }

    async fn recharge_wallet(&self, recharge: NewRecharge, limit: Duration) -> Result<RechargeResult, LedgerError> {
        if !recharge.amount.is_positive() {
            return Err(LedgerError::InvalidAmount(recharge.amount));
        }
        let unit = async {
            let mut tx = self.pool.begin().await?;
            let wallet = wallets::lock_wallet_for_user(recharge.user_id, &mut tx)
                .await?
                .ok_or(LedgerError::WalletNotFound(recharge.user_id))?;
            let mut minted = MintedCodes::default();
            let entry = NewTransaction::deposit(&wallet, recharge.amount).with_description(recharge.description());
            let transaction = transactions::record(entry, &self.codes, &mut minted, &mut tx).await?;
            wallets::increment_balance(wallet.id, recharge.amount, &mut tx).await?;
            let wallet =
                wallets::update_payment_metadata(wallet.id, &recharge.payment_method, &recharge.recharge_type, &mut tx)
                    .await?;
            Ok::<_, LedgerError>((tx, RechargeResult { wallet, transaction }))
        };
        let result = stage_then_commit(limit, unit, commit).await?;
        debug!(
            "💰️ Wallet #{} recharged with {} ({})",
            result.wallet.id, recharge.amount, result.transaction.reference
        );
        Ok(result)
    }

    async fn settle_order(
        &self,
        settlement: NewSettlement,
        platform_user_id: Option<i64>,
        limit: Duration,
    ) -> Result<Reversement, LedgerError> {
        let producer_id = settlement.producer_id;
        let order_id = settlement.order_id;
        let split = settlement.split;
        if !split.total().is_positive() {
            return Err(LedgerError::InvalidAmount(split.total()));
        }
        let unit = async {
            let mut tx = self.pool.begin().await?;
            let producer_wallet = wallets::lock_wallet_for_user(producer_id, &mut tx)
                .await?
                .ok_or(LedgerError::ProducerOrWalletNotFound(producer_id))?;
            if orders::fetch_order(order_id, &mut tx).await?.is_none() {
                return Err(LedgerError::OrderNotFound(order_id));
            }
            let platform_wallet = wallets::lock_platform_wallet(platform_user_id, &mut tx)
                .await?
                .ok_or(LedgerError::PlatformWalletNotFound)?;
            if reversements::fetch_reversement_for_order(order_id, producer_id, &mut tx).await?.is_some() {
                return Err(LedgerError::AlreadySettled { order_id, producer_id });
            }

            let mut minted = MintedCodes::default();
            let settlement_ref = codes::mint(&self.codes, CodeScope::Reversement, &mut minted, &mut tx).await?;

            let earnings = split.producer_earnings();
            let producer_tx_id = if earnings.is_positive() {
                let reference = codes::mint(&self.codes, CodeScope::Transaction, &mut minted, &mut tx).await?;
                let entry = NewTransaction::deposit(&producer_wallet, earnings)
                    .with_description(format!("Earnings for order #{order_id} ({settlement_ref})"));
                let producer_tx = transactions::insert_transaction(entry, reference, &mut tx).await?;
                wallets::increment_balance(producer_wallet.id, earnings, &mut tx).await?;
                Some(producer_tx.id)
            } else {
                debug!("🤝️ Producer share of order #{order_id} is zero. No producer entry is recorded");
                None
            };

            let commission = split.platform_commission();
            if commission.is_positive() {
                let reference = codes::mint(&self.codes, CodeScope::Transaction, &mut minted, &mut tx).await?;
                let entry = NewTransaction::deposit(&platform_wallet, commission)
                    .with_description(format!("Commission on order #{order_id} ({settlement_ref})"));
                transactions::insert_transaction(entry, reference, &mut tx).await?;
                wallets::increment_balance(platform_wallet.id, commission, &mut tx).await?;
            } else {
                debug!("🤝️ Commission on order #{order_id} is zero. No platform entry is recorded");
            }

            let marked = orders::mark_items_settled(order_id, &settlement.producer_code, &mut tx).await?;
            if marked == 0 {
                warn!(
                    "🤝️ Order #{order_id} has no lines with producer code {}. The settlement goes ahead anyway.",
                    settlement.producer_code
                );
            }
            let wallet_id = producer_wallet.id;
            let reversement =
                reversements::insert_reversement(&settlement, wallet_id, producer_tx_id, settlement_ref, &mut tx)
                    .await?;
            Ok::<_, LedgerError>((tx, reversement))
        };
        let reversement = stage_then_commit(limit, unit, commit).await?;
        info!(
            "🤝️ Order #{order_id} settled for producer {producer_id}: {} to the producer, {} commission",
            reversement.producer_earnings, reversement.platform_commission
        );
        Ok(reversement)
    }

    async fn fetch_reversement(&self, id: i64) -> Result<Option<Reversement>, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        reversements::fetch_reversement(id, &mut conn).await
    }

    async fn fetch_reversement_for_order(
        &self,
        order_id: i64,
        producer_id: i64,
    ) -> Result<Option<Reversement>, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        reversements::fetch_reversement_for_order(order_id, producer_id, &mut conn).await
    }

    async fn delete_reversement(&self, id: i64) -> Result<Reversement, LedgerError> {
        let mut tx = self.pool.begin().await?;
        let reversement = reversements::delete_reversement(id, &mut tx).await?;
        tx.commit().await?;
        Ok(reversement)
    }

    async fn close(&mut self) -> Result<(), LedgerError> {
        self.pool.close().await;
        Ok(())
    }
}

/// Commits a unit staged by [`stage_then_commit`] and hands back its result.
async fn commit<T>((tx, value): (DbTransaction<'static, Sqlite>, T)) -> Result<T, LedgerError> {
    tx.commit().await?;
    Ok(value)
}

impl LedgerReporting for SqliteDatabase {
    async fn totals_by_type(&self, filter: LedgerQueryFilter) -> Result<Vec<TypeTotal>, ReportingError> {
        let mut conn = self.pool.acquire().await?;
        stats::totals_by_type(filter, &mut conn).await
    }

    async fn totals_by_user(&self, filter: LedgerQueryFilter) -> Result<Vec<UserTotal>, ReportingError> {
        let mut conn = self.pool.acquire().await?;
        stats::totals_by_user(filter, &mut conn).await
    }

    async fn monthly_totals(
        &self,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
        tx_type: Option<TransactionType>,
    ) -> Result<Vec<MonthlyTotal>, ReportingError> {
        let mut conn = self.pool.acquire().await?;
        stats::monthly_totals(since, until, tx_type, &mut conn).await
    }

    async fn monthly_settlements(
        &self,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<Vec<MonthlySettlement>, ReportingError> {
        let mut conn = self.pool.acquire().await?;
        stats::monthly_settlements(since, until, &mut conn).await
    }

    async fn settlement_totals_for_producer(&self, producer_id: i64) -> Result<SettlementTotals, ReportingError> {
        let mut conn = self.pool.acquire().await?;
        stats::settlement_totals_for_producer(producer_id, &mut conn).await
    }

    async fn audit_wallet(&self, wallet_id: i64) -> Result<Option<WalletAudit>, ReportingError> {
        let mut conn = self.pool.acquire().await?;
        stats::audit_wallet(wallet_id, &mut conn).await
    }
}
