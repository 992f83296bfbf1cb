//! Wallet lifecycle and recharges.
use std::fmt::Debug;

use ledger_common::Money;
use log::*;

use crate::{
    db_types::{NewRecharge, RechargeResult, Transaction, Wallet},
    events::{EventProducers, WalletRechargedEvent},
    ledger_api::ledger_objects::{LedgerQueryFilter, Pagination},
    settings::LedgerSettings,
    traits::{LedgerDatabase, LedgerError},
};

const MAX_LABEL_LENGTH: usize = 64;

pub struct WalletApi<B> {
    db: B,
    producers: EventProducers,
    settings: LedgerSettings,
}

impl<B> Debug for WalletApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "WalletApi")
    }
}

impl<B> WalletApi<B> {
    pub fn new(db: B, producers: EventProducers, settings: LedgerSettings) -> Self {
        Self { db, producers, settings }
    }

    pub fn db(&self) -> &B {
        &self.db
    }

    pub fn db_mut(&mut self) -> &mut B {
        &mut self.db
    }
}

impl<B> WalletApi<B>
where B: LedgerDatabase
{
    /// Fetches the user's wallet, failing with [`LedgerError::WalletNotFound`] if they don't have one.
    pub async fn wallet_for_user(&self, user_id: i64) -> Result<Wallet, LedgerError> {
        self.db.fetch_wallet_for_user(user_id).await?.ok_or(LedgerError::WalletNotFound(user_id))
    }

    pub async fn open_wallet(&self, user_id: i64) -> Result<Wallet, LedgerError> {
        let wallet = self.db.create_wallet_for_user(user_id, self.settings.unit_timeout).await?;
        info!("💰️ Wallet {} opened for user {user_id}", wallet.account_number);
        Ok(wallet)
    }

    /// Credits `amount` to the user's wallet and records it in the ledger.
    ///
    /// `payment_method` and `recharge_type` are free-form labels (e.g. `card` and `online`). They are stored on the
    /// wallet and quoted in the ledger entry's description.
    pub async fn recharge(
        &self,
        user_id: i64,
        amount: Money,
        payment_method: &str,
        recharge_type: &str,
    ) -> Result<RechargeResult, LedgerError> {
        if !amount.is_positive() {
            return Err(LedgerError::InvalidAmount(amount));
        }
        let payment_method = validate_label("payment method", payment_method)?;
        let recharge_type = validate_label("recharge type", recharge_type)?;
        let recharge = NewRecharge { user_id, amount, payment_method, recharge_type };
        let result = self.db.recharge_wallet(recharge, self.settings.unit_timeout).await?;
        info!(
            "💰️ User {user_id} recharged {amount}. Balance is now {} ({})",
            result.wallet.balance, result.transaction.reference
        );
        let event = WalletRechargedEvent::new(result.wallet.clone(), result.transaction.clone());
        self.producers.publish_wallet_recharged(event).await;
        Ok(result)
    }

    /// The user's ledger entries, newest first.
    pub async fn history(&self, user_id: i64, pagination: Pagination) -> Result<Vec<Transaction>, LedgerError> {
        let wallet = self.wallet_for_user(user_id).await?;
        let filter = LedgerQueryFilter::default().with_wallet_id(wallet.id);
        self.db.fetch_transactions(filter, pagination).await
    }

    pub async fn transaction_by_reference(&self, reference: &str) -> Result<Option<Transaction>, LedgerError> {
        self.db.fetch_transaction_by_reference(reference).await
    }

    pub async fn search_transactions(
        &self,
        filter: LedgerQueryFilter,
        pagination: Pagination,
    ) -> Result<Vec<Transaction>, LedgerError> {
        self.db.fetch_transactions(filter, pagination).await
    }
}

fn validate_label(field: &str, value: &str) -> Result<String, LedgerError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(LedgerError::ValidationError(format!("The {field} is required")));
    }
    if value.len() > MAX_LABEL_LENGTH {
        return Err(LedgerError::ValidationError(format!(
            "The {field} may be at most {MAX_LABEL_LENGTH} characters long"
        )));
    }
    Ok(value.to_string())
}
