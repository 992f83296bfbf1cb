//! Order settlement ("reversement").
//!
//! When an order is settled for a producer, its total is split between the producer and the platform according to the
//! configured [`crate::commission::CommissionRate`]. Both shares are credited, and recorded in the ledger, in a single
//! atomic unit along with the settlement record itself. An order can be settled at most once per producer.
use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{NewSettlement, Reversement},
    events::{EventProducers, SettlementCompletedEvent},
    ledger_api::ledger_objects::SettlementRequest,
    settings::LedgerSettings,
    traits::{LedgerDatabase, LedgerError},
};

pub struct SettlementApi<B> {
    db: B,
    producers: EventProducers,
    settings: LedgerSettings,
}

impl<B> Debug for SettlementApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SettlementApi (commission {})", self.settings.commission_rate)
    }
}

impl<B> SettlementApi<B> {
    pub fn new(db: B, producers: EventProducers, settings: LedgerSettings) -> Self {
        Self { db, producers, settings }
    }

    pub fn db(&self) -> &B {
        &self.db
    }

    pub fn settings(&self) -> &LedgerSettings {
        &self.settings
    }
}

impl<B> SettlementApi<B>
where B: LedgerDatabase
{
    /// Settles the producer's share of an order.
    ///
    /// Fails with [`LedgerError::AlreadySettled`] if this order has already been settled for this producer; nothing is
    /// credited twice.
    pub async fn settle(&self, request: SettlementRequest) -> Result<Reversement, LedgerError> {
        validate(&request)?;
        let split = self.settings.commission_rate.split(request.total_amount);
        debug!(
            "🤝️ Settling order #{} for producer {}: {} split as {} commission and {} earnings",
            request.order_id,
            request.producer_id,
            split.total(),
            split.platform_commission(),
            split.producer_earnings()
        );
        let settlement = NewSettlement {
            producer_id: request.producer_id,
            order_id: request.order_id,
            total_quantity: request.total_quantity,
            producer_code: request.producer_code.trim().to_string(),
            split,
        };
        let platform_user = self.settings.platform_user_id;
        let reversement = self.db.settle_order(settlement, platform_user, self.settings.unit_timeout).await?;
        self.producers.publish_settlement_completed(SettlementCompletedEvent::new(reversement.clone())).await;
        Ok(reversement)
    }

    pub async fn settlement(&self, id: i64) -> Result<Reversement, LedgerError> {
        self.db.fetch_reversement(id).await?.ok_or(LedgerError::ReversementNotFound(id))
    }

    pub async fn settlement_for_order(&self, order_id: i64, producer_id: i64) -> Result<Option<Reversement>, LedgerError> {
        self.db.fetch_reversement_for_order(order_id, producer_id).await
    }

    /// Deletes a settlement record so that the order can be settled again for the producer.
    ///
    /// This is an operator tool. The ledger entries and balances of the original settlement are left in place, so
    /// settling the order again credits the wallets a second time.
    pub async fn revoke_settlement(&self, id: i64) -> Result<Reversement, LedgerError> {
        let reversement = self.db.delete_reversement(id).await?;
        warn!(
            "🤝️ Settlement {} of order #{} for producer {} has been revoked. Its ledger entries remain in place.",
            reversement.reference, reversement.order_id, reversement.producer_id
        );
        Ok(reversement)
    }
}

fn validate(request: &SettlementRequest) -> Result<(), LedgerError> {
    if !request.total_amount.is_positive() {
        return Err(LedgerError::InvalidAmount(request.total_amount));
    }
    if request.total_quantity < 0 {
        return Err(LedgerError::ValidationError("The total quantity cannot be negative".into()));
    }
    if request.producer_code.trim().is_empty() {
        return Err(LedgerError::ValidationError("The producer code is required".into()));
    }
    Ok(())
}
