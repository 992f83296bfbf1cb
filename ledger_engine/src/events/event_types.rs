use serde::{Deserialize, Serialize};

use crate::db_types::{Reversement, Transaction, Wallet};

/// A wallet was credited by a recharge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletRechargedEvent {
    pub wallet: Wallet,
    pub transaction: Transaction,
}

impl WalletRechargedEvent {
    pub fn new(wallet: Wallet, transaction: Transaction) -> Self {
        Self { wallet, transaction }
    }
}

/// One producer's share of an order was settled. The producer is `reversement.producer_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementCompletedEvent {
    pub reversement: Reversement,
}

impl SettlementCompletedEvent {
    pub fn new(reversement: Reversement) -> Self {
        Self { reversement }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventType {
    WalletRecharged(WalletRechargedEvent),
    SettlementCompleted(SettlementCompletedEvent),
}
