use chrono::{DateTime, Utc};
use ledger_engine::{db_types::TransactionType, Money};
use serde::{Deserialize, Serialize};

/// Body of `POST /api/wallets/{user_id}/recharge`. The amount is a decimal string, e.g. `"2500.00"`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RechargeParams {
    pub amount: Money,
    pub payment_method: String,
    pub recharge_type: String,
}

/// Query parameters for the monthly views. Both ends of the range are required.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyParams {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
    #[serde(default)]
    pub tx_type: Option<TransactionType>,
}
