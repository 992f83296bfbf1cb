use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
pub use ledger_common::Money;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use thiserror::Error;

use crate::commission::Split;

#[derive(Debug, Clone, Error)]
#[error("Invalid value: {0}")]
pub struct ConversionError(String);

//--------------------------------------       UserRole        ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    /// Platform operators. The lowest-id admin owns the platform wallet unless one is configured explicitly.
    Admin,
    /// Sells products on the marketplace and receives settlements.
    Producer,
    Customer,
}

impl Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Admin => write!(f, "ADMIN"),
            UserRole::Producer => write!(f, "PRODUCER"),
            UserRole::Customer => write!(f, "CUSTOMER"),
        }
    }
}

//--------------------------------------         User          ---------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub role: UserRole,
    /// The code stamped on a producer's products. Used to pick out a producer's lines in a multi-vendor order.
    pub producer_code: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub role: UserRole,
    pub producer_code: Option<String>,
}

impl NewUser {
    pub fn new<S: Into<String>>(name: S, role: UserRole) -> Self {
        Self { name: name.into(), role, producer_code: None }
    }

    pub fn producer<S: Into<String>>(name: S, producer_code: S) -> Self {
        Self { name: name.into(), role: UserRole::Producer, producer_code: Some(producer_code.into()) }
    }
}

//--------------------------------------        Wallet         ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Wallet {
    pub id: i64,
    pub user_id: i64,
    pub balance: Money,
    /// Human-readable account identifier, unique across all wallets
    pub account_number: String,
    /// The payment method used for the most recent recharge
    pub payment_method: Option<String>,
    /// The recharge channel used for the most recent recharge
    pub recharge_type: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//--------------------------------------    TransactionType    ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    /// Value credited to the wallet: recharges and settlement shares.
    Deposit,
    /// Reserved for outbound flows. Neither recharge nor settlement produce it.
    Payment,
    Commission,
    Refund,
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionType::Deposit => write!(f, "DEPOSIT"),
            TransactionType::Payment => write!(f, "PAYMENT"),
            TransactionType::Commission => write!(f, "COMMISSION"),
            TransactionType::Refund => write!(f, "REFUND"),
        }
    }
}

impl FromStr for TransactionType {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "DEPOSIT" => Ok(Self::Deposit),
            "PAYMENT" => Ok(Self::Payment),
            "COMMISSION" => Ok(Self::Commission),
            "REFUND" => Ok(Self::Refund),
            _ => Err(ConversionError(format!("Invalid transaction type: {s}"))),
        }
    }
}

//--------------------------------------      Transaction      ---------------------------------------------------------
/// An immutable ledger entry. Every change to a wallet balance has exactly one of these.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub amount: Money,
    pub tx_type: TransactionType,
    pub wallet_id: i64,
    pub user_id: i64,
    pub reference: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub wallet_id: i64,
    pub user_id: i64,
    pub tx_type: TransactionType,
    pub amount: Money,
    pub description: Option<String>,
}

impl NewTransaction {
    pub fn deposit(wallet: &Wallet, amount: Money) -> Self {
        Self {
            wallet_id: wallet.id,
            user_id: wallet.user_id,
            tx_type: TransactionType::Deposit,
            amount,
            description: None,
        }
    }

    pub fn with_description<S: Into<String>>(mut self, description: S) -> Self {
        self.description = Some(description.into());
        self
    }
}

//--------------------------------------      Reversement      ---------------------------------------------------------
/// The settlement record for one producer's share of one order.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Reversement {
    pub id: i64,
    pub producer_id: i64,
    pub order_id: i64,
    pub total_quantity: i64,
    pub total_amount: Money,
    pub platform_commission: Money,
    pub producer_earnings: Money,
    /// The producer's wallet
    pub wallet_id: i64,
    /// The producer-side ledger entry. `None` when the producer's share rounded down to zero.
    pub transaction_id: Option<i64>,
    pub reference: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewSettlement {
    pub producer_id: i64,
    pub order_id: i64,
    pub total_quantity: i64,
    pub producer_code: String,
    pub split: Split,
}

//--------------------------------------       Recharge        ---------------------------------------------------------
#[derive(Debug, Clone)]
pub struct NewRecharge {
    pub user_id: i64,
    pub amount: Money,
    pub payment_method: String,
    pub recharge_type: String,
}

impl NewRecharge {
    pub fn description(&self) -> String {
        format!("Wallet recharge via {} ({})", self.payment_method, self.recharge_type)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RechargeResult {
    pub wallet: Wallet,
    pub transaction: Transaction,
}

//--------------------------------------    OrderStatusType    ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatusType {
    Pending,
    Paid,
    Delivered,
    Cancelled,
}

impl Display for OrderStatusType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatusType::Pending => write!(f, "PENDING"),
            OrderStatusType::Paid => write!(f, "PAID"),
            OrderStatusType::Delivered => write!(f, "DELIVERED"),
            OrderStatusType::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

//--------------------------------------         Order         ---------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub buyer_id: Option<i64>,
    pub status: OrderStatusType,
    pub total_amount: Money,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub quantity: i64,
    pub unit_price: Money,
    /// The number of settlements that have included this line
    pub settlement_count: i64,
}

#[derive(Debug, Clone)]
pub struct NewOrder {
    pub buyer_id: Option<i64>,
    pub status: OrderStatusType,
    pub items: Vec<NewOrderItem>,
}

impl NewOrder {
    pub fn new(buyer_id: Option<i64>) -> Self {
        Self { buyer_id, status: OrderStatusType::Pending, items: vec![] }
    }

    pub fn with_status(mut self, status: OrderStatusType) -> Self {
        self.status = status;
        self
    }

    pub fn with_item(mut self, product_id: i64, quantity: i64, unit_price: Money) -> Self {
        self.items.push(NewOrderItem { product_id, quantity, unit_price });
        self
    }

    pub fn total_amount(&self) -> Money {
        self.items.iter().map(|i| Money::from_minor(i.unit_price.value() * i.quantity)).sum()
    }
}

#[derive(Debug, Clone)]
pub struct NewOrderItem {
    pub product_id: i64,
    pub quantity: i64,
    pub unit_price: Money,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub producer_code: String,
}
