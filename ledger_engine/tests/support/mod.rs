#![allow(dead_code)]
use ledger_engine::{
    db_types::{OrderItem, Wallet},
    events::EventProducers,
    ledger_objects::SettlementRequest,
    settings::LedgerSettings,
    test_utils::{
        fixtures::{seed_marketplace, Marketplace, PRODUCER_CODE},
        prepare_env::{drop_database, prepare_test_env, random_db_path},
    },
    LedgerDatabase,
    Money,
    SettlementApi,
    SqliteDatabase,
    WalletApi,
    WalletManagement,
};

pub struct TestLedger {
    pub db: SqliteDatabase,
    pub market: Marketplace,
}

impl TestLedger {
    pub async fn new() -> Self {
        let url = random_db_path();
        let db = prepare_test_env(&url).await;
        let market = seed_marketplace(&db).await;
        Self { db, market }
    }

    pub fn wallet_api(&self) -> WalletApi<SqliteDatabase> {
        WalletApi::new(self.db.clone(), EventProducers::default(), LedgerSettings::default())
    }

    pub fn settlement_api(&self) -> SettlementApi<SqliteDatabase> {
        SettlementApi::new(self.db.clone(), EventProducers::default(), LedgerSettings::default())
    }

    /// The producer's share of the seeded order: 2 x 15000 + 1 x 20000
    pub fn settlement_request(&self) -> SettlementRequest {
        SettlementRequest {
            producer_id: self.market.producer.id,
            order_id: self.market.order.id,
            total_quantity: 3,
            total_amount: Money::from_units(50_000),
            producer_code: PRODUCER_CODE.to_string(),
        }
    }

    pub async fn wallet(&self, wallet_id: i64) -> Wallet {
        self.db.fetch_wallet(wallet_id).await.expect("Error fetching wallet").expect("Wallet does not exist")
    }

    pub async fn balance(&self, wallet_id: i64) -> Money {
        self.wallet(wallet_id).await.balance
    }

    pub async fn ledger_size(&self) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM transactions").fetch_one(self.db.pool()).await.unwrap()
    }

    pub async fn order_items(&self) -> Vec<OrderItem> {
        self.db.fetch_order_items(self.market.order.id).await.expect("Error fetching order items")
    }

    pub async fn tear_down(mut self) {
        let url = self.db.url().to_string();
        if let Err(e) = self.db.close().await {
            log::error!("🚀️ Failed to close database: {e}");
        }
        drop_database(&url).await;
    }
}
