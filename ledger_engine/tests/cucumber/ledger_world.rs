use cucumber::World;
use ledger_engine::{
    db_types::{RechargeResult, Reversement},
    events::EventProducers,
    settings::LedgerSettings,
    test_utils::{
        fixtures::Marketplace,
        prepare_env::{prepare_test_env, random_db_path},
    },
    LedgerError,
    SettlementApi,
    SqliteDatabase,
    WalletApi,
};
use log::*;

#[derive(Default, Debug, World)]
pub struct LedgerWorld {
    pub system: Option<LedgerSystem>,
    pub market: Option<Marketplace>,
    pub last_recharge: Option<RechargeResult>,
    pub last_settlement: Option<Reversement>,
    pub last_error: Option<LedgerError>,
}

#[derive(Debug)]
pub struct LedgerSystem {
    pub db_path: String,
    pub db: SqliteDatabase,
    pub wallets: WalletApi<SqliteDatabase>,
    pub settlements: SettlementApi<SqliteDatabase>,
}

impl LedgerWorld {
    pub fn system(&self) -> &LedgerSystem {
        self.system.as_ref().expect("Ledger not initialised")
    }

    pub fn market(&self) -> &Marketplace {
        self.market.as_ref().expect("Marketplace not seeded")
    }

    /// Stores the outcome of the last operation, so that later steps can inspect it.
    pub fn record<T>(&mut self, result: Result<T, LedgerError>) -> Option<T> {
        match result {
            Ok(v) => {
                self.last_error = None;
                Some(v)
            },
            Err(e) => {
                debug!("🥒️ Operation failed: {e}");
                self.last_error = Some(e);
                None
            },
        }
    }
}

impl LedgerSystem {
    pub async fn new() -> Self {
        let url = random_db_path();
        let db = prepare_test_env(&url).await;
        debug!("Created database: {url}");
        let settings = LedgerSettings::default();
        let wallets = WalletApi::new(db.clone(), EventProducers::default(), settings);
        let settlements = SettlementApi::new(db.clone(), EventProducers::default(), settings);
        Self { db_path: url, db, wallets, settlements }
    }
}
