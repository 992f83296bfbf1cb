use actix_web::{
    body::MessageBody,
    http::{header::ContentType, StatusCode},
    test,
    test::TestRequest,
    App,
};
use ledger_engine::{
    events::EventProducers,
    ledger_objects::SettlementRequest,
    settings::LedgerSettings,
    test_utils::{
        fixtures::{seed_marketplace, Marketplace, PRODUCER_CODE},
        prepare_env::{drop_database, prepare_test_env, random_db_path},
    },
    LedgerDatabase,
    Money,
    SqliteDatabase,
};
use log::debug;
use serde::Serialize;

use crate::server::configure_ledger_routes;

/// A seeded ledger database, and the means to call the ledger routes against it.
pub struct TestServer {
    pub db: SqliteDatabase,
    pub market: Marketplace,
}

impl TestServer {
    pub async fn new() -> Self {
        let url = random_db_path();
        let db = prepare_test_env(&url).await;
        let market = seed_marketplace(&db).await;
        Self { db, market }
    }

    pub async fn get(&self, path: &str) -> (StatusCode, String) {
        self.send(TestRequest::get().uri(path)).await
    }

    pub async fn post<T: Serialize>(&self, path: &str, body: &T) -> (StatusCode, String) {
        self.send(TestRequest::post().uri(path).set_json(body)).await
    }

    /// Posts `body` as-is with a JSON content type, whether or not it is valid JSON.
    pub async fn post_raw(&self, path: &str, body: &str) -> (StatusCode, String) {
        self.send(TestRequest::post().uri(path).insert_header(ContentType::json()).set_payload(body.to_string())).await
    }

    pub async fn post_empty(&self, path: &str) -> (StatusCode, String) {
        self.send(TestRequest::post().uri(path)).await
    }

    pub async fn delete(&self, path: &str) -> (StatusCode, String) {
        self.send(TestRequest::delete().uri(path)).await
    }

    async fn send(&self, req: TestRequest) -> (StatusCode, String) {
        let db = self.db.clone();
        let app = App::new()
            .configure(move |cfg| configure_ledger_routes(cfg, db, EventProducers::default(), LedgerSettings::default()));
        let service = test::init_service(app).await;
        debug!("Making request");
        let res = test::call_service(&service, req.to_request()).await;
        let status = res.status();
        let body = res.into_body().try_into_bytes().map(|b| String::from_utf8_lossy(&b).into_owned());
        (status, body.unwrap_or_default())
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

    pub async fn tear_down(mut self) {
        let url = self.db.url().to_string();
        if let Err(e) = self.db.close().await {
            log::error!("🚀️ Failed to close database: {e}");
        }
        drop_database(&url).await;
    }
}

/// The `error` field of an error response body
pub fn error_message(body: &str) -> String {
    let value: serde_json::Value = serde_json::from_str(body).expect("Error body is not JSON");
    value["error"].as_str().expect("No error field in body").to_string()
}
