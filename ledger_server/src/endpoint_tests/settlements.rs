use actix_web::http::StatusCode;
use ledger_engine::{db_types::Reversement, ledger_objects::SettlementRequest, Money};
use serde_json::json;

use super::helpers::{error_message, TestServer};

#[actix_web::test]
async fn settle_an_order() {
    let server = TestServer::new().await;
    let request = server.settlement_request();
    let (status, body) = server.post("/api/settlements", &request).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert!(body.contains(r#""platform_commission":"9000.00""#), "{body}");
    let rev: Reversement = serde_json::from_str(&body).expect("Not a settlement");
    assert_eq!(rev.producer_id, server.market.producer.id);
    assert_eq!(rev.order_id, server.market.order.id);
    assert_eq!(rev.total_quantity, 3);
    assert_eq!(rev.total_amount, Money::from_units(50_000));
    assert_eq!(rev.producer_earnings, Money::from_units(41_000));
    assert!(rev.reference.starts_with("REV"));

    let producer = server.market.producer.id;
    let (_, body) = server.get(&format!("/api/wallets/{producer}")).await;
    assert!(body.contains(r#""balance":"41000.00""#), "{body}");
    let admin = server.market.admin.id;
    let (_, body) = server.get(&format!("/api/wallets/{admin}")).await;
    assert!(body.contains(r#""balance":"9000.00""#), "{body}");

    let (status, body) = server.get(&format!("/api/settlements/{}", rev.id)).await;
    assert_eq!(status, StatusCode::OK);
    let fetched: Reversement = serde_json::from_str(&body).unwrap();
    assert_eq!(fetched, rev);
    server.tear_down().await;
}

#[actix_web::test]
async fn an_order_is_settled_only_once() {
    let server = TestServer::new().await;
    let request = server.settlement_request();
    let (status, _) = server.post("/api/settlements", &request).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, body) = server.post("/api/settlements", &request).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(error_message(&body).contains("already been settled"), "{body}");

    let producer = server.market.producer.id;
    let (_, body) = server.get(&format!("/api/wallets/{producer}")).await;
    assert!(body.contains(r#""balance":"41000.00""#), "{body}");
    server.tear_down().await;
}

#[actix_web::test]
async fn settlement_failures() {
    let server = TestServer::new().await;
    let unknown_order = SettlementRequest { order_id: 9_999, ..server.settlement_request() };
    let (status, _) = server.post("/api/settlements", &unknown_order).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let unknown_producer = SettlementRequest { producer_id: 9_999, ..server.settlement_request() };
    let (status, _) = server.post("/api/settlements", &unknown_producer).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let nothing = SettlementRequest { total_amount: Money::ZERO, ..server.settlement_request() };
    let (status, _) = server.post("/api/settlements", &nothing).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = server.post("/api/settlements", &json!({"order_id": 1})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(error_message(&body).starts_with("Could not read request body"), "{body}");

    let (status, _) = server.get("/api/settlements/9999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    server.tear_down().await;
}

#[actix_web::test]
async fn revoke_a_settlement() {
    let server = TestServer::new().await;
    let request = server.settlement_request();
    let (_, body) = server.post("/api/settlements", &request).await;
    let rev: Reversement = serde_json::from_str(&body).unwrap();

    let (status, body) = server.delete(&format!("/api/settlements/{}", rev.id)).await;
    assert_eq!(status, StatusCode::OK);
    let revoked: Reversement = serde_json::from_str(&body).unwrap();
    assert_eq!(revoked, rev);
    let (status, _) = server.get(&format!("/api/settlements/{}", rev.id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = server.delete(&format!("/api/settlements/{}", rev.id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // The ledger entries stay, so the audit still balances
    let producer = server.market.producer.id;
    let (status, body) = server.get(&format!("/api/wallets/{producer}/audit")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#""balance":"41000.00""#), "{body}");
    server.tear_down().await;
}
