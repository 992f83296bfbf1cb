use actix_web::http::StatusCode;
use ledger_engine::{
    db_types::TransactionType,
    report_objects::{MonthlySettlement, MonthlyTotal, SettlementTotals, TypeTotal, UserTotal},
    Money,
};
use serde_json::json;

use super::helpers::{error_message, TestServer};

const ALL_TIME: &str = "from=2000-01-01T00:00:00Z&to=2100-01-01T00:00:00Z";

async fn busy_server() -> TestServer {
    let server = TestServer::new().await;
    let customer = server.market.customer.id;
    let body = json!({"amount": "100", "payment_method": "card", "recharge_type": "online"});
    let (status, _) = server.post(&format!("/api/wallets/{customer}/recharge"), &body).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = server.post("/api/settlements", &server.settlement_request()).await;
    assert_eq!(status, StatusCode::CREATED);
    server
}

#[actix_web::test]
async fn totals() {
    let server = busy_server().await;
    let (status, body) = server.get("/api/stats/totals").await;
    assert_eq!(status, StatusCode::OK);
    let by_type: Vec<TypeTotal> = serde_json::from_str(&body).unwrap();
    assert_eq!(by_type.len(), 1);
    assert_eq!(by_type[0].tx_type, TransactionType::Deposit);
    assert_eq!(by_type[0].count, 3);
    assert_eq!(by_type[0].total, Money::from_units(50_100));

    let (status, body) = server.get("/api/stats/users").await;
    assert_eq!(status, StatusCode::OK);
    let by_user: Vec<UserTotal> = serde_json::from_str(&body).unwrap();
    assert_eq!(by_user.len(), 3);
    assert_eq!(by_user[0].user_id, server.market.producer.id);

    let customer = server.market.customer.id;
    let (_, body) = server.get(&format!("/api/stats/totals?user_id={customer}")).await;
    let by_type: Vec<TypeTotal> = serde_json::from_str(&body).unwrap();
    assert_eq!(by_type[0].total, Money::from_units(100));
    server.tear_down().await;
}

#[actix_web::test]
async fn monthly() {
    let server = busy_server().await;
    let (status, body) = server.get(&format!("/api/stats/monthly?{ALL_TIME}")).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let months: Vec<MonthlyTotal> = serde_json::from_str(&body).unwrap();
    let total: Money = months.iter().map(|m| m.total).sum();
    assert_eq!(total, Money::from_units(50_100));

    let (_, body) = server.get(&format!("/api/stats/monthly?{ALL_TIME}&tx_type=REFUND")).await;
    let months: Vec<MonthlyTotal> = serde_json::from_str(&body).unwrap();
    assert!(months.is_empty());

    let (status, body) = server.get(&format!("/api/stats/settlements/monthly?{ALL_TIME}")).await;
    assert_eq!(status, StatusCode::OK);
    let months: Vec<MonthlySettlement> = serde_json::from_str(&body).unwrap();
    let commission: Money = months.iter().map(|m| m.platform_commission).sum();
    assert_eq!(commission, Money::from_units(9_000));

    let (status, body) = server.get("/api/stats/monthly?from=2100-01-01T00:00:00Z&to=2000-01-01T00:00:00Z").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(!error_message(&body).is_empty());
    let (status, body) = server.get("/api/stats/monthly").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(error_message(&body).starts_with("Invalid query"), "{body}");
    let (status, body) = server.get("/api/transactions?user_id=someone").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(error_message(&body).starts_with("Invalid query"), "{body}");
    server.tear_down().await;
}

#[actix_web::test]
async fn producer_totals() {
    let server = busy_server().await;
    let producer = server.market.producer.id;
    let (status, body) = server.get(&format!("/api/stats/producers/{producer}")).await;
    assert_eq!(status, StatusCode::OK);
    let totals: SettlementTotals = serde_json::from_str(&body).unwrap();
    assert_eq!(totals.count, 1);
    assert_eq!(totals.producer_earnings, Money::from_units(41_000));
    assert_eq!(totals.platform_commission, Money::from_units(9_000));
    server.tear_down().await;
}
