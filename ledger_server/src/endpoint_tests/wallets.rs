use actix_web::http::StatusCode;
use ledger_engine::{
    db_types::{NewUser, RechargeResult, Transaction, TransactionType, UserRole, Wallet},
    report_objects::WalletAudit,
    Money,
};
use serde_json::json;

use super::helpers::{error_message, TestServer};

#[actix_web::test]
async fn fetch_a_wallet() {
    let server = TestServer::new().await;
    let customer = server.market.customer.id;
    let (status, body) = server.get(&format!("/api/wallets/{customer}")).await;
    assert_eq!(status, StatusCode::OK);
    let wallet: Wallet = serde_json::from_str(&body).expect("Not a wallet");
    assert_eq!(wallet, server.market.customer_wallet);
    assert!(body.contains(r#""balance":"0.00""#), "{body}");

    let (status, body) = server.get("/api/wallets/9999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(error_message(&body).contains("9999"), "{body}");
    server.tear_down().await;
}

#[actix_web::test]
async fn open_a_wallet_once() {
    let server = TestServer::new().await;
    let user = server.db.create_user(NewUser::new("Moussa Keita", UserRole::Customer)).await.unwrap();
    let (status, body) = server.post_empty(&format!("/api/wallets/{}", user.id)).await;
    assert_eq!(status, StatusCode::CREATED);
    let wallet: Wallet = serde_json::from_str(&body).expect("Not a wallet");
    assert_eq!(wallet.user_id, user.id);
    assert_eq!(wallet.balance, Money::ZERO);

    let (status, _) = server.post_empty(&format!("/api/wallets/{}", user.id)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    let (status, _) = server.post_empty("/api/wallets/9999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    server.tear_down().await;
}

#[actix_web::test]
async fn recharge_a_wallet() {
    let server = TestServer::new().await;
    let customer = server.market.customer.id;
    let path = format!("/api/wallets/{customer}/recharge");
    let body = json!({"amount": "2500.50", "payment_method": "mobile_money", "recharge_type": "agent"});
    let (status, body) = server.post(&path, &body).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let result: RechargeResult = serde_json::from_str(&body).expect("Not a recharge result");
    assert_eq!(result.wallet.balance, Money::from_minor(250_050));
    assert_eq!(result.wallet.payment_method.as_deref(), Some("mobile_money"));
    assert_eq!(result.transaction.tx_type, TransactionType::Deposit);
    assert_eq!(result.transaction.amount, Money::from_minor(250_050));

    let (status, body) = server.get(&format!("/api/transactions/{}", result.transaction.reference)).await;
    assert_eq!(status, StatusCode::OK);
    let tx: Transaction = serde_json::from_str(&body).unwrap();
    assert_eq!(tx, result.transaction);
    let (status, _) = server.get("/api/transactions/TRX999999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    server.tear_down().await;
}

#[actix_web::test]
async fn bad_recharges_are_rejected() {
    let server = TestServer::new().await;
    let customer = server.market.customer.id;
    let path = format!("/api/wallets/{customer}/recharge");

    let zero = json!({"amount": "0", "payment_method": "card", "recharge_type": "online"});
    let (status, body) = server.post(&path, &zero).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(error_message(&body).contains("greater than zero"), "{body}");

    let unlabelled = json!({"amount": "10", "payment_method": "", "recharge_type": "online"});
    let (status, _) = server.post(&path, &unlabelled).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // More precision than the currency carries cannot be deserialized
    let precise = json!({"amount": "10.001", "payment_method": "card", "recharge_type": "online"});
    let (status, body) = server.post(&path, &precise).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(error_message(&body).starts_with("Could not read request body"), "{body}");

    let (status, body) = server.post_raw(&path, r#"{"amount": "10", "payment_method": "#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(error_message(&body).starts_with("Could not read request body"), "{body}");

    let (status, body) = server.post("/api/wallets/not-a-user/recharge", &zero).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(error_message(&body).starts_with("Could not read request path"), "{body}");

    let body = json!({"amount": "10", "payment_method": "card", "recharge_type": "online"});
    let (status, _) = server.post("/api/wallets/9999/recharge", &body).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = server.get(&format!("/api/wallets/{customer}")).await;
    let wallet: Wallet = serde_json::from_str(&body).unwrap();
    assert_eq!(wallet.balance, Money::ZERO);
    server.tear_down().await;
}

#[actix_web::test]
async fn wallet_history_and_audit() {
    let server = TestServer::new().await;
    let customer = server.market.customer.id;
    let path = format!("/api/wallets/{customer}/recharge");
    for amount in ["100", "200", "300"] {
        let body = json!({"amount": amount, "payment_method": "card", "recharge_type": "online"});
        let (status, _) = server.post(&path, &body).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = server.get(&format!("/api/wallets/{customer}/transactions")).await;
    assert_eq!(status, StatusCode::OK);
    let history: Vec<Transaction> = serde_json::from_str(&body).unwrap();
    assert_eq!(history.len(), 3);
    assert_eq!(history[0].amount, Money::from_units(300));

    let (_, body) = server.get(&format!("/api/wallets/{customer}/transactions?offset=1&count=1")).await;
    let page: Vec<Transaction> = serde_json::from_str(&body).unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].amount, Money::from_units(200));

    let (status, body) = server.get(&format!("/api/wallets/{customer}/audit")).await;
    assert_eq!(status, StatusCode::OK);
    let audit: WalletAudit = serde_json::from_str(&body).unwrap();
    assert!(audit.is_consistent());
    assert_eq!(audit.balance, Money::from_units(600));
    assert_eq!(audit.entries, 3);

    let (status, body) = server.get(&format!("/api/transactions?user_id={customer}&tx_type=DEPOSIT")).await;
    assert_eq!(status, StatusCode::OK);
    let found: Vec<Transaction> = serde_json::from_str(&body).unwrap();
    assert_eq!(found.len(), 3);
    let (_, body) = server.get("/api/transactions?tx_type=REFUND").await;
    let found: Vec<Transaction> = serde_json::from_str(&body).unwrap();
    assert!(found.is_empty());
    server.tear_down().await;
}
