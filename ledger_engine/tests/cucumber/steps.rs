use cucumber::{given, then, when};
use ledger_engine::{
    db_types::TransactionType,
    ledger_objects::SettlementRequest,
    test_utils::fixtures::PRODUCER_CODE,
    LedgerReporting,
    Money,
    WalletManagement,
};

use crate::cucumber::LedgerWorld;

fn money(s: &str) -> Money {
    s.parse().expect("Not a valid amount")
}

async fn recharge(world: &mut LedgerWorld, amount: String, method: String, channel: String) {
    let user_id = world.market().customer.id;
    let result = world.system().wallets.recharge(user_id, money(&amount), &method, &channel).await;
    if let Some(r) = world.record(result) {
        world.last_recharge = Some(r);
    }
}

#[given(expr = "the customer has recharged {word} by {string} via {string}")]
async fn prior_recharge(world: &mut LedgerWorld, amount: String, method: String, channel: String) {
    recharge(world, amount, method, channel).await;
    assert!(world.last_error.is_none(), "Setup recharge failed: {:?}", world.last_error);
}

#[when(expr = "the customer recharges {word} by {string} via {string}")]
async fn customer_recharges(world: &mut LedgerWorld, amount: String, method: String, channel: String) {
    recharge(world, amount, method, channel).await;
}

#[when(expr = "the producer settles the order for {word} with {int} items")]
async fn producer_settles(world: &mut LedgerWorld, amount: String, quantity: i64) {
    let market = world.market();
    let request = SettlementRequest {
        producer_id: market.producer.id,
        order_id: market.order.id,
        total_quantity: quantity,
        total_amount: money(&amount),
        producer_code: PRODUCER_CODE.to_string(),
    };
    let result = world.system().settlements.settle(request).await;
    if let Some(r) = world.record(result) {
        world.last_settlement = Some(r);
    }
}

#[then(expr = "the settlement takes a commission of {word} and pays {word} to the producer")]
async fn check_split(world: &mut LedgerWorld, commission: String, earnings: String) {
    let settlement = world.last_settlement.as_ref().expect("No settlement was made");
    assert_eq!(settlement.platform_commission, money(&commission));
    assert_eq!(settlement.producer_earnings, money(&earnings));
}

#[then(expr = "the {word} wallet balance is {word}")]
async fn check_balance(world: &mut LedgerWorld, owner: String, amount: String) {
    let market = world.market();
    let wallet_id = match owner.as_str() {
        "producer" => market.producer_wallet.id,
        "platform" => market.admin_wallet.id,
        "customer" => market.customer_wallet.id,
        _ => panic!("Unknown wallet owner: {owner}"),
    };
    let wallet = world.system().db.fetch_wallet(wallet_id).await.unwrap().expect("Wallet does not exist");
    assert_eq!(wallet.balance, money(&amount), "{owner} balance is incorrect");
}

#[then(expr = "the last recharge recorded a DEPOSIT of {word}")]
async fn check_last_recharge(world: &mut LedgerWorld, amount: String) {
    let recharge = world.last_recharge.as_ref().expect("No recharge was made");
    assert_eq!(recharge.transaction.tx_type, TransactionType::Deposit);
    assert_eq!(recharge.transaction.amount, money(&amount));
}

#[then(expr = "the ledger holds {int} entries")]
async fn check_ledger_size(world: &mut LedgerWorld, count: i64) {
    let size: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM transactions").fetch_one(world.system().db.pool()).await.unwrap();
    assert_eq!(size, count);
}

#[then("every wallet balances with its ledger")]
async fn check_audits(world: &mut LedgerWorld) {
    let market = world.market();
    for wallet_id in [market.admin_wallet.id, market.producer_wallet.id, market.customer_wallet.id] {
        let audit = world.system().db.audit_wallet(wallet_id).await.unwrap().expect("Wallet does not exist");
        assert!(audit.is_consistent(), "{audit:?}");
    }
}

#[then(expr = "the last operation failed with {string}")]
async fn check_failure(world: &mut LedgerWorld, message: String) {
    let err = world.last_error.as_ref().expect("The last operation succeeded");
    assert!(err.to_string().contains(&message), "Unexpected error: {err}");
}
