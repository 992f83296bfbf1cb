use cucumber::given;
use ledger_engine::test_utils::fixtures::seed_marketplace;

use crate::cucumber::{LedgerSystem, LedgerWorld};

#[given("a fresh install")]
async fn fresh_database(world: &mut LedgerWorld) {
    let system = LedgerSystem::new().await;
    world.system = Some(system);
}

#[given("a seeded marketplace")]
async fn seeded_marketplace(world: &mut LedgerWorld) {
    let market = seed_marketplace(&world.system().db).await;
    world.market = Some(market);
}
