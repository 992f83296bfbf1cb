use ledger_common::Money;

use crate::{
    db_types::{NewOrder, NewUser, Order, OrderStatusType, User, UserRole, Wallet},
    SqliteDatabase,
};

/// A small marketplace: a platform admin, a producer and a customer (each with a wallet), plus a second producer
/// whose goods appear in the same order.
#[derive(Debug, Clone)]
pub struct Marketplace {
    pub admin: User,
    pub admin_wallet: Wallet,
    pub producer: User,
    pub producer_wallet: Wallet,
    pub other_producer: User,
    pub customer: User,
    pub customer_wallet: Wallet,
    /// An order with two lines from `producer` (3 units in total) and one line from `other_producer`
    pub order: Order,
}

pub const PRODUCER_CODE: &str = "FARM01";
pub const OTHER_PRODUCER_CODE: &str = "FARM02";

pub async fn seed_marketplace(db: &SqliteDatabase) -> Marketplace {
    let (admin, admin_wallet) =
        db.create_user_with_wallet(NewUser::new("Platform", UserRole::Admin)).await.expect("Error creating admin");
    let (producer, producer_wallet) = db
        .create_user_with_wallet(NewUser::producer("Green Valley Farm", PRODUCER_CODE))
        .await
        .expect("Error creating producer");
    let (other_producer, _) = db
        .create_user_with_wallet(NewUser::producer("Hilltop Orchard", OTHER_PRODUCER_CODE))
        .await
        .expect("Error creating producer");
    let (customer, customer_wallet) = db
        .create_user_with_wallet(NewUser::new("Awa Diallo", UserRole::Customer))
        .await
        .expect("Error creating customer");
    let tomatoes = db.create_product("Tomatoes (kg)", PRODUCER_CODE).await.expect("Error creating product");
    let onions = db.create_product("Onions (kg)", PRODUCER_CODE).await.expect("Error creating product");
    let mangoes = db.create_product("Mangoes (box)", OTHER_PRODUCER_CODE).await.expect("Error creating product");
    let order = NewOrder::new(Some(customer.id))
        .with_status(OrderStatusType::Delivered)
        .with_item(tomatoes.id, 2, Money::from_units(15_000))
        .with_item(onions.id, 1, Money::from_units(20_000))
        .with_item(mangoes.id, 4, Money::from_units(2_500));
    let order = db.create_order(order).await.expect("Error creating order");
    Marketplace {
        admin,
        admin_wallet,
        producer,
        producer_wallet,
        other_producer,
        customer,
        customer_wallet,
        order,
    }
}
