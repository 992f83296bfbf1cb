use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use futures::FutureExt;
use ledger_engine::{
    events::{EventHandlers, EventHooks, EventProducers},
    settings::LedgerSettings,
    ReportingApi,
    SettlementApi,
    SqliteDatabase,
    WalletApi,
};
use log::*;

use crate::{
    config::ServerConfig,
    errors::ServerError,
    routes::{
        health,
        MonthlySettlementsRoute,
        MonthlyTotalsRoute,
        OpenWalletRoute,
        ProducerSettlementsRoute,
        RechargeRoute,
        RevokeSettlementRoute,
        SettleRoute,
        SettlementRoute,
        TotalsByTypeRoute,
        TotalsByUserRoute,
        TransactionByReferenceRoute,
        TransactionsRoute,
        WalletAuditRoute,
        WalletHistoryRoute,
        WalletRoute,
    },
};

const EVENT_BUFFER_SIZE: usize = 25;

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, config.max_connections)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    if config.run_migrations {
        db.run_migrations().await.map_err(|e| ServerError::InitializeError(e.to_string()))?;
    }
    let handlers = EventHandlers::new(EVENT_BUFFER_SIZE, notification_hooks());
    let producers = handlers.producers();
    handlers.start_handlers().await;
    let srv = create_server_instance(config, db, producers)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(
    config: ServerConfig,
    db: SqliteDatabase,
    producers: EventProducers,
) -> Result<Server, ServerError> {
    let settings = config.ledger_settings();
    let srv = HttpServer::new(move || {
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("ledger::access_log"))
            .configure(|cfg| configure_ledger_routes(cfg, db.clone(), producers.clone(), settings))
            .service(health)
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}

/// Registers the ledger APIs and the `/api` routes that use them.
pub fn configure_ledger_routes(
    cfg: &mut web::ServiceConfig,
    db: SqliteDatabase,
    producers: EventProducers,
    settings: LedgerSettings,
) {
    let wallet_api = WalletApi::new(db.clone(), producers.clone(), settings);
    let settlement_api = SettlementApi::new(db.clone(), producers, settings);
    let reporting_api = ReportingApi::new(db);
    let api_scope = web::scope("/api")
        .service(WalletRoute::<SqliteDatabase>::new())
        .service(OpenWalletRoute::<SqliteDatabase>::new())
        .service(RechargeRoute::<SqliteDatabase>::new())
        .service(WalletHistoryRoute::<SqliteDatabase>::new())
        .service(WalletAuditRoute::<SqliteDatabase, SqliteDatabase>::new())
        .service(TransactionsRoute::<SqliteDatabase>::new())
        .service(TransactionByReferenceRoute::<SqliteDatabase>::new())
        .service(SettleRoute::<SqliteDatabase>::new())
        .service(SettlementRoute::<SqliteDatabase>::new())
        .service(RevokeSettlementRoute::<SqliteDatabase>::new())
        .service(TotalsByTypeRoute::<SqliteDatabase>::new())
        .service(TotalsByUserRoute::<SqliteDatabase>::new())
        .service(MonthlyTotalsRoute::<SqliteDatabase>::new())
        .service(MonthlySettlementsRoute::<SqliteDatabase>::new())
        .service(ProducerSettlementsRoute::<SqliteDatabase>::new());
    cfg.app_data(web::Data::new(wallet_api))
        .app_data(web::Data::new(settlement_api))
        .app_data(web::Data::new(reporting_api))
        .app_data(json_config())
        .app_data(query_config())
        .app_data(path_config())
        .service(api_scope);
}

// Requests the extractors reject get the same `{"error": ...}` body as every other failure

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|e, _| {
        debug!("💻️ Rejected request body: {e}");
        ServerError::InvalidRequestBody(e.to_string()).into()
    })
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|e, _| {
        debug!("💻️ Rejected query string: {e}");
        ServerError::InvalidQuery(e.to_string()).into()
    })
}

fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|e, _| ServerError::InvalidRequestPath(e.to_string()).into())
}

/// The notification service is a separate collaborator. Until it subscribes, ledger events are logged so that
/// operators can follow the money.
fn notification_hooks() -> EventHooks {
    let mut hooks = EventHooks::default();
    hooks.on_wallet_recharged(|ev| {
        async move {
            info!(
                "📬️ Wallet {} was recharged with {} ({}). New balance: {}",
                ev.wallet.account_number, ev.transaction.amount, ev.transaction.reference, ev.wallet.balance
            );
        }
        .boxed()
    });
    hooks.on_settlement_completed(|ev| {
        async move {
            let rev = ev.reversement;
            info!(
                "📬️ Order #{} was settled for producer {}: {} earned, {} commission ({})",
                rev.order_id, rev.producer_id, rev.producer_earnings, rev.platform_commission, rev.reference
            );
        }
        .boxed()
    });
    hooks
}
