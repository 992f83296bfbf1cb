//! Request handler definitions
//!
//! Every route and its handler is defined here. Handlers stay thin: they extract the request, call one of the ledger
//! APIs and serialise the result. Anything more involved belongs in `ledger_engine`.
//!
//! Handlers run on actix worker threads, and each worker serves its requests one after another. All ledger work is
//! async, so a handler waiting on the database yields the worker to other requests. Never block inside a handler
//! (e.g. with `std::thread::sleep` or synchronous file I/O), since that stalls every request queued on the worker.
use actix_web::{get, web, HttpResponse, Responder};
use ledger_engine::{
    ledger_objects::{LedgerQueryFilter, Pagination, SettlementRequest},
    LedgerDatabase,
    LedgerReporting,
    ReportingApi,
    SettlementApi,
    WalletApi,
};
use log::*;

use crate::{
    data_objects::{MonthlyParams, RechargeParams},
    errors::ServerError,
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Wallets  ----------------------------------------------------
route!(wallet => Get "/wallets/{user_id}" impl LedgerDatabase);
pub async fn wallet<B: LedgerDatabase>(
    path: web::Path<i64>,
    api: web::Data<WalletApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let user_id = path.into_inner();
    debug!("💻️ GET wallet for user {user_id}");
    let wallet = api.wallet_for_user(user_id).await?;
    Ok(HttpResponse::Ok().json(wallet))
}

route!(open_wallet => Post "/wallets/{user_id}" impl LedgerDatabase);
/// Opens a wallet for an existing user. A user has at most one wallet, so a second call fails with `409 Conflict`.
pub async fn open_wallet<B: LedgerDatabase>(
    path: web::Path<i64>,
    api: web::Data<WalletApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let user_id = path.into_inner();
    debug!("💻️ POST open wallet for user {user_id}");
    let wallet = api.open_wallet(user_id).await?;
    Ok(HttpResponse::Created().json(wallet))
}

route!(recharge => Post "/wallets/{user_id}/recharge" impl LedgerDatabase);
/// Route handler for wallet recharges
///
/// The payment itself has already been captured by the payment collaborator by the time this is called. The body
/// carries the amount (a positive decimal string) and the two channel labels:
/// ```json
/// { "amount": "2500.00", "payment_method": "mobile_money", "recharge_type": "agent" }
/// ```
/// The response holds the updated wallet and the ledger entry that was recorded.
pub async fn recharge<B: LedgerDatabase>(
    path: web::Path<i64>,
    body: web::Json<RechargeParams>,
    api: web::Data<WalletApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let user_id = path.into_inner();
    let params = body.into_inner();
    debug!("💻️ POST recharge of {} for user {user_id}", params.amount);
    let result = api.recharge(user_id, params.amount, &params.payment_method, &params.recharge_type).await?;
    Ok(HttpResponse::Ok().json(result))
}

route!(wallet_history => Get "/wallets/{user_id}/transactions" impl LedgerDatabase);
pub async fn wallet_history<B: LedgerDatabase>(
    path: web::Path<i64>,
    query: web::Query<Pagination>,
    api: web::Data<WalletApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let user_id = path.into_inner();
    let pagination = query.into_inner();
    debug!("💻️ GET transactions for user {user_id} ({pagination:?})");
    let history = api.history(user_id, pagination).await?;
    Ok(HttpResponse::Ok().json(history))
}

route!(wallet_audit => Get "/wallets/{user_id}/audit" impl LedgerDatabase, LedgerReporting);
/// Compares the user's wallet balance with the sum of its ledger entries.
pub async fn wallet_audit<B: LedgerDatabase, R: LedgerReporting>(
    path: web::Path<i64>,
    wallets: web::Data<WalletApi<B>>,
    reports: web::Data<ReportingApi<R>>,
) -> Result<HttpResponse, ServerError> {
    let user_id = path.into_inner();
    debug!("💻️ GET wallet audit for user {user_id}");
    let wallet = wallets.wallet_for_user(user_id).await?;
    let audit = reports
        .audit_wallet(wallet.id)
        .await?
        .ok_or_else(|| ServerError::NoRecordFound(format!("No audit is available for wallet {}", wallet.id)))?;
    if !audit.is_consistent() {
        error!(
            "💻️ Wallet {} of user {user_id} is out of step with its ledger by {}",
            wallet.account_number,
            audit.discrepancy()
        );
    }
    Ok(HttpResponse::Ok().json(audit))
}

//----------------------------------------------   Ledger  ----------------------------------------------------
route!(transactions => Get "/transactions" impl LedgerDatabase);
/// Searches the whole ledger. The filter fields (`tx_type`, `user_id`, `wallet_id`, `since`, `until`) and the
/// pagination fields (`offset`, `count`) are all optional query parameters.
pub async fn transactions<B: LedgerDatabase>(
    filter: web::Query<LedgerQueryFilter>,
    page: web::Query<Pagination>,
    api: web::Data<WalletApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let filter = filter.into_inner();
    debug!("💻️ GET transactions matching {filter:?}");
    let result = api.search_transactions(filter, page.into_inner()).await?;
    Ok(HttpResponse::Ok().json(result))
}

route!(transaction_by_reference => Get "/transactions/{reference}" impl LedgerDatabase);
pub async fn transaction_by_reference<B: LedgerDatabase>(
    path: web::Path<String>,
    api: web::Data<WalletApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let reference = path.into_inner();
    debug!("💻️ GET transaction {reference}");
    let tx = api
        .transaction_by_reference(&reference)
        .await?
        .ok_or_else(|| ServerError::NoRecordFound(format!("No ledger entry has the reference {reference}")))?;
    Ok(HttpResponse::Ok().json(tx))
}

//----------------------------------------------   Settlements  ----------------------------------------------------
route!(settle => Post "/settlements" impl LedgerDatabase);
/// Route handler for order settlement
///
/// Called by the order subsystem once a producer's part of an order has been delivered. The body is a
/// [`SettlementRequest`]. The producer's wallet is credited with their earnings, the platform wallet with the
/// commission, and the settlement record is returned. Settling the same order for the same producer twice fails with
/// `409 Conflict`.
pub async fn settle<B: LedgerDatabase>(
    body: web::Json<SettlementRequest>,
    api: web::Data<SettlementApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let request = body.into_inner();
    debug!("💻️ POST settle order #{} for producer {}", request.order_id, request.producer_id);
    let reversement = api.settle(request).await?;
    Ok(HttpResponse::Created().json(reversement))
}

route!(settlement => Get "/settlements/{id}" impl LedgerDatabase);
pub async fn settlement<B: LedgerDatabase>(
    path: web::Path<i64>,
    api: web::Data<SettlementApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    debug!("💻️ GET settlement {id}");
    let reversement = api.settlement(id).await?;
    Ok(HttpResponse::Ok().json(reversement))
}

route!(revoke_settlement => Delete "/settlements/{id}" impl LedgerDatabase);
pub async fn revoke_settlement<B: LedgerDatabase>(
    path: web::Path<i64>,
    api: web::Data<SettlementApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    info!("💻️ DELETE settlement {id}");
    let reversement = api.revoke_settlement(id).await?;
    Ok(HttpResponse::Ok().json(reversement))
}

//----------------------------------------------   Stats  ----------------------------------------------------
route!(totals_by_type => Get "/stats/totals" impl LedgerReporting);
pub async fn totals_by_type<B: LedgerReporting>(
    filter: web::Query<LedgerQueryFilter>,
    api: web::Data<ReportingApi<B>>,
) -> Result<HttpResponse, ServerError> {
    trace!("💻️ GET totals by type");
    let totals = api.totals_by_type(filter.into_inner()).await?;
    Ok(HttpResponse::Ok().json(totals))
}

route!(totals_by_user => Get "/stats/users" impl LedgerReporting);
pub async fn totals_by_user<B: LedgerReporting>(
    filter: web::Query<LedgerQueryFilter>,
    api: web::Data<ReportingApi<B>>,
) -> Result<HttpResponse, ServerError> {
    trace!("💻️ GET totals by user");
    let totals = api.totals_by_user(filter.into_inner()).await?;
    Ok(HttpResponse::Ok().json(totals))
}

route!(monthly_totals => Get "/stats/monthly" impl LedgerReporting);
pub async fn monthly_totals<B: LedgerReporting>(
    query: web::Query<MonthlyParams>,
    api: web::Data<ReportingApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let MonthlyParams { from, to, tx_type } = query.into_inner();
    trace!("💻️ GET monthly totals from {from} to {to}");
    let totals = api.monthly_totals(from, to, tx_type).await?;
    Ok(HttpResponse::Ok().json(totals))
}

route!(monthly_settlements => Get "/stats/settlements/monthly" impl LedgerReporting);
pub async fn monthly_settlements<B: LedgerReporting>(
    query: web::Query<MonthlyParams>,
    api: web::Data<ReportingApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let MonthlyParams { from, to, .. } = query.into_inner();
    trace!("💻️ GET monthly settlements from {from} to {to}");
    let totals = api.monthly_settlements(from, to).await?;
    Ok(HttpResponse::Ok().json(totals))
}

route!(producer_settlements => Get "/stats/producers/{id}" impl LedgerReporting);
pub async fn producer_settlements<B: LedgerReporting>(
    path: web::Path<i64>,
    api: web::Data<ReportingApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let producer_id = path.into_inner();
    trace!("💻️ GET settlement totals for producer {producer_id}");
    let totals = api.producer_settlements(producer_id).await?;
    Ok(HttpResponse::Ok().json(totals))
}
