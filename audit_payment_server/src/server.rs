use std::{future::Future, pin::Pin, time::Duration};

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use audit_payment_engine::{
    events::{EventHandlers, EventHooks, EventProducers, OrderCompletedEvent},
    OrderFlowApi,
    OrderStore,
    PaymentGateway,
    SqliteDatabase,
};
use log::*;

use crate::{
    config::ServerConfig,
    errors::ServerError,
    integrations::{RazorpayGateway, TestModeGateway},
    routes::{create_order, health, verify_payment},
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = if config.database_url.is_empty() {
        SqliteDatabase::new(25).await
    } else {
        SqliteDatabase::new_with_url(&config.database_url, 25).await
    }
    .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let producers = start_fulfillment_handler().await;
    if config.test_mode {
        let gateway = TestModeGateway::new(&config.razorpay, db.clone());
        let srv = create_server_instance(config, db, gateway, producers)?;
        srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
    } else {
        let gateway = RazorpayGateway::try_new(config.razorpay.clone())?;
        let srv = create_server_instance(config, db, gateway, producers)?;
        srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
    }
}

pub fn create_server_instance<B, G>(
    config: ServerConfig,
    store: B,
    gateway: G,
    producers: EventProducers,
) -> Result<Server, ServerError>
where
    B: OrderStore + Send + 'static,
    G: PaymentGateway + Send + 'static,
{
    let srv = HttpServer::new(move || {
        let orders_api = OrderFlowApi::new(store.clone(), gateway.clone(), producers.clone());
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("apg::access_log"))
            .app_data(web::Data::new(orders_api))
            .service(health)
            .service(
                web::scope("/api")
                    .route("/create-order", web::post().to(create_order::<B, G>))
                    .route("/verify-payment", web::post().to(verify_payment::<B, G>)),
            )
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}

/// Wires up the fulfillment subscriber and starts its handler task. Fulfillment fires exactly once per order, from
/// the verification call that wins the `Pending → Completed` transition, and never blocks or unwinds the HTTP
/// response.
pub async fn start_fulfillment_handler() -> EventProducers {
    let mut hooks = EventHooks::default();
    hooks.on_order_completed(|event| {
        Box::pin(dispatch_fulfillment(event)) as Pin<Box<dyn Future<Output = ()> + Send>>
    });
    let handlers = EventHandlers::new(25, hooks);
    let producers = handlers.producers();
    handlers.start_handlers().await;
    producers
}

async fn dispatch_fulfillment(event: OrderCompletedEvent) {
    let order = &event.order;
    info!(
        "📬️ Dispatching invoice for order #{} ({} {}) to {} <{}> for site {}",
        order.id, order.amount, order.currency, order.customer_name, order.customer_email, order.customer_website
    );
    // Invoice generation and delivery are owned by the fulfillment service; the payment server only hands over a
    // completed-order snapshot.
}
