use actix_web::{body::MessageBody, http::StatusCode, test, test::TestRequest, web, App};
use audit_payment_engine::{
    events::EventProducers,
    test_utils::{MemoryOrderStore, StubGateway},
    OrderFlowApi,
};
use log::debug;

use crate::routes::{create_order, verify_payment};

pub type TestApi = OrderFlowApi<MemoryOrderStore, StubGateway>;

/// Builds the `/api` service tree over the in-memory store and stub gateway, exactly as `server.rs` builds it over
/// the production types. No event handler runs; producers are empty, so completion hooks are no-ops.
pub fn test_api(store: MemoryOrderStore, gateway: StubGateway) -> TestApi {
    OrderFlowApi::new(store, gateway, EventProducers::default())
}

pub async fn post_request(api: TestApi, path: &str, body: serde_json::Value) -> Result<(StatusCode, String), String> {
    let app = App::new().app_data(web::Data::new(api)).service(
        web::scope("/api")
            .route("/create-order", web::post().to(create_order::<MemoryOrderStore, StubGateway>))
            .route("/verify-payment", web::post().to(verify_payment::<MemoryOrderStore, StubGateway>)),
    );
    let service = test::init_service(app).await;
    let req = TestRequest::post().uri(path).set_json(&body).to_request();
    debug!("Making request to {path}");
    let (_, res) = test::try_call_service(&service, req).await.map_err(|e| e.to_string())?.into_parts();
    let status = res.status();
    let body = String::from_utf8_lossy(&res.into_body().try_into_bytes().unwrap()).into_owned();
    Ok((status, body))
}
