//! End-to-end order flow tests against the in-memory store and stub gateway.

use std::{
    collections::HashMap,
    pin::Pin,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::Duration,
};

use apg_common::Paise;
use audit_payment_engine::{
    db_types::{Customer, OrderStatusType},
    events::{EventHandlers, EventHooks},
    order_objects::{NewOrderRequest, PaymentCallback},
    test_utils::{MemoryOrderStore, StubGateway},
    OrderFlowApi, OrderStore, PaymentEngineError,
};

fn api_with_hook(
    store: MemoryOrderStore,
    gateway: StubGateway,
) -> (OrderFlowApi<MemoryOrderStore, StubGateway>, Arc<AtomicU64>) {
    let fulfillments = Arc::new(AtomicU64::new(0));
    let counter = fulfillments.clone();
    let mut hooks = EventHooks::default();
    hooks.on_order_completed(move |_ev| {
        let counter = counter.clone();
        Box::pin(async move {
            counter.fetch_add(1, Ordering::SeqCst);
        }) as Pin<Box<dyn std::future::Future<Output = ()> + Send>>
    });
    let handlers = EventHandlers::new(10, hooks);
    let producers = handlers.producers();
    tokio::spawn(handlers.start_handlers());
    (OrderFlowApi::new(store, gateway, producers), fulfillments)
}

fn sample_request(amount: i64) -> NewOrderRequest {
    let mut request = NewOrderRequest::new(Paise::from(amount));
    request.customer = Customer {
        name: "Asha Rao".to_string(),
        email: "asha@example.com".to_string(),
        phone: "+911234567890".to_string(),
        website: "https://example.com".to_string(),
    };
    request.notes = HashMap::from([("package".to_string(), "seo-audit".to_string())]);
    request
}

async fn settle_events() {
    // Give spawned hook handlers a chance to drain
    tokio::time::sleep(Duration::from_millis(100)).await;
}

#[tokio::test]
async fn happy_path_creates_and_completes_an_order() {
    let _ = env_logger::try_init();
    let store = MemoryOrderStore::new();
    let gateway = StubGateway::default();
    let (api, fulfillments) = api_with_hook(store.clone(), gateway.clone());

    let created = api.create_order(sample_request(87_000)).await.expect("order creation failed");
    assert_eq!(created.amount, Paise::from(87_000));
    assert_eq!(created.currency, "INR");
    assert_eq!(created.key_id, "rzp_test_stubkey");
    assert!(!created.gateway_order_id.is_empty());

    let stored = store.fetch_order_by_id(created.order_id).await.unwrap().unwrap();
    assert_eq!(stored.status, OrderStatusType::Pending);
    assert_eq!(stored.gateway_order_id.as_deref(), Some(created.gateway_order_id.as_str()));

    gateway.register_payment("pay_001", Paise::from(87_000), "INR", true);
    let callback = PaymentCallback {
        gateway_order_id: created.gateway_order_id.clone(),
        gateway_payment_id: "pay_001".to_string(),
        signature: gateway.sign(&created.gateway_order_id, "pay_001"),
    };
    let outcome = api.verify_payment(callback).await.expect("verification failed");
    assert!(outcome.newly_completed);
    assert_eq!(outcome.order.status, OrderStatusType::Completed);
    assert_eq!(outcome.order.gateway_payment_id.as_deref(), Some("pay_001"));

    settle_events().await;
    assert_eq!(fulfillments.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn verification_is_idempotent() {
    let _ = env_logger::try_init();
    let store = MemoryOrderStore::new();
    let gateway = StubGateway::default();
    let (api, fulfillments) = api_with_hook(store.clone(), gateway.clone());

    let created = api.create_order(sample_request(87_000)).await.unwrap();
    gateway.register_payment("pay_002", Paise::from(87_000), "INR", true);
    let callback = PaymentCallback {
        gateway_order_id: created.gateway_order_id.clone(),
        gateway_payment_id: "pay_002".to_string(),
        signature: gateway.sign(&created.gateway_order_id, "pay_002"),
    };

    let first = api.verify_payment(callback.clone()).await.unwrap();
    assert!(first.newly_completed);
    let second = api.verify_payment(callback).await.unwrap();
    assert!(!second.newly_completed);
    assert_eq!(second.order.status, OrderStatusType::Completed);
    assert_eq!(second.order.gateway_payment_id, first.order.gateway_payment_id);

    settle_events().await;
    assert_eq!(fulfillments.load(Ordering::SeqCst), 1, "fulfillment must fire exactly once");
}

#[tokio::test]
async fn forged_signature_is_rejected_and_never_completes_the_order() {
    let _ = env_logger::try_init();
    let store = MemoryOrderStore::new();
    let gateway = StubGateway::default();
    let (api, fulfillments) = api_with_hook(store.clone(), gateway.clone());

    let created = api.create_order(sample_request(87_000)).await.unwrap();
    gateway.register_payment("pay_003", Paise::from(87_000), "INR", true);
    let callback = PaymentCallback {
        gateway_order_id: created.gateway_order_id.clone(),
        gateway_payment_id: "pay_003".to_string(),
        signature: "definitely-not-the-signature".to_string(),
    };
    let err = api.verify_payment(callback).await.expect_err("forged signature must be rejected");
    assert!(matches!(err, PaymentEngineError::SignatureInvalid(_)), "got {err:?}");

    let stored = store.fetch_order_by_id(created.order_id).await.unwrap().unwrap();
    assert_eq!(stored.status, OrderStatusType::Failed);

    settle_events().await;
    assert_eq!(fulfillments.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn amount_tamper_is_rejected() {
    let _ = env_logger::try_init();
    let store = MemoryOrderStore::new();
    let gateway = StubGateway::default();
    let (api, fulfillments) = api_with_hook(store.clone(), gateway.clone());

    let created = api.create_order(sample_request(87_000)).await.unwrap();
    // The processor reports a smaller capture than the order records
    gateway.register_payment("pay_004", Paise::from(100), "INR", true);
    let callback = PaymentCallback {
        gateway_order_id: created.gateway_order_id.clone(),
        gateway_payment_id: "pay_004".to_string(),
        signature: gateway.sign(&created.gateway_order_id, "pay_004"),
    };
    let err = api.verify_payment(callback).await.expect_err("amount mismatch must be rejected");
    assert!(matches!(err, PaymentEngineError::AmountMismatch { .. }), "got {err:?}");

    let stored = store.fetch_order_by_id(created.order_id).await.unwrap().unwrap();
    assert_eq!(stored.status, OrderStatusType::Failed);

    settle_events().await;
    assert_eq!(fulfillments.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn uncaptured_payment_is_rejected() {
    let _ = env_logger::try_init();
    let store = MemoryOrderStore::new();
    let gateway = StubGateway::default();
    let (api, _) = api_with_hook(store.clone(), gateway.clone());

    let created = api.create_order(sample_request(87_000)).await.unwrap();
    gateway.register_payment("pay_005", Paise::from(87_000), "INR", false);
    let callback = PaymentCallback {
        gateway_order_id: created.gateway_order_id.clone(),
        gateway_payment_id: "pay_005".to_string(),
        signature: gateway.sign(&created.gateway_order_id, "pay_005"),
    };
    let err = api.verify_payment(callback).await.expect_err("uncaptured payment must be rejected");
    assert!(matches!(err, PaymentEngineError::PaymentNotCaptured(_)), "got {err:?}");
}

#[tokio::test]
async fn unknown_gateway_order_is_fatal_and_mutates_nothing() {
    let _ = env_logger::try_init();
    let store = MemoryOrderStore::new();
    let gateway = StubGateway::default();
    let (api, _) = api_with_hook(store.clone(), gateway.clone());

    let callback = PaymentCallback {
        gateway_order_id: "order_never_created".to_string(),
        gateway_payment_id: "pay_006".to_string(),
        signature: gateway.sign("order_never_created", "pay_006"),
    };
    let err = api.verify_payment(callback).await.expect_err("unknown order must fail");
    assert!(matches!(err, PaymentEngineError::OrderNotFound(_)), "got {err:?}");
    assert_eq!(store.order_count(), 0);
}

#[tokio::test]
async fn gateway_outage_during_corroboration_is_retryable() {
    let _ = env_logger::try_init();
    let store = MemoryOrderStore::new();
    let gateway = StubGateway::default();
    let (api, fulfillments) = api_with_hook(store.clone(), gateway.clone());

    let created = api.create_order(sample_request(87_000)).await.unwrap();
    gateway.register_payment("pay_007", Paise::from(87_000), "INR", true);
    let callback = PaymentCallback {
        gateway_order_id: created.gateway_order_id.clone(),
        gateway_payment_id: "pay_007".to_string(),
        signature: gateway.sign(&created.gateway_order_id, "pay_007"),
    };

    gateway.set_fail_fetch(true);
    let err = api.verify_payment(callback.clone()).await.expect_err("outage must surface");
    assert!(matches!(err, PaymentEngineError::GatewayUnavailable(_)), "got {err:?}");
    assert!(err.is_transient());
    // The order is untouched, so a retry of the whole call can still succeed
    let stored = store.fetch_order_by_id(created.order_id).await.unwrap().unwrap();
    assert_eq!(stored.status, OrderStatusType::Pending);

    gateway.set_fail_fetch(false);
    let outcome = api.verify_payment(callback).await.expect("retry should succeed");
    assert!(outcome.newly_completed);

    settle_events().await;
    assert_eq!(fulfillments.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn failed_remote_creation_leaves_the_local_order_pending() {
    let _ = env_logger::try_init();
    let store = MemoryOrderStore::new();
    let gateway = StubGateway::default();
    let (api, _) = api_with_hook(store.clone(), gateway.clone());

    gateway.set_fail_create(true);
    let err = api.create_order(sample_request(87_000)).await.expect_err("creation must fail");
    assert!(matches!(err, PaymentEngineError::OrderCreationFailed(_)), "got {err:?}");

    // The pending row survives with no gateway order id; the caller may retry from scratch
    assert_eq!(store.order_count(), 1);
    let stored = store.fetch_order_by_id(1).await.unwrap().unwrap();
    assert_eq!(stored.status, OrderStatusType::Pending);
    assert!(stored.gateway_order_id.is_none());
}

#[tokio::test]
async fn concurrent_verifications_complete_exactly_once() {
    let _ = env_logger::try_init();
    let store = MemoryOrderStore::new();
    let gateway = StubGateway::default();
    let (api, fulfillments) = api_with_hook(store.clone(), gateway.clone());

    let created = api.create_order(sample_request(87_000)).await.unwrap();
    gateway.register_payment("pay_008", Paise::from(87_000), "INR", true);
    let callback = PaymentCallback {
        gateway_order_id: created.gateway_order_id.clone(),
        gateway_payment_id: "pay_008".to_string(),
        signature: gateway.sign(&created.gateway_order_id, "pay_008"),
    };

    let (a, b) = tokio::join!(api.verify_payment(callback.clone()), api.verify_payment(callback));
    let a = a.expect("first verification failed");
    let b = b.expect("second verification failed");
    assert_eq!(a.order.status, OrderStatusType::Completed);
    assert_eq!(b.order.status, OrderStatusType::Completed);
    assert!(a.newly_completed ^ b.newly_completed, "exactly one call must win the transition");

    settle_events().await;
    assert_eq!(fulfillments.load(Ordering::SeqCst), 1, "the race loser must not re-trigger fulfillment");
}

#[tokio::test]
async fn invalid_amount_is_rejected_before_any_side_effect() {
    let _ = env_logger::try_init();
    let store = MemoryOrderStore::new();
    let gateway = StubGateway::default();
    let (api, _) = api_with_hook(store.clone(), gateway.clone());

    let err = api.create_order(sample_request(0)).await.expect_err("zero amount must be rejected");
    assert!(matches!(err, PaymentEngineError::InvalidRequest(_)), "got {err:?}");
    assert_eq!(store.order_count(), 0);

    let mut request = sample_request(1_000);
    request.currency = Some("RUPEES".to_string());
    let err = api.create_order(request).await.expect_err("bad currency must be rejected");
    assert!(matches!(err, PaymentEngineError::InvalidRequest(_)), "got {err:?}");
    assert_eq!(store.order_count(), 0);
}
