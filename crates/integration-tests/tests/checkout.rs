//! Checkout against the fake backend: payload shape and cart lifecycle.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use rust_decimal::Decimal;
use souk_client::{ApiError, CartStore, CheckoutSession};
use souk_core::{
    CategoryId, Destination, Fees, OrderError, OrderStatus, OrderType, ProductDescriptor, ProductId,
    StoreId, UserId,
};
use souk_integration_tests::{FakeBackend, Failure};
use uuid::Uuid;

fn destination() -> Destination {
    Destination {
        address: "Rue de Marseille, Tunis".to_string(),
        latitude: 36.8,
        longitude: 10.18,
    }
}

/// Fill `cart` from the backend's catalog: two apples and one banana.
async fn fill_from_catalog(backend: &FakeBackend, cart: &CartStore) {
    let products = backend
        .client()
        .products(&StoreId::new("s1"), &CategoryId::new("c1"))
        .await
        .unwrap();
    let apples = ProductDescriptor::from(&products[0]);
    let bananas = ProductDescriptor::from(&products[1]);

    cart.add_item(&apples);
    cart.add_item(&apples);
    cart.add_item(&bananas);
}

#[tokio::test]
async fn test_submit_posts_order_and_clears_cart() {
    let backend = FakeBackend::start().await;
    let cart = CartStore::new();
    let session = CheckoutSession::new(
        backend.client(),
        cart.clone(),
        StoreId::new("s1"),
        UserId::new("u1"),
    );
    fill_from_catalog(&backend, &cart).await;
    assert_eq!(cart.total_price(), Decimal::new(6_000, 3));

    let order = session.submit(destination()).await.unwrap();
    assert_eq!(order.id.as_str(), "o1");
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.total_amount, Decimal::new(6, 0));
    assert!(cart.is_empty());
    assert_eq!(cart.store(), Some(StoreId::new("s1")));

    let submitted = backend.submitted_orders();
    assert_eq!(submitted.len(), 1);
    let sent = &submitted[0];
    assert_eq!(sent.store_id, "s1");
    assert!(Uuid::parse_str(sent.request_id.as_deref().unwrap()).is_ok());

    let body = &sent.body;
    assert_eq!(body["storeId"], "s1");
    assert_eq!(body["userId"], "u1");
    assert_eq!(body["orderType"], "delivery");
    assert_eq!(body["status"], "pending");
    assert_eq!(body["destination"], "Rue de Marseille, Tunis");
    assert_eq!(body["totalAmount"].as_f64(), Some(6.0));

    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["variantId"], "A");
    assert_eq!(items[0]["quantity"], 2);
    assert_eq!(items[0]["totalAmount"].as_f64(), Some(5.0));
    assert_eq!(items[1]["variantId"], "B");
    assert_eq!(items[1]["quantity"], 1);
}

#[tokio::test]
async fn test_items_added_during_submission_are_kept() {
    let backend = FakeBackend::start().await;
    let cart = CartStore::new();
    let session = CheckoutSession::new(
        backend.client(),
        cart.clone(),
        StoreId::new("s1"),
        UserId::new("u1"),
    );
    fill_from_catalog(&backend, &cart).await;
    backend.delay_orders(Duration::from_millis(300));

    let pending = tokio::spawn({
        let session = session.clone();
        async move { session.submit(destination()).await }
    });

    tokio::time::sleep(Duration::from_millis(100)).await;
    let apples = ProductDescriptor::new("A", "Apples", Decimal::new(2_500, 3), "a.png");
    let cheese = ProductDescriptor::new("C", "Cheese", Decimal::new(4_200, 3), "");
    cart.add_item(&apples);
    cart.add_item(&cheese);

    pending.await.unwrap().unwrap();

    let body = &backend.submitted_orders()[0].body;
    assert_eq!(body["items"][0]["quantity"], 2);
    assert_eq!(body["items"].as_array().unwrap().len(), 2);

    cart.with_cart(|cart| {
        assert_eq!(cart.quantity_of(&ProductId::new("A")), 1);
        assert_eq!(cart.quantity_of(&ProductId::new("B")), 0);
        assert_eq!(cart.quantity_of(&ProductId::new("C")), 1);
    });
    assert_eq!(cart.total_price(), Decimal::new(6_700, 3));
}

#[tokio::test]
async fn test_each_submission_has_its_own_request_id() {
    let backend = FakeBackend::start().await;
    let cart = CartStore::new();
    let session = CheckoutSession::new(
        backend.client(),
        cart.clone(),
        StoreId::new("s1"),
        UserId::new("u1"),
    );

    fill_from_catalog(&backend, &cart).await;
    session.submit(destination()).await.unwrap();
    fill_from_catalog(&backend, &cart).await;
    session.submit(destination()).await.unwrap();

    let ids: Vec<_> = backend
        .submitted_orders()
        .into_iter()
        .map(|o| o.request_id.unwrap())
        .collect();
    assert_eq!(ids.len(), 2);
    assert_ne!(ids[0], ids[1]);
}

#[tokio::test]
async fn test_failed_submission_keeps_cart() {
    let backend = FakeBackend::start().await;
    let cart = CartStore::new();
    let session = CheckoutSession::new(
        backend.client(),
        cart.clone(),
        StoreId::new("s1"),
        UserId::new("u1"),
    );
    fill_from_catalog(&backend, &cart).await;
    let before = cart.snapshot();

    backend.fail_with(Failure::ServerError);
    let err = session.submit(destination()).await.unwrap_err();
    assert!(err.is_server_error());
    assert_eq!(cart.snapshot(), before);

    // Retry succeeds once the backend recovers.
    backend.fail_with(Failure::None);
    session.submit(destination()).await.unwrap();
    assert!(cart.is_empty());
}

#[tokio::test]
async fn test_empty_cart_is_rejected_without_a_request() {
    let backend = FakeBackend::start().await;
    let session = CheckoutSession::new(
        backend.client(),
        CartStore::new(),
        StoreId::new("s1"),
        UserId::new("u1"),
    );

    let err = session.submit(destination()).await.unwrap_err();
    assert!(matches!(err, ApiError::Order(OrderError::EmptyCart)));
    assert_eq!(backend.hits("/orders/store/s1"), 0);
}

#[tokio::test]
async fn test_pickup_order_skips_delivery_fee() {
    let backend = FakeBackend::start().await;
    let cart = CartStore::new();
    let fees = Fees {
        delivery: Decimal::new(3_000, 3),
        service: Decimal::new(500, 3),
    };
    let mut session = CheckoutSession::new(
        backend.client(),
        cart.clone(),
        StoreId::new("s1"),
        UserId::new("u1"),
    )
    .with_fees(fees);
    fill_from_catalog(&backend, &cart).await;

    assert_eq!(session.summary().total, Decimal::new(9_500, 3));

    session.set_order_type(OrderType::Pickup);
    assert_eq!(session.summary().total, Decimal::new(6_500, 3));

    session.submit(destination()).await.unwrap();
    let body = &backend.submitted_orders()[0].body;
    assert_eq!(body["orderType"], "pickup");
    assert_eq!(body["totalAmount"].as_f64(), Some(6.5));
}

#[tokio::test]
async fn test_session_for_another_store_drops_old_items() {
    let backend = FakeBackend::start().await;
    let cart = CartStore::new();

    let _first = CheckoutSession::new(
        backend.client(),
        cart.clone(),
        StoreId::new("s1"),
        UserId::new("u1"),
    );
    fill_from_catalog(&backend, &cart).await;
    assert_eq!(cart.total_item_count(), 3);

    let second = CheckoutSession::new(
        backend.client(),
        cart.clone(),
        StoreId::new("s2"),
        UserId::new("u1"),
    );
    assert!(cart.is_empty());
    assert_eq!(second.store_id(), &StoreId::new("s2"));
}
