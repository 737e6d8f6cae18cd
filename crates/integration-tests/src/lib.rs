//! Integration tests for Souk.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p souk-integration-tests
//! ```
//!
//! No external services are needed: [`FakeBackend`] serves the catalog,
//! order and profile endpoints from an in-process `axum` router bound to a random local
//! port, and records what the client sent.
//!
//! # Test Categories
//!
//! - `catalog` - Endpoint paths, caching and error mapping
//! - `checkout` - Order submission and what happens to the cart
//! - `orders` - Order history and status filtering
//! - `profile` - Profile reads and phone number updates

#![allow(clippy::missing_panics_doc)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use axum::extract::{Path, Request, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::{Value, json};
use souk_client::{ApiClient, ClientConfig, REQUEST_ID_HEADER};
use tokio::task::JoinHandle;
use url::Url;

/// Base path the fake backend mounts its routes under.
pub const API_PREFIX: &str = "/api";

/// Failure the fake backend answers every request with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Failure {
    #[default]
    None,
    /// `401` with a short body.
    Unauthorized,
    /// `429` with the given `Retry-After` seconds.
    RateLimited(u64),
    /// `500` with a 1000-character body.
    ServerError,
}

/// An order body received by `POST /orders/store/{storeId}`.
#[derive(Debug, Clone)]
pub struct SubmittedOrder {
    pub store_id: String,
    pub request_id: Option<String>,
    pub body: Value,
}

#[derive(Debug, Default)]
struct Recorded {
    hits: HashMap<String, usize>,
    authorization: Vec<Option<String>>,
    orders: Vec<SubmittedOrder>,
}

#[derive(Debug, Default)]
struct Shared {
    failure: Mutex<Failure>,
    order_delay: Mutex<Duration>,
    recorded: Mutex<Recorded>,
    /// Phone number per user id; users not listed have none.
    phones: Mutex<HashMap<String, String>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// REST backend stand-in serving fixed catalog and order fixtures.
///
/// Catalog: store `s1` has categories `c1` (Fruits) and `c2` (Bakery);
/// `s1/c1` lists `A` (Apples, 2.500) and `B` (Bananas, 1.000). Any other
/// store or category is a `404`. Profiles exist for `u1` only, initially
/// without a phone number.
pub struct FakeBackend {
    url: Url,
    shared: Arc<Shared>,
    task: JoinHandle<()>,
}

impl FakeBackend {
    /// Bind to a random local port and start serving.
    pub async fn start() -> Self {
        let shared = Arc::new(Shared::default());

        let api = Router::new()
            .route("/stores/all", get(stores))
            .route("/stores/{store_id}/categories", get(categories))
            .route(
                "/stores/{store_id}/categories/{category_id}/products",
                get(products),
            )
            .route("/orders/store/{store_id}", post(create_order))
            .route("/orders/user/{user_id}", get(user_orders))
            .route("/users/{user_id}/profile", get(profile))
            .route("/users/{user_id}/phone", put(update_phone));

        let app = Router::new()
            .nest(API_PREFIX, api)
            .layer(middleware::from_fn_with_state(shared.clone(), record))
            .with_state(shared.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake backend");
        let addr = listener.local_addr().expect("Failed to read local address");

        let task = tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("Fake backend stopped");
        });

        // No trailing slash: the client config must add it.
        let url = Url::parse(&format!("http://{addr}{API_PREFIX}")).expect("Invalid backend URL");

        Self { url, shared, task }
    }

    /// Base URL to configure the client with.
    #[must_use]
    pub fn url(&self) -> Url {
        self.url.clone()
    }

    /// A client pointed at this backend, without a token.
    #[must_use]
    pub fn client(&self) -> ApiClient {
        ApiClient::new(&ClientConfig::new(self.url())).expect("Failed to build client")
    }

    /// Answer every following request with `failure`.
    pub fn fail_with(&self, failure: Failure) {
        *lock(&self.shared.failure) = failure;
    }

    /// Hold every order submission for `delay` before accepting it.
    pub fn delay_orders(&self, delay: Duration) {
        *lock(&self.shared.order_delay) = delay;
    }

    /// Number of requests received for `path` (relative to [`API_PREFIX`]).
    #[must_use]
    pub fn hits(&self, path: &str) -> usize {
        let full = format!("{API_PREFIX}{path}");
        lock(&self.shared.recorded)
            .hits
            .get(&full)
            .copied()
            .unwrap_or_default()
    }

    /// `Authorization` header of every request, in arrival order.
    #[must_use]
    pub fn authorization_headers(&self) -> Vec<Option<String>> {
        lock(&self.shared.recorded).authorization.clone()
    }

    /// Every order body accepted so far.
    #[must_use]
    pub fn submitted_orders(&self) -> Vec<SubmittedOrder> {
        lock(&self.shared.recorded).orders.clone()
    }
}

impl Drop for FakeBackend {
    fn drop(&mut self) {
        self.task.abort();
    }
}

// =============================================================================
// Middleware
// =============================================================================

async fn record(State(shared): State<Arc<Shared>>, request: Request, next: Next) -> Response {
    {
        let mut recorded = lock(&shared.recorded);
        *recorded
            .hits
            .entry(request.uri().path().to_string())
            .or_default() += 1;
        let authorization = request
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        recorded.authorization.push(authorization);
    }

    let failure = *lock(&shared.failure);
    match failure {
        Failure::None => next.run(request).await,
        Failure::Unauthorized => (StatusCode::UNAUTHORIZED, "token expired").into_response(),
        Failure::RateLimited(secs) => (
            StatusCode::TOO_MANY_REQUESTS,
            [(header::RETRY_AFTER, secs.to_string())],
            "slow down",
        )
            .into_response(),
        Failure::ServerError => {
            (StatusCode::INTERNAL_SERVER_ERROR, "x".repeat(1000)).into_response()
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

async fn stores() -> Json<Value> {
    Json(json!([
        {
            "id": "s1",
            "name": "Carrefour Lac",
            "logo": "carrefour.png",
            "location": {
                "address": "Les Berges du Lac",
                "latitude": 36.832,
                "longitude": 10.233
            }
        },
        { "id": "s2", "name": "Monoprix Menzah" }
    ]))
}

async fn categories(Path(store_id): Path<String>) -> Response {
    if store_id != "s1" {
        return (StatusCode::NOT_FOUND, "store not found").into_response();
    }
    Json(json!([
        { "id": "c1", "name": "Fruits", "image": "fruits.png" },
        { "id": "c2", "name": "Bakery" }
    ]))
    .into_response()
}

async fn products(Path((store_id, category_id)): Path<(String, String)>) -> Response {
    if store_id != "s1" || category_id != "c1" {
        return (StatusCode::NOT_FOUND, "category not found").into_response();
    }
    Json(json!([
        { "id": "A", "name": "Apples", "sellPriceTtc": 2.5, "image": "a.png" },
        { "id": "B", "name": "Bananas", "sellPriceTtc": "1.000" }
    ]))
    .into_response()
}

async fn create_order(
    State(shared): State<Arc<Shared>>,
    Path(store_id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let request_id = headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    let delay = *lock(&shared.order_delay);
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }

    let id = {
        let mut recorded = lock(&shared.recorded);
        recorded.orders.push(SubmittedOrder {
            store_id: store_id.clone(),
            request_id,
            body: body.clone(),
        });
        format!("o{}", recorded.orders.len())
    };

    let created = json!({
        "id": id,
        "status": "pending",
        "createdAt": "2024-05-01T09:30:00Z",
        "updatedAt": "2024-05-01T09:30:00Z",
        "totalAmount": body["totalAmount"],
        "storeId": store_id,
        "userId": body["userId"],
        "orderType": body["orderType"],
        "destination": body["destination"],
        "latitude": body["latitude"],
        "longitude": body["longitude"],
        "isActive": true
    });
    (StatusCode::CREATED, Json(created)).into_response()
}

async fn user_orders(Path(user_id): Path<String>) -> Json<Value> {
    let order = |id: &str, status: &str, created_at: &str, total: f64| {
        json!({
            "id": id,
            "status": status,
            "createdAt": created_at,
            "updatedAt": created_at,
            "totalAmount": total,
            "storeId": "s1",
            "userId": user_id,
            "orderType": "delivery",
            "store": { "name": "Carrefour Lac" },
            "items": [
                { "id": format!("{id}-1"), "quantity": 1, "totalAmount": total, "variant": { "name": "Apples" } }
            ]
        })
    };

    Json(json!([
        order("o1", "pending", "2024-05-03T08:00:00Z", 6.0),
        order("o2", "Delivered", "2024-05-01T08:00:00Z", 3.5),
        order("o3", "canceled", "2024-05-02T08:00:00Z", 1.0),
        order("o4", "on_the_way", "2024-05-04T08:00:00Z", 9.25)
    ]))
}

fn profile_body(user_id: &str, phone: &str) -> Value {
    json!({
        "username": user_id,
        "email": format!("{user_id}@souk.tn"),
        "phone": phone
    })
}

async fn profile(State(shared): State<Arc<Shared>>, Path(user_id): Path<String>) -> Response {
    if user_id != "u1" {
        return (StatusCode::NOT_FOUND, "user not found").into_response();
    }
    let phone = lock(&shared.phones)
        .get(&user_id)
        .cloned()
        .unwrap_or_default();
    Json(profile_body(&user_id, &phone)).into_response()
}

async fn update_phone(
    State(shared): State<Arc<Shared>>,
    Path(user_id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    if user_id != "u1" {
        return (StatusCode::NOT_FOUND, "user not found").into_response();
    }
    let Some(phone) = body["phoneNumber"].as_str() else {
        return (StatusCode::BAD_REQUEST, "phoneNumber is required").into_response();
    };
    lock(&shared.phones).insert(user_id.clone(), phone.to_owned());
    Json(profile_body(&user_id, phone)).into_response()
}
