//! Integration tests for RocketShoes.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p rocketshoes-integration-tests
//! ```
//!
//! The tests drive the real [`StoreApiClient`] and [`FileStore`] against a
//! [`StubApi`]: a small axum server on an ephemeral local port that answers
//! `GET /products/{id}` and `GET /stock/{id}` the way the store API does.
//! Nothing external is required.
//!
//! [`StoreApiClient`]: rocketshoes_storefront::catalog::StoreApiClient
//! [`FileStore`]: rocketshoes_storefront::storage::FileStore

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use rocketshoes_storefront::config::StoreApiConfig;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use url::Url;

/// Products every stub starts with: `(id, title, price, image, stock)`.
pub const SEED_PRODUCTS: [(i32, &str, f64, &str, i64); 3] = [
    (1, "Tênis de Caminhada Leve Confortável", 179.9, "https://img.example/1.jpg", 3),
    (2, "Tênis VR Caminhada Confortável", 139.9, "https://img.example/2.jpg", 1),
    (3, "Tênis Adidas Duramo Lite 2.0", 219.9, "https://img.example/3.jpg", 5),
];

#[derive(Default)]
struct StubData {
    products: HashMap<i32, Value>,
    stock: Mutex<HashMap<i32, i64>>,
    offline: AtomicBool,
    product_hits: AtomicUsize,
}

impl StubData {
    fn seeded() -> Self {
        let mut products = HashMap::new();
        let mut stock = HashMap::new();
        for (id, title, price, image, amount) in SEED_PRODUCTS {
            products.insert(
                id,
                json!({"id": id, "title": title, "price": price, "image": image}),
            );
            stock.insert(id, amount);
        }

        Self {
            products,
            stock: Mutex::new(stock),
            ..Self::default()
        }
    }
}

/// A running stand-in for the store API.
///
/// The server task is aborted when the stub is dropped.
pub struct StubApi {
    addr: SocketAddr,
    data: Arc<StubData>,
    server: JoinHandle<()>,
}

impl StubApi {
    /// Bind to an ephemeral port and start serving the seed products.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot be bound.
    pub async fn start() -> std::io::Result<Self> {
        let data = Arc::new(StubData::seeded());
        let app = Router::new()
            .route("/products/{id}", get(product))
            .route("/stock/{id}", get(stock))
            .with_state(data.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let server = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self { addr, data, server })
    }

    /// Base URL of the stub, ending in `/`.
    ///
    /// # Panics
    ///
    /// Never in practice: the address is always a valid host and port.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn base_url(&self) -> Url {
        Url::parse(&format!("http://{}/", self.addr)).expect("socket address forms a valid URL")
    }

    /// Client configuration pointing at this stub.
    #[must_use]
    pub fn api_config(&self) -> StoreApiConfig {
        StoreApiConfig {
            base_url: self.base_url(),
            token: None,
            cache_ttl: Duration::from_secs(60),
        }
    }

    /// Change the stock reported for a product.
    pub fn set_stock(&self, id: i32, amount: i64) {
        if let Ok(mut stock) = self.data.stock.lock() {
            stock.insert(id, amount);
        }
    }

    /// Answer every request with `503` while offline.
    pub fn set_offline(&self, offline: bool) {
        self.data.offline.store(offline, Ordering::SeqCst);
    }

    /// Number of product lookups served so far.
    #[must_use]
    pub fn product_hits(&self) -> usize {
        self.data.product_hits.load(Ordering::SeqCst)
    }
}

impl Drop for StubApi {
    fn drop(&mut self) {
        self.server.abort();
    }
}

fn unavailable() -> Response {
    (StatusCode::SERVICE_UNAVAILABLE, "stub offline").into_response()
}

async fn product(State(data): State<Arc<StubData>>, Path(id): Path<i32>) -> Response {
    if data.offline.load(Ordering::SeqCst) {
        return unavailable();
    }
    data.product_hits.fetch_add(1, Ordering::SeqCst);

    data.products.get(&id).map_or_else(
        || StatusCode::NOT_FOUND.into_response(),
        |product| Json(product.clone()).into_response(),
    )
}

async fn stock(State(data): State<Arc<StubData>>, Path(id): Path<i32>) -> Response {
    if data.offline.load(Ordering::SeqCst) {
        return unavailable();
    }

    let amount = data
        .stock
        .lock()
        .ok()
        .and_then(|stock| stock.get(&id).copied());

    amount.map_or_else(
        || StatusCode::NOT_FOUND.into_response(),
        |amount| Json(json!({"id": id, "amount": amount})).into_response(),
    )
}
