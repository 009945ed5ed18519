//! End-to-end cart flows against the stub store API.
//!
//! Each test gets its own stub server and its own temporary cart directory,
//! so tests run in parallel without sharing state.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use axum::{
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use rocketshoes_core::ProductId;
use rocketshoes_integration_tests::StubApi;
use rocketshoes_storefront::cart::{CartProvider, CartServices, CartStore, UpdateProductAmount, notices};
use rocketshoes_storefront::catalog::StoreApiClient;
use rocketshoes_storefront::notify::RecordingNotifier;
use rocketshoes_storefront::routes::app;
use rocketshoes_storefront::state::AppState;
use rocketshoes_storefront::storage::{FileStore, PersistentStore};
use serde_json::{Value, json};
use tempfile::TempDir;
use tokio::task::JoinSet;
use tower::ServiceExt;

const KEY: &str = "@RocketShoes:cart";

struct Shop {
    api: StubApi,
    dir: TempDir,
    notifier: Arc<RecordingNotifier>,
}

impl Shop {
    async fn open() -> Self {
        Self {
            api: StubApi::start().await.unwrap(),
            dir: TempDir::new().unwrap(),
            notifier: Arc::new(RecordingNotifier::new()),
        }
    }

    fn services(&self) -> CartServices {
        let client = Arc::new(StoreApiClient::new(&self.api.api_config()).unwrap());
        CartServices {
            catalog: client.clone(),
            stock: client,
            storage: Arc::new(FileStore::open(self.dir.path()).unwrap()),
        }
    }

    fn store(&self) -> CartStore {
        CartStore::load(self.services(), KEY).unwrap()
    }

    fn provider(&self) -> CartProvider {
        CartProvider::new(self.store(), self.notifier.clone())
    }

    fn stored_blob(&self) -> Option<String> {
        FileStore::open(self.dir.path()).unwrap().read(KEY).unwrap()
    }
}

fn quantities(provider: &CartProvider) -> Vec<(i32, u32)> {
    provider
        .cart()
        .iter()
        .map(|item| (item.product_id.as_i32(), item.quantity.get()))
        .collect()
}

#[tokio::test]
async fn test_add_new_product_uses_catalog_attributes() {
    let shop = Shop::open().await;
    let mut provider = shop.provider();

    provider.add_product(ProductId::new(2)).await;

    let item = provider.cart().first().unwrap();
    assert_eq!(item.name, "Tênis VR Caminhada Confortável");
    assert_eq!(item.price.to_string(), "$139.90");
    assert_eq!(item.image_ref, "https://img.example/2.jpg");
    assert_eq!(item.quantity.get(), 1);
    assert!(shop.notifier.messages().is_empty());
}

#[tokio::test]
async fn test_cart_survives_reload() {
    let shop = Shop::open().await;
    let mut provider = shop.provider();

    provider.add_product(ProductId::new(1)).await;
    provider.add_product(ProductId::new(3)).await;
    provider.add_product(ProductId::new(1)).await;

    let reloaded = shop.provider();
    assert_eq!(quantities(&reloaded), vec![(1, 2), (3, 1)]);
    assert_eq!(reloaded.cart(), provider.cart());
}

#[tokio::test]
async fn test_stored_blob_uses_web_client_field_names() {
    let shop = Shop::open().await;
    let mut provider = shop.provider();

    provider.add_product(ProductId::new(3)).await;

    let blob: Value = serde_json::from_str(&shop.stored_blob().unwrap()).unwrap();
    let item = &blob[0];
    assert_eq!(item["id"], 3);
    assert_eq!(item["title"], "Tênis Adidas Duramo Lite 2.0");
    assert_eq!(item["image"], "https://img.example/3.jpg");
    assert_eq!(item["amount"], 1);
}

#[tokio::test]
async fn test_increment_skips_catalog_lookup() {
    let shop = Shop::open().await;
    let mut provider = shop.provider();

    provider.add_product(ProductId::new(3)).await;
    provider.add_product(ProductId::new(3)).await;
    provider.add_product(ProductId::new(3)).await;

    assert_eq!(quantities(&provider), vec![(3, 3)]);
    assert_eq!(shop.api.product_hits(), 1);
}

#[tokio::test]
async fn test_add_beyond_stock_is_rejected() {
    let shop = Shop::open().await;
    let mut provider = shop.provider();

    provider.add_product(ProductId::new(2)).await;
    let before = shop.stored_blob();
    provider.add_product(ProductId::new(2)).await;

    assert_eq!(quantities(&provider), vec![(2, 1)]);
    assert_eq!(shop.notifier.messages(), vec![notices::OUT_OF_STOCK]);
    assert_eq!(shop.stored_blob(), before);
}

#[tokio::test]
async fn test_unknown_product_reports_add_failure() {
    let shop = Shop::open().await;
    shop.api.set_stock(42, 10);
    let mut provider = shop.provider();

    provider.add_product(ProductId::new(42)).await;

    assert!(provider.cart().is_empty());
    assert_eq!(shop.notifier.messages(), vec![notices::ADD_FAILED]);
    assert!(shop.stored_blob().is_none());
}

#[tokio::test]
async fn test_api_outage_leaves_cart_untouched() {
    let shop = Shop::open().await;
    let mut provider = shop.provider();
    provider.add_product(ProductId::new(1)).await;

    shop.api.set_offline(true);
    provider.add_product(ProductId::new(1)).await;
    provider
        .update_product_amount(UpdateProductAmount {
            product_id: ProductId::new(1),
            amount: 2,
        })
        .await;

    assert_eq!(quantities(&provider), vec![(1, 1)]);
    assert_eq!(
        shop.notifier.messages(),
        vec![notices::ADD_FAILED, notices::UPDATE_FAILED]
    );
}

#[tokio::test]
async fn test_update_respects_live_stock() {
    let shop = Shop::open().await;
    let mut provider = shop.provider();
    provider.add_product(ProductId::new(3)).await;

    provider
        .update_product_amount(UpdateProductAmount {
            product_id: ProductId::new(3),
            amount: 5,
        })
        .await;
    assert_eq!(quantities(&provider), vec![(3, 5)]);

    shop.api.set_stock(3, 2);
    provider
        .update_product_amount(UpdateProductAmount {
            product_id: ProductId::new(3),
            amount: 4,
        })
        .await;

    assert_eq!(quantities(&provider), vec![(3, 5)]);
    assert_eq!(shop.notifier.messages(), vec![notices::OUT_OF_STOCK]);
}

#[tokio::test]
async fn test_remove_then_remove_again() {
    let shop = Shop::open().await;
    let mut provider = shop.provider();
    provider.add_product(ProductId::new(1)).await;
    provider.add_product(ProductId::new(3)).await;

    provider.remove_product(ProductId::new(1));
    provider.remove_product(ProductId::new(1));

    assert_eq!(quantities(&provider), vec![(3, 1)]);
    assert_eq!(shop.notifier.messages(), vec![notices::REMOVE_FAILED]);
    assert_eq!(quantities(&shop.provider()), vec![(3, 1)]);
}

#[tokio::test]
async fn test_corrupt_slot_starts_empty_and_is_overwritten() {
    let shop = Shop::open().await;
    FileStore::open(shop.dir.path())
        .unwrap()
        .write(KEY, "{not json")
        .unwrap();

    let mut provider = shop.provider();
    assert!(provider.cart().is_empty());

    provider.add_product(ProductId::new(1)).await;
    assert_eq!(quantities(&shop.provider()), vec![(1, 1)]);
}

async fn post(app: &axum::Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_http_flow() {
    let shop = Shop::open().await;
    let app = app(AppState::new(shop.store()));

    let (status, _) = post(&app, "/cart/add", json!({"product_id": 2})).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = post(&app, "/cart/add", json!({"product_id": 2})).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["notice"], notices::OUT_OF_STOCK);
    assert_eq!(body["cart"][0]["amount"], 1);

    let (status, body) = post(&app, "/cart/remove", json!({"product_id": 2})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cart"], json!([]));

    shop.api.set_offline(true);
    let (status, body) = post(&app, "/cart/add", json!({"product_id": 1})).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["notice"], notices::ADD_FAILED);

    assert_eq!(shop.stored_blob().as_deref(), Some("[]"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_adds_never_exceed_stock() {
    const STOCK: i64 = 5;
    const EXTRA: usize = 3;

    let shop = Shop::open().await;
    shop.api.set_stock(3, STOCK);
    let app = app(AppState::new(shop.store()));

    let mut requests = JoinSet::new();
    for _ in 0..usize::try_from(STOCK).unwrap() + EXTRA {
        let app = app.clone();
        requests.spawn(async move { post(&app, "/cart/add", json!({"product_id": 3})).await });
    }

    let mut accepted = 0;
    let mut conflicts = 0;
    while let Some(joined) = requests.join_next().await {
        let (status, body) = joined.unwrap();
        match status {
            StatusCode::OK => accepted += 1,
            StatusCode::CONFLICT => {
                assert_eq!(body["notice"], notices::OUT_OF_STOCK);
                conflicts += 1;
            }
            other => panic!("unexpected status {other}"),
        }
    }

    assert_eq!(accepted, STOCK);
    assert_eq!(conflicts, EXTRA);

    let response = app
        .clone()
        .oneshot(Request::get("/cart").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["cart"][0]["amount"], STOCK);

    let stored: Value = serde_json::from_str(&shop.stored_blob().unwrap()).unwrap();
    assert_eq!(stored.as_array().unwrap().len(), 1);
    assert_eq!(stored[0]["amount"], STOCK);
    assert_eq!(shop.api.product_hits(), 1);
}
