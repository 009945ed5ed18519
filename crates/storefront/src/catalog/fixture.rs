//! In-process catalog for unit tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use rocketshoes_core::{Price, ProductId};

use super::{CatalogError, Product, ProductCatalog, Stock, StockService};

/// Fixed product and stock tables with switchable failure.
#[derive(Default)]
pub struct FixtureCatalog {
    products: HashMap<ProductId, Product>,
    stock: Mutex<HashMap<ProductId, i64>>,
    offline: AtomicBool,
    product_calls: AtomicUsize,
}

impl FixtureCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a product priced in whole currency units with the given stock.
    pub fn with_product(mut self, id: i32, title: &str, price: i64, stock: i64) -> Self {
        let id = ProductId::new(id);
        self.products.insert(
            id,
            Product {
                id,
                title: title.to_string(),
                price: Price::from_cents(price * 100),
                image: format!("https://images.example.com/{id}.jpg"),
            },
        );
        self.set_stock(id.as_i32(), stock);
        self
    }

    pub fn set_stock(&self, id: i32, amount: i64) {
        if let Ok(mut stock) = self.stock.lock() {
            stock.insert(ProductId::new(id), amount);
        }
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn product_calls(&self) -> usize {
        self.product_calls.load(Ordering::SeqCst)
    }

    fn check_online(&self) -> Result<(), CatalogError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(CatalogError::Api {
                status: 503,
                message: "offline".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl ProductCatalog for FixtureCatalog {
    async fn product(&self, id: ProductId) -> Result<Product, CatalogError> {
        self.product_calls.fetch_add(1, Ordering::SeqCst);
        self.check_online()?;
        self.products
            .get(&id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(format!("/products/{id}")))
    }
}

#[async_trait]
impl StockService for FixtureCatalog {
    async fn stock(&self, id: ProductId) -> Result<Stock, CatalogError> {
        self.check_online()?;
        let amount = self
            .stock
            .lock()
            .ok()
            .and_then(|stock| stock.get(&id).copied())
            .ok_or_else(|| CatalogError::NotFound(format!("/stock/{id}")))?;
        Ok(Stock { id, amount })
    }
}
