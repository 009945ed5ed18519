//! Product catalog and stock lookups.
//!
//! # Architecture
//!
//! - [`ProductCatalog`] resolves a product ID to its display attributes
//! - [`StockService`] reports how many units of a product are available
//! - [`StoreApiClient`] implements both over the store REST API
//!   (`GET /products/:id`, `GET /stock/:id`)
//!
//! Product attributes are cached via `moka`. Stock is never cached: it is
//! the value every cart quantity is validated against.

mod client;
#[cfg(test)]
pub(crate) mod fixture;

pub use client::StoreApiClient;

use async_trait::async_trait;
use rocketshoes_core::{Price, ProductId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when looking up products or stock.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by the API.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Endpoint URL could not be built.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Client could not be configured.
    #[error("Client configuration error: {0}")]
    Config(String),
}

/// A product as returned by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Product ID.
    pub id: ProductId,
    /// Display name.
    pub title: String,
    /// Unit price.
    pub price: Price,
    /// Image URL.
    pub image: String,
}

/// Available stock for a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stock {
    /// Product ID.
    pub id: ProductId,
    /// Units available.
    pub amount: i64,
}

/// Source of product attributes.
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    /// Fetch a product by ID.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if the ID is unknown, or another
    /// variant if the lookup itself failed.
    async fn product(&self, id: ProductId) -> Result<Product, CatalogError>;
}

/// Source of stock levels.
#[async_trait]
pub trait StockService: Send + Sync {
    /// Fetch the available stock for a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup failed.
    async fn stock(&self, id: ProductId) -> Result<Stock, CatalogError>;
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_error_display() {
        let err = CatalogError::NotFound("/products/9".to_string());
        assert_eq!(err.to_string(), "Not found: /products/9");

        let err = CatalogError::Api {
            status: 503,
            message: "maintenance".to_string(),
        };
        assert_eq!(err.to_string(), "API error: 503 - maintenance");
    }

    #[test]
    fn test_rate_limited_error() {
        let err = CatalogError::RateLimited(30);
        assert_eq!(err.to_string(), "Rate limited, retry after 30 seconds");
    }

    #[test]
    fn test_product_deserializes_api_shape() {
        let product: Product = serde_json::from_str(
            r#"{"id": 1, "title": "Tênis de Caminhada Leve Confortável", "price": 179.9, "image": "https://example.com/1.jpg"}"#,
        )
        .unwrap();
        assert_eq!(product.id, ProductId::new(1));
        assert_eq!(product.price, Price::from_cents(17990));
    }

    #[test]
    fn test_stock_deserializes_api_shape() {
        let stock: Stock = serde_json::from_str(r#"{"id": 2, "amount": 5}"#).unwrap();
        assert_eq!(stock.amount, 5);
    }
}
