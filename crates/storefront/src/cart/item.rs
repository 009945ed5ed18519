//! Cart line items and their stored form.

use std::collections::HashSet;

use rocketshoes_core::{Price, ProductId, Quantity};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::Product;

/// One product in the cart.
///
/// Field names on the wire (`id`, `title`, `image`, `amount`) match the
/// storefront web client, which shares the same slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Product ID, unique within a cart.
    #[serde(rename = "id")]
    pub product_id: ProductId,
    /// Display name.
    #[serde(rename = "title")]
    pub name: String,
    /// Unit price.
    pub price: Price,
    /// Image URL.
    #[serde(rename = "image")]
    pub image_ref: String,
    /// Units in the cart, always at least one.
    #[serde(rename = "amount")]
    pub quantity: Quantity,
}

impl LineItem {
    /// A new line item with quantity one.
    ///
    /// The item is keyed by `product_id` (the ID that was looked up) rather
    /// than whatever ID the catalog echoed back.
    #[must_use]
    pub fn new(product_id: ProductId, product: Product) -> Self {
        Self {
            product_id,
            name: product.title,
            price: product.price,
            image_ref: product.image,
            quantity: Quantity::ONE,
        }
    }
}

/// Errors decoding a stored cart.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Blob is not a valid line item array.
    #[error("malformed cart: {0}")]
    Json(#[from] serde_json::Error),

    /// The same product appears twice.
    #[error("product {0} appears more than once")]
    DuplicateProduct(ProductId),
}

/// Serialize a cart for storage.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn encode(items: &[LineItem]) -> Result<String, serde_json::Error> {
    serde_json::to_string(items)
}

/// Decode a stored cart, enforcing one line item per product.
///
/// # Errors
///
/// Returns an error if the blob is malformed, holds a non-positive
/// quantity, or repeats a product.
pub fn decode(blob: &str) -> Result<Vec<LineItem>, DecodeError> {
    let items: Vec<LineItem> = serde_json::from_str(blob)?;

    let mut seen = HashSet::with_capacity(items.len());
    if let Some(dup) = items.iter().find(|item| !seen.insert(item.product_id)) {
        return Err(DecodeError::DuplicateProduct(dup.product_id));
    }

    Ok(items)
}
