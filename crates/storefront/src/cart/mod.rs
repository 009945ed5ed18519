//! Cart state.
//!
//! [`CartStore`] owns the ordered list of line items. Every mutation is
//! checked against live stock, written to the persistent slot in full, and
//! only then applied in memory, so a failed operation always leaves the cart
//! exactly as it was.
//!
//! Mutations take `&mut self`; callers sharing a store across tasks wrap it in
//! a `tokio::sync::Mutex` so each operation runs to completion, lookups
//! included, before the next one reads the cart.
//!
//! [`CartProvider`] is the surface the presentation layer binds to. It turns
//! failures into user notices instead of returning them.

mod item;
mod provider;

pub use item::{DecodeError, LineItem, decode, encode};
pub use provider::{CartProvider, UpdateProductAmount};

use std::sync::Arc;

use rocketshoes_core::{ProductId, Quantity};
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::catalog::{CatalogError, ProductCatalog, StockService};
use crate::storage::{PersistentStore, StorageError};

/// User-facing notice texts.
pub mod notices {
    /// Requested quantity exceeds available stock.
    pub const OUT_OF_STOCK: &str = "Requested quantity unavailable";

    /// Adding a product failed for any other reason.
    pub const ADD_FAILED: &str = "Error adding product";

    /// Removing a product failed.
    pub const REMOVE_FAILED: &str = "Error removing product";

    /// Changing a quantity failed for any other reason.
    pub const UPDATE_FAILED: &str = "Error changing product quantity";
}

/// Cart operations, used to pick the notice for a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartAction {
    Add,
    Remove,
    UpdateAmount,
}

impl CartAction {
    /// Generic failure notice for this action.
    #[must_use]
    pub const fn failure_notice(self) -> &'static str {
        match self {
            Self::Add => notices::ADD_FAILED,
            Self::Remove => notices::REMOVE_FAILED,
            Self::UpdateAmount => notices::UPDATE_FAILED,
        }
    }
}

/// Why a cart operation was rejected.
#[derive(Debug, Error)]
pub enum CartError {
    /// Requested quantity exceeds available stock.
    #[error("product {product_id}: requested {requested}, only {available} in stock")]
    OutOfStock {
        product_id: ProductId,
        requested: i64,
        available: i64,
    },

    /// The product is not in the cart.
    #[error("product {0} is not in the cart")]
    NotFound(ProductId),

    /// Catalog or stock lookup failed.
    #[error("lookup failed: {0}")]
    Lookup(#[from] CatalogError),

    /// The cart could not be persisted.
    #[error("failed to persist cart: {0}")]
    Storage(#[from] StorageError),
}

impl CartError {
    /// Notice shown to the user when `action` fails with this error.
    #[must_use]
    pub const fn notice(&self, action: CartAction) -> &'static str {
        match self {
            Self::OutOfStock { .. } => notices::OUT_OF_STOCK,
            _ => action.failure_notice(),
        }
    }
}

/// Result of a quantity update that was not rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountUpdate {
    /// The quantity was set and the cart persisted.
    Applied,
    /// Nothing to do: the amount was not positive or the product is not in
    /// the cart.
    Ignored,
}

/// Collaborators a [`CartStore`] works against.
#[derive(Clone)]
pub struct CartServices {
    pub catalog: Arc<dyn ProductCatalog>,
    pub stock: Arc<dyn StockService>,
    pub storage: Arc<dyn PersistentStore>,
}

/// The cart and the only write path into it.
pub struct CartStore {
    items: Vec<LineItem>,
    key: String,
    services: CartServices,
}

impl CartStore {
    /// Load the cart from the slot at `key`.
    ///
    /// An empty slot gives an empty cart. A slot that cannot be decoded is
    /// logged and treated as empty; the next successful mutation overwrites
    /// it.
    ///
    /// # Errors
    ///
    /// Returns an error if the slot exists but could not be read.
    pub fn load(services: CartServices, key: impl Into<String>) -> Result<Self, StorageError> {
        let key = key.into();

        let items = match services.storage.read(&key)? {
            None => Vec::new(),
            Some(blob) => decode(&blob).unwrap_or_else(|e| {
                warn!(key = %key, error = %e, "Discarding unreadable stored cart");
                Vec::new()
            }),
        };

        info!(key = %key, items = items.len(), "Cart loaded");

        Ok(Self {
            items,
            key,
            services,
        })
    }

    /// Current line items, in insertion order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Slot key the cart is persisted under.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The line item for `product_id`, if present.
    #[must_use]
    pub fn get(&self, product_id: ProductId) -> Option<&LineItem> {
        self.items.iter().find(|item| item.product_id == product_id)
    }

    fn position(&self, product_id: ProductId) -> Option<usize> {
        self.items
            .iter()
            .position(|item| item.product_id == product_id)
    }

    /// Add one unit of a product.
    ///
    /// Appends a new line item (attributes from the catalog) or increments
    /// the existing one in place.
    ///
    /// # Errors
    ///
    /// - [`CartError::OutOfStock`] if stock cannot cover one more unit
    /// - [`CartError::Lookup`] if the stock or catalog lookup failed
    /// - [`CartError::Storage`] if the cart could not be persisted
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn add_item(&mut self, product_id: ProductId) -> Result<(), CartError> {
        let position = self.position(product_id);
        let current = position
            .and_then(|i| self.items.get(i))
            .map_or(0, |item| i64::from(item.quantity));

        let stock = self.services.stock.stock(product_id).await?;
        let requested = current + 1;

        let out_of_stock = CartError::OutOfStock {
            product_id,
            requested,
            available: stock.amount,
        };

        if stock.amount < requested {
            warn!(requested, available = stock.amount, "Add rejected: out of stock");
            return Err(out_of_stock);
        }

        let mut next = self.items.clone();
        match position.and_then(|i| next.get_mut(i)) {
            Some(item) => {
                item.quantity = item.quantity.incremented().ok_or(out_of_stock)?;
            }
            None => {
                let product = self.services.catalog.product(product_id).await?;
                next.push(LineItem::new(product_id, product));
            }
        }

        self.commit(next)?;
        info!(quantity = requested, "Product added to cart");
        Ok(())
    }

    /// Remove a product's line item.
    ///
    /// # Errors
    ///
    /// - [`CartError::NotFound`] if the product is not in the cart
    /// - [`CartError::Storage`] if the cart could not be persisted
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub fn remove_item(&mut self, product_id: ProductId) -> Result<(), CartError> {
        if self.position(product_id).is_none() {
            warn!("Remove rejected: not in cart");
            return Err(CartError::NotFound(product_id));
        }

        let next = self
            .items
            .iter()
            .filter(|item| item.product_id != product_id)
            .cloned()
            .collect();

        self.commit(next)?;
        info!("Product removed from cart");
        Ok(())
    }

    /// Set a product's quantity to `amount`.
    ///
    /// A non-positive `amount` is ignored without any lookup. A product that
    /// is not in the cart is also ignored, after the stock check.
    ///
    /// # Errors
    ///
    /// - [`CartError::OutOfStock`] if `amount` exceeds available stock
    /// - [`CartError::Lookup`] if the stock lookup failed
    /// - [`CartError::Storage`] if the cart could not be persisted
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn update_quantity(
        &mut self,
        product_id: ProductId,
        amount: i64,
    ) -> Result<AmountUpdate, CartError> {
        if amount <= 0 {
            return Ok(AmountUpdate::Ignored);
        }

        let stock = self.services.stock.stock(product_id).await?;
        let out_of_stock = CartError::OutOfStock {
            product_id,
            requested: amount,
            available: stock.amount,
        };

        if amount > stock.amount {
            warn!(amount, available = stock.amount, "Update rejected: out of stock");
            return Err(out_of_stock);
        }
        let quantity = Quantity::try_from(amount).map_err(|_| out_of_stock)?;

        let Some(position) = self.position(product_id) else {
            warn!("Update ignored: not in cart");
            return Ok(AmountUpdate::Ignored);
        };

        let mut next = self.items.clone();
        if let Some(item) = next.get_mut(position) {
            item.quantity = quantity;
        }

        self.commit(next)?;
        info!(amount, "Cart quantity updated");
        Ok(AmountUpdate::Applied)
    }

    /// Persist `next` and make it the current cart.
    fn commit(&mut self, next: Vec<LineItem>) -> Result<(), StorageError> {
        let blob = encode(&next).map_err(|e| StorageError::Unavailable(e.to_string()))?;

        if let Err(e) = self.services.storage.write(&self.key, &blob) {
            tracing::error!(key = %self.key, error = %e, "Failed to persist cart");
            return Err(e);
        }

        self.items = next;
        Ok(())
    }
}
