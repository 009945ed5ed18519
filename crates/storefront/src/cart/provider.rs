//! Presentation-facing cart surface.

use std::sync::Arc;

use rocketshoes_core::ProductId;
use serde::Deserialize;

use super::{CartAction, CartError, CartStore, LineItem};
use crate::notify::Notifier;

/// Arguments for [`CartProvider::update_product_amount`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct UpdateProductAmount {
    pub product_id: ProductId,
    pub amount: i64,
}

/// Binds a [`CartStore`] to a [`Notifier`].
///
/// Operations never fail from the caller's point of view: a rejected
/// operation sends its notice and leaves the cart unchanged. Callers observe
/// the outcome by reading [`cart`](Self::cart) afterwards.
pub struct CartProvider {
    store: CartStore,
    notifier: Arc<dyn Notifier>,
}

impl CartProvider {
    #[must_use]
    pub fn new(store: CartStore, notifier: Arc<dyn Notifier>) -> Self {
        Self { store, notifier }
    }

    /// Current line items.
    #[must_use]
    pub fn cart(&self) -> &[LineItem] {
        self.store.items()
    }

    /// Add one unit of a product.
    pub async fn add_product(&mut self, product_id: ProductId) {
        let result = self.store.add_item(product_id).await;
        self.report(CartAction::Add, result);
    }

    /// Remove a product from the cart.
    pub fn remove_product(&mut self, product_id: ProductId) {
        let result = self.store.remove_item(product_id);
        self.report(CartAction::Remove, result);
    }

    /// Set a product's quantity.
    pub async fn update_product_amount(&mut self, update: UpdateProductAmount) {
        let result = self
            .store
            .update_quantity(update.product_id, update.amount)
            .await
            .map(|_| ());
        self.report(CartAction::UpdateAmount, result);
    }

    /// Give back the underlying store.
    #[must_use]
    pub fn into_store(self) -> CartStore {
        self.store
    }

    fn report(&self, action: CartAction, result: Result<(), CartError>) {
        if let Err(e) = result {
            self.notifier.error(e.notice(action));
        }
    }
}
