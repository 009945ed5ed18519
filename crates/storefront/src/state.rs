//! Application state shared across handlers.

use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};

use crate::cart::{CartServices, CartStore};
use crate::catalog::{CatalogError, StoreApiClient};
use crate::config::StorefrontConfig;
use crate::storage::{FileStore, StorageError};

/// Error wiring up the cart from configuration.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("catalog client: {0}")]
    Catalog(#[from] CatalogError),
    #[error("cart storage: {0}")]
    Storage(#[from] StorageError),
}

/// Build the cart store described by `config`: the store API client for
/// products and stock, and the file-backed slot for persistence.
///
/// # Errors
///
/// Returns an error if the API client cannot be built or the stored cart
/// cannot be read.
pub fn open_cart_store(config: &StorefrontConfig) -> Result<CartStore, StartupError> {
    let api = Arc::new(StoreApiClient::new(&config.api)?);
    let storage = Arc::new(FileStore::open(&config.storage.dir)?);

    let services = CartServices {
        catalog: api.clone(),
        stock: api,
        storage,
    };

    Ok(CartStore::load(services, config.storage.key.clone())?)
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. The cart sits behind an async
/// mutex: a handler holds the lock for the whole operation, stock and catalog
/// lookups included, so concurrent requests cannot interleave between the
/// stock check and the write.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cart: Mutex<CartStore>,
}

impl AppState {
    /// Create a new application state around a loaded cart.
    #[must_use]
    pub fn new(cart: CartStore) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                cart: Mutex::new(cart),
            }),
        }
    }

    /// Lock the cart for one operation.
    pub async fn cart(&self) -> MutexGuard<'_, CartStore> {
        self.inner.cart.lock().await
    }
}
