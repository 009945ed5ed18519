//! Cart commands.

use std::sync::Arc;

use rocketshoes_core::ProductId;
use rocketshoes_storefront::cart::{CartProvider, LineItem, UpdateProductAmount};
use rocketshoes_storefront::config::StorefrontConfig;
use rocketshoes_storefront::notify::TracingNotifier;
use rocketshoes_storefront::state::open_cart_store;
use tracing::info;

/// Open the persisted cart described by the environment.
///
/// # Errors
///
/// Returns an error if configuration is missing or the cart cannot be loaded.
pub fn open() -> Result<CartProvider, Box<dyn std::error::Error>> {
    let config = StorefrontConfig::from_env()?;
    let store = open_cart_store(&config)?;
    info!(
        slot = %store.key(),
        dir = %config.storage.dir.display(),
        "Opened cart"
    );
    Ok(CartProvider::new(store, Arc::new(TracingNotifier)))
}

/// Set a product's quantity.
pub async fn update(provider: &mut CartProvider, product_id: ProductId, amount: i64) {
    provider
        .update_product_amount(UpdateProductAmount { product_id, amount })
        .await;
}

/// Print the number of distinct products.
pub fn count(provider: &CartProvider) {
    #[allow(clippy::print_stdout)]
    {
        println!("{}", provider.cart().len());
    }
}

/// Print every line item.
pub fn show(provider: &CartProvider) {
    #[allow(clippy::print_stdout)]
    for line in listing(provider.cart()) {
        println!("{line}");
    }
}

/// Lines printed by `cart show`.
fn listing(cart: &[LineItem]) -> Vec<String> {
    if cart.is_empty() {
        return vec!["Cart is empty".to_string()];
    }
    cart.iter().map(describe).collect()
}

/// One-line summary of a line item.
fn describe(item: &LineItem) -> String {
    format!(
        "#{:<5} {:<40} x{:<4} {}",
        item.product_id, item.name, item.quantity, item.price
    )
}
