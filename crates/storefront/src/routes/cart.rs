//! Cart route handlers.
//!
//! Each mutation locks the shared cart for its whole duration. Rejected
//! operations answer with the status for the failure and the unchanged cart
//! plus a notice; see [`AppError`].

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use rocketshoes_core::ProductId;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::cart::{AmountUpdate, CartAction, CartError, CartStore, UpdateProductAmount};
use crate::error::{AppError, CartResponse, Result, add_breadcrumb};
use crate::state::AppState;

/// Add/remove request body.
#[derive(Debug, Deserialize)]
pub struct ProductForm {
    pub product_id: ProductId,
}

/// Cart count badge body.
#[derive(Debug, Serialize)]
pub struct CartCount {
    pub count: usize,
}

fn snapshot(cart: &CartStore) -> CartResponse {
    CartResponse {
        cart: cart.items().to_vec(),
        notice: None,
    }
}

fn rejected(action: CartAction, error: CartError, cart: &CartStore) -> AppError {
    AppError::Cart {
        action,
        error,
        cart: cart.items().to_vec(),
    }
}

fn parse<T>(payload: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|e| AppError::BadRequest(e.body_text()))
}

/// Display the current cart.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Json<CartResponse> {
    Json(snapshot(&*state.cart().await))
}

/// Number of distinct products in the cart.
#[instrument(skip(state))]
pub async fn count(State(state): State<AppState>) -> Json<CartCount> {
    Json(CartCount {
        count: state.cart().await.items().len(),
    })
}

/// Add one unit of a product.
#[instrument(skip(state))]
pub async fn add(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ProductForm>, JsonRejection>,
) -> Result<Json<CartResponse>> {
    let form = parse(payload)?;
    let product_id = form.product_id.to_string();
    add_breadcrumb("cart", "Add to cart", Some(&[("product_id", product_id.as_str())]));

    let mut cart = state.cart().await;
    let result = cart.add_item(form.product_id).await;
    result.map_err(|error| rejected(CartAction::Add, error, &cart))?;

    Ok(Json(snapshot(&cart)))
}

/// Remove a product from the cart.
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ProductForm>, JsonRejection>,
) -> Result<Json<CartResponse>> {
    let form = parse(payload)?;
    let product_id = form.product_id.to_string();
    add_breadcrumb("cart", "Remove from cart", Some(&[("product_id", product_id.as_str())]));

    let mut cart = state.cart().await;
    let result = cart.remove_item(form.product_id);
    result.map_err(|error| rejected(CartAction::Remove, error, &cart))?;

    Ok(Json(snapshot(&cart)))
}

/// Set a product's quantity.
///
/// A non-positive amount answers 200 with the unchanged cart and no notice.
#[instrument(skip(state))]
pub async fn update(
    State(state): State<AppState>,
    payload: std::result::Result<Json<UpdateProductAmount>, JsonRejection>,
) -> Result<Json<CartResponse>> {
    let update = parse(payload)?;
    let product_id = update.product_id.to_string();
    let amount = update.amount.to_string();
    add_breadcrumb(
        "cart",
        "Update cart quantity",
        Some(&[("product_id", product_id.as_str()), ("amount", amount.as_str())]),
    );

    let mut cart = state.cart().await;
    let result = cart.update_quantity(update.product_id, update.amount).await;
    let outcome = result.map_err(|error| rejected(CartAction::UpdateAmount, error, &cart))?;

    if outcome == AmountUpdate::Ignored {
        tracing::debug!("Quantity update ignored");
    }

    Ok(Json(snapshot(&cart)))
}
