//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server-side failures to
//! Sentry before responding to the client. All route handlers return
//! `Result<T, AppError>`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::cart::{CartAction, CartError, LineItem};

/// Body returned by every cart endpoint.
#[derive(Debug, Serialize)]
pub struct CartResponse {
    /// Cart after the operation.
    pub cart: Vec<LineItem>,
    /// User-facing notice when the operation was rejected.
    pub notice: Option<&'static str>,
}

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// A cart operation was rejected. Carries the unchanged cart so the
    /// client can re-render without a second request.
    #[error("Cart error: {error}")]
    Cart {
        action: CartAction,
        error: CartError,
        cart: Vec<LineItem>,
    },

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Cart { error, .. } => match error {
                CartError::OutOfStock { .. } => StatusCode::CONFLICT,
                CartError::NotFound(_) => StatusCode::NOT_FOUND,
                CartError::Lookup(_) => StatusCode::BAD_GATEWAY,
                CartError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        match self {
            Self::Cart {
                action,
                error,
                cart,
            } => {
                // Capture server errors to Sentry
                if matches!(error, CartError::Lookup(_) | CartError::Storage(_)) {
                    let event_id = sentry::capture_error(&error);
                    tracing::error!(
                        error = %error,
                        sentry_event_id = %event_id,
                        "Cart operation failed"
                    );
                }

                let body = CartResponse {
                    cart,
                    notice: Some(error.notice(action)),
                };
                (status, Json(body)).into_response()
            }
            Self::BadRequest(message) => (status, message).into_response(),
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
