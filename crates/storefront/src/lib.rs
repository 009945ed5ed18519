//! RocketShoes Storefront library.
//!
//! Cart state with stock validation, the store API client, persistent cart
//! slots, and the JSON HTTP surface. Exposed as a library so the server, the
//! CLI and the integration tests share one implementation.
//!
//! # Modules
//!
//! - [`cart`] - `CartStore` (the cart and its only write path) and `CartProvider`
//! - [`catalog`] - Product and stock lookups
//! - [`storage`] - Durable key-value slots
//! - [`notify`] - User-facing notices
//! - [`routes`] - Axum handlers

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod middleware;
pub mod notify;
pub mod routes;
pub mod state;
pub mod storage;
