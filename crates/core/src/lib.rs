//! RocketShoes Core - Shared types library.
//!
//! This crate provides the types shared by every RocketShoes component:
//! - `storefront` - Cart state, catalog client and the HTTP surface
//! - `cli` - Command-line cart management
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no storage.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for product IDs, prices and quantities

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
