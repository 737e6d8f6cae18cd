//! Souk Core - Shared types and the cart reducer.
//!
//! This crate provides the types used across all Souk components:
//! - `client` - REST client for the catalog and order services
//! - `cli` - Command-line front-end for browsing and checkout
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no HTTP
//! clients, no async runtime. This keeps it lightweight and lets any
//! front-end (CLI, UI, tests) drive the same cart.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, prices, statuses, and phone numbers
//! - [`catalog`] - Stores, categories, and products as served by the backend
//! - [`cart`] - The in-memory cart of line items for the active store order
//! - [`order`] - Checkout totals and order payloads derived from a cart
//! - [`profile`] - The signed-in user's profile and phone number updates

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod order;
pub mod profile;
pub mod types;

pub use cart::{Cart, LineItem, ProductDescriptor};
pub use catalog::{Category, Product, Store, StoreLocation};
pub use order::{
    CheckoutSummary, Destination, Fees, NewOrder, NewOrderItem, Order, OrderError, OrderFilter,
    OrderItem,
};
pub use profile::{PhoneUpdate, Profile};
pub use types::*;
