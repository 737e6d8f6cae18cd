//! Souk Client - REST access, the shared cart, and checkout.
//!
//! # Architecture
//!
//! - [`api`] - `reqwest` client for the catalog and order endpoints, with a
//!   `moka` cache in front of catalog listings
//! - [`cart_store`] - The session's single cart, shared between handles and
//!   observable through a `tokio::sync::watch` channel
//! - [`checkout`] - Turns the cart into an order and submits it
//! - [`config`] - Environment-based configuration
//! - [`error`] - `ApiError` and Sentry reporting helpers
//!
//! # Example
//!
//! ```rust,ignore
//! use souk_client::{ApiClient, CartStore, CheckoutSession, ClientConfig};
//!
//! let api = ApiClient::new(&ClientConfig::from_env()?)?;
//! let cart = CartStore::new();
//!
//! let session = CheckoutSession::new(api, cart.clone(), store_id, user_id);
//! cart.add_item(&(&product).into());
//! let order = session.submit(destination).await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cart_store;
pub mod checkout;
pub mod config;
pub mod error;

pub use api::{ApiClient, REQUEST_ID_HEADER};
pub use cart_store::{CartState, CartStore, StoreSwitch};
pub use checkout::CheckoutSession;
pub use config::{ClientConfig, ConfigError};
pub use error::{ApiError, Result};
