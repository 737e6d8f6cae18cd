//! Shared, observable cart for the active store order.
//!
//! [`CartStore`] owns the single [`Cart`] of a session. Clones are handles to
//! the same cart, so every screen (or task) sees the same line items.
//!
//! Mutations go through `tokio::sync::watch`: `send_modify` holds the
//! channel's write lock for the whole read-modify-write, so concurrent
//! `add_item` calls on one product never lose an increment. Observers call
//! [`CartStore::subscribe`] and are woken after every change.

use std::sync::Arc;

use rust_decimal::Decimal;
use souk_core::{Cart, NewOrder, ProductDescriptor, ProductId, StoreId};
use tokio::sync::watch;

use crate::error::add_breadcrumb;

/// The cart together with the store it is being filled from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartState {
    /// Store the current session belongs to, if one has begun.
    pub store: Option<StoreId>,
    pub cart: Cart,
}

/// What to do with existing items when a session begins for another store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreSwitch {
    /// Keep the items; the cart may then mix stores.
    Keep,
    /// Empty the cart before switching.
    #[default]
    Clear,
}

/// Cloneable handle to the session's cart.
#[derive(Debug, Clone)]
pub struct CartStore {
    tx: Arc<watch::Sender<CartState>>,
}

impl Default for CartStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CartStore {
    /// Create a store holding an empty cart with no active store.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(CartState::default());
        Self { tx: Arc::new(tx) }
    }

    /// Start (or continue) a session for `store`.
    ///
    /// With [`StoreSwitch::Clear`], items are dropped whenever they were not
    /// added under `store`, including items added before any session began.
    ///
    /// Returns `true` if existing items were dropped because of `switch`.
    pub fn begin(&self, store: StoreId, switch: StoreSwitch) -> bool {
        let mut cleared = false;
        self.tx.send_if_modified(|state| {
            if state.store.as_ref() == Some(&store) {
                return false;
            }

            if switch == StoreSwitch::Clear && !state.cart.is_empty() {
                tracing::info!(
                    from = ?state.store,
                    to = %store,
                    dropped = state.cart.total_item_count(),
                    "Switching store, clearing cart"
                );
                state.cart.clear();
                cleared = true;
            }
            state.store = Some(store);
            true
        });
        cleared
    }

    /// Add one unit of `product`.
    pub fn add_item(&self, product: &ProductDescriptor) {
        self.tx.send_modify(|state| state.cart.add_item(product));
        tracing::debug!(product_id = %product.id, "Added item to cart");
        add_breadcrumb(
            "cart",
            "Added item",
            Some(&[("product_id", product.id.as_str())]),
        );
    }

    /// Remove one unit of `product_id`; a no-op if it is not in the cart.
    ///
    /// Observers are only notified when the cart actually changed.
    pub fn remove_item(&self, product_id: &ProductId) {
        let changed = self.tx.send_if_modified(|state| {
            let before = state.cart.quantity_of(product_id);
            state.cart.remove_item(product_id);
            state.cart.quantity_of(product_id) != before
        });

        if changed {
            tracing::debug!(product_id = %product_id, "Removed item from cart");
            add_breadcrumb(
                "cart",
                "Removed item",
                Some(&[("product_id", product_id.as_str())]),
            );
        }
    }

    /// Remove the units `order` was placed for.
    ///
    /// Only the submitted quantities are taken out, so items added while the
    /// order was in flight stay in the cart. Nothing happens if the session
    /// has moved to another store since.
    pub fn settle(&self, order: &NewOrder) {
        let mut removed = 0_u64;
        self.tx.send_if_modified(|state| {
            if state.store.as_ref() != Some(&order.store_id) {
                return false;
            }
            for item in &order.items {
                removed += u64::from(state.cart.remove_units(&item.variant_id, item.quantity));
            }
            removed > 0
        });

        if removed > 0 {
            tracing::debug!(store_id = %order.store_id, removed, "Settled ordered items");
            add_breadcrumb(
                "cart",
                "Settled order",
                Some(&[("store_id", order.store_id.as_str())]),
            );
        }
    }

    /// Empty the cart. The active store is kept.
    pub fn clear(&self) {
        let changed = self.tx.send_if_modified(|state| {
            let had_items = !state.cart.is_empty();
            state.cart.clear();
            had_items
        });

        if changed {
            tracing::debug!("Cleared cart");
            add_breadcrumb("cart", "Cleared cart", None);
        }
    }

    /// End the session: empty the cart and forget the store.
    pub fn reset(&self) {
        self.tx.send_replace(CartState::default());
    }

    #[must_use]
    pub fn total_price(&self) -> Decimal {
        self.tx.borrow().cart.total_price()
    }

    #[must_use]
    pub fn total_item_count(&self) -> u64 {
        self.tx.borrow().cart.total_item_count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tx.borrow().cart.is_empty()
    }

    /// Store of the current session.
    #[must_use]
    pub fn store(&self) -> Option<StoreId> {
        self.tx.borrow().store.clone()
    }

    /// Owned copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> CartState {
        self.tx.borrow().clone()
    }

    /// Read the cart without copying it.
    ///
    /// Mutations wait until `f` returns, so keep it short.
    pub fn with_cart<R>(&self, f: impl FnOnce(&Cart) -> R) -> R {
        f(&self.tx.borrow().cart)
    }

    /// Receiver notified after every change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CartState> {
        self.tx.subscribe()
    }
}
