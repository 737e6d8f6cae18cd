//! Checkout for one store: totals, order construction and submission.

use souk_core::{
    CheckoutSummary, Destination, Fees, NewOrder, Order, OrderError, OrderType, StoreId, UserId,
};
use tracing::instrument;

use crate::api::ApiClient;
use crate::cart_store::{CartStore, StoreSwitch};
use crate::error::{Result, add_breadcrumb};

/// A checkout in progress for one store and one signed-in user.
#[derive(Debug, Clone)]
pub struct CheckoutSession {
    api: ApiClient,
    cart: CartStore,
    store_id: StoreId,
    user_id: UserId,
    order_type: OrderType,
    fees: Fees,
}

impl CheckoutSession {
    /// Begin checkout for `store_id`.
    ///
    /// Items not added under `store_id` are dropped, so an order never mixes
    /// stores.
    #[must_use]
    pub fn new(api: ApiClient, cart: CartStore, store_id: StoreId, user_id: UserId) -> Self {
        cart.begin(store_id.clone(), StoreSwitch::Clear);
        Self {
            api,
            cart,
            store_id,
            user_id,
            order_type: OrderType::default(),
            fees: Fees::default(),
        }
    }

    /// Use `fees` instead of the zero default.
    #[must_use]
    pub const fn with_fees(mut self, fees: Fees) -> Self {
        self.fees = fees;
        self
    }

    pub const fn set_order_type(&mut self, order_type: OrderType) {
        self.order_type = order_type;
    }

    #[must_use]
    pub const fn order_type(&self) -> OrderType {
        self.order_type
    }

    #[must_use]
    pub const fn store_id(&self) -> &StoreId {
        &self.store_id
    }

    #[must_use]
    pub const fn cart(&self) -> &CartStore {
        &self.cart
    }

    /// Totals for the current cart contents.
    #[must_use]
    pub fn summary(&self) -> CheckoutSummary {
        self.cart
            .with_cart(|cart| CheckoutSummary::new(cart, self.order_type, &self.fees))
    }

    /// Build the order payload without sending it.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::EmptyCart`] if there is nothing to order.
    pub fn build_order(&self, destination: Destination) -> std::result::Result<NewOrder, OrderError> {
        self.cart.with_cart(|cart| {
            NewOrder::from_cart(
                cart,
                self.store_id.clone(),
                self.user_id.clone(),
                self.order_type,
                destination,
                &self.fees,
            )
        })
    }

    /// Submit the order and, once the backend accepts it, take the ordered
    /// units out of the cart.
    ///
    /// Items added while the request is in flight stay in the cart. On
    /// failure the cart is left untouched so the user can retry.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart is empty or the backend rejects the order.
    #[instrument(skip(self, destination), fields(store_id = %self.store_id, user_id = %self.user_id))]
    pub async fn submit(&self, destination: Destination) -> Result<Order> {
        let order = self.build_order(destination)?;
        add_breadcrumb(
            "checkout",
            "Submitting order",
            Some(&[("store_id", self.store_id.as_str())]),
        );

        match self.api.submit_order(&order).await {
            Ok(created) => {
                self.cart.settle(&order);
                tracing::info!(order_id = %created.id, "Checkout complete, ordered items removed");
                Ok(created)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Order submission failed, keeping cart");
                Err(e)
            }
        }
    }
}
