//! Order submission and order history.

use souk_core::{NewOrder, Order, OrderFilter, UserId};
use tracing::{info, instrument};
use uuid::Uuid;

use super::ApiClient;
use crate::error::Result;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

impl ApiClient {
    /// Post an order to its store.
    ///
    /// Every call carries a fresh UUID v4 in [`REQUEST_ID_HEADER`] so the
    /// backend can correlate retries and logs.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the order or the request fails.
    #[instrument(
        skip(self, order),
        fields(
            store_id = %order.store_id,
            items = order.items.len(),
            request_id = tracing::field::Empty
        )
    )]
    pub async fn submit_order(&self, order: &NewOrder) -> Result<Order> {
        let url = self.endpoint(&["orders", "store", order.store_id.as_str()])?;

        let request_id = Uuid::new_v4().to_string();
        tracing::Span::current().record("request_id", request_id.as_str());

        let request = self
            .inner
            .client
            .post(url.clone())
            .header(REQUEST_ID_HEADER, &request_id)
            .json(order);

        let created: Order = self.send(request, &url).await?;
        info!(order_id = %created.id, total = %created.total_amount, "Order submitted");

        Ok(created)
    }

    /// Every order placed by `user_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn orders_for_user(&self, user_id: &UserId) -> Result<Vec<Order>> {
        let url = self.endpoint(&["orders", "user", user_id.as_str()])?;
        self.get_json(url).await
    }

    /// Orders placed by `user_id` that match `filter`.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn filtered_orders(
        &self,
        user_id: &UserId,
        filter: &OrderFilter,
    ) -> Result<Vec<Order>> {
        let orders = self.orders_for_user(user_id).await?;
        Ok(orders
            .into_iter()
            .filter(|order| filter.matches(order))
            .collect())
    }
}
