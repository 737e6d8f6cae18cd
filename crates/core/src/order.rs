//! Checkout totals and order payloads.
//!
//! The cart does not know how orders are submitted. Checkout reads the line
//! items and [`Cart::total_price`] and turns them into a [`NewOrder`], which
//! the order service posts to the backend. Orders coming back from the
//! backend are [`Order`]s.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cart::{Cart, LineItem};
use crate::types::{OrderId, OrderItemId, OrderStatus, OrderType, ProductId, StoreId, UserId};

/// Errors building an order from a cart.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OrderError {
    /// There is nothing to order.
    #[error("cannot place an order from an empty cart")]
    EmptyCart,
}

/// Fees added on top of the products total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fees {
    /// Charged for delivery orders only.
    pub delivery: Decimal,
    /// Charged on every order.
    pub service: Decimal,
}

/// Totals shown on the checkout screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSummary {
    pub order_type: OrderType,
    /// Number of distinct products.
    pub product_count: usize,
    pub products_total: Decimal,
    /// Zero for pickup orders.
    pub delivery_fee: Decimal,
    pub service_fee: Decimal,
    pub total: Decimal,
}

impl CheckoutSummary {
    /// Compute checkout totals for `cart`.
    #[must_use]
    pub fn new(cart: &Cart, order_type: OrderType, fees: &Fees) -> Self {
        let products_total = cart.total_price();
        let delivery_fee = match order_type {
            OrderType::Delivery => fees.delivery,
            OrderType::Pickup => Decimal::ZERO,
        };

        Self {
            order_type,
            product_count: cart.len(),
            products_total,
            delivery_fee,
            service_fee: fees.service,
            total: products_total + delivery_fee + fees.service,
        }
    }
}

/// Drop-off point for an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Destination {
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// One line of a submitted order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrderItem {
    /// The product id; the backend calls sellable units variants.
    pub variant_id: ProductId,
    pub quantity: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
}

impl From<&LineItem> for NewOrderItem {
    fn from(item: &LineItem) -> Self {
        Self {
            variant_id: item.id().clone(),
            quantity: item.quantity(),
            total_amount: item.line_total(),
        }
    }
}

/// Payload posted to `POST /orders/store/{storeId}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub store_id: StoreId,
    pub user_id: UserId,
    pub order_type: OrderType,
    pub destination: String,
    pub latitude: f64,
    pub longitude: f64,
    pub status: OrderStatus,
    pub items: Vec<NewOrderItem>,
    /// Grand total including fees.
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
}

impl NewOrder {
    /// Build the submission payload for the current cart contents.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::EmptyCart`] if the cart has no line items.
    pub fn from_cart(
        cart: &Cart,
        store_id: StoreId,
        user_id: UserId,
        order_type: OrderType,
        destination: Destination,
        fees: &Fees,
    ) -> Result<Self, OrderError> {
        if cart.is_empty() {
            return Err(OrderError::EmptyCart);
        }

        let summary = CheckoutSummary::new(cart, order_type, fees);

        Ok(Self {
            store_id,
            user_id,
            order_type,
            destination: destination.address,
            latitude: destination.latitude,
            longitude: destination.longitude,
            status: OrderStatus::Pending,
            items: cart.items().iter().map(NewOrderItem::from).collect(),
            total_amount: summary.total,
        })
    }
}

/// Product details embedded in an order line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderVariant {
    #[serde(default)]
    pub id: Option<ProductId>,
    pub name: String,
}

/// One line of an order returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: OrderItemId,
    #[serde(default)]
    pub name: Option<String>,
    pub quantity: u32,
    pub total_amount: Decimal,
    #[serde(default)]
    pub variant: Option<OrderVariant>,
}

impl OrderItem {
    /// Best available display name for the line.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.variant
            .as_ref()
            .map(|v| v.name.as_str())
            .or(self.name.as_deref())
            .unwrap_or("")
    }
}

/// Store summary embedded in an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStore {
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
}

/// An order as stored by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    pub total_amount: Decimal,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub destination: Option<String>,
    pub store_id: StoreId,
    pub user_id: UserId,
    pub order_type: OrderType,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub order_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub store: Option<OrderStore>,
}

/// Which orders the order history shows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OrderFilter {
    #[default]
    All,
    Status(OrderStatus),
}

impl OrderFilter {
    #[must_use]
    pub fn matches(&self, order: &Order) -> bool {
        match self {
            Self::All => true,
            Self::Status(status) => status.as_str().eq_ignore_ascii_case(order.status.as_str()),
        }
    }

    /// Keep the orders matching this filter, preserving order.
    #[must_use]
    pub fn apply<'a>(&self, orders: &'a [Order]) -> Vec<&'a Order> {
        orders.iter().filter(|order| self.matches(order)).collect()
    }
}

impl std::str::FromStr for OrderFilter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            Ok(Self::All)
        } else {
            Ok(Self::Status(OrderStatus::from(s.to_owned())))
        }
    }
}
