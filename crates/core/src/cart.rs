//! The shopping cart for the active store order.
//!
//! A [`Cart`] is an insertion-ordered list of [`LineItem`]s keyed by product
//! id. It is a plain reducer: every operation is a total function over the
//! current state, nothing here performs I/O or can fail.
//!
//! # Invariants
//!
//! - No two line items share a product id.
//! - Every line item has `quantity >= 1`. Removing the last unit deletes the
//!   entry instead of leaving a zero-quantity line behind.
//!
//! Both invariants are upheld because the item list is private and can only
//! change through [`Cart::add_item`], [`Cart::remove_item`] and
//! [`Cart::clear`].
//!
//! # Example
//!
//! ```
//! use rust_decimal::Decimal;
//! use souk_core::{Cart, ProductDescriptor};
//!
//! let apples = ProductDescriptor::new("A", "Apples", Decimal::new(2_500, 3), "apples.png");
//! let bread = ProductDescriptor::new("B", "Bread", Decimal::new(1_000, 3), "bread.png");
//!
//! let mut cart = Cart::new();
//! cart.add_item(&apples);
//! cart.add_item(&apples);
//! cart.add_item(&bread);
//!
//! assert_eq!(cart.len(), 2);
//! assert_eq!(cart.total_item_count(), 3);
//! assert_eq!(cart.total_price(), Decimal::new(6_000, 3));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::ProductId;

/// What the catalog hands to the cart when a product is added.
///
/// Carries no quantity: each [`Cart::add_item`] call adds exactly one unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDescriptor {
    pub id: ProductId,
    pub name: String,
    pub unit_price: Decimal,
    pub image: String,
}

impl ProductDescriptor {
    /// Create a descriptor from its parts.
    #[must_use]
    pub fn new(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        unit_price: Decimal,
        image: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            unit_price,
            image: image.into(),
        }
    }
}

/// One product entry in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    id: ProductId,
    name: String,
    unit_price: Decimal,
    image: String,
    quantity: u32,
}

impl LineItem {
    fn first_unit(product: &ProductDescriptor) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            unit_price: product.unit_price,
            image: product.image.clone(),
            quantity: 1,
        }
    }

    /// Product id, unique within the cart.
    #[must_use]
    pub const fn id(&self) -> &ProductId {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Price of a single unit.
    #[must_use]
    pub const fn unit_price(&self) -> Decimal {
        self.unit_price
    }

    #[must_use]
    pub fn image(&self) -> &str {
        &self.image
    }

    /// Number of units, always at least 1.
    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    /// `unit_price * quantity`.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// The in-progress order's line items.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Add one unit of `product`.
    ///
    /// Increments the quantity of an existing line with the same id, or
    /// appends a new line with quantity 1. The name, price and image of an
    /// existing line are left as they were when it was first added.
    ///
    /// A line already holding `u32::MAX` units stays at `u32::MAX`.
    pub fn add_item(&mut self, product: &ProductDescriptor) {
        match self.position(&product.id) {
            Some(index) => {
                if let Some(item) = self.items.get_mut(index) {
                    item.quantity = item.quantity.saturating_add(1);
                }
            }
            None => self.items.push(LineItem::first_unit(product)),
        }
    }

    /// Remove one unit of the product with id `product_id`.
    ///
    /// A line with one unit left is deleted. Removing a product that is not
    /// in the cart does nothing.
    pub fn remove_item(&mut self, product_id: &ProductId) {
        let Some(index) = self.position(product_id) else {
            return;
        };

        let remove_line = match self.items.get_mut(index) {
            Some(item) if item.quantity > 1 => {
                item.quantity -= 1;
                false
            }
            Some(_) => true,
            None => false,
        };

        if remove_line {
            self.items.remove(index);
        }
    }

    /// Remove up to `units` units of `product_id`, deleting the line if none
    /// are left.
    ///
    /// Returns how many units were actually removed.
    pub fn remove_units(&mut self, product_id: &ProductId, units: u32) -> u32 {
        let Some(index) = self.position(product_id) else {
            return 0;
        };

        let (removed, remove_line) = match self.items.get_mut(index) {
            Some(item) if item.quantity > units => {
                item.quantity -= units;
                (units, false)
            }
            Some(item) => (item.quantity, true),
            None => (0, false),
        };

        if remove_line {
            self.items.remove(index);
        }
        removed
    }

    /// Remove every line item.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Sum of `unit_price * quantity` over all lines.
    ///
    /// Recomputed on every call.
    #[must_use]
    pub fn total_price(&self) -> Decimal {
        self.items.iter().map(LineItem::line_total).sum()
    }

    /// Sum of quantities over all lines (badge count).
    #[must_use]
    pub fn total_item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Line items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Look up the line for `product_id`.
    #[must_use]
    pub fn get(&self, product_id: &ProductId) -> Option<&LineItem> {
        self.items.iter().find(|item| &item.id == product_id)
    }

    /// Quantity of `product_id` in the cart, 0 when absent.
    #[must_use]
    pub fn quantity_of(&self, product_id: &ProductId) -> u32 {
        self.get(product_id).map_or(0, LineItem::quantity)
    }

    /// Number of distinct products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn position(&self, product_id: &ProductId) -> Option<usize> {
        self.items.iter().position(|item| &item.id == product_id)
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a LineItem;
    type IntoIter = std::slice::Iter<'a, LineItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product(id: &str, price: Decimal) -> ProductDescriptor {
        ProductDescriptor::new(id, format!("Product {id}"), price, format!("{id}.png"))
    }

    fn apples() -> ProductDescriptor {
        product("A", Decimal::new(2_500, 3))
    }

    fn bread() -> ProductDescriptor {
        product("B", Decimal::new(1_000, 3))
    }

    fn id(s: &str) -> ProductId {
        ProductId::new(s)
    }

    #[test]
    fn test_new_cart_is_empty() {
        let cart = Cart::new();
        assert!(cart.is_empty());
        assert_eq!(cart.total_price(), Decimal::ZERO);
        assert_eq!(cart.total_item_count(), 0);
    }

    #[test]
    fn test_add_new_product_has_quantity_one() {
        let mut cart = Cart::new();
        cart.add_item(&apples());

        let line = cart.get(&id("A")).unwrap();
        assert_eq!(line.quantity(), 1);
        assert_eq!(line.name(), "Product A");
        assert_eq!(line.image(), "A.png");
    }

    #[test]
    fn test_add_existing_product_increments_without_new_entry() {
        let mut cart = Cart::new();
        cart.add_item(&apples());
        cart.add_item(&apples());

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.quantity_of(&id("A")), 2);
    }

    #[test]
    fn test_add_keeps_first_seen_details() {
        let mut cart = Cart::new();
        cart.add_item(&apples());
        cart.add_item(&product("A", Decimal::new(9, 0)));

        assert_eq!(cart.get(&id("A")).unwrap().unit_price(), Decimal::new(2_500, 3));
        assert_eq!(cart.total_price(), Decimal::new(5_000, 3));
    }

    #[test]
    fn test_insertion_order_is_preserved() {
        let mut cart = Cart::new();
        cart.add_item(&bread());
        cart.add_item(&apples());
        cart.add_item(&bread());

        let ids: Vec<&str> = cart.items().iter().map(|i| i.id().as_str()).collect();
        assert_eq!(ids, ["B", "A"]);
    }

    #[test]
    fn test_two_products_scenario() {
        let mut cart = Cart::new();
        cart.add_item(&apples());
        cart.add_item(&apples());
        cart.add_item(&bread());

        assert_eq!(cart.len(), 2);
        assert_eq!(cart.quantity_of(&id("A")), 2);
        assert_eq!(cart.quantity_of(&id("B")), 1);
        assert_eq!(cart.total_price(), Decimal::new(6_000, 3));
    }

    #[test]
    fn test_remove_walks_down_to_no_op() {
        let mut cart = Cart::new();
        cart.add_item(&apples());
        cart.add_item(&apples());
        cart.add_item(&bread());

        cart.remove_item(&id("A"));
        assert_eq!(cart.quantity_of(&id("A")), 1);
        assert_eq!(cart.total_price(), Decimal::new(3_500, 3));

        cart.remove_item(&id("A"));
        assert!(cart.get(&id("A")).is_none());
        assert_eq!(cart.total_price(), Decimal::new(1_000, 3));

        let before = cart.clone();
        cart.remove_item(&id("A"));
        assert_eq!(cart, before);
        assert_eq!(cart.total_price(), Decimal::new(1_000, 3));
    }

    #[test]
    fn test_remove_absent_on_empty_cart() {
        let mut cart = Cart::new();
        cart.remove_item(&id("missing"));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_clear_resets_totals() {
        let mut cart = Cart::new();
        cart.add_item(&apples());
        cart.add_item(&bread());
        cart.add_item(&bread());

        cart.clear();
        assert_eq!(cart.total_item_count(), 0);
        assert_eq!(cart.total_price(), Decimal::ZERO);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_remove_units_is_bounded_by_quantity() {
        let mut cart = Cart::new();
        for _ in 0..3 {
            cart.add_item(&apples());
        }
        cart.add_item(&bread());

        assert_eq!(cart.remove_units(&id("A"), 2), 2);
        assert_eq!(cart.quantity_of(&id("A")), 1);

        assert_eq!(cart.remove_units(&id("B"), 5), 1);
        assert!(cart.get(&id("B")).is_none());

        assert_eq!(cart.remove_units(&id("missing"), 1), 0);
        assert_eq!(cart.total_item_count(), 1);
    }

    #[test]
    fn test_add_at_max_quantity_saturates() {
        let mut cart = Cart::new();
        cart.items.push(LineItem {
            quantity: u32::MAX,
            ..LineItem::first_unit(&apples())
        });

        cart.add_item(&apples());
        assert_eq!(cart.quantity_of(&id("A")), u32::MAX);
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_line_total() {
        let mut cart = Cart::new();
        for _ in 0..3 {
            cart.add_item(&apples());
        }
        assert_eq!(cart.get(&id("A")).unwrap().line_total(), Decimal::new(7_500, 3));
    }

    #[test]
    fn test_serializes_camel_case() {
        let mut cart = Cart::new();
        cart.add_item(&bread());
        let json = serde_json::to_value(&cart).unwrap();
        assert_eq!(json["items"][0]["unitPrice"], "1.000");
        assert_eq!(json["items"][0]["quantity"], 1);
    }
}
