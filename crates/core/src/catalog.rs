//! Catalog records served by the backend.
//!
//! These are read-only from the client's point of view. The cart only ever
//! sees a [`ProductDescriptor`] derived from a [`Product`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cart::ProductDescriptor;
use crate::types::{CategoryId, ProductId, StoreId};

/// Where a store is located.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreLocation {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

/// A store customers can order from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    pub id: StoreId,
    pub name: String,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub location: Option<StoreLocation>,
}

impl Store {
    /// Street address, if the backend provided one.
    #[must_use]
    pub fn address(&self) -> Option<&str> {
        self.location.as_ref()?.address.as_deref()
    }
}

/// A product category within a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
}

/// A product listed in a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Unit price including taxes.
    pub sell_price_ttc: Decimal,
    #[serde(default)]
    pub image: Option<String>,
}

impl From<&Product> for ProductDescriptor {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            unit_price: product.sell_price_ttc,
            image: product.image.clone().unwrap_or_default(),
        }
    }
}

impl From<Product> for ProductDescriptor {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            unit_price: product.sell_price_ttc,
            image: product.image.unwrap_or_default(),
        }
    }
}

/// Anything the browse screens can filter by name.
pub trait Named {
    fn name(&self) -> &str;
}

impl Named for Store {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for Category {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for Product {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Case-insensitive substring search by name.
///
/// A blank query matches everything.
#[must_use]
pub fn search<'a, T: Named>(items: &'a [T], query: &str) -> Vec<&'a T> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return items.iter().collect();
    }
    items
        .iter()
        .filter(|item| item.name().to_lowercase().contains(&needle))
        .collect()
}
