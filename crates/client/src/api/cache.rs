//! Cache types for catalog responses.

use std::sync::Arc;

use souk_core::{Category, CategoryId, Product, Store, StoreId};

/// Cache key for catalog listings.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Stores,
    Categories(StoreId),
    Products {
        store: StoreId,
        category: CategoryId,
    },
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Stores(Arc<[Store]>),
    Categories(Arc<[Category]>),
    Products(Arc<[Product]>),
}
