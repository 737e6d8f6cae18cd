//! Catalog queries: stores, categories and products.

use souk_core::{Category, CategoryId, Product, Store, StoreId};
use tracing::{debug, instrument};

use super::cache::{CacheKey, CacheValue};
use super::ApiClient;
use crate::error::Result;

impl ApiClient {
    /// List every store.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn stores(&self) -> Result<Vec<Store>> {
        if let Some(CacheValue::Stores(stores)) = self.inner.cache.get(&CacheKey::Stores).await {
            debug!("Cache hit for stores");
            return Ok(stores.to_vec());
        }

        let url = self.endpoint(&["stores", "all"])?;
        let stores: Vec<Store> = self.get_json(url).await?;
        debug!(count = stores.len(), "Fetched stores");

        self.inner
            .cache
            .insert(CacheKey::Stores, CacheValue::Stores(stores.clone().into()))
            .await;

        Ok(stores)
    }

    /// List the categories of a store.
    ///
    /// # Errors
    ///
    /// Returns an error if the store does not exist or the API request fails.
    #[instrument(skip(self), fields(store_id = %store_id))]
    pub async fn categories(&self, store_id: &StoreId) -> Result<Vec<Category>> {
        let cache_key = CacheKey::Categories(store_id.clone());

        if let Some(CacheValue::Categories(categories)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for categories");
            return Ok(categories.to_vec());
        }

        let url = self.endpoint(&["stores", store_id.as_str(), "categories"])?;
        let categories: Vec<Category> = self.get_json(url).await?;
        debug!(count = categories.len(), "Fetched categories");

        self.inner
            .cache
            .insert(
                cache_key,
                CacheValue::Categories(categories.clone().into()),
            )
            .await;

        Ok(categories)
    }

    /// List the products of one category in a store.
    ///
    /// # Errors
    ///
    /// Returns an error if the store or category does not exist or the API
    /// request fails.
    #[instrument(skip(self), fields(store_id = %store_id, category_id = %category_id))]
    pub async fn products(
        &self,
        store_id: &StoreId,
        category_id: &CategoryId,
    ) -> Result<Vec<Product>> {
        let cache_key = CacheKey::Products {
            store: store_id.clone(),
            category: category_id.clone(),
        };

        if let Some(CacheValue::Products(products)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for products");
            return Ok(products.to_vec());
        }

        let url = self.endpoint(&[
            "stores",
            store_id.as_str(),
            "categories",
            category_id.as_str(),
            "products",
        ])?;
        let products: Vec<Product> = self.get_json(url).await?;
        debug!(count = products.len(), "Fetched products");

        self.inner
            .cache
            .insert(cache_key, CacheValue::Products(products.clone().into()))
            .await;

        Ok(products)
    }
}
