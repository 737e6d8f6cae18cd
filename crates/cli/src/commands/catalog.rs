//! Catalog browsing: `souk stores`, `souk categories`, `souk products`.

use std::io::Write;

use souk_client::ApiClient;
use souk_core::catalog::search;
use souk_core::{Category, CategoryId, Price, Product, Store, StoreId};

use super::CliError;

/// List stores, optionally filtered by name.
///
/// # Errors
///
/// Returns an error if the API request or writing the output fails.
pub async fn stores(api: &ApiClient, query: Option<&str>, out: &mut impl Write) -> Result<(), CliError> {
    let stores = api.stores().await?;
    let matches = search(&stores, query.unwrap_or_default());
    tracing::debug!(total = stores.len(), shown = matches.len(), "Listing stores");
    write_stores(out, &matches)?;
    Ok(())
}

/// List the categories of one store, optionally filtered by name.
pub async fn categories(
    api: &ApiClient,
    store_id: &StoreId,
    query: Option<&str>,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let categories = api.categories(store_id).await?;
    let matches = search(&categories, query.unwrap_or_default());
    write_categories(out, &matches)?;
    Ok(())
}

/// List the products of one category.
pub async fn products(
    api: &ApiClient,
    store_id: &StoreId,
    category_id: &CategoryId,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let products = api.products(store_id, category_id).await?;
    write_products(out, &products)?;
    Ok(())
}

fn write_stores(out: &mut impl Write, stores: &[&Store]) -> std::io::Result<()> {
    if stores.is_empty() {
        return writeln!(out, "No stores found.");
    }
    for store in stores {
        match store.address() {
            Some(address) => writeln!(out, "{}\t{}\t{address}", store.id, store.name)?,
            None => writeln!(out, "{}\t{}", store.id, store.name)?,
        }
    }
    Ok(())
}

fn write_categories(out: &mut impl Write, categories: &[&Category]) -> std::io::Result<()> {
    if categories.is_empty() {
        return writeln!(out, "No categories found.");
    }
    for category in categories {
        writeln!(out, "{}\t{}", category.id, category.name)?;
    }
    Ok(())
}

fn write_products(out: &mut impl Write, products: &[Product]) -> std::io::Result<()> {
    if products.is_empty() {
        return writeln!(out, "No products found.");
    }
    for product in products {
        writeln!(
            out,
            "{}\t{}\t{}",
            product.id,
            product.name,
            Price::from_amount(product.sell_price_ttc)
        )?;
    }
    Ok(())
}
