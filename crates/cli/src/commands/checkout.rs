//! Checkout from a cart file: `souk checkout`.
//!
//! The cart file is YAML, one entry per product:
//!
//! ```yaml
//! - id: p1
//!   name: Apples
//!   unitPrice: 2.5
//!   image: apples.png
//!   quantity: 2
//! ```
//!
//! Every entry is added to the cart one unit at a time, so the resulting
//! cart is exactly what tapping "add" `quantity` times would produce. An
//! entry may ask for at most [`MAX_ENTRY_QUANTITY`] units.

use std::io::Write;
use std::path::PathBuf;

use rust_decimal::Decimal;
use serde::Deserialize;
use souk_client::error::set_sentry_user;
use souk_client::{ApiClient, ApiError, CartStore, CheckoutSession};
use souk_core::{
    CheckoutSummary, Destination, OrderType, Price, ProductDescriptor, ProductId, StoreId, UserId,
};

use super::CliError;

/// Largest `quantity` a single cart file entry may ask for.
pub const MAX_ENTRY_QUANTITY: u32 = 999;

/// One entry of a cart file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartEntry {
    pub id: ProductId,
    pub name: String,
    pub unit_price: Decimal,
    #[serde(default)]
    pub image: String,
    #[serde(default = "one")]
    pub quantity: u32,
}

const fn one() -> u32 {
    1
}

impl From<&CartEntry> for ProductDescriptor {
    fn from(entry: &CartEntry) -> Self {
        Self::new(
            entry.id.clone(),
            entry.name.clone(),
            entry.unit_price,
            entry.image.clone(),
        )
    }
}

/// Options of `souk checkout`.
#[derive(Debug, Clone)]
pub struct CheckoutArgs {
    pub store_id: StoreId,
    pub user_id: UserId,
    pub cart_file: PathBuf,
    pub order_type: OrderType,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Print the order payload instead of submitting it.
    pub dry_run: bool,
}

/// Parse a cart file's contents.
///
/// # Errors
///
/// Returns an error if the YAML does not describe a list of cart entries.
pub fn parse_cart(yaml: &str) -> Result<Vec<CartEntry>, CliError> {
    Ok(serde_yaml::from_str(yaml)?)
}

/// Add every entry to `cart`, one unit per `add_item` call.
///
/// # Errors
///
/// Returns [`CliError::QuantityTooLarge`] if any entry exceeds
/// [`MAX_ENTRY_QUANTITY`]; the cart is left untouched in that case.
pub fn fill_cart(cart: &CartStore, entries: &[CartEntry]) -> Result<(), CliError> {
    if let Some(entry) = entries.iter().find(|e| e.quantity > MAX_ENTRY_QUANTITY) {
        return Err(CliError::QuantityTooLarge {
            product_id: entry.id.clone(),
            quantity: entry.quantity,
            max: MAX_ENTRY_QUANTITY,
        });
    }

    for entry in entries {
        if entry.quantity == 0 {
            tracing::warn!(product_id = %entry.id, "Skipping cart entry with zero quantity");
            continue;
        }
        let product = ProductDescriptor::from(entry);
        for _ in 0..entry.quantity {
            cart.add_item(&product);
        }
    }
    Ok(())
}

/// Drop-off point for the order.
///
/// Delivery orders need an address and coordinates; pickup orders fall back
/// to an empty destination.
///
/// # Errors
///
/// Returns [`CliError::MissingDestination`] for a delivery order without a
/// complete destination.
pub fn destination(args: &CheckoutArgs) -> Result<Destination, CliError> {
    match (&args.address, args.latitude, args.longitude) {
        (Some(address), Some(latitude), Some(longitude)) => Ok(Destination {
            address: address.clone(),
            latitude,
            longitude,
        }),
        _ if args.order_type == OrderType::Pickup => Ok(Destination {
            address: args.address.clone().unwrap_or_default(),
            latitude: args.latitude.unwrap_or_default(),
            longitude: args.longitude.unwrap_or_default(),
        }),
        _ => Err(CliError::MissingDestination),
    }
}

/// Build a cart from the file and place (or preview) the order.
///
/// # Errors
///
/// Returns an error if the cart file cannot be read, the cart is empty, or
/// the backend rejects the order.
pub async fn run(api: ApiClient, args: CheckoutArgs, out: &mut impl Write) -> Result<(), CliError> {
    set_sentry_user(&args.user_id);

    let destination = destination(&args)?;
    let entries = parse_cart(&std::fs::read_to_string(&args.cart_file)?)?;

    let cart = CartStore::new();
    let mut session = CheckoutSession::new(api, cart.clone(), args.store_id, args.user_id);
    session.set_order_type(args.order_type);
    fill_cart(&cart, &entries)?;

    tracing::info!(
        store_id = %session.store_id(),
        items = cart.total_item_count(),
        total = %cart.total_price(),
        "Cart loaded"
    );
    write_summary(out, &session.summary())?;

    if args.dry_run {
        let order = session.build_order(destination).map_err(ApiError::from)?;
        serde_json::to_writer_pretty(&mut *out, &order)?;
        writeln!(out)?;
        return Ok(());
    }

    let order = session.submit(destination).await?;
    writeln!(
        out,
        "Order {} placed ({}), total {}",
        order.id,
        order.status,
        Price::from_amount(order.total_amount)
    )?;
    Ok(())
}

fn write_summary(out: &mut impl Write, summary: &CheckoutSummary) -> std::io::Result<()> {
    writeln!(out, "Order type:  {}", summary.order_type)?;
    writeln!(out, "Products:    {}", summary.product_count)?;
    writeln!(out, "Subtotal:    {}", Price::from_amount(summary.products_total))?;
    if summary.order_type == OrderType::Delivery {
        writeln!(out, "Delivery:    {}", Price::from_amount(summary.delivery_fee))?;
    }
    writeln!(out, "Service:     {}", Price::from_amount(summary.service_fee))?;
    writeln!(out, "Total:       {}", Price::from_amount(summary.total))
}
