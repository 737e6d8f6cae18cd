//! Order history: `souk orders`.

use std::io::Write;

use souk_client::ApiClient;
use souk_client::error::set_sentry_user;
use souk_core::{Order, OrderFilter, Price, UserId};

use super::CliError;

/// List the orders of `user_id`, newest first, keeping those matching `filter`.
///
/// # Errors
///
/// Returns an error if the API request or writing the output fails.
pub async fn list(
    api: &ApiClient,
    user_id: &UserId,
    filter: &OrderFilter,
    out: &mut impl Write,
) -> Result<(), CliError> {
    set_sentry_user(user_id);

    let mut orders = api.filtered_orders(user_id, filter).await?;
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    tracing::debug!(count = orders.len(), ?filter, "Listing orders");

    write_orders(out, &orders)?;
    Ok(())
}

fn write_orders(out: &mut impl Write, orders: &[Order]) -> std::io::Result<()> {
    if orders.is_empty() {
        return writeln!(out, "No orders found.");
    }
    for order in orders {
        let store = order.store.as_ref().map_or("", |s| s.name.as_str());
        writeln!(
            out,
            "{}\t{}\t{}\t{}\t{}\t{}",
            order.id,
            order.created_at.format("%Y-%m-%d %H:%M"),
            order.status,
            order.order_type,
            store,
            Price::from_amount(order.total_amount)
        )?;
        for item in &order.items {
            writeln!(
                out,
                "  {} x {}\t{}",
                item.quantity,
                item.display_name(),
                Price::from_amount(item.total_amount)
            )?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_write_orders_lists_lines_under_each_order() {
        let json = r#"{
            "id": "o1",
            "status": "Delivered",
            "createdAt": "2024-05-01T09:30:00Z",
            "updatedAt": "2024-05-01T10:00:00Z",
            "totalAmount": 6.5,
            "storeId": "s1",
            "userId": "u1",
            "orderType": "delivery",
            "store": {"name": "Carrefour Lac"},
            "items": [
                {"id": "i1", "quantity": 2, "totalAmount": 5, "variant": {"name": "Apples"}},
                {"id": "i2", "name": "Bread", "quantity": 1, "totalAmount": 1.5}
            ]
        }"#;
        let order: Order = serde_json::from_str(json).unwrap();

        let mut buf = Vec::new();
        write_orders(&mut buf, &[order]).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert_eq!(
            text,
            "o1\t2024-05-01 09:30\tdelivered\tdelivery\tCarrefour Lac\t6.500 DT\n\
             \x20 2 x Apples\t5.000 DT\n\
             \x20 1 x Bread\t1.500 DT\n"
        );
    }
}
