//! Order lookup command.

use laundry_core::OrderId;
use laundry_web::api::LaundryClient;
use laundry_web::views::OrderRow;

use super::{CommandError, Output};

/// Text lines describing one order.
pub fn describe(row: &OrderRow) -> Vec<String> {
    let mut lines = vec![
        format!("Order:     {}", row.id),
        format!("Item:      {} x {}", row.item_type, row.quantity),
        format!("Status:    {}", row.status),
        format!("Total:     {}", row.total),
        format!("Pickup:    {} ({})", row.pickup_time_slot, row.location()),
        format!("Ordered:   {}", row.ordered),
        format!("Delivery:  {}", row.estimated_delivery),
    ];
    if let Some(note) = &row.note {
        lines.push(format!("Note:      {note}"));
    }
    if let Some(image) = &row.image_src {
        lines.push(format!("Image:     {image}"));
    }
    lines
}

/// Look up one order.
///
/// # Errors
///
/// Returns an error if the order does not exist or the backend cannot be
/// reached.
pub async fn lookup(
    client: &LaundryClient,
    output: &Output,
    order_id: &str,
) -> Result<(), CommandError> {
    let order = client.order(&OrderId::new(order_id.trim())).await?;
    let row = OrderRow::from(&order).with_asset_base(client.base_url());

    output.emit(&order, &describe(&row))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use laundry_web::api::Order;

    use super::*;

    #[test]
    fn test_describe_order() {
        let order: Order = serde_json::from_value(serde_json::json!({
            "id": "o-1",
            "item_type": "Shirt",
            "quantity": 3,
            "status": "Pending",
            "total_price": 150,
            "note": "starch"
        }))
        .unwrap();
        let lines = describe(&OrderRow::from(&order));

        assert_eq!(lines[0], "Order:     o-1");
        assert_eq!(lines[1], "Item:      Shirt x 3");
        assert_eq!(lines[3], "Total:     ₹150.00");
        assert!(lines.contains(&"Note:      starch".to_string()));
        assert!(!lines.iter().any(|line| line.starts_with("Image:")));
    }
}
