//! Order history command.

use laundry_core::{MonthFilter, UserId};
use laundry_web::api::{LaundryClient, Order};
use laundry_web::views::OrderRow;
use laundry_web::views::order::total_of;

use super::{CommandError, Output};

/// One line per order followed by the period total.
pub fn summarize(orders: &[Order]) -> Vec<String> {
    if orders.is_empty() {
        return vec!["No orders found.".to_string()];
    }

    let mut lines: Vec<String> = orders
        .iter()
        .map(|order| {
            let row = OrderRow::from(order);
            format!("{}  {}  {}", row.id, row.summary_line(), row.total)
        })
        .collect();
    lines.push(format!("Total: {}", total_of(orders).display()));
    lines
}

/// List a user's orders. Without month and year, every order is listed.
///
/// # Errors
///
/// Returns an error for an invalid month or year, or if the backend call
/// fails.
pub async fn list(
    client: &LaundryClient,
    output: &Output,
    user_id: &str,
    month: Option<&str>,
    year: Option<&str>,
) -> Result<(), CommandError> {
    let filter = MonthFilter::parse(month, year)?;
    let orders = client
        .order_history(&UserId::new(user_id.trim()), filter)
        .await?;
    tracing::info!(count = orders.len(), "Fetched order history");

    output.emit(&orders, &summarize(&orders))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_summarize_empty() {
        assert_eq!(summarize(&[]), vec!["No orders found.".to_string()]);
    }

    #[test]
    fn test_summarize_adds_total() {
        let orders: Vec<Order> = serde_json::from_value(serde_json::json!([
            {"id": "o-1", "item_type": "Shirt", "quantity": 3, "status": "Completed", "total_price": 150},
            {"id": "o-2", "item_type": "Towel", "quantity": 1, "status": "Pending", "total_price": "40.50"}
        ]))
        .unwrap();
        let lines = summarize(&orders);

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "o-1  Shirt - 3 pcs - Status: Completed  ₹150.00");
        assert_eq!(lines[2], "Total: ₹190.50");
    }
}
