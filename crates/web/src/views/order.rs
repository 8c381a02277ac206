//! Order rows.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta};
use laundry_core::{OrderStatus, Price};
use url::Url;

use crate::api::Order;

/// Days between ordering and the estimated delivery date.
pub const DELIVERY_DAYS: i64 = 3;

const NOT_AVAILABLE: &str = "N/A";

/// One order as rendered in any list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRow {
    pub id: String,
    pub item_type: String,
    pub quantity: u32,
    pub status: OrderStatus,
    pub status_class: &'static str,
    pub user_id: String,
    pub hostel_name: String,
    pub room_number: String,
    pub pickup_time_slot: String,
    pub payment_method: Option<String>,
    pub total: String,
    pub ordered: String,
    pub estimated_delivery: String,
    pub note: Option<String>,
    pub feedback: Option<String>,
    /// Backend-relative image path.
    pub image_path: Option<String>,
    /// Absolute image URL, set by [`OrderRow::with_asset_base`].
    pub image_src: Option<String>,
    pub can_cancel: bool,
    pub can_complete: bool,
}

impl From<&Order> for OrderRow {
    fn from(order: &Order) -> Self {
        let created = order.date_created.as_deref().and_then(parse_timestamp);

        Self {
            id: order.id.to_string(),
            item_type: order.item_type.clone(),
            quantity: order.quantity,
            status: order.status,
            status_class: order.status.css_class(),
            user_id: order
                .user_id
                .as_ref()
                .map_or_else(String::new, ToString::to_string),
            hostel_name: or_na(order.hostel_name.as_deref()),
            room_number: or_na(order.room_number.as_deref()),
            pickup_time_slot: or_na(order.pickup_time_slot.as_deref()),
            payment_method: non_blank(order.payment_method.as_deref()),
            total: order.total_price.unwrap_or_default().display(),
            ordered: created.map_or_else(
                || NOT_AVAILABLE.to_string(),
                |at| at.format("%d %b %Y, %H:%M").to_string(),
            ),
            estimated_delivery: created
                .and_then(estimated_delivery)
                .map_or_else(
                    || NOT_AVAILABLE.to_string(),
                    |date| date.format("%d %b %Y").to_string(),
                ),
            note: non_blank(order.note.as_deref()),
            feedback: non_blank(order.feedback.as_deref()),
            image_path: non_blank(order.image_url.as_deref()),
            image_src: None,
            can_cancel: order.status.is_cancellable(),
            can_complete: order.status.is_completable(),
        }
    }
}

impl OrderRow {
    /// Resolve the image path against the backend origin.
    #[must_use]
    pub fn with_asset_base(mut self, base: &Url) -> Self {
        self.image_src = self
            .image_path
            .as_deref()
            .and_then(|path| base.join(path.trim_start_matches('/')).ok())
            .map(String::from);
        self
    }

    /// Single-line form used by the legacy order list.
    #[must_use]
    pub fn summary_line(&self) -> String {
        format!(
            "{} - {} pcs - Status: {}",
            self.item_type, self.quantity, self.status
        )
    }

    /// `/orders/{id}/{action}` for this order.
    #[must_use]
    pub fn action_path(&self, action: &str) -> String {
        order_path(&self.id, action)
    }

    /// Admin action marking this order completed.
    #[must_use]
    pub fn complete_path(&self) -> String {
        format!("/admin/orders/{}/complete", encode_segment(&self.id))
    }

    /// "Hostel, Room: 101" for list rows.
    #[must_use]
    pub fn location(&self) -> String {
        format!("{}, Room: {}", self.hostel_name, self.room_number)
    }
}

/// `/orders/{id}/{action}` with the ID percent-encoded.
#[must_use]
pub fn order_path(id: &str, action: &str) -> String {
    format!("/orders/{}/{action}", encode_segment(id))
}

fn encode_segment(segment: &str) -> String {
    url::form_urlencoded::byte_serialize(segment.as_bytes()).collect()
}

/// Parse a backend timestamp: RFC 3339, naive date-time, or bare date.
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Some(at.naive_local());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(at) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(at);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Created date plus [`DELIVERY_DAYS`].
#[must_use]
pub fn estimated_delivery(created: NaiveDateTime) -> Option<NaiveDate> {
    created
        .checked_add_signed(TimeDelta::days(DELIVERY_DAYS))
        .map(|at| at.date())
}

fn or_na(value: Option<&str>) -> String {
    non_blank(value).unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}

/// Sum of order totals, for page footers.
#[must_use]
pub fn total_of(orders: &[Order]) -> Price {
    Price::new(
        orders
            .iter()
            .filter_map(|order| order.total_price)
            .map(|price| price.amount())
            .sum(),
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use laundry_core::OrderId;
    use rust_decimal::Decimal;

    use super::*;

    fn order(status: OrderStatus) -> Order {
        serde_json::from_value(serde_json::json!({
            "id": "o-7",
            "item_type": "Shirt",
            "quantity": 3,
            "status": status.as_str(),
            "user_id": "u1",
            "hostel_name": "Block A",
            "room_number": "101",
            "pickup_time_slot": "9-11 AM",
            "total_price": 150,
            "date_created": "2025-03-01T10:30:00",
            "image_url": "uploads/shirt.png"
        }))
        .unwrap()
    }

    #[test]
    fn test_pending_row() {
        let row = OrderRow::from(&order(OrderStatus::Pending));
        assert_eq!(row.status_class, "status-pending");
        assert!(row.can_cancel);
        assert!(row.can_complete);
        assert_eq!(row.total, "₹150.00");
        assert_eq!(row.ordered, "01 Mar 2025, 10:30");
        assert_eq!(row.estimated_delivery, "04 Mar 2025");
    }

    #[test]
    fn test_only_pending_rows_are_actionable() {
        for status in [OrderStatus::Completed, OrderStatus::Cancelled] {
            let row = OrderRow::from(&order(status));
            assert!(!row.can_cancel);
            assert!(!row.can_complete);
        }
    }

    #[test]
    fn test_missing_fields_render_na() {
        let order = Order {
            id: OrderId::new("o-8"),
            item_type: "Towel".to_string(),
            quantity: 1,
            status: OrderStatus::Pending,
            user_id: None,
            hostel_name: None,
            room_number: Some("  ".to_string()),
            pickup_time_slot: None,
            total_price: None,
            date_created: None,
            payment_method: None,
            note: None,
            image_url: None,
            feedback: None,
        };
        let row = OrderRow::from(&order);
        assert_eq!(row.hostel_name, "N/A");
        assert_eq!(row.room_number, "N/A");
        assert_eq!(row.ordered, "N/A");
        assert_eq!(row.estimated_delivery, "N/A");
        assert_eq!(row.total, "₹0.00");
    }

    #[test]
    fn test_image_resolved_against_backend() {
        let base = Url::parse("http://127.0.0.1:8000").unwrap();
        let row = OrderRow::from(&order(OrderStatus::Pending)).with_asset_base(&base);
        assert_eq!(
            row.image_src.as_deref(),
            Some("http://127.0.0.1:8000/uploads/shirt.png")
        );
    }

    #[test]
    fn test_summary_line() {
        let row = OrderRow::from(&order(OrderStatus::Completed));
        assert_eq!(row.summary_line(), "Shirt - 3 pcs - Status: Completed");
    }

    #[test]
    fn test_action_paths_encode_id() {
        let mut row = OrderRow::from(&order(OrderStatus::Pending));
        assert_eq!(row.action_path("receipt"), "/orders/o-7/receipt");
        row.id = "a/b".to_string();
        assert_eq!(row.action_path("cancel"), "/orders/a%2Fb/cancel");
        assert_eq!(row.complete_path(), "/admin/orders/a%2Fb/complete");
    }

    #[test]
    fn test_parse_timestamp_variants() {
        assert!(parse_timestamp("2025-03-01T10:30:00.123456").is_some());
        assert!(parse_timestamp("2025-03-01T10:30:00+05:30").is_some());
        assert!(parse_timestamp("2025-03-01").is_some());
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn test_delivery_crosses_month_end() {
        let created = parse_timestamp("2024-02-27T08:00:00").unwrap();
        assert_eq!(
            estimated_delivery(created).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
        );
    }

    #[test]
    fn test_total_of() {
        let orders = vec![order(OrderStatus::Pending), order(OrderStatus::Completed)];
        assert_eq!(total_of(&orders).amount(), Decimal::from(300));
    }
}
