//! Request and response types for the laundry backend.

use laundry_core::{Email, OrderId, OrderStatus, Price, RequestId, Role, UserId};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

// =============================================================================
// Orders
// =============================================================================

/// An order as the backend reports it.
///
/// Only `id`, `item_type` and `quantity` are guaranteed; older records and the
/// legacy list endpoint omit most of the rest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub item_type: String,
    pub quantity: u32,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub user_id: Option<UserId>,
    #[serde(default)]
    pub hostel_name: Option<String>,
    #[serde(default)]
    pub room_number: Option<String>,
    #[serde(default)]
    pub pickup_time_slot: Option<String>,
    #[serde(default)]
    pub total_price: Option<Price>,
    /// ISO-8601 timestamp, with or without an offset.
    #[serde(default)]
    pub date_created: Option<String>,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
    /// Path relative to the backend origin.
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub feedback: Option<String>,
}

/// A status notification for one of the user's orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub order_id: OrderId,
    #[serde(default)]
    pub status: OrderStatus,
}

/// Image attached to a new order request.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// A validated new order request, sent as multipart form data.
#[derive(Debug, Clone)]
pub struct NewOrderRequest {
    pub user_id: UserId,
    pub item_type: String,
    pub quantity: u32,
    pub payment_method: String,
    pub hostel_name: String,
    pub room_number: String,
    pub pickup_time_slot: String,
    pub note: Option<String>,
    pub image: Option<ImageUpload>,
}

/// Response to a successful order submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub order_id: OrderId,
    #[serde(default)]
    pub request_id: Option<RequestId>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Price estimate for an item type and quantity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PriceEstimate {
    pub estimated_price: Price,
}

/// A downloaded receipt document.
#[derive(Debug, Clone)]
pub struct Receipt {
    pub content_type: String,
    /// Raw `Content-Disposition` header, passed through to the browser.
    pub content_disposition: Option<String>,
    pub bytes: Vec<u8>,
}

// =============================================================================
// Accounts
// =============================================================================

/// Response to a successful login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub user_id: UserId,
    pub role: Role,
    #[serde(default)]
    pub plan: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// A validated registration.
///
/// The role is not part of the input: self-registered accounts are always
/// regular users.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub password: SecretString,
    pub email: Email,
    pub phone: String,
    pub plan: String,
}

/// Generic `{"message": ...}` acknowledgement.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

// =============================================================================
// Admin
// =============================================================================

/// Aggregate statistics for the admin dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminSummary {
    pub total_users: u64,
    pub completed_orders: u64,
    pub total_revenue: Price,
    #[serde(default)]
    pub most_washed_item: Option<String>,
}

/// Number of orders created in a calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyCount {
    pub month: u32,
    pub count: u64,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_order_full_record() {
        let order: Order = serde_json::from_value(serde_json::json!({
            "id": "o-1",
            "item_type": "Shirt",
            "quantity": 3,
            "status": "Completed",
            "user_id": "u1",
            "hostel_name": "Block A",
            "room_number": "101",
            "pickup_time_slot": "9-11 AM",
            "total_price": 150.0,
            "date_created": "2025-03-01T10:00:00",
            "feedback": null
        }))
        .unwrap();
        assert_eq!(order.status, OrderStatus::Completed);
        assert_eq!(order.total_price.unwrap().display(), "₹150.00");
        assert_eq!(order.user_id.unwrap().as_str(), "u1");
        assert!(order.feedback.is_none());
    }

    #[test]
    fn test_order_legacy_record_defaults() {
        let order: Order = serde_json::from_value(serde_json::json!({
            "id": "o-2",
            "item_type": "Towel",
            "quantity": 1
        }))
        .unwrap();
        assert_eq!(order.status, OrderStatus::Pending);
        assert!(order.total_price.is_none());
        assert!(order.date_created.is_none());
    }

    #[test]
    fn test_order_list_tolerates_odd_statuses() {
        let orders: Vec<Order> = serde_json::from_value(serde_json::json!([
            {"id": "o-1", "item_type": "Shirt", "quantity": 3, "status": "Pending"},
            {"id": "o-2", "item_type": "Shirt", "quantity": 1, "status": "pending"},
            {"id": "o-3", "item_type": "Towel", "quantity": 2, "status": null},
            {"id": "o-4", "item_type": "Towel", "quantity": 2, "status": "On Hold"}
        ]))
        .unwrap();
        let statuses: Vec<OrderStatus> = orders.iter().map(|o| o.status).collect();
        assert_eq!(
            statuses,
            [
                OrderStatus::Pending,
                OrderStatus::Pending,
                OrderStatus::Pending,
                OrderStatus::Unknown,
            ]
        );
    }

    #[test]
    fn test_summary_without_item() {
        let summary: AdminSummary = serde_json::from_value(serde_json::json!({
            "total_users": 4,
            "completed_orders": 2,
            "total_revenue": 0
        }))
        .unwrap();
        assert_eq!(summary.most_washed_item, None);
        assert_eq!(summary.total_revenue.display(), "₹0.00");
    }

    #[test]
    fn test_login_response() {
        let login: LoginResponse = serde_json::from_value(serde_json::json!({
            "message": "Login successful",
            "user_id": "u1",
            "role": "admin",
            "plan": "premium"
        }))
        .unwrap();
        assert!(login.role.is_admin());
        assert_eq!(login.plan.as_deref(), Some("premium"));
    }
}
