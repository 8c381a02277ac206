//! Order request, history, cancellation, feedback and receipt flows.

use laundry_integration_tests::{BackendData, FakeOrder, TestApp, location};
use reqwest::StatusCode;

const ALL: &str = "?month=&year=";

fn request_fields<'a>(item_type: &'a str, quantity: &'a str) -> Vec<(&'a str, &'a str)> {
    vec![
        ("item_type", item_type),
        ("quantity", quantity),
        ("payment_method", "UPI"),
        ("hostel_name", "Block B"),
        ("room_number", "204"),
        ("pickup_time_slot", "7-9 AM"),
        ("note", ""),
    ]
}

async fn signed_in(data: BackendData) -> TestApp {
    let app = TestApp::spawn(data).await;
    let response = app.login("alice", "secret").await;
    assert_eq!(location(&response), "/dashboard");
    app
}

#[tokio::test]
async fn test_submitted_request_appears_in_history() {
    let app = signed_in(BackendData::standard()).await;

    let response = app
        .post_multipart("/dashboard/requests", &request_fields("Shirt", "3"))
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/dashboard");

    let sent = app.backend.last_body("/upload-request").expect("upload body");
    assert_eq!(sent["user_id"], "u1");
    assert_eq!(sent["item_type"], "Shirt");
    assert_eq!(sent["quantity"], "3");
    assert!(sent.get("note").is_none());
    assert!(sent.get("image").is_none());

    let dashboard = app.page("/dashboard").await;
    assert!(dashboard.contains("Request submitted! Order ID: o-1"));
    assert!(dashboard.contains("Shirt × 3"));

    let history = app.page(&format!("/orders{ALL}")).await;
    assert!(history.contains("Shirt × 3"));
    assert!(history.contains("₹150.00"));
    assert!(history.contains("status-pending"));
}

#[tokio::test]
async fn test_dashboard_requests_show_id_payment_and_note() {
    let app = signed_in(BackendData::standard()).await;

    let mut fields = request_fields("Towel", "2");
    fields.retain(|(name, _)| *name != "note");
    fields.push(("note", "Hang dry"));
    app.post_multipart("/dashboard/requests", &fields).await;

    let dashboard = app.page("/dashboard").await;
    assert!(dashboard.contains("Order ID: <code>o-1</code>"));
    assert!(dashboard.contains("Payment: UPI"));
    assert!(dashboard.contains("Note: Hang dry"));
}

#[tokio::test]
async fn test_invalid_request_makes_no_call() {
    let app = signed_in(BackendData::standard()).await;
    let before = app.backend.total_hits();

    let response = app
        .post_multipart("/dashboard/requests", &request_fields("Shirt", "0"))
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(app.backend.total_hits(), before);

    let mut fields = request_fields("Shirt", "2");
    fields.retain(|(name, _)| *name != "hostel_name");
    app.post_multipart("/dashboard/requests", &fields).await;
    assert_eq!(app.backend.total_hits(), before);
    assert_eq!(app.backend.count("POST", "/upload-request"), 0);

    let dashboard = app.page("/dashboard").await;
    assert!(dashboard.contains("Please fill all required fields."));
}

#[tokio::test]
async fn test_invalid_quantity_message() {
    let app = signed_in(BackendData::standard()).await;

    app.post_multipart("/dashboard/requests", &request_fields("", "3"))
        .await;
    let dashboard = app.page("/dashboard").await;
    assert!(dashboard.contains("Enter valid item type and quantity."));
}

#[tokio::test]
async fn test_price_estimate() {
    let app = signed_in(BackendData::standard()).await;

    let body = app
        .page("/dashboard/estimate?item_type=Shirt&quantity=3&hostel_name=Block+B")
        .await;
    assert!(body.contains("Estimated Cost: ₹150.00"));
    assert!(body.contains("value=\"Block B\""));

    let body = app.page("/dashboard/estimate?item_type=Sofa&quantity=1").await;
    assert!(body.contains("Pricing not found."));

    let calls = app.backend.count("GET", "/calculate-price");
    let body = app.page("/dashboard/estimate?item_type=Shirt&quantity=0").await;
    assert!(body.contains("Enter valid item and quantity."));
    assert_eq!(app.backend.count("GET", "/calculate-price"), calls);
}

#[tokio::test]
async fn test_empty_history_renders_one_placeholder() {
    let app = signed_in(BackendData::standard()).await;

    let history = app.page(&format!("/orders{ALL}")).await;
    assert_eq!(history.matches("No orders found.").count(), 1);

    let dashboard = app.page("/dashboard").await;
    assert_eq!(dashboard.matches("No requests found.").count(), 1);
}

#[tokio::test]
async fn test_history_list_is_idempotent() {
    let data = BackendData::standard().with_orders(vec![
        FakeOrder::new("o-1", "u1", "Shirt", 3, "Pending"),
        FakeOrder::new("o-2", "u1", "Towel", 1, "Completed"),
    ]);
    let app = signed_in(data).await;

    let first = app.page(&format!("/orders{ALL}")).await;
    let second = app.page(&format!("/orders{ALL}")).await;
    assert_eq!(first, second);
    assert_eq!(first.matches("class=\"order-card\"").count(), 2);
}

#[tokio::test]
async fn test_only_pending_orders_offer_cancel() {
    let data = BackendData::standard().with_orders(vec![
        FakeOrder::new("o-1", "u1", "Shirt", 3, "Pending"),
        FakeOrder::new("o-2", "u1", "Towel", 1, "Completed"),
        FakeOrder::new("o-3", "u1", "Jeans", 2, "Cancelled"),
    ]);
    let app = signed_in(data).await;

    let body = app.page(&format!("/orders{ALL}")).await;
    assert!(body.contains("/orders/o-1/cancel?"));
    assert!(!body.contains("/orders/o-2/cancel"));
    assert!(!body.contains("/orders/o-3/cancel"));
    assert!(body.contains("status-completed"));
    assert!(body.contains("status-cancelled"));
}

#[tokio::test]
async fn test_odd_status_rows_do_not_break_the_list() {
    let data = BackendData::standard().with_orders(vec![
        FakeOrder::new("o-1", "u1", "Shirt", 3, "pending"),
        FakeOrder::new("o-2", "u1", "Towel", 1, "On Hold"),
    ]);
    let app = signed_in(data).await;

    let body = app.page(&format!("/orders{ALL}")).await;
    assert!(!body.contains("Failed to load orders"));
    assert!(body.contains("/orders/o-1/cancel?"));
    assert!(body.contains("order-o-2"));
    assert!(!body.contains("/orders/o-2/cancel"));
    assert!(body.contains("status-unknown"));
}

#[tokio::test]
async fn test_history_filters_by_month() {
    let data = BackendData::standard().with_orders(vec![
        FakeOrder::new("o-1", "u1", "Shirt", 3, "Pending").created("2025-03-05T08:00:00"),
        FakeOrder::new("o-2", "u1", "Towel", 1, "Pending").created("2025-04-05T08:00:00"),
    ]);
    let app = signed_in(data).await;

    let body = app.page("/orders?month=3&year=2025").await;
    assert!(body.contains("order-o-1"));
    assert!(!body.contains("order-o-2"));
    assert!(body.contains("Total for this period: <strong>₹150.00</strong>"));

    let hit = app
        .backend
        .hits()
        .into_iter()
        .rfind(|hit| hit.path == "/order-history/u1")
        .expect("history fetched");
    assert_eq!(hit.query, "month=3&year=2025");
}

#[tokio::test]
async fn test_history_defaults_to_a_month() {
    let app = signed_in(BackendData::standard()).await;

    app.page("/orders").await;
    let hit = app
        .backend
        .hits()
        .into_iter()
        .rfind(|hit| hit.path == "/order-history/u1")
        .expect("history fetched");
    assert!(hit.query.starts_with("month="));
    assert!(hit.query.contains("&year="));
}

#[tokio::test]
async fn test_invalid_month_makes_no_history_call() {
    let app = signed_in(BackendData::standard()).await;

    let body = app.page("/orders?month=13&year=2025").await;
    assert!(body.contains("Please choose a valid month and year."));
    assert_eq!(app.backend.count("GET", "/order-history"), 0);
}

#[tokio::test]
async fn test_cancel_returns_to_same_filter() {
    let data = BackendData::standard()
        .with_orders(vec![FakeOrder::new("o-1", "u1", "Shirt", 3, "Pending")]);
    let app = signed_in(data).await;

    let confirm = app.page("/orders/o-1/cancel?month=3&year=2025").await;
    assert!(confirm.contains("cancel order <strong>o-1</strong>"));
    assert!(confirm.contains("name=\"month\" value=\"3\""));

    let response = app
        .post_form("/orders/o-1/cancel", &[("month", "3"), ("year", "2025")])
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/orders?month=3&year=2025");
    assert_eq!(app.backend.order("o-1").expect("order").status, "Cancelled");

    let body = app.page("/orders?month=3&year=2025").await;
    assert!(body.contains("Order cancelled."));
    assert!(!body.contains("/orders/o-1/cancel"));
}

#[tokio::test]
async fn test_cancel_unknown_order_leaves_list_alone() {
    let data = BackendData::standard()
        .with_orders(vec![FakeOrder::new("o-1", "u1", "Shirt", 3, "Pending")]);
    let app = signed_in(data).await;
    app.page(&format!("/orders{ALL}")).await;
    let history_calls = app.backend.count("GET", "/order-history");

    let response = app
        .post_form("/orders/o-404/cancel", &[("month", ""), ("year", "")])
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = response.text().await.expect("Failed to read body");
    assert!(body.contains("Order not found"));
    assert!(!body.contains("Order cancelled."));

    assert_eq!(app.backend.count("PUT", "/cancel-order/o-404"), 1);
    assert_eq!(app.backend.count("GET", "/order-history"), history_calls);
    assert_eq!(app.backend.order("o-1").expect("order").status, "Pending");
}

#[tokio::test]
async fn test_cancel_completed_order_is_rejected() {
    let data = BackendData::standard()
        .with_orders(vec![FakeOrder::new("o-1", "u1", "Shirt", 3, "Completed")]);
    let app = signed_in(data).await;

    let response = app.post_form("/orders/o-1/cancel", &[]).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response.text().await.expect("Failed to read body");
    assert!(body.contains("Only pending orders can be changed"));
}

#[tokio::test]
async fn test_feedback() {
    let data = BackendData::standard()
        .with_orders(vec![FakeOrder::new("o-1", "u1", "Shirt", 3, "Completed")]);
    let app = signed_in(data).await;

    let response = app
        .post_form(
            "/orders/o-1/feedback",
            &[("feedback", "   "), ("month", ""), ("year", "")],
        )
        .await;
    assert_eq!(location(&response), "/orders?month=&year=");
    assert_eq!(app.backend.count("POST", "/feedback"), 0);

    let response = app
        .post_form(
            "/orders/o-1/feedback",
            &[("feedback", " Crisp and clean "), ("month", ""), ("year", "")],
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let sent = app.backend.last_body("/feedback").expect("feedback body");
    assert_eq!(sent["feedback"], "Crisp and clean");

    let body = app.page(&format!("/orders{ALL}")).await;
    assert!(body.contains("Feedback submitted!"));
    assert!(body.contains("Crisp and clean"));
}

#[tokio::test]
async fn test_receipt_is_proxied() {
    let data = BackendData::standard()
        .with_orders(vec![FakeOrder::new("o-1", "u1", "Shirt", 3, "Completed")]);
    let app = signed_in(data).await;

    let response = app.get("/orders/o-1/receipt").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-type"], "application/pdf");
    assert_eq!(
        response.headers()["content-disposition"],
        "attachment; filename=receipt_o-1.pdf"
    );
    let body = response.text().await.expect("Failed to read body");
    assert!(body.starts_with("%PDF"));

    let response = app.get("/orders/o-9/receipt").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_my_orders_lines() {
    let data = BackendData::standard()
        .with_orders(vec![FakeOrder::new("o-1", "u1", "Shirt", 3, "Completed")]);
    let app = signed_in(data).await;

    let body = app.page("/my-orders").await;
    assert!(body.contains("Shirt - 3 pcs - Status: Completed"));
}

#[tokio::test]
async fn test_completed_notifications_on_dashboard() {
    let mut data = BackendData::standard().with_orders(vec![
        FakeOrder::new("o-1", "u1", "Shirt", 3, "Completed"),
        FakeOrder::new("o-2", "u1", "Towel", 1, "Cancelled"),
    ]);
    data.notifications = vec![
        ("o-1".to_string(), "Completed".to_string()),
        ("o-2".to_string(), "Cancelled".to_string()),
    ];
    let app = signed_in(data).await;

    let dashboard = app.page("/dashboard").await;
    assert!(dashboard.contains("Your Order #o-1 is Completed!"));
    assert!(!dashboard.contains("o-2 is"));

    let history = app.page(&format!("/orders{ALL}")).await;
    assert!(history.contains("Order o-1 is Completed"));
    assert!(history.contains("Order o-2 is Cancelled"));

    let track = app.page("/track").await;
    assert!(track.contains("Order o-2 is Cancelled"));
    assert!(!track.contains("Order o-1 is Completed"));
}
