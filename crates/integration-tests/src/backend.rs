//! In-process stand-in for the laundry backend.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use axum::{
    Form, Json, Router,
    extract::{Multipart, Path, Query, Request, State},
    http::{StatusCode, header},
    middleware::{Next, from_fn_with_state},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use url::Url;

/// An account the fake backend accepts.
#[derive(Debug, Clone)]
pub struct FakeUser {
    pub username: String,
    pub password: String,
    pub user_id: String,
    pub role: &'static str,
    pub plan: Option<String>,
}

impl FakeUser {
    pub fn user(username: &str, password: &str, user_id: &str) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
            user_id: user_id.to_string(),
            role: "user",
            plan: Some("premium".to_string()),
        }
    }

    pub fn admin(username: &str, password: &str) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
            user_id: format!("admin-{username}"),
            role: "admin",
            plan: None,
        }
    }
}

/// An order as the fake backend stores and returns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FakeOrder {
    pub id: String,
    pub user_id: String,
    pub item_type: String,
    pub quantity: u32,
    pub status: String,
    pub hostel_name: String,
    pub room_number: String,
    pub pickup_time_slot: String,
    pub payment_method: String,
    pub total_price: u64,
    pub date_created: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
}

impl FakeOrder {
    pub fn new(id: &str, user_id: &str, item_type: &str, quantity: u32, status: &str) -> Self {
        Self {
            id: id.to_string(),
            user_id: user_id.to_string(),
            item_type: item_type.to_string(),
            quantity,
            status: status.to_string(),
            hostel_name: "Block A".to_string(),
            room_number: "101".to_string(),
            pickup_time_slot: "9-11 AM".to_string(),
            payment_method: "Cash".to_string(),
            total_price: 50 * u64::from(quantity),
            date_created: "2025-03-01T10:30:00".to_string(),
            note: None,
            feedback: None,
        }
    }

    #[must_use]
    pub fn created(mut self, date_created: &str) -> Self {
        self.date_created = date_created.to_string();
        self
    }
}

/// Everything the fake backend knows at start-up.
#[derive(Debug, Clone, Default)]
pub struct BackendData {
    pub users: Vec<FakeUser>,
    pub orders: Vec<FakeOrder>,
    /// `(order_id, status)` pairs, oldest first.
    pub notifications: Vec<(String, String)>,
    /// Unit price per item type.
    pub prices: HashMap<String, u64>,
    /// `None` makes `/admin/summary` fail with 500.
    pub summary: Option<Value>,
    /// `(month, count)` pairs.
    pub monthly: Vec<(u32, u64)>,
}

impl BackendData {
    /// One regular user `alice` (id `u1`), one admin `root`, a price list
    /// and a summary.
    pub fn standard() -> Self {
        Self {
            users: vec![
                FakeUser::user("alice", "secret", "u1"),
                FakeUser::admin("root", "toor"),
            ],
            prices: HashMap::from([("Shirt".to_string(), 50), ("Towel".to_string(), 40)]),
            summary: Some(json!({
                "total_users": 2,
                "completed_orders": 0,
                "total_revenue": 0,
                "most_washed_item": null
            })),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_orders(mut self, orders: Vec<FakeOrder>) -> Self {
        self.orders = orders;
        self
    }
}

/// One request received by the fake backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hit {
    pub method: String,
    pub path: String,
    pub query: String,
}

#[derive(Debug, Default)]
struct Inner {
    data: BackendData,
    hits: Vec<Hit>,
    bodies: Vec<(String, Value)>,
}

/// Handle to a running fake backend.
#[derive(Clone)]
pub struct FakeBackend {
    url: Url,
    inner: Arc<Mutex<Inner>>,
}

impl FakeBackend {
    /// Serve the fake backend on an ephemeral local port.
    pub async fn spawn(data: BackendData) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake backend");
        let addr = listener.local_addr().expect("Failed to read local address");

        let backend = Self {
            url: Url::parse(&format!("http://{addr}")).expect("Failed to build backend URL"),
            inner: Arc::new(Mutex::new(Inner {
                data,
                ..Inner::default()
            })),
        };

        let router = backend.router();
        tokio::spawn(async move {
            axum::serve(listener, router)
                .await
                .expect("Fake backend stopped");
        });

        backend
    }

    pub const fn url(&self) -> &Url {
        &self.url
    }

    /// Every request received so far.
    pub fn hits(&self) -> Vec<Hit> {
        self.lock().hits.clone()
    }

    /// Number of requests received so far.
    pub fn total_hits(&self) -> usize {
        self.lock().hits.len()
    }

    /// Number of `method` requests whose path starts with `prefix`.
    pub fn count(&self, method: &str, prefix: &str) -> usize {
        self.lock()
            .hits
            .iter()
            .filter(|hit| hit.method == method && hit.path.starts_with(prefix))
            .count()
    }

    /// The most recent body sent to a path starting with `prefix`.
    pub fn last_body(&self, prefix: &str) -> Option<Value> {
        self.lock()
            .bodies
            .iter()
            .rev()
            .find(|(path, _)| path.starts_with(prefix))
            .map(|(_, body)| body.clone())
    }

    /// Current state of one order.
    pub fn order(&self, id: &str) -> Option<FakeOrder> {
        self.lock().data.orders.iter().find(|o| o.id == id).cloned()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().expect("Fake backend state poisoned")
    }

    fn record_body(&self, path: &str, body: Value) {
        self.lock().bodies.push((path.to_string(), body));
    }

    fn router(&self) -> Router {
        Router::new()
            .route("/", get(root))
            .route("/login", post(login))
            .route("/register", post(register))
            .route("/upload-request", post(upload_request))
            .route("/order-history/{user_id}", get(order_history))
            .route("/my-orders", get(my_orders))
            .route("/user/notifications/{user_id}", get(notifications))
            .route("/order/{id}", get(order))
            .route("/calculate-price", get(calculate_price))
            .route("/cancel-order/{id}", put(cancel_order))
            .route("/feedback/{id}", post(feedback))
            .route("/download-receipt/{id}", get(receipt))
            .route("/admin/summary", get(summary))
            .route("/admin/orders-per-month", get(orders_per_month))
            .route("/all-orders", get(all_orders))
            .route("/admin/update-status/{id}", put(update_status))
            .layer(from_fn_with_state(self.clone(), record_hit))
            .with_state(self.clone())
    }
}

async fn record_hit(State(backend): State<FakeBackend>, request: Request, next: Next) -> Response {
    let hit = Hit {
        method: request.method().to_string(),
        path: request.uri().path().to_string(),
        query: request.uri().query().unwrap_or_default().to_string(),
    };
    backend.lock().hits.push(hit);
    next.run(request).await
}

fn detail(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "detail": message }))).into_response()
}

// =============================================================================
// Handlers
// =============================================================================

async fn root() -> Json<Value> {
    Json(json!({ "message": "Laundry API" }))
}

#[derive(Deserialize)]
struct Credentials {
    username: String,
    password: String,
}

async fn login(State(backend): State<FakeBackend>, Json(body): Json<Credentials>) -> Response {
    let inner = backend.lock();
    let Some(user) = inner
        .data
        .users
        .iter()
        .find(|u| u.username == body.username && u.password == body.password)
    else {
        return detail(StatusCode::UNAUTHORIZED, "Invalid credentials");
    };

    Json(json!({
        "message": "Login successful",
        "user_id": user.user_id,
        "role": user.role,
        "plan": user.plan,
    }))
    .into_response()
}

async fn register(State(backend): State<FakeBackend>, Json(body): Json<Value>) -> Response {
    backend.record_body("/register", body.clone());
    let username = body["username"].as_str().unwrap_or_default().to_string();

    let mut inner = backend.lock();
    if inner.data.users.iter().any(|u| u.username == username) {
        return detail(StatusCode::BAD_REQUEST, "Username already exists");
    }
    let user_id = format!("u{}", inner.data.users.len() + 1);
    inner.data.users.push(FakeUser {
        username,
        password: body["password"].as_str().unwrap_or_default().to_string(),
        user_id,
        role: "user",
        plan: body["plan"].as_str().map(str::to_owned),
    });

    Json(json!({ "message": "User registered successfully" })).into_response()
}

async fn upload_request(State(backend): State<FakeBackend>, mut multipart: Multipart) -> Response {
    let mut fields = serde_json::Map::new();
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        if name == "image" {
            let file_name = field.file_name().unwrap_or_default().to_string();
            fields.insert(name, Value::String(file_name));
            continue;
        }
        let value = field.text().await.unwrap_or_default();
        fields.insert(name, Value::String(value));
    }
    backend.record_body("/upload-request", Value::Object(fields.clone()));

    let text = |key: &str| {
        fields
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };
    let quantity: u32 = text("quantity").parse().unwrap_or_default();
    let item_type = text("item_type");

    let mut inner = backend.lock();
    let unit = inner.data.prices.get(&item_type).copied().unwrap_or_default();
    let id = format!("o-{}", inner.data.orders.len() + 1);
    let note = text("note");
    inner.data.orders.push(FakeOrder {
        id: id.clone(),
        user_id: text("user_id"),
        item_type,
        quantity,
        status: "Pending".to_string(),
        hostel_name: text("hostel_name"),
        room_number: text("room_number"),
        pickup_time_slot: text("pickup_time_slot"),
        payment_method: text("payment_method"),
        total_price: unit * u64::from(quantity),
        date_created: "2025-03-10T09:00:00".to_string(),
        note: (!note.is_empty()).then_some(note),
        feedback: None,
    });

    Json(json!({ "message": "Request submitted", "order_id": id })).into_response()
}

#[derive(Deserialize)]
struct PeriodParams {
    month: Option<u32>,
    year: Option<i32>,
}

fn in_period(order: &FakeOrder, params: &PeriodParams) -> bool {
    let year = order.date_created.get(0..4).and_then(|y| y.parse::<i32>().ok());
    let month = order.date_created.get(5..7).and_then(|m| m.parse::<u32>().ok());
    params.year.is_none_or(|y| year == Some(y)) && params.month.is_none_or(|m| month == Some(m))
}

async fn order_history(
    State(backend): State<FakeBackend>,
    Path(user_id): Path<String>,
    Query(params): Query<PeriodParams>,
) -> Json<Vec<FakeOrder>> {
    let inner = backend.lock();
    Json(
        inner
            .data
            .orders
            .iter()
            .filter(|o| o.user_id == user_id && in_period(o, &params))
            .cloned()
            .collect(),
    )
}

#[derive(Deserialize)]
struct UserParam {
    user_id: String,
}

async fn my_orders(
    State(backend): State<FakeBackend>,
    Query(params): Query<UserParam>,
) -> Json<Vec<Value>> {
    let inner = backend.lock();
    Json(
        inner
            .data
            .orders
            .iter()
            .filter(|o| o.user_id == params.user_id)
            .map(|o| {
                json!({
                    "id": o.id,
                    "item_type": o.item_type,
                    "quantity": o.quantity,
                    "status": o.status,
                })
            })
            .collect(),
    )
}

async fn notifications(
    State(backend): State<FakeBackend>,
    Path(user_id): Path<String>,
) -> Json<Vec<Value>> {
    let inner = backend.lock();
    let owned: Vec<&str> = inner
        .data
        .orders
        .iter()
        .filter(|o| o.user_id == user_id)
        .map(|o| o.id.as_str())
        .collect();
    Json(
        inner
            .data
            .notifications
            .iter()
            .filter(|(id, _)| owned.contains(&id.as_str()))
            .map(|(id, status)| json!({ "order_id": id, "status": status }))
            .collect(),
    )
}

async fn order(State(backend): State<FakeBackend>, Path(id): Path<String>) -> Response {
    backend.order(&id).map_or_else(
        || detail(StatusCode::NOT_FOUND, "Order not found"),
        |order| Json(order).into_response(),
    )
}

#[derive(Deserialize)]
struct PriceParams {
    item_type: String,
    quantity: u64,
}

async fn calculate_price(
    State(backend): State<FakeBackend>,
    Query(params): Query<PriceParams>,
) -> Response {
    let unit = backend.lock().data.prices.get(&params.item_type).copied();
    unit.map_or_else(
        || detail(StatusCode::NOT_FOUND, "Item type not found"),
        |unit| Json(json!({ "estimated_price": unit * params.quantity })).into_response(),
    )
}

/// Move a pending order to `status`.
fn transition(backend: &FakeBackend, id: &str, status: &str, message: &str) -> Response {
    let mut inner = backend.lock();
    let Some(order) = inner.data.orders.iter_mut().find(|o| o.id == id) else {
        return detail(StatusCode::NOT_FOUND, "Order not found");
    };
    if order.status != "Pending" {
        return detail(StatusCode::BAD_REQUEST, "Only pending orders can be changed");
    }
    order.status = status.to_string();
    inner
        .data
        .notifications
        .push((id.to_string(), status.to_string()));
    Json(json!({ "message": message })).into_response()
}

async fn cancel_order(State(backend): State<FakeBackend>, Path(id): Path<String>) -> Response {
    transition(&backend, &id, "Cancelled", "Order cancelled successfully")
}

#[derive(Deserialize)]
struct FeedbackBody {
    feedback: String,
}

async fn feedback(
    State(backend): State<FakeBackend>,
    Path(id): Path<String>,
    Form(body): Form<FeedbackBody>,
) -> Response {
    backend.record_body("/feedback", json!({ "order_id": id, "feedback": body.feedback }));
    let mut inner = backend.lock();
    let Some(order) = inner.data.orders.iter_mut().find(|o| o.id == id) else {
        return detail(StatusCode::NOT_FOUND, "Order not found");
    };
    order.feedback = Some(body.feedback);
    Json(json!({ "message": "Feedback submitted" })).into_response()
}

async fn receipt(State(backend): State<FakeBackend>, Path(id): Path<String>) -> Response {
    if backend.order(&id).is_none() {
        return detail(StatusCode::NOT_FOUND, "Order not found");
    }
    (
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=receipt_{id}.pdf"),
            ),
        ],
        format!("%PDF-1.4 receipt {id}"),
    )
        .into_response()
}

async fn summary(State(backend): State<FakeBackend>) -> Response {
    let summary = backend.lock().data.summary.clone();
    summary.map_or_else(
        || detail(StatusCode::INTERNAL_SERVER_ERROR, "Summary unavailable"),
        |summary| Json(summary).into_response(),
    )
}

async fn orders_per_month(State(backend): State<FakeBackend>) -> Json<Vec<Value>> {
    let inner = backend.lock();
    Json(
        inner
            .data
            .monthly
            .iter()
            .map(|(month, count)| json!({ "month": month, "count": count }))
            .collect(),
    )
}

async fn all_orders(State(backend): State<FakeBackend>) -> Json<Vec<FakeOrder>> {
    Json(backend.lock().data.orders.clone())
}

async fn update_status(State(backend): State<FakeBackend>, Path(id): Path<String>) -> Response {
    transition(&backend, &id, "Completed", "Order marked as completed")
}
