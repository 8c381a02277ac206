//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                             - Home page
//! GET  /health                       - Liveness
//! GET  /health/ready                 - Backend reachability
//!
//! # Auth
//! GET  /auth/login                   - Login page
//! POST /auth/login                   - Login action
//! GET  /auth/register                - Register page
//! POST /auth/register                - Register action
//! POST /auth/logout                  - Logout action
//!
//! # Dashboard (requires user)
//! GET  /dashboard                    - Plan, request form, requests, notifications
//! POST /dashboard/requests           - Submit an order request (multipart)
//! GET  /dashboard/estimate           - Dashboard with a price estimate
//!
//! # Orders (requires user)
//! GET  /orders                       - Order history, month/year filter
//! GET  /orders/{id}/cancel           - Cancel confirmation
//! POST /orders/{id}/cancel           - Cancel action
//! POST /orders/{id}/feedback         - Feedback action
//! GET  /orders/{id}/receipt          - Receipt document
//! GET  /my-orders                    - Simple order list
//!
//! # Tracking
//! GET  /track                        - Lookup form; ?order_id= performs lookup
//!
//! # Admin
//! GET  /admin                        - Admin login or dashboard
//! POST /admin/login                  - Admin login action
//! POST /admin/logout                 - Admin logout action
//! POST /admin/orders/{id}/complete   - Mark an order completed
//! ```

pub mod admin;
pub mod auth;
pub mod dashboard;
pub mod health;
pub mod home;
pub mod my_orders;
pub mod orders;
pub mod track;

use axum::{
    Router,
    routing::{get, post},
};
use tower_sessions::Session;

use crate::api::ApiError;
use crate::models::{CurrentSession, take_flash};
use crate::state::AppState;
use crate::views::PageContext;

/// Build the layout context, consuming any pending flash message.
pub(crate) async fn page_context(
    session: &Session,
    current: Option<&CurrentSession>,
) -> PageContext {
    PageContext::new(current, take_flash(session).await)
}

/// Message for a failed backend call: the server's `detail` when it sent
/// one, `transport` when the request never completed, else `fallback`.
pub(crate) fn backend_message(err: &ApiError, fallback: &str, transport: &str) -> String {
    if err.is_transport() {
        transport.to_string()
    } else {
        err.user_message(fallback)
    }
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/logout", post(auth::logout))
}

/// Create the dashboard routes router.
pub fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard::show))
        .route("/requests", post(dashboard::submit_request))
        .route("/estimate", get(dashboard::estimate))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index))
        .route("/{id}/cancel", get(orders::confirm_cancel).post(orders::cancel))
        .route("/{id}/feedback", post(orders::feedback))
        .route("/{id}/receipt", get(orders::receipt))
}

/// Create the admin routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(admin::index))
        .route("/login", post(admin::login))
        .route("/logout", post(admin::logout))
        .route("/orders/{id}/complete", post(admin::complete))
}

/// Create all routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/auth", auth_routes())
        .nest("/dashboard", dashboard_routes())
        .nest("/orders", order_routes())
        .route("/my-orders", get(my_orders::index))
        .route("/track", get(track::index))
        .nest("/admin", admin_routes())
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;

    use super::*;
    use crate::api::ErrorBody;

    #[test]
    fn test_backend_message_prefers_detail() {
        let err = ApiError::Status {
            status: StatusCode::BAD_REQUEST,
            body: ErrorBody::from_text(r#"{"detail":"Username already exists"}"#.to_string()),
        };
        assert_eq!(
            backend_message(&err, "Registration failed.", "Server error. Try again."),
            "Username already exists"
        );
    }

    #[test]
    fn test_backend_message_fallback() {
        let err = ApiError::Decode("eof".to_string());
        assert_eq!(
            backend_message(&err, "Registration failed.", "Server error. Try again."),
            "Registration failed."
        );
    }
}
