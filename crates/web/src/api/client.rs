//! HTTP client for the laundry backend.

use std::sync::Arc;

use laundry_core::{MonthFilter, OrderId, Role, UserId};
use reqwest::{RequestBuilder, header};
use secrecy::{ExposeSecret, SecretString};
use serde::{Serialize, de::DeserializeOwned};
use tracing::instrument;
use url::Url;

use super::types::{
    AdminSummary, LoginResponse, MessageResponse, MonthlyCount, NewAccount, NewOrderRequest,
    Notification, Order, PriceEstimate, Receipt, UploadResponse,
};
use super::{ApiError, ErrorBody};
use crate::config::ApiConfig;

/// Laundry backend API client.
///
/// Cheap to clone; all clones share one connection pool.
#[derive(Clone)]
pub struct LaundryClient {
    inner: Arc<LaundryClientInner>,
}

struct LaundryClientInner {
    client: reqwest::Client,
    base_url: Url,
}

#[derive(Serialize)]
struct LoginBody<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RegisterBody<'a> {
    username: &'a str,
    password: &'a str,
    email: &'a str,
    phone: &'a str,
    plan: &'a str,
    role: Role,
}

impl LaundryClient {
    /// Create a new client rooted at the configured base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL cannot carry paths or the HTTP client
    /// fails to build.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        if config.base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidBaseUrl(config.base_url.to_string()));
        }

        let mut builder = reqwest::Client::builder().user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(ApiError::Build)?;

        Ok(Self {
            inner: Arc::new(LaundryClientInner {
                client,
                base_url: config.base_url.clone(),
            }),
        })
    }

    /// The backend origin all requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Build an endpoint URL from path segments. Segments are percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.inner.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    // =========================================================================
    // Accounts
    // =========================================================================

    /// Authenticate with username and password.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` with 401 on bad credentials.
    #[instrument(skip(self, password), fields(username = %username))]
    pub async fn login(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<LoginResponse, ApiError> {
        let body = LoginBody {
            username,
            password: password.expose_secret(),
        };
        let request = self.inner.client.post(self.endpoint(&["login"])).json(&body);
        self.execute(request).await
    }

    /// Create a regular user account.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` with 400 when the username is taken.
    #[instrument(skip(self, account), fields(username = %account.username))]
    pub async fn register(&self, account: &NewAccount) -> Result<MessageResponse, ApiError> {
        let body = RegisterBody {
            username: &account.username,
            password: account.password.expose_secret(),
            email: account.email.as_str(),
            phone: &account.phone,
            plan: &account.plan,
            role: Role::User,
        };
        let request = self
            .inner
            .client
            .post(self.endpoint(&["register"]))
            .json(&body);
        self.execute(request).await
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// Submit a new laundry order as multipart form data.
    ///
    /// # Errors
    ///
    /// Returns an error if the image content type is malformed or the request fails.
    #[instrument(
        skip(self, order),
        fields(user_id = %order.user_id, item_type = %order.item_type, quantity = order.quantity)
    )]
    pub async fn submit_order(&self, order: NewOrderRequest) -> Result<UploadResponse, ApiError> {
        let mut form = reqwest::multipart::Form::new()
            .text("user_id", order.user_id.into_inner())
            .text("item_type", order.item_type)
            .text("quantity", order.quantity.to_string())
            .text("payment_method", order.payment_method)
            .text("hostel_name", order.hostel_name)
            .text("room_number", order.room_number)
            .text("pickup_time_slot", order.pickup_time_slot);

        if let Some(note) = order.note {
            form = form.text("note", note);
        }

        if let Some(image) = order.image {
            let part = reqwest::multipart::Part::bytes(image.bytes)
                .file_name(image.file_name)
                .mime_str(&image.content_type)
                .map_err(ApiError::Build)?;
            form = form.part("image", part);
        }

        let request = self
            .inner
            .client
            .post(self.endpoint(&["upload-request"]))
            .multipart(form);
        self.execute(request).await
    }

    /// List a user's orders, optionally narrowed to a month.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn order_history(
        &self,
        user_id: &UserId,
        filter: MonthFilter,
    ) -> Result<Vec<Order>, ApiError> {
        let mut url = self.endpoint(&["order-history", user_id.as_str()]);
        if !filter.is_empty() {
            url.query_pairs_mut().extend_pairs(filter.query_pairs());
        }
        self.execute(self.inner.client.get(url)).await
    }

    /// List a user's orders through the older `my-orders` endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn my_orders(&self, user_id: &UserId) -> Result<Vec<Order>, ApiError> {
        let mut url = self.endpoint(&["my-orders"]);
        url.query_pairs_mut().append_pair("user_id", user_id.as_str());
        self.execute(self.inner.client.get(url)).await
    }

    /// Status notifications for a user's orders.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn notifications(&self, user_id: &UserId) -> Result<Vec<Notification>, ApiError> {
        let url = self.endpoint(&["user", "notifications", user_id.as_str()]);
        self.execute(self.inner.client.get(url)).await
    }

    /// Fetch a single order.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` with 404 for an unknown ID.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn order(&self, order_id: &OrderId) -> Result<Order, ApiError> {
        let url = self.endpoint(&["order", order_id.as_str()]);
        self.execute(self.inner.client.get(url)).await
    }

    /// Estimate the price of `quantity` items of `item_type`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn estimate_price(
        &self,
        item_type: &str,
        quantity: u32,
    ) -> Result<PriceEstimate, ApiError> {
        let mut url = self.endpoint(&["calculate-price"]);
        url.query_pairs_mut()
            .append_pair("item_type", item_type)
            .append_pair("quantity", &quantity.to_string());
        self.execute(self.inner.client.get(url)).await
    }

    /// Cancel a pending order.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` with 400 for non-pending orders, 404 for unknown ones.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn cancel_order(&self, order_id: &OrderId) -> Result<MessageResponse, ApiError> {
        let url = self.endpoint(&["cancel-order", order_id.as_str()]);
        self.execute(self.inner.client.put(url)).await
    }

    /// Attach feedback text to an order.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, feedback), fields(order_id = %order_id))]
    pub async fn submit_feedback(
        &self,
        order_id: &OrderId,
        feedback: &str,
    ) -> Result<MessageResponse, ApiError> {
        let url = self.endpoint(&["feedback", order_id.as_str()]);
        let request = self.inner.client.post(url).form(&[("feedback", feedback)]);
        self.execute(request).await
    }

    /// Download the receipt document for an order.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` with 404 for an unknown ID.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn receipt(&self, order_id: &OrderId) -> Result<Receipt, ApiError> {
        let url = self.endpoint(&["download-receipt", order_id.as_str()]);
        let response = self
            .inner
            .client
            .get(url)
            .send()
            .await
            .map_err(ApiError::Transport)?;
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await.map_err(ApiError::Transport)?;
            return Err(ApiError::Status {
                status,
                body: ErrorBody::from_text(text),
            });
        }

        let header_value = |name: header::HeaderName| {
            response
                .headers()
                .get(name)
                .and_then(|value| value.to_str().ok())
                .map(str::to_owned)
        };
        let content_type = header_value(header::CONTENT_TYPE)
            .unwrap_or_else(|| "application/pdf".to_string());
        let content_disposition = header_value(header::CONTENT_DISPOSITION);
        let bytes = response.bytes().await.map_err(ApiError::Transport)?;

        Ok(Receipt {
            content_type,
            content_disposition,
            bytes: bytes.to_vec(),
        })
    }

    // =========================================================================
    // Admin
    // =========================================================================

    /// Aggregate statistics for the admin dashboard.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn admin_summary(&self) -> Result<AdminSummary, ApiError> {
        let url = self.endpoint(&["admin", "summary"]);
        self.execute(self.inner.client.get(url)).await
    }

    /// Order counts grouped by calendar month.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn orders_per_month(&self) -> Result<Vec<MonthlyCount>, ApiError> {
        let url = self.endpoint(&["admin", "orders-per-month"]);
        self.execute(self.inner.client.get(url)).await
    }

    /// Every order in the system.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn all_orders(&self) -> Result<Vec<Order>, ApiError> {
        let url = self.endpoint(&["all-orders"]);
        self.execute(self.inner.client.get(url)).await
    }

    /// Mark a pending order as completed.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` with 400 for non-pending orders, 404 for unknown ones.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn mark_completed(&self, order_id: &OrderId) -> Result<MessageResponse, ApiError> {
        let url = self.endpoint(&["admin", "update-status", order_id.as_str()]);
        self.execute(self.inner.client.put(url)).await
    }

    /// Check that the backend answers at all. Any HTTP status counts.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Transport` if the backend is unreachable.
    pub async fn ping(&self) -> Result<(), ApiError> {
        self.inner
            .client
            .get(self.inner.base_url.clone())
            .send()
            .await
            .map(|_| ())
            .map_err(ApiError::Transport)
    }

    // =========================================================================
    // Plumbing
    // =========================================================================

    /// Send a request and classify the response.
    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = request.send().await.map_err(|e| {
            tracing::warn!(error = %e, "Backend request failed");
            ApiError::Transport(e)
        })?;
        let status = response.status();
        let text = response.text().await.map_err(ApiError::Transport)?;

        if !status.is_success() {
            let body = ErrorBody::from_text(text);
            tracing::debug!(
                status = %status,
                body = %body.summary(),
                "Backend returned error status"
            );
            return Err(ApiError::Status { status, body });
        }

        serde_json::from_str(&text).map_err(|e| {
            tracing::warn!(error = %e, "Backend returned unparseable body");
            ApiError::Decode(e.to_string())
        })
    }
}
