//! Order history route handlers.
//!
//! History is filtered by month and year, defaulting to the current month.
//! Each row carries its own action URLs keyed by order ID.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    body::Body,
    extract::{Path, Query, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Redirect, Response},
};
use chrono::{Datelike, Local};
use tower_sessions::Session;
use tracing::instrument;

use laundry_core::{MonthFilter, OrderId};

use super::{backend_message, page_context};
use crate::error::{AppError, Result};
use crate::filters;
use crate::forms::{FeedbackForm, HistoryQuery};
use crate::middleware::RequireUser;
use crate::models::{CurrentSession, Flash, set_flash};
use crate::state::AppState;
use crate::views::order::{order_path, total_of};
use crate::views::{ListState, NotificationView, OrderRow, PageContext};

/// One month in the filter select box.
#[derive(Debug, Clone)]
pub struct MonthOption {
    pub value: u32,
    pub label: &'static str,
    pub selected: bool,
}

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

fn month_options(selected: Option<u32>) -> Vec<MonthOption> {
    (1_u32..)
        .zip(MONTH_NAMES)
        .map(|(value, label)| MonthOption {
            value,
            label,
            selected: selected == Some(value),
        })
        .collect()
}

// =============================================================================
// Templates
// =============================================================================

/// Order history page template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/index.html")]
pub struct OrdersTemplate {
    pub page: PageContext,
    pub months: Vec<MonthOption>,
    pub year: String,
    pub filter: HistoryQuery,
    pub orders: ListState<OrderRow>,
    pub total: Option<String>,
    pub notifications: Vec<NotificationView>,
}

/// Cancel confirmation page template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/confirm_cancel.html")]
pub struct ConfirmCancelTemplate {
    pub page: PageContext,
    pub order_id: String,
    pub filter: HistoryQuery,
    pub error: Option<String>,
}

impl ConfirmCancelTemplate {
    #[must_use]
    pub fn action(&self) -> String {
        order_path(&self.order_id, "cancel")
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Resolve the active filter. With no parameters at all, the current month.
fn resolve_filter(
    query: &HistoryQuery,
) -> std::result::Result<(HistoryQuery, MonthFilter), String> {
    if query.is_unset() {
        let filter = MonthFilter::containing(Local::now().date_naive());
        let echo = HistoryQuery {
            month: filter.month.map(|m| m.to_string()),
            year: filter.year.map(|y| y.to_string()),
        };
        return Ok((echo, filter));
    }
    query
        .validate()
        .map(|filter| (query.clone(), filter))
        .map_err(|e| e.to_string())
}

/// Fetch the filtered history. Returns the rows and the sum of their totals.
async fn load_orders(
    state: &AppState,
    current: &CurrentSession,
    filter: std::result::Result<MonthFilter, String>,
) -> (ListState<OrderRow>, Option<String>) {
    let filter = match filter {
        Ok(filter) => filter,
        Err(message) => return (ListState::Failed(message), None),
    };

    match state.api().order_history(&current.user_id, filter).await {
        Ok(orders) if orders.is_empty() => (ListState::Empty, None),
        Ok(orders) => {
            let base = state.api().base_url();
            let total = total_of(&orders).display();
            let rows = orders
                .iter()
                .map(|order| OrderRow::from(order).with_asset_base(base))
                .collect();
            (ListState::Loaded(rows), Some(total))
        }
        Err(e) => {
            tracing::warn!(error = %e, "Order history fetch failed");
            (
                ListState::Failed("⚠️ Failed to load orders.".to_string()),
                None,
            )
        }
    }
}

// =============================================================================
// Routes
// =============================================================================

/// Display the order history page.
#[instrument(skip(state, session, current, query), fields(user_id = %current.user_id))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    RequireUser(current): RequireUser,
    Query(query): Query<HistoryQuery>,
) -> impl IntoResponse {
    let resolved = resolve_filter(&query);
    let (echo, filter) = match resolved {
        Ok((echo, filter)) => (echo, Ok(filter)),
        Err(message) => (query, Err(message)),
    };

    let ((orders, total), notifications) = tokio::join!(
        load_orders(&state, &current, filter),
        state.api().notifications(&current.user_id)
    );

    let notifications = match notifications {
        Ok(feed) => NotificationView::all(&feed),
        Err(e) => {
            tracing::warn!(error = %e, "Notification fetch failed");
            Vec::new()
        }
    };

    let selected_month = echo.month.as_deref().and_then(|m| m.trim().parse().ok());
    let year = echo
        .year
        .clone()
        .unwrap_or_else(|| Local::now().year().to_string());

    OrdersTemplate {
        page: page_context(&session, Some(&current)).await,
        months: month_options(selected_month),
        year,
        filter: echo,
        orders,
        total,
        notifications,
    }
}

/// Display the cancel confirmation page.
pub async fn confirm_cancel(
    session: Session,
    RequireUser(current): RequireUser,
    Path(id): Path<String>,
    Query(filter): Query<HistoryQuery>,
) -> impl IntoResponse {
    ConfirmCancelTemplate {
        page: page_context(&session, Some(&current)).await,
        order_id: id,
        filter,
        error: None,
    }
}

/// Cancel an order, then return to the same filtered list.
///
/// On failure the confirmation page is shown again with the error and the
/// list is not reloaded.
#[instrument(skip(state, session, current, filter), fields(user_id = %current.user_id))]
pub async fn cancel(
    State(state): State<AppState>,
    session: Session,
    RequireUser(current): RequireUser,
    Path(id): Path<String>,
    Form(filter): Form<HistoryQuery>,
) -> Result<Response> {
    let order_id = OrderId::new(id);

    match state.api().cancel_order(&order_id).await {
        Ok(_) => {
            tracing::info!(order_id = %order_id, "Order cancelled");
            set_flash(&session, Flash::success("Order cancelled.")).await?;
            Ok(Redirect::to(&filter.orders_path()).into_response())
        }
        Err(e) => {
            tracing::warn!(order_id = %order_id, error = %e, "Cancel failed");
            let status = if e.is_not_found() {
                StatusCode::NOT_FOUND
            } else {
                StatusCode::BAD_REQUEST
            };
            let template = ConfirmCancelTemplate {
                page: page_context(&session, Some(&current)).await,
                order_id: order_id.into_inner(),
                filter,
                error: Some(backend_message(
                    &e,
                    "Failed to cancel.",
                    "Error cancelling order.",
                )),
            };
            Ok((status, template).into_response())
        }
    }
}

/// Attach feedback to an order. Blank feedback sends nothing.
#[instrument(skip(state, session, form), fields(order_id = %id))]
pub async fn feedback(
    State(state): State<AppState>,
    session: Session,
    RequireUser(_current): RequireUser,
    Path(id): Path<String>,
    Form(form): Form<FeedbackForm>,
) -> Result<Redirect> {
    let back = form.filter.orders_path();

    let Some(text) = form.text() else {
        return Ok(Redirect::to(&back));
    };

    let flash = match state.api().submit_feedback(&OrderId::new(id), text).await {
        Ok(_) => Flash::success("Feedback submitted!"),
        Err(e) => {
            tracing::warn!(error = %e, "Feedback failed");
            Flash::error(backend_message(
                &e,
                "Failed to submit feedback.",
                "Error while submitting feedback.",
            ))
        }
    };

    set_flash(&session, flash).await?;
    Ok(Redirect::to(&back))
}

/// Stream the receipt document from the backend.
#[instrument(skip(state), fields(order_id = %id))]
pub async fn receipt(
    State(state): State<AppState>,
    RequireUser(_current): RequireUser,
    Path(id): Path<String>,
) -> Result<Response> {
    let order_id = OrderId::new(id);
    let receipt = state.api().receipt(&order_id).await?;

    let content_type = HeaderValue::from_str(&receipt.content_type)
        .map_err(|e| AppError::Internal(format!("invalid receipt content type: {e}")))?;
    let disposition = receipt
        .content_disposition
        .as_deref()
        .and_then(|value| HeaderValue::from_str(value).ok())
        .or_else(|| {
            HeaderValue::from_str(&format!(
                "inline; filename=\"receipt_{}.pdf\"",
                order_id.as_str().replace('"', "")
            ))
            .ok()
        });

    let mut response = Response::new(Body::from(receipt.bytes));
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, content_type);
    if let Some(disposition) = disposition {
        headers.insert(header::CONTENT_DISPOSITION, disposition);
    }
    Ok(response)
}
