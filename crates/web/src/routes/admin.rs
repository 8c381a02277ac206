//! Admin route handlers.
//!
//! `/admin` shows the login form until an admin session exists, then the
//! dashboard: summary statistics, the monthly orders chart and every order.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use laundry_core::OrderId;

use super::{backend_message, page_context};
use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::forms::LoginForm;
use crate::middleware::{OptionalSession, RequireAdmin, clear_current_session, set_current_session};
use crate::models::{CurrentSession, Flash, set_flash};
use crate::state::AppState;
use crate::views::{ChartView, ListState, OrderRow, PageContext, SummaryView};

const ACCESS_DENIED: &str = "❌ Access denied. Only admins are allowed.";

/// Seconds before the dashboard reloads after an order is completed.
pub const RELOAD_AFTER_SECS: u32 = 1;

// =============================================================================
// Templates
// =============================================================================

/// Admin login template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/login.html")]
pub struct AdminLoginTemplate {
    pub page: PageContext,
    pub error: Option<String>,
    pub username: String,
}

/// Admin dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/index.html")]
pub struct AdminDashboardTemplate {
    pub page: PageContext,
    pub summary: Option<SummaryView>,
    pub summary_error: Option<String>,
    pub chart: Option<ChartView>,
    pub chart_error: Option<String>,
    pub orders: ListState<OrderRow>,
}

/// Confirmation shown after an order is marked completed.
#[derive(Template, WebTemplate)]
#[template(path = "admin/completed.html")]
pub struct CompletedTemplate {
    pub page: PageContext,
    pub order_id: String,
    pub reload_after: u32,
}

// =============================================================================
// Helpers
// =============================================================================

async fn load_orders(state: &AppState) -> ListState<OrderRow> {
    ListState::from_result(
        state.api().all_orders().await,
        "❌ Failed to load orders.",
        |order| OrderRow::from(&order),
    )
}

/// Run the three dashboard fetches concurrently. Each section fails alone.
async fn dashboard(
    state: &AppState,
    session: &Session,
    current: &CurrentSession,
) -> AdminDashboardTemplate {
    let api = state.api();
    let (summary, counts, orders) = tokio::join!(
        api.admin_summary(),
        api.orders_per_month(),
        load_orders(state)
    );

    let (summary, summary_error) = match summary {
        Ok(summary) => (Some(SummaryView::from(&summary)), None),
        Err(e) => {
            tracing::warn!(error = %e, "Summary fetch failed");
            (None, Some("❌ Failed to load summary".to_string()))
        }
    };

    let (chart, chart_error) = match counts {
        Ok(counts) => (ChartView::from_counts(&counts), None),
        Err(e) => {
            tracing::warn!(error = %e, "Chart fetch failed");
            (None, Some("❌ Failed to load chart".to_string()))
        }
    };

    AdminDashboardTemplate {
        page: page_context(session, Some(current)).await,
        summary,
        summary_error,
        chart,
        chart_error,
        orders,
    }
}

/// Re-render the login form with an error.
async fn deny(
    session: &Session,
    username: String,
    message: String,
    status: StatusCode,
) -> Response {
    let template = AdminLoginTemplate {
        page: page_context(session, None).await,
        error: Some(message),
        username,
    };
    (status, template).into_response()
}

// =============================================================================
// Routes
// =============================================================================

/// Display the admin login form or, for an admin session, the dashboard.
#[instrument(skip(state, session, current))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    OptionalSession(current): OptionalSession,
) -> Response {
    match current.filter(CurrentSession::is_admin) {
        Some(admin) => dashboard(&state, &session, &admin).await.into_response(),
        None => AdminLoginTemplate {
            page: page_context(&session, None).await,
            error: None,
            username: String::new(),
        }
        .into_response(),
    }
}

/// Handle admin login. Only `admin` roles are accepted.
#[instrument(skip(state, session, form), fields(username = %form.username.trim()))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    let username = form.username.trim().to_owned();

    let credentials = match form.validate() {
        Ok(credentials) => credentials,
        Err(e) => {
            let status = StatusCode::UNPROCESSABLE_ENTITY;
            return Ok(deny(&session, username, e.to_string(), status).await);
        }
    };

    match state
        .api()
        .login(&credentials.username, &credentials.password)
        .await
    {
        Ok(response) if response.role.is_admin() => {
            let current = CurrentSession::from(response);
            set_current_session(&session, &current).await?;
            set_sentry_user(&current.user_id);
            tracing::info!(user_id = %current.user_id, "Admin login succeeded");
            Ok(Redirect::to("/admin").into_response())
        }
        Ok(_) => {
            tracing::warn!("Admin login rejected: not an admin");
            Ok(deny(&session, username, ACCESS_DENIED.to_string(), StatusCode::FORBIDDEN).await)
        }
        Err(e) if e.is_transport() => {
            tracing::warn!(error = %e, "Admin login failed");
            Ok(deny(
                &session,
                username,
                "Login failed. Check server/network.".to_string(),
                StatusCode::BAD_GATEWAY,
            )
            .await)
        }
        Err(e) => {
            tracing::warn!(error = %e, "Admin login failed");
            Ok(deny(&session, username, ACCESS_DENIED.to_string(), StatusCode::UNAUTHORIZED).await)
        }
    }
}

/// Handle admin logout.
pub async fn logout(session: Session) -> Result<Redirect> {
    clear_current_session(&session).await?;
    clear_sentry_user();
    Ok(Redirect::to("/admin"))
}

/// Mark a pending order completed.
///
/// Success shows a confirmation with the control disabled, then reloads the
/// dashboard. Failure returns to the dashboard with the server's detail.
#[instrument(skip(state, session, admin), fields(order_id = %id))]
pub async fn complete(
    State(state): State<AppState>,
    session: Session,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<String>,
) -> Result<Response> {
    let order_id = OrderId::new(id);

    match state.api().mark_completed(&order_id).await {
        Ok(_) => {
            tracing::info!(order_id = %order_id, "Order marked completed");
            let template = CompletedTemplate {
                page: page_context(&session, Some(&admin)).await,
                order_id: order_id.into_inner(),
                reload_after: RELOAD_AFTER_SECS,
            };
            Ok(template.into_response())
        }
        Err(e) => {
            tracing::warn!(order_id = %order_id, error = %e, "Mark completed failed");
            let detail = backend_message(&e, "Unknown error", "Error updating order status.");
            let message = if e.is_transport() {
                detail
            } else {
                format!("❌ Failed to mark order: {detail}")
            };
            set_flash(&session, Flash::error(message)).await?;
            Ok(Redirect::to("/admin").into_response())
        }
    }
}
