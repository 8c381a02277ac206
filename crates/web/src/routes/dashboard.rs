//! User dashboard route handlers.
//!
//! The dashboard shows the user's plan, the order request form, the list of
//! their requests and a banner of completed orders.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Multipart, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use laundry_core::MonthFilter;

use super::{backend_message, page_context};
use crate::error::Result;
use crate::filters;
use crate::forms::{EstimateQuery, OrderRequestForm};
use crate::middleware::{RequireUser, clear_current_session};
use crate::models::{CurrentSession, Flash, set_flash};
use crate::state::AppState;
use crate::views::{
    ListState, NotificationView, OrderRow, PageContext, SelectOption, select_options,
};

/// Time slots offered for pickup.
pub const PICKUP_SLOTS: [&str; 4] = ["7-9 AM", "9-11 AM", "4-6 PM", "6-8 PM"];

/// Accepted payment methods.
pub const PAYMENT_METHODS: [&str; 3] = ["Cash", "UPI", "Card"];

// =============================================================================
// Templates
// =============================================================================

/// Dashboard page template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard/index.html")]
pub struct DashboardTemplate {
    pub page: PageContext,
    pub plan: String,
    pub draft: EstimateQuery,
    pub estimate: Option<String>,
    pub requests: ListState<OrderRow>,
    pub notifications: Vec<NotificationView>,
}

impl DashboardTemplate {
    #[must_use]
    pub fn pickup_slots(&self) -> Vec<SelectOption> {
        select_options(&PICKUP_SLOTS, &self.draft.pickup_time_slot)
    }

    #[must_use]
    pub fn payment_methods(&self) -> Vec<SelectOption> {
        select_options(&PAYMENT_METHODS, &self.draft.payment_method)
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Plan of a usable dashboard session.
///
/// A session without a plan is cleared and sent back to the login page.
async fn require_plan(session: &Session, current: &CurrentSession) -> Result<Option<String>> {
    if let Some(plan) = current.plan() {
        return Ok(Some(plan.to_owned()));
    }
    clear_current_session(session).await?;
    set_flash(session, Flash::error("Session expired. Please login again.")).await?;
    Ok(None)
}

/// Fetch the user's requests as rows.
async fn load_requests(state: &AppState, current: &CurrentSession) -> ListState<OrderRow> {
    let base = state.api().base_url().clone();
    ListState::from_result(
        state
            .api()
            .order_history(&current.user_id, MonthFilter::default())
            .await,
        "Error fetching requests.",
        |order| OrderRow::from(&order).with_asset_base(&base),
    )
}

/// Fetch requests and notifications together and render the page.
async fn render(
    state: &AppState,
    session: &Session,
    current: &CurrentSession,
    plan: String,
    draft: EstimateQuery,
    estimate: Option<String>,
) -> DashboardTemplate {
    let (requests, notifications) = tokio::join!(
        load_requests(state, current),
        state.api().notifications(&current.user_id)
    );

    let notifications = match notifications {
        Ok(feed) => NotificationView::completed(&feed),
        Err(e) => {
            tracing::warn!(error = %e, "Notification fetch failed");
            Vec::new()
        }
    };

    DashboardTemplate {
        page: page_context(session, Some(current)).await,
        plan,
        draft,
        estimate,
        requests,
        notifications,
    }
}

// =============================================================================
// Routes
// =============================================================================

/// Display the dashboard.
#[instrument(skip(state, session, current), fields(user_id = %current.user_id))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    RequireUser(current): RequireUser,
) -> Result<Response> {
    let Some(plan) = require_plan(&session, &current).await? else {
        return Ok(Redirect::to("/auth/login").into_response());
    };

    Ok(render(&state, &session, &current, plan, EstimateQuery::default(), None)
        .await
        .into_response())
}

/// Display the dashboard with a price estimate for the submitted item.
#[instrument(skip(state, session, current, draft), fields(user_id = %current.user_id))]
pub async fn estimate(
    State(state): State<AppState>,
    session: Session,
    RequireUser(current): RequireUser,
    Query(draft): Query<EstimateQuery>,
) -> Result<Response> {
    let Some(plan) = require_plan(&session, &current).await? else {
        return Ok(Redirect::to("/auth/login").into_response());
    };

    let message = match draft.validate() {
        Err(_) => "Enter valid item and quantity.".to_string(),
        Ok((item_type, quantity)) => {
            match state.api().estimate_price(&item_type, quantity).await {
                Ok(estimate) => format!("Estimated Cost: {}", estimate.estimated_price),
                Err(e) if e.status().is_some() => "Pricing not found.".to_string(),
                Err(e) => {
                    tracing::warn!(error = %e, "Price estimate failed");
                    "Error calculating price.".to_string()
                }
            }
        }
    };

    Ok(render(&state, &session, &current, plan, draft, Some(message))
        .await
        .into_response())
}

/// Handle an order request submission.
///
/// Validation failures make no backend call.
#[instrument(skip(state, session, current, multipart), fields(user_id = %current.user_id))]
pub async fn submit_request(
    State(state): State<AppState>,
    session: Session,
    RequireUser(current): RequireUser,
    multipart: Multipart,
) -> Result<Redirect> {
    let request = match OrderRequestForm::from_multipart(multipart)
        .await
        .and_then(|form| form.validate(current.user_id.clone()))
    {
        Ok(request) => request,
        Err(e) => {
            set_flash(&session, Flash::error(e.to_string())).await?;
            return Ok(Redirect::to("/dashboard"));
        }
    };

    let flash = match state.api().submit_order(request).await {
        Ok(response) => {
            tracing::info!(order_id = %response.order_id, "Order request submitted");
            Flash::success(format!("Request submitted! Order ID: {}", response.order_id))
        }
        Err(e) => {
            tracing::warn!(error = %e, "Order request failed");
            Flash::error(backend_message(
                &e,
                "Request submission failed.",
                "Something went wrong while submitting.",
            ))
        }
    };

    set_flash(&session, flash).await?;
    Ok(Redirect::to("/dashboard"))
}
