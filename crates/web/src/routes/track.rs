//! Order tracking route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use tower_sessions::Session;
use tracing::instrument;

use super::page_context;
use crate::api::{ApiError, Order};
use crate::filters;
use crate::forms::TrackQuery;
use crate::middleware::OptionalSession;
use crate::state::AppState;
use crate::views::{NotificationView, OrderRow, PageContext};

/// Outcome of a lookup.
#[derive(Debug, Clone)]
pub enum TrackResult {
    Found(OrderRow),
    NotFound(String),
    Failed(String),
}

impl TrackResult {
    #[must_use]
    pub const fn found(&self) -> Option<&OrderRow> {
        match self {
            Self::Found(row) => Some(row),
            Self::NotFound(_) | Self::Failed(_) => None,
        }
    }

    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::NotFound(message) | Self::Failed(message) => Some(message),
            Self::Found(_) => None,
        }
    }

    fn from_lookup(result: Result<Order, ApiError>, base: &url::Url) -> Self {
        match result {
            Ok(order) => Self::Found(OrderRow::from(&order).with_asset_base(base)),
            Err(e) if e.status().is_some() => {
                Self::NotFound(e.user_message("Order not found. Please check the ID."))
            }
            Err(e) => {
                tracing::warn!(error = %e, "Order lookup failed");
                Self::Failed("Something went wrong. Please try again later.".to_string())
            }
        }
    }
}

/// Track page template.
#[derive(Template, WebTemplate)]
#[template(path = "track/index.html")]
pub struct TrackTemplate {
    pub page: PageContext,
    pub order_id: String,
    pub result: Option<TrackResult>,
    pub validation_error: Option<String>,
    pub latest: Option<NotificationView>,
}

/// Display the track page, performing a lookup when `order_id` is present.
#[instrument(skip(state, session, current))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    OptionalSession(current): OptionalSession,
    Query(query): Query<TrackQuery>,
) -> impl IntoResponse {
    let api = state.api();
    let order_id = query.order_id.as_deref().unwrap_or_default().trim().to_owned();

    let (lookup, validation_error) = match query.validate() {
        Ok(id) => (id, None),
        Err(e) => (None, Some(e.to_string())),
    };

    let lookup_future = async {
        match lookup {
            Some(id) => Some(TrackResult::from_lookup(api.order(&id).await, api.base_url())),
            None => None,
        }
    };
    let latest_future = async {
        let current = current.as_ref()?;
        match api.notifications(&current.user_id).await {
            Ok(feed) => NotificationView::latest(&feed),
            Err(e) => {
                tracing::warn!(error = %e, "Notification fetch failed");
                None
            }
        }
    };

    let (result, latest) = tokio::join!(lookup_future, latest_future);

    TrackTemplate {
        page: page_context(&session, current.as_ref()).await,
        order_id,
        result,
        validation_error,
        latest,
    }
}
