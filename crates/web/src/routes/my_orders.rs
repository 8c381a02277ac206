//! Simple order list backed by the older `my-orders` endpoint.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tower_sessions::Session;
use tracing::instrument;

use super::page_context;
use crate::filters;
use crate::middleware::RequireUser;
use crate::state::AppState;
use crate::views::{ListState, OrderRow, PageContext};

/// Simple order list template.
#[derive(Template, WebTemplate)]
#[template(path = "my_orders.html")]
pub struct MyOrdersTemplate {
    pub page: PageContext,
    pub lines: ListState<String>,
}

/// Display one line per order.
#[instrument(skip(state, session, current), fields(user_id = %current.user_id))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    RequireUser(current): RequireUser,
) -> impl IntoResponse {
    let lines = ListState::from_result(
        state.api().my_orders(&current.user_id).await,
        "Could not load orders. Please try again.",
        |order| OrderRow::from(&order).summary_line(),
    );

    MyOrdersTemplate {
        page: page_context(&session, Some(&current)).await,
        lines,
    }
}
