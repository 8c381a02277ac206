//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::IntoResponse;
use tower_sessions::Session;

use super::page_context;
use crate::filters;
use crate::middleware::OptionalSession;
use crate::views::PageContext;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub page: PageContext,
}

/// Display the home page.
pub async fn home(
    OptionalSession(current): OptionalSession,
    session: Session,
) -> impl IntoResponse {
    HomeTemplate {
        page: page_context(&session, current.as_ref()).await,
    }
}
