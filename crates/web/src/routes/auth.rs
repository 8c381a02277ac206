//! Authentication route handlers.
//!
//! Login and registration are forwarded to the laundry backend. A successful
//! login stores the returned identity in the server-side session.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use super::{backend_message, page_context};
use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::forms::{LoginForm, RegisterForm};
use crate::middleware::{OptionalSession, clear_current_session, set_current_session};
use crate::models::{CurrentSession, Flash, set_flash};
use crate::state::AppState;
use crate::views::{PageContext, SelectOption, select_options};

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub page: PageContext,
    pub error: Option<String>,
    pub username: String,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub page: PageContext,
    pub error: Option<String>,
    pub username: String,
    pub email: String,
    pub phone: String,
    pub plan: String,
}

/// Subscription plans offered at registration.
pub const PLANS: [&str; 3] = ["basic", "standard", "premium"];

impl RegisterTemplate {
    fn refill(page: PageContext, form: &RegisterForm, error: String) -> Self {
        Self {
            page,
            error: Some(error),
            username: form.username.trim().to_owned(),
            email: form.email.trim().to_owned(),
            phone: form.phone.trim().to_owned(),
            plan: form.plan.trim().to_owned(),
        }
    }

    /// Plans for the select box.
    #[must_use]
    pub fn plans(&self) -> Vec<SelectOption> {
        select_options(&PLANS, &self.plan)
    }
}

/// Where a logged-in identity lands.
const fn home_for(current: &CurrentSession) -> &'static str {
    if current.is_admin() {
        "/admin"
    } else {
        "/dashboard"
    }
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
pub async fn login_page(
    OptionalSession(current): OptionalSession,
    session: Session,
) -> Response {
    if let Some(current) = &current {
        return Redirect::to(home_for(current)).into_response();
    }

    LoginTemplate {
        page: page_context(&session, None).await,
        error: None,
        username: String::new(),
    }
    .into_response()
}

/// Handle login form submission.
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
            let template = LoginTemplate {
                page: page_context(&session, None).await,
                error: Some(e.to_string()),
                username,
            };
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, template).into_response());
        }
    };

    match state
        .api()
        .login(&credentials.username, &credentials.password)
        .await
    {
        Ok(response) => {
            let current = CurrentSession::from(response);
            set_current_session(&session, &current).await?;
            set_sentry_user(&current.user_id);
            tracing::info!(user_id = %current.user_id, role = %current.role, "Login succeeded");
            Ok(Redirect::to(home_for(&current)).into_response())
        }
        Err(e) => {
            tracing::warn!(error = %e, "Login failed");
            let template = LoginTemplate {
                page: page_context(&session, None).await,
                error: Some(backend_message(
                    &e,
                    "Login failed.",
                    "Server error. Try again.",
                )),
                username,
            };
            Ok((StatusCode::UNAUTHORIZED, template).into_response())
        }
    }
}

// =============================================================================
// Registration Routes
// =============================================================================

/// Display the registration page.
pub async fn register_page(
    OptionalSession(current): OptionalSession,
    session: Session,
) -> Response {
    if let Some(current) = &current {
        return Redirect::to(home_for(current)).into_response();
    }

    RegisterTemplate {
        page: page_context(&session, None).await,
        error: None,
        username: String::new(),
        email: String::new(),
        phone: String::new(),
        plan: String::new(),
    }
    .into_response()
}

/// Handle registration form submission.
///
/// New accounts are always regular users.
#[instrument(skip(state, session, form), fields(username = %form.username.trim()))]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> Result<Response> {
    let account = match form.validate() {
        Ok(account) => account,
        Err(e) => {
            let page = page_context(&session, None).await;
            let template = RegisterTemplate::refill(page, &form, e.to_string());
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, template).into_response());
        }
    };

    match state.api().register(&account).await {
        Ok(_) => {
            tracing::info!("Registration succeeded");
            set_flash(
                &session,
                Flash::success("Registration successful. Please login."),
            )
            .await?;
            Ok(Redirect::to("/auth/login").into_response())
        }
        Err(e) => {
            tracing::warn!(error = %e, "Registration failed");
            let page = page_context(&session, None).await;
            let message = backend_message(&e, "Registration failed.", "Server error. Try again.");
            let template = RegisterTemplate::refill(page, &form, message);
            Ok((StatusCode::BAD_REQUEST, template).into_response())
        }
    }
}

// =============================================================================
// Logout
// =============================================================================

/// Handle logout. Clears every session field.
pub async fn logout(session: Session) -> Result<Redirect> {
    clear_current_session(&session).await?;
    clear_sentry_user();
    Ok(Redirect::to("/"))
}
