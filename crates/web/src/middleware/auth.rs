//! Authentication extractors.
//!
//! Handlers never look up session keys directly: they take one of
//! [`RequireUser`], [`RequireAdmin`] or [`OptionalSession`].

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::models::{CurrentSession, session_keys};

/// Extractor that requires a logged-in user of any role.
///
/// Page requests without a session are redirected to the login page.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(RequireUser(current): RequireUser) -> impl IntoResponse {
///     format!("Hello, {}!", current.user_id)
/// }
/// ```
pub struct RequireUser(pub CurrentSession);

/// Extractor that requires a session whose role is admin.
///
/// Rejected requests are sent to `/admin`, which shows the admin login form.
pub struct RequireAdmin(pub CurrentSession);

/// Returned when a protected route is hit without a matching session.
/// Carries the login page to redirect to.
#[derive(Debug)]
pub struct AuthRejection(&'static str);

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        Redirect::to(self.0).into_response()
    }
}

/// Read the stored identity, treating a store failure as "not logged in".
async fn current_session(parts: &Parts) -> Option<CurrentSession> {
    let session = parts.extensions.get::<Session>()?;
    match session
        .get::<CurrentSession>(session_keys::CURRENT_SESSION)
        .await
    {
        Ok(current) => current,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read session");
            None
        }
    }
}

impl<S> FromRequestParts<S> for RequireUser
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        current_session(parts)
            .await
            .map(Self)
            .ok_or(AuthRejection("/auth/login"))
    }
}

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        current_session(parts)
            .await
            .filter(CurrentSession::is_admin)
            .map(Self)
            .ok_or(AuthRejection("/admin"))
    }
}

/// Extractor that optionally gets the current session.
///
/// Unlike [`RequireUser`], this never rejects the request.
pub struct OptionalSession(pub Option<CurrentSession>);

impl<S> FromRequestParts<S> for OptionalSession
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(current_session(parts).await))
    }
}

/// Store the identity returned by a successful login.
///
/// The session ID is cycled first so a pre-login ID cannot be reused.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_session(
    session: &Session,
    current: &CurrentSession,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(session_keys::CURRENT_SESSION, current).await
}

/// Remove every session field (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_session(
    session: &Session,
) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use axum::http::{Request, StatusCode};
    use laundry_core::{Role, UserId};
    use tower_sessions::MemoryStore;

    use super::*;

    fn parts_with(session: Option<Session>) -> Parts {
        let (mut parts, ()) = Request::builder()
            .uri("/orders")
            .body(())
            .unwrap()
            .into_parts();
        if let Some(session) = session {
            parts.extensions.insert(session);
        }
        parts
    }

    fn new_session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    fn current(role: Role) -> CurrentSession {
        CurrentSession {
            user_id: UserId::new("u1"),
            role,
            plan: Some("basic".to_string()),
        }
    }

    #[tokio::test]
    async fn test_require_user_redirects_without_session() {
        let mut parts = parts_with(Some(new_session()));
        let rejection = RequireUser::from_request_parts(&mut parts, &())
            .await
            .err()
            .unwrap();
        let response = rejection.into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()["location"], "/auth/login");
    }

    #[tokio::test]
    async fn test_missing_session_layer_redirects() {
        let mut parts = parts_with(None);
        let rejection = RequireUser::from_request_parts(&mut parts, &())
            .await
            .err()
            .unwrap();
        assert_eq!(rejection.into_response().headers()["location"], "/auth/login");
    }

    #[tokio::test]
    async fn test_require_admin_rejects_user_role() {
        let session = new_session();
        set_current_session(&session, &current(Role::User))
            .await
            .unwrap();
        let mut parts = parts_with(Some(session));

        assert!(RequireUser::from_request_parts(&mut parts, &()).await.is_ok());
        let rejection = RequireAdmin::from_request_parts(&mut parts, &())
            .await
            .err()
            .unwrap();
        assert_eq!(rejection.into_response().headers()["location"], "/admin");
    }

    #[tokio::test]
    async fn test_require_admin_accepts_admin_role() {
        let session = new_session();
        set_current_session(&session, &current(Role::Admin))
            .await
            .unwrap();
        let mut parts = parts_with(Some(session));

        let RequireAdmin(admin) = RequireAdmin::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert_eq!(admin.user_id.as_str(), "u1");
    }

    #[tokio::test]
    async fn test_clear_removes_identity() {
        let session = new_session();
        set_current_session(&session, &current(Role::User))
            .await
            .unwrap();
        clear_current_session(&session).await.unwrap();
        let mut parts = parts_with(Some(session));

        let OptionalSession(current) = OptionalSession::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert!(current.is_none());
    }
}
