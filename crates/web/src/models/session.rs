//! Session-related types.
//!
//! Types stored in the session for authentication state.

use serde::{Deserialize, Serialize};

use laundry_core::{Role, UserId};

use crate::api::LoginResponse;

/// Session-stored identity.
///
/// Written only from a successful backend login response, so the role
/// cannot be supplied by the browser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentSession {
    /// Backend user ID.
    pub user_id: UserId,
    /// Role reported by the backend at login.
    pub role: Role,
    /// Subscription plan, if the backend returned one.
    pub plan: Option<String>,
}

impl CurrentSession {
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Plan name, ignoring blank values.
    #[must_use]
    pub fn plan(&self) -> Option<&str> {
        self.plan.as_deref().filter(|plan| !plan.trim().is_empty())
    }
}

impl From<LoginResponse> for CurrentSession {
    fn from(login: LoginResponse) -> Self {
        Self {
            user_id: login.user_id,
            role: login.role,
            plan: login.plan,
        }
    }
}

/// Session keys.
pub mod keys {
    /// Key for the logged-in identity.
    pub const CURRENT_SESSION: &str = "current_session";

    /// Key for the one-shot flash message.
    pub const FLASH: &str = "flash";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_login_response() {
        let session = CurrentSession::from(LoginResponse {
            user_id: UserId::new("u1"),
            role: Role::Admin,
            plan: Some("premium".to_string()),
            message: None,
        });
        assert!(session.is_admin());
        assert_eq!(session.plan(), Some("premium"));
    }

    #[test]
    fn test_blank_plan_is_missing() {
        let session = CurrentSession {
            user_id: UserId::new("u2"),
            role: Role::User,
            plan: Some("  ".to_string()),
        };
        assert_eq!(session.plan(), None);
        assert!(!session.is_admin());
    }
}
