//! Status and role enums.

use serde::{Deserialize, Deserializer, Serialize};

/// Lifecycle status of a laundry order.
///
/// The backend stores these as capitalised strings. Orders without a status
/// are treated as `Pending`. Unrecognised labels decode as `Unknown`, which
/// allows no actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
pub enum OrderStatus {
    #[default]
    Pending,
    Completed,
    Cancelled,
    Unknown,
}

impl OrderStatus {
    /// Display label as the backend spells it.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
            Self::Unknown => "Unknown",
        }
    }

    /// Lenient reading of a backend status: blank or missing is `Pending`,
    /// case is ignored, anything unrecognised is `Unknown`.
    #[must_use]
    pub fn from_backend(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") => Self::Pending,
            Some(label) => label.parse().unwrap_or(Self::Unknown),
        }
    }

    /// CSS class used to colour the status label.
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Pending => "status-pending",
            Self::Completed => "status-completed",
            Self::Cancelled => "status-cancelled",
            Self::Unknown => "status-unknown",
        }
    }

    /// Only pending orders can be cancelled by their owner.
    #[must_use]
    pub const fn is_cancellable(self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Only pending orders can be marked completed by an admin.
    #[must_use]
    pub const fn is_completable(self) -> bool {
        matches!(self, Self::Pending)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for OrderStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(Self::from_backend(raw.as_deref()))
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            "cancelled" | "canceled" => Ok(Self::Cancelled),
            _ => Err(format!("invalid order status: {s}")),
        }
    }
}

/// Account role returned by the backend on login.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Regular customer placing orders.
    #[default]
    User,
    /// Staff member managing all orders.
    Admin,
}

impl Role {
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            _ => Err(format!("invalid role: {s}")),
        }
    }
}
