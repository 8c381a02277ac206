//! View models for templates.
//!
//! Pure transforms from backend types into display-ready structs. Nothing
//! here performs I/O.

pub mod admin;
pub mod notification;
pub mod order;

pub use admin::{ChartBar, ChartView, SummaryView};
pub use notification::NotificationView;
pub use order::OrderRow;

use crate::api::ApiError;
use crate::models::{CurrentSession, Flash};

/// Layout data every full page needs.
#[derive(Debug, Clone, Default)]
pub struct PageContext {
    pub flash: Option<Flash>,
    pub signed_in: bool,
    pub is_admin: bool,
}

impl PageContext {
    #[must_use]
    pub fn new(current: Option<&CurrentSession>, flash: Option<Flash>) -> Self {
        Self {
            flash,
            signed_in: current.is_some(),
            is_admin: current.is_some_and(CurrentSession::is_admin),
        }
    }
}

/// Render state of a fetched collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListState<T> {
    /// At least one item.
    Loaded(Vec<T>),
    /// Success with zero items; rendered as a single placeholder.
    Empty,
    /// The fetch failed; carries the message to show in place of the list.
    Failed(String),
}

impl<T> ListState<T> {
    /// Map a fetch result into a list state.
    pub fn from_result<U>(
        result: Result<Vec<U>, ApiError>,
        fallback: &str,
        map: impl FnMut(U) -> T,
    ) -> Self {
        match result {
            Ok(items) if items.is_empty() => Self::Empty,
            Ok(items) => Self::Loaded(items.into_iter().map(map).collect()),
            Err(e) => {
                tracing::warn!(error = %e, "List fetch failed");
                Self::Failed(fallback.to_string())
            }
        }
    }

    /// Number of rendered rows.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Loaded(rows) => rows.len(),
            Self::Empty | Self::Failed(_) => 0,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Loaded rows; empty for the other states.
    #[must_use]
    pub fn rows(&self) -> &[T] {
        match self {
            Self::Loaded(rows) => rows,
            Self::Empty | Self::Failed(_) => &[],
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            Self::Loaded(_) | Self::Empty => None,
        }
    }
}

/// One entry of a select box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: &'static str,
    pub selected: bool,
}

/// Options for a fixed list of values, marking `current` as selected.
#[must_use]
pub fn select_options(values: &[&'static str], current: &str) -> Vec<SelectOption> {
    let current = current.trim();
    values
        .iter()
        .map(|&value| SelectOption {
            value,
            selected: value.eq_ignore_ascii_case(current),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_collection() {
        let state: ListState<u32> = ListState::from_result(Ok(Vec::<u32>::new()), "x", |v| v);
        assert_eq!(state, ListState::Empty);
        assert!(state.is_empty());
    }

    #[test]
    fn test_loaded_collection_maps_items() {
        let state = ListState::from_result(Ok(vec![1_u32, 2]), "x", |v| v * 10);
        assert_eq!(state, ListState::Loaded(vec![10, 20]));
        assert_eq!(state.len(), 2);
    }

    #[test]
    fn test_failed_collection_uses_fallback() {
        let state: ListState<u32> = ListState::from_result(
            Err::<Vec<u32>, _>(ApiError::Decode("eof".to_string())),
            "⚠️ Failed to load orders.",
            |v| v,
        );
        assert_eq!(state, ListState::Failed("⚠️ Failed to load orders.".to_string()));
        assert_eq!(state.error(), Some("⚠️ Failed to load orders."));
        assert!(state.rows().is_empty());
    }

    #[test]
    fn test_select_options_marks_current() {
        let options = select_options(&["basic", "premium"], " Premium ");
        assert!(!options[0].selected);
        assert!(options[1].selected);
        assert!(select_options(&["basic"], "").iter().all(|o| !o.selected));
    }
}
