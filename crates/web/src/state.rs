//! Application state shared across handlers.

use std::sync::Arc;

use crate::api::{ApiError, LaundryClient};
use crate::config::WebConfig;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// configuration and the laundry backend client.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: WebConfig,
    api: LaundryClient,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend client cannot be built from the
    /// configured base URL.
    pub fn new(config: WebConfig) -> Result<Self, ApiError> {
        let api = LaundryClient::new(&config.api)?;

        Ok(Self {
            inner: Arc::new(AppStateInner { config, api }),
        })
    }

    /// Get a reference to the web configuration.
    #[must_use]
    pub fn config(&self) -> &WebConfig {
        &self.inner.config
    }

    /// Get a reference to the laundry backend client.
    #[must_use]
    pub fn api(&self) -> &LaundryClient {
        &self.inner.api
    }
}
