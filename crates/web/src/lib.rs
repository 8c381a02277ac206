//! Laundry Desk web front end.
//!
//! A server-rendered front end for the laundry backend. The browser only
//! talks to this crate; every page is rendered after the backend calls it
//! needs have completed.
//!
//! # Architecture
//!
//! - Axum web framework, Askama templates for server-side rendering
//! - `reqwest` client for the laundry backend ([`api::LaundryClient`])
//! - tower-sessions in-memory store for login state and flash messages
//!
//! The library exposes [`app`] so the full router can be exercised in tests.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod error;
pub mod filters;
pub mod forms;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;
pub mod views;

use axum::{Router, http::Request, middleware::from_fn, middleware::from_fn_with_state};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::state::AppState;

/// Directory holding `main.css`.
pub const STATIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/static");

/// Build the full application router with its middleware stack.
pub fn app(state: AppState) -> Router {
    let session_layer = middleware::create_session_layer(state.config());

    Router::new()
        .merge(routes::routes())
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .layer(from_fn_with_state(
            state.clone(),
            middleware::security_headers_middleware,
        ))
        .layer(session_layer)
        .layer(from_fn(middleware::request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                )
            }),
        )
        .with_state(state)
}
