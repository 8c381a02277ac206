//! Integration tests for the Laundry Desk web front end.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p laundry-integration-tests
//! ```
//!
//! Every test starts its own [`FakeBackend`] (an axum server on an ephemeral
//! port that records every call) and points the real web router at it,
//! either in-process through `tower::ServiceExt::oneshot` or served on a
//! second port and driven by a cookie-keeping `reqwest` client ([`TestApp`]).
//!
//! # Test Categories
//!
//! - `pages` - Single requests: health, headers, access control, tracking
//! - `auth` - Login, registration, logout
//! - `orders` - Request submission, history, cancellation, feedback, receipts
//! - `admin` - Admin login, dashboard sections, completing orders

#![allow(clippy::expect_used, clippy::missing_panics_doc)]

pub mod app;
pub mod backend;

pub use app::{TestApp, location};
pub use backend::{BackendData, FakeBackend, FakeOrder, FakeUser, Hit};
