//! Laundry Desk Core - Shared domain types.
//!
//! This crate provides the types used across the Laundry Desk components:
//! - `web` - Server-rendered customer and admin front end
//! - `cli` - Command-line access to the laundry backend
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no HTTP clients.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices, emails, statuses and
//!   order-history periods

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
