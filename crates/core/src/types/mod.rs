//! Core types for Laundry Desk.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod period;
pub mod price;
pub mod status;

pub use email::{Email, EmailError};
pub use id::*;
pub use period::{MonthFilter, PeriodError};
pub use price::Price;
pub use status::*;
