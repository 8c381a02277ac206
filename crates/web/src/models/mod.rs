//! Session-stored models.

pub mod flash;
pub mod session;

pub use flash::{Flash, FlashKind, set_flash, take_flash};
pub use session::{CurrentSession, keys as session_keys};
