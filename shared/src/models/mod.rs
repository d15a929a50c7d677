//! Data models
//!
//! Shared between the server, the client and the dashboard.
//! All IDs are opaque strings (UUIDs assigned by the store).

pub mod housekeeping;
pub mod reservation;
pub mod room;

// Re-exports
pub use housekeeping::*;
pub use reservation::*;
pub use room::*;
