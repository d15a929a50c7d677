//! autopilot-server - hotel operations backend
//!
//! - Receives reservation events from the channel manager (`POST /webhook`)
//! - Serves a provider-style reservation feed (`GET /api/cloudbeds/reservations`)
//! - Provides the dashboard CRUD API and realtime change feed (anon key)

pub mod api;
pub mod auth;
pub mod config;
pub mod live;
pub mod state;
pub mod store;
pub mod webhook;

pub use api::create_router;
pub use config::Config;
pub use state::AppState;
