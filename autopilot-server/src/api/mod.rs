//! API routes for autopilot-server

pub mod cloudbeds;
pub mod health;
pub mod housekeeping;
pub mod realtime;
pub mod reservations;
pub mod rooms;
mod validate;
pub mod webhook;

use crate::auth::api_key_middleware;
use crate::state::AppState;
use axum::routing::{get, post, put};
use axum::{Router, middleware};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Create the combined router
pub fn create_router(state: AppState) -> Router {
    // Provider webhook (unauthenticated, raw body)
    let webhook = Router::new()
        .route("/webhook", post(webhook::handle_webhook))
        .route("/api/webhook/cloudbeds", post(webhook::handle_webhook));

    // Provider-style reservation feed (unauthenticated)
    let provider = Router::new().route(
        "/api/cloudbeds/reservations",
        get(cloudbeds::list_reservations),
    );

    // Dashboard API (anon key)
    let dashboard = Router::new()
        .route("/api/rooms", get(rooms::list).post(rooms::create))
        .route("/api/rooms/{id}", put(rooms::update).delete(rooms::delete))
        .route(
            "/api/reservations",
            get(reservations::list).post(reservations::create),
        )
        .route(
            "/api/reservations/{id}",
            put(reservations::update).delete(reservations::delete),
        )
        .route(
            "/api/housekeeping",
            get(housekeeping::list).post(housekeeping::create),
        )
        .route(
            "/api/housekeeping/{id}",
            put(housekeeping::update).delete(housekeeping::delete),
        )
        .route("/api/realtime", get(realtime::handle_realtime_ws))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api_key_middleware,
        ));

    Router::new()
        .route("/health", get(health::health_check))
        .merge(webhook)
        .merge(provider)
        .merge(dashboard)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
