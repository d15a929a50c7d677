//! Dashboard API key authentication
//!
//! Session-scoped callers present the public (anon) key in the `apikey`
//! header. Browser WebSockets cannot set headers, so `?apikey=` in the
//! query string is accepted as well.

use axum::{
    extract::{Query, Request, State},
    middleware::Next,
    response::Response,
};
use http::Uri;
use serde::Deserialize;
use shared::error::{AppError, ErrorCode};

use crate::state::AppState;

pub const API_KEY_HEADER: &str = "apikey";

/// Reject requests that do not carry the configured anon key
pub async fn api_key_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let presented = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .or_else(|| query_api_key(request.uri()));

    let Some(key) = presented else {
        tracing::debug!(path = %request.uri().path(), "Missing API key");
        return Err(AppError::not_authenticated());
    };

    if key != *state.anon_key {
        tracing::warn!(path = %request.uri().path(), "Invalid API key");
        return Err(AppError::new(ErrorCode::ApiKeyInvalid));
    }

    Ok(next.run(request).await)
}

#[derive(Deserialize)]
struct ApiKeyQuery {
    apikey: Option<String>,
}

fn query_api_key(uri: &Uri) -> Option<String> {
    Query::<ApiKeyQuery>::try_from_uri(uri).ok()?.0.apikey
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_api_key() {
        let uri: Uri = "/api/realtime?table=rooms&apikey=abc%2B1".parse().unwrap();
        assert_eq!(query_api_key(&uri).as_deref(), Some("abc+1"));

        let uri: Uri = "/api/realtime?table=rooms".parse().unwrap();
        assert_eq!(query_api_key(&uri), None);

        let uri: Uri = "/api/rooms".parse().unwrap();
        assert_eq!(query_api_key(&uri), None);
    }
}
