//! Client configuration

use crate::{ClientError, ClientResult};

/// Client configuration for connecting to autopilot-server
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server base URL (e.g., "http://localhost:8080")
    pub base_url: String,

    /// Public key sent in the `apikey` header
    pub anon_key: String,

    /// Request timeout in seconds
    pub timeout: u64,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            anon_key: anon_key.into(),
            timeout: 30,
        }
    }

    /// Load from `AUTOPILOT_URL`, `AUTOPILOT_ANON_KEY` and `AUTOPILOT_TIMEOUT_SECS`
    pub fn from_env() -> ClientResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ClientResult<Self> {
        let var = |name: &str| lookup(name).filter(|v| !v.is_empty());
        let require =
            |name: &str| var(name).ok_or_else(|| ClientError::Config(format!("{name} must be set")));

        let mut config = Self::new(require("AUTOPILOT_URL")?, require("AUTOPILOT_ANON_KEY")?);
        if let Some(timeout) = var("AUTOPILOT_TIMEOUT_SECS") {
            config.timeout = timeout.parse().map_err(|_| {
                ClientError::Config(format!("AUTOPILOT_TIMEOUT_SECS is not a number: {timeout}"))
            })?;
        }
        Ok(config)
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Create an HTTP client from this configuration
    pub fn build_http_client(&self) -> ClientResult<super::HttpClient> {
        super::HttpClient::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> ClientResult<ClientConfig> {
        let map: HashMap<&str, &str> = vars.iter().copied().collect();
        ClientConfig::from_lookup(|name| map.get(name).map(|v| v.to_string()))
    }

    #[test]
    fn test_from_lookup() {
        let config = load(&[
            ("AUTOPILOT_URL", "http://hotel.local"),
            ("AUTOPILOT_ANON_KEY", "anon"),
            ("AUTOPILOT_TIMEOUT_SECS", "5"),
        ])
        .unwrap();
        assert_eq!(config.base_url, "http://hotel.local");
        assert_eq!(config.timeout, 5);
    }

    #[test]
    fn test_missing_required() {
        let err = load(&[("AUTOPILOT_URL", "http://hotel.local")]).unwrap_err();
        assert!(err.to_string().contains("AUTOPILOT_ANON_KEY must be set"));

        let err = load(&[
            ("AUTOPILOT_URL", "http://hotel.local"),
            ("AUTOPILOT_ANON_KEY", "anon"),
            ("AUTOPILOT_TIMEOUT_SECS", "soon"),
        ])
        .unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));
    }
}
