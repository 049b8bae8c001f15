//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `KASUWA_API_URL` - Origin of the marketplace API (e.g., `https://api.kasuwa.ng/v1`)
//!
//! ## Optional
//! - `KASUWA_REQUEST_TIMEOUT_SECS` - Per-request timeout in seconds (default: 30)
//! - `KASUWA_USER_AGENT` - User agent sent with every request (default: `kasuwa/<version>`)
//! - `KASUWA_SESSION_FILE` - Where the CLI keeps the session token (default: `.kasuwa-session`)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_TIMEOUT_SECS: &str = "30";
const DEFAULT_SESSION_FILE: &str = ".kasuwa-session";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Marketplace client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base address every endpoint path is joined onto (always ends in `/`)
    pub api_url: Url,
    /// Per-request timeout
    pub timeout: Duration,
    /// User agent header value
    pub user_agent: String,
    /// Session token file used by the CLI
    pub session_file: PathBuf,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let raw_url = lookup("KASUWA_API_URL")
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar("KASUWA_API_URL".to_string()))?;
        let api_url = parse_base_url(&raw_url)?;

        let timeout_raw = lookup("KASUWA_REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|| DEFAULT_TIMEOUT_SECS.to_string());
        let timeout_secs = timeout_raw
            .trim()
            .parse::<u64>()
            .ok()
            .filter(|secs| *secs > 0)
            .ok_or_else(|| {
                ConfigError::InvalidEnvVar(
                    "KASUWA_REQUEST_TIMEOUT_SECS".to_string(),
                    format!("expected a positive number of seconds, got '{timeout_raw}'"),
                )
            })?;

        let user_agent = lookup("KASUWA_USER_AGENT")
            .unwrap_or_else(|| format!("kasuwa/{}", env!("CARGO_PKG_VERSION")));
        let session_file = PathBuf::from(
            lookup("KASUWA_SESSION_FILE").unwrap_or_else(|| DEFAULT_SESSION_FILE.to_string()),
        );

        Ok(Self {
            api_url,
            timeout: Duration::from_secs(timeout_secs),
            user_agent,
            session_file,
        })
    }
}

/// Parse the API origin, keeping any base path intact for relative joins.
fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidEnvVar("KASUWA_API_URL".to_string(), reason);

    let mut url = Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::from_lookup(lookup(&[("KASUWA_API_URL", "https://api.kasuwa.ng")]))
            .unwrap();
        assert_eq!(config.api_url.as_str(), "https://api.kasuwa.ng/");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.user_agent.starts_with("kasuwa/"));
        assert_eq!(config.session_file, PathBuf::from(".kasuwa-session"));
    }

    #[test]
    fn test_base_path_gets_trailing_slash() {
        let config =
            ClientConfig::from_lookup(lookup(&[("KASUWA_API_URL", "https://api.kasuwa.ng/v1")]))
                .unwrap();
        assert_eq!(config.api_url.as_str(), "https://api.kasuwa.ng/v1/");
        assert_eq!(
            config.api_url.join("products").unwrap().as_str(),
            "https://api.kasuwa.ng/v1/products"
        );
    }

    #[test]
    fn test_missing_url() {
        let err = ClientConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(ref key) if key == "KASUWA_API_URL"));
    }

    #[test]
    fn test_rejects_non_http_scheme() {
        let err = ClientConfig::from_lookup(lookup(&[("KASUWA_API_URL", "ftp://kasuwa.ng")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let err = ClientConfig::from_lookup(lookup(&[
            ("KASUWA_API_URL", "http://localhost:8080"),
            ("KASUWA_REQUEST_TIMEOUT_SECS", "0"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "KASUWA_REQUEST_TIMEOUT_SECS"));
    }
}
