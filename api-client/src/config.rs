// Client configuration

use std::env;
use std::time::Duration;

/// Default PDFShift API base URL
pub const DEFAULT_API_BASE: &str = "https://api.pdfshift.io/v2";

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "PDFSHIFT_API_KEY";

/// Environment variable overriding the API base URL
pub const API_BASE_ENV: &str = "PDFSHIFT_API_BASE";

/// Credential and endpoint settings for one client
#[derive(Clone, Default)]
pub struct ClientConfig {
    /// API key, sent as the basic-auth username
    pub api_key: Option<String>,

    /// Base URL without trailing slash; `None` means [`DEFAULT_API_BASE`]
    pub base_url: Option<String>,

    /// Whole-request timeout. `None` leaves reqwest's default (no timeout).
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Self::default()
        }
    }

    /// Read `PDFSHIFT_API_KEY` and `PDFSHIFT_API_BASE`.
    ///
    /// Unset or empty variables leave the corresponding field unset.
    pub fn from_env() -> Self {
        Self {
            api_key: non_empty_var(API_KEY_ENV),
            base_url: non_empty_var(API_BASE_ENV),
            timeout: None,
        }
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Base URL the client talks to, trailing slashes removed
    pub fn api_base(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or(DEFAULT_API_BASE)
            .trim_end_matches('/')
    }

    /// Full URL of an endpoint such as `convert` or `credits`
    pub fn endpoint(&self, name: &str) -> String {
        format!("{}/{}/", self.api_base(), name)
    }
}

// Keeps the key out of debug output and logs.
impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.api_base())
            .field("timeout", &self.timeout)
            .finish()
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_default_endpoints() {
        let config = ClientConfig::new();

        assert_eq!(config.api_base(), "https://api.pdfshift.io/v2");
        assert_eq!(config.endpoint("convert"), "https://api.pdfshift.io/v2/convert/");
        assert_eq!(config.endpoint("credits"), "https://api.pdfshift.io/v2/credits/");
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let config = ClientConfig::with_api_key("key").base_url("http://127.0.0.1:9000/");
        assert_eq!(config.endpoint("credits"), "http://127.0.0.1:9000/credits/");
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = ClientConfig::with_api_key("sk_live_secret");
        let printed = format!("{:?}", config);

        assert!(!printed.contains("sk_live_secret"));
        assert!(printed.contains("<redacted>"));
    }

    #[test]
    #[serial]
    fn test_from_env() {
        env::set_var(API_KEY_ENV, "sk_env");
        env::set_var(API_BASE_ENV, "http://localhost:1234");

        let config = ClientConfig::from_env();
        assert_eq!(config.api_key.as_deref(), Some("sk_env"));
        assert_eq!(config.api_base(), "http://localhost:1234");

        env::remove_var(API_KEY_ENV);
        env::remove_var(API_BASE_ENV);
    }

    #[test]
    #[serial]
    fn test_from_env_ignores_empty_key() {
        env::set_var(API_KEY_ENV, "  ");
        env::remove_var(API_BASE_ENV);

        let config = ClientConfig::from_env();
        assert!(config.api_key.is_none());
        assert_eq!(config.api_base(), DEFAULT_API_BASE);

        env::remove_var(API_KEY_ENV);
    }
}
