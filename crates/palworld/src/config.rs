//! Construction-time configuration of the shared API client.

use std::time::Duration;

use crate::api::ApiHeaders;

/// Requests that take longer than this fail with [`ApiError::Timeout`](crate::api::ApiError::Timeout).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(10_000);

pub const CONTENT_TYPE: &str = "Content-Type";
pub const APPLICATION_JSON: &str = "application/json";

/// Settings shared by every request the client sends.
///
/// A config is consumed by [`HttpApiClient::new`](crate::api::HttpApiClient::new) and
/// cannot be changed afterwards, so all requests from one client agree on credentials
/// mode, timeout and headers.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Prefix for every endpoint. Empty means same-origin relative URLs.
    pub root_url: String,
    /// Send cookies on cross-origin requests.
    pub with_credentials: bool,
    /// Zero disables the timeout.
    pub timeout: Duration,
    pub headers: ApiHeaders,
}

impl Default for ClientConfig {
    fn default() -> Self {
        let mut headers = ApiHeaders::new();
        headers.insert(CONTENT_TYPE.to_string(), APPLICATION_JSON.to_string());

        Self {
            root_url: String::new(),
            with_credentials: true,
            timeout: DEFAULT_TIMEOUT,
            headers,
        }
    }
}

impl ClientConfig {
    pub fn with_root_url(mut self, root_url: impl Into<String>) -> Self {
        self.root_url = root_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_credentials(mut self, with_credentials: bool) -> Self {
        self.with_credentials = with_credentials;
        self
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Joins the root URL and an endpoint path.
    pub fn url_for(&self, endpoint: &str) -> String {
        format!("{}{}", self.root_url.trim_end_matches('/'), endpoint)
    }
}
