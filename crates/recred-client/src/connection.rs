//! Shared HTTP session for the two outbound calls of one invocation.

use std::time::Duration;

use crate::auth::AdminCredentials;
use crate::error::ClientResult;

/// Connection settings shared by the resolver and the orchestrator.
///
/// Holds nothing beyond the base URL, the admin credential and the
/// underlying HTTP client; no state survives the invocation.
#[derive(Debug, Clone)]
pub struct Connection {
    base_url: String,
    credentials: AdminCredentials,
    http: reqwest::Client,
}

impl Connection {
    /// Build the shared HTTP client used by both phases.
    pub fn new(
        base_url: String,
        credentials: AdminCredentials,
        timeout: Duration,
        tls_verify: bool,
    ) -> ClientResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .danger_accept_invalid_certs(!tls_verify)
            .user_agent(concat!("recred/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self::with_http_client(base_url, credentials, http))
    }

    /// Create a connection with a pre-built `reqwest::Client` (for testing).
    #[must_use]
    pub fn with_http_client(
        base_url: String,
        credentials: AdminCredentials,
        http: reqwest::Client,
    ) -> Self {
        // Normalize base URL: strip trailing slash.
        let base_url = base_url.trim_end_matches('/').to_string();
        Self {
            base_url,
            credentials,
            http,
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn credentials(&self) -> &AdminCredentials {
        &self.credentials
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }
}
