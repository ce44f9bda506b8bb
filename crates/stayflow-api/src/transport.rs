// Shared transport configuration for building reqwest::Client instances.
//
// The check-in backend sits behind the host app's authenticated session,
// so the only credential here is an opaque bearer token handed in by the
// external auth collaborator.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub timeout: Duration,
    /// Session bearer token, injected as a default `Authorization` header.
    pub session_token: Option<SecretString>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            session_token: None,
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, crate::error::Error> {
        let mut headers = reqwest::header::HeaderMap::new();

        if let Some(ref token) = self.session_token {
            let value = format!("Bearer {}", token.expose_secret());
            let mut header = reqwest::header::HeaderValue::from_str(&value).map_err(|_| {
                crate::error::Error::Authentication {
                    message: "session token contains invalid header characters".into(),
                }
            })?;
            header.set_sensitive(true);
            headers.insert(reqwest::header::AUTHORIZATION, header);
        }

        reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent("stayflow/0.1.0")
            .default_headers(headers)
            .build()
            .map_err(crate::error::Error::Transport)
    }

    /// Attach a session token to this config.
    pub fn with_session_token(mut self, token: SecretString) -> Self {
        self.session_token = Some(token);
        self
    }
}
