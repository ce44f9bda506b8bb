// Check-in backend HTTP client
//
// Wraps `reqwest::Client` with stayflow-specific URL construction and
// error-envelope unwrapping. All endpoint modules (reservations,
// documents, etc.) are implemented as inherent methods via separate
// files to keep this module focused on transport mechanics.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// The backend wraps failures as `{"error":{"code":"...","message":"..."}}`
/// with a non-2xx status.
#[derive(serde::Deserialize)]
struct ApiErrorEnvelope {
    error: Option<ApiErrorInner>,
}

#[derive(serde::Deserialize)]
struct ApiErrorInner {
    code: Option<String>,
    message: Option<String>,
}

/// Raw HTTP client for the stayflow check-in backend.
///
/// All methods return typed payloads -- the error envelope is stripped
/// and translated into [`Error::Api`] before the caller sees it.
pub struct CheckinClient {
    http: reqwest::Client,
    base_url: Url,
}

impl CheckinClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// `base_url` is the backend root (e.g. `https://api.stayflow.app`).
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self { http, base_url })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    ///
    /// Use this when the host app already holds an authenticated client.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// The backend base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build a full URL for an API path: `{base}/api/v1/{path}`.
    pub(crate) fn api_url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}/api/v1/{path}"))?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and parse the JSON body.
    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {}", url);
        let resp = self.http.get(url).send().await.map_err(Error::Transport)?;
        Self::parse_body(resp).await
    }

    /// Send a GET request, mapping HTTP 404 to `None`.
    pub(crate) async fn get_optional<T: DeserializeOwned>(
        &self,
        url: Url,
    ) -> Result<Option<T>, Error> {
        debug!("GET {}", url);
        let resp = self.http.get(url).send().await.map_err(Error::Transport)?;
        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Self::parse_body(resp).await.map(Some)
    }

    /// Send a POST request with JSON body and parse the JSON response.
    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        debug!("POST {}", url);
        let resp = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(Error::Transport)?;
        Self::parse_body(resp).await
    }

    /// Send a POST request with JSON body, discarding the response body.
    pub(crate) async fn post_empty(
        &self,
        url: Url,
        body: &(impl Serialize + Sync),
    ) -> Result<(), Error> {
        debug!("POST {}", url);
        let resp = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(Error::Transport)?;
        Self::check_status(resp).await
    }

    /// Send a PATCH request with JSON body, discarding the response body.
    pub(crate) async fn patch_empty(
        &self,
        url: Url,
        body: &(impl Serialize + Sync),
    ) -> Result<(), Error> {
        debug!("PATCH {}", url);
        let resp = self
            .http
            .patch(url)
            .json(body)
            .send()
            .await
            .map_err(Error::Transport)?;
        Self::check_status(resp).await
    }

    /// Send a multipart POST (file uploads) and parse the JSON response.
    pub(crate) async fn post_multipart<T: DeserializeOwned>(
        &self,
        url: Url,
        form: reqwest::multipart::Form,
    ) -> Result<T, Error> {
        debug!("POST {} (multipart)", url);
        let resp = self
            .http
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(Error::Transport)?;
        Self::parse_body(resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    /// Verify the status code, translating error envelopes, then parse
    /// the body as JSON.
    async fn parse_body<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();
        let body = resp.text().await.map_err(Error::Transport)?;

        if !status.is_success() {
            return Err(Self::envelope_error(status, &body));
        }

        serde_json::from_str(&body).map_err(|e| {
            let preview = body_preview(&body);
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body,
            }
        })
    }

    /// Verify the status code for endpoints with no meaningful body.
    async fn check_status(resp: reqwest::Response) -> Result<(), Error> {
        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }
        let body = resp.text().await.unwrap_or_default();
        Err(Self::envelope_error(status, &body))
    }

    /// Translate a non-2xx response into [`Error`], preferring the
    /// structured envelope when the body carries one.
    fn envelope_error(status: reqwest::StatusCode, body: &str) -> Error {
        if let Ok(wrapper) = serde_json::from_str::<ApiErrorEnvelope>(body) {
            if let Some(err) = wrapper.error {
                let message = err.message.unwrap_or_default();
                if status == reqwest::StatusCode::UNAUTHORIZED {
                    return Error::Authentication { message };
                }
                return Error::Api {
                    message,
                    code: err.code,
                    status: status.as_u16(),
                };
            }
        }

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Error::Authentication {
                message: "session expired or invalid token".into(),
            };
        }

        Error::Api {
            message: format!("HTTP {status}: {}", body_preview(body)),
            code: None,
            status: status.as_u16(),
        }
    }
}

/// Truncate a response body for diagnostics without splitting a UTF-8
/// character.
fn body_preview(body: &str) -> &str {
    match body.char_indices().nth(200) {
        Some((end, _)) => &body[..end],
        None => body,
    }
}
