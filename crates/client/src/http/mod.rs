//! Authenticated request client.
//!
//! Every call to the marketplace API goes through [`ApiClient::send`]:
//!
//! 1. Authenticated requests read the session token first. Without one the
//!    call fails with [`ApiError::Unauthenticated`] and nothing is sent.
//! 2. Headers are negotiated: multipart bodies never carry a caller content
//!    type (the transport writes the boundary), everything else defaults to
//!    `application/json`, and `Authorization: Bearer <token>` always replaces
//!    whatever the caller supplied.
//! 3. Non-success statuses become [`ApiError::Http`] with the body text.
//! 4. JSON responses decode into the caller's type; anything else is text.
//!
//! The client keeps no state between calls besides the token lookup, never
//! retries and never caches.

mod request;

pub use request::{Access, Body, FormPart, FormPayload, Request};

use std::sync::Arc;

use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::de::{DeserializeOwned, IgnoredAny};
use tracing::{debug, instrument, warn};
use url::Url;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::session::SessionProvider;

/// Decoded response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response<T> {
    /// The response declared a JSON content type and decoded into `T`.
    Json(T),
    /// Any other response, as text.
    Text(String),
}

impl<T> Response<T> {
    /// The decoded JSON value.
    ///
    /// # Errors
    ///
    /// Returns `Decode` if the server answered with something other than JSON.
    pub fn into_json(self) -> Result<T, ApiError> {
        match self {
            Self::Json(value) => Ok(value),
            Self::Text(text) => Err(ApiError::Decode(format!(
                "expected a JSON response, got text: {}",
                truncate(&text, 120)
            ))),
        }
    }
}

/// Marketplace API client.
///
/// Cheap to clone; clones share one connection pool and session provider.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    http: reqwest::Client,
    base_url: Url,
    session: Arc<dyn SessionProvider>,
}

impl ApiClient {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns `Network` if the HTTP client fails to build.
    pub fn new(config: &ClientConfig, session: Arc<dyn SessionProvider>) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                http,
                base_url: config.api_url.clone(),
                session,
            }),
        })
    }

    /// Base address endpoints are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Send a request and decode the response.
    ///
    /// # Errors
    ///
    /// - `Unauthenticated` if the request needs a token and none is stored
    /// - `Http` if the server answers with a non-success status
    /// - `Network` if the server cannot be reached or the body cannot be read
    /// - `Decode` if a JSON response does not match `T`
    /// - `InvalidRequest` if the endpoint or headers are malformed
    #[instrument(skip(self, request), fields(method = %request.method, endpoint = %request.endpoint))]
    pub async fn send<T: DeserializeOwned>(&self, request: Request) -> Result<Response<T>, ApiError> {
        let Request {
            endpoint,
            method,
            headers,
            query,
            body,
            access,
        } = request;

        let token = match access {
            Access::Authenticated => Some(self.inner.session.token().ok_or_else(|| {
                debug!("no session token, request not sent");
                ApiError::Unauthenticated
            })?),
            Access::Public => None,
        };

        let url = self.url_for(&endpoint, &query)?;
        let headers = outgoing_headers(&headers, body.as_ref(), token.as_ref())?;

        let builder = self.inner.http.request(method, url).headers(headers);
        let builder = match body {
            Some(Body::Json(value)) => builder.body(
                serde_json::to_vec(&value)
                    .map_err(|e| ApiError::InvalidRequest(format!("body is not valid JSON: {e}")))?,
            ),
            Some(Body::Multipart(form)) => builder.multipart(form.into_form()?),
            None => builder,
        };

        let response = builder.send().await?;
        let status = response.status();
        debug!(status = status.as_u16(), "response received");

        if !status.is_success() {
            let text = response.text().await?;
            let body = if text.trim().is_empty() {
                status_line(status)
            } else {
                text
            };
            warn!(status = status.as_u16(), "request rejected by server");
            return Err(ApiError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let declares_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(is_json_content_type);
        let text = response.text().await?;

        if declares_json && !text.trim().is_empty() {
            serde_json::from_str(&text)
                .map(Response::Json)
                .map_err(|e| ApiError::Decode(e.to_string()))
        } else {
            Ok(Response::Text(text))
        }
    }

    /// Send a request that must answer with JSON.
    ///
    /// # Errors
    ///
    /// As [`send`](Self::send), plus `Decode` when the response is not JSON.
    pub async fn send_json<T: DeserializeOwned>(&self, request: Request) -> Result<T, ApiError> {
        self.send(request).await?.into_json()
    }

    /// Send a request and ignore the response body.
    ///
    /// # Errors
    ///
    /// As [`send`](Self::send).
    pub async fn send_empty(&self, request: Request) -> Result<(), ApiError> {
        self.send::<IgnoredAny>(request).await.map(|_| ())
    }

    /// Resolve an endpoint against the base address.
    fn url_for(&self, endpoint: &str, query: &[(String, String)]) -> Result<Url, ApiError> {
        let base = &self.inner.base_url;
        let mut url = base
            .join(endpoint.trim_start_matches('/'))
            .map_err(|e| ApiError::InvalidRequest(format!("endpoint '{endpoint}': {e}")))?;

        if url.origin() != base.origin() {
            return Err(ApiError::InvalidRequest(format!(
                "endpoint '{endpoint}' leaves the API origin"
            )));
        }

        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

/// Headers actually sent for a request.
///
/// The caller's headers are kept except for the content type of multipart
/// bodies and any `Authorization` value, which is always replaced by the
/// session token (or dropped for public requests).
pub(crate) fn outgoing_headers(
    caller: &HeaderMap,
    body: Option<&Body>,
    token: Option<&SecretString>,
) -> Result<HeaderMap, ApiError> {
    let mut headers = caller.clone();

    if matches!(body, Some(Body::Multipart(_))) {
        headers.remove(CONTENT_TYPE);
    } else if !headers.contains_key(CONTENT_TYPE) {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    }

    headers.remove(AUTHORIZATION);
    if let Some(token) = token {
        let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
            .map_err(|_| ApiError::InvalidRequest("session token is not a valid header value".to_string()))?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
    }

    Ok(headers)
}

/// Whether a content type names JSON (`application/json`, `application/problem+json`, ...).
fn is_json_content_type(value: &str) -> bool {
    let essence = value
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence == "application/json" || (essence.starts_with("application/") && essence.ends_with("+json"))
}

/// `404 Not Found` style status line.
fn status_line(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("{} {reason}", status.as_u16()),
        None => status.as_u16().to_string(),
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_owned()
    } else {
        let head: String = text.chars().take(max_chars).collect();
        format!("{head}...")
    }
}
