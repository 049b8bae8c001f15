//! Request descriptors.

use reqwest::Method;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;

use crate::error::ApiError;

/// Whether a request needs the session token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Access {
    /// Requires a token; fails with `Unauthenticated` before any I/O without one.
    #[default]
    Authenticated,
    /// Sent without a token (login, signup, OTP, password reset).
    Public,
}

/// Request body.
#[derive(Debug, Clone)]
pub enum Body {
    /// Structured body sent as JSON.
    Json(serde_json::Value),
    /// Multipart form, typically carrying files.
    Multipart(FormPayload),
}

/// A single call to the marketplace API.
///
/// ```
/// use kasuwa_client::http::Request;
///
/// let request = Request::post("/wishlist")
///     .json(&serde_json::json!({ "product_id": "p-1" }))
///     .unwrap();
/// assert_eq!(request.endpoint(), "/wishlist");
/// ```
#[derive(Debug, Clone)]
pub struct Request {
    pub(crate) endpoint: String,
    pub(crate) method: Method,
    pub(crate) headers: HeaderMap,
    pub(crate) query: Vec<(String, String)>,
    pub(crate) body: Option<Body>,
    pub(crate) access: Access,
}

impl Request {
    /// A request with an explicit method.
    #[must_use]
    pub fn new(method: Method, endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            method,
            headers: HeaderMap::new(),
            query: Vec::new(),
            body: None,
            access: Access::Authenticated,
        }
    }

    /// `GET` request.
    #[must_use]
    pub fn get(endpoint: impl Into<String>) -> Self {
        Self::new(Method::GET, endpoint)
    }

    /// `POST` request.
    #[must_use]
    pub fn post(endpoint: impl Into<String>) -> Self {
        Self::new(Method::POST, endpoint)
    }

    /// `PUT` request.
    #[must_use]
    pub fn put(endpoint: impl Into<String>) -> Self {
        Self::new(Method::PUT, endpoint)
    }

    /// `PATCH` request.
    #[must_use]
    pub fn patch(endpoint: impl Into<String>) -> Self {
        Self::new(Method::PATCH, endpoint)
    }

    /// `DELETE` request.
    #[must_use]
    pub fn delete(endpoint: impl Into<String>) -> Self {
        Self::new(Method::DELETE, endpoint)
    }

    /// Add a header.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRequest` if the name or value is not a valid header.
    pub fn header(mut self, name: &str, value: &str) -> Result<Self, ApiError> {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| ApiError::InvalidRequest(format!("header name '{name}': {e}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| ApiError::InvalidRequest(format!("header value for '{name}': {e}")))?;
        self.headers.insert(name, value);
        Ok(self)
    }

    /// Append a query parameter.
    #[must_use]
    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_owned(), value.to_string()));
        self
    }

    /// Serialize `body` as the JSON body.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRequest` if `body` cannot be represented as JSON.
    pub fn json(mut self, body: &impl Serialize) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body)
            .map_err(|e| ApiError::InvalidRequest(format!("body is not valid JSON: {e}")))?;
        self.body = Some(Body::Json(value));
        Ok(self)
    }

    /// Use a multipart form as the body.
    #[must_use]
    pub fn multipart(mut self, form: FormPayload) -> Self {
        self.body = Some(Body::Multipart(form));
        self
    }

    /// Send without the session token.
    #[must_use]
    pub fn public(mut self) -> Self {
        self.access = Access::Public;
        self
    }

    /// Endpoint path relative to the API origin.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// HTTP method.
    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.method
    }

    /// Caller-supplied headers.
    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Query parameters.
    #[must_use]
    pub fn query_pairs(&self) -> &[(String, String)] {
        &self.query
    }

    /// Body, if any.
    #[must_use]
    pub const fn body(&self) -> Option<&Body> {
        self.body.as_ref()
    }

    /// Access level.
    #[must_use]
    pub const fn access(&self) -> Access {
        self.access
    }
}

/// One part of a multipart form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormPart {
    /// Plain text field.
    Text {
        /// Field name.
        name: String,
        /// Field value.
        value: String,
    },
    /// File field.
    File {
        /// Field name.
        name: String,
        /// Original file name.
        file_name: String,
        /// MIME type of the file.
        content_type: String,
        /// File contents.
        bytes: Vec<u8>,
    },
}

/// Multipart form body.
///
/// Kept as plain data until send time so it can be inspected and rebuilt for
/// a resubmission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormPayload {
    parts: Vec<FormPart>,
}

impl FormPayload {
    /// Empty form.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a text field.
    #[must_use]
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parts.push(FormPart::Text {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    /// Add a file field.
    #[must_use]
    pub fn file(
        mut self,
        name: impl Into<String>,
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        self.parts.push(FormPart::File {
            name: name.into(),
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        });
        self
    }

    /// All parts in insertion order.
    #[must_use]
    pub fn parts(&self) -> &[FormPart] {
        &self.parts
    }

    /// Value of the first text field named `name`.
    #[must_use]
    pub fn text_value(&self, name: &str) -> Option<&str> {
        self.parts.iter().find_map(|part| match part {
            FormPart::Text { name: n, value } if n == name => Some(value.as_str()),
            _ => None,
        })
    }

    /// Number of file parts.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.parts
            .iter()
            .filter(|part| matches!(part, FormPart::File { .. }))
            .count()
    }

    /// Convert into the transport's multipart form.
    pub(crate) fn into_form(self) -> Result<reqwest::multipart::Form, ApiError> {
        self.parts
            .into_iter()
            .try_fold(reqwest::multipart::Form::new(), |form, part| match part {
                FormPart::Text { name, value } => Ok(form.text(name, value)),
                FormPart::File {
                    name,
                    file_name,
                    content_type,
                    bytes,
                } => {
                    let part = reqwest::multipart::Part::bytes(bytes)
                        .file_name(file_name)
                        .mime_str(&content_type)
                        .map_err(|e| {
                            ApiError::InvalidRequest(format!("content type '{content_type}': {e}"))
                        })?;
                    Ok(form.part(name, part))
                }
            })
    }
}
