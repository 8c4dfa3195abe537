//! Assembled HTTP requests.
//!
//! A [`Request`] is the ephemeral per-call value handed to the
//! transport: method, final URL, headers, and optional body bytes.
//! [`assemble`] is the last pure step of the pipeline.

use bytes::Bytes;

use crate::{Error, FinalUrl, Headers, Method, Result};

/// An HTTP request ready for submission.
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    url: FinalUrl,
    headers: Headers,
    body: Option<Bytes>,
}

impl Request {
    /// Creates a new [`RequestBuilder`].
    #[must_use]
    pub fn builder(method: Method, url: FinalUrl) -> RequestBuilder {
        RequestBuilder::new(method, url)
    }

    /// HTTP method.
    #[must_use]
    pub const fn method(&self) -> Method {
        self.method
    }

    /// Final request URL.
    #[must_use]
    pub const fn url(&self) -> &FinalUrl {
        &self.url
    }

    /// Request headers.
    #[must_use]
    pub const fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Single header value by name (case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    /// Request body, if any.
    #[must_use]
    pub const fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    /// Consume into `(method, url, headers, body)`.
    #[must_use]
    pub fn into_parts(self) -> (Method, FinalUrl, Headers, Option<Bytes>) {
        (self.method, self.url, self.headers, self.body)
    }
}

/// Builder for [`Request`] instances.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    method: Method,
    url: FinalUrl,
    headers: Headers,
    body: Option<Bytes>,
}

impl RequestBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new(method: Method, url: FinalUrl) -> Self {
        Self {
            method,
            url,
            headers: Headers::new(),
            body: None,
        }
    }

    /// Sets a header (case-insensitive, last write wins).
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Sets multiple headers.
    #[must_use]
    pub fn headers(mut self, headers: impl IntoIterator<Item = (String, String)>) -> Self {
        self.headers.extend(headers);
        self
    }

    /// Appends a query parameter to the URL.
    #[must_use]
    pub fn query(mut self, name: &str, value: &str) -> Self {
        self.url.append_query_pairs([(name, value)]);
        self
    }

    /// Appends multiple query parameters to the URL.
    #[must_use]
    pub fn query_pairs<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.url.append_query_pairs(pairs);
        self
    }

    /// Sets the request body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Builds the [`Request`].
    #[must_use]
    pub fn build(self) -> Request {
        Request {
            method: self.method,
            url: self.url,
            headers: self.headers,
            body: self.body,
        }
    }
}

/// Combine the resolved URL, method, headers, and serialized body into
/// one request.
///
/// The body's content type is written through the header map, so it wins
/// over an earlier `Content-Type` entry (last-write-wins).
///
/// # Errors
///
/// Returns a binding error when a body is combined with GET or HEAD and
/// `allow_body_on_safe` is not set.
pub fn assemble(
    method: Method,
    url: FinalUrl,
    headers: Headers,
    body: Option<(Bytes, String)>,
    allow_body_on_safe: bool,
) -> Result<Request> {
    if body.is_some() && !method.permits_body() && !allow_body_on_safe {
        return Err(Error::binding(format!(
            "method {method} does not take a request body"
        )));
    }

    let mut request = Request {
        method,
        url,
        headers,
        body: None,
    };
    if let Some((bytes, content_type)) = body {
        request.headers.insert("Content-Type", content_type);
        request.body = Some(bytes);
    }
    Ok(request)
}
