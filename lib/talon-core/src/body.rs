//! Body content and serialization.
//!
//! A body-role argument arrives as a [`BodyValue`]. Pre-built content
//! (raw text, bytes, a multipart form) passes through unchanged;
//! structured values are encoded by the configured [`BodyCodec`].

use bytes::Bytes;

use crate::{Form, Result};

/// Content type for request bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
    /// JSON content type (`application/json`).
    Json,
    /// Form URL-encoded content type (`application/x-www-form-urlencoded`).
    FormUrlEncoded,
    /// Plain text content type (`text/plain`).
    PlainText,
    /// Binary content type (`application/octet-stream`).
    OctetStream,
}

impl ContentType {
    /// The MIME type string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::FormUrlEncoded => "application/x-www-form-urlencoded",
            Self::PlainText => "text/plain",
            Self::OctetStream => "application/octet-stream",
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A body-role argument after binding.
#[derive(Debug, Clone, PartialEq)]
pub enum BodyValue {
    /// Raw text, transmitted as-is with a plain-text content type.
    Text(String),
    /// Raw bytes, transmitted as-is as an octet stream.
    Bytes(Bytes),
    /// A structured value encoded by the client's [`BodyCodec`].
    Structured(serde_json::Value),
    /// A prepared multipart form; content type comes from its boundary.
    Multipart(Form),
}

/// Pluggable encoder for structured body values.
///
/// The default is [`JsonCodec`]; [`FormCodec`] produces
/// `application/x-www-form-urlencoded` payloads instead.
pub trait BodyCodec: Send + Sync {
    /// Content type of the encoded payload.
    fn content_type(&self) -> ContentType;

    /// Encode a structured value into transmittable bytes.
    ///
    /// # Errors
    ///
    /// Returns a serialization error when the value cannot be represented
    /// in the target format.
    fn encode(&self, value: &serde_json::Value) -> Result<Bytes>;
}

/// JSON codec backed by `serde_json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl BodyCodec for JsonCodec {
    fn content_type(&self) -> ContentType {
        ContentType::Json
    }

    fn encode(&self, value: &serde_json::Value) -> Result<Bytes> {
        serde_json::to_vec(value).map(Bytes::from).map_err(Into::into)
    }
}

/// Form URL-encoded codec backed by `serde_html_form`.
///
/// Only flat structures encode; nested values are an encoder-reported
/// failure.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormCodec;

impl BodyCodec for FormCodec {
    fn content_type(&self) -> ContentType {
        ContentType::FormUrlEncoded
    }

    fn encode(&self, value: &serde_json::Value) -> Result<Bytes> {
        serde_html_form::to_string(value)
            .map(|s| Bytes::from(s.into_bytes()))
            .map_err(Into::into)
    }
}

/// Turn a bound body value into `(bytes, content-type)`.
///
/// A declared content type (from descriptor metadata) overrides the
/// value's own, except for multipart forms whose boundary parameter must
/// survive.
///
/// # Errors
///
/// Returns a serialization error if the codec rejects a structured value.
pub fn serialize(
    body: BodyValue,
    codec: &dyn BodyCodec,
    declared_content_type: Option<&str>,
) -> Result<(Bytes, String)> {
    let (bytes, content_type) = match body {
        BodyValue::Text(text) => (Bytes::from(text), ContentType::PlainText.to_string()),
        BodyValue::Bytes(data) => (data, ContentType::OctetStream.to_string()),
        BodyValue::Structured(value) => {
            (codec.encode(&value)?, codec.content_type().to_string())
        }
        BodyValue::Multipart(form) => {
            let (content_type, bytes) = form.into_body();
            return Ok((bytes, content_type));
        }
    };

    Ok((
        bytes,
        declared_content_type.map_or(content_type, str::to_string),
    ))
}

/// Serialize a value to JSON bytes.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn to_json<T: serde::Serialize>(value: &T) -> Result<Bytes> {
    serde_json::to_vec(value)
        .map(Bytes::from)
        .map_err(Into::into)
}

/// Serialize a value to form URL-encoded bytes.
///
/// Uses `serde_html_form`, which supports `Vec<T>` as repeated fields
/// (`tags=a&tags=b`).
///
/// # Errors
///
/// Returns an error if form serialization fails.
pub fn to_form<T: serde::Serialize>(value: &T) -> Result<Bytes> {
    serde_html_form::to_string(value)
        .map(|s| Bytes::from(s.into_bytes()))
        .map_err(Into::into)
}

/// Serialize a value to a query string.
///
/// # Errors
///
/// Returns an error if query serialization fails.
pub fn to_query_string<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_html_form::to_string(value).map_err(Into::into)
}

/// Deserialize JSON bytes with path-aware error messages.
///
/// # Errors
///
/// Returns an error naming the path to the failing field
/// (e.g. "user.address.city").
pub fn from_json<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    let mut deserializer = serde_json::Deserializer::from_slice(bytes);
    serde_path_to_error::deserialize(&mut deserializer)
        .map_err(|e| crate::Error::deserialization(e.path().to_string(), e.inner().to_string()))
}
