//! Error types for talon.

use derive_more::{Display, Error, From};

/// Coarse error classification.
///
/// Every [`Error`] variant belongs to exactly one kind; callers that only
/// care about the failure family (e.g. "was this a transport problem?")
/// can match on [`Error::kind`] instead of individual variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum ErrorKind {
    /// The base address, template, and override did not combine into a
    /// parseable URL.
    #[display("invalid-url")]
    InvalidUrl,
    /// Descriptor/argument mismatch detected before assembly.
    #[display("binding")]
    Binding,
    /// A body value could not be encoded (or a response decoded).
    #[display("serialization")]
    Serialization,
    /// Network or protocol-level failure reported by the transport.
    #[display("transport")]
    Transport,
}

/// Main error type for talon operations.
#[derive(Debug, Display, Error, From)]
pub enum Error {
    /// URL parsing error.
    #[display("invalid URL: {_0}")]
    #[from]
    InvalidUrl(url::ParseError),

    /// Descriptor/argument mismatch: duplicate body roles, missing
    /// required path or URL values, arity or role/value mismatches.
    #[display("binding error: {_0}")]
    #[from(skip)]
    Binding(#[error(not(source))] String),

    /// JSON serialization error.
    #[display("JSON serialization error: {_0}")]
    #[from]
    JsonSerialization(serde_json::Error),

    /// Form URL-encoded serialization error.
    #[display("form serialization error: {_0}")]
    #[from]
    FormSerialization(serde_html_form::ser::Error),

    /// Deserialization error with path context.
    #[display("deserialization error at '{path}': {message}")]
    #[from(skip)]
    Deserialization {
        /// Path to the failing field (e.g. "user.address.city").
        path: String,
        /// Error message.
        message: String,
    },

    /// Network/connection errors reported by the transport.
    #[display("connection error: {_0}")]
    #[from(skip)]
    Connection(#[error(not(source))] String),

    /// TLS/SSL errors reported by the transport.
    #[display("TLS error: {_0}")]
    #[from(skip)]
    Tls(#[error(not(source))] String),

    /// The transport gave up waiting for a response.
    #[display("request timeout")]
    #[from(skip)]
    Timeout,
}

/// Result type alias using [`crate::Error`].
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a binding error.
    #[must_use]
    pub fn binding(message: impl Into<String>) -> Self {
        Self::Binding(message.into())
    }

    /// Create a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Create a TLS error.
    #[must_use]
    pub fn tls(message: impl Into<String>) -> Self {
        Self::Tls(message.into())
    }

    /// Create a deserialization error with path context.
    #[must_use]
    pub fn deserialization(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Deserialization {
            path: path.into(),
            message: message.into(),
        }
    }

    /// The failure family this error belongs to.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidUrl(_) => ErrorKind::InvalidUrl,
            Self::Binding(_) => ErrorKind::Binding,
            Self::JsonSerialization(_) | Self::FormSerialization(_) | Self::Deserialization { .. } => {
                ErrorKind::Serialization
            }
            Self::Connection(_) | Self::Tls(_) | Self::Timeout => ErrorKind::Transport,
        }
    }

    /// Returns `true` if this is a timeout error.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }

    /// Returns `true` if this is a connection error.
    #[must_use]
    pub const fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    /// Returns `true` if the transport reported this error.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self.kind(), ErrorKind::Transport)
    }

    /// Returns `true` if this is a binding error.
    #[must_use]
    pub const fn is_binding(&self) -> bool {
        matches!(self, Self::Binding(_))
    }
}
