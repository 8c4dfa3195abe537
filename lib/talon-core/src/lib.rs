//! Core request-building engine for the talon declarative HTTP client.
//!
//! Given a [`MethodDescriptor`] (verb, path template, parameter roles)
//! and a list of runtime [`ArgValue`]s, this crate binds arguments into
//! URL, headers, query, and body, resolves the final URL against a
//! [`BaseAddress`], serializes the body, and assembles a [`Request`] for
//! a pluggable [`Transport`] to submit:
//!
//! - [`bind`] - route arguments by their declared roles
//! - [`resolve`] - base address + template + per-call override
//! - [`serialize`] - body values through a [`BodyCodec`]
//! - [`assemble`] - the final pure combination step
//! - [`Transport`] / [`TransportFactory`] - the execution seam
//! - [`Error`] and [`Result`] - error handling

mod arg;
mod binder;
mod body;
mod descriptor;
mod error;
mod headers;
mod method;
mod multipart;
pub mod prelude;
mod request;
mod resolver;
mod response;
mod template;
mod transport;

pub use arg::ArgValue;
pub use binder::{BoundParams, bind};
pub use body::{
    BodyCodec, BodyValue, ContentType, FormCodec, JsonCodec, from_json, serialize, to_form,
    to_json, to_query_string,
};
pub use descriptor::{
    DescriptorTable, MetadataProvider, MethodDescriptor, MethodDescriptorBuilder, ParamRole,
    StaticMetadata,
};
pub use error::{Error, ErrorKind, Result};
pub use headers::Headers;
pub use method::Method;
pub use multipart::{Form, Part};
pub use request::{Request, RequestBuilder, assemble};
pub use resolver::{BaseAddress, FinalUrl, UrlOverride, resolve};
pub use response::Response;
pub use template::PathTemplate;
pub use transport::{SharedTransport, Transport, TransportFactory, TransportFuture};

// Re-export http crate types for status codes and headers
pub use http::{StatusCode, header};
