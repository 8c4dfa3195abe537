//! Declarative HTTP client for Rust.
//!
//! Describe an API as a table of method descriptors (verb, path
//! template, parameter roles) and call it by name; talon assembles each
//! request from the arguments and submits it through a pluggable
//! transport.
//!
//! # Example
//!
//! ```ignore
//! use talon::prelude::*;
//!
//! let metadata = StaticMetadata(vec![
//!     MethodDescriptor::builder("get_user", Method::Get)
//!         .template("/users/{id}")
//!         .param(ParamRole::Path("id".to_string()))
//!         .build()?,
//! ]);
//!
//! let config = ClientConfig::builder("https://api.example.com").build()?;
//! let client = Client::new(config, &metadata)?;
//!
//! let user: User = client
//!     .invoke("get_user", vec![ArgValue::from(42_u64)])
//!     .await?
//!     .json()?;
//! ```

mod client;
mod config;
mod dispatcher;
pub mod prelude;

// Re-export client types
pub use client::{HttpConfig, HttpConfigBuilder, HyperTransport};
pub use config::{ClientConfig, ClientConfigBuilder};
pub use dispatcher::Client;

// Re-export core types
pub use talon_core::{
    ArgValue, BaseAddress, BodyCodec, BodyValue, BoundParams, ContentType, DescriptorTable, Error,
    ErrorKind, FinalUrl, Form, FormCodec, Headers, JsonCodec, MetadataProvider, Method,
    MethodDescriptor, MethodDescriptorBuilder, ParamRole, Part, PathTemplate, Request,
    RequestBuilder, Response, Result, SharedTransport, StaticMetadata, Transport,
    TransportFactory, TransportFuture, UrlOverride, assemble, bind, from_json, resolve, serialize,
    to_form, to_json, to_query_string,
};

// Re-export http types for status codes and headers
pub use talon_core::{StatusCode, header};
