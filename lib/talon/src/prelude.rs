//! Prelude module for convenient imports.
//!
//! ```ignore
//! use talon::prelude::*;
//! ```

pub use crate::{
    ArgValue, BaseAddress, BodyCodec, Client, ClientConfig, ContentType, Error, ErrorKind,
    FinalUrl, Form, Headers, HttpConfig, HyperTransport, JsonCodec, MetadataProvider, Method,
    MethodDescriptor, ParamRole, Part, Request, Response, Result, SharedTransport, StaticMetadata,
    Transport, TransportFactory, UrlOverride,
};
