//! Prelude module for convenient imports.
//!
//! ```ignore
//! use talon_core::prelude::*;
//! ```

pub use crate::{
    ArgValue, BaseAddress, BodyCodec, BodyValue, ContentType, Error, ErrorKind, FinalUrl, Form,
    Headers, JsonCodec, MetadataProvider, Method, MethodDescriptor, ParamRole, Part, Request,
    RequestBuilder, Response, Result, Transport, TransportFactory, UrlOverride, from_json,
    to_form, to_json,
};
