//! The generic dispatcher: one client surface for every declared method.
//!
//! Instead of generated per-method functions, a [`Client`] takes a
//! method name (or index) and a positional argument list and runs the
//! full pipeline: bind, expand the path template, resolve the URL,
//! serialize the body, assemble, submit.

use std::sync::Arc;

use talon_core::{
    ArgValue, BaseAddress, DescriptorTable, Error, Headers, MetadataProvider, MethodDescriptor,
    Request, Response, Result, Transport, assemble, bind, resolve, serialize,
};
use tracing::debug;

use crate::ClientConfig;

/// A descriptor-driven API client.
///
/// Built once from a [`ClientConfig`] and a [`MetadataProvider`] (the
/// provider is consulted exactly once; its descriptors are cached for
/// the client's lifetime). The client holds only that read-only table,
/// the immutable configuration, and the transport handle, so any number
/// of calls may run concurrently without locking. Cancelling a call
/// (dropping its future) abandons the in-flight transport operation.
#[derive(Clone)]
pub struct Client {
    table: Arc<DescriptorTable>,
    config: ClientConfig,
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("base_address", self.base_address())
            .field("methods", &self.table.len())
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Build a client: consult the metadata provider once and acquire a
    /// transport handle from the configured factory.
    ///
    /// # Errors
    ///
    /// Propagates provider errors and descriptor-validation errors.
    pub fn new(config: ClientConfig, provider: &dyn MetadataProvider) -> Result<Self> {
        let table = Arc::new(DescriptorTable::from_provider(provider)?);
        let transport = config.create_transport();
        Ok(Self {
            table,
            config,
            transport,
        })
    }

    /// The cached method descriptors.
    #[must_use]
    pub fn descriptors(&self) -> &DescriptorTable {
        &self.table
    }

    /// The configured base address.
    #[must_use]
    pub const fn base_address(&self) -> &BaseAddress {
        self.config.base_address()
    }

    /// Invoke a declared method by name.
    ///
    /// # Errors
    ///
    /// Binding, URL, and serialization errors surface before any network
    /// I/O; transport errors surface as reported, with non-2xx statuses
    /// returned as ordinary responses.
    pub async fn invoke(&self, method: &str, args: Vec<ArgValue>) -> Result<Response> {
        let descriptor = self
            .table
            .get(method)
            .ok_or_else(|| Error::binding(format!("unknown method `{method}`")))?;
        self.dispatch(descriptor, args).await
    }

    /// Invoke a declared method by table position.
    ///
    /// # Errors
    ///
    /// As [`Client::invoke`].
    pub async fn invoke_index(&self, index: usize, args: Vec<ArgValue>) -> Result<Response> {
        let descriptor = self
            .table
            .get_index(index)
            .ok_or_else(|| Error::binding(format!("no method at index {index}")))?;
        self.dispatch(descriptor, args).await
    }

    /// Build the request a call would submit, without submitting it.
    ///
    /// Pure with respect to the client: every call assembles its request
    /// independently from its own arguments.
    ///
    /// # Errors
    ///
    /// Binding, URL, and serialization errors, as for [`Client::invoke`].
    pub fn prepare(&self, descriptor: &MethodDescriptor, args: Vec<ArgValue>) -> Result<Request> {
        let bound = bind(descriptor, args)?;

        let path = descriptor.template().expand(&bound.path)?;
        let mut url = resolve(
            self.config.base_address(),
            &path,
            bound.url_override.as_ref(),
        )?;
        url.append_query_pairs(bound.query.iter().map(|(k, v)| (k.as_str(), v.as_str())));

        let mut headers: Headers = descriptor.static_headers().iter().cloned().collect();
        headers.extend(bound.headers);

        let body = bound
            .body
            .map(|body| {
                serialize(
                    body,
                    self.config.codec(),
                    descriptor.declared_content_type(),
                )
            })
            .transpose()?;

        assemble(
            descriptor.method(),
            url,
            headers,
            body,
            self.config.allow_body_on_safe_methods(),
        )
    }

    async fn dispatch(&self, descriptor: &MethodDescriptor, args: Vec<ArgValue>) -> Result<Response> {
        let request = self.prepare(descriptor, args)?;
        debug!(
            call = descriptor.name(),
            method = %request.method(),
            url = %request.url(),
            "dispatching"
        );

        // The handle is held for the duration of this call only; every
        // exit path, including cancellation, releases it.
        let transport = Arc::clone(&self.transport);
        let response = transport.submit(request).await?;

        debug!(
            call = descriptor.name(),
            status = response.status(),
            "call completed"
        );
        Ok(response)
    }
}
