//! Per-client configuration.

use std::sync::Arc;

use talon_core::{
    BaseAddress, BodyCodec, JsonCodec, Result, SharedTransport, Transport, TransportFactory,
};

use crate::HyperTransport;

/// Immutable configuration supplied once at client construction: the
/// base address, how to obtain a transport, and how to encode structured
/// bodies.
#[derive(Clone)]
pub struct ClientConfig {
    base_address: BaseAddress,
    transport_factory: Arc<dyn TransportFactory>,
    codec: Arc<dyn BodyCodec>,
    allow_body_on_safe_methods: bool,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_address", &self.base_address)
            .field(
                "allow_body_on_safe_methods",
                &self.allow_body_on_safe_methods,
            )
            .finish_non_exhaustive()
    }
}

impl ClientConfig {
    /// Start building a configuration for the given base address.
    #[must_use]
    pub fn builder(base_address: impl Into<String>) -> ClientConfigBuilder {
        ClientConfigBuilder {
            base_address: base_address.into(),
            transport_factory: None,
            codec: None,
            allow_body_on_safe_methods: false,
        }
    }

    /// The configured base address.
    #[must_use]
    pub const fn base_address(&self) -> &BaseAddress {
        &self.base_address
    }

    /// The structured-body codec.
    #[must_use]
    pub fn codec(&self) -> &dyn BodyCodec {
        &*self.codec
    }

    /// Whether GET/HEAD requests may carry a body.
    #[must_use]
    pub const fn allow_body_on_safe_methods(&self) -> bool {
        self.allow_body_on_safe_methods
    }

    /// Ask the factory for a transport handle. Whether the handle is
    /// fresh or shared is the factory's choice.
    #[must_use]
    pub fn create_transport(&self) -> Arc<dyn Transport> {
        self.transport_factory.create()
    }
}

/// Builder for [`ClientConfig`].
pub struct ClientConfigBuilder {
    base_address: String,
    transport_factory: Option<Arc<dyn TransportFactory>>,
    codec: Option<Arc<dyn BodyCodec>>,
    allow_body_on_safe_methods: bool,
}

impl std::fmt::Debug for ClientConfigBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfigBuilder")
            .field("base_address", &self.base_address)
            .finish_non_exhaustive()
    }
}

impl ClientConfigBuilder {
    /// Use a custom transport factory.
    #[must_use]
    pub fn transport_factory(mut self, factory: impl TransportFactory + 'static) -> Self {
        self.transport_factory = Some(Arc::new(factory));
        self
    }

    /// Share one transport handle across every client built from this
    /// configuration.
    #[must_use]
    pub fn transport(self, transport: Arc<dyn Transport>) -> Self {
        self.transport_factory(SharedTransport::new(transport))
    }

    /// Use a custom structured-body codec.
    #[must_use]
    pub fn codec(mut self, codec: impl BodyCodec + 'static) -> Self {
        self.codec = Some(Arc::new(codec));
        self
    }

    /// Allow GET/HEAD requests to carry a body.
    #[must_use]
    pub const fn allow_body_on_safe_methods(mut self, allow: bool) -> Self {
        self.allow_body_on_safe_methods = allow;
        self
    }

    /// Validate the base address and build the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`talon_core::Error::InvalidUrl`] if the base address is
    /// not an absolute URL.
    pub fn build(self) -> Result<ClientConfig> {
        let base_address = BaseAddress::parse(self.base_address)?;
        let transport_factory = self
            .transport_factory
            .unwrap_or_else(|| Arc::new(default_transport_factory));
        let codec = self.codec.unwrap_or_else(|| Arc::new(JsonCodec));

        Ok(ClientConfig {
            base_address,
            transport_factory,
            codec,
            allow_body_on_safe_methods: self.allow_body_on_safe_methods,
        })
    }
}

fn default_transport_factory() -> Arc<dyn Transport> {
    Arc::new(HyperTransport::new())
}
