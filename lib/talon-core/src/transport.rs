//! The transport seam: the capability that physically sends a request.
//!
//! [`Transport`] is object-safe (boxed futures) so implementations can be
//! injected through configuration: the default hyper-backed transport,
//! a recording test double, or anything else exposing `submit`.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::{Request, Response, Result};

/// Boxed future returned by [`Transport::submit`].
pub type TransportFuture<'a> = Pin<Box<dyn Future<Output = Result<Response>> + Send + 'a>>;

/// Capability that submits an assembled request and returns the raw
/// response.
///
/// Implementations must be usable concurrently from many calls; the
/// engine never mutates transport-owned state. Dropping the returned
/// future abandons the in-flight operation.
pub trait Transport: Send + Sync {
    /// Submit a request.
    ///
    /// # Errors
    ///
    /// Returns a transport-kind error (connection, TLS, timeout) on
    /// network or protocol failure. A non-2xx HTTP status is a normal
    /// response, not an error.
    fn submit(&self, request: Request) -> TransportFuture<'_>;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn submit(&self, request: Request) -> TransportFuture<'_> {
        (**self).submit(request)
    }
}

/// Produces the transport handle a client will use.
///
/// A factory may build a fresh transport per client instance or hand out
/// one shared handle; the engine assumes neither.
pub trait TransportFactory: Send + Sync {
    /// Produce a transport handle.
    fn create(&self) -> Arc<dyn Transport>;
}

impl<F> TransportFactory for F
where
    F: Fn() -> Arc<dyn Transport> + Send + Sync,
{
    fn create(&self) -> Arc<dyn Transport> {
        self()
    }
}

/// A factory that hands out the same transport handle every time.
#[derive(Clone)]
pub struct SharedTransport(Arc<dyn Transport>);

impl SharedTransport {
    /// Wrap an existing transport for sharing across clients.
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self(transport)
    }
}

impl std::fmt::Debug for SharedTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedTransport").finish_non_exhaustive()
    }
}

impl TransportFactory for SharedTransport {
    fn create(&self) -> Arc<dyn Transport> {
        Arc::clone(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FinalUrl, Headers, Method};
    use bytes::Bytes;

    struct StaticTransport(u16);

    impl Transport for StaticTransport {
        fn submit(&self, _request: Request) -> TransportFuture<'_> {
            let status = self.0;
            Box::pin(async move { Ok(Response::new(status, Headers::new(), Bytes::new())) })
        }
    }

    fn request() -> Request {
        Request::builder(
            Method::Get,
            FinalUrl::parse("http://foo").expect("url"),
        )
        .build()
    }

    #[test]
    fn shared_factory_reuses_one_handle() {
        let transport: Arc<dyn Transport> = Arc::new(StaticTransport(200));
        let factory = SharedTransport::new(Arc::clone(&transport));

        let first = factory.create();
        let second = factory.create();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn closure_factory_builds_fresh_handles() {
        let factory = || -> Arc<dyn Transport> { Arc::new(StaticTransport(200)) };
        let first = factory.create();
        let second = factory.create();
        assert!(!Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn submit_returns_raw_response() {
        let transport = StaticTransport(404);
        let response = futures_block_on(transport.submit(request())).expect("response");
        // Non-2xx comes back as a response, never an error.
        assert_eq!(response.status(), 404);
    }

    // Minimal executor for the synchronous test double above.
    fn futures_block_on<F: Future>(future: F) -> F::Output {
        use std::sync::mpsc;
        use std::task::{Context, Poll, Wake, Waker};

        struct ChannelWaker(mpsc::Sender<()>);
        impl Wake for ChannelWaker {
            fn wake(self: Arc<Self>) {
                let _ = self.0.send(());
            }
        }

        let (sender, receiver) = mpsc::channel();
        let waker = Waker::from(Arc::new(ChannelWaker(sender)));
        let mut context = Context::from_waker(&waker);
        let mut future = std::pin::pin!(future);

        loop {
            match future.as_mut().poll(&mut context) {
                Poll::Ready(output) => return output,
                Poll::Pending => {
                    receiver.recv().expect("waker dropped");
                }
            }
        }
    }
}
