use crate::barrier::EndpointBarrier;
use crate::quota::QuotaReport;
use futures::future::BoxFuture;
use std::task::{Context, Poll};
use tower_layer::Layer;
use tower_service::Service;

/// A layer that routes every call of the wrapped service through an [`EndpointBarrier`].
///
/// The inner service's responses must report quota. Errors are passed through unchanged.
#[derive(Clone, Debug)]
pub struct EndpointBarrierLayer {
    barrier: EndpointBarrier,
}

impl EndpointBarrierLayer {
    /// Create a new layer around `barrier`. Services produced by the layer share its slot.
    pub fn new(barrier: EndpointBarrier) -> Self {
        Self { barrier }
    }
}

impl<S> Layer<S> for EndpointBarrierLayer {
    type Service = EndpointBarrierService<S>;

    fn layer(&self, service: S) -> Self::Service {
        EndpointBarrierService { inner: service, barrier: self.barrier.clone() }
    }
}

/// Middleware service produced by [`EndpointBarrierLayer`].
#[derive(Clone, Debug)]
pub struct EndpointBarrierService<S> {
    inner: S,
    barrier: EndpointBarrier,
}

impl<S> EndpointBarrierService<S> {
    pub fn barrier(&self) -> &EndpointBarrier {
        &self.barrier
    }
}

impl<S, Req> Service<Req> for EndpointBarrierService<S>
where
    S: Service<Req> + Clone + Send + 'static,
    S::Response: QuotaReport + Send + 'static,
    S::Error: Send + 'static,
    S::Future: Send + 'static,
    Req: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Req) -> Self::Future {
        // Take the service that was driven to readiness and leave a fresh clone behind.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        let barrier = self.barrier.clone();

        Box::pin(async move { barrier.guarded_call(move || inner.call(req)).await })
    }
}
