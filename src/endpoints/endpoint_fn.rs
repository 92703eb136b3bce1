//! # Closure-backed endpoint (`EndpointFn`)
//!
//! [`EndpointFn`] wraps a closure `F: FnOnce(StatStream) -> Fut`, so ad-hoc
//! consumers do not need a dedicated type.
//!
//! ## Example
//! ```rust
//! use statbroker::{Endpoint, EndpointFn, StatStream};
//!
//! let ep = EndpointFn::new("drain", |mut stats: StatStream| async move {
//!     while stats.recv().await.is_some() {}
//! });
//! assert_eq!(ep.name(), "drain");
//! ```

use std::borrow::Cow;
use std::future::Future;

use async_trait::async_trait;

use super::{Endpoint, StatStream};

/// Function-backed endpoint implementation.
///
/// The closure is consumed by the first (and only) call to [`Endpoint::run`].
pub struct EndpointFn<F> {
    name: Cow<'static, str>,
    capacity: Option<usize>,
    f: Option<F>,
}

impl<F> EndpointFn<F> {
    /// Creates a new function-backed endpoint.
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            name: name.into(),
            capacity: None,
            f: Some(f),
        }
    }

    /// Sets the private queue capacity for this endpoint.
    #[must_use]
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity.max(1));
        self
    }
}

#[async_trait]
impl<F, Fut> Endpoint for EndpointFn<F>
where
    F: FnOnce(StatStream) -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    async fn run(&mut self, stats: StatStream) {
        if let Some(f) = self.f.take() {
            f(stats).await;
        }
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn queue_capacity(&self) -> Option<usize> {
        self.capacity
    }
}
