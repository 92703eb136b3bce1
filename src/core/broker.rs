//! # Broker: the coordination point between producers and endpoints.
//!
//! [`Broker`] is a cloneable handle to the inbound channel of a fan-out task.
//! It carries no state of its own; the endpoint list lives inside the task.
//!
//! ## Lifecycle
//! ```text
//! Broker::start(cap) ──► spawn FanOut::run
//!
//! send(m)               ──► try_send(Stat)      full/closed → dropped silently
//! register_endpoint(ep) ──► try_send(Register)  full → BufferFull, closed → Closed
//! finish(deadline)      ──► try_send(Shutdown)  full → BufferFull, closed → Ok (no-op)
//!                           └─► wait: drain done → Ok | deadline → DeadlineExceeded
//! ```
//!
//! ## Rules
//! - `send` and `register_endpoint` never block.
//! - `finish` blocks for at most `deadline`; the drain continues in the background
//!   when the deadline wins.
//! - Everything enqueued before `finish` is offered to endpoints before their
//!   streams close.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use statbroker::{Broker, EndpointFn, StatStream};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), statbroker::BrokerError> {
//!     let broker = Broker::start(128);
//!
//!     broker.register_endpoint(EndpointFn::new("stdout", |mut stats: StatStream| async move {
//!         while let Some(m) = stats.recv().await {
//!             println!("{m:?}");
//!         }
//!     }))?;
//!
//!     broker.incr("requests");
//!     broker.timing("latency", 12);
//!
//!     broker.finish(Duration::from_secs(1)).await
//! }
//! ```

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::time;

use super::envelope::Envelope;
use super::fanout::FanOut;
use crate::endpoints::Endpoint;
use crate::error::BrokerError;
use crate::measures::Measurement;

/// Handle to a running fan-out task.
///
/// Cheap to clone; every clone feeds the same inbound channel. When the last
/// clone is dropped the fan-out task drains its endpoints and exits.
#[derive(Clone, Debug)]
pub struct Broker {
    tx: mpsc::Sender<Envelope>,
}

impl Broker {
    /// Starts the fan-out task and returns a handle to it.
    ///
    /// `capacity` bounds the inbound channel (measurements, registrations and
    /// shutdown requests together) and is the default capacity of each
    /// endpoint's private queue. Clamped to a minimum of 1.
    ///
    /// # Panics
    /// Panics if called outside a Tokio runtime.
    pub fn start(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (tx, rx) = mpsc::channel(capacity);
        tokio::spawn(FanOut::new(rx, capacity).run());
        tracing::debug!(capacity, "broker started");
        Self { tx }
    }

    /// Offers a measurement to the fan-out task.
    ///
    /// Never blocks and never fails: if the inbound channel is full or the
    /// broker has stopped, the measurement is dropped.
    pub fn send(&self, measurement: Measurement) {
        let _ = self.tx.try_send(Envelope::Stat(Arc::new(measurement)));
    }

    /// Requests registration of an endpoint.
    ///
    /// The endpoint starts receiving measurements enqueued after this call.
    ///
    /// # Errors
    /// - [`BrokerError::BufferFull`] if the inbound channel is saturated;
    /// - [`BrokerError::Closed`] if the broker has stopped accepting entries.
    pub fn register_endpoint<E: Endpoint>(&self, endpoint: E) -> Result<(), BrokerError> {
        self.register_boxed(Box::new(endpoint))
    }

    /// Same as [`register_endpoint`](Self::register_endpoint) for an already boxed endpoint.
    pub fn register_boxed(&self, endpoint: Box<dyn Endpoint>) -> Result<(), BrokerError> {
        self.enqueue(Envelope::Register(endpoint))
    }

    /// Shuts the broker down after every previously enqueued entry is offered.
    ///
    /// Closes every endpoint stream and waits until all endpoints returned, or
    /// until `deadline` elapses. Calling it on a broker that already stopped
    /// accepting entries is a no-op: the `Ok(())` it returns says nothing about
    /// an earlier drain that exceeded its own deadline and is still running.
    ///
    /// # Errors
    /// - [`BrokerError::BufferFull`] if the shutdown request could not be enqueued;
    /// - [`BrokerError::DeadlineExceeded`] if the drain outlived `deadline`.
    pub async fn finish(&self, deadline: Duration) -> Result<(), BrokerError> {
        let (done_tx, done_rx) = oneshot::channel();
        match self.enqueue(Envelope::Shutdown(done_tx)) {
            Ok(()) => {}
            Err(BrokerError::Closed) => return Ok(()),
            Err(e) => return Err(e),
        }

        // A dropped sender means the request sat behind another shutdown
        // whose drain has completed.
        match time::timeout(deadline, done_rx).await {
            Ok(_) => Ok(()),
            Err(_) => Err(BrokerError::DeadlineExceeded { deadline }),
        }
    }

    /// True once the fan-out task stopped accepting entries.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    /// Capacity of the inbound channel.
    pub fn capacity(&self) -> usize {
        self.tx.max_capacity()
    }

    fn enqueue(&self, entry: Envelope) -> Result<(), BrokerError> {
        self.tx.try_send(entry).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => BrokerError::BufferFull,
            mpsc::error::TrySendError::Closed(_) => BrokerError::Closed,
        })
    }
}
