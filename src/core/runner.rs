//! # Endpoint runners.
//!
//! An [`ActiveEndpoint`] is the fan-out loop's view of one registered endpoint:
//! the writing half of its private queue plus the runner task reading the other
//! half.
//!
//! ```text
//! ActiveEndpoint::spawn(endpoint, cap)
//!     ├─► mpsc::channel(endpoint.queue_capacity() or cap)
//!     └─► tokio::spawn(endpoint.run(StatStream))
//!
//! offer(&m)        ──► try_send(Arc::clone(m)); full/closed → dropped for this endpoint
//! into_runner()    ──► drops the sender (stream yields None after backlog)
//! Runner::join()   ──► awaits the task; panics are logged, never propagated
//! ```

use std::sync::Arc;

use tokio::{sync::mpsc, task::JoinHandle};
use tracing::{debug, error, trace, warn};

use crate::endpoints::{Endpoint, StatStream};
use crate::measures::Measurement;

/// Private queue + runner of one registered endpoint.
pub(crate) struct ActiveEndpoint {
    name: String,
    tx: mpsc::Sender<Arc<Measurement>>,
    runner: JoinHandle<()>,
}

impl ActiveEndpoint {
    /// Creates the private queue and spawns the runner task.
    pub(crate) fn spawn(mut endpoint: Box<dyn Endpoint>, default_capacity: usize) -> Self {
        let capacity = endpoint
            .queue_capacity()
            .unwrap_or(default_capacity)
            .max(1);
        let name = endpoint.name().to_owned();
        let (tx, rx) = mpsc::channel(capacity);

        let runner = tokio::spawn(async move {
            endpoint.run(StatStream::new(rx)).await;
        });
        debug!(endpoint = %name, capacity, "endpoint registered");

        Self { name, tx, runner }
    }

    /// Non-blocking enqueue into this endpoint's queue.
    ///
    /// Returns `false` if the measurement was dropped.
    pub(crate) fn offer(&self, m: &Arc<Measurement>) -> bool {
        match self.tx.try_send(Arc::clone(m)) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                trace!(endpoint = %self.name, stat = m.name(), "endpoint queue full; dropped");
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                trace!(endpoint = %self.name, stat = m.name(), "endpoint returned early; dropped");
                false
            }
        }
    }

    /// Closes the queue, leaving only the runner to wait for.
    pub(crate) fn into_runner(self) -> Runner {
        drop(self.tx);
        Runner {
            name: self.name,
            handle: self.runner,
        }
    }
}

/// A runner whose queue has been closed.
pub(crate) struct Runner {
    name: String,
    handle: JoinHandle<()>,
}

impl Runner {
    /// Waits for the endpoint to return.
    pub(crate) async fn join(self) {
        match self.handle.await {
            Ok(()) => debug!(endpoint = %self.name, "endpoint finished"),
            Err(e) if e.is_panic() => error!(endpoint = %self.name, "endpoint panicked"),
            Err(e) => warn!(endpoint = %self.name, error = %e, "endpoint task aborted"),
        }
    }
}
