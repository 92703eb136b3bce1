//! # Endpoint trait.
//!
//! Provides [`Endpoint`], the extension point for attaching stat sinks to a
//! [`Broker`](crate::Broker).
//!
//! Each registered endpoint gets:
//! - **Dedicated runner task** (spawned when the registration is processed)
//! - **Private bounded queue** (capacity via [`Endpoint::queue_capacity`], or the broker's)
//!
//! ## Rules
//! - A slow endpoint only fills its own queue; overflow drops measurements
//!   **for that endpoint only**.
//! - Measurements arrive in the order the broker observed them.
//! - [`Endpoint::run`] must return once its [`StatStream`] yields `None`,
//!   otherwise [`Broker::finish`](crate::Broker::finish) runs into its deadline.

use async_trait::async_trait;

use super::StatStream;

/// Consumer of a broker's measurement stream.
///
/// ### Implementation requirements
/// - Use async I/O; avoid blocking the executor.
/// - Handle errors internally; the broker neither supervises nor restarts endpoints.
/// - Return when the stream ends.
#[async_trait]
pub trait Endpoint: Send + 'static {
    /// Consumes measurements until the stream is closed.
    ///
    /// Called once, from the endpoint's dedicated runner task.
    async fn run(&mut self, stats: StatStream);

    /// Returns the endpoint name used in logs.
    ///
    /// The default uses `type_name::<Self>()`, which can be verbose - override it when possible.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Returns the preferred capacity of this endpoint's private queue.
    ///
    /// `None` uses the broker's capacity. The broker clamps capacity to a minimum of 1.
    fn queue_capacity(&self) -> Option<usize> {
        None
    }
}
