//! Broker core: handle, fan-out loop and shutdown protocol.
//!
//! The only public API from this module is [`Broker`] (plus the default-broker
//! helpers). Everything else is owned by the fan-out task.
//!
//! Internal modules:
//! - [`broker`]: the cloneable handle; non-blocking enqueue of every entry kind;
//! - [`envelope`]: the closed set of entries carried by the inbound channel;
//! - [`fanout`]: the single task that owns the endpoint list and drains on shutdown;
//! - [`runner`]: per-endpoint queue and runner task;
//! - [`facade`]: typed producer helpers on [`Broker`];
//! - [`default`]: optional process-wide broker and free-function facade.
//!
//! ## Wiring
//! ```text
//! producers ── send / register_endpoint / finish ──► [inbound channel] ──► FanOut::run
//!                                                                            │
//!                         Stat(m)      ──► offer Arc<m> to every ActiveEndpoint (try_send)
//!                         Register(ep) ──► ActiveEndpoint::spawn (queue + runner task)
//!                         Shutdown(tx) ──► close channel, close queues, join runners, tx.send(())
//! ```

pub(crate) mod broker;
pub(crate) mod default;
mod envelope;
mod facade;
mod fanout;
mod runner;

pub use broker::Broker;
