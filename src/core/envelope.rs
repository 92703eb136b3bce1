//! Entries carried by the broker's inbound channel.
//!
//! Registration and shutdown travel through the same ordered channel as
//! measurements, so a shutdown is causally ordered after every entry enqueued
//! before it.

use std::sync::Arc;

use tokio::sync::oneshot;

use crate::endpoints::Endpoint;
use crate::measures::Measurement;

pub(crate) enum Envelope {
    /// A measurement to fan out.
    Stat(Arc<Measurement>),
    /// An endpoint to start.
    Register(Box<dyn Endpoint>),
    /// Poison pill; fulfilled once every endpoint runner has finished.
    Shutdown(oneshot::Sender<()>),
}

impl Envelope {
    pub(crate) fn as_label(&self) -> &'static str {
        match self {
            Envelope::Stat(_) => "stat",
            Envelope::Register(_) => "register",
            Envelope::Shutdown(_) => "shutdown",
        }
    }
}
