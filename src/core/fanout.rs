//! # Fan-out loop: the broker's event-loop state machine.
//!
//! [`FanOut`] is the only owner of the active-endpoint list; no lock is needed.
//!
//! ## States
//! ```text
//! running ──(Shutdown | all handles dropped)──► draining ──► stopped
//!
//! running:
//!   Register(ep) ──► spawn runner, push          (stay running)
//!   Stat(m)      ──► offer to every endpoint     (stay running)
//!   Shutdown(tx) ──► draining
//!
//! draining:
//!   1. close inbound channel (later entries are never processed)
//!   2. drop every endpoint sender
//!   3. join every runner
//!   4. tx.send(())                               ──► stopped
//! ```
//!
//! ## Rules
//! - Entries are processed strictly in arrival order.
//! - A full endpoint queue drops for that endpoint only; the loop never waits on it.
//! - Every endpoint sees measurements in the same relative order.

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, trace};

use super::envelope::Envelope;
use super::runner::ActiveEndpoint;

/// Outcome of one loop step.
enum Step {
    Continue,
    Drain(oneshot::Sender<()>),
}

pub(crate) struct FanOut {
    rx: mpsc::Receiver<Envelope>,
    endpoints: Vec<ActiveEndpoint>,
    capacity: usize,
}

impl FanOut {
    pub(crate) fn new(rx: mpsc::Receiver<Envelope>, capacity: usize) -> Self {
        Self {
            rx,
            endpoints: Vec::new(),
            capacity,
        }
    }

    /// Runs until a shutdown entry is accepted or every broker handle is dropped.
    pub(crate) async fn run(mut self) {
        let pill = loop {
            let Some(entry) = self.rx.recv().await else {
                debug!("all broker handles dropped; draining");
                break None;
            };
            if let Step::Drain(done) = self.step(entry) {
                debug!(endpoints = self.endpoints.len(), "shutdown accepted; draining");
                break Some(done);
            }
        };

        self.rx.close();
        self.drain().await;

        if let Some(done) = pill {
            let _ = done.send(());
        }
        debug!("broker stopped");
    }

    fn step(&mut self, entry: Envelope) -> Step {
        trace!(entry = entry.as_label(), "processing entry");
        match entry {
            Envelope::Stat(m) => {
                for endpoint in &self.endpoints {
                    endpoint.offer(&m);
                }
                Step::Continue
            }
            Envelope::Register(endpoint) => {
                self.endpoints
                    .push(ActiveEndpoint::spawn(endpoint, self.capacity));
                Step::Continue
            }
            Envelope::Shutdown(done) => Step::Drain(done),
        }
    }

    /// Closes every endpoint queue first, then waits for all runners.
    async fn drain(&mut self) {
        let runners: Vec<_> = self
            .endpoints
            .drain(..)
            .map(ActiveEndpoint::into_runner)
            .collect();

        for runner in runners {
            runner.join().await;
        }
    }
}

impl Drop for FanOut {
    fn drop(&mut self) {
        self.rx.close();
        let pending = std::iter::from_fn(|| self.rx.try_recv().ok()).count();
        if pending > 0 {
            debug!(pending, "discarding entries queued behind shutdown");
        }
    }
}
