//! # Read-only measurement stream handed to endpoints.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::Stream;
use tokio::sync::mpsc;

use crate::measures::Measurement;

/// Receiving half of an endpoint's private queue.
///
/// Yields measurements in the order the broker observed them, and `None` once
/// the broker has closed the queue and the backlog is drained. Also usable as a
/// [`futures::Stream`].
#[derive(Debug)]
pub struct StatStream {
    rx: mpsc::Receiver<Arc<Measurement>>,
}

impl StatStream {
    pub(crate) fn new(rx: mpsc::Receiver<Arc<Measurement>>) -> Self {
        Self { rx }
    }

    /// Waits for the next measurement.
    pub async fn recv(&mut self) -> Option<Arc<Measurement>> {
        self.rx.recv().await
    }

    /// Takes a measurement if one is already queued.
    pub fn try_recv(&mut self) -> Option<Arc<Measurement>> {
        self.rx.try_recv().ok()
    }

    /// Number of measurements waiting in the queue.
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    /// True if no measurements are waiting.
    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}

impl Stream for StatStream {
    type Item = Arc<Measurement>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    #[tokio::test]
    async fn stream_ends_after_backlog_when_sender_dropped() {
        let (tx, rx) = mpsc::channel(4);
        let stream = StatStream::new(rx);

        tx.try_send(Arc::new(Measurement::count("a", 1))).unwrap();
        tx.try_send(Arc::new(Measurement::count("b", 2))).unwrap();
        drop(tx);

        assert_eq!(stream.len(), 2);
        let names: Vec<String> = stream.map(|m| m.name().to_owned()).collect().await;
        assert_eq!(names, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn try_recv_on_empty_queue() {
        let (_tx, rx) = mpsc::channel::<Arc<Measurement>>(1);
        let mut stream = StatStream::new(rx);
        assert!(stream.is_empty());
        assert!(stream.try_recv().is_none());
    }
}
