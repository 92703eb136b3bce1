//! # GraphiteEndpoint — tagged events to the graphite events API
//!
//! Publishes every [`Measurement::Event`] as a JSON document to
//! `<addr>/events/`. Numeric measurements are skipped; pair this endpoint with
//! [`StatsdEndpoint`](super::StatsdEndpoint) for those.
//!
//! ## Request
//! ```text
//! POST <addr>/events/
//! Authorization: Basic ...          (only when a username is configured)
//! {"what":"deploy","tags":["svc","deploy"],"when":1700000000,"data":"v1.4.2"}
//! ```
//! Publish failures are logged and the event is dropped.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{info, warn};

use crate::endpoints::{Endpoint, StatStream};
use crate::measures::{Measurement, TaggedEvent};

/// Per-request timeout of the HTTP client.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Endpoint posting tagged events to graphite.
pub struct GraphiteEndpoint {
    client: reqwest::Client,
    url: String,
    prefix: String,
    username: String,
    password: String,
    verbose: bool,
}

/// JSON body of one event.
#[derive(Debug, Serialize)]
struct EventPayload<'a> {
    what: &'a str,
    tags: Vec<&'a str>,
    when: u64,
    data: &'a str,
}

impl GraphiteEndpoint {
    /// Builds the endpoint and its HTTP client.
    ///
    /// `addr` may omit the scheme, in which case `http://` is assumed.
    ///
    /// # Errors
    /// Returns the client-construction error from `reqwest`.
    pub fn new(addr: &str, prefix: impl Into<String>) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            url: events_url(addr),
            prefix: prefix.into(),
            username: String::new(),
            password: String::new(),
            verbose: false,
        })
    }

    /// Sends basic-auth credentials with every request (ignored if `username` is empty).
    #[must_use]
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = username.into();
        self.password = password.into();
        self
    }

    /// Logs every successful publish at `info`.
    #[must_use]
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Target URL of the events API.
    pub fn url(&self) -> &str {
        &self.url
    }

    fn payload<'a>(&'a self, ev: &'a TaggedEvent) -> EventPayload<'a> {
        let mut tags = Vec::with_capacity(2);
        if !self.prefix.is_empty() {
            tags.push(self.prefix.as_str());
        }
        tags.push(ev.tag.as_str());

        EventPayload {
            what: &ev.tag,
            tags,
            when: ev.unix_secs(),
            data: &ev.data,
        }
    }

    async fn publish(&self, ev: &TaggedEvent) {
        let mut req = self.client.post(self.url.as_str()).json(&self.payload(ev));
        if !self.username.is_empty() {
            req = req.basic_auth(&self.username, Some(&self.password));
        }

        match req.send().await.and_then(|r| r.error_for_status()) {
            Ok(resp) => {
                if self.verbose {
                    info!(
                        tag = %ev.tag,
                        status = %resp.status(),
                        url = %self.url,
                        "graphite event published"
                    );
                }
            }
            Err(e) => warn!(tag = %ev.tag, error = %e, "graphite event publish failed"),
        }
    }
}

#[async_trait]
impl Endpoint for GraphiteEndpoint {
    async fn run(&mut self, mut stats: StatStream) {
        while let Some(m) = stats.recv().await {
            if let Measurement::Event(ev) = m.as_ref() {
                self.publish(ev).await;
            }
        }
    }

    fn name(&self) -> &str {
        "graphite"
    }
}

fn events_url(addr: &str) -> String {
    let base = addr.trim_end_matches('/');
    if base.contains("://") {
        format!("{base}/events/")
    } else {
        format!("http://{base}/events/")
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, UNIX_EPOCH};

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    use super::*;
    use crate::Broker;

    /// Accepts one HTTP request, answers with `status` and returns the raw request text.
    async fn fake_graphite(status: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();

        let server = tokio::spawn(async move {
            let (mut conn, _) = listener.accept().await.unwrap();
            let mut raw = Vec::new();
            let mut chunk = [0u8; 1024];
            loop {
                let n = conn.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                raw.extend_from_slice(&chunk[..n]);
                if request_complete(&raw) {
                    break;
                }
            }
            let reply =
                format!("HTTP/1.1 {status}\r\ncontent-length: 0\r\nconnection: close\r\n\r\n");
            conn.write_all(reply.as_bytes()).await.unwrap();
            conn.shutdown().await.unwrap();
            String::from_utf8(raw).unwrap()
        });

        (addr, server)
    }

    fn request_complete(raw: &[u8]) -> bool {
        let text = String::from_utf8_lossy(raw);
        let Some((head, body)) = text.split_once("\r\n\r\n") else {
            return false;
        };
        let len = head
            .lines()
            .find_map(|l| {
                let (k, v) = l.split_once(':')?;
                k.eq_ignore_ascii_case("content-length")
                    .then(|| v.trim().parse::<usize>().ok())
                    .flatten()
            })
            .unwrap_or(0);
        body.len() >= len
    }

    #[test]
    fn events_url_adds_scheme_and_path() {
        assert_eq!(events_url("graphite:8080"), "http://graphite:8080/events/");
        assert_eq!(
            events_url("https://graphite.example.com/"),
            "https://graphite.example.com/events/"
        );
    }

    #[test]
    fn payload_shape() {
        let ep = GraphiteEndpoint::new("localhost", "svc").unwrap();
        let ev = TaggedEvent::new("deploy", "v1.4.2")
            .with_when(UNIX_EPOCH + Duration::from_secs(1_700_000_000));

        let json = serde_json::to_value(ep.payload(&ev)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "what": "deploy",
                "tags": ["svc", "deploy"],
                "when": 1_700_000_000u64,
                "data": "v1.4.2",
            })
        );
    }

    #[test]
    fn empty_prefix_is_not_a_tag() {
        let ep = GraphiteEndpoint::new("localhost", "").unwrap();
        let ev = TaggedEvent::new("flush", "");
        assert_eq!(ep.payload(&ev).tags, vec!["flush"]);
    }

    #[tokio::test]
    async fn publishes_events_with_basic_auth() {
        let (addr, server) = fake_graphite("200 OK").await;

        let broker = Broker::start(8);
        let endpoint = GraphiteEndpoint::new(&addr, "svc")
            .unwrap()
            .with_credentials("user", "pw")
            .verbose(true);
        broker.register_endpoint(endpoint).unwrap();

        broker.incr("skipped");
        broker.event("deploy", "v1.4.2");
        broker.finish(Duration::from_secs(5)).await.unwrap();

        let request = server.await.unwrap();
        let lower = request.to_ascii_lowercase();
        assert!(request.starts_with("POST /events/ HTTP/1.1"), "{request}");
        // base64("user:pw")
        assert!(lower.contains("authorization: basic dxnlcjpwdw=="), "{request}");
        assert!(lower.contains("content-type: application/json"), "{request}");
        assert!(request.contains(r#""what":"deploy""#), "{request}");
        assert!(request.contains(r#""tags":["svc","deploy"]"#), "{request}");
        assert!(request.contains(r#""data":"v1.4.2""#), "{request}");
    }

    #[tokio::test]
    async fn rejected_publish_is_dropped() {
        let (addr, server) = fake_graphite("500 Internal Server Error").await;

        let broker = Broker::start(8);
        broker
            .register_endpoint(GraphiteEndpoint::new(&addr, "").unwrap())
            .unwrap();

        broker.event("flush", "");
        assert_eq!(broker.finish(Duration::from_secs(5)).await, Ok(()));

        let request = server.await.unwrap();
        assert!(!request.to_ascii_lowercase().contains("authorization:"), "{request}");
        assert!(request.contains(r#""tags":["flush"]"#), "{request}");
    }
}
