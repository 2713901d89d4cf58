// src/checker/http.rs
// =============================================================================
// This module checks if resolved URLs are served by the site.
//
// Key functionality:
// - Prober trait: "ask for this URL, tell me the status code"
// - HttpProber: the real implementation, a reqwest HEAD (or GET) request
//   that follows redirects
// - check_url: wraps any prober with a hard timeout and turns the outcome
//   into a LinkStatus. Only the configured success code (200) counts as OK,
//   every other status, a timeout or a failed request is "broken".
// - check_links: runs many checks at once on a bounded worker pool
//
// Rust concepts:
// - Traits with async methods (returning impl Future)
// - tokio::time::timeout: give up on a future after a deadline
// - Streams: buffer_unordered keeps N checks in flight
// =============================================================================

use std::future::Future;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use reqwest::{Client, Method};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{CheckError, ReachabilityFailure};

/// What a single probe observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The server answered (after following redirects) with this status.
    Status(u16),
    /// The request could not be made or did not complete.
    Failed(String),
}

/// Something that can ask whether a URL exists.
///
/// The HTTP implementation is the default, tests substitute canned answers.
pub trait Prober {
    fn probe(&self, url: &str, timeout: Duration) -> impl Future<Output = ProbeOutcome> + Send;
}

/// HTTP method used for probing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ProbeMethod {
    #[default]
    Head,
    Get,
}

/// Probes URLs with reqwest.
#[derive(Debug, Clone)]
pub struct HttpProber {
    client: Client,
    method: Method,
}

impl HttpProber {
    /// Creates a prober whose client follows up to `max_redirects` redirects.
    pub fn new(method: ProbeMethod, timeout: Duration, max_redirects: usize) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(max_redirects))
            .build()?;

        let method = match method {
            ProbeMethod::Head => Method::HEAD,
            ProbeMethod::Get => Method::GET,
        };

        Ok(Self { client, method })
    }
}

impl Prober for HttpProber {
    fn probe(&self, url: &str, timeout: Duration) -> impl Future<Output = ProbeOutcome> + Send {
        let request = self.client.request(self.method.clone(), url).timeout(timeout);
        async move {
            match request.send().await {
                Ok(response) => ProbeOutcome::Status(response.status().as_u16()),
                Err(e) => ProbeOutcome::Failed(describe_error(&e)),
            }
        }
    }
}

// Categorizes reqwest errors into something short enough for a log line
fn describe_error(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        "request timed out".to_string()
    } else if error.is_redirect() {
        "too many redirects".to_string()
    } else if error.is_connect() {
        "connection failed".to_string()
    } else {
        error.to_string()
    }
}

/// The verdict for one URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LinkStatus {
    /// Answered with the success code
    Ok,
    /// Answered with any other code (404, 301 that was not followed, 204, ...)
    Broken { code: u16 },
    /// No answer within the timeout
    Timeout,
    /// The request itself failed
    Error { message: String },
}

impl LinkStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, LinkStatus::Ok)
    }
}

/// How probes are run.
#[derive(Debug, Clone, Copy)]
pub struct ProbeSettings {
    pub timeout: Duration,
    pub success_status: u16,
    pub concurrency: usize,
}

/// Checks one URL. Never fails: problems become a non-OK status.
///
/// The prober gets its own timeout too, but the outer one is what guarantees
/// a hung probe is abandoned.
pub async fn check_url<P: Prober>(prober: &P, url: &str, settings: &ProbeSettings) -> LinkStatus {
    let outcome = tokio::time::timeout(settings.timeout, prober.probe(url, settings.timeout)).await;

    match outcome {
        Ok(ProbeOutcome::Status(code)) if code == settings.success_status => LinkStatus::Ok,
        Ok(ProbeOutcome::Status(code)) => {
            debug!(url, code, "unexpected status");
            LinkStatus::Broken { code }
        }
        Ok(ProbeOutcome::Failed(reason)) => {
            let err = CheckError::Reachability {
                url: url.to_string(),
                reason: ReachabilityFailure::Request(reason.clone()),
            };
            warn!("{err}");
            LinkStatus::Error { message: reason }
        }
        Err(_) => {
            let err = CheckError::Reachability {
                url: url.to_string(),
                reason: ReachabilityFailure::Timeout(settings.timeout),
            };
            warn!("{err}");
            LinkStatus::Timeout
        }
    }
}

/// Checks every job's URL, keeping up to `settings.concurrency` probes in flight.
///
/// Results come back in completion order, each paired with the job it
/// belongs to.
pub async fn check_links<P, T>(
    prober: &P,
    jobs: Vec<(T, String)>,
    settings: &ProbeSettings,
) -> Vec<(T, String, LinkStatus)>
where
    P: Prober,
{
    let futures = jobs.into_iter().map(|(job, url)| async move {
        let status = check_url(prober, &url, settings).await;
        (job, url, status)
    });

    stream::iter(futures)
        .buffer_unordered(settings.concurrency.max(1))
        .collect()
        .await
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why does Prober return `impl Future` instead of using `async fn`?
//    - An `async fn` in a public trait does not promise its future is Send
//    - Spelling out `impl Future<Output = ...> + Send` makes that promise,
//      so the futures can later move to other threads if we spawn them
//
// 2. Why wrap the probe in tokio::time::timeout when reqwest has a timeout?
//    - Not every Prober is reqwest; a test prober can hang forever
//    - When the deadline passes the probe future is dropped, which cancels
//      it, and only that one check is affected
//
// 3. What is buffer_unordered?
//    - It polls up to N futures at once and yields results as they finish
//    - Each result carries its job, so order does not matter for attribution
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::net::SocketAddr;
    use std::sync::{Arc, Mutex};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Answers from a fixed table, 404 for anything else.
    struct TableProber(HashMap<String, ProbeOutcome>);

    impl Prober for TableProber {
        fn probe(&self, url: &str, _timeout: Duration) -> impl Future<Output = ProbeOutcome> + Send {
            let outcome = self
                .0
                .get(url)
                .cloned()
                .unwrap_or(ProbeOutcome::Status(404));
            async move { outcome }
        }
    }

    /// Never answers in time.
    struct HangingProber;

    impl Prober for HangingProber {
        fn probe(&self, _url: &str, _timeout: Duration) -> impl Future<Output = ProbeOutcome> + Send {
            async {
                tokio::time::sleep(Duration::from_secs(30)).await;
                ProbeOutcome::Status(200)
            }
        }
    }

    fn settings() -> ProbeSettings {
        ProbeSettings {
            timeout: Duration::from_millis(50),
            success_status: 200,
            concurrency: 4,
        }
    }

    fn table(entries: &[(&str, ProbeOutcome)]) -> TableProber {
        TableProber(
            entries
                .iter()
                .map(|(url, outcome)| (url.to_string(), outcome.clone()))
                .collect(),
        )
    }

    #[tokio::test]
    async fn test_only_success_code_is_ok() {
        let prober = table(&[
            ("http://site/ok/", ProbeOutcome::Status(200)),
            ("http://site/moved/", ProbeOutcome::Status(301)),
            ("http://site/empty/", ProbeOutcome::Status(204)),
        ]);

        assert_eq!(check_url(&prober, "http://site/ok/", &settings()).await, LinkStatus::Ok);
        assert_eq!(
            check_url(&prober, "http://site/moved/", &settings()).await,
            LinkStatus::Broken { code: 301 }
        );
        assert_eq!(
            check_url(&prober, "http://site/empty/", &settings()).await,
            LinkStatus::Broken { code: 204 }
        );
    }

    #[tokio::test]
    async fn test_timeout_is_unreachable() {
        let status = check_url(&HangingProber, "http://site/slow/", &settings()).await;
        assert_eq!(status, LinkStatus::Timeout);
        assert!(!status.is_ok());
    }

    #[tokio::test]
    async fn test_failed_probe_is_unreachable() {
        let prober = table(&[(
            "http://site/down/",
            ProbeOutcome::Failed("connection failed".to_string()),
        )]);
        let status = check_url(&prober, "http://site/down/", &settings()).await;
        assert_eq!(
            status,
            LinkStatus::Error {
                message: "connection failed".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_check_links_keeps_attribution() {
        let prober = table(&[("http://site/a/", ProbeOutcome::Status(200))]);
        let jobs = vec![
            (1, "http://site/a/".to_string()),
            (2, "http://site/b/".to_string()),
            (3, "http://site/a/".to_string()),
        ];

        let mut results = check_links(&prober, jobs, &settings()).await;
        results.sort_by_key(|(id, _, _)| *id);

        let summary: Vec<_> = results
            .iter()
            .map(|(id, url, status)| (*id, url.as_str(), status.is_ok()))
            .collect();
        assert_eq!(
            summary,
            vec![
                (1, "http://site/a/", true),
                (2, "http://site/b/", false),
                (3, "http://site/a/", true),
            ]
        );
    }

    /// Serves canned responses on a local port, recording each request's method.
    async fn serve_canned(methods: Arc<Mutex<Vec<String>>>) -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let methods = Arc::clone(&methods);
                tokio::spawn(async move {
                    let mut head = Vec::new();
                    let mut buf = [0u8; 1024];
                    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                        match socket.read(&mut buf).await {
                            Ok(0) | Err(_) => return,
                            Ok(n) => head.extend_from_slice(&buf[..n]),
                        }
                    }

                    let head = String::from_utf8_lossy(&head);
                    let mut request_line = head.lines().next().unwrap_or("").split_whitespace();
                    let method = request_line.next().unwrap_or("").to_string();
                    let path = request_line.next().unwrap_or("").to_string();
                    methods.lock().unwrap().push(method);

                    let response = match path.as_str() {
                        "/moved/" => "HTTP/1.1 301 Moved Permanently\r\nLocation: /ok/\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
                        "/ok/" => "HTTP/1.1 200 OK\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
                        "/empty/" => "HTTP/1.1 204 No Content\r\nConnection: close\r\n\r\n",
                        _ => "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
                    };
                    let _ = socket.write_all(response.as_bytes()).await;
                    let _ = socket.shutdown().await;
                });
            }
        });

        addr
    }

    fn http_settings() -> ProbeSettings {
        ProbeSettings {
            timeout: Duration::from_secs(5),
            success_status: 200,
            concurrency: 4,
        }
    }

    #[tokio::test]
    async fn test_http_prober_against_local_server() {
        let methods = Arc::new(Mutex::new(Vec::new()));
        let addr = serve_canned(Arc::clone(&methods)).await;
        let prober = HttpProber::new(ProbeMethod::Head, Duration::from_secs(5), 10).unwrap();
        let url = |path: &str| format!("http://{addr}{path}");

        // The redirect is followed and the final 200 counts
        assert_eq!(check_url(&prober, &url("/moved/"), &http_settings()).await, LinkStatus::Ok);
        assert_eq!(
            check_url(&prober, &url("/missing/"), &http_settings()).await,
            LinkStatus::Broken { code: 404 }
        );
        assert_eq!(
            check_url(&prober, &url("/empty/"), &http_settings()).await,
            LinkStatus::Broken { code: 204 }
        );

        let methods = methods.lock().unwrap().clone();
        assert_eq!(methods.len(), 4);
        assert!(methods.iter().all(|m| m == "HEAD"), "methods sent: {methods:?}");
    }

    #[tokio::test]
    async fn test_http_prober_can_send_get() {
        let methods = Arc::new(Mutex::new(Vec::new()));
        let addr = serve_canned(Arc::clone(&methods)).await;
        let prober = HttpProber::new(ProbeMethod::Get, Duration::from_secs(5), 10).unwrap();

        let status = check_url(&prober, &format!("http://{addr}/ok/"), &http_settings()).await;
        assert_eq!(status, LinkStatus::Ok);
        assert_eq!(*methods.lock().unwrap(), vec!["GET".to_string()]);
    }

    #[tokio::test]
    async fn test_http_prober_respects_redirect_limit() {
        let methods = Arc::new(Mutex::new(Vec::new()));
        let addr = serve_canned(Arc::clone(&methods)).await;
        let prober = HttpProber::new(ProbeMethod::Head, Duration::from_secs(5), 0).unwrap();

        // With no redirects allowed the 301 is never followed to the 200
        let status = check_url(&prober, &format!("http://{addr}/moved/"), &http_settings()).await;
        assert!(!status.is_ok());
    }

    #[test]
    fn test_link_status_is_ok() {
        assert!(LinkStatus::Ok.is_ok());
        assert!(!LinkStatus::Broken { code: 404 }.is_ok());
        assert!(!LinkStatus::Timeout.is_ok());
    }
}
