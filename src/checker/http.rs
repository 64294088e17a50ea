// src/checker/http.rs
// =============================================================================
// This module checks if URLs are alive by making HTTP requests.
//
// Key functionality:
// - Makes one HTTP GET request per link (no retries)
// - Classifies each link as INTERNAL or EXTERNAL to the analyzed site
// - Records status code, reachability and how long the request took
// - Runs one task per link, all at the same time
//
// The actual request goes through the `Prober` trait. In production that is
// a reqwest Client; in tests it is a scripted fake, so the checker can be
// exercised without touching the network.
//
// Rust concepts:
// - Traits: The seam between "checking logic" and "how to make a request"
// - tokio::spawn: One concurrent task per link
// - mpsc channels: Many probe tasks send, one collector receives
// =============================================================================

use crate::analyze::{CancellationToken, LinkRecord, LinkType};
use futures::future::BoxFuture;
use reqwest::Client;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tokio::sync::mpsc;

/// Status recorded when a probe times out (HTTP 408 Request Timeout)
pub const TIMEOUT_STATUS: u16 = 408;

/// Status recorded when a probe failed before any response arrived
pub const FAILED_STATUS: u16 = 0;

/// Why a probe did not produce a status code
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProbeError {
    /// The request did not complete within the client timeout
    #[error("request timed out")]
    Timeout,
    /// Any other failure: DNS, refused connection, TLS, unsupported scheme...
    #[error("request failed: {0}")]
    Failed(String),
}

/// Something that can issue a GET request and report the status code
pub trait Prober: Send + Sync {
    fn get<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<u16, ProbeError>>;
}

/// The production prober, backed by a shared reqwest Client.
///
/// The client carries the request timeout, so a stuck server can hold a
/// probe for at most that long.
#[derive(Debug, Clone)]
pub struct HttpProber {
    client: Client,
}

impl HttpProber {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl Prober for HttpProber {
    fn get<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<u16, ProbeError>> {
        Box::pin(async move {
            match self.client.get(url).send().await {
                Ok(response) => Ok(response.status().as_u16()),
                Err(e) if e.is_timeout() => Err(ProbeError::Timeout),
                Err(e) => Err(ProbeError::Failed(e.to_string())),
            }
        })
    }
}

/// Probes every link of a page concurrently.
///
/// Cloning is cheap: clones share the same prober.
#[derive(Clone)]
pub struct LinkChecker {
    prober: Arc<dyn Prober>,
}

impl LinkChecker {
    pub fn new(prober: Arc<dyn Prober>) -> Self {
        Self { prober }
    }

    /// Convenience constructor for the reqwest-backed prober
    pub fn from_client(client: Client) -> Self {
        Self::new(Arc::new(HttpProber::new(client)))
    }

    // Checks multiple links concurrently
    //
    // Parameters:
    //   urls: every resolved link of the page (duplicates included)
    //   base_origin: scheme://host of the page, used for INTERNAL/EXTERNAL
    //   cancel: checked by each probe task before it sends its request
    //
    // Returns: one LinkRecord per URL that was probed, in completion order.
    // If `cancel` was raised, links whose probe had not started yet are
    // skipped and produce no record.
    pub async fn check_links(
        &self,
        urls: Vec<String>,
        base_origin: &str,
        cancel: &CancellationToken,
    ) -> Vec<LinkRecord> {
        let expected = urls.len();
        ::log::debug!("Checking accessibility of {} link(s)", expected);

        // Capacity for every record, so no probe ever waits on the collector
        let (tx, mut rx) = mpsc::channel::<LinkRecord>(expected.max(1));
        let base_origin: Arc<str> = Arc::from(base_origin);

        for url in urls {
            let tx = tx.clone();
            let prober = Arc::clone(&self.prober);
            let base_origin = Arc::clone(&base_origin);
            let cancel = cancel.clone();

            tokio::spawn(async move {
                if cancel.is_cancelled() {
                    ::log::debug!("Skipping probe of {}: analysis cancelled", url);
                    return;
                }
                let record = probe_link(prober.as_ref(), url, &base_origin).await;
                // The collector only goes away if the whole check was dropped
                let _ = tx.send(record).await;
            });
        }

        // Drop our own sender so the channel closes when the last task ends
        drop(tx);

        let mut records = Vec::with_capacity(expected);
        while let Some(record) = rx.recv().await {
            records.push(record);
        }

        ::log::debug!(
            "Link check finished: {} record(s), {} unreachable",
            records.len(),
            records.iter().filter(|r| !r.accessible).count()
        );
        records
    }
}

// Probes a single link and turns the outcome into a LinkRecord
//
// HTTP status codes:
// - 200: the only status that counts as accessible
// - anything else (redirect targets that are not 200, 404, 500...): recorded
//   as-is, not accessible
pub async fn probe_link(prober: &dyn Prober, url: String, base_origin: &str) -> LinkRecord {
    let link_type = classify_link(&url, base_origin);

    let started = Instant::now();
    let outcome = prober.get(&url).await;
    let probe_duration_ms = started.elapsed().as_millis() as u64;

    let (status, accessible) = match outcome {
        Ok(status) => (status, status == 200),
        Err(ProbeError::Timeout) => {
            ::log::debug!("Timeout accessing: {}", url);
            (TIMEOUT_STATUS, false)
        }
        Err(ProbeError::Failed(reason)) => {
            ::log::debug!("Failed accessing: {} | Error: {}", url, reason);
            (FAILED_STATUS, false)
        }
    };

    LinkRecord {
        url,
        accessible,
        link_type,
        status,
        probe_duration_ms,
    }
}

/// INTERNAL when the URL contains the base origin, EXTERNAL otherwise.
///
/// Plain substring containment: "http://sub.example.com" does not contain
/// "http://example.com", so subdomains are EXTERNAL.
pub fn classify_link(url: &str, base_origin: &str) -> LinkType {
    if url.contains(base_origin) {
        LinkType::Internal
    } else {
        LinkType::External
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why a trait for making requests?
//    - LinkChecker only needs "give me a status code for this URL"
//    - Hiding reqwest behind Prober lets tests plug in a fake
//    - Arc<dyn Prober> means "some shared value that implements Prober"
//
// 2. What is BoxFuture?
//    - Traits with async methods need a concrete future type
//    - BoxFuture<'a, T> is a heap-allocated future that outputs T
//    - Box::pin(async move { ... }) creates one
//
// 3. Why a channel instead of pushing into a shared Vec?
//    - Many tasks finish at unpredictable times
//    - Each task sends its record; only the collector loop touches `records`
//    - No locks needed, no two tasks ever write the same data
//
// 4. How does the loop know all tasks are done?
//    - Every task holds a clone of `tx`
//    - When the last clone is dropped, recv() returns None
// -----------------------------------------------------------------------------
