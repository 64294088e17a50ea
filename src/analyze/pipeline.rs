// src/analyze/pipeline.rs
// =============================================================================
// Runs every analyzer over one document at the same time.
//
// How it works:
// 1. Spawn one task per analyzer, all sharing the same Document (Arc)
// 2. Each task sends its outcome (a Contribution or an AnalysisError) over a
//    channel; this loop is the only place that writes to the AnalysisResult
// 3. The first error raises the cancellation token and is returned at once
// 4. Without errors, we return when every analyzer has reported
//
// Tasks are never aborted. After a failure, analyzers that have not started
// yet see the token and stop; the ones already running finish on their own
// and their sends go nowhere.
//
// Rust concepts:
// - Arc<dyn Trait>: Many tasks sharing one analyzer without copying it
// - tokio::spawn + mpsc: Concurrent work funnelled back to one owner
// - &mut: Only this loop ever holds a mutable borrow of the result
// =============================================================================

use super::result::{AnalysisError, AnalysisResult, Contribution, Stage};
use super::{
    Analyzer, CancellationToken, Document, HeadingAnalyzer, LinkAnalyzer, LoginFormAnalyzer,
    TitleAnalyzer, VersionAnalyzer,
};
use crate::checker::LinkChecker;
use crate::fetch;
use reqwest::Client;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;

type Outcome = Result<Contribution, AnalysisError>;

/// A fixed set of analyzers run together over each document
#[derive(Clone)]
pub struct Orchestrator {
    analyzers: Vec<Arc<dyn Analyzer>>,
}

impl Orchestrator {
    pub fn new(analyzers: Vec<Arc<dyn Analyzer>>) -> Self {
        Self { analyzers }
    }

    /// version, title, login form, headings and links
    pub fn standard(checker: LinkChecker) -> Self {
        let analyzers: Vec<Arc<dyn Analyzer>> = vec![
            Arc::new(VersionAnalyzer),
            Arc::new(TitleAnalyzer),
            Arc::new(LoginFormAnalyzer),
            Arc::new(HeadingAnalyzer),
            Arc::new(LinkAnalyzer::new(checker)),
        ];
        Self::new(analyzers)
    }

    /// Runs all analyzers and merges their contributions into `result`.
    ///
    /// On error, `result` may hold some contributions and must be discarded.
    pub async fn run(
        &self,
        document: Arc<Document>,
        result: &mut AnalysisResult,
    ) -> Result<(), AnalysisError> {
        let expected = self.analyzers.len();
        let cancel = CancellationToken::new();
        // Room for every outcome, so a finishing task never blocks on send
        let (tx, mut rx) = mpsc::channel::<Outcome>(expected.max(1));

        for analyzer in &self.analyzers {
            let analyzer = Arc::clone(analyzer);
            let document = Arc::clone(&document);
            let cancel = cancel.clone();
            let tx = tx.clone();

            tokio::spawn(async move {
                let stage = analyzer.stage();
                if cancel.is_cancelled() {
                    ::log::debug!("Analysis cancelled for {} due to an earlier error", stage);
                    return;
                }

                let outcome = analyzer.analyze(&document, &cancel).await;
                if let Err(e) = &outcome {
                    ::log::warn!("Error during {} analysis: {}", stage, e);
                    cancel.cancel();
                }
                let _ = tx.send(outcome).await;
            });
        }
        drop(tx);

        let mut completed = 0;
        while let Some(outcome) = rx.recv().await {
            match outcome {
                Ok(contribution) => {
                    result.apply(contribution);
                    completed += 1;
                }
                Err(error) => {
                    cancel.cancel();
                    ::log::warn!("First error received, terminating analysis: {}", error);
                    return Err(error);
                }
            }
        }

        // Every sender is gone but someone never reported: a task panicked
        if completed < expected {
            return Err(AnalysisError::internal(
                Stage::Orchestrator,
                format!(
                    "{} of {} analyzers stopped without reporting",
                    expected - completed,
                    expected
                ),
            ));
        }
        Ok(())
    }
}

/// Fetches `url` and analyzes it, returning the complete report.
///
/// Either the whole report or exactly one error comes back; a partially
/// filled result never leaves this function.
pub async fn inspect_page(
    client: &Client,
    orchestrator: &Orchestrator,
    url: &str,
) -> Result<AnalysisResult, AnalysisError> {
    let started = Instant::now();
    let url = url.trim();
    ::log::info!("Analyzing web page url: {}", url);

    let document = fetch::fetch_page(client, url).await?;
    let fetch_time = started.elapsed().as_millis() as u64;
    ::log::info!("Fetched web page in {} ms", fetch_time);

    let mut result = AnalysisResult::new(url, document.base_origin());
    result.web_page_extract_time = fetch_time;

    let analysis_started = Instant::now();
    orchestrator.run(Arc::new(document), &mut result).await?;
    result.service_time = analysis_started.elapsed().as_millis() as u64;
    result.app_execute_total_time = started.elapsed().as_millis() as u64;

    ::log::info!(
        "Web page analysis completed in {} ms",
        result.app_execute_total_time
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::result::Heading;
    use crate::analyze::LinkType;
    use crate::checker::{ProbeError, Prober};
    use futures::future::{BoxFuture, FutureExt};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    struct FailingAnalyzer;

    impl Analyzer for FailingAnalyzer {
        fn stage(&self) -> Stage {
            Stage::Title
        }

        fn analyze<'a>(
            &'a self,
            _document: &'a Document,
            _cancel: &'a CancellationToken,
        ) -> BoxFuture<'a, Result<Contribution, AnalysisError>> {
            futures::future::ready(Err(AnalysisError::bad_request(
                Stage::Title,
                "broken",
                None,
            )))
            .boxed()
        }
    }

    // Sleeps, then records whether it saw the cancellation token raised
    struct SlowAnalyzer {
        delay: Duration,
        saw_cancel: Arc<AtomicBool>,
    }

    impl Analyzer for SlowAnalyzer {
        fn stage(&self) -> Stage {
            Stage::Headings
        }

        fn analyze<'a>(
            &'a self,
            _document: &'a Document,
            cancel: &'a CancellationToken,
        ) -> BoxFuture<'a, Result<Contribution, AnalysisError>> {
            async move {
                tokio::time::sleep(self.delay).await;
                if cancel.is_cancelled() {
                    self.saw_cancel.store(true, Ordering::SeqCst);
                    return Ok(Contribution::Headings(Vec::new()));
                }
                Ok(Contribution::Headings(vec![Heading::new("h1", "late")]))
            }
            .boxed()
        }
    }

    struct PanickingAnalyzer;

    impl Analyzer for PanickingAnalyzer {
        fn stage(&self) -> Stage {
            Stage::Version
        }

        fn analyze<'a>(
            &'a self,
            _document: &'a Document,
            _cancel: &'a CancellationToken,
        ) -> BoxFuture<'a, Result<Contribution, AnalysisError>> {
            panic!("analyzer bug")
        }
    }

    struct StaticProber(u16);

    impl Prober for StaticProber {
        fn get<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<u16, ProbeError>> {
            let outcome = if url.contains("other.com") {
                Err(ProbeError::Failed("unreachable".to_string()))
            } else {
                Ok(self.0)
            };
            futures::future::ready(outcome).boxed()
        }
    }

    // Records that it was asked to analyze anything at all
    struct RecordingAnalyzer {
        ran: Arc<AtomicBool>,
    }

    impl Analyzer for RecordingAnalyzer {
        fn stage(&self) -> Stage {
            Stage::Version
        }

        fn analyze<'a>(
            &'a self,
            _document: &'a Document,
            _cancel: &'a CancellationToken,
        ) -> BoxFuture<'a, Result<Contribution, AnalysisError>> {
            self.ran.store(true, Ordering::SeqCst);
            futures::future::ready(Ok(Contribution::Version(None))).boxed()
        }
    }

    // Serves `body` as a 200 HTML page on every path
    async fn serve_page(body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                tokio::spawn(async move {
                    let mut buf = vec![0u8; 4096];
                    let _ = socket.read(&mut buf).await;
                    let response = format!(
                        "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                        body.len(),
                        body
                    );
                    let _ = socket.write_all(response.as_bytes()).await;
                    let _ = socket.shutdown().await;
                });
            }
        });
        format!("http://{}", addr)
    }

    fn test_client() -> Client {
        Client::builder()
            .timeout(Duration::from_secs(5))
            .no_proxy()
            .build()
            .unwrap()
    }

    fn document(html: &str) -> Arc<Document> {
        Arc::new(Document::new("http://example.com", html).unwrap())
    }

    #[tokio::test]
    async fn test_standard_analyzers_fill_every_field() {
        let html = r#"<!DOCTYPE html><html><head><title> Welcome </title></head><body>
            <h1>Hello</h1><h2>World</h2>
            <form><input type="email"><input type="password"><button type="submit">Go</button></form>
            <a href="/a">x</a><a href="http://other.com/b">y</a>
            </body></html>"#;
        let orchestrator = Orchestrator::standard(LinkChecker::new(Arc::new(StaticProber(200))));
        let mut result = AnalysisResult::new("http://example.com", "http://example.com");

        orchestrator.run(document(html), &mut result).await.unwrap();

        assert_eq!(result.html_version.as_deref(), Some("HTML 5"));
        assert_eq!(result.title.as_deref(), Some("Welcome"));
        assert!(result.has_login);
        assert_eq!(
            result.headings,
            vec![Heading::new("h1", "Hello"), Heading::new("h2", "World")]
        );
        assert_eq!(result.links.len(), 2);
        let external = result
            .links
            .iter()
            .find(|link| link.link_type == LinkType::External)
            .unwrap();
        assert_eq!(external.url, "http://other.com/b");
        assert_eq!(external.status, 0);
        assert_eq!(result.unreachable_count(), 1);
    }

    #[tokio::test]
    async fn test_page_without_title_or_doctype_still_succeeds() {
        let html = r#"<html><body><a href="/a">x</a><a href="http://other.com/b">y</a></body></html>"#;
        let orchestrator = Orchestrator::standard(LinkChecker::new(Arc::new(StaticProber(200))));
        let mut result = AnalysisResult::new("http://example.com", "http://example.com");

        orchestrator.run(document(html), &mut result).await.unwrap();

        assert_eq!(result.title, None);
        assert_eq!(result.html_version, None);
        assert!(!result.has_login);
        let mut links: Vec<_> = result
            .links
            .iter()
            .map(|l| (l.url.as_str(), l.link_type, l.accessible, l.status))
            .collect();
        links.sort_by(|a, b| a.0.cmp(b.0));
        assert_eq!(
            links,
            vec![
                ("http://example.com/a", LinkType::Internal, true, 200),
                ("http://other.com/b", LinkType::External, false, 0),
            ]
        );
    }

    #[tokio::test]
    async fn test_first_error_wins_without_waiting() {
        let saw_cancel = Arc::new(AtomicBool::new(false));
        let analyzers: Vec<Arc<dyn Analyzer>> = vec![
            Arc::new(SlowAnalyzer {
                delay: Duration::from_millis(200),
                saw_cancel: Arc::clone(&saw_cancel),
            }),
            Arc::new(FailingAnalyzer),
        ];
        let orchestrator = Orchestrator::new(analyzers);
        let mut result = AnalysisResult::default();

        let started = Instant::now();
        let err = orchestrator
            .run(document("<p>x</p>"), &mut result)
            .await
            .unwrap_err();

        assert_eq!(err.stage, Stage::Title);
        assert_eq!(err.message, "broken");
        assert!(started.elapsed() < Duration::from_millis(200));

        // The slow analyzer keeps running and notices the raised token
        tokio::time::sleep(Duration::from_millis(400)).await;
        assert!(saw_cancel.load(Ordering::SeqCst));
        assert!(result.headings.is_empty());
    }

    #[tokio::test]
    async fn test_empty_document_fails_title_stage() {
        let orchestrator = Orchestrator::standard(LinkChecker::new(Arc::new(StaticProber(200))));
        let mut result = AnalysisResult::default();

        let err = orchestrator
            .run(document(""), &mut result)
            .await
            .unwrap_err();
        assert_eq!(err.stage, Stage::Title);
        assert_eq!(err.code, 400);
    }

    #[tokio::test]
    async fn test_panicking_analyzer_is_reported() {
        let analyzers: Vec<Arc<dyn Analyzer>> = vec![Arc::new(PanickingAnalyzer)];
        let orchestrator = Orchestrator::new(analyzers);
        let mut result = AnalysisResult::default();

        let err = orchestrator
            .run(document("<p>x</p>"), &mut result)
            .await
            .unwrap_err();
        assert_eq!(err.stage, Stage::Orchestrator);
        assert_eq!(err.code, 500);
    }

    #[tokio::test]
    async fn test_no_analyzers_is_trivially_ok() {
        let orchestrator = Orchestrator::new(Vec::new());
        let mut result = AnalysisResult::default();
        orchestrator.run(document("<p>x</p>"), &mut result).await.unwrap();
        assert_eq!(result, AnalysisResult::default());
    }

    #[tokio::test]
    async fn test_inspect_page_fills_report() {
        let origin = serve_page(
            r##"<html><head><title>T</title></head><body><a href="/a">1</a><a href="/a">2</a><a href="#f">3</a></body></html>"##,
        )
        .await;
        let client = test_client();
        let orchestrator = Orchestrator::standard(LinkChecker::from_client(client.clone()));
        let url = format!("{}/index.html", origin);

        // Surrounding whitespace from user input is not part of the report
        let result = inspect_page(&client, &orchestrator, &format!("  {}  ", url))
            .await
            .unwrap();

        assert_eq!(result.executed_url, url);
        assert_eq!(result.base_path, origin);
        assert_eq!(result.title.as_deref(), Some("T"));
        assert_eq!(result.links.len(), 2);
        for link in &result.links {
            assert_eq!(link.url, format!("{}/a", origin));
            assert_eq!(link.link_type, LinkType::Internal);
            assert_eq!(link.status, 200);
            assert!(link.accessible);
        }
        assert!(result.app_execute_total_time >= result.service_time);
        assert!(result.app_execute_total_time >= result.web_page_extract_time);
    }

    #[tokio::test]
    async fn test_inspect_page_fetch_failure_skips_analysis() {
        // Bind and drop to get a port nobody listens on
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let ran = Arc::new(AtomicBool::new(false));
        let analyzers: Vec<Arc<dyn Analyzer>> = vec![Arc::new(RecordingAnalyzer {
            ran: Arc::clone(&ran),
        })];
        let orchestrator = Orchestrator::new(analyzers);

        let err = inspect_page(&test_client(), &orchestrator, &format!("http://{}/", addr))
            .await
            .unwrap_err();

        assert_eq!(err.stage, Stage::Fetch);
        assert_eq!(err.code, 400);
        assert_eq!(err.message, "Error occurred while calling web page url");
        assert!(!ran.load(Ordering::SeqCst));
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why a channel instead of a shared Mutex<AnalysisResult>?
//    - Each task sends what it found and forgets about it
//    - The receiving loop is the only writer, so no locking is needed
//
// 2. What happens to tasks after the first error?
//    - We return right away and drop the receiver
//    - A task that finishes later gets an error from send(), which it ignores
//    - Tasks that have not started yet see the cancellation token and stop
//
// 3. How is a panicking analyzer noticed?
//    - Its task ends without sending anything
//    - The channel closes once every sender is dropped, and the count of
//      received outcomes comes up short
// -----------------------------------------------------------------------------
