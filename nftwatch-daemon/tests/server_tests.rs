//! Integration tests for the HTTP routes and shutdown handling.

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::sync::mpsc;
use tower::ServiceExt;

use nftwatch_collector::{
    Chain, Collector, Filters, KernelStateProvider, Object, ProviderError, Rule, RulesetSnapshot,
    Set, SetElement, Table,
};
use nftwatch_daemon::exposition::CONTENT_TYPE;
use nftwatch_daemon::server::{self, SharedCollector};

const RULESET: &str = include_str!("../../crates/collector/tests/fixtures/ruleset.json");

fn snapshot_collector() -> SharedCollector {
    let snapshot: Box<dyn KernelStateProvider> =
        Box::new(RulesetSnapshot::parse(RULESET).expect("fixture should parse"));
    Arc::new(Collector::new(snapshot, Filters::match_all()).0)
}

/// Provider whose table listing takes `delay`.
struct SlowProvider {
    delay: Duration,
}

impl KernelStateProvider for SlowProvider {
    fn list_tables(&self) -> Result<Vec<Table>, ProviderError> {
        std::thread::sleep(self.delay);
        Ok(Vec::new())
    }

    fn list_chains(&self) -> Result<Vec<Chain>, ProviderError> {
        Ok(Vec::new())
    }

    fn get_objects(&self, _: &Table) -> Result<Vec<Object>, ProviderError> {
        Ok(Vec::new())
    }

    fn get_rules(&self, _: &Table, _: &Chain) -> Result<Vec<Rule>, ProviderError> {
        Ok(Vec::new())
    }

    fn get_sets(&self, _: &Table) -> Result<Vec<Set>, ProviderError> {
        Ok(Vec::new())
    }

    fn get_set_elements(&self, _: &Set) -> Result<Vec<SetElement>, ProviderError> {
        Ok(Vec::new())
    }
}

fn slow_collector(delay: Duration) -> SharedCollector {
    let provider: Box<dyn KernelStateProvider> = Box::new(SlowProvider { delay });
    Arc::new(Collector::new(provider, Filters::match_all()).0)
}

#[tokio::test]
async fn metrics_endpoint_returns_exposition() {
    let app = server::router(snapshot_collector());

    let response = app
        .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        CONTENT_TYPE
    );

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.contains("nftables_table_metadata"));
    assert!(text.contains("nftables_collection_failures"));
}

#[tokio::test]
async fn root_redirects_to_metrics() {
    let app = server::router(snapshot_collector());

    let response = app
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/metrics");
}

#[tokio::test]
async fn unknown_path_is_not_found() {
    let app = server::router(snapshot_collector());

    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn bind_rejects_invalid_address() {
    assert!(server::bind("not an address").await.is_err());
}

#[tokio::test]
async fn first_signal_stops_idle_server() {
    let listener = server::bind("127.0.0.1:0").await.unwrap();
    let (tx, rx) = mpsc::channel(4);
    let handle = tokio::spawn(server::serve(
        listener,
        server::router(snapshot_collector()),
        rx,
        Duration::from_secs(5),
    ));

    tx.send("SIGTERM").await.unwrap();
    let result = tokio::time::timeout(Duration::from_secs(2), handle)
        .await
        .expect("server should stop promptly")
        .unwrap();
    assert!(result.is_ok());
}

/// Start a scrape against a slow provider and wait until it is in flight.
async fn start_slow_scrape(addr: std::net::SocketAddr) -> tokio::net::TcpStream {
    let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
    stream
        .write_all(b"GET /metrics HTTP/1.1\r\nHost: localhost\r\n\r\n")
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;
    stream
}

#[tokio::test]
async fn graceful_shutdown_drains_in_flight_scrape() {
    let listener = server::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::channel(4);
    let handle = tokio::spawn(server::serve(
        listener,
        server::router(slow_collector(Duration::from_millis(300))),
        rx,
        Duration::from_secs(5),
    ));

    let mut stream = start_slow_scrape(addr).await;
    tx.send("SIGINT").await.unwrap();

    let mut response = Vec::new();
    stream.read_to_end(&mut response).await.unwrap();
    let response = String::from_utf8_lossy(&response);
    assert!(response.starts_with("HTTP/1.1 200"), "got: {response}");

    let result = tokio::time::timeout(Duration::from_secs(2), handle)
        .await
        .expect("server should stop after draining")
        .unwrap();
    assert!(result.is_ok());
}

#[tokio::test]
async fn shutdown_timeout_aborts_in_flight_scrape() {
    let listener = server::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::channel(4);
    let handle = tokio::spawn(server::serve(
        listener,
        server::router(slow_collector(Duration::from_secs(1))),
        rx,
        Duration::from_millis(100),
    ));

    let _stream = start_slow_scrape(addr).await;
    let started = Instant::now();
    tx.send("SIGTERM").await.unwrap();

    let result = tokio::time::timeout(Duration::from_secs(2), handle)
        .await
        .expect("server should stop at the timeout")
        .unwrap();
    assert!(result.is_ok());
    assert!(started.elapsed() < Duration::from_millis(900));
}

#[tokio::test]
async fn second_signal_forces_exit() {
    let listener = server::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::channel(4);
    let handle = tokio::spawn(server::serve(
        listener,
        server::router(slow_collector(Duration::from_secs(1))),
        rx,
        Duration::from_secs(30),
    ));

    let _stream = start_slow_scrape(addr).await;
    let started = Instant::now();
    tx.send("SIGTERM").await.unwrap();
    tx.send("SIGINT").await.unwrap();

    let result = tokio::time::timeout(Duration::from_secs(2), handle)
        .await
        .expect("second signal should force exit")
        .unwrap();
    assert!(result.is_ok());
    assert!(started.elapsed() < Duration::from_millis(900));
}
