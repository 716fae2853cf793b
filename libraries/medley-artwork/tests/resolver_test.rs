//! Resolver concurrency tests
//!
//! Verifies the lookup concurrency bound and in-flight deduplication under
//! real parallelism with slow providers.

use async_trait::async_trait;
use medley_artwork::{CoverConfig, CoverProvider, CoverResolver, CoverStatus, Result};
use medley_core::{Track, TrackSource};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

/// Provider that records how many lookups run at once
struct SlowProvider {
    calls: AtomicUsize,
    running: AtomicUsize,
    max_running: AtomicUsize,
}

impl SlowProvider {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            running: AtomicUsize::new(0),
            max_running: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl CoverProvider for SlowProvider {
    fn name(&self) -> &str {
        "slow"
    }

    async fn lookup(&self, _artist: &str, title: &str) -> Result<Option<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.running.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_running.fetch_max(now, Ordering::SeqCst);

        tokio::time::sleep(Duration::from_millis(50)).await;

        self.running.fetch_sub(1, Ordering::SeqCst);
        Ok(Some(format!("http://covers.example/{title}.jpg")))
    }
}

/// Provider that blocks until released from the test
struct GatedProvider {
    calls: AtomicUsize,
    gate: Notify,
}

impl GatedProvider {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            gate: Notify::new(),
        })
    }
}

#[async_trait]
impl CoverProvider for GatedProvider {
    fn name(&self) -> &str {
        "gated"
    }

    async fn lookup(&self, _artist: &str, _title: &str) -> Result<Option<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.gate.notified().await;
        Ok(Some("http://covers.example/gated.jpg".to_string()))
    }
}

fn track(id: &str) -> Track {
    Track::new(id, format!("Song {id}"), "Artist", TrackSource::Vk)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn at_most_three_lookups_run_at_once() {
    let provider = SlowProvider::new();
    let resolver = Arc::new(CoverResolver::new(
        vec![Arc::clone(&provider) as Arc<dyn CoverProvider>],
        CoverConfig::default(),
    ));

    let mut handles = Vec::new();
    for i in 0..10 {
        let resolver = Arc::clone(&resolver);
        handles.push(tokio::spawn(async move {
            resolver.resolve(&track(&format!("t{i}"))).await
        }));
    }

    for handle in handles {
        let status = handle.await.unwrap().unwrap();
        assert!(matches!(status, CoverStatus::Resolved(_)));
    }

    assert_eq!(provider.calls.load(Ordering::SeqCst), 10);
    assert!(
        provider.max_running.load(Ordering::SeqCst) <= 3,
        "concurrency bound violated: {} lookups ran at once",
        provider.max_running.load(Ordering::SeqCst)
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn duplicate_request_reports_pending_instead_of_a_second_lookup() {
    let provider = GatedProvider::new();
    let resolver = Arc::new(CoverResolver::new(
        vec![Arc::clone(&provider) as Arc<dyn CoverProvider>],
        CoverConfig::default(),
    ));

    let first = {
        let resolver = Arc::clone(&resolver);
        tokio::spawn(async move { resolver.resolve(&track("t1")).await })
    };

    // Let the first lookup reach the provider
    while provider.calls.load(Ordering::SeqCst) == 0 {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert!(resolver.is_pending(&track("t1")));

    let status = resolver.resolve(&track("t1")).await.unwrap();
    assert_eq!(status, CoverStatus::Pending);
    assert_eq!(provider.calls.load(Ordering::SeqCst), 1);

    // Re-notify until the waiter is actually released; notify_waiters only
    // wakes tasks already parked on the gate
    while !first.is_finished() {
        provider.gate.notify_waiters();
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    let status = first.await.unwrap().unwrap();
    assert_eq!(
        status,
        CoverStatus::Resolved("http://covers.example/gated.jpg".to_string())
    );

    // Now memoized: no further provider traffic
    let status = resolver.resolve(&track("t1")).await.unwrap();
    assert!(matches!(status, CoverStatus::Resolved(_)));
    assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    assert!(!resolver.is_pending(&track("t1")));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn queued_lookups_all_complete() {
    let provider = SlowProvider::new();
    let resolver = Arc::new(CoverResolver::new(
        vec![Arc::clone(&provider) as Arc<dyn CoverProvider>],
        CoverConfig {
            max_concurrent_lookups: 1,
            ..CoverConfig::default()
        },
    ));

    let mut handles = Vec::new();
    for i in 0..5 {
        let resolver = Arc::clone(&resolver);
        handles.push(tokio::spawn(async move {
            resolver.resolve(&track(&format!("q{i}"))).await
        }));
    }

    for handle in handles {
        assert!(handle.await.unwrap().is_ok());
    }
    assert_eq!(provider.max_running.load(Ordering::SeqCst), 1);
    assert_eq!(provider.calls.load(Ordering::SeqCst), 5);
}
