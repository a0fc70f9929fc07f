use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use folio_model::{
    BackendError, BackendResult, ProfileData, SectionData, ShareBackend, ShareRecord, ViewEvent,
};
use folio_resolver::ViewRecorder;
use folio_types::{OwnerId, ShareToken};

/// Backend that only counts analytics writes.
#[derive(Default)]
struct CountingBackend {
    views: AtomicUsize,
    fail_writes: AtomicBool,
}

#[async_trait]
impl ShareBackend for CountingBackend {
    async fn share_record(&self, _token: &ShareToken) -> BackendResult<Option<ShareRecord>> {
        Ok(None)
    }
    async fn profile(&self, _owner: OwnerId) -> BackendResult<ProfileData> {
        Ok(ProfileData::default())
    }
    async fn section_graph(&self, _owner: OwnerId) -> BackendResult<Vec<SectionData>> {
        Ok(Vec::new())
    }
    async fn record_view(&self, _event: ViewEvent) -> BackendResult<()> {
        self.views.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(BackendError::Unavailable("analytics down".into()));
        }
        Ok(())
    }
}

/// Lets every spawned recorder task run to completion.
async fn settle() {
    tokio::time::sleep(Duration::from_millis(50)).await;
}

#[tokio::test(start_paused = true)]
async fn fires_exactly_once_despite_repeated_calls() {
    let backend = Arc::new(CountingBackend::default());
    let token = ShareToken::generate();
    let recorder = ViewRecorder::with_debounce(Duration::ZERO);

    recorder.record_once(backend.clone(), &token, "", "agent");
    recorder.record_once(backend.clone(), &token, "", "agent");
    recorder.record_once(backend.clone(), &token, "other", "agent");
    settle().await;

    assert_eq!(backend.views.load(Ordering::SeqCst), 1);
    assert!(recorder.has_fired());
}

#[tokio::test(start_paused = true)]
async fn separate_views_each_record_once() {
    let backend = Arc::new(CountingBackend::default());
    let token = ShareToken::generate();

    for _ in 0..3 {
        let recorder = ViewRecorder::with_debounce(Duration::ZERO);
        recorder.record_once(backend.clone(), &token, "", "agent");
    }
    settle().await;

    assert_eq!(backend.views.load(Ordering::SeqCst), 3);
}

#[tokio::test(start_paused = true)]
async fn delivery_failure_is_swallowed_and_not_retried() {
    let backend = Arc::new(CountingBackend::default());
    backend.fail_writes.store(true, Ordering::SeqCst);
    let token = ShareToken::generate();
    let recorder = ViewRecorder::with_debounce(Duration::ZERO);

    recorder.record_once(backend.clone(), &token, "", "agent");
    settle().await;

    // One attempt, no retry loop, no panic.
    assert_eq!(backend.views.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn write_waits_for_the_debounce_delay() {
    let backend = Arc::new(CountingBackend::default());
    let token = ShareToken::generate();
    let recorder = ViewRecorder::with_debounce(Duration::from_millis(100));

    recorder.record_once(backend.clone(), &token, "", "agent");
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert_eq!(backend.views.load(Ordering::SeqCst), 0);

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(backend.views.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn dropping_an_unfired_recorder_is_harmless() {
    let recorder = ViewRecorder::new();
    assert!(!recorder.has_fired());
    drop(recorder);
}

#[tokio::test(start_paused = true)]
async fn task_outlives_the_recorder() {
    let backend = Arc::new(CountingBackend::default());
    let token = ShareToken::generate();

    {
        let recorder = ViewRecorder::with_debounce(Duration::from_millis(20));
        recorder.record_once(backend.clone(), &token, "", "agent");
        // Recorder dropped here, before the debounce elapses.
    }
    settle().await;

    assert_eq!(backend.views.load(Ordering::SeqCst), 1);
}
