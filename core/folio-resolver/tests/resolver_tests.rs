use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use folio_model::{
    BackendError, BackendResult, ProfileData, SectionData, ShareBackend, ShareRecord, ViewEvent,
};
use folio_resolver::{resolve, Resolution};
use folio_types::{OwnerId, SectionId, ShareToken};

/// Scriptable backend that counts every call, so tests can assert the
/// zero-interaction guarantee and failure behavior.
#[derive(Default)]
struct MockBackend {
    record: Mutex<Option<ShareRecord>>,
    profile: Mutex<ProfileData>,
    sections: Mutex<Vec<SectionData>>,
    lookups: AtomicUsize,
    profile_calls: AtomicUsize,
    graph_calls: AtomicUsize,
    fail_lookup: AtomicBool,
    fail_graph: AtomicBool,
    deactivate_after_lookup: AtomicBool,
}

impl MockBackend {
    fn with_active_record(token: &ShareToken) -> (Arc<Self>, OwnerId) {
        let owner = OwnerId::new();
        let backend = Arc::new(Self::default());
        *backend.record.lock().unwrap() = Some(ShareRecord {
            owner,
            token: token.clone(),
            active: true,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        });
        (backend, owner)
    }

    fn total_calls(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
            + self.profile_calls.load(Ordering::SeqCst)
            + self.graph_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ShareBackend for MockBackend {
    async fn share_record(&self, token: &ShareToken) -> BackendResult<Option<ShareRecord>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self.fail_lookup.load(Ordering::SeqCst) {
            return Err(BackendError::Unavailable("lookup down".into()));
        }
        let record = self
            .record
            .lock()
            .unwrap()
            .clone()
            .filter(|r| &r.token == token);
        if self.deactivate_after_lookup.load(Ordering::SeqCst) {
            // Owner deactivates between the two fetch steps; the backend
            // subsequently refuses the graph read.
            self.fail_graph.store(true, Ordering::SeqCst);
        }
        Ok(record)
    }

    async fn profile(&self, _owner: OwnerId) -> BackendResult<ProfileData> {
        self.profile_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.profile.lock().unwrap().clone())
    }

    async fn section_graph(&self, _owner: OwnerId) -> BackendResult<Vec<SectionData>> {
        self.graph_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_graph.load(Ordering::SeqCst) {
            return Err(BackendError::Unavailable("graph gone".into()));
        }
        Ok(self.sections.lock().unwrap().clone())
    }

    async fn record_view(&self, _event: ViewEvent) -> BackendResult<()> {
        Ok(())
    }
}

// ── validation short-circuit ──────────────────────────────────────────

#[tokio::test]
async fn too_short_candidate_never_reaches_backend() {
    let backend = Arc::new(MockBackend::default());
    let outcome = resolve(backend.as_ref(), "abc").await;
    assert_eq!(outcome, Resolution::NotFound);
    assert_eq!(backend.total_calls(), 0);
}

#[tokio::test]
async fn invalid_characters_never_reach_backend() {
    let backend = Arc::new(MockBackend::default());
    for candidate in ["", "short!", "has spaces here", "abcdefgh<script>"] {
        let outcome = resolve(backend.as_ref(), candidate).await;
        assert_eq!(outcome, Resolution::NotFound);
    }
    assert_eq!(backend.total_calls(), 0);
}

// ── unified not-found ─────────────────────────────────────────────────

#[tokio::test]
async fn unknown_token_is_not_found() {
    let backend = Arc::new(MockBackend::default());
    let outcome = resolve(backend.as_ref(), "a1b2c3d4").await;
    assert_eq!(outcome, Resolution::NotFound);
    assert_eq!(backend.lookups.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn deactivated_record_is_indistinguishable_from_missing() {
    let token = ShareToken::generate();
    let (backend, _) = MockBackend::with_active_record(&token);
    backend.record.lock().unwrap().as_mut().unwrap().active = false;

    let deactivated = resolve(backend.as_ref(), token.as_str()).await;

    let missing_backend = Arc::new(MockBackend::default());
    let missing = resolve(missing_backend.as_ref(), token.as_str()).await;

    assert_eq!(deactivated, missing);
    // A deactivated record stops resolution before any data fetch.
    assert_eq!(backend.profile_calls.load(Ordering::SeqCst), 0);
    assert_eq!(backend.graph_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn backend_failure_fails_closed() {
    let token = ShareToken::generate();
    let (backend, _) = MockBackend::with_active_record(&token);
    backend.fail_lookup.store(true, Ordering::SeqCst);

    let outcome = resolve(backend.as_ref(), token.as_str()).await;
    assert_eq!(outcome, Resolution::NotFound);
}

#[tokio::test]
async fn deactivation_between_fetch_steps_degrades_to_not_found() {
    let token = ShareToken::generate();
    let (backend, _) = MockBackend::with_active_record(&token);
    backend.deactivate_after_lookup.store(true, Ordering::SeqCst);

    let outcome = resolve(backend.as_ref(), token.as_str()).await;
    assert_eq!(outcome, Resolution::NotFound);
    // Both fetch steps ran; the failure surfaced on the second.
    assert_eq!(backend.lookups.load(Ordering::SeqCst), 1);
    assert_eq!(backend.graph_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn slow_backend_times_out_to_not_found() {
    struct StalledBackend;

    #[async_trait]
    impl ShareBackend for StalledBackend {
        async fn share_record(
            &self,
            _token: &ShareToken,
        ) -> BackendResult<Option<ShareRecord>> {
            tokio::time::sleep(std::time::Duration::from_secs(60)).await;
            Ok(None)
        }
        async fn profile(&self, _owner: OwnerId) -> BackendResult<ProfileData> {
            Ok(ProfileData::default())
        }
        async fn section_graph(&self, _owner: OwnerId) -> BackendResult<Vec<SectionData>> {
            Ok(Vec::new())
        }
        async fn record_view(&self, _event: ViewEvent) -> BackendResult<()> {
            Ok(())
        }
    }

    let outcome = resolve(&StalledBackend, "a1b2c3d4").await;
    assert_eq!(outcome, Resolution::NotFound);
}

// ── ready path ────────────────────────────────────────────────────────

#[tokio::test]
async fn active_record_resolves_to_ready() {
    let token = ShareToken::generate();
    let (backend, _) = MockBackend::with_active_record(&token);
    backend.profile.lock().unwrap().name = "Jane Doe".into();
    backend.sections.lock().unwrap().push(SectionData {
        id: SectionId::new(),
        title: "Projects".into(),
        projects: Vec::new(),
    });

    let outcome = resolve(backend.as_ref(), token.as_str()).await;
    match outcome {
        Resolution::Ready { profile, sections } => {
            assert_eq!(profile.name, "Jane Doe");
            assert_eq!(sections.len(), 1);
        }
        Resolution::NotFound => panic!("expected ready"),
    }
}

#[tokio::test]
async fn owner_with_no_sections_is_ready_and_empty() {
    let token = ShareToken::generate();
    let (backend, _) = MockBackend::with_active_record(&token);

    let outcome = resolve(backend.as_ref(), token.as_str()).await;
    assert!(outcome.is_ready());
    match outcome {
        Resolution::Ready { sections, .. } => assert!(sections.is_empty()),
        Resolution::NotFound => unreachable!(),
    }
}

#[tokio::test]
async fn rotation_moves_resolution_to_the_new_token() {
    let old = ShareToken::generate();
    let (backend, owner) = MockBackend::with_active_record(&old);

    let new = ShareToken::generate();
    *backend.record.lock().unwrap() = Some(ShareRecord {
        owner,
        token: new.clone(),
        active: true,
        created_at: chrono::Utc::now(),
        updated_at: chrono::Utc::now(),
    });

    assert_eq!(
        resolve(backend.as_ref(), old.as_str()).await,
        Resolution::NotFound
    );
    assert!(resolve(backend.as_ref(), new.as_str()).await.is_ready());
}
