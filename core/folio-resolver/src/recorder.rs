//! Best-effort, at-most-once analytics recording.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use folio_model::{ShareBackend, ViewEvent};
use folio_types::ShareToken;
use tracing::{debug, warn};

/// Default delay between a successful render and the analytics write, so
/// recording never competes with first paint.
const DEBOUNCE: Duration = Duration::from_millis(100);

/// One-shot view recorder.
///
/// Each rendered view owns exactly one `ViewRecorder`; the fired flag is
/// per-instance state, never ambient module state, so repeated renders of
/// the same view and fresh views in the same process both behave
/// correctly. However many times [`record_once`](Self::record_once) is
/// called, at most one write attempt is issued, it is never awaited by the
/// caller, never retried, and delivery failure is logged and swallowed.
#[derive(Debug)]
pub struct ViewRecorder {
    fired: AtomicBool,
    debounce: Duration,
}

impl ViewRecorder {
    /// Creates an unfired recorder with the default debounce.
    #[must_use]
    pub fn new() -> Self {
        Self {
            fired: AtomicBool::new(false),
            debounce: DEBOUNCE,
        }
    }

    /// Creates a recorder with a custom debounce. Tests use a zero delay.
    #[must_use]
    pub fn with_debounce(debounce: Duration) -> Self {
        Self {
            fired: AtomicBool::new(false),
            debounce,
        }
    }

    /// True once a write attempt has been claimed.
    #[must_use]
    pub fn has_fired(&self) -> bool {
        self.fired.load(Ordering::SeqCst)
    }

    /// Fires the analytics write for this view, at most once.
    ///
    /// The write runs on a detached task after the debounce delay; the
    /// task holds its own `Arc` to the backend, so it completes (or fails)
    /// harmlessly even if the originating view is long gone.
    pub fn record_once(
        &self,
        backend: Arc<dyn ShareBackend>,
        token: &ShareToken,
        referrer: &str,
        user_agent: &str,
    ) {
        if self.fired.swap(true, Ordering::SeqCst) {
            debug!(%token, "view already recorded");
            return;
        }

        let event = ViewEvent::new(token.clone(), referrer, user_agent);
        let debounce = self.debounce;
        tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            if let Err(err) = backend.record_view(event).await {
                // Analytics must never affect the visitor; one attempt,
                // logged, dropped.
                warn!(error = %err, "view recording failed");
            }
        });
    }
}

impl Default for ViewRecorder {
    fn default() -> Self {
        Self::new()
    }
}
