//! Turning a candidate share identifier into a renderable view model.

use std::time::Duration;

use folio_model::{BackendResult, ProfileData, SectionData, ShareBackend};
use folio_types::ShareToken;
use serde::Serialize;
use tracing::{debug, warn};

/// Upper bound on each backend fetch. Expiry is treated as a fetch
/// failure, which fails closed to [`Resolution::NotFound`].
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Outcome of resolving a share identifier.
///
/// There is deliberately no variant distinguishing "never existed",
/// "deactivated" and "backend failed": presenting them identically keeps a
/// probing client from learning rotation or deactivation timing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Resolution {
    /// Unified negative outcome; the only information a visitor gets.
    NotFound,
    /// A live, normalized snapshot ready to render.
    Ready {
        profile: ProfileData,
        sections: Vec<SectionData>,
    },
}

impl Resolution {
    /// True iff this resolution carries renderable data.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self, Resolution::Ready { .. })
    }
}

/// Resolves `candidate` against the backend.
///
/// Policy, in order:
/// 1. Malformed candidates short-circuit to `NotFound` with zero backend
///    interaction.
/// 2. A missing record, an inactive record, a backend error, and a fetch
///    timeout all yield the same `NotFound`.
/// 3. On an active record, the profile and section graph are fetched; any
///    failure there (including the record being rotated away mid-fetch)
///    degrades to `NotFound` rather than exposing a partial state.
///
/// Backend failures are logged for operators; the visitor never sees them.
pub async fn resolve(backend: &dyn ShareBackend, candidate: &str) -> Resolution {
    let Ok(token) = ShareToken::parse(candidate) else {
        debug!(candidate_len = candidate.len(), "malformed share token");
        return Resolution::NotFound;
    };

    let record = match fetch(backend.share_record(&token)).await {
        Ok(Some(record)) => record,
        Ok(None) => {
            debug!(%token, "no share record");
            return Resolution::NotFound;
        }
        Err(err) => {
            warn!(%token, error = %err, "share record lookup failed");
            return Resolution::NotFound;
        }
    };

    if !record.active {
        debug!(%token, "share link deactivated");
        return Resolution::NotFound;
    }

    // Two separate reads against data the owner can rotate concurrently.
    // Consistency is not guaranteed to anonymous viewers; a failure on
    // either read fails closed instead.
    let profile = match fetch(backend.profile(record.owner)).await {
        Ok(profile) => profile,
        Err(err) => {
            warn!(%token, error = %err, "profile fetch failed");
            return Resolution::NotFound;
        }
    };

    let sections = match fetch(backend.section_graph(record.owner)).await {
        Ok(sections) => sections,
        Err(err) => {
            warn!(%token, error = %err, "section graph fetch failed");
            return Resolution::NotFound;
        }
    };

    Resolution::Ready { profile, sections }
}

/// Bounds a backend future by [`FETCH_TIMEOUT`], folding expiry into the
/// backend's own error type.
async fn fetch<T>(
    fut: impl std::future::Future<Output = BackendResult<T>>,
) -> BackendResult<T> {
    match tokio::time::timeout(FETCH_TIMEOUT, fut).await {
        Ok(result) => result,
        Err(_) => Err(folio_model::BackendError::Timeout),
    }
}
