use crate::{ProfileData, SectionData, ShareRecord, ViewEvent};
use async_trait::async_trait;
use folio_types::{OwnerId, ShareToken};
use thiserror::Error;

/// Failures a backend may surface to its callers.
///
/// The public resolution path treats every variant the same way (fail
/// closed to not-found); the variants exist so operators see what actually
/// went wrong in the logs.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Underlying database error.
    #[error("database error: {0}")]
    Database(String),

    /// The backend did not answer within the allotted time.
    #[error("backend timed out")]
    Timeout,

    /// The backend is unreachable or refusing work.
    #[error("backend unavailable: {0}")]
    Unavailable(String),
}

/// Result type for backend operations.
pub type BackendResult<T> = Result<T, BackendError>;

/// Read interface of the share pipeline, plus the single append-only
/// analytics write.
///
/// The resolver treats this as an external collaborator: it must tolerate
/// errors, empty results, and timeouts, and it never mutates portfolio
/// data through this trait.
#[async_trait]
pub trait ShareBackend: Send + Sync {
    /// Looks up the share record matching `token`, if any.
    async fn share_record(&self, token: &ShareToken) -> BackendResult<Option<ShareRecord>>;

    /// Fetches the owner's public profile.
    ///
    /// An owner with no stored profile yields the default (all-empty)
    /// profile rather than an error.
    async fn profile(&self, owner: OwnerId) -> BackendResult<ProfileData>;

    /// Fetches the full section graph in creation order, with nested
    /// projects, links and features already normalized.
    async fn section_graph(&self, owner: OwnerId) -> BackendResult<Vec<SectionData>>;

    /// Appends one view event. Append-only; never read back on this path.
    async fn record_view(&self, event: ViewEvent) -> BackendResult<()>;
}

/// Write interface owned by the share link manager.
///
/// Nothing else writes `ShareRecord`s: the resolver only reads them, and
/// the analytics path only appends view events.
#[async_trait]
pub trait ShareAdmin: Send + Sync {
    /// Returns the owner's current share record, if one exists.
    async fn share_record_for_owner(&self, owner: OwnerId) -> BackendResult<Option<ShareRecord>>;

    /// Installs `token` as the owner's share token, creating the record if
    /// needed and reactivating it. The previous token (if any) stops
    /// resolving the moment this returns.
    async fn upsert_share_record(
        &self,
        owner: OwnerId,
        token: ShareToken,
    ) -> BackendResult<ShareRecord>;

    /// Flips the visibility flag without touching the token.
    async fn set_share_active(&self, owner: OwnerId, active: bool) -> BackendResult<()>;
}
