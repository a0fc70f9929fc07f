//! Owner-side share link management.

use std::sync::Arc;

use folio_model::{BackendResult, ShareAdmin, ShareRecord};
use folio_types::{OwnerId, ShareToken};
use serde::{Deserialize, Serialize};
use tracing::info;

/// The owner-facing view of their share link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShareLinkStatus {
    pub token: ShareToken,
    pub active: bool,
    pub share_url: String,
}

/// Creates, rotates and toggles share links.
///
/// This is the only writer of `ShareRecord`s. The resolver observes the
/// results; rotation takes effect the instant the store swap completes,
/// with no grace period for the previous token.
pub struct ShareLinkManager {
    admin: Arc<dyn ShareAdmin>,
    base_url: String,
}

impl ShareLinkManager {
    /// Creates a manager building share URLs under `base_url`
    /// (e.g. `https://folio.example`).
    #[must_use]
    pub fn new(admin: Arc<dyn ShareAdmin>, base_url: impl Into<String>) -> Self {
        Self {
            admin,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Returns the owner's current link status, if a link exists.
    pub async fn status(&self, owner: OwnerId) -> BackendResult<Option<ShareLinkStatus>> {
        let record = self.admin.share_record_for_owner(owner).await?;
        Ok(record.map(|r| self.status_of(&r)))
    }

    /// Mints a fresh token for the owner, creating the share record if
    /// this is their first link. Any previous link stops resolving
    /// immediately.
    pub async fn rotate(&self, owner: OwnerId) -> BackendResult<ShareLinkStatus> {
        let record = self
            .admin
            .upsert_share_record(owner, ShareToken::generate())
            .await?;
        info!(%owner, token = %record.token, "share link rotated");
        Ok(self.status_of(&record))
    }

    /// Toggles public visibility of the current link.
    pub async fn set_active(&self, owner: OwnerId, active: bool) -> BackendResult<()> {
        self.admin.set_share_active(owner, active).await?;
        info!(%owner, active, "share link visibility changed");
        Ok(())
    }

    fn status_of(&self, record: &ShareRecord) -> ShareLinkStatus {
        ShareLinkStatus {
            token: record.token.clone(),
            active: record.active,
            share_url: format!("{}/shared/{}", self.base_url, record.token),
        }
    }
}
