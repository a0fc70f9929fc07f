use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use folio_model::{BackendResult, ShareAdmin, ShareRecord};
use folio_resolver::ShareLinkManager;
use folio_types::{OwnerId, ShareToken};

/// In-memory admin store holding at most one record.
#[derive(Default)]
struct MemoryAdmin {
    record: Mutex<Option<ShareRecord>>,
}

#[async_trait]
impl ShareAdmin for MemoryAdmin {
    async fn share_record_for_owner(&self, owner: OwnerId) -> BackendResult<Option<ShareRecord>> {
        Ok(self
            .record
            .lock()
            .unwrap()
            .clone()
            .filter(|r| r.owner == owner))
    }

    async fn upsert_share_record(
        &self,
        owner: OwnerId,
        token: ShareToken,
    ) -> BackendResult<ShareRecord> {
        let mut guard = self.record.lock().unwrap();
        let record = match guard.take() {
            Some(mut existing) if existing.owner == owner => {
                existing.token = token;
                existing.active = true;
                existing.updated_at = chrono::Utc::now();
                existing
            }
            _ => {
                let mut fresh = ShareRecord::new(owner);
                fresh.token = token;
                fresh
            }
        };
        *guard = Some(record.clone());
        Ok(record)
    }

    async fn set_share_active(&self, owner: OwnerId, active: bool) -> BackendResult<()> {
        if let Some(record) = self.record.lock().unwrap().as_mut() {
            if record.owner == owner {
                record.set_active(active);
            }
        }
        Ok(())
    }
}

#[tokio::test]
async fn status_is_none_before_first_rotation() {
    let manager = ShareLinkManager::new(Arc::new(MemoryAdmin::default()), "https://folio.example");
    assert!(manager.status(OwnerId::new()).await.unwrap().is_none());
}

#[tokio::test]
async fn rotate_creates_an_active_link_with_share_url() {
    let manager = ShareLinkManager::new(Arc::new(MemoryAdmin::default()), "https://folio.example");
    let owner = OwnerId::new();

    let status = manager.rotate(owner).await.unwrap();
    assert!(status.active);
    assert_eq!(
        status.share_url,
        format!("https://folio.example/shared/{}", status.token)
    );
}

#[tokio::test]
async fn trailing_slash_in_base_url_is_normalized() {
    let manager =
        ShareLinkManager::new(Arc::new(MemoryAdmin::default()), "https://folio.example/");
    let status = manager.rotate(OwnerId::new()).await.unwrap();
    assert!(!status.share_url.contains("//shared"));
}

#[tokio::test]
async fn rotate_replaces_token_and_reactivates() {
    let admin = Arc::new(MemoryAdmin::default());
    let manager = ShareLinkManager::new(admin.clone(), "https://folio.example");
    let owner = OwnerId::new();

    let first = manager.rotate(owner).await.unwrap();
    manager.set_active(owner, false).await.unwrap();
    let second = manager.rotate(owner).await.unwrap();

    assert_ne!(first.token, second.token);
    assert!(second.active);
}

#[tokio::test]
async fn set_active_reflects_in_status() {
    let manager = ShareLinkManager::new(Arc::new(MemoryAdmin::default()), "https://folio.example");
    let owner = OwnerId::new();
    manager.rotate(owner).await.unwrap();

    manager.set_active(owner, false).await.unwrap();
    let status = manager.status(owner).await.unwrap().unwrap();
    assert!(!status.active);
}
