use chrono::{DateTime, Utc};
use folio_types::{OwnerId, ShareToken};
use serde::{Deserialize, Serialize};

/// The persisted mapping from an owner to their current share token.
///
/// At most one record exists per owner; the token is unique across all
/// records. Rotation replaces the token and resets `active` to true, which
/// invalidates the previous link immediately: the old token simply no
/// longer matches any record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShareRecord {
    pub owner: OwnerId,
    pub token: ShareToken,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ShareRecord {
    /// Creates a fresh, active record with a newly minted token.
    #[must_use]
    pub fn new(owner: OwnerId) -> Self {
        let now = Utc::now();
        Self {
            owner,
            token: ShareToken::generate(),
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replaces the token with a fresh one and reactivates the link.
    pub fn rotate(&mut self) {
        self.token = ShareToken::generate();
        self.active = true;
        self.updated_at = Utc::now();
    }

    /// Toggles public visibility without changing the token.
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
        self.updated_at = Utc::now();
    }
}
