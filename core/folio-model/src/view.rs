use chrono::{DateTime, Utc};
use folio_types::ShareToken;
use serde::{Deserialize, Serialize};

/// An append-only record of one anonymous visit to a shared portfolio.
///
/// Written exclusively by the view recorder; nothing in the share pipeline
/// reads these back. There is no update or delete path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewEvent {
    pub token: ShareToken,
    pub referrer: String,
    pub user_agent: String,
    pub viewed_at: DateTime<Utc>,
}

impl ViewEvent {
    /// Creates a view event stamped with the current time.
    ///
    /// An empty referrer is recorded as `"direct"` so the analytics side
    /// can distinguish "no referrer header" from a dropped field.
    #[must_use]
    pub fn new(token: ShareToken, referrer: &str, user_agent: &str) -> Self {
        Self {
            token,
            referrer: if referrer.is_empty() {
                "direct".to_string()
            } else {
                referrer.to_string()
            },
            user_agent: user_agent.to_string(),
            viewed_at: Utc::now(),
        }
    }
}
