//! Share link value object.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A generated share link handed back to the owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareLink {
    /// The full URL for accessing the portfolio.
    pub share_url: String,
    /// The share token embedded in the URL.
    pub token: String,
    /// When the token was issued.
    pub link_created_at: Option<DateTime<Utc>>,
}
