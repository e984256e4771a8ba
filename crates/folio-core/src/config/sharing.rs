//! Share link configuration.

use serde::{Deserialize, Serialize};

/// Lower bound on token entropy, in bytes.
pub const MIN_TOKEN_BYTES: usize = 16;

/// Upper bound on token size, in bytes. 96 bytes encode to 128 characters,
/// the width of the `share_token` column.
pub const MAX_TOKEN_BYTES: usize = 96;

/// Share link generation and URL settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharingConfig {
    /// Base URL the public share links are built on.
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
    /// Random bytes per token before encoding.
    #[serde(default = "default_token_bytes")]
    pub token_bytes: usize,
    /// Attempts to find an unused token before giving up.
    #[serde(default = "default_max_token_attempts")]
    pub max_token_attempts: u32,
}

impl SharingConfig {
    /// Build the public URL for a share token.
    pub fn share_url(&self, token: &str) -> String {
        format!(
            "{}/shared/{}",
            self.public_base_url.trim_end_matches('/'),
            token
        )
    }
}

impl Default for SharingConfig {
    fn default() -> Self {
        Self {
            public_base_url: default_public_base_url(),
            token_bytes: default_token_bytes(),
            max_token_attempts: default_max_token_attempts(),
        }
    }
}

fn default_public_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_token_bytes() -> usize {
    32
}

fn default_max_token_attempts() -> u32 {
    5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_share_url_strips_trailing_slash() {
        let config = SharingConfig {
            public_base_url: "https://folio.example/".to_string(),
            ..SharingConfig::default()
        };
        assert_eq!(
            config.share_url("abc"),
            "https://folio.example/shared/abc"
        );
    }
}
