//! Share token generation.

use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngCore;
use rand::rngs::OsRng;
use tracing::warn;

use folio_core::config::SharingConfig;
use folio_core::error::AppError;
use folio_database::PortfolioRepository;

/// Generates unguessable, URL-safe share tokens.
#[derive(Debug, Clone)]
pub struct TokenGenerator {
    /// Portfolio repository, used for the uniqueness pre-check.
    portfolios: Arc<dyn PortfolioRepository>,
    /// Random bytes per token.
    token_bytes: usize,
    /// Attempts before giving up on finding an unused token.
    max_attempts: u32,
}

impl TokenGenerator {
    /// Creates a new token generator.
    pub fn new(portfolios: Arc<dyn PortfolioRepository>, config: &SharingConfig) -> Self {
        Self {
            portfolios,
            token_bytes: config.token_bytes,
            max_attempts: config.max_token_attempts.max(1),
        }
    }

    /// Attempts allowed for both the pre-check and the final write.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Draws a fresh token from the OS CSPRNG, without checking uniqueness.
    pub fn generate(&self) -> String {
        let mut bytes = vec![0u8; self.token_bytes];
        OsRng.fill_bytes(&mut bytes);
        URL_SAFE_NO_PAD.encode(bytes)
    }

    /// Draws tokens until one is not held by any portfolio.
    ///
    /// The check is advisory; the store's uniqueness constraint is what
    /// decides, so callers still handle a `Conflict` on write.
    pub async fn generate_unique(&self) -> Result<String, AppError> {
        for attempt in 1..=self.max_attempts {
            let token = self.generate();
            if !self.portfolios.token_exists(&token).await? {
                return Ok(token);
            }
            warn!(attempt, "Generated share token already in use, retrying");
        }

        Err(AppError::internal(format!(
            "Could not generate a unique share token after {} attempts",
            self.max_attempts
        )))
    }
}

/// Short prefix of a token for log lines.
pub(crate) fn token_hint(token: &str) -> &str {
    let end = token
        .char_indices()
        .nth(6)
        .map(|(i, _)| i)
        .unwrap_or(token.len());
    &token[..end]
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use folio_database::Repositories;

    use super::*;

    fn generator(token_bytes: usize) -> TokenGenerator {
        let config = SharingConfig {
            token_bytes,
            ..SharingConfig::default()
        };
        TokenGenerator::new(Repositories::in_memory().portfolios, &config)
    }

    #[test]
    fn test_token_is_url_safe() {
        let token = generator(32).generate();
        // 32 bytes, unpadded base64
        assert_eq!(token.len(), 43);
        assert!(
            token
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
    }

    #[test]
    fn test_tokens_do_not_repeat() {
        let generator = generator(32);
        let tokens: HashSet<String> = (0..1000).map(|_| generator.generate()).collect();
        assert_eq!(tokens.len(), 1000);
    }

    #[tokio::test]
    async fn test_generate_unique_on_empty_store() {
        let token = generator(16).generate_unique().await.unwrap();
        assert_eq!(token.len(), 22);
    }

    #[test]
    fn test_token_hint() {
        assert_eq!(token_hint("abcdefghij"), "abcdef");
        assert_eq!(token_hint("abc"), "abc");
    }
}
