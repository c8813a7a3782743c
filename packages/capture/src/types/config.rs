//! Capture configuration.

use serde::{Deserialize, Serialize};

/// Duplicate-suppression policy applied before a record is stored.
///
/// The two observed capture flows disagree on this, so it is a
/// caller-selectable mode rather than a hardcoded choice.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum DedupPolicy {
    /// Suppress a record whose source URL matches a saved record, or
    /// whose author matches one saved within the time window.
    #[serde(rename_all = "camelCase")]
    UrlOrAuthorWindow {
        /// Window in seconds for the author+time match.
        window_secs: i64,
    },

    /// Store every capture, duplicates included.
    Off,
}

impl Default for DedupPolicy {
    fn default() -> Self {
        DedupPolicy::UrlOrAuthorWindow { window_secs: 300 }
    }
}

/// Tunables for the capture pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Store capacity; the oldest record is evicted past this.
    pub max_saved_posts: usize,

    /// Duplicate-suppression mode.
    pub dedup: DedupPolicy,

    /// Rounds of "see more" expansion attempted in feed view.
    pub expand_attempts: u32,

    /// Fixed wait after each expansion activation, in milliseconds.
    pub expand_wait_ms: u64,

    /// Bound on the ancestor walk when locating a post container.
    pub max_ancestor_hops: usize,

    /// Captions shorter than this do not count as content for the
    /// insufficient-content check.
    pub min_caption_len: usize,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            max_saved_posts: 500,
            dedup: DedupPolicy::default(),
            expand_attempts: 3,
            expand_wait_ms: 150,
            max_ancestor_hops: 50,
            min_caption_len: 10,
        }
    }
}

impl CaptureConfig {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the store capacity.
    pub fn with_max_saved_posts(mut self, max: usize) -> Self {
        self.max_saved_posts = max;
        self
    }

    /// Set the dedup policy.
    pub fn with_dedup(mut self, policy: DedupPolicy) -> Self {
        self.dedup = policy;
        self
    }

    /// Set expansion attempts and wait.
    pub fn with_expansion(mut self, attempts: u32, wait_ms: u64) -> Self {
        self.expand_attempts = attempts;
        self.expand_wait_ms = wait_ms;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CaptureConfig::default();
        assert_eq!(config.max_saved_posts, 500);
        assert_eq!(config.expand_attempts, 3);
        assert_eq!(config.expand_wait_ms, 150);
        assert_eq!(config.dedup, DedupPolicy::UrlOrAuthorWindow { window_secs: 300 });
    }

    #[test]
    fn test_builders() {
        let config = CaptureConfig::new()
            .with_max_saved_posts(100)
            .with_dedup(DedupPolicy::Off)
            .with_expansion(1, 50);
        assert_eq!(config.max_saved_posts, 100);
        assert_eq!(config.dedup, DedupPolicy::Off);
        assert_eq!(config.expand_attempts, 1);
    }
}
