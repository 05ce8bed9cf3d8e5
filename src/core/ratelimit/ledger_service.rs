// Rate ledger - core logic for the client-side submission rate limit.
//
// The ledger is a single ordered sequence of timestamps of past successful
// submissions, persisted under one fixed key. It is advisory only: it cannot
// stop abuse across devices or after local storage is cleared, so a broken
// backing store must fail OPEN (count as zero) rather than block everyone.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Storage error: {0}")]
    Storage(String),
}

// ============================================================================
// STORAGE TRAIT (PORT)
// ============================================================================

/// Trait for persisting the submission timestamp sequence.
///
/// The sequence lives under a single logical key and is read and written as
/// a unit, mirroring a localStorage-style backing store.
#[async_trait]
pub trait RateLedgerStore: Send + Sync {
    /// Read the full stored sequence, oldest first.
    async fn timestamps(&self) -> Result<Vec<DateTime<Utc>>, LedgerError>;

    /// Replace the stored sequence wholesale.
    async fn replace(&self, timestamps: Vec<DateTime<Utc>>) -> Result<(), LedgerError>;
}

// ============================================================================
// CORE SERVICE
// ============================================================================

/// Sliding-window view over a [`RateLedgerStore`].
pub struct RateLedger<S: RateLedgerStore> {
    store: S,
}

impl<S: RateLedgerStore> RateLedger<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Count entries inside the trailing window ending at `now`.
    ///
    /// Read errors are logged and counted as zero entries.
    pub async fn count_within(&self, now: DateTime<Utc>, window: Duration) -> usize {
        let stored = match self.store.timestamps().await {
            Ok(stored) => stored,
            Err(err) => {
                tracing::warn!("Rate ledger unreadable, failing open: {}", err);
                return 0;
            }
        };

        stored.iter().filter(|t| now - **t < window).count()
    }

    /// Append `now` and prune entries that have aged out of the window.
    ///
    /// Called only after a submission actually reached the remote store; a
    /// write error is logged and swallowed because the comment is already
    /// posted and the ledger is advisory.
    pub async fn record(&self, now: DateTime<Utc>, window: Duration) {
        let mut recent: Vec<DateTime<Utc>> = match self.store.timestamps().await {
            Ok(stored) => stored.into_iter().filter(|t| now - *t < window).collect(),
            Err(err) => {
                tracing::warn!("Rate ledger unreadable, starting fresh: {}", err);
                Vec::new()
            }
        };
        recent.push(now);

        if let Err(err) = self.store.replace(recent).await {
            tracing::warn!("Failed to persist rate ledger: {}", err);
        }
    }
}
