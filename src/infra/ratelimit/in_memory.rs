// In-memory implementation of RateLedgerStore. No persistence; handy for
// tests and for running against the in-memory comment store.

use crate::core::ratelimit::{LedgerError, RateLedgerStore};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

pub struct InMemoryLedgerStore {
    data: RwLock<Vec<DateTime<Utc>>>,
}

impl InMemoryLedgerStore {
    pub fn new() -> Self {
        Self {
            data: RwLock::new(Vec::new()),
        }
    }

    /// Start pre-filled, for exercising the ceiling.
    pub fn with_timestamps(timestamps: Vec<DateTime<Utc>>) -> Self {
        Self {
            data: RwLock::new(timestamps),
        }
    }
}

#[async_trait]
impl RateLedgerStore for InMemoryLedgerStore {
    async fn timestamps(&self) -> Result<Vec<DateTime<Utc>>, LedgerError> {
        Ok(self.data.read().await.clone())
    }

    async fn replace(&self, timestamps: Vec<DateTime<Utc>>) -> Result<(), LedgerError> {
        *self.data.write().await = timestamps;
        Ok(())
    }
}

impl Default for InMemoryLedgerStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn replace_overwrites_the_sequence() {
        let now = Utc::now();
        let store = InMemoryLedgerStore::with_timestamps(vec![now]);

        store.replace(vec![now, now]).await.unwrap();
        assert_eq!(store.timestamps().await.unwrap().len(), 2);

        store.replace(Vec::new()).await.unwrap();
        assert!(store.timestamps().await.unwrap().is_empty());
    }
}
