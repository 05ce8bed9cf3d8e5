// JSON-based rate ledger store. Persists the whole timestamp sequence in a
// single JSON file, the moral equivalent of one localStorage key.
//
// Loading never fails: a missing or unparsable file starts the ledger empty,
// because the ledger is advisory and must fail open rather than lock every
// visitor out of the form.

use crate::core::ratelimit::{LedgerError, RateLedgerStore};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use tokio::sync::RwLock;

pub struct JsonLedgerStore {
    path: PathBuf,
    cache: RwLock<Vec<DateTime<Utc>>>,
}

impl JsonLedgerStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let cache: Vec<DateTime<Utc>> = File::open(&path)
            .ok()
            .map(BufReader::new)
            .and_then(|reader| serde_json::from_reader(reader).ok())
            .unwrap_or_default();

        Self {
            path,
            cache: RwLock::new(cache),
        }
    }

    async fn persist(&self) -> Result<(), LedgerError> {
        let cache = self.cache.read().await;
        let file = File::create(&self.path).map_err(|e| LedgerError::Storage(e.to_string()))?;
        serde_json::to_writer(file, &*cache).map_err(|e| LedgerError::Storage(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl RateLedgerStore for JsonLedgerStore {
    async fn timestamps(&self) -> Result<Vec<DateTime<Utc>>, LedgerError> {
        Ok(self.cache.read().await.clone())
    }

    async fn replace(&self, timestamps: Vec<DateTime<Utc>>) -> Result<(), LedgerError> {
        *self.cache.write().await = timestamps;
        self.persist().await
    }
}
