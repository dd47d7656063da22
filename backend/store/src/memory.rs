use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use patente_core::{PlateError, PlateRecord, RecordStore, Result};
use tokio::sync::RwLock;
use tracing::debug;

/// Process-local record store for tests and dry runs.
///
/// Can be switched into a failing mode where every call returns a storage
/// error, standing in for an unreachable backend.
#[derive(Clone, Default)]
pub struct InMemoryRecordStore {
    records: Arc<RwLock<HashMap<String, PlateRecord>>>,
    failing: Arc<AtomicBool>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with existing records, keyed by their plate.
    pub fn with_records(records: impl IntoIterator<Item = PlateRecord>) -> Self {
        let map = records
            .into_iter()
            .map(|r| (r.plate.clone(), r))
            .collect();
        Self {
            records: Arc::new(RwLock::new(map)),
            failing: Arc::default(),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    fn check_available(&self) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(PlateError::Storage("in-memory store is offline".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn get(&self, key: &str) -> Result<Option<PlateRecord>> {
        self.check_available()?;
        Ok(self.records.read().await.get(key).cloned())
    }

    async fn put(&self, key: &str, record: &PlateRecord) -> Result<()> {
        self.check_available()?;
        let previous = self
            .records
            .write()
            .await
            .insert(key.to_string(), record.clone());
        debug!(plate = %key, replaced = previous.is_some(), "Record stored in memory");
        Ok(())
    }

    async fn get_all(&self) -> Result<Vec<(String, PlateRecord)>> {
        self.check_available()?;
        let records = self.records.read().await;
        Ok(records
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }
}
