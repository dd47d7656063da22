use async_trait::async_trait;

use crate::error::Result;
use crate::record::PlateRecord;

/// Key/value access to the collection of plate records.
///
/// Keys are normalized plates. Every operation either resolves or fails with
/// [`PlateError::Storage`](crate::PlateError::Storage); implementations must
/// not retry on their own.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Short name for logs (e.g., "memory", "firestore").
    fn name(&self) -> &str;

    /// Fetch a single record. `Ok(None)` means the key does not exist.
    async fn get(&self, key: &str) -> Result<Option<PlateRecord>>;

    /// Create or fully replace the record stored under `key`.
    async fn put(&self, key: &str, record: &PlateRecord) -> Result<()>;

    /// Every record in the collection, in whatever order the backend returns.
    async fn get_all(&self) -> Result<Vec<(String, PlateRecord)>>;
}
