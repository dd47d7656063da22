use std::sync::Arc;

use patente_core::{normalize_plate, LatestSlot, PlateRecord, RecordStore};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, instrument};

/// Looks up the record linked to a plate and publishes it as the current
/// lookup result.
///
/// The result slot holds `None` until something is found, and again whenever
/// a lookup finds nothing or fails.
#[derive(Clone)]
pub struct LookupWorkflow {
    store: Arc<dyn RecordStore>,
    result: LatestSlot<Option<PlateRecord>>,
}

impl LookupWorkflow {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            result: LatestSlot::new(None),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<PlateRecord>> {
        self.result.subscribe()
    }

    pub fn current(&self) -> Option<PlateRecord> {
        self.result.current()
    }

    /// Start a lookup in the background.
    ///
    /// `raw` must already be a plate of [`PLATE_LEN`](patente_core::PLATE_LEN)
    /// characters. Concurrent lookups are not cancelled or ordered: whichever
    /// finishes last owns the slot.
    pub fn lookup(&self, raw: &str) -> JoinHandle<()> {
        let this = self.clone();
        let raw = raw.to_string();
        tokio::spawn(async move {
            this.resolve(&raw).await;
        })
    }

    /// Run a lookup to completion, publish its result, and return it.
    #[instrument(skip(self), fields(store = self.store.name()))]
    pub async fn resolve(&self, raw: &str) -> Option<PlateRecord> {
        let key = normalize_plate(raw);
        let found = match self.store.get(&key).await {
            Ok(Some(record)) => {
                info!(plate = %key, linked = record.linked, "Plate record found");
                Some(record.with_key(&key))
            }
            Ok(None) => {
                info!(plate = %key, "No record for plate");
                None
            }
            Err(e) => {
                error!(plate = %key, error = %e, "Plate lookup failed");
                None
            }
        };
        self.result.publish(found.clone());
        found
    }
}
