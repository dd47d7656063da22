use std::sync::Arc;

use patente_core::{LatestSlot, PlateRecord, RecordStore};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, instrument};

/// Fetches every plate record and publishes the snapshot.
///
/// `Some(records)` is a successful listing (possibly empty); `None` means no
/// listing has completed yet or the last one failed. Record order is
/// whatever the store returns.
#[derive(Clone)]
pub struct ListWorkflow {
    store: Arc<dyn RecordStore>,
    listing: LatestSlot<Option<Vec<PlateRecord>>>,
}

impl ListWorkflow {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            listing: LatestSlot::new(None),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Vec<PlateRecord>>> {
        self.listing.subscribe()
    }

    pub fn current(&self) -> Option<Vec<PlateRecord>> {
        self.listing.current()
    }

    pub fn list_all(&self) -> JoinHandle<()> {
        let this = self.clone();
        tokio::spawn(async move {
            this.refresh().await;
        })
    }

    #[instrument(skip(self), fields(store = self.store.name()))]
    pub async fn refresh(&self) -> Option<Vec<PlateRecord>> {
        let listing = match self.store.get_all().await {
            Ok(entries) => {
                if entries.is_empty() {
                    info!("Listing succeeded but the collection is empty");
                } else {
                    info!(count = entries.len(), "Plate records listed");
                }
                // The document key is authoritative for the plate.
                let records = entries
                    .into_iter()
                    .map(|(key, record)| PlateRecord { plate: key, ..record })
                    .collect();
                Some(records)
            }
            Err(e) => {
                error!(error = %e, "Failed to list plate records");
                None
            }
        };
        self.listing.publish(listing.clone());
        listing
    }
}
