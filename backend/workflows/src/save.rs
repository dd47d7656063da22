use std::sync::Arc;

use patente_core::{normalize_plate, EventChannel, PlateRecord, RecordStore};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{info, instrument, warn};

/// Result of one save attempt, delivered once to the subscribers listening
/// at the time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved { plate: String },
    Failed { plate: String, reason: String },
}

impl SaveOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, Self::Saved { .. })
    }

    pub fn plate(&self) -> &str {
        match self {
            Self::Saved { plate } | Self::Failed { plate, .. } => plate,
        }
    }
}

/// Creates or overwrites the record for a plate.
#[derive(Clone)]
pub struct SaveWorkflow {
    store: Arc<dyn RecordStore>,
    outcomes: EventChannel<SaveOutcome>,
}

impl SaveWorkflow {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            outcomes: EventChannel::new(),
        }
    }

    /// Subscribe before calling [`save`](Self::save); earlier outcomes are
    /// not replayed.
    pub fn subscribe(&self) -> broadcast::Receiver<SaveOutcome> {
        self.outcomes.subscribe()
    }

    /// Start a save in the background.
    ///
    /// The caller guarantees `plate` has [`PLATE_LEN`](patente_core::PLATE_LEN)
    /// characters and `user` is not blank. An existing record with the same
    /// plate is replaced entirely (last write wins).
    pub fn save(&self, plate: &str, user: &str, linked: bool) -> JoinHandle<SaveOutcome> {
        let this = self.clone();
        let record = PlateRecord::new(plate, user, linked);
        tokio::spawn(async move { this.persist(record).await })
    }

    /// Write `record`, publish the outcome, and return it.
    #[instrument(skip_all, fields(plate = %record.plate, store = self.store.name()))]
    pub async fn persist(&self, record: PlateRecord) -> SaveOutcome {
        let record = PlateRecord {
            plate: normalize_plate(&record.plate),
            ..record
        };
        let outcome = match self.store.put(&record.plate, &record).await {
            Ok(()) => {
                info!(linked = record.linked, "Plate record saved");
                SaveOutcome::Saved {
                    plate: record.plate,
                }
            }
            Err(e) => {
                warn!(error = %e, "Failed to save plate record");
                SaveOutcome::Failed {
                    plate: record.plate,
                    reason: e.to_string(),
                }
            }
        };
        self.outcomes.publish(outcome.clone());
        outcome
    }
}
