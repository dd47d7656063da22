use std::sync::Arc;

use patente_core::Result;
use patente_understanding::{extract_plate, InputImage, PlateRecognizer};
use tokio::task::JoinHandle;
use tracing::{info, instrument, warn};

use crate::lookup::LookupWorkflow;

/// A plate read from an image, with the lookup it kicked off.
pub struct PlateScan {
    pub plate: String,
    pub lookup: JoinHandle<()>,
}

/// Reads a plate from a photo and looks it up.
pub struct ScanWorkflow {
    recognizer: Arc<dyn PlateRecognizer>,
    lookup: LookupWorkflow,
}

impl ScanWorkflow {
    pub fn new(recognizer: Arc<dyn PlateRecognizer>, lookup: LookupWorkflow) -> Self {
        Self { recognizer, lookup }
    }

    pub fn lookup(&self) -> &LookupWorkflow {
        &self.lookup
    }

    /// Recognize text in `image` and, if a plate is found, start a lookup for it.
    ///
    /// `Ok(None)` means the image holds no valid plate; storage is not queried.
    /// Recognition failures are returned as-is and not retried.
    #[instrument(skip_all, fields(recognizer = self.recognizer.name()))]
    pub async fn scan(&self, image: &InputImage) -> Result<Option<PlateScan>> {
        let blocks = self.recognizer.recognize(image).await?;
        match extract_plate(&blocks) {
            Some(plate) => {
                info!(plate = %plate, blocks = blocks.len(), "Plate recognized");
                let lookup = self.lookup.lookup(&plate);
                Ok(Some(PlateScan { plate, lookup }))
            }
            None => {
                warn!(blocks = blocks.len(), "No valid plate in recognized text");
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use patente_core::{PlateError, PlateRecord};
    use patente_store::InMemoryRecordStore;

    struct FixedRecognizer(Vec<&'static str>);

    #[async_trait]
    impl PlateRecognizer for FixedRecognizer {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn recognize(&self, _image: &InputImage) -> Result<Vec<String>> {
            Ok(self.0.iter().map(|s| s.to_string()).collect())
        }
    }

    struct BrokenRecognizer;

    #[async_trait]
    impl PlateRecognizer for BrokenRecognizer {
        fn name(&self) -> &str {
            "broken"
        }

        async fn recognize(&self, _image: &InputImage) -> Result<Vec<String>> {
            Err(PlateError::Recognition("image unreadable".into()))
        }
    }

    fn image() -> InputImage {
        InputImage::from_bytes(vec![0xff, 0xd8], "image/jpeg")
    }

    #[tokio::test]
    async fn recognized_plate_is_looked_up() {
        let store = InMemoryRecordStore::with_records([PlateRecord::new("ghjk45", "Carla", true)]);
        let lookup = LookupWorkflow::new(Arc::new(store));
        let scan = ScanWorkflow::new(
            Arc::new(FixedRecognizer(vec!["CHILE", "GH-JK 45", "ABC123"])),
            lookup,
        );

        let found = scan.scan(&image()).await.unwrap().unwrap();
        assert_eq!(found.plate, "ghjk45");
        found.lookup.await.unwrap();

        let current = scan.lookup().current().unwrap();
        assert_eq!(current.user, "Carla");
        assert!(current.linked);
    }

    #[tokio::test]
    async fn no_plate_leaves_lookup_untouched() {
        let store = InMemoryRecordStore::new();
        store.set_failing(true);
        let lookup = LookupWorkflow::new(Arc::new(store));
        let mut rx = lookup.subscribe();
        let scan = ScanWorkflow::new(Arc::new(FixedRecognizer(vec!["AB-12 34", "hello"])), lookup);

        assert!(scan.scan(&image()).await.unwrap().is_none());
        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test]
    async fn recognition_failure_is_returned() {
        let lookup = LookupWorkflow::new(Arc::new(InMemoryRecordStore::new()));
        let scan = ScanWorkflow::new(Arc::new(BrokenRecognizer), lookup);

        let err = scan.scan(&image()).await.err().unwrap();
        assert!(matches!(err, PlateError::Recognition(_)));
    }
}
