//! Builds the store and recognizer selected by the loaded config.

use std::sync::Arc;

use anyhow::Result;
use patente_config::{PatenteConfig, RecognizerProvider, StoreBackend};
use patente_core::{PlateError, RecordStore};
use patente_store::{FirestoreRecordStore, InMemoryRecordStore};
use patente_understanding::{PlateRecognizer, TesseractRecognizer, VisionProvider, VisionRecognizer};
use tracing::info;

pub fn build_store(config: &PatenteConfig) -> Result<Arc<dyn RecordStore>> {
    let store_config = config.store.clone().unwrap_or_default();
    match config.store_backend() {
        StoreBackend::Memory => {
            info!("Using in-memory record store; records are lost on exit");
            Ok(Arc::new(InMemoryRecordStore::new()))
        }
        StoreBackend::Firestore => {
            let firestore = store_config.firestore.unwrap_or_default();
            let project = firestore
                .project_id
                .filter(|p| !p.trim().is_empty())
                .ok_or_else(|| {
                    PlateError::Config(
                        "store.firestore.projectId is required for the firestore backend".into(),
                    )
                })?;

            let mut store = FirestoreRecordStore::new(&project).with_api_key(firestore.api_key);
            if let Some(collection) = store_config.collection {
                store = store.with_collection(collection);
            }
            if let Some(database) = firestore.database {
                store = store.with_database(database);
            }
            if let Some(base_url) = firestore.base_url {
                store = store.with_base_url(base_url);
            }
            info!(project = %project, "Using Firestore record store");
            Ok(Arc::new(store))
        }
    }
}

pub fn build_recognizer(config: &PatenteConfig) -> Result<Arc<dyn PlateRecognizer>> {
    let recognizer = config.recognizer.clone().unwrap_or_default();
    let provider = config.recognizer_provider();
    let api_key = || {
        recognizer
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                PlateError::Config("recognizer.apiKey is required for vision recognizers".into())
            })
    };

    let built: Arc<dyn PlateRecognizer> = match provider {
        RecognizerProvider::Tesseract => {
            let mut tesseract = TesseractRecognizer::new();
            if let Some(bin) = &recognizer.tesseract_bin {
                tesseract = tesseract.with_binary(bin);
            }
            if let Some(language) = &recognizer.language {
                tesseract = tesseract.with_language(language);
            }
            Arc::new(tesseract)
        }
        RecognizerProvider::Openai | RecognizerProvider::Gemini => {
            let mut vision = if provider == RecognizerProvider::Openai {
                VisionProvider::openai(api_key()?)
            } else {
                VisionProvider::gemini(api_key()?)
            };
            if let Some(model) = &recognizer.model {
                vision = vision.with_model(model);
            }
            Arc::new(VisionRecognizer::new(vision))
        }
    };
    info!(recognizer = built.name(), "Recognizer ready");
    Ok(built)
}
