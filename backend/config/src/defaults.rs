//! Config defaults: applies default values to parsed config.

use crate::schema::{LoggingConfig, PatenteConfig, RecognizerConfig, StoreConfig};

pub const DEFAULT_LOG_LEVEL: &str = "info";

pub const DEFAULT_COLLECTION: &str = "patentes";

pub const DEFAULT_FIRESTORE_DATABASE: &str = "(default)";

pub const DEFAULT_TESSERACT_BIN: &str = "tesseract";

pub const DEFAULT_OCR_LANGUAGE: &str = "eng";

/// Log files go to `logs/` under the config directory unless `logging.dir` is set.
pub fn default_log_dir() -> String {
    crate::io::config_dir().join("logs").display().to_string()
}

/// Apply all defaults to a freshly loaded config.
pub fn apply_all_defaults(config: PatenteConfig) -> PatenteConfig {
    let config = apply_logging_defaults(config);
    let config = apply_store_defaults(config);
    apply_recognizer_defaults(config)
}

fn apply_logging_defaults(mut config: PatenteConfig) -> PatenteConfig {
    let logging = config.logging.get_or_insert_with(LoggingConfig::default);
    if logging.level.is_none() {
        logging.level = Some(DEFAULT_LOG_LEVEL.to_string());
    }
    if logging.json.is_none() {
        logging.json = Some(false);
    }
    if logging.dir.is_none() {
        logging.dir = Some(default_log_dir());
    }
    config
}

fn apply_store_defaults(mut config: PatenteConfig) -> PatenteConfig {
    let store = config.store.get_or_insert_with(StoreConfig::default);
    if store.backend.is_none() {
        store.backend = Some(Default::default());
    }
    if store.collection.is_none() {
        store.collection = Some(DEFAULT_COLLECTION.to_string());
    }
    if let Some(firestore) = store.firestore.as_mut() {
        if firestore.database.is_none() {
            firestore.database = Some(DEFAULT_FIRESTORE_DATABASE.to_string());
        }
    }
    config
}

fn apply_recognizer_defaults(mut config: PatenteConfig) -> PatenteConfig {
    let recognizer = config.recognizer.get_or_insert_with(RecognizerConfig::default);
    if recognizer.provider.is_none() {
        recognizer.provider = Some(Default::default());
    }
    if recognizer.tesseract_bin.is_none() {
        recognizer.tesseract_bin = Some(DEFAULT_TESSERACT_BIN.to_string());
    }
    if recognizer.language.is_none() {
        recognizer.language = Some(DEFAULT_OCR_LANGUAGE.to_string());
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FirestoreConfig, LoggingConfig, StoreBackend};

    #[test]
    fn fills_missing_sections() {
        let config = apply_all_defaults(PatenteConfig::default());
        let store = config.store.as_ref().unwrap();
        assert_eq!(store.backend, Some(StoreBackend::Memory));
        assert_eq!(store.collection.as_deref(), Some("patentes"));
        assert_eq!(config.log_level(), "info");
        let log_dir = config.logging.as_ref().and_then(|l| l.dir.clone()).unwrap();
        assert!(std::path::Path::new(&log_dir).ends_with("logs"));
        let recognizer = config.recognizer.unwrap();
        assert_eq!(recognizer.tesseract_bin.as_deref(), Some("tesseract"));
        assert_eq!(recognizer.language.as_deref(), Some("eng"));
    }

    #[test]
    fn keeps_explicit_values() {
        let mut config = PatenteConfig::default();
        config.store = Some(StoreConfig {
            backend: Some(StoreBackend::Firestore),
            collection: Some("plates".into()),
            firestore: Some(FirestoreConfig {
                project_id: Some("demo".into()),
                ..Default::default()
            }),
        });
        config.logging = Some(LoggingConfig {
            dir: Some("/var/log/patente".into()),
            ..Default::default()
        });
        let config = apply_all_defaults(config);
        assert_eq!(config.logging.unwrap().dir.as_deref(), Some("/var/log/patente"));
        let store = config.store.unwrap();
        assert_eq!(store.collection.as_deref(), Some("plates"));
        assert_eq!(
            store.firestore.unwrap().database.as_deref(),
            Some("(default)")
        );
    }
}
