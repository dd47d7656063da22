//! Config validation with user-friendly error messages.

use crate::schema::{PatenteConfig, RecognizerProvider, StoreBackend};
use thiserror::Error;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

/// A config validation error with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Validate the config and return a report of all errors and warnings.
pub fn validate(config: &PatenteConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_logging(config, &mut report);
    validate_store(config, &mut report);
    validate_recognizer(config, &mut report);
    report
}

fn validate_logging(config: &PatenteConfig, report: &mut ValidationReport) {
    let Some(level) = config.logging.as_ref().and_then(|l| l.level.as_deref()) else {
        return;
    };
    // Full EnvFilter directives ("patente=debug,info") are allowed through.
    if !level.contains('=') && !LOG_LEVELS.contains(&level.to_ascii_lowercase().as_str()) {
        report.warn("logging.level", format!("Unknown log level '{level}'"));
    }
}

fn validate_store(config: &PatenteConfig, report: &mut ValidationReport) {
    let Some(store) = &config.store else { return };
    if let Some(collection) = &store.collection {
        if collection.trim().is_empty() {
            report.error("store.collection", "Collection name cannot be empty");
        } else if collection.contains('/') {
            report.error("store.collection", "Collection name cannot contain '/'");
        }
    }
    if config.store_backend() == StoreBackend::Firestore {
        let project = store
            .firestore
            .as_ref()
            .and_then(|f| f.project_id.as_deref())
            .unwrap_or("");
        if project.trim().is_empty() {
            report.error(
                "store.firestore.projectId",
                "Firestore backend requires a project id",
            );
        }
    } else if store.firestore.is_some() {
        report.warn(
            "store.firestore",
            "Firestore settings are ignored unless store.backend is 'firestore'",
        );
    }
}

fn validate_recognizer(config: &PatenteConfig, report: &mut ValidationReport) {
    let Some(recognizer) = &config.recognizer else { return };
    match config.recognizer_provider() {
        RecognizerProvider::Openai | RecognizerProvider::Gemini => {
            let key = recognizer.api_key.as_deref().unwrap_or("");
            if key.trim().is_empty() {
                report.error(
                    "recognizer.apiKey",
                    "Vision recognizers require an API key",
                );
            }
        }
        RecognizerProvider::Tesseract => {
            if recognizer
                .tesseract_bin
                .as_deref()
                .is_some_and(|b| b.trim().is_empty())
            {
                report.error("recognizer.tesseractBin", "Tesseract binary cannot be empty");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FirestoreConfig, LoggingConfig, RecognizerConfig, StoreConfig};

    #[test]
    fn default_config_is_valid() {
        let report = validate(&crate::apply_all_defaults(PatenteConfig::default()));
        assert!(report.is_valid());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn firestore_requires_project() {
        let config = PatenteConfig {
            store: Some(StoreConfig {
                backend: Some(StoreBackend::Firestore),
                firestore: Some(FirestoreConfig::default()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let report = validate(&config);
        assert!(!report.is_valid());
        assert_eq!(report.errors[0].path, "store.firestore.projectId");
    }

    #[test]
    fn vision_requires_api_key() {
        let config = PatenteConfig {
            recognizer: Some(RecognizerConfig {
                provider: Some(RecognizerProvider::Openai),
                ..Default::default()
            }),
            ..Default::default()
        };
        let report = validate(&config);
        assert!(report.errors.iter().any(|e| e.path == "recognizer.apiKey"));
    }

    #[test]
    fn empty_collection_is_rejected() {
        let config = PatenteConfig {
            store: Some(StoreConfig {
                collection: Some("  ".into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(!validate(&config).is_valid());
    }

    #[test]
    fn unknown_log_level_warns() {
        let config = PatenteConfig {
            logging: Some(LoggingConfig {
                level: Some("loud".into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let report = validate(&config);
        assert!(report.is_valid());
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn filter_directives_are_accepted() {
        let config = PatenteConfig {
            logging: Some(LoggingConfig {
                level: Some("patente_workflows=debug,info".into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(validate(&config).warnings.is_empty());
    }
}
