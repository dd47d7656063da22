//! `patente-config` — runtime configuration for patente.
//!
//! Provides:
//! - Typed config schema (logging, record store, recognizer)
//! - YAML loading
//! - `${ENV_VAR}` substitution
//! - Default value application
//! - Validation

pub mod defaults;
pub mod env;
pub mod io;
pub mod schema;
pub mod validation;

pub use defaults::apply_all_defaults;
pub use env::{collect_referenced_vars, resolve_env_vars_with, MissingEnvVarError};
pub use io::{config_dir, config_file_path, load_config};
pub use schema::{
    FirestoreConfig, LoggingConfig, PatenteConfig, RecognizerConfig, RecognizerProvider,
    StoreBackend, StoreConfig,
};
pub use validation::{validate, ConfigValidationError, ValidationReport};

use anyhow::{anyhow, bail, Context, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;

/// Command-line settings that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub store_backend: Option<StoreBackend>,
}

impl ConfigOverrides {
    fn apply(&self, mut config: PatenteConfig) -> PatenteConfig {
        if let Some(backend) = self.store_backend {
            config.store.get_or_insert_with(StoreConfig::default).backend = Some(backend);
        }
        config
    }
}

/// Load, substitute env vars, apply overrides and defaults, and validate a
/// config file.
///
/// This is the main entry point for loading a config at runtime.
pub async fn load_and_prepare(path: &Path, overrides: &ConfigOverrides) -> Result<PatenteConfig> {
    load_and_prepare_with(path, &std::env::vars().collect(), overrides).await
}

/// [`load_and_prepare`] with an explicit environment (useful for testing).
pub async fn load_and_prepare_with(
    path: &Path,
    env: &HashMap<String, String>,
    overrides: &ConfigOverrides,
) -> Result<PatenteConfig> {
    let raw_config = load_config(path).await?;

    let value: Value = serde_json::to_value(&raw_config)
        .context("Failed to serialize config for processing")?;
    let resolved = resolve_env_vars_with(&value, env).map_err(|err| {
        let unset: Vec<String> = collect_referenced_vars(&value)
            .into_iter()
            .filter(|var| env.get(var).map_or(true, |v| v.is_empty()))
            .collect();
        anyhow!(err).context(format!(
            "Failed to resolve env vars in config; unset: {}",
            unset.join(", ")
        ))
    })?;
    let config: PatenteConfig = serde_json::from_value(resolved)
        .context("Failed to deserialize config after processing")?;

    let config = apply_all_defaults(overrides.apply(config));

    let report = validate(&config);
    for warning in &report.warnings {
        tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
    for error in &report.errors {
        tracing::error!(path = %error.path, message = %error.message, "Config error");
    }
    if !report.is_valid() {
        let messages: Vec<String> = report.errors.iter().map(|e| e.to_string()).collect();
        bail!("invalid config {}: {}", path.display(), messages.join("; "));
    }

    Ok(config)
}
