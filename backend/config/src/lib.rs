//! `haute-config`: configuration for the Haute session host.
//!
//! Provides:
//! - Typed config schema (selection, query, ranking, logging)
//! - YAML loading with `~/.haute/config.yaml` discovery
//! - `${ENV_VAR}` substitution and `HAUTE_*` overrides
//! - Default value application
//! - Validation with errors and warnings

pub mod defaults;
pub mod env;
pub mod io;
pub mod schema;
pub mod validation;

pub use defaults::apply_all_defaults;
pub use env::{MissingEnvVarError, apply_env_overrides, resolve_env_vars, resolve_env_vars_with};
pub use io::{config_dir, config_file_path, load_config};
pub use schema::{HauteConfig, LoggingConfig, QueryConfig, RankingConfig, SelectionConfig};
pub use validation::{ConfigValidationError, ValidationReport, validate};

use anyhow::{Context, Result, bail};
use std::collections::HashMap;
use std::path::Path;

/// Load, apply env substitution and overrides, apply defaults, and validate.
///
/// This is the main entry point for loading a config at runtime. Validation
/// warnings are logged; validation errors fail the load.
pub async fn load_and_prepare(path: &Path) -> Result<HauteConfig> {
    let env: HashMap<String, String> = std::env::vars().collect();
    prepare(io::load_raw(path).await?, &env)
}

/// The processing pipeline behind [`load_and_prepare`], with an explicit environment.
pub fn prepare(raw: serde_json::Value, env: &HashMap<String, String>) -> Result<HauteConfig> {
    let value = resolve_env_vars_with(&raw, env).context("Failed to resolve env vars in config")?;

    let config: HauteConfig =
        serde_json::from_value(value).context("Failed to deserialize config after processing")?;

    let config = apply_all_defaults(apply_env_overrides(config, env));

    let report = validate(&config);
    for warning in &report.warnings {
        tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
    for error in &report.errors {
        tracing::error!(path = %error.path, message = %error.message, "Config error");
    }
    if let Some(first) = report.errors.into_iter().next() {
        bail!(first);
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn prepare_runs_full_pipeline() {
        let env = HashMap::from([
            ("FALLBACK".to_string(), "anything stylish".to_string()),
            (env::LATENCY_ENV.to_string(), "0".to_string()),
        ]);
        let raw = json!({ "query": { "fallbackTerm": "${FALLBACK}" } });
        let cfg = prepare(raw, &env).unwrap();
        assert_eq!(cfg.fallback_term(), "anything stylish");
        assert_eq!(cfg.ranking_latency_ms(), 0);
        assert_eq!(cfg.min_selection(), (20, 20));
    }

    #[test]
    fn prepare_rejects_invalid_config() {
        let raw = json!({ "selection": { "minHeight": 0 } });
        let err = prepare(raw, &HashMap::new()).unwrap_err();
        assert!(err.to_string().contains("selection.minHeight"));
    }
}
