//! Environment handling for config values.
//!
//! Supports `${VAR_NAME}` syntax in string values, resolved at load time, plus a
//! couple of `HAUTE_*` overrides applied after parsing.
//! Variable names must match `[A-Z_][A-Z0-9_]*`.

use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::schema::{HauteConfig, LoggingConfig, RankingConfig};

/// Overrides `ranking.latencyMs`.
pub const LATENCY_ENV: &str = "HAUTE_RANKING_LATENCY_MS";

/// Overrides `logging.level`.
pub const LOG_LEVEL_ENV: &str = "HAUTE_LOG";

static ENV_VAR_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("valid env var pattern"));

/// A `${VAR}` reference with no value in the environment.
#[derive(Debug, thiserror::Error)]
#[error("{config_path}: environment variable {var_name} is not set")]
pub struct MissingEnvVarError {
    pub var_name: String,
    pub config_path: String,
}

/// Substitute `${VAR}` references in a config value tree using the process env.
pub fn resolve_env_vars(value: &Value) -> Result<Value> {
    resolve_env_vars_with(value, &std::env::vars().collect())
}

/// Substitute `${VAR}` references from an explicit environment map.
pub fn resolve_env_vars_with(value: &Value, env: &HashMap<String, String>) -> Result<Value> {
    let mut resolved = value.clone();
    substitute_in_place(&mut resolved, env, "")?;
    Ok(resolved)
}

fn substitute_in_place(value: &mut Value, env: &HashMap<String, String>, path: &str) -> Result<()> {
    match value {
        Value::String(s) => {
            if let Some(expanded) = expand(s, env, path)? {
                *s = expanded;
            }
        }
        Value::Array(items) => {
            for (i, item) in items.iter_mut().enumerate() {
                substitute_in_place(item, env, &format!("{path}[{i}]"))?;
            }
        }
        Value::Object(map) => {
            for (key, item) in map.iter_mut() {
                let child = match path {
                    "" => key.clone(),
                    _ => format!("{path}.{key}"),
                };
                substitute_in_place(item, env, &child)?;
            }
        }
        _ => {}
    }
    Ok(())
}

/// `None` when `s` holds no references. Unset and empty variables are errors.
fn expand(
    s: &str,
    env: &HashMap<String, String>,
    path: &str,
) -> Result<Option<String>, MissingEnvVarError> {
    if !ENV_VAR_PATTERN.is_match(s) {
        return Ok(None);
    }
    let lookup = |name: &str| env.get(name).filter(|v| !v.is_empty());

    if let Some(caps) = ENV_VAR_PATTERN
        .captures_iter(s)
        .find(|caps| lookup(&caps[1]).is_none())
    {
        return Err(MissingEnvVarError {
            var_name: caps[1].to_string(),
            config_path: path.to_string(),
        });
    }

    let expanded = ENV_VAR_PATTERN.replace_all(s, |caps: &regex::Captures| {
        lookup(&caps[1]).cloned().unwrap_or_default()
    });
    Ok(Some(expanded.into_owned()))
}

/// Apply `HAUTE_*` overrides from the given environment map.
pub fn apply_env_overrides(mut config: HauteConfig, env: &HashMap<String, String>) -> HauteConfig {
    if let Some(raw) = env.get(LATENCY_ENV) {
        match raw.trim().parse::<u64>() {
            Ok(ms) => {
                debug!(latency_ms = ms, "Ranking latency overridden from env");
                config
                    .ranking
                    .get_or_insert_with(RankingConfig::default)
                    .latency_ms = Some(ms);
            }
            Err(_) => warn!(var = LATENCY_ENV, value = %raw, "Ignoring non-numeric override"),
        }
    }
    if let Some(level) = env.get(LOG_LEVEL_ENV).filter(|l| !l.trim().is_empty()) {
        config
            .logging
            .get_or_insert_with(LoggingConfig::default)
            .level = Some(level.trim().to_string());
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn substitutes_nested_strings() {
        let value = json!({ "logging": { "dir": "${LOG_ROOT}/haute" }, "ranking": { "latencyMs": 5 } });
        let out = resolve_env_vars_with(&value, &env(&[("LOG_ROOT", "/var/log")])).unwrap();
        assert_eq!(out["logging"]["dir"], "/var/log/haute");
        assert_eq!(out["ranking"]["latencyMs"], 5);
    }

    #[test]
    fn missing_var_names_the_path() {
        let value = json!({ "query": { "fallbackTerm": "${NOPE}" } });
        let err = resolve_env_vars_with(&value, &env(&[])).unwrap_err();
        assert!(err.to_string().contains("query.fallbackTerm"));
    }

    #[test]
    fn overrides_latency_and_level() {
        let cfg = apply_env_overrides(
            HauteConfig::default(),
            &env(&[(LATENCY_ENV, "250"), (LOG_LEVEL_ENV, "debug")]),
        );
        assert_eq!(cfg.ranking_latency_ms(), 250);
        assert_eq!(cfg.log_level(), "debug");
    }

    #[test]
    fn ignores_garbage_latency() {
        let cfg = apply_env_overrides(HauteConfig::default(), &env(&[(LATENCY_ENV, "soon")]));
        assert!(cfg.ranking.is_none());
    }
}
