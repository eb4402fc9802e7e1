//! Configuration loading for Linares-Digital

mod schema;

pub use schema::{
    Config, NarrativeConfig, ProviderKind, ReportConfig, DEFAULT_TIMEOUT_SECS, MAX_TIMEOUT_SECS,
};

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const CONFIG_FILENAME: &str = ".linaresrc.json";

/// Find and load config file with extends resolution. Searches current directory then parents.
pub fn load_config(work_dir: &Path, custom_path: Option<&Path>) -> Result<Config> {
    let path = if let Some(p) = custom_path {
        let path = if p.is_absolute() {
            p.to_path_buf()
        } else {
            work_dir.join(p)
        };
        if path.exists() {
            Some(path)
        } else {
            anyhow::bail!("Config file not found: {}", path.display());
        }
    } else {
        find_config_in_parents(work_dir)
    };

    let config = match path {
        Some(path) => {
            debug!(path = %path.display(), "loading config");
            load_config_with_extends(&path, &mut HashSet::new())?
        }
        None => Config::default(),
    };
    config.validate()?;
    Ok(config)
}

/// Load a config file and resolve extends chain
fn load_config_with_extends(config_path: &Path, visited: &mut HashSet<PathBuf>) -> Result<Config> {
    // Prevent circular extends
    let canonical = config_path
        .canonicalize()
        .unwrap_or_else(|_| config_path.to_path_buf());
    if !visited.insert(canonical) {
        anyhow::bail!(
            "Circular extends detected in config: {}",
            config_path.display()
        );
    }

    let content = fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config: {}", config_path.display()))?;
    let mut config: Config = serde_json::from_str(&content)
        .with_context(|| format!("Invalid JSON in config: {}", config_path.display()))?;

    if let Some(extends) = config.extends.take() {
        let base_config = resolve_extends(config_path, &extends, visited)?;
        config.merge_from(base_config);
    }

    Ok(config)
}

/// Resolve an extends reference (relative to the referencing file, or absolute)
fn resolve_extends(
    config_path: &Path,
    extends: &str,
    visited: &mut HashSet<PathBuf>,
) -> Result<Config> {
    let config_dir = config_path.parent().unwrap_or(Path::new("."));
    let extends_path = Path::new(extends);
    let extends_path = if extends_path.is_absolute() {
        extends_path.to_path_buf()
    } else {
        config_dir.join(extends_path)
    };

    let extends_path = if extends_path.extension().is_none() {
        extends_path.with_extension("json")
    } else {
        extends_path
    };

    if !extends_path.exists() {
        anyhow::bail!(
            "Extended config not found: {} (referenced from {})",
            extends_path.display(),
            config_path.display()
        );
    }

    load_config_with_extends(&extends_path, visited)
}

/// Search for .linaresrc.json in directory and its parents
fn find_config_in_parents(mut dir: &Path) -> Option<PathBuf> {
    loop {
        let candidate = dir.join(CONFIG_FILENAME);
        if candidate.exists() {
            return Some(candidate);
        }
        dir = dir.parent()?;
    }
}

/// Default contents written by `linares-digital init`
pub fn starter_config(provider: ProviderKind, threshold: Option<f64>) -> String {
    let threshold = threshold
        .map(|t| format!("\n  \"threshold\": {},", t))
        .unwrap_or_default();
    let api_key_env = provider
        .default_api_key_env()
        .map(|env| format!(",\n    \"apiKeyEnv\": \"{}\"", env))
        .unwrap_or_default();
    format!(
        r#"{{{threshold}
  "narrative": {{
    "provider": "{provider}",
    "timeoutSecs": {timeout}{api_key_env}
  }},
  "report": {{
    "format": "html"
  }}
}}
"#,
        threshold = threshold,
        provider = provider,
        timeout = DEFAULT_TIMEOUT_SECS,
        api_key_env = api_key_env,
    )
}
