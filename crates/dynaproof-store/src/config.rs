//! Configuration loading and backend factory.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use dynaproof_core::engine::ServiceConfig;
use dynaproof_core::scoring::ScoringConfig;
use dynaproof_core::synthesizer::SynthesizerConfig;
use dynaproof_core::traits::{EventLog, ProfileStore};

use crate::event_log::JsonlEventLog;
use crate::json_store::JsonProfileStore;

/// Top-level dynaproof configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DynaproofConfig {
    /// Directory holding the profile file and the event log.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Profile file name, relative to `data_dir`.
    #[serde(default = "default_profile_file")]
    pub profile_file: String,
    /// Event log file name, relative to `data_dir`.
    #[serde(default = "default_event_log_file")]
    pub event_log_file: String,
    /// Fixed RNG seed for reproducible question sequences.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    #[serde(default)]
    pub synthesizer: SynthesizerConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./dynaproof-data")
}
fn default_profile_file() -> String {
    "learners.json".to_string()
}
fn default_event_log_file() -> String {
    "events.jsonl".to_string()
}

impl Default for DynaproofConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            profile_file: default_profile_file(),
            event_log_file: default_event_log_file(),
            seed: None,
            synthesizer: SynthesizerConfig::default(),
            scoring: ScoringConfig::default(),
        }
    }
}

impl DynaproofConfig {
    pub fn profile_path(&self) -> PathBuf {
        self.data_dir.join(&self.profile_file)
    }

    pub fn event_log_path(&self) -> PathBuf {
        self.data_dir.join(&self.event_log_file)
    }

    /// Settings for the assessment service.
    pub fn service_config(&self) -> ServiceConfig {
        ServiceConfig {
            synthesizer: self.synthesizer.clone(),
            scoring: self.scoring.clone(),
            seed: self.seed,
        }
    }

    /// Render the configuration as TOML, for `dynaproof init`.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("failed to serialize config")
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `dynaproof.toml` in the current directory
/// 2. `~/.config/dynaproof/config.toml`
///
/// Environment variable overrides: `DYNAPROOF_DATA_DIR`, `DYNAPROOF_SEED`.
pub fn load_config() -> Result<DynaproofConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<DynaproofConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("dynaproof.toml");
        if local.exists() {
            Some(local)
        } else if let Some(home) = dirs_path() {
            let global = home.join("config.toml");
            if global.exists() {
                Some(global)
            } else {
                None
            }
        } else {
            None
        }
    };

    let config = match config_path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading config");
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<DynaproofConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => DynaproofConfig::default(),
    };

    apply_env_overrides(config, |key| std::env::var(key).ok())
}

/// Apply `DYNAPROOF_*` overrides read through `lookup`.
fn apply_env_overrides(
    mut config: DynaproofConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<DynaproofConfig> {
    if let Some(dir) = lookup("DYNAPROOF_DATA_DIR") {
        config.data_dir = PathBuf::from(dir);
    }
    if let Some(seed) = lookup("DYNAPROOF_SEED") {
        let seed = seed
            .trim()
            .parse::<u64>()
            .with_context(|| format!("DYNAPROOF_SEED is not a number: {seed}"))?;
        config.seed = Some(seed);
    }
    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("dynaproof"))
}

/// Open the file-backed profile store and event log under `data_dir`.
pub fn open_stores(config: &DynaproofConfig) -> Result<(Arc<dyn ProfileStore>, Arc<dyn EventLog>)> {
    std::fs::create_dir_all(&config.data_dir).with_context(|| {
        format!(
            "failed to create data directory: {}",
            config.data_dir.display()
        )
    })?;

    let store: Arc<dyn ProfileStore> = Arc::new(JsonProfileStore::new(config.profile_path()));
    let events: Arc<dyn EventLog> = Arc::new(JsonlEventLog::new(config.event_log_path()));
    Ok((store, events))
}
