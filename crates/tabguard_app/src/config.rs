//! Host configuration, read from a RON file.
//!
//! Every field is optional; anything missing falls back to the defaults
//! below, and a missing file is the same as an empty one.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::LevelFilter;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use tabguard_core::{KnownSafeList, KnownSafeRule, TextPolicy, WatcherSettings};
use tabguard_engine::{ClassifierSettings, DEFAULT_ENDPOINT};

pub const DEFAULT_CONFIG_PATH: &str = "tabguard.ron";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path:?}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnownSafeRuleConfig {
    pub host: String,
    pub path_prefix: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextPolicyConfig {
    pub negation_tokens: Vec<String>,
    pub hedging_phrases: Vec<String>,
    pub min_length: usize,
    pub contradiction_floor: f64,
    pub weak_text_floor: f64,
}

impl Default for TextPolicyConfig {
    fn default() -> Self {
        let policy = TextPolicy::default();
        Self {
            negation_tokens: policy.negation_tokens,
            hedging_phrases: policy.hedging_phrases,
            min_length: policy.min_length,
            contradiction_floor: policy.contradiction_floor,
            weak_text_floor: policy.weak_text_floor,
        }
    }
}

impl From<TextPolicyConfig> for TextPolicy {
    fn from(config: TextPolicyConfig) -> Self {
        Self {
            negation_tokens: config.negation_tokens,
            hedging_phrases: config.hedging_phrases,
            min_length: config.min_length,
            contradiction_floor: config.contradiction_floor,
            weak_text_floor: config.weak_text_floor,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    pub endpoint: String,
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
    pub state_dir: PathBuf,
    pub known_safe: Vec<KnownSafeRuleConfig>,
    pub text_policy: TextPolicyConfig,
    pub log_level: String,
    pub log_file: Option<PathBuf>,
}

impl Default for HostConfig {
    fn default() -> Self {
        let classifier = ClassifierSettings::default();
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            connect_timeout_ms: duration_ms(classifier.connect_timeout),
            request_timeout_ms: duration_ms(classifier.request_timeout),
            state_dir: PathBuf::from("tabguard_state"),
            known_safe: KnownSafeList::default()
                .rules()
                .iter()
                .map(|rule| KnownSafeRuleConfig {
                    host: rule.host.clone(),
                    path_prefix: rule.path_prefix.clone(),
                })
                .collect(),
            text_policy: TextPolicyConfig::default(),
            log_level: "info".to_string(),
            log_file: None,
        }
    }
}

impl HostConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        ron::from_str(&content).map_err(|err| ConfigError::Parse {
            path: path.to_path_buf(),
            message: err.to_string(),
        })
    }

    pub fn classifier_settings(&self) -> ClassifierSettings {
        ClassifierSettings {
            endpoint: self.endpoint.clone(),
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
            request_timeout: Duration::from_millis(self.request_timeout_ms),
        }
    }

    pub fn watcher_settings(&self) -> WatcherSettings {
        WatcherSettings {
            known_safe: KnownSafeList::new(
                self.known_safe
                    .iter()
                    .map(|rule| KnownSafeRule::new(rule.host.clone(), rule.path_prefix.clone()))
                    .collect(),
            ),
            text_policy: self.text_policy.clone().into(),
        }
    }

    /// Configured level, or `Info` when the name is not recognised.
    pub fn log_level(&self) -> LevelFilter {
        guard_logging::parse_level(&self.log_level).unwrap_or(LevelFilter::Info)
    }
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
