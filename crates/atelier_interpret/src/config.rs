//! Interpreter configuration and settings providers.
//!
//! Tunables reach the interpreter through an explicit [`InterpreterConfig`].
//! Where they come from is the caller's business: a [`SettingsProvider`]
//! (YAML file with a TTL cache, or an in-memory map) is the usual source.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::consensus::Strategy;
use crate::error::{LlmError, LlmResult};

/// Default per-call timeout for generative backends.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default number of concurrent consensus workers.
pub const DEFAULT_MAX_WORKERS: usize = 4;

/// Settings keys read by [`InterpreterConfig::from_settings`].
pub const CONFIG_KEYS: &[&str] = &[
    "provider",
    "baseUrl",
    "apiKey",
    "model",
    "models",
    "strategy",
    "timeoutSecs",
    "maxWorkers",
    "priority",
];

/// Text-generation backend flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// Pattern matching only
    #[default]
    None,
    Ollama,
    #[serde(rename = "openai")]
    OpenAi,
}

impl Provider {
    pub fn default_base_url(&self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Ollama => Some("http://localhost:11434"),
            Self::OpenAi => Some("https://api.openai.com"),
        }
    }
}

impl FromStr for Provider {
    type Err = LlmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "none" | "off" => Ok(Self::None),
            "ollama" => Ok(Self::Ollama),
            "openai" | "open-ai" => Ok(Self::OpenAi),
            other => Err(LlmError::Config(format!("unknown provider '{}'", other))),
        }
    }
}

/// Everything the interpretation engine needs to know at call time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InterpreterConfig {
    pub provider: Provider,
    /// Backend base URL; the provider default when absent
    pub base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Model for single-model interpretation
    pub model: Option<String>,
    /// Models queried together; more than one enables consensus
    pub models: Vec<String>,
    pub strategy: Strategy,
    pub timeout_secs: u64,
    pub max_workers: usize,
    /// Preference order for the `best` strategy and tie breaks
    pub priority: Vec<String>,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            provider: Provider::None,
            base_url: None,
            api_key: None,
            model: None,
            models: Vec::new(),
            strategy: Strategy::Consensus,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_workers: DEFAULT_MAX_WORKERS,
            priority: Vec::new(),
        }
    }
}

impl InterpreterConfig {
    /// Pattern matching only.
    pub fn pattern_only() -> Self {
        Self::default()
    }

    /// Build from a settings provider; missing keys take defaults.
    pub fn from_settings(settings: &dyn SettingsProvider) -> LlmResult<Self> {
        let mut object = Map::new();
        for key in CONFIG_KEYS {
            if let Some(value) = settings.get(key) {
                object.insert(key.to_string(), value);
            }
        }
        let config: Self = serde_json::from_value(Value::Object(object))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> LlmResult<()> {
        if self.timeout_secs == 0 {
            return Err(LlmError::Config("timeoutSecs must be positive".to_string()));
        }
        if self.max_workers == 0 {
            return Err(LlmError::Config("maxWorkers must be positive".to_string()));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn base_url(&self) -> Option<String> {
        self.base_url
            .clone()
            .or_else(|| self.provider.default_base_url().map(str::to_string))
            .map(|url| url.trim_end_matches('/').to_string())
    }

    /// Whether a generative backend should be consulted at all.
    pub fn is_generative(&self) -> bool {
        self.provider != Provider::None && (self.model.is_some() || !self.models.is_empty())
    }

    /// Models for a multi-model query; consensus applies only with two or more.
    pub fn consensus_models(&self) -> Option<&[String]> {
        (self.models.len() > 1).then_some(self.models.as_slice())
    }

    /// Model for a single-model query.
    pub fn primary_model(&self) -> Option<&str> {
        self.model
            .as_deref()
            .or_else(|| self.models.first().map(String::as_str))
    }
}

/// Source of configuration values.
#[cfg_attr(test, mockall::automock)]
pub trait SettingsProvider: Send + Sync {
    /// Reload from the backing store.
    fn refresh(&self) -> LlmResult<()>;

    /// Current value for `key`.
    fn get(&self, key: &str) -> Option<Value>;
}

/// In-memory settings.
#[derive(Debug, Default)]
pub struct MapSettings {
    values: RwLock<HashMap<String, Value>>,
}

impl MapSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.write().insert(key.into(), value.into());
    }
}

impl SettingsProvider for MapSettings {
    fn refresh(&self) -> LlmResult<()> {
        Ok(())
    }

    fn get(&self, key: &str) -> Option<Value> {
        self.values.read().get(key).cloned()
    }
}

struct CachedSettings {
    values: Map<String, Value>,
    loaded_at: Instant,
}

/// YAML settings file, re-read at most once per TTL.
pub struct FileSettings {
    path: PathBuf,
    ttl: Duration,
    cache: RwLock<Option<CachedSettings>>,
}

impl FileSettings {
    /// Default cache lifetime.
    pub const DEFAULT_TTL: Duration = Duration::from_secs(60);

    /// Open and load a settings file.
    pub fn open(path: impl AsRef<Path>) -> LlmResult<Self> {
        let settings = Self {
            path: path.as_ref().to_path_buf(),
            ttl: Self::DEFAULT_TTL,
            cache: RwLock::new(None),
        };
        settings.refresh()?;
        Ok(settings)
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> LlmResult<Map<String, Value>> {
        let content = std::fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Map::new());
        }
        match serde_yaml::from_str::<Value>(&content)? {
            Value::Object(map) => Ok(map),
            Value::Null => Ok(Map::new()),
            _ => Err(LlmError::Config(format!(
                "{} must contain a mapping",
                self.path.display()
            ))),
        }
    }

    fn is_stale(&self) -> bool {
        self.cache
            .read()
            .as_ref()
            .map_or(true, |c| c.loaded_at.elapsed() >= self.ttl)
    }
}

impl SettingsProvider for FileSettings {
    fn refresh(&self) -> LlmResult<()> {
        let values = self.load()?;
        debug!("Loaded {} settings from {}", values.len(), self.path.display());
        *self.cache.write() = Some(CachedSettings {
            values,
            loaded_at: Instant::now(),
        });
        Ok(())
    }

    fn get(&self, key: &str) -> Option<Value> {
        if self.is_stale() {
            // Keep serving the previous values when the file went bad.
            if let Err(e) = self.refresh() {
                warn!("Failed to reload {}: {}", self.path.display(), e);
            }
        }
        self.cache
            .read()
            .as_ref()
            .and_then(|c| c.values.get(key).cloned())
    }
}
