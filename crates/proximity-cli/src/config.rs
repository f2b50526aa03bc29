//! CLI configuration
//!
//! Loaded from `{config_dir}/proximity/config.toml`. Every field has a
//! default, so a partial file (or no file) is fine.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use proximity_core::limits::validate_level;
use proximity_core::{ExpansionConfig, RateLimit};
use proximity_provider::{RetryPolicy, SemanticScholarConfig, DEFAULT_BASE_URL};

/// Default config file location
pub fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("proximity")
        .join("config.toml")
}

/// Default directory for circle, summary and graph files
pub fn default_output_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("proximity")
}

/// Where circles and graphs are stored
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// One pretty-printed JSON file per seeker and level
    #[default]
    Json,
    /// Single redb database file
    Redb,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProximityConfig {
    pub provider: ProviderSection,
    pub expansion: ExpansionSection,
    pub output: OutputSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSection {
    pub base_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub retry_base_delay_ms: u64,
}

impl Default for ProviderSection {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            timeout_secs: 30,
            max_retries: 3,
            retry_base_delay_ms: 500,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpansionSection {
    pub batch_size: usize,
    pub max_workers: usize,
    /// Seconds paused after each burst
    pub min_interval_secs: f64,
    /// Requests per pause; unset means one pause per batch
    #[serde(skip_serializing_if = "Option::is_none")]
    pub burst: Option<usize>,
    /// Documented provider limit; when set, replaces `min_interval_secs`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requests_per_second: Option<f64>,
    /// Deepest circle built by `circles`
    pub levels: u32,
}

impl Default for ExpansionSection {
    fn default() -> Self {
        Self {
            batch_size: 10,
            max_workers: 4,
            min_interval_secs: 5.0,
            burst: None,
            requests_per_second: None,
            levels: 2,
        }
    }
}

impl ExpansionSection {
    pub fn rate_limit(&self) -> anyhow::Result<RateLimit> {
        if let Some(rate) = self.requests_per_second {
            return RateLimit::per_second(rate, self.burst.unwrap_or(1))
                .with_context(|| format!("Invalid requests_per_second: {}", rate));
        }
        let interval = Duration::try_from_secs_f64(self.min_interval_secs).with_context(|| {
            format!("Invalid min_interval_secs: {}", self.min_interval_secs)
        })?;
        let mut limit = RateLimit::default().with_interval(interval);
        if let Some(burst) = self.burst {
            limit = limit.with_burst(burst);
        }
        Ok(limit)
    }

    /// Validated expansion settings
    pub fn to_expansion_config(&self) -> anyhow::Result<ExpansionConfig> {
        validate_level(self.levels)?;
        let config = ExpansionConfig::default()
            .with_batch_size(self.batch_size)
            .with_max_workers(self.max_workers)
            .with_rate_limit(self.rate_limit()?);
        config.validate()?;
        Ok(config)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
    pub backend: Backend,
}

impl ProximityConfig {
    /// Load from `path`; a missing file yields defaults
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            tracing::debug!("No config file at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        tracing::debug!("Loaded config from {:?}", path);
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_toml()?)
            .with_context(|| format!("Failed to write config file {}", path.display()))?;
        Ok(())
    }

    pub fn to_toml(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Copy safe to print: the api key is masked
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        if config.provider.api_key.is_some() {
            config.provider.api_key = Some("********".to_string());
        }
        config
    }

    pub fn provider_config(&self) -> SemanticScholarConfig {
        let provider = &self.provider;
        SemanticScholarConfig {
            base_url: provider.base_url.clone(),
            api_key: provider.api_key.clone().filter(|k| !k.is_empty()),
            timeout: Duration::from_secs(provider.timeout_secs),
            retry: RetryPolicy {
                max_attempts: provider.max_retries.max(1),
                base_delay: Duration::from_millis(provider.retry_base_delay_ms),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = ProximityConfig::load(&dir.path().join("none.toml")).unwrap();
        assert_eq!(config, ProximityConfig::default());
        assert_eq!(config.expansion.levels, 2);
        assert_eq!(config.output.backend, Backend::Json);
    }

    #[test]
    fn test_partial_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[expansion]\nbatch_size = 25\nburst = 5\n\n[output]\nbackend = \"redb\"\n",
        )
        .unwrap();

        let config = ProximityConfig::load(&path).unwrap();
        assert_eq!(config.expansion.batch_size, 25);
        assert_eq!(config.expansion.max_workers, 4);
        assert_eq!(config.expansion.burst, Some(5));
        assert_eq!(config.output.backend, Backend::Redb);
        assert_eq!(config.provider.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = ProximityConfig::default();
        config.provider.api_key = Some("secret".to_string());
        config.output.dir = Some(dir.path().join("out"));
        config.save(&path).unwrap();

        assert_eq!(ProximityConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_invalid_toml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[expansion\nbatch_size = ").unwrap();
        assert!(ProximityConfig::load(&path).is_err());
    }

    #[test]
    fn test_expansion_config() {
        let section = ExpansionSection {
            min_interval_secs: 1.5,
            burst: Some(2),
            ..Default::default()
        };
        let config = section.to_expansion_config().unwrap();
        assert_eq!(config.batch_size, 10);
        assert_eq!(config.rate_limit.min_interval, Duration::from_millis(1500));
        assert_eq!(config.rate_limit.burst, Some(2));

        let bad = ExpansionSection {
            batch_size: 0,
            ..Default::default()
        };
        assert!(bad.to_expansion_config().is_err());

        let deep = ExpansionSection {
            levels: 9,
            ..Default::default()
        };
        assert!(deep.to_expansion_config().is_err());

        let negative = ExpansionSection {
            min_interval_secs: -1.0,
            ..Default::default()
        };
        assert!(negative.rate_limit().is_err());
    }

    #[test]
    fn test_requests_per_second() {
        let section = ExpansionSection {
            requests_per_second: Some(2.0),
            min_interval_secs: 30.0,
            ..Default::default()
        };
        let limit = section.rate_limit().unwrap();
        assert_eq!(limit.min_interval, Duration::from_millis(500));
        assert_eq!(limit.burst, Some(1));

        let burst = ExpansionSection {
            requests_per_second: Some(2.0),
            burst: Some(4),
            ..Default::default()
        };
        assert_eq!(
            burst.rate_limit().unwrap().min_interval,
            Duration::from_secs(2)
        );

        for rate in [0.0, -1.0, 1e-300] {
            let bad = ExpansionSection {
                requests_per_second: Some(rate),
                ..Default::default()
            };
            assert!(bad.to_expansion_config().is_err(), "rate {}", rate);
        }
    }

    #[test]
    fn test_provider_config() {
        let mut config = ProximityConfig::default();
        config.provider.max_retries = 0;
        config.provider.api_key = Some(String::new());

        let provider = config.provider_config();
        assert_eq!(provider.retry.max_attempts, 1);
        assert!(provider.api_key.is_none());
        assert_eq!(provider.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_redacted() {
        let mut config = ProximityConfig::default();
        config.provider.api_key = Some("secret".to_string());
        let shown = config.redacted().to_toml().unwrap();
        assert!(!shown.contains("secret"));
    }
}
