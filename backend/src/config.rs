//! Service configuration.
//!
//! Settings come from a TOML file (`cycle.toml`) with environment variables
//! layered on top:
//!
//! ```toml
//! [repository]
//! type = "file"
//! path = "data/peak_windows.jsonl"
//!
//! [registry]
//! empty_on_load_failure = false
//!
//! [demand]
//! strategy = "linear"      # or "regression"
//! peak_multiplier = 1.5
//!
//! [server]
//! host = "0.0.0.0"
//! port = 8080
//! ```
//!
//! # Environment Variables
//!
//! - `REPOSITORY_TYPE`: `local` | `file`
//! - `PEAK_WINDOWS_PATH`: backing file for the `file` repository
//! - `EMPTY_ON_LOAD_FAILURE`: `true` to start empty if the store is unreadable
//! - `PEAK_MULTIPLIER`: peak weight for the linear demand strategy
//! - `HOST`, `PORT`: bind address

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::db::RepositorySettings;
use crate::services::{
    CycleAllocator, DemandEstimator, LinearDemand, RegistryOptions, RegressionDemand,
    PEAK_MULTIPLIER,
};

/// Errors raised while loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("{key} has invalid value '{value}'")]
    InvalidEnv { key: &'static str, value: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Complete service configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub repository: RepositorySettings,
    #[serde(default)]
    pub registry: RegistrySettings,
    #[serde(default)]
    pub demand: DemandSettings,
    #[serde(default)]
    pub server: ServerSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegistrySettings {
    #[serde(default)]
    pub empty_on_load_failure: bool,
}

/// Demand estimation strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DemandStrategy {
    #[default]
    Linear,
    Regression,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandSettings {
    #[serde(default)]
    pub strategy: DemandStrategy,
    #[serde(default = "default_peak_multiplier")]
    pub peak_multiplier: f64,
    /// Regression intercept.
    #[serde(default)]
    pub intercept: f64,
    /// Regression weights for `[quantity, rate, peak, total_cycle_time]`.
    #[serde(default)]
    pub coefficients: [f64; 4],
}

fn default_peak_multiplier() -> f64 {
    PEAK_MULTIPLIER
}

impl Default for DemandSettings {
    fn default() -> Self {
        Self {
            strategy: DemandStrategy::Linear,
            peak_multiplier: PEAK_MULTIPLIER,
            intercept: 0.0,
            coefficients: [0.0; 4],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|source| ConfigError::Read {
            path: path.as_ref().to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Search for `cycle.toml` in the current directory, `backend/` and the
    /// parent directory.
    pub fn find_default_file() -> Option<PathBuf> {
        [
            PathBuf::from("cycle.toml"),
            PathBuf::from("backend/cycle.toml"),
            PathBuf::from("../cycle.toml"),
        ]
        .into_iter()
        .find(|p| p.exists())
    }

    /// Load from `CYCLE_CONFIG`, else the default location, else built-in
    /// defaults; then apply environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let base = match env::var("CYCLE_CONFIG").ok().map(PathBuf::from) {
            Some(path) => Self::from_file(path)?,
            None => match Self::find_default_file() {
                Some(path) => Self::from_file(path)?,
                None => Self::default(),
            },
        };
        base.with_env_overrides()
    }

    /// Apply environment variable overrides on top of this configuration.
    pub fn with_env_overrides(mut self) -> Result<Self, ConfigError> {
        if let Ok(repo_type) = env::var("REPOSITORY_TYPE") {
            self.repository.repo_type = repo_type;
        }
        if let Ok(path) = env::var("PEAK_WINDOWS_PATH") {
            if env::var("REPOSITORY_TYPE").is_err() {
                self.repository.repo_type = "file".to_string();
            }
            self.repository.path = Some(PathBuf::from(path));
        }
        if let Ok(flag) = env::var("EMPTY_ON_LOAD_FAILURE") {
            self.registry.empty_on_load_failure = parse_env("EMPTY_ON_LOAD_FAILURE", &flag)?;
        }
        if let Ok(multiplier) = env::var("PEAK_MULTIPLIER") {
            self.demand.peak_multiplier = parse_env("PEAK_MULTIPLIER", &multiplier)?;
        }
        if let Ok(host) = env::var("HOST") {
            self.server.host = host;
        }
        if let Ok(port) = env::var("PORT") {
            self.server.port = parse_env("PORT", &port)?;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.repository.repository_type().map_err(|e| {
            ConfigError::Invalid(format!("Invalid repository type: {}", e))
        })?;
        let demand = &self.demand;
        let m = demand.peak_multiplier;
        if !m.is_finite() || m < 1.0 {
            return Err(ConfigError::Invalid(format!(
                "peak_multiplier must be a finite number >= 1.0, got {}",
                m
            )));
        }
        if demand.strategy == DemandStrategy::Regression {
            if !(demand.intercept.is_finite() && demand.coefficients.iter().all(|c| c.is_finite()))
            {
                return Err(ConfigError::Invalid(
                    "Regression intercept and coefficients must be finite".to_string(),
                ));
            }
            // All-zero weights with a non-positive intercept clamp every demand to 0.
            if demand.coefficients.iter().all(|c| *c == 0.0) && demand.intercept <= 0.0 {
                return Err(ConfigError::Invalid(
                    "Regression demand needs a non-zero coefficient or a positive intercept"
                        .to_string(),
                ));
            }
        }
        Ok(())
    }

    pub fn registry_options(&self) -> RegistryOptions {
        RegistryOptions {
            empty_on_load_failure: self.registry.empty_on_load_failure,
        }
    }

    pub fn demand_estimator(&self) -> Arc<dyn DemandEstimator> {
        match self.demand.strategy {
            DemandStrategy::Linear => Arc::new(LinearDemand::new(self.demand.peak_multiplier)),
            DemandStrategy::Regression => Arc::new(RegressionDemand::new(
                self.demand.intercept,
                self.demand.coefficients,
            )),
        }
    }

    pub fn allocator(&self) -> CycleAllocator {
        CycleAllocator::with_estimator(self.demand_estimator())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn parse_env<T: std::str::FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidEnv {
        key,
        value: raw.to_string(),
    })
}
