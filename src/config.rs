//! Runtime configuration
//!
//! Built-in defaults, optionally overlaid by a TOML file
//! (`~/.spotscout/config.toml` unless a path is given), then by CLI flags.

use crate::types::{Result, SpotScoutError};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Public AWS region catalog
pub const DEFAULT_CATALOG_URL: &str =
    "https://b0.p.awsstatic.com/locations/1.0/aws/current/locations.json";

/// Spot pricing provider
pub const DEFAULT_PRICING_URL: &str = "https://ec2.shop";

/// Catalog `type` value of a standard region
pub const DEFAULT_REGION_TYPE: &str = "AWS Region";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub catalog_url: String,
    pub pricing_url: String,
    /// Catalog descriptors with any other `type` (local zones, wavelength
    /// zones, GovCloud) are skipped
    pub region_type: String,
    /// A deal must discount strictly more than this
    pub min_discount_pct: i64,
    pub min_vcpus: u32,
    pub max_vcpus: u32,
    pub top_n: usize,
    pub request_timeout_secs: u64,
    pub listen_addr: String,
    pub static_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_url: DEFAULT_CATALOG_URL.to_string(),
            pricing_url: DEFAULT_PRICING_URL.to_string(),
            region_type: DEFAULT_REGION_TYPE.to_string(),
            min_discount_pct: 50,
            min_vcpus: 4,
            max_vcpus: 32,
            top_n: 5,
            request_timeout_secs: 10,
            listen_addr: "0.0.0.0:8080".to_string(),
            static_dir: None,
        }
    }
}

impl Config {
    /// Load from an explicit file, or from the default location if it exists
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };
        config.validate()?;
        Ok(config)
    }

    /// Default config path (~/.spotscout/config.toml)
    pub fn default_path() -> Option<PathBuf> {
        let home = directories::UserDirs::new()?.home_dir().to_path_buf();
        Some(home.join(".spotscout").join("config.toml"))
    }

    fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| SpotScoutError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn validate(&self) -> Result<()> {
        if self.min_vcpus == 0 {
            return Err(SpotScoutError::Config("min_vcpus must be at least 1".into()));
        }
        if self.min_vcpus > self.max_vcpus {
            return Err(SpotScoutError::Config(format!(
                "min_vcpus ({}) exceeds max_vcpus ({})",
                self.min_vcpus, self.max_vcpus
            )));
        }
        if self.top_n == 0 {
            return Err(SpotScoutError::Config("top_n must be at least 1".into()));
        }
        if self.request_timeout_secs == 0 {
            return Err(SpotScoutError::Config(
                "request_timeout_secs must be at least 1".into(),
            ));
        }
        if !(0..=100).contains(&self.min_discount_pct) {
            return Err(SpotScoutError::Config(format!(
                "min_discount_pct must be within 0..=100, got {}",
                self.min_discount_pct
            )));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
