use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::constants::{
    CDN_BASE, CONFIG_FILE_NAME, DEFAULT_ASSETS_DEST, DEFAULT_ASSETS_DIR, DEFAULT_CONCURRENCY, DEFAULT_DEST_DIR, DEFAULT_EXCLUDED,
    DEFAULT_FETCH_TIMEOUT_SECS, DEFAULT_REMAP, DEFAULT_SRC_DIR, DEFAULT_VALIDATOR, ELEMENT_PREFIX,
    PLACEHOLDER,
};
use crate::error::{InjectError, Result};

/// How the set of required scripts is determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Scan the document's tags and attributes.
    #[default]
    Static,
    /// Ask the validator what is missing and copy the tags from the docs.
    Scrape,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub placeholder: String,
    pub cdn_base: String,
    pub prefix: String,
    pub strategy: Strategy,
    pub excluded: Vec<String>,
    pub remap: BTreeMap<String, String>,
    pub build: BuildConfig,
    pub scrape: ScrapeConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    pub src: PathBuf,
    pub dest: PathBuf,
    pub concurrency: usize,
    /// Static files copied verbatim into `dest/assets_dest`. Skipped when absent.
    pub assets: PathBuf,
    pub assets_dest: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScrapeConfig {
    pub validator: String,
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            placeholder: PLACEHOLDER.to_string(),
            cdn_base: CDN_BASE.to_string(),
            prefix: ELEMENT_PREFIX.to_string(),
            strategy: Strategy::default(),
            excluded: DEFAULT_EXCLUDED.iter().map(|s| s.to_string()).collect(),
            remap: DEFAULT_REMAP
                .iter()
                .map(|(from, to)| (from.to_string(), to.to_string()))
                .collect(),
            build: BuildConfig::default(),
            scrape: ScrapeConfig::default(),
        }
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            src: PathBuf::from(DEFAULT_SRC_DIR),
            dest: PathBuf::from(DEFAULT_DEST_DIR),
            concurrency: DEFAULT_CONCURRENCY,
            assets: PathBuf::from(DEFAULT_ASSETS_DIR),
            assets_dest: PathBuf::from(DEFAULT_ASSETS_DEST),
        }
    }
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            validator: DEFAULT_VALIDATOR.to_string(),
            timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
        }
    }
}

impl ScrapeConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    pub fn from_toml(text: &str, path: &Path) -> Result<Self> {
        let config: Config = toml::from_str(text).map_err(|e| InjectError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        config.check(path)?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| InjectError::io(path, e))?;
        Self::from_toml(&text, path)
    }

    /// Loads `explicit` when given, otherwise `amp-inject.toml` in `dir`
    /// if present, otherwise the built-in defaults.
    pub fn discover(explicit: Option<&Path>, dir: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let candidate = dir.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            debug!("Using config file {}", candidate.display());
            Self::load(&candidate)
        } else {
            debug!("No {} found, using defaults", CONFIG_FILE_NAME);
            Ok(Self::default())
        }
    }

    fn check(&self, path: &Path) -> Result<()> {
        let invalid = |reason: &str| InjectError::Config {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        };
        if self.placeholder.is_empty() {
            return Err(invalid("placeholder must not be empty"));
        }
        if self.prefix.is_empty() {
            return Err(invalid("prefix must not be empty"));
        }
        if self.build.concurrency == 0 {
            return Err(invalid("build.concurrency must be at least 1"));
        }
        if self.scrape.timeout_secs == 0 {
            return Err(invalid("scrape.timeout_secs must be at least 1"));
        }
        Ok(())
    }

    pub fn rules(&self) -> Rules {
        Rules::new(
            &self.prefix,
            self.excluded.iter().cloned(),
            self.remap.iter().map(|(k, v)| (k.clone(), v.clone())),
        )
    }
}

/// Exclusion list, remap table and recognised prefix. Immutable once built.
#[derive(Debug, Clone)]
pub struct Rules {
    prefix: String,
    excluded: BTreeSet<String>,
    remap: BTreeMap<String, String>,
}

impl Default for Rules {
    fn default() -> Self {
        Config::default().rules()
    }
}

impl Rules {
    pub fn new(
        prefix: &str,
        excluded: impl IntoIterator<Item = String>,
        remap: impl IntoIterator<Item = (String, String)>,
    ) -> Self {
        Self {
            prefix: prefix.to_ascii_lowercase(),
            excluded: excluded.into_iter().map(|s| s.to_ascii_lowercase()).collect(),
            remap: remap
                .into_iter()
                .map(|(k, v)| (k.to_ascii_lowercase(), v.to_ascii_lowercase()))
                .collect(),
        }
    }

    /// Maps a tag name to the identifier whose script it needs, or `None`
    /// when the tag needs no script of its own.
    pub fn canonical(&self, tag: &str) -> Option<String> {
        let tag = tag.to_ascii_lowercase();
        if !tag.starts_with(&self.prefix) || self.excluded.contains(&tag) {
            return None;
        }
        Some(self.remap.get(&tag).cloned().unwrap_or(tag))
    }
}
