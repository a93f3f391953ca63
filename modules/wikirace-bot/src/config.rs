//! Run configuration.
//!
//! Layers, lowest to highest: built-in defaults, an optional TOML file,
//! `WIKIRACE_*` environment variables, then whatever the CLI overrides on
//! top. Nothing is validated until every layer has been applied.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;
use tracing::info;

use crate::error::{BotError, Result};
use crate::perturbation::DEFAULT_VARIANCE_FRACTION;
use crate::similarity::{LexicalOntology, Taxonomy};

pub const DEFAULT_TURN_BUDGET: u32 = 50;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Knobs of the navigation engine itself.
#[derive(Debug, Clone, PartialEq)]
pub struct NavConfig {
    pub turn_budget: u32,
    pub variance_fraction: f64,
    pub memory_enabled: bool,
    /// Fixed seed for replayable runs; `None` seeds from system entropy.
    pub seed: Option<u64>,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            turn_budget: DEFAULT_TURN_BUDGET,
            variance_fraction: DEFAULT_VARIANCE_FRACTION,
            memory_enabled: true,
            seed: None,
        }
    }
}

impl NavConfig {
    pub fn validate(&self) -> Result<()> {
        if self.turn_budget == 0 {
            return Err(BotError::InvalidConfig(
                "turn budget must be greater than zero".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.variance_fraction) {
            return Err(BotError::InvalidConfig(format!(
                "variance fraction {} must be within [0, 1]",
                self.variance_fraction
            )));
        }
        Ok(())
    }
}

/// Where word-sense similarity comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OntologySource {
    Builtin,
    File(PathBuf),
    /// Score by edit similarity only.
    Disabled,
}

impl OntologySource {
    /// `builtin`, `none`, or a path to a taxonomy JSON file.
    pub fn from_setting(raw: &str) -> Self {
        match raw.trim() {
            "builtin" => OntologySource::Builtin,
            "none" | "off" | "" => OntologySource::Disabled,
            path => OntologySource::File(PathBuf::from(path)),
        }
    }
}

impl FromStr for OntologySource {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::from_setting(s))
    }
}

impl std::fmt::Display for OntologySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OntologySource::Builtin => f.write_str("builtin"),
            OntologySource::File(path) => write!(f, "{}", path.display()),
            OntologySource::Disabled => f.write_str("none"),
        }
    }
}

impl OntologySource {
    pub fn load(&self) -> Result<Option<Arc<dyn LexicalOntology>>> {
        let ontology: Arc<dyn LexicalOntology> = match self {
            OntologySource::Builtin => Arc::new(Taxonomy::builtin()?),
            OntologySource::File(path) => Arc::new(Taxonomy::load(path)?),
            OntologySource::Disabled => return Ok(None),
        };
        Ok(Some(ontology))
    }
}

/// Everything the binary needs to play a game.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub nav: NavConfig,
    pub wiki_base_url: String,
    pub user_agent: String,
    pub request_timeout_secs: u64,
    pub max_link_length: usize,
    pub taxonomy: OntologySource,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            nav: NavConfig::default(),
            wiki_base_url: wikirace_pages::DEFAULT_BASE_URL.to_string(),
            user_agent: wikirace_pages::DEFAULT_USER_AGENT.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_link_length: wikirace_pages::DEFAULT_MAX_LINK_LENGTH,
            taxonomy: OntologySource::Disabled,
        }
    }
}

/// TOML file shape. Every field is optional; absent fields keep lower layers.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub navigation: NavigationSection,
    #[serde(default)]
    pub wiki: WikiSection,
    pub taxonomy: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NavigationSection {
    pub turns: Option<u32>,
    pub variance: Option<f64>,
    pub memory: Option<bool>,
    pub seed: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WikiSection {
    pub base_url: Option<String>,
    pub user_agent: Option<String>,
    pub timeout_secs: Option<u64>,
    pub max_link_length: Option<usize>,
}

/// Load and parse a TOML config file.
pub fn load_file_config(path: &Path) -> anyhow::Result<FileConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config: FileConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
    Ok(config)
}

impl AppConfig {
    /// Defaults, then `file` (if any), then the process environment.
    /// The caller validates once its own overrides are in.
    pub fn load(file: Option<&Path>) -> anyhow::Result<Self> {
        Self::load_with(file, |key| std::env::var(key).ok())
    }

    pub fn load_with<F>(file: Option<&Path>, lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(path) = file {
            config.apply_file(load_file_config(path)?);
        }
        config.apply_env(lookup)?;
        Ok(config)
    }

    pub fn apply_file(&mut self, file: FileConfig) {
        let nav = file.navigation;
        if let Some(turns) = nav.turns {
            self.nav.turn_budget = turns;
        }
        if let Some(variance) = nav.variance {
            self.nav.variance_fraction = variance;
        }
        if let Some(memory) = nav.memory {
            self.nav.memory_enabled = memory;
        }
        if nav.seed.is_some() {
            self.nav.seed = nav.seed;
        }

        let wiki = file.wiki;
        if let Some(base_url) = wiki.base_url {
            self.wiki_base_url = base_url;
        }
        if let Some(user_agent) = wiki.user_agent {
            self.user_agent = user_agent;
        }
        if let Some(timeout) = wiki.timeout_secs {
            self.request_timeout_secs = timeout;
        }
        if let Some(max) = wiki.max_link_length {
            self.max_link_length = max;
        }

        if let Some(taxonomy) = file.taxonomy {
            self.taxonomy = OntologySource::from_setting(&taxonomy);
        }
    }

    /// Apply `WIKIRACE_*` variables read through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("WIKIRACE_TURNS") {
            self.nav.turn_budget = parse_var("WIKIRACE_TURNS", &v)?;
        }
        if let Some(v) = lookup("WIKIRACE_VARIANCE") {
            self.nav.variance_fraction = parse_var("WIKIRACE_VARIANCE", &v)?;
        }
        if let Some(v) = lookup("WIKIRACE_MEMORY") {
            self.nav.memory_enabled = parse_flag("WIKIRACE_MEMORY", &v)?;
        }
        if let Some(v) = lookup("WIKIRACE_SEED") {
            self.nav.seed = Some(parse_var("WIKIRACE_SEED", &v)?);
        }
        if let Some(v) = lookup("WIKIRACE_BASE_URL") {
            self.wiki_base_url = v;
        }
        if let Some(v) = lookup("WIKIRACE_USER_AGENT") {
            self.user_agent = v;
        }
        if let Some(v) = lookup("WIKIRACE_TIMEOUT_SECS") {
            self.request_timeout_secs = parse_var("WIKIRACE_TIMEOUT_SECS", &v)?;
        }
        if let Some(v) = lookup("WIKIRACE_MAX_LINK_LENGTH") {
            self.max_link_length = parse_var("WIKIRACE_MAX_LINK_LENGTH", &v)?;
        }
        if let Some(v) = lookup("WIKIRACE_TAXONOMY") {
            self.taxonomy = OntologySource::from_setting(&v);
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        self.nav.validate()?;
        if self.wiki_base_url.trim().is_empty() {
            return Err(BotError::InvalidConfig("wiki base URL must not be empty".into()));
        }
        if self.request_timeout_secs == 0 {
            return Err(BotError::InvalidConfig(
                "request timeout must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn log_effective(&self) {
        info!(
            turn_budget = self.nav.turn_budget,
            variance_fraction = self.nav.variance_fraction,
            memory_enabled = self.nav.memory_enabled,
            seed = ?self.nav.seed,
            base_url = self.wiki_base_url.as_str(),
            timeout_secs = self.request_timeout_secs,
            max_link_length = self.max_link_length,
            taxonomy = %self.taxonomy,
            "Config loaded"
        );
    }
}

fn parse_var<T: FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| BotError::InvalidConfig(format!("{key} has invalid value '{raw}'")))
}

fn parse_flag(key: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(BotError::InvalidConfig(format!(
            "{key} has invalid value '{raw}' (expected true or false)"
        ))),
    }
}
