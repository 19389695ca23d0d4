//! Configuration management for the site-search service.
//!
//! This module handles loading configuration from TOML files and
//! environment variables, with sensible defaults for all settings.

use crate::core::error::{Result, SiteSearchError};
use crate::core::search::Field;
use crate::core::types::ItemId;
use crate::core::xdg::XdgDirs;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub index: IndexConfig,
    #[serde(default)]
    pub languages: LanguagesConfig,
    #[serde(default)]
    pub multisite: MultisiteConfig,
    /// Sites keyed by site name
    #[serde(default)]
    pub sites: BTreeMap<String, SiteConfig>,
    /// Facets keyed by request parameter name
    #[serde(default)]
    pub facets: BTreeMap<String, FacetConfig>,
    #[serde(default)]
    pub sorting: SortingConfig,
    #[serde(default)]
    pub boosting: BoostingConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Search configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    /// Page size used when a caller does not pass one
    #[serde(default = "default_page_size")]
    pub default_page_size: i64,

    /// Optional upper bound for requested page sizes; uncapped when unset
    #[serde(default)]
    pub max_page_size: Option<usize>,

    /// Request parameter that switches a search to geolocation mode
    #[serde(default = "default_geolocation_marker")]
    pub geolocation_marker: String,

    /// Site context scope queries are built under
    #[serde(default = "default_shell_site")]
    pub shell_site: String,

    /// Field of a scope item holding its scope query
    #[serde(default = "default_scope_query_field")]
    pub scope_query_field: String,

    /// Multilist field of the settings item listing extra content roots
    #[serde(default = "default_associated_content_field")]
    pub associated_content_field: String,

    /// Multilist field of the settings item listing extra media roots
    #[serde(default = "default_associated_media_field")]
    pub associated_media_field: String,

    /// Override for the reserved character set of phrase normalization
    #[serde(default)]
    pub reserved_characters: Option<String>,
}

/// Index selection
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IndexConfig {
    /// Index used by sites without their own index
    #[serde(default = "default_index_name")]
    pub default: String,
}

/// Known content languages
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LanguagesConfig {
    #[serde(default = "default_languages")]
    pub known: Vec<String>,
}

/// Multisite structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MultisiteConfig {
    /// Site used when a request names none
    #[serde(default)]
    pub default_site: Option<String>,

    /// Name of the settings item under a site item
    #[serde(default = "default_settings_item_name")]
    pub settings_item_name: String,
}

/// One site
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SiteConfig {
    /// Home item id
    pub home: String,

    /// Index for this site; falls back to `index.default`
    #[serde(default)]
    pub index: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FacetKind {
    /// Match any of the listed values on a document field
    Value,
    /// Radius in km around the request coordinates
    Distance,
}

/// One facet definition
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FacetConfig {
    #[serde(default = "default_facet_kind")]
    pub kind: FacetKind,

    /// Document field for value facets
    #[serde(default)]
    pub field: Option<Field>,
}

/// Sorting configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SortingConfig {
    /// Sort key applied when a request has none or an unknown one
    #[serde(default = "default_sort")]
    pub default: String,
}

/// Boosting configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BoostingConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Score added per phrase term found in the document name
    #[serde(default = "default_name_weight")]
    pub name_weight: f32,

    /// Score added to documents under the context item
    #[serde(default = "default_context_weight")]
    pub context_weight: f32,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Default `EnvFilter` directive when no env filter is set
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON log lines
    #[serde(default)]
    pub json: bool,
}

// Default value functions
fn default_page_size() -> i64 {
    20
}

fn default_geolocation_marker() -> String {
    "g".to_string()
}

fn default_shell_site() -> String {
    "shell".to_string()
}

fn default_scope_query_field() -> String {
    "ScopeQuery".to_string()
}

fn default_associated_content_field() -> String {
    "AssociatedContent".to_string()
}

fn default_associated_media_field() -> String {
    "AssociatedMedia".to_string()
}

fn default_index_name() -> String {
    "web_index".to_string()
}

fn default_languages() -> Vec<String> {
    vec!["en".to_string()]
}

fn default_settings_item_name() -> String {
    "Settings".to_string()
}

fn default_facet_kind() -> FacetKind {
    FacetKind::Value
}

fn default_sort() -> String {
    "relevance".to_string()
}

fn default_true() -> bool {
    true
}

fn default_name_weight() -> f32 {
    1.0
}

fn default_context_weight() -> f32 {
    0.5
}

fn default_log_level() -> String {
    "sitesearch=warn".to_string()
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: None,
            geolocation_marker: default_geolocation_marker(),
            shell_site: default_shell_site(),
            scope_query_field: default_scope_query_field(),
            associated_content_field: default_associated_content_field(),
            associated_media_field: default_associated_media_field(),
            reserved_characters: None,
        }
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            default: default_index_name(),
        }
    }
}

impl Default for LanguagesConfig {
    fn default() -> Self {
        Self {
            known: default_languages(),
        }
    }
}

impl Default for MultisiteConfig {
    fn default() -> Self {
        Self {
            default_site: None,
            settings_item_name: default_settings_item_name(),
        }
    }
}

impl Default for SortingConfig {
    fn default() -> Self {
        Self {
            default: default_sort(),
        }
    }
}

impl Default for BoostingConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            name_weight: default_name_weight(),
            context_weight: default_context_weight(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl Config {
    /// Load configuration from TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| SiteSearchError::ConfigError(format!("Failed to read config file: {e}")))?;

        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load config with priority: env vars > TOML > defaults
    pub fn load() -> Result<Self> {
        let xdg = XdgDirs::new();
        Self::load_with_xdg(&xdg)
    }

    /// Load config with explicit XDG directories
    ///
    /// Priority order:
    /// 1. SITESEARCH_CONFIG env var
    /// 2. XDG config file (~/.config/sitesearch/config.toml)
    /// 3. ./sitesearch.toml
    /// 4. Defaults
    pub fn load_with_xdg(xdg: &XdgDirs) -> Result<Self> {
        let mut config = if let Ok(config_path) = env::var("SITESEARCH_CONFIG") {
            Self::from_file(config_path)?
        } else {
            let xdg_config = xdg.config_file();
            if xdg_config.exists() {
                Self::from_file(xdg_config)?
            } else if Path::new("sitesearch.toml").exists() {
                Self::from_file("sitesearch.toml")?
            } else {
                Self::default()
            }
        };

        config.merge_env();
        config.validate()?;

        Ok(config)
    }

    /// Merge configuration with environment variables
    pub fn merge_env(&mut self) {
        if let Ok(size) = env::var("SITESEARCH_DEFAULT_PAGE_SIZE") {
            if let Ok(s) = size.parse() {
                self.search.default_page_size = s;
            }
        }
        if let Ok(size) = env::var("SITESEARCH_MAX_PAGE_SIZE") {
            if let Ok(s) = size.parse() {
                self.search.max_page_size = Some(s);
            }
        }
        if let Ok(site) = env::var("SITESEARCH_SHELL_SITE") {
            self.search.shell_site = site;
        }
        if let Ok(index) = env::var("SITESEARCH_INDEX") {
            self.index.default = index;
        }
        if let Ok(site) = env::var("SITESEARCH_DEFAULT_SITE") {
            self.multisite.default_site = Some(site);
        }
        if let Ok(languages) = env::var("SITESEARCH_LANGUAGES") {
            self.languages.known = languages
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect();
        }
        if let Ok(json) = env::var("SITESEARCH_LOG_JSON") {
            if let Ok(j) = json.parse() {
                self.logging.json = j;
            }
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.search.max_page_size == Some(0) {
            return Err(SiteSearchError::ConfigError(
                "Max page size must be non-zero".to_string(),
            ));
        }

        if self.search.default_page_size <= 0 {
            return Err(SiteSearchError::ConfigError(
                "Default page size must be positive".to_string(),
            ));
        }

        if let Some(max) = self.search.max_page_size {
            if self.search.default_page_size as u64 > max as u64 {
                return Err(SiteSearchError::ConfigError(
                    "Default page size cannot exceed max page size".to_string(),
                ));
            }
        }

        if self.search.geolocation_marker.trim().is_empty() {
            return Err(SiteSearchError::ConfigError(
                "Geolocation marker must not be empty".to_string(),
            ));
        }

        if self.search.shell_site.trim().is_empty() {
            return Err(SiteSearchError::ConfigError(
                "Shell site must not be empty".to_string(),
            ));
        }

        if self.index.default.trim().is_empty() {
            return Err(SiteSearchError::ConfigError(
                "Default index name must not be empty".to_string(),
            ));
        }

        for (name, site) in &self.sites {
            if !ItemId::is_id(&site.home) {
                return Err(SiteSearchError::ConfigError(format!(
                    "Site '{name}' has an invalid home item id: {}",
                    site.home
                )));
            }
        }

        for (param, facet) in &self.facets {
            if facet.kind == FacetKind::Value && facet.field.is_none() {
                return Err(SiteSearchError::ConfigError(format!(
                    "Value facet '{param}' needs a field"
                )));
            }
        }

        Ok(())
    }

    /// Log configuration
    pub fn log_config(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Default page size: {}", self.search.default_page_size);
        match self.search.max_page_size {
            Some(max) => tracing::info!("  Max page size: {}", max),
            None => tracing::info!("  Max page size: unlimited"),
        }
        tracing::info!("  Geolocation marker: {}", self.search.geolocation_marker);
        tracing::info!("  Shell site: {}", self.search.shell_site);
        tracing::info!("  Default index: {}", self.index.default);
        tracing::info!("  Languages: {:?}", self.languages.known);
        tracing::info!("  Sites: {} configured", self.sites.len());
        tracing::info!("  Facets: {} configured", self.facets.len());
        tracing::info!("  Default sort: {}", self.sorting.default);
        tracing::info!("  Boosting enabled: {}", self.boosting.enabled);
    }
}
