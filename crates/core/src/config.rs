//! Extraction configuration.
//!
//! [`Config`] is threaded explicitly through every extractor: nothing in the
//! pipeline reads ambient preferences or theme state. It can be built in
//! code with [`ConfigBuilder`] or loaded from a TOML file.
//!
//! # Example
//!
//! ```rust
//! use depeche_core::{Config, Theme};
//!
//! let config = Config::builder().display_tweets(true).theme(Theme::Dark).build();
//! assert!(config.display_tweets);
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::{DepecheError, Result};

/// Base URL of the live post provider API.
pub const DEFAULT_LIVE_API_BASE: &str = "https://apiv1.scribblelive.com";

/// Static access token sent with every live feed request.
pub const DEFAULT_LIVE_API_TOKEN: &str = "uHZsFRTz";

/// Number of posts requested per feed page.
pub const DEFAULT_LIVE_PAGE_SIZE: u32 = 20;

/// Color scheme of the host application; only affects icon hints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

/// Localized strings inserted into header blocks.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Labels {
    /// Prefix of the author block.
    pub by: String,
    /// Prefix of the publication date.
    pub published: String,
    /// Separator placed before the modification date.
    pub modified: String,
    /// Header of the live facts panel.
    pub facts: String,
}

impl Labels {
    pub fn french() -> Self {
        Self {
            by: "Par".to_string(),
            published: "Publié le".to_string(),
            modified: " - Mis à jour le".to_string(),
            facts: "Les faits essentiels".to_string(),
        }
    }

    pub fn english() -> Self {
        Self {
            by: "By".to_string(),
            published: "Published on".to_string(),
            modified: " - Updated on".to_string(),
            facts: "Key facts".to_string(),
        }
    }
}

impl Default for Labels {
    fn default() -> Self {
        Self::french()
    }
}

/// Live post feed endpoint settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LiveApiConfig {
    pub base_url: String,
    pub token: String,
    pub page_size: u32,
}

impl Default for LiveApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_LIVE_API_BASE.to_string(),
            token: DEFAULT_LIVE_API_TOKEN.to_string(),
            page_size: DEFAULT_LIVE_PAGE_SIZE,
        }
    }
}

/// Configuration for the extraction pipeline.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Emit Tweet blocks for embedded tweets (default: false).
    pub display_tweets: bool,

    /// Host color scheme (default: light).
    pub theme: Theme,

    /// Localized header strings (default: French).
    pub labels: Labels,

    /// Live post feed endpoint.
    pub live_api: LiveApiConfig,

    /// Base URL used to resolve relative comment page links.
    pub site_url: String,

    /// `time` format description for live post dates.
    pub date_format: String,

    /// Offset applied to live post timestamps before formatting.
    pub utc_offset_hours: i8,

    /// Fetch the comments page of standard articles in `Pipeline::run` (default: false).
    pub fetch_comments: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            display_tweets: false,
            theme: Theme::Light,
            labels: Labels::default(),
            live_api: LiveApiConfig::default(),
            site_url: "https://www.lemonde.fr".to_string(),
            date_format: "[day]/[month]/[year] [hour]:[minute]".to_string(),
            utc_offset_hours: 0,
            fetch_comments: false,
        }
    }
}

impl Config {
    /// Creates a new builder for Config.
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Parses a TOML document; missing keys keep their defaults.
    ///
    /// # Example
    ///
    /// ```rust
    /// use depeche_core::{Config, Theme};
    ///
    /// let config = Config::from_toml_str("theme = \"dark\"\n[labels]\nby = \"By\"").unwrap();
    /// assert_eq!(config.theme, Theme::Dark);
    /// assert_eq!(config.labels.by, "By");
    /// assert_eq!(config.labels.published, "Publié le");
    /// ```
    pub fn from_toml_str(source: &str) -> Result<Self> {
        toml::from_str(source).map_err(|e| DepecheError::ConfigError(e.to_string()))
    }

    /// Loads a TOML configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(DepecheError::FileNotFound(path.to_path_buf()));
        }
        let source = fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// Default location of the configuration file (`<config dir>/depeche/config.toml`).
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("depeche").join("config.toml"))
    }
}

/// Builder for Config.
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Creates a new builder with default values.
    pub fn new() -> Self {
        Self { config: Config::default() }
    }

    pub fn display_tweets(mut self, value: bool) -> Self {
        self.config.display_tweets = value;
        self
    }

    pub fn theme(mut self, value: Theme) -> Self {
        self.config.theme = value;
        self
    }

    pub fn labels(mut self, value: Labels) -> Self {
        self.config.labels = value;
        self
    }

    pub fn live_api(mut self, value: LiveApiConfig) -> Self {
        self.config.live_api = value;
        self
    }

    pub fn site_url(mut self, value: impl Into<String>) -> Self {
        self.config.site_url = value.into();
        self
    }

    pub fn date_format(mut self, value: impl Into<String>) -> Self {
        self.config.date_format = value.into();
        self
    }

    pub fn utc_offset_hours(mut self, value: i8) -> Self {
        self.config.utc_offset_hours = value;
        self
    }

    pub fn fetch_comments(mut self, value: bool) -> Self {
        self.config.fetch_comments = value;
        self
    }

    /// Builds the config.
    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
