use std::fs;
use std::path::Path;
use serde::{Deserialize, Serialize};
use anyhow::{Result, Context};

use crate::providers::ProviderKind;

/// Main configuration structure for universal_pages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Completion service used for preference extraction
    #[serde(default)]
    pub completion: CompletionConfig,

    /// Book catalog configuration
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// UI display configuration
    #[serde(default)]
    pub ui: UIConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionConfig {
    /// Which OpenAI-compatible service to talk to
    #[serde(default = "default_provider")]
    pub provider: ProviderKind,

    /// Model to use
    #[serde(default = "default_model")]
    pub model: String,

    /// Override of the provider's base URL
    #[serde(default)]
    pub base_url: Option<String>,

    /// Temperature setting
    #[serde(default)]
    pub temperature: Option<f32>,

    /// HTTP timeout for the completion request, in seconds
    #[serde(default = "default_completion_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Base URL of the Google Books API
    #[serde(default = "default_catalog_url")]
    pub base_url: String,

    /// Number of books requested per query
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// HTTP timeout for the catalog request, in seconds
    #[serde(default = "default_catalog_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UIConfig {
    /// Enable colorful output
    #[serde(default = "default_colorful")]
    pub colorful: bool,

    /// Show a spinner while the query runs
    #[serde(default = "default_spinner")]
    pub spinner: bool,

    /// Output format ("terminal", "json")
    #[serde(default = "default_output_format")]
    pub output_format: String,
}

// Default value functions
fn default_provider() -> ProviderKind { ProviderKind::Groq }
fn default_model() -> String { "meta-llama/llama-4-maverick-17b-128e-instruct".to_string() }
fn default_completion_timeout() -> u64 { 30 }
fn default_catalog_url() -> String { "https://www.googleapis.com/books/v1".to_string() }
fn default_max_results() -> usize { 5 }
fn default_catalog_timeout() -> u64 { 15 }
fn default_colorful() -> bool { true }
fn default_spinner() -> bool { true }
fn default_output_format() -> String { "terminal".to_string() }

impl Default for CompletionConfig {
    fn default() -> Self {
        CompletionConfig {
            provider: default_provider(),
            model: default_model(),
            base_url: None,
            temperature: None,
            timeout_secs: default_completion_timeout(),
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        CatalogConfig {
            base_url: default_catalog_url(),
            max_results: default_max_results(),
            timeout_secs: default_catalog_timeout(),
        }
    }
}

impl Default for UIConfig {
    fn default() -> Self {
        UIConfig {
            colorful: default_colorful(),
            spinner: default_spinner(),
            output_format: default_output_format(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            completion: CompletionConfig::default(),
            catalog: CatalogConfig::default(),
            ui: UIConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Load configuration from command line argument or default locations
    pub fn load(config_path: &Option<String>) -> Result<Self> {
        if let Some(path) = config_path {
            return Self::from_file(shellexpand::tilde(path).as_ref());
        }

        // Try loading from default locations
        let default_paths = vec![
            "universal_pages.toml",
            ".universal_pages.toml",
            "~/.config/universal_pages/config.toml",
        ];

        for path in default_paths {
            let expanded_path = shellexpand::tilde(path);
            if Path::new(expanded_path.as_ref()).exists() {
                match Self::from_file(expanded_path.as_ref()) {
                    Ok(config) => return Ok(config),
                    Err(e) => log::warn!("Failed to load config from {}: {:#}", path, e),
                }
            }
        }

        // Return default config if no file found
        Ok(Self::default())
    }

    /// Merge with command-line arguments (CLI args take precedence)
    pub fn merge_with_args(&mut self, max_results: Option<usize>, json: bool, no_color: bool) {
        if let Some(n) = max_results {
            self.catalog.max_results = n;
        }
        if json {
            self.ui.output_format = "json".to_string();
            self.ui.spinner = false;
        }
        if no_color {
            self.ui.colorful = false;
        }
    }
}
