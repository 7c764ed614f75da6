//! Pipeline configuration

use std::path::{Path, PathBuf};

use liturgia_core::{LiturgiaError, Result};
use liturgia_embeddings::DEFAULT_DIM;
use liturgia_readings::{DEFAULT_READINGS_URL, DEFAULT_TIMEOUT_SECS};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// File looked up in the working directory when no config is given
pub const DEFAULT_CONFIG_FILE: &str = "liturgia.toml";

pub const DEFAULT_HYMN_LINK_BASE: &str = "/../../canti/testo/";

/// Placeholders: `{tempo}`, `{anno}`, `{anno_lower}`, `{numero}`
pub const DEFAULT_PSALM_LINK_TEMPLATE: &str =
    "../../db/tempi_liturgici/{tempo}/salmi_anno_{anno}/{anno_lower} {numero} Visconti.pdf";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Hymn catalog (JSON)
    pub catalog_path: PathBuf,

    /// Where `messa_YYYYMMDD.json` is written
    pub output_dir: PathBuf,

    /// Write the sheet to `output_dir`
    pub save: bool,

    /// Readings page, with a `{date}` placeholder
    pub readings_url: String,

    pub timeout_secs: u64,

    /// Dimension of the built-in hashing model
    pub embedding_dim: usize,

    /// Sentence-transformer directory (`config.json`, `tokenizer.json`,
    /// `model.safetensors`); the hashing model is used when unset
    pub model_dir: Option<PathBuf>,

    /// Overrides the colour of the season
    pub colour: Option<String>,

    pub hymn_link_base: String,

    pub psalm_link_template: String,

    /// Prefer hymns tagged with the day's season
    pub season_filter: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_path: PathBuf::from("canti.json"),
            output_dir: default_output_dir(),
            save: true,
            readings_url: DEFAULT_READINGS_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            embedding_dim: DEFAULT_DIM,
            model_dir: None,
            colour: None,
            hymn_link_base: DEFAULT_HYMN_LINK_BASE.to_string(),
            psalm_link_template: DEFAULT_PSALM_LINK_TEMPLATE.to_string(),
            season_filter: false,
        }
    }
}

fn default_output_dir() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join("Desktop"))
        .unwrap_or_else(|| PathBuf::from("."))
}

impl Config {
    /// Load `path`, else `liturgia.toml` in the working directory if present,
    /// else the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::from_file(path);
        }

        let local = Path::new(DEFAULT_CONFIG_FILE);
        if local.is_file() {
            return Self::from_file(local);
        }

        debug!("No configuration file, using defaults");
        Ok(Self::default())
    }

    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            LiturgiaError::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| LiturgiaError::Config(format!("Failed to parse config file: {}", e)))?;

        config.validate()?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            return Err(LiturgiaError::Config("timeout_secs must be greater than 0".into()));
        }

        if self.embedding_dim == 0 {
            return Err(LiturgiaError::Config("embedding_dim must be greater than 0".into()));
        }

        if let Some(dir) = &self.model_dir {
            if !dir.is_dir() {
                return Err(LiturgiaError::Config(format!(
                    "model_dir {} is not a directory",
                    dir.display()
                )));
            }
        }

        if !self.readings_url.contains("{date}") {
            return Err(LiturgiaError::Config(format!(
                "readings_url '{}' must contain a {{date}} placeholder",
                self.readings_url
            )));
        }

        Ok(())
    }
}
