use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub omdb: Option<OmdbConfig>,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OmdbConfig {
    pub enabled: bool,
    pub api_key: String,
    #[serde(default = "default_omdb_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct StoreConfig {
    /// Local document store file; defaults to `<data_dir>/store.json`
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_json_logging")]
    pub json: bool,
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: default_json_logging(),
            file: None,
        }
    }
}

pub fn default_omdb_base_url() -> String {
    "https://www.omdbapi.com/".to_string()
}

fn default_timeout_seconds() -> u64 {
    15
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_json_logging() -> bool {
    use std::io::IsTerminal;
    !std::io::stdout().is_terminal()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            omdb: None,
            store: StoreConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    pub fn load_from_file(path: &PathBuf) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load the file if it exists, otherwise fall back to defaults
    pub fn load_or_default(path: &PathBuf) -> anyhow::Result<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save_to_file(&self, path: &PathBuf) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if let Some(omdb) = &self.omdb {
            if omdb.enabled {
                if omdb.api_key.trim().is_empty() || omdb.api_key == "YOUR_API_KEY" {
                    return Err(anyhow::anyhow!("OMDb is enabled but api_key is not configured"));
                }
                if omdb.base_url.trim().is_empty() {
                    return Err(anyhow::anyhow!("OMDb is enabled but base_url is empty"));
                }
                if omdb.timeout_seconds == 0 {
                    return Err(anyhow::anyhow!("omdb.timeout_seconds must be greater than zero"));
                }
            }
        }
        Ok(())
    }

    pub fn is_omdb_configured(&self) -> bool {
        if let Some(ref omdb) = self.omdb {
            omdb.enabled && !omdb.api_key.trim().is_empty() && omdb.api_key != "YOUR_API_KEY"
        } else {
            false
        }
    }

    /// Resolved store file, honouring the `[store]` override
    pub fn store_path(&self, paths: &crate::PathManager) -> PathBuf {
        self.store.path.clone().unwrap_or_else(|| paths.store_file())
    }
}
