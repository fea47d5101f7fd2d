use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Sync configuration.
///
/// Everything the engine needs to talk to the remote store is carried here
/// and injected at construction; nothing is read from globals. Credentials
/// and bin ids have no defaults and must come from the config file or the
/// environment.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Base URL of the document store API.
    pub api_base: String,
    /// Access key sent as the `X-Access-Key` header.
    pub api_key: String,
    /// Bin id of the Players collection.
    pub players_bin: String,
    /// Bin id of the Games collection.
    pub games_bin: String,
    /// Directory for local snapshot files.
    pub data_dir: PathBuf,
    /// Minimum seconds between smart syncs.
    pub sync_interval_secs: u64,
    /// Seconds a cached fetch result stays valid.
    pub cache_expiry_secs: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        Self {
            api_base: "https://api.jsonbin.io/v3/b".to_string(),
            api_key: String::new(),
            players_bin: String::new(),
            games_bin: String::new(),
            data_dir: PathBuf::from(&home).join(".paddlescore"),
            sync_interval_secs: 5 * 60,
            cache_expiry_secs: 2 * 60,
        }
    }
}

impl SyncConfig {
    /// Load configuration with priority: env vars > config file > defaults
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        let path = config_path.unwrap_or_else(Self::default_config_path);
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| ConfigError::Read(path.clone(), e))?;
            config =
                serde_yaml::from_str(&contents).map_err(|e| ConfigError::Parse(path.clone(), e))?;
        }

        if let Ok(api_base) = std::env::var("PADDLESCORE_API_BASE") {
            config.api_base = api_base;
        }
        if let Ok(api_key) = std::env::var("PADDLESCORE_API_KEY") {
            config.api_key = api_key;
        }
        if let Ok(players_bin) = std::env::var("PADDLESCORE_PLAYERS_BIN") {
            config.players_bin = players_bin;
        }
        if let Ok(games_bin) = std::env::var("PADDLESCORE_GAMES_BIN") {
            config.games_bin = games_bin;
        }
        if let Ok(data_dir) = std::env::var("PADDLESCORE_DATA_DIR") {
            config.data_dir = PathBuf::from(data_dir);
        }

        Ok(config)
    }

    /// Default config file path: ~/.config/paddlescore/config.yaml
    pub fn default_config_path() -> PathBuf {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home)
            .join(".config")
            .join("paddlescore")
            .join("config.yaml")
    }

    /// True when the key and both bin ids are present.
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty() && !self.players_bin.is_empty() && !self.games_bin.is_empty()
    }

    pub fn sync_interval(&self) -> Duration {
        Duration::from_secs(self.sync_interval_secs)
    }

    pub fn cache_expiry(&self) -> Duration {
        Duration::from_secs(self.cache_expiry_secs)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{0}': {1}")]
    Read(PathBuf, std::io::Error),
    #[error("failed to parse config file '{0}': {1}")]
    Parse(PathBuf, serde_yaml::Error),
}
