use crate::error::ConfigError;
use crate::models::config::{LayoutConfig, ReaderConfig};
use std::fs;
use std::path::PathBuf;
use std::sync::OnceLock;

/// Process-wide layout, installed once at startup and never mutated
static LAYOUT: OnceLock<LayoutConfig> = OnceLock::new();

/// Install the layout for the current display. Returns false if a layout
/// was already installed (the first one stays).
pub fn init_layout(layout: LayoutConfig) -> bool {
    LAYOUT.set(layout).is_ok()
}

/// Current layout; the reference layout if none was installed yet
pub fn layout() -> &'static LayoutConfig {
    LAYOUT.get_or_init(LayoutConfig::default)
}

/// Configuration manager for reader settings
pub struct ConfigManager {
    config_dir: PathBuf,
    config_path: PathBuf,
}

impl ConfigManager {
    /// Manager for the platform config directory. The directory is created
    /// if it doesn't exist.
    pub fn new() -> Result<Self, ConfigError> {
        let config_dir = dirs::config_dir()
            .ok_or(ConfigError::NoConfigDir)?
            .join("item-descr-reader");

        fs::create_dir_all(&config_dir)?;

        Ok(Self::at(config_dir))
    }

    /// Manager for an explicit directory (not created until saving)
    pub fn at(config_dir: impl Into<PathBuf>) -> Self {
        let config_dir = config_dir.into();
        let config_path = config_dir.join("config.json");

        Self {
            config_dir,
            config_path,
        }
    }

    pub fn save(&self, config: &ReaderConfig) -> Result<(), ConfigError> {
        fs::create_dir_all(&self.config_dir)?;

        let json = serde_json::to_string_pretty(config)?;
        fs::write(&self.config_path, json)?;

        tracing::info!(path = %self.config_path.display(), "saved reader config");
        Ok(())
    }

    /// Load configuration from disk, defaults if there is no config file
    pub fn load(&self) -> Result<ReaderConfig, ConfigError> {
        if !self.config_exists() {
            tracing::info!(path = %self.config_path.display(), "no config file, using defaults");
            return Ok(ReaderConfig::default());
        }

        let content = fs::read_to_string(&self.config_path)?;
        let config: ReaderConfig = serde_json::from_str(&content)?;

        tracing::info!(path = %self.config_path.display(), "loaded reader config");
        Ok(config)
    }

    pub fn config_file_path(&self) -> &PathBuf {
        &self.config_path
    }

    pub fn config_exists(&self) -> bool {
        self.config_path.exists()
    }
}
