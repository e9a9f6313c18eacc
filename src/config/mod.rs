use crate::models::{LauncherConfig, Preferences};
use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;

/// Persisted side of the preference write-through bridge.
///
/// Injected into the shell as an explicit dependency rather than reached as
/// a process-wide global, so tests can substitute an in-memory store.
pub trait PreferencesStore: Send + Sync {
    /// Synchronous read of the persisted preferences, used at startup only.
    fn load(&self) -> Result<Preferences>;

    /// Synchronous persist of the full preference record, called once per
    /// completed write-through.
    fn save(&self, preferences: &Preferences) -> Result<()>;
}

/// Configuration manager for loading and saving YAML configuration files.
///
/// Manages two files in one configuration directory:
/// - `launcher.yaml`: immutable startup configuration ([`LauncherConfig`])
/// - `preferences.yaml`: mutable session preferences ([`Preferences`])
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_dir: Utf8PathBuf,
    launcher_config_path: Utf8PathBuf,
    preferences_path: Utf8PathBuf,
}

impl ConfigManager {
    /// Create a new ConfigManager with the specified configuration directory.
    ///
    /// The directory is created if it doesn't exist.
    pub fn new<P: AsRef<Utf8Path>>(config_dir: P) -> Result<Self> {
        let config_dir = config_dir.as_ref().to_path_buf();

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)
                .with_context(|| format!("Failed to create config directory: {}", config_dir))?;
        }

        Ok(Self {
            launcher_config_path: config_dir.join("launcher.yaml"),
            preferences_path: config_dir.join("preferences.yaml"),
            config_dir,
        })
    }

    /// Load the immutable launcher configuration.
    ///
    /// # Returns
    /// The loaded LauncherConfig, or defaults if the file doesn't exist
    pub fn load_launcher_config(&self) -> Result<LauncherConfig> {
        if !self.launcher_config_path.exists() {
            tracing::warn!(
                "Launcher config not found at {}, using defaults",
                self.launcher_config_path
            );
            return Ok(LauncherConfig::default());
        }

        let file_contents = fs::read_to_string(&self.launcher_config_path).with_context(|| {
            format!(
                "Failed to read launcher config: {}",
                self.launcher_config_path
            )
        })?;

        let config: LauncherConfig = serde_yaml_ng::from_str(&file_contents).with_context(|| {
            format!(
                "Failed to parse launcher config: {}",
                self.launcher_config_path
            )
        })?;

        tracing::info!("Loaded launcher config from {}", self.launcher_config_path);
        Ok(config)
    }

    /// Load the persisted session preferences.
    ///
    /// # Returns
    /// The loaded Preferences, or defaults if the file doesn't exist
    pub fn load_preferences(&self) -> Result<Preferences> {
        if !self.preferences_path.exists() {
            tracing::warn!(
                "Preferences not found at {}, using defaults",
                self.preferences_path
            );
            return Ok(Preferences::default());
        }

        let file_contents = fs::read_to_string(&self.preferences_path)
            .with_context(|| format!("Failed to read preferences: {}", self.preferences_path))?;

        let preferences: Preferences = serde_yaml_ng::from_str(&file_contents)
            .with_context(|| format!("Failed to parse preferences: {}", self.preferences_path))?;

        tracing::info!("Loaded preferences from {}", self.preferences_path);
        Ok(preferences)
    }

    /// Persist the full preference record.
    pub fn save_preferences(&self, preferences: &Preferences) -> Result<()> {
        let yaml_string = serde_yaml_ng::to_string(preferences)
            .context("Failed to serialize preferences to YAML")?;

        fs::write(&self.preferences_path, yaml_string)
            .with_context(|| format!("Failed to write preferences: {}", self.preferences_path))?;

        tracing::debug!("Saved preferences to {}", self.preferences_path);
        Ok(())
    }

    /// Get the configuration directory path.
    pub fn config_dir(&self) -> &Utf8Path {
        &self.config_dir
    }
}

impl PreferencesStore for ConfigManager {
    fn load(&self) -> Result<Preferences> {
        self.load_preferences()
    }

    fn save(&self, preferences: &Preferences) -> Result<()> {
        self.save_preferences(preferences)
    }
}
