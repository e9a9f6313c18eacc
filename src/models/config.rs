use serde::{Deserialize, Serialize};

/// Immutable startup configuration from `launcher.yaml`
///
/// Read once at startup and never mutated for the process lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LauncherConfig {
    #[serde(rename = "Root Path", default = "default_root_path")]
    pub root_path: String,

    #[serde(rename = "Custom Chrome", default = "default_custom_chrome")]
    pub use_custom_chrome: bool,

    #[serde(rename = "Log Directory", default = "default_log_dir")]
    pub log_dir: String,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            root_path: default_root_path(),
            use_custom_chrome: default_custom_chrome(),
            log_dir: default_log_dir(),
        }
    }
}

/// User session preferences from `preferences.yaml`
///
/// Shared between the in-memory state and the persisted store. Every
/// mutation goes through the write-through bridge so the two copies
/// never diverge after a completed write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(rename = "Game Scale", default = "default_game_scale")]
    pub game_scale: f32,

    #[serde(rename = "Game Layout", default)]
    pub game_layout: GameLayout,

    #[serde(rename = "Show Extreme", default)]
    pub show_extreme: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            game_scale: default_game_scale(),
            game_layout: GameLayout::default(),
            show_extreme: false,
        }
    }
}

/// How the game grid is laid out in the browse view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GameLayout {
    #[default]
    Grid,
    List,
}

fn default_root_path() -> String {
    "library".to_string()
}

fn default_custom_chrome() -> bool {
    true
}

fn default_log_dir() -> String {
    "logs".to_string()
}

fn default_game_scale() -> f32 {
    1.0
}
