// Ludex - startup and state-orchestration shell for a desktop game-catalog
// launcher.
//
// This is the library crate containing the core business logic and data
// structures. The binary crate (main.rs) wires the shell into a process.

pub mod config;
pub mod logging;
pub mod models;
pub mod services;
pub mod shell;
pub mod state;

// Re-export commonly used types for convenience
pub use config::{ConfigManager, PreferencesStore};
pub use models::{AppState, CentralState, LauncherConfig, Preferences};
pub use shell::LauncherShell;
pub use state::{PreferenceBridge, StateChange, StateManager};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
