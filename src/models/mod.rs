//! Data models for the launcher shell.
//!
//! This module contains the core data structures used throughout the crate:
//! - [`AppState`]: the central state container the UI shell consumes
//! - [`CentralState`]: the atomically-applied collection + image-index join
//! - [`LauncherConfig`]: immutable startup configuration from `launcher.yaml`
//! - [`Preferences`]: mutable session preferences from `preferences.yaml`
//! - [`Game`] / [`PlatformManifest`]: the parsed game-catalog records
//!
//! # Architecture Note
//!
//! The models are designed to be:
//! - **Serializable**: config and manifest structs derive `Serialize`/`Deserialize` for YAML persistence
//! - **Cloneable**: `AppState` is wrapped in `Arc<RwLock<>>` by [`StateManager`](crate::state::StateManager) for thread-safe access
//! - **Passive**: state transitions go through `StateManager` so change events stay consistent

pub mod app_state;
pub mod config;
pub mod game;

pub use app_state::{AppState, CentralState, NavigationGate, OrderEvent, OrderField, SearchEvent};
pub use config::{GameLayout, LauncherConfig, Preferences};
pub use game::{Game, GameCollection, GameEntry, PlatformManifest};
