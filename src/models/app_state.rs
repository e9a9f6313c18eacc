use crate::models::{GameCollection, Preferences};
use crate::services::images::ImageIndex;
use camino::Utf8PathBuf;

/// The joined, consistent snapshot of game collection + thumbnail index +
/// root path.
///
/// Constructed exactly once per startup, only after the collection load has
/// settled (success or fallback) AND the resolved platform names have been
/// registered into `images`. Consumers can never observe a collection whose
/// platforms are missing from the index, because both travel in this one
/// record and it is applied to [`AppState`] atomically.
#[derive(Debug, Clone)]
pub struct CentralState {
    pub collection: GameCollection,
    pub root_path: Utf8PathBuf,
    pub images: ImageIndex,
}

/// Most-recent user search submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchEvent {
    pub query: String,
}

/// Most-recent user sort selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderEvent {
    pub field: OrderField,
    pub descending: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderField {
    Title,
    Platform,
}

/// One-shot browse-navigation signal.
///
/// Armed by a search submission, disarmed by the explicit consumption step
/// ([`crate::state::StateManager::take_browse_navigation`]). Nothing else
/// arms it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NavigationGate {
    #[default]
    Idle,
    Armed,
}

/// Single source of truth for all shell state.
///
/// # Thread Safety
///
/// `AppState` is wrapped in `Arc<RwLock<AppState>>` by
/// [`crate::state::StateManager`] to provide thread-safe access across the
/// application. Never access `AppState` directly - always use
/// [`StateManager`](crate::state::StateManager) methods:
/// - [`read()`](crate::state::StateManager::read) for read-only access
/// - [`update()`](crate::state::StateManager::update) for mutations with automatic change events
#[derive(Debug, Clone)]
pub struct AppState {
    /// Absent while the collection load is in flight; present (possibly with
    /// an empty collection) once the load chain has settled.
    pub central: Option<CentralState>,

    /// Live copy of the persisted session preferences.
    pub preferences: Preferences,

    /// Full current log buffer, replaced wholesale on each channel delivery.
    pub log_text: String,

    // Transient, most-recent-wins user events
    pub last_search: Option<SearchEvent>,
    pub last_order: Option<OrderEvent>,

    pub browse_gate: NavigationGate,

    /// True from load-chain start until central state is applied.
    pub is_loading: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            central: None,
            preferences: Preferences::default(),
            log_text: String::new(),
            last_search: None,
            last_order: None,
            browse_gate: NavigationGate::Idle,
            is_loading: false,
        }
    }
}

impl AppState {
    /// Number of games in the loaded collection, zero while the load is
    /// still in flight.
    pub fn game_count(&self) -> usize {
        self.central.as_ref().map_or(0, |c| c.collection.len())
    }

    pub fn has_central(&self) -> bool {
        self.central.is_some()
    }
}
