// State management module
//
// This module provides the StateManager which wraps AppState with thread-safe
// access using Arc<RwLock<T>> and emits change events for the UI shell, plus
// the preference write-through bridge and the one-shot browse-navigation gate.

use crate::config::PreferencesStore;
use crate::models::{
    AppState, CentralState, GameLayout, NavigationGate, OrderEvent, Preferences, SearchEvent,
};
use anyhow::Result;
use std::sync::{Arc, RwLock};
use tokio::sync::broadcast;

/// Change events emitted when state is modified
///
/// These events are emitted to notify interested parties (primarily the UI
/// shell) about state changes without requiring them to poll the state.
#[derive(Clone, Debug, PartialEq)]
pub enum StateChange {
    /// The collection load chain has started
    LoadStarted,

    /// Central state became available (loaded or fallback)
    CollectionLoaded { games: usize, platforms: usize },

    /// A session preference has been updated
    PreferencesChanged,

    /// A new search was submitted, arming the browse-navigation gate
    SearchSubmitted { query: String },

    /// The sort selection changed
    OrderChanged,

    /// The log snapshot was replaced
    LogUpdated,
}

/// Thread-safe state manager with event emission
///
/// This is the central state management component that:
/// - Provides thread-safe access to [`AppState`] via `Arc<RwLock<T>>`
/// - Detects state changes and emits [`StateChange`] events
/// - Owns the browse-navigation gate's transitions
///
/// # Usage
///
/// Always use `StateManager` instead of accessing [`AppState`] directly:
/// - [`read()`](Self::read) for reading state without holding locks
/// - [`update()`](Self::update) for mutations with automatic event emission
/// - [`subscribe()`](Self::subscribe) for listening to state changes
pub struct StateManager {
    /// The application state protected by RwLock for thread-safe access
    state: Arc<RwLock<AppState>>,

    /// Broadcast channel for emitting state change events
    state_tx: broadcast::Sender<StateChange>,
}

impl StateManager {
    /// Create a new StateManager with default state
    pub fn new() -> Self {
        let (state_tx, _) = broadcast::channel(100);
        Self {
            state: Arc::new(RwLock::new(AppState::default())),
            state_tx,
        }
    }

    /// Get a read-only snapshot of the current state
    ///
    /// This clones the entire state, so it's safe to use without holding
    /// locks. For checking individual fields, prefer `read()` with a closure.
    pub fn snapshot(&self) -> AppState {
        self.state.read().unwrap().clone()
    }

    /// Execute a function with read access to the state
    pub fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&AppState) -> R,
    {
        let state = self.state.read().unwrap();
        f(&state)
    }

    /// Update the state and emit change events
    ///
    /// This is the primary way to modify state. It:
    /// 1. Captures the old state
    /// 2. Applies the update function
    /// 3. Detects what changed
    /// 4. Emits appropriate events
    ///
    /// # Returns
    /// A vector of StateChange events that were emitted
    pub fn update<F>(&self, update_fn: F) -> Vec<StateChange>
    where
        F: FnOnce(&mut AppState),
    {
        let mut state = self.state.write().unwrap();
        let old_state = state.clone();

        update_fn(&mut state);

        let changes = detect_changes(&old_state, &state);
        for change in &changes {
            // Ignore send errors - it's OK if no one is listening
            let _ = self.state_tx.send(change.clone());
        }

        changes
    }

    /// Subscribe to state change events
    ///
    /// Returns a receiver that will get notified of all future state changes.
    /// Multiple subscribers can listen simultaneously.
    pub fn subscribe(&self) -> broadcast::Receiver<StateChange> {
        self.state_tx.subscribe()
    }

    // Convenience methods for common state updates

    /// Mark the load chain as started
    pub fn begin_loading(&self) -> Vec<StateChange> {
        self.update(|state| {
            state.is_loading = true;
        })
    }

    /// Apply the assembled central state
    ///
    /// The single atomic transition out of the loading phase: the collection
    /// and its matching image index become visible to consumers together or
    /// not at all.
    pub fn apply_central(&self, central: CentralState) -> Vec<StateChange> {
        self.update(|state| {
            state.central = Some(central);
            state.is_loading = false;
        })
    }

    /// Replace the displayed log text with a fresh full snapshot
    pub fn set_log_text<S: Into<String>>(&self, text: S) -> Vec<StateChange> {
        self.update(|state| {
            state.log_text = text.into();
        })
    }

    /// Record a search submission and arm the browse-navigation gate
    ///
    /// Most-recent-wins: a newer submission overwrites the stored event. The
    /// gate is re-armed even if the query text is identical.
    pub fn submit_search<S: Into<String>>(&self, query: S) -> Vec<StateChange> {
        let query = query.into();
        self.update(|state| {
            state.last_search = Some(SearchEvent { query });
            state.browse_gate = NavigationGate::Armed;
        })
    }

    /// Record a sort selection
    pub fn submit_order(&self, order: OrderEvent) -> Vec<StateChange> {
        self.update(|state| {
            state.last_order = Some(order);
        })
    }

    /// Explicit consumption step for the browse-navigation gate
    ///
    /// Returns `true` exactly once per search submission and disarms the
    /// gate unconditionally, whether or not the caller acts on it. Only a
    /// new submission can arm it again.
    pub fn take_browse_navigation(&self) -> bool {
        let mut state = self.state.write().unwrap();
        match state.browse_gate {
            NavigationGate::Armed => {
                state.browse_gate = NavigationGate::Idle;
                true
            }
            NavigationGate::Idle => false,
        }
    }
}

/// Detect what changed between two states and generate events
fn detect_changes(old: &AppState, new: &AppState) -> Vec<StateChange> {
    let mut changes = Vec::new();

    if !old.is_loading && new.is_loading {
        changes.push(StateChange::LoadStarted);
    }

    if old.central.is_none()
        && let Some(central) = &new.central
    {
        changes.push(StateChange::CollectionLoaded {
            games: central.collection.len(),
            platforms: central.images.platform_count(),
        });
    }

    if old.preferences != new.preferences {
        changes.push(StateChange::PreferencesChanged);
    }

    // Keyed off the gate transition, not the stored event, so resubmitting
    // an identical query still announces itself.
    if old.browse_gate != NavigationGate::Armed
        && new.browse_gate == NavigationGate::Armed
        && let Some(search) = &new.last_search
    {
        changes.push(StateChange::SearchSubmitted {
            query: search.query.clone(),
        });
    }

    if old.last_order != new.last_order {
        changes.push(StateChange::OrderChanged);
    }

    if old.log_text != new.log_text {
        changes.push(StateChange::LogUpdated);
    }

    changes
}

impl Default for StateManager {
    fn default() -> Self {
        Self::new()
    }
}

// Make StateManager cloneable for sharing across threads
impl Clone for StateManager {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            state_tx: self.state_tx.clone(),
        }
    }
}

/// Write-through bridge between live preferences and their persisted store
///
/// Every setter performs, in order: (a) update of the in-memory value
/// consumed by rendering, (b) a synchronous write of the full record through
/// the injected [`PreferencesStore`]. No batching, no debouncing - each user
/// interaction is persisted individually and immediately. Store failures
/// propagate to the caller; recovery is the store's concern, not this
/// layer's.
pub struct PreferenceBridge {
    state: StateManager,
    store: Arc<dyn PreferencesStore>,
}

impl PreferenceBridge {
    pub fn new(state: StateManager, store: Arc<dyn PreferencesStore>) -> Self {
        Self { state, store }
    }

    /// Startup-only synchronous read: load persisted preferences into the
    /// live state.
    pub fn read(&self) -> Result<Preferences> {
        let preferences = self.store.load()?;
        let loaded = preferences.clone();
        self.state.update(|state| {
            state.preferences = preferences;
        });
        Ok(loaded)
    }

    pub fn set_game_scale(&self, scale: f32) -> Result<()> {
        self.write_through(|prefs| prefs.game_scale = scale)
    }

    pub fn set_game_layout(&self, layout: GameLayout) -> Result<()> {
        self.write_through(|prefs| prefs.game_layout = layout)
    }

    pub fn set_show_extreme(&self, show: bool) -> Result<()> {
        self.write_through(|prefs| prefs.show_extreme = show)
    }

    /// Current live preference values.
    pub fn current(&self) -> Preferences {
        self.state.read(|state| state.preferences.clone())
    }

    fn write_through<F>(&self, mutate: F) -> Result<()>
    where
        F: FnOnce(&mut Preferences),
    {
        // In-memory first, then persist the exact record renders will see.
        self.state.update(|state| mutate(&mut state.preferences));
        let preferences = self.current();
        self.store.save(&preferences)
    }
}
