// Launcher shell - the startup and state-assembly orchestrator
//
// This module coordinates the pieces the UI shell consumes:
// - StateManager (central application state + change events)
// - CollectionLoader (two-stage catalog fetch with fallback)
// - ImageIndex (thumbnail lookup, populated before central state appears)
// - LogBridge (scoped subscription to the background log stream)
// - PreferenceBridge (write-through session preferences)
//
// Sequencing: construction performs the synchronous reads (preferences) and
// creates the image index; start() attaches the log bridge and launches the
// load chain; the chain registers resolved platforms into the index and then
// applies CentralState in one atomic transition. The load and the index are
// chained, not raced.

use crate::config::PreferencesStore;
use crate::models::{CentralState, LauncherConfig};
use crate::services::collection::CollectionLoader;
use crate::services::images::ImageIndex;
use crate::services::logs::{LogBridge, LogChannel, LogSubscription};
use crate::state::{PreferenceBridge, StateManager};
use camino::Utf8PathBuf;
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Orchestrates startup, state assembly, and teardown for the launcher.
///
/// # Example
/// ```ignore
/// let state = StateManager::new();
/// let config_manager = Arc::new(ConfigManager::new("ludex-data")?);
/// let launcher_config = config_manager.load_launcher_config()?;
/// let log_channel = Arc::new(InProcessLogChannel::new());
///
/// let shell = LauncherShell::new(
///     launcher_config,
///     state,
///     config_manager,
///     log_channel,
///     runtime.handle().clone(),
/// );
/// shell.start();
/// // ... UI consumes shell.state() snapshots and events ...
/// shell.shutdown();
/// ```
pub struct LauncherShell {
    /// Immutable startup configuration, owned for the process lifetime
    config: LauncherConfig,

    /// Shared state manager the UI shell consumes
    state: StateManager,

    /// Write-through session preferences
    preferences: PreferenceBridge,

    loader: Arc<CollectionLoader>,

    log_channel: Arc<dyn LogChannel>,

    /// Handle to the tokio runtime for spawning the load chain
    tokio_handle: tokio::runtime::Handle,

    /// Cancellation sender; `true` tells an in-flight load to discard its
    /// result instead of applying it against a torn-down consumer
    cancel_tx: watch::Sender<bool>,

    /// Image index created at construction, consumed by the load chain
    images: Mutex<Option<ImageIndex>>,

    /// Held for exactly the mount lifetime; dropping it detaches the handler
    log_subscription: Mutex<Option<LogSubscription>>,

    load_task: Mutex<Option<JoinHandle<()>>>,
}

impl LauncherShell {
    /// Create the shell and perform the synchronous startup reads.
    ///
    /// Preferences are read through the injected store; a failed read
    /// degrades to defaults rather than blocking startup.
    pub fn new(
        config: LauncherConfig,
        state: StateManager,
        store: Arc<dyn PreferencesStore>,
        log_channel: Arc<dyn LogChannel>,
        tokio_handle: tokio::runtime::Handle,
    ) -> Self {
        let preferences = PreferenceBridge::new(state.clone(), store);
        if let Err(e) = preferences.read() {
            tracing::warn!("Failed to load preferences, starting with defaults: {:#}", e);
        }

        let images = ImageIndex::new(Utf8PathBuf::from(&config.root_path));
        let (cancel_tx, _) = watch::channel(false);

        tracing::info!("Launcher shell created, root path: {}", config.root_path);

        Self {
            config,
            state,
            preferences,
            loader: Arc::new(CollectionLoader::new()),
            log_channel,
            tokio_handle,
            cancel_tx,
            images: Mutex::new(Some(images)),
            log_subscription: Mutex::new(None),
            load_task: Mutex::new(None),
        }
    }

    /// Attach the log bridge and launch the collection load chain.
    ///
    /// Idempotent: a second call is a no-op, the chain runs once per shell.
    pub fn start(&self) {
        let Some(mut images) = self.images.lock().unwrap().take() else {
            tracing::warn!("Shell already started, ignoring");
            return;
        };

        // Subscribe before anything can publish, then replay the current
        // snapshot so nothing emitted before this point is lost.
        let log_state = self.state.clone();
        let subscription = LogBridge::attach(Arc::clone(&self.log_channel), move |text| {
            log_state.set_log_text(text);
        });
        *self.log_subscription.lock().unwrap() = Some(subscription);

        self.state.begin_loading();

        let state = self.state.clone();
        let loader = Arc::clone(&self.loader);
        let root = Utf8PathBuf::from(&self.config.root_path);
        let cancel_rx = self.cancel_tx.subscribe();

        let task = self.tokio_handle.spawn(async move {
            let outcome = loader.load(&root).await;

            // The chain has no mid-flight cancellation; this guard keeps a
            // late settle from mutating state after shutdown.
            if *cancel_rx.borrow() {
                tracing::debug!("Shell shut down before load settled, discarding result");
                return;
            }

            let (platforms, collection) = outcome.into_parts();

            // Platforms registered before CentralState exists, so the image
            // lookup is complete the moment consumers can see the collection.
            images.add_platforms(&platforms);
            state.apply_central(CentralState {
                collection,
                root_path: root,
                images,
            });
        });

        *self.load_task.lock().unwrap() = Some(task);
        tracing::info!("Launcher shell started");
    }

    /// Tear down: cancel any in-flight load and release the log
    /// subscription.
    ///
    /// Idempotent; safe to call whether or not the load has settled.
    pub fn shutdown(&self) {
        let _ = self.cancel_tx.send(true);

        if self.log_subscription.lock().unwrap().take().is_some() {
            tracing::info!("Launcher shell shut down");
        }
    }

    /// Wait for the load chain to settle (applied or discarded).
    ///
    /// Consumers that need a loaded library before proceeding await this
    /// once after [`start()`](Self::start).
    pub async fn load_settled(&self) {
        let task = self.load_task.lock().unwrap().take();
        if let Some(task) = task
            && let Err(e) = task.await
        {
            tracing::error!("Load chain task failed: {}", e);
        }
    }

    pub fn state(&self) -> &StateManager {
        &self.state
    }

    pub fn preferences(&self) -> &PreferenceBridge {
        &self.preferences
    }

    pub fn config(&self) -> &LauncherConfig {
        &self.config
    }
}
