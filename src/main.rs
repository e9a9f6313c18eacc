//! Ludex - desktop game-catalog launcher shell.
//!
//! Main entry point. This binary assembles the orchestration core:
//! - Logging infrastructure (file rotation + console output)
//! - Tokio async runtime (collection load chain, shutdown signal)
//! - State management ([`StateManager`])
//! - Configuration loading ([`ConfigManager`])
//! - The shell itself ([`LauncherShell`] - sequencing, assembly, teardown)
//!
//! # Execution Flow
//!
//! 1. Initialize logging → logs/ludex.<date>.log
//! 2. Create tokio runtime
//! 3. Create StateManager (Arc<RwLock<AppState>>)
//! 4. Load launcher.yaml and preferences.yaml from ludex-data/
//! 5. Create LauncherShell and start it (log bridge attach + load chain)
//! 6. Run until Ctrl-C
//! 7. Shut the shell down, then the runtime with a 5s timeout
//!
//! The rendering layer is an external consumer of [`StateManager`]
//! snapshots and change events; nothing in this process draws pixels.

use anyhow::Result;
use ludex::services::{InProcessLogChannel, LogChannel};
use ludex::{APP_NAME, ConfigManager, LauncherShell, StateManager, VERSION};
use std::sync::Arc;

/// Main entry point for the launcher shell
///
/// # Errors
///
/// This function can fail if:
/// - Logging initialization fails (disk space, permissions)
/// - Tokio runtime creation fails (system resources)
/// - The configuration directory cannot be created
/// - launcher.yaml exists but is invalid YAML
fn main() -> Result<()> {
    let config_manager = Arc::new(ConfigManager::new("ludex-data")?);
    let launcher_config = config_manager.load_launcher_config()?;

    let _guard = ludex::logging::setup_logging(&launcher_config.log_dir, APP_NAME, false, true)?;

    tracing::info!("Starting {} v{}", APP_NAME, VERSION);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .worker_threads(2)
        .thread_name("ludex-worker")
        .build()?;

    let state = StateManager::new();

    // The push side of this channel belongs to the background launcher
    // daemon; the shell only holds the subscription end.
    let log_channel: Arc<dyn LogChannel> = Arc::new(InProcessLogChannel::new());

    let shell = LauncherShell::new(
        launcher_config,
        state,
        config_manager,
        log_channel,
        runtime.handle().clone(),
    );

    shell.start();

    // The shell stays mounted until the process is asked to stop; the load
    // chain settles in the background even if that happens early.
    runtime.block_on(async {
        tokio::signal::ctrl_c().await?;
        tracing::info!("Shutdown requested");
        Ok::<(), std::io::Error>(())
    })?;

    shell.shutdown();
    runtime.shutdown_timeout(std::time::Duration::from_secs(5));

    tracing::info!("Application shutdown complete");
    Ok(())
}
