//! Integration tests for the LauncherShell startup orchestration
//!
//! These tests verify the full startup sequence against a real on-disk
//! library root:
//! - Two-stage load success: collection size is the sum of per-platform
//!   game counts, in platform-resolution order
//! - Fallback: any stage failure yields an empty-but-valid collection
//! - Atomic join: central state never appears with platforms missing from
//!   the image index
//! - Log bridge attach/replay/detach through the shell lifecycle
//! - Cancellation: a load settling after shutdown never touches state
//! - Preference write-through against the real YAML store

use camino::{Utf8Path, Utf8PathBuf};
use ludex::services::{InProcessLogChannel, LogChannel};
use ludex::{ConfigManager, LauncherConfig, LauncherShell, StateChange, StateManager};
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::time::{Duration, timeout};

fn utf8_path(temp: &TempDir) -> Utf8PathBuf {
    Utf8PathBuf::try_from(temp.path().to_path_buf()).unwrap()
}

fn write_manifest(root: &Utf8Path, file: &str, contents: &str) {
    let dir = root.join("platforms");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(file), contents).unwrap();
}

fn write_thumb(root: &Utf8Path, platform: &str, file: &str) {
    let dir = root.join("images").join(platform);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(file), b"png").unwrap();
}

struct Fixture {
    shell: LauncherShell,
    state: StateManager,
    channel: Arc<InProcessLogChannel>,
    _library: TempDir,
    _config: TempDir,
}

fn build_shell(library: TempDir) -> Fixture {
    let config_temp = TempDir::new().unwrap();
    let config_manager = Arc::new(ConfigManager::new(utf8_path(&config_temp)).unwrap());

    let config = LauncherConfig {
        root_path: utf8_path(&library).to_string(),
        ..LauncherConfig::default()
    };

    let state = StateManager::new();
    let channel = Arc::new(InProcessLogChannel::new());

    let shell = LauncherShell::new(
        config,
        state.clone(),
        config_manager,
        Arc::clone(&channel) as Arc<dyn LogChannel>,
        tokio::runtime::Handle::current(),
    );

    Fixture {
        shell,
        state,
        channel,
        _library: library,
        _config: config_temp,
    }
}

#[tokio::test]
async fn test_two_platforms_sum_to_collection_size() {
    let library = TempDir::new().unwrap();
    let root = utf8_path(&library);
    write_manifest(
        &root,
        "md.yaml",
        "games:\n  - {id: g1, title: One}\n  - {id: g2, title: Two}\n  - {id: g3, title: Three}\n",
    );
    write_manifest(
        &root,
        "snes.yaml",
        "games:\n  - {id: g4, title: Four}\n  - {id: g5, title: Five}\n  - {id: g6, title: Six}\n  - {id: g7, title: Seven}\n  - {id: g8, title: Eight}\n",
    );

    let fixture = build_shell(library);
    fixture.shell.start();
    fixture.shell.load_settled().await;

    let snapshot = fixture.state.snapshot();
    let central = snapshot.central.expect("central state must be assembled");
    assert_eq!(central.collection.len(), 8);

    // Platform-resolution order, no reordering
    assert_eq!(central.collection[0].platform, "md");
    assert_eq!(central.collection[3].platform, "snes");
    assert!(!snapshot.is_loading);

    fixture.shell.shutdown();
}

#[tokio::test]
async fn test_stage1_failure_falls_back_to_empty_collection() {
    // Library root exists but has no platforms directory at all
    let library = TempDir::new().unwrap();

    let fixture = build_shell(library);
    fixture.shell.start();
    fixture.shell.load_settled().await;

    let snapshot = fixture.state.snapshot();
    let central = snapshot
        .central
        .expect("fallback still assembles central state");
    assert!(central.collection.is_empty());
    assert_eq!(central.images.platform_count(), 0);

    fixture.shell.shutdown();
}

#[tokio::test]
async fn test_stage2_failure_discards_clean_platforms_too() {
    let library = TempDir::new().unwrap();
    let root = utf8_path(&library);
    write_manifest(&root, "md.yaml", "games:\n  - {id: g1, title: One}\n");
    write_manifest(&root, "snes.yaml", "games: {broken\n");

    let fixture = build_shell(library);
    fixture.shell.start();
    fixture.shell.load_settled().await;

    let central = fixture.state.snapshot().central.unwrap();
    assert!(central.collection.is_empty());

    fixture.shell.shutdown();
}

#[tokio::test]
async fn test_atomic_join_images_cover_collection_platforms() {
    let library = TempDir::new().unwrap();
    let root = utf8_path(&library);
    write_manifest(&root, "md.yaml", "games:\n  - {id: sonic, title: Sonic}\n");
    write_manifest(&root, "snes.yaml", "games:\n  - {id: smw, title: SMW}\n");
    write_thumb(&root, "snes", "smw.png");

    let fixture = build_shell(library);
    let mut rx = fixture.state.subscribe();
    fixture.shell.start();
    fixture.shell.load_settled().await;

    // Drain events until the join announcement; at that instant the index
    // must already cover every platform present in the collection.
    loop {
        let event = timeout(Duration::from_millis(100), rx.recv())
            .await
            .expect("Timeout waiting for CollectionLoaded")
            .expect("Channel closed");
        if let StateChange::CollectionLoaded { games, platforms } = event {
            assert_eq!(games, 2);
            assert_eq!(platforms, 2);
            break;
        }
    }

    let central = fixture.state.snapshot().central.unwrap();
    for game in &central.collection {
        assert!(
            central.images.contains_platform(&game.platform),
            "platform {} missing from image index",
            game.platform
        );
    }
    assert_eq!(
        central.images.thumbnail("snes", "smw"),
        Some(root.join("images/snes/smw.png"))
    );

    fixture.shell.shutdown();
}

#[tokio::test]
async fn test_shutdown_before_settle_discards_load_result() {
    let library = TempDir::new().unwrap();
    let root = utf8_path(&library);
    write_manifest(&root, "snes.yaml", "games:\n  - {id: smw, title: SMW}\n");

    let fixture = build_shell(library);
    fixture.shell.start();
    // Current-thread runtime: the spawned chain cannot have run yet, so the
    // cancellation is observed when it settles.
    fixture.shell.shutdown();
    fixture.shell.load_settled().await;

    assert!(!fixture.state.snapshot().has_central());
}

#[tokio::test]
async fn test_log_snapshots_replace_and_stop_after_shutdown() {
    let library = TempDir::new().unwrap();

    let fixture = build_shell(library);
    fixture.channel.publish("line0");
    fixture.shell.start();
    fixture.shell.load_settled().await;

    // Replay delivered the pre-attach snapshot
    assert_eq!(fixture.state.read(|s| s.log_text.clone()), "line0");

    fixture.channel.publish("line1");
    fixture.channel.publish("line2");
    assert_eq!(fixture.state.read(|s| s.log_text.clone()), "line2");

    fixture.shell.shutdown();
    fixture.channel.publish("line3");
    assert_eq!(
        fixture.state.read(|s| s.log_text.clone()),
        "line2",
        "no snapshot may be applied after detach"
    );
}

#[tokio::test]
async fn test_preference_write_through_persists_to_store() {
    let library = TempDir::new().unwrap();
    let config_temp = TempDir::new().unwrap();
    let config_dir = utf8_path(&config_temp);
    let config_manager = Arc::new(ConfigManager::new(&config_dir).unwrap());

    let config = LauncherConfig {
        root_path: utf8_path(&library).to_string(),
        ..LauncherConfig::default()
    };
    let state = StateManager::new();
    let shell = LauncherShell::new(
        config,
        state.clone(),
        config_manager,
        Arc::new(InProcessLogChannel::new()) as Arc<dyn LogChannel>,
        tokio::runtime::Handle::current(),
    );

    shell.preferences().set_game_scale(1.5).unwrap();

    // Live value
    assert_eq!(state.read(|s| s.preferences.game_scale), 1.5);
    // Persisted read-back through a completely fresh store
    let fresh = ConfigManager::new(&config_dir).unwrap();
    assert_eq!(fresh.load_preferences().unwrap().game_scale, 1.5);
}

#[tokio::test]
async fn test_second_start_is_ignored() {
    let library = TempDir::new().unwrap();
    let root = utf8_path(&library);
    write_manifest(&root, "snes.yaml", "games:\n  - {id: smw, title: SMW}\n");

    let fixture = build_shell(library);
    fixture.shell.start();
    fixture.shell.start();
    fixture.shell.load_settled().await;

    assert_eq!(fixture.state.snapshot().game_count(), 1);
    fixture.shell.shutdown();
}
