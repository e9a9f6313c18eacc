//! Thumbnail index for the game library.
//!
//! Maps platform identifiers to thumbnail file locations under
//! `<root>/images/<platform>/`, so the browse view can resolve a thumbnail
//! by `(platform, game id)` without rescanning the filesystem per lookup.
//! Only file locations are indexed; image bytes are never read here.

use camino::{Utf8Path, Utf8PathBuf};
use indexmap::IndexMap;
use std::fs;

/// Indexed thumbnail locations for one platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformImages {
    dir: Utf8PathBuf,
    /// Sorted thumbnail file names found in `dir` at registration time.
    files: Vec<String>,
}

/// Lookup structure from platform identifier to thumbnail locations.
///
/// Created once at shell construction and only ever grown: platforms are
/// registered incrementally as the collection load resolves them, and
/// re-registering a known platform is a no-op.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageIndex {
    image_root: Utf8PathBuf,
    platforms: IndexMap<String, PlatformImages>,
}

impl ImageIndex {
    /// Create an empty index rooted at `<root>/images`.
    pub fn new<P: AsRef<Utf8Path>>(root: P) -> Self {
        Self {
            image_root: root.as_ref().join("images"),
            platforms: IndexMap::new(),
        }
    }

    /// Register platforms in the given order, listing each platform's
    /// thumbnail directory once.
    ///
    /// Idempotent: names already registered are skipped, so repeated calls
    /// with overlapping names never produce duplicate entries. A missing
    /// directory registers the platform with an empty file list rather than
    /// failing - the library stays browsable without artwork.
    pub fn add_platforms<S: AsRef<str>>(&mut self, names: &[S]) {
        for name in names {
            let name = name.as_ref();
            if self.platforms.contains_key(name) {
                continue;
            }

            let dir = self.image_root.join(name);
            let files = list_file_names(&dir);

            tracing::debug!(
                "Registered platform {} with {} thumbnail(s)",
                name,
                files.len()
            );
            self.platforms
                .insert(name.to_string(), PlatformImages { dir, files });
        }
    }

    /// Resolve the thumbnail location for a game without touching the
    /// filesystem.
    ///
    /// Matches any indexed file whose stem equals `game_id`, so the image
    /// format is up to whoever populated the directory.
    pub fn thumbnail(&self, platform: &str, game_id: &str) -> Option<Utf8PathBuf> {
        let images = self.platforms.get(platform)?;
        images
            .files
            .iter()
            .find(|file| Utf8Path::new(file).file_stem() == Some(game_id))
            .map(|file| images.dir.join(file))
    }

    pub fn contains_platform(&self, name: &str) -> bool {
        self.platforms.contains_key(name)
    }

    pub fn platform_count(&self) -> usize {
        self.platforms.len()
    }

    /// Registered platform identifiers, in registration order.
    pub fn platform_names(&self) -> impl Iterator<Item = &str> {
        self.platforms.keys().map(String::as_str)
    }
}

/// List the file names directly under `dir`, sorted for determinism.
///
/// An unreadable or missing directory yields an empty list.
fn list_file_names(dir: &Utf8Path) -> Vec<String> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::debug!("No thumbnail directory at {}: {}", dir, e);
            return Vec::new();
        }
    };

    let mut files: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
        .filter_map(|entry| entry.file_name().into_string().ok())
        .collect();

    files.sort();
    files
}
