//! Two-stage asynchronous game-collection load.
//!
//! Stage 1 resolves the list of platform manifest names under
//! `<root>/platforms`; stage 2 parses each manifest, in resolved order, into
//! one unified collection. The stages are strictly sequential, and any
//! failure at either stage collapses the whole load to the empty-collection
//! fallback: the launcher must stay usable with zero games listed, so load
//! failures are logged to the diagnostic sink and never surfaced as a
//! blocking error. There is no partial success - a bad manifest in stage 2
//! discards games that parsed cleanly before it (deliberate simplification,
//! see DESIGN.md).

use crate::models::{GameCollection, PlatformManifest};
use camino::{Utf8Path, Utf8PathBuf};
use thiserror::Error;
use tokio::fs;

/// Failures the load pipeline can settle with.
///
/// Both variants collapse to the same recovery action: an empty collection
/// plus a diagnostic log line. Neither is retried.
#[derive(Error, Debug)]
pub enum CollectionError {
    #[error("failed to resolve platform sources under {path}: {source}")]
    SourceResolution {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to load platform source '{name}': {reason}")]
    SourceParse { name: String, reason: String },
}

/// Tagged result of one complete load: either the resolved platforms with
/// their merged collection, or the failure that triggered the fallback.
#[derive(Debug)]
pub enum LoadOutcome {
    Loaded {
        /// Platform identifiers in resolution order; also the registration
        /// order for the image index.
        platforms: Vec<String>,
        collection: GameCollection,
    },
    Failed(CollectionError),
}

impl LoadOutcome {
    /// Collapse to the fallback policy: resolved platforms and collection on
    /// success, both empty on any failure.
    pub fn into_parts(self) -> (Vec<String>, GameCollection) {
        match self {
            LoadOutcome::Loaded {
                platforms,
                collection,
            } => (platforms, collection),
            LoadOutcome::Failed(_) => (Vec::new(), GameCollection::new()),
        }
    }
}

/// Two-stage loader for the on-disk game catalog.
#[derive(Debug, Default)]
pub struct CollectionLoader;

impl CollectionLoader {
    pub fn new() -> Self {
        Self
    }

    /// Run both stages sequentially and settle with a tagged outcome.
    ///
    /// Never returns a bare error: stage failures are logged and folded into
    /// [`LoadOutcome::Failed`], which callers map to the empty collection.
    pub async fn load(&self, root: &Utf8Path) -> LoadOutcome {
        let names = match self.list_platform_sources(root).await {
            Ok(names) => names,
            Err(e) => {
                tracing::warn!("Platform source resolution failed: {}", e);
                return LoadOutcome::Failed(e);
            }
        };

        tracing::info!("Resolved {} platform source(s) under {}", names.len(), root);

        match self.load_platforms(root, &names).await {
            Ok(collection) => {
                tracing::info!(
                    "Loaded {} game(s) across {} platform(s)",
                    collection.len(),
                    names.len()
                );
                LoadOutcome::Loaded {
                    platforms: names,
                    collection,
                }
            }
            Err(e) => {
                tracing::warn!("Platform source parse failed: {}", e);
                LoadOutcome::Failed(e)
            }
        }
    }

    /// Stage 1: resolve platform manifest names under `<root>/platforms`.
    ///
    /// Returns the manifest file stems, sorted lexicographically so the
    /// merge order is deterministic regardless of directory iteration order.
    pub async fn list_platform_sources(
        &self,
        root: &Utf8Path,
    ) -> Result<Vec<String>, CollectionError> {
        let dir = root.join("platforms");
        let resolution_err = |source| CollectionError::SourceResolution {
            path: dir.clone(),
            source,
        };

        let mut entries = fs::read_dir(&dir).await.map_err(resolution_err)?;

        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(resolution_err)? {
            let Ok(path) = Utf8PathBuf::from_path_buf(entry.path()) else {
                tracing::warn!("Skipping non-UTF-8 entry in {}", dir);
                continue;
            };

            let is_manifest = matches!(path.extension(), Some("yaml" | "yml"));
            if is_manifest && let Some(stem) = path.file_stem() {
                names.push(stem.to_string());
            }
        }

        names.sort();
        names.dedup();
        Ok(names)
    }

    /// Stage 2: parse each resolved manifest into game records, merged in
    /// resolution order.
    ///
    /// Aborts on the first unreadable or malformed manifest; the caller's
    /// fallback then applies to the whole collection.
    pub async fn load_platforms(
        &self,
        root: &Utf8Path,
        names: &[String],
    ) -> Result<GameCollection, CollectionError> {
        let dir = root.join("platforms");
        let mut collection = GameCollection::new();

        for name in names {
            let manifest = self.read_manifest(&dir, name).await?;
            collection.extend(manifest.into_games(name));
        }

        Ok(collection)
    }

    async fn read_manifest(
        &self,
        dir: &Utf8Path,
        name: &str,
    ) -> Result<PlatformManifest, CollectionError> {
        let parse_err = |reason: String| CollectionError::SourceParse {
            name: name.to_string(),
            reason,
        };

        // Stage 1 resolves stems, so either extension may back a name.
        let mut path = dir.join(format!("{name}.yaml"));
        let contents = match fs::read_to_string(&path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                path = dir.join(format!("{name}.yml"));
                fs::read_to_string(&path)
                    .await
                    .map_err(|e| parse_err(e.to_string()))?
            }
            Err(e) => return Err(parse_err(e.to_string())),
        };

        serde_yaml_ng::from_str(&contents).map_err(|e| parse_err(e.to_string()))
    }
}
