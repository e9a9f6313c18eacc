use serde::{Deserialize, Serialize};

/// One parsed game record, stamped with the platform it was resolved under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    pub id: String,
    pub title: String,
    pub platform: String,
    /// Relative path of the launchable file, empty when the manifest omits it.
    pub rom_path: String,
}

/// The full ordered set of parsed game records.
///
/// Ordered by platform-resolution order, then by manifest order within
/// each platform.
pub type GameCollection = Vec<Game>;

/// Parse target for one platform manifest file (`<root>/platforms/<id>.yaml`).
///
/// The platform identifier is the manifest's file stem, not a field, so a
/// manifest cannot disagree with the name it was resolved under.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformManifest {
    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub games: Vec<GameEntry>,
}

/// One game entry as written in a platform manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameEntry {
    pub id: String,
    pub title: String,

    #[serde(default)]
    pub rom_path: String,
}

impl PlatformManifest {
    /// Convert manifest entries into game records stamped with `platform`.
    pub fn into_games(self, platform: &str) -> Vec<Game> {
        self.games
            .into_iter()
            .map(|entry| Game {
                id: entry.id,
                title: entry.title,
                platform: platform.to_string(),
                rom_path: entry.rom_path,
            })
            .collect()
    }
}
