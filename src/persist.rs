//! Roster persistence for save/load functionality.
//!
//! Serializes the character store and campaign log to a versioned JSON
//! file, the same shape a browser build keeps in local storage.

use crate::character::Character;
use crate::store::{CampaignLog, CampaignRecord, MemoryStore};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tokio::fs;
use tracing::info;

/// Errors from persistence operations.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },
}

/// Current save file version.
const SAVE_VERSION: u32 = 1;

/// A saved roster: every character plus the campaign log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterSnapshot {
    /// Save format version for compatibility checking.
    pub version: u32,

    /// When the snapshot was taken (unix seconds).
    pub saved_at: String,

    pub characters: Vec<Character>,
    pub campaigns: Vec<CampaignRecord>,

    /// Summary fields readable without deserializing the full roster.
    pub metadata: RosterMetadata,
}

/// Cheap-to-read summary of a save file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterMetadata {
    pub character_count: usize,
    pub campaign_count: usize,
    #[serde(default)]
    pub saved_at: String,
}

impl RosterSnapshot {
    /// Snapshot a store and campaign log.
    pub fn new(store: &MemoryStore, campaigns: &CampaignLog) -> Self {
        let characters = store.snapshot();
        let campaigns = campaigns.records().to_vec();
        let saved_at = unix_timestamp();

        let metadata = RosterMetadata {
            character_count: characters.len(),
            campaign_count: campaigns.len(),
            saved_at: saved_at.clone(),
        };

        Self {
            version: SAVE_VERSION,
            saved_at,
            characters,
            campaigns,
            metadata,
        }
    }

    /// Rebuild the store and campaign log this snapshot was taken from.
    pub fn restore(self) -> (MemoryStore, CampaignLog) {
        let mut store = MemoryStore::new();
        store.restore(self.characters);
        (store, CampaignLog::from_records(self.campaigns))
    }

    /// Save to a JSON file.
    pub async fn save_json(&self, path: impl AsRef<Path>) -> Result<(), PersistError> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(&path, content).await?;
        info!(
            path = %path.as_ref().display(),
            characters = self.metadata.character_count,
            "saved roster"
        );
        Ok(())
    }

    /// Load from a JSON file, rejecting other format versions.
    pub async fn load_json(path: impl AsRef<Path>) -> Result<Self, PersistError> {
        let content = fs::read_to_string(&path).await?;
        let snapshot: Self = serde_json::from_str(&content)?;

        if snapshot.version != SAVE_VERSION {
            return Err(PersistError::VersionMismatch {
                expected: SAVE_VERSION,
                found: snapshot.version,
            });
        }

        info!(
            path = %path.as_ref().display(),
            characters = snapshot.metadata.character_count,
            "loaded roster"
        );
        Ok(snapshot)
    }

    /// Read a save file's metadata without loading the full roster.
    pub async fn peek_metadata(path: impl AsRef<Path>) -> Result<RosterMetadata, PersistError> {
        let content = fs::read_to_string(path).await?;

        #[derive(Deserialize)]
        struct Partial {
            version: u32,
            metadata: RosterMetadata,
        }

        let partial: Partial = serde_json::from_str(&content)?;

        if partial.version != SAVE_VERSION {
            return Err(PersistError::VersionMismatch {
                expected: SAVE_VERSION,
                found: partial.version,
            });
        }

        Ok(partial.metadata)
    }
}

/// Current unix-seconds timestamp as a string.
pub(crate) fn unix_timestamp() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();

    format!("{}", now.as_secs())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::CharacterStore;

    #[test]
    fn test_snapshot_counts() {
        let mut store = MemoryStore::new();
        store.create("alice", Character::new("Thorin"));
        store.create("alice", Character::new("Elara"));

        let mut campaigns = CampaignLog::new();
        campaigns.join("ABCD", "The Sunken Keep");

        let snapshot = RosterSnapshot::new(&store, &campaigns);
        assert_eq!(snapshot.version, 1);
        assert_eq!(snapshot.metadata.character_count, 2);
        assert_eq!(snapshot.metadata.campaign_count, 1);
    }

    #[test]
    fn test_snapshot_restore_roundtrip() {
        let mut store = MemoryStore::new();
        let id = store.create("alice", Character::new("Thorin"));
        let mut campaigns = CampaignLog::new();
        campaigns.join("ABCD", "The Sunken Keep");

        let snapshot = RosterSnapshot::new(&store, &campaigns);
        let json = serde_json::to_string(&snapshot).unwrap();
        let reloaded: RosterSnapshot = serde_json::from_str(&json).unwrap();
        let (restored_store, restored_campaigns) = reloaded.restore();

        assert_eq!(restored_store.get(&id), store.get(&id));
        assert_eq!(restored_campaigns.records(), campaigns.records());
    }

    #[test]
    fn test_version_field_serializes() {
        let snapshot = RosterSnapshot::new(&MemoryStore::new(), &CampaignLog::new());
        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.contains("\"version\":1"));
    }
}
