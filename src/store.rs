//! Character storage.
//!
//! The store is an explicit instance the application layer owns, created
//! at startup and dropped at shutdown, keyed by character id. `create` and
//! `update` are the two write paths the sheet editor uses, and each applies
//! the matching hit-point policy: a fresh sheet starts at full health, an
//! edited sheet keeps its health fraction.

use crate::character::{AbilityScores, Character, CharacterId, EquipmentItem};
use crate::persist::unix_timestamp;
use crate::stats::{self, HpPolicy};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use tracing::debug;

/// Errors from store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("No character with id {0}")]
    NotFound(CharacterId),
}

/// A partial update to a character, merge semantics: unset fields keep
/// their stored value. Touching level, class, or ability scores triggers a
/// derived-stat recompute before the record is written back.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CharacterPatch {
    pub name: Option<String>,
    pub race: Option<String>,
    pub class: Option<String>,
    pub level: Option<i32>,
    pub background: Option<String>,
    pub backstory: Option<String>,
    pub ability_scores: Option<AbilityScores>,
    pub equipment: Option<Vec<EquipmentItem>>,
}

impl CharacterPatch {
    /// Whether this patch changes an input of the derived-stat formulas.
    pub fn touches_derived(&self) -> bool {
        self.level.is_some() || self.class.is_some() || self.ability_scores.is_some()
    }

    fn apply(self, character: &mut Character) {
        if let Some(name) = self.name {
            character.name = name;
        }
        if let Some(race) = self.race {
            character.race = race;
        }
        if let Some(class) = self.class {
            character.class = class;
        }
        if let Some(level) = self.level {
            character.level = level;
        }
        if let Some(background) = self.background {
            character.background = background;
        }
        if let Some(backstory) = self.backstory {
            character.backstory = Some(backstory);
        }
        if let Some(scores) = self.ability_scores {
            character.ability_scores = scores;
        }
        if let Some(equipment) = self.equipment {
            character.equipment = equipment;
        }
    }
}

/// Keyed character storage: `get`/`put`/`delete`/`list` by id, plus the
/// editor-facing operations built on top of them.
pub trait CharacterStore {
    fn get(&self, id: &CharacterId) -> Option<&Character>;
    fn put(&mut self, character: Character);
    fn delete(&mut self, id: &CharacterId) -> bool;
    fn list(&self) -> Vec<&Character>;

    /// Insert a new character for `owner`: fresh id, creation timestamp,
    /// derived stats recomputed with the full-health policy.
    fn create(&mut self, owner: &str, mut character: Character) -> CharacterId {
        character.id = CharacterId::new();
        character.owner = owner.to_string();
        character.created_at = unix_timestamp();
        stats::recompute(&mut character, HpPolicy::Reset);

        let id = character.id;
        debug!(%id, owner, name = %character.name, "created character");
        self.put(character);
        id
    }

    /// Characters belonging to one owner.
    fn list_by_owner(&self, owner: &str) -> Vec<&Character> {
        self.list()
            .into_iter()
            .filter(|c| c.owner == owner)
            .collect()
    }

    /// Merge a patch into a stored character and return the updated record.
    ///
    /// The derived set is adopted atomically: the caller never observes a
    /// record whose armor class reflects the patch but whose hit points do
    /// not.
    fn update(&mut self, id: &CharacterId, patch: CharacterPatch) -> Result<Character, StoreError> {
        let mut character = self.get(id).ok_or(StoreError::NotFound(*id))?.clone();

        let recompute = patch.touches_derived();
        patch.apply(&mut character);
        if recompute {
            stats::recompute(&mut character, HpPolicy::PreserveRatio);
        }

        debug!(%id, recompute, "updated character");
        self.put(character.clone());
        Ok(character)
    }

    /// Copy a stored character under a fresh id.
    fn duplicate(
        &mut self,
        id: &CharacterId,
        new_name: Option<&str>,
    ) -> Result<CharacterId, StoreError> {
        let mut copy = self.get(id).ok_or(StoreError::NotFound(*id))?.clone();
        copy.id = CharacterId::new();
        copy.created_at = unix_timestamp();
        copy.name = match new_name {
            Some(name) => name.to_string(),
            None => format!("{} (copy)", copy.name),
        };

        let new_id = copy.id;
        debug!(source = %id, %new_id, "duplicated character");
        self.put(copy);
        Ok(new_id)
    }
}

/// In-memory store backing the editor and game lobby.
#[derive(Debug, Default)]
pub struct MemoryStore {
    characters: HashMap<CharacterId, Character>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clone out every record, e.g. for a roster snapshot.
    pub fn snapshot(&self) -> Vec<Character> {
        let mut characters: Vec<Character> = self.characters.values().cloned().collect();
        characters.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        characters
    }

    /// Replace the contents with a previously snapshotted roster.
    pub fn restore(&mut self, characters: Vec<Character>) {
        self.characters = characters.into_iter().map(|c| (c.id, c)).collect();
    }

    pub fn len(&self) -> usize {
        self.characters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }
}

impl CharacterStore for MemoryStore {
    fn get(&self, id: &CharacterId) -> Option<&Character> {
        self.characters.get(id)
    }

    fn put(&mut self, character: Character) {
        self.characters.insert(character.id, character);
    }

    fn delete(&mut self, id: &CharacterId) -> bool {
        let removed = self.characters.remove(id).is_some();
        if removed {
            debug!(%id, "deleted character");
        }
        removed
    }

    fn list(&self) -> Vec<&Character> {
        self.characters.values().collect()
    }
}

/// Record of a campaign the player has joined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignRecord {
    pub code: String,
    pub name: String,
    pub joined_at: String,
}

/// The campaigns a player has joined, most recent last.
///
/// Joining the same room code twice keeps the first record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CampaignLog {
    records: Vec<CampaignRecord>,
}

impl CampaignLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<CampaignRecord>) -> Self {
        Self { records }
    }

    /// Record a joined campaign; duplicate codes are ignored.
    pub fn join(&mut self, code: impl Into<String>, name: impl Into<String>) {
        let code = code.into();
        if self.records.iter().any(|r| r.code == code) {
            return;
        }
        debug!(%code, "joined campaign");
        self.records.push(CampaignRecord {
            code,
            name: name.into(),
            joined_at: unix_timestamp(),
        });
    }

    pub fn records(&self) -> &[CampaignRecord] {
        &self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::Ability;

    fn sample_fighter() -> Character {
        let mut character = Character::new("Thorin");
        character.race = "Dwarf".to_string();
        character.class = "Fighter".to_string();
        character.level = 3;
        character.background = "Soldier".to_string();
        character.ability_scores = AbilityScores::new(15, 13, 14, 10, 12, 8);
        character
    }

    #[test]
    fn test_create_assigns_id_and_resets_health() {
        let mut store = MemoryStore::new();
        let id = store.create("player-1", sample_fighter());

        let stored = store.get(&id).unwrap();
        assert_eq!(stored.owner, "player-1");
        // d10 at level 3, CON 14: 10 + 2 + 2 * (5 + 1 + 2)
        assert_eq!(stored.hit_points.maximum, 28);
        assert_eq!(stored.hit_points.current, 28);
        assert_eq!(stored.proficiency_bonus, 2);
        assert!(!stored.created_at.is_empty());
    }

    #[test]
    fn test_update_merges_and_preserves_ratio() {
        let mut store = MemoryStore::new();
        let id = store.create("player-1", sample_fighter());

        // Drop to half health, then level up
        let mut wounded = store.get(&id).unwrap().clone();
        wounded.hit_points.current = 14;
        store.put(wounded);

        let updated = store
            .update(
                &id,
                CharacterPatch {
                    level: Some(4),
                    ..Default::default()
                },
            )
            .unwrap();

        // New max 36; half health carries over
        assert_eq!(updated.hit_points.maximum, 36);
        assert_eq!(updated.hit_points.current, 18);
        // Untouched fields survive the merge
        assert_eq!(updated.name, "Thorin");
        assert_eq!(updated.race, "Dwarf");
        assert_eq!(updated.ability_scores.strength, 15);
    }

    #[test]
    fn test_update_without_derived_inputs_keeps_health() {
        let mut store = MemoryStore::new();
        let id = store.create("player-1", sample_fighter());

        let mut wounded = store.get(&id).unwrap().clone();
        wounded.hit_points.current = 5;
        store.put(wounded);

        let updated = store
            .update(
                &id,
                CharacterPatch {
                    backstory: Some("Left the army after the siege.".to_string()),
                    equipment: Some(vec![EquipmentItem::new("Warhammer")]),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.hit_points.current, 5);
        assert_eq!(
            updated.backstory.as_deref(),
            Some("Left the army after the siege.")
        );
        assert_eq!(updated.equipment[0].name, "Warhammer");
    }

    #[test]
    fn test_update_missing_character() {
        let mut store = MemoryStore::new();
        let missing = CharacterId::new();
        assert!(matches!(
            store.update(&missing, CharacterPatch::default()),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn test_list_by_owner_scopes() {
        let mut store = MemoryStore::new();
        store.create("alice", sample_fighter());
        store.create("alice", Character::new("Elara"));
        store.create("bob", Character::new("Mordai"));

        assert_eq!(store.list_by_owner("alice").len(), 2);
        assert_eq!(store.list_by_owner("bob").len(), 1);
        assert!(store.list_by_owner("carol").is_empty());
        assert_eq!(store.list().len(), 3);
    }

    #[test]
    fn test_duplicate_gets_fresh_id() {
        let mut store = MemoryStore::new();
        let id = store.create("alice", sample_fighter());

        let copy_id = store.duplicate(&id, None).unwrap();
        assert_ne!(copy_id, id);
        assert_eq!(store.get(&copy_id).unwrap().name, "Thorin (copy)");

        let renamed_id = store.duplicate(&id, Some("Dain")).unwrap();
        assert_eq!(store.get(&renamed_id).unwrap().name, "Dain");
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_delete() {
        let mut store = MemoryStore::new();
        let id = store.create("alice", sample_fighter());
        assert!(store.delete(&id));
        assert!(!store.delete(&id));
        assert!(store.get(&id).is_none());
    }

    #[test]
    fn test_create_computes_saving_throws() {
        let mut store = MemoryStore::new();
        let mut character = sample_fighter();
        character.saving_throw_proficiencies.insert(Ability::Strength);
        character
            .saving_throw_proficiencies
            .insert(Ability::Constitution);
        let id = store.create("alice", character);

        let stored = store.get(&id).unwrap();
        assert_eq!(stored.saving_throws[&Ability::Strength], 2 + 2);
        assert_eq!(stored.saving_throws[&Ability::Constitution], 2 + 2);
        assert_eq!(stored.saving_throws[&Ability::Charisma], -1);
    }

    #[test]
    fn test_campaign_log_ignores_duplicate_codes() {
        let mut log = CampaignLog::new();
        log.join("ABCD", "The Sunken Keep");
        log.join("EFGH", "Mines of Kheled");
        log.join("ABCD", "Renamed Keep");

        assert_eq!(log.records().len(), 2);
        assert_eq!(log.records()[0].name, "The Sunken Keep");
    }
}
