//! Character record types.
//!
//! The `Character` record mirrors the sheet a player fills in: identity,
//! class and level, the six ability scores, and the derived combat numbers.
//! Derived fields are never edited directly; they are recomputed through
//! [`crate::stats`] after every relevant mutation.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CharacterId(pub Uuid);

impl CharacterId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CharacterId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CharacterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The six ability scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ability {
    Strength,
    Dexterity,
    Constitution,
    Intelligence,
    Wisdom,
    Charisma,
}

impl Ability {
    pub fn abbreviation(&self) -> &'static str {
        match self {
            Ability::Strength => "STR",
            Ability::Dexterity => "DEX",
            Ability::Constitution => "CON",
            Ability::Intelligence => "INT",
            Ability::Wisdom => "WIS",
            Ability::Charisma => "CHA",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Ability::Strength => "Strength",
            Ability::Dexterity => "Dexterity",
            Ability::Constitution => "Constitution",
            Ability::Intelligence => "Intelligence",
            Ability::Wisdom => "Wisdom",
            Ability::Charisma => "Charisma",
        }
    }

    pub fn all() -> [Ability; 6] {
        [
            Ability::Strength,
            Ability::Dexterity,
            Ability::Constitution,
            Ability::Intelligence,
            Ability::Wisdom,
            Ability::Charisma,
        ]
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.abbreviation())
    }
}

/// Ability scores container.
///
/// Scores are plain integers. The conventional [3, 20] range is a
/// presentation concern; the calculators in [`crate::stats`] accept any
/// value, so manual edits should go through [`AbilityScores::set_clamped`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityScores {
    pub strength: i32,
    pub dexterity: i32,
    pub constitution: i32,
    pub intelligence: i32,
    pub wisdom: i32,
    pub charisma: i32,
}

impl AbilityScores {
    pub fn new(str: i32, dex: i32, con: i32, int: i32, wis: i32, cha: i32) -> Self {
        Self {
            strength: str,
            dexterity: dex,
            constitution: con,
            intelligence: int,
            wisdom: wis,
            charisma: cha,
        }
    }

    pub fn get(&self, ability: Ability) -> i32 {
        match ability {
            Ability::Strength => self.strength,
            Ability::Dexterity => self.dexterity,
            Ability::Constitution => self.constitution,
            Ability::Intelligence => self.intelligence,
            Ability::Wisdom => self.wisdom,
            Ability::Charisma => self.charisma,
        }
    }

    pub fn set(&mut self, ability: Ability, value: i32) {
        match ability {
            Ability::Strength => self.strength = value,
            Ability::Dexterity => self.dexterity = value,
            Ability::Constitution => self.constitution = value,
            Ability::Intelligence => self.intelligence = value,
            Ability::Wisdom => self.wisdom = value,
            Ability::Charisma => self.charisma = value,
        }
    }

    /// Set a score clamped to the [3, 20] range used for manual sheet edits.
    pub fn set_clamped(&mut self, ability: Ability, value: i32) {
        self.set(ability, value.clamp(3, 20));
    }

    /// The modifier for one ability: `floor((score - 10) / 2)`.
    pub fn modifier(&self, ability: Ability) -> i32 {
        crate::stats::ability_modifier(self.get(ability))
    }
}

impl Default for AbilityScores {
    fn default() -> Self {
        Self::new(10, 10, 10, 10, 10, 10)
    }
}

/// Hit points tracking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitPoints {
    pub current: i32,
    pub maximum: i32,
    pub temporary: i32,
}

impl HitPoints {
    /// Full health at the given maximum, no temporary hit points.
    pub fn new(maximum: i32) -> Self {
        Self {
            current: maximum,
            maximum,
            temporary: 0,
        }
    }
}

/// A carried piece of equipment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentItem {
    pub name: String,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl EquipmentItem {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quantity: 1,
            description: None,
        }
    }
}

/// A complete character sheet.
///
/// `class` is a free-form string: the hit-die table in [`crate::class_data`]
/// falls back to a d8 for names it does not recognize, so an unknown class
/// still flows through every calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub id: CharacterId,
    /// Opaque owner key used for per-player listing; set by the store.
    pub owner: String,
    pub name: String,
    pub race: String,
    pub class: String,
    pub level: i32,
    pub background: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backstory: Option<String>,

    pub ability_scores: AbilityScores,

    // Derived; recomputed as a unit, never patched field by field.
    pub hit_points: HitPoints,
    pub armor_class: i32,
    pub proficiency_bonus: i32,
    pub saving_throws: HashMap<Ability, i32>,

    pub saving_throw_proficiencies: HashSet<Ability>,
    pub equipment: Vec<EquipmentItem>,

    /// Unix-seconds timestamp, stamped by the store on create.
    #[serde(default)]
    pub created_at: String,
}

impl Character {
    /// A blank level-1 sheet with all scores at 10.
    ///
    /// The derived fields start at their all-tens baseline (8 max HP from
    /// the default d8 hit die, AC 10, proficiency +2).
    pub fn new(name: impl Into<String>) -> Self {
        let mut character = Self {
            id: CharacterId::new(),
            owner: String::new(),
            name: name.into(),
            race: String::new(),
            class: String::new(),
            level: 1,
            background: String::new(),
            backstory: None,
            ability_scores: AbilityScores::default(),
            hit_points: HitPoints::new(8),
            armor_class: 10,
            proficiency_bonus: 2,
            saving_throws: HashMap::new(),
            saving_throw_proficiencies: HashSet::new(),
            equipment: Vec::new(),
            created_at: String::new(),
        };
        crate::stats::recompute(&mut character, crate::stats::HpPolicy::Reset);
        character
    }

    /// Whether the sheet has everything a game room requires before the
    /// player can mark themselves ready.
    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty()
            && !self.race.is_empty()
            && !self.class.is_empty()
            && !self.background.is_empty()
    }
}
