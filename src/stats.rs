//! Derived-statistics calculator.
//!
//! Pure functions over a character sheet: ability modifiers, proficiency
//! bonus, armor class, maximum hit points, and saving-throw bonuses. The
//! functions here are total over `i32`: out-of-range levels and scores
//! degrade through the arithmetic instead of raising errors, so callers
//! wanting UI-level bounds must clamp before invoking.

use crate::character::{Ability, AbilityScores, Character, HitPoints};
use crate::class_data;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// The modifier for an ability score: `floor((score - 10) / 2)`.
///
/// Floor division toward negative infinity, so a score of 7 gives −2.
pub fn ability_modifier(score: i32) -> i32 {
    (score - 10).div_euclid(2)
}

/// Proficiency bonus for a level: `ceil(level / 4) + 1`.
///
/// Levels 1–4 give +2, 5–8 give +3, up to +6 at 17–20.
pub fn proficiency_bonus(level: i32) -> i32 {
    (level + 3).div_euclid(4) + 1
}

/// Unarmored baseline armor class: `10 + DEX modifier`.
pub fn armor_class(dexterity: i32) -> i32 {
    10 + ability_modifier(dexterity)
}

/// Maximum hit points: max roll at level 1, average rounded up thereafter.
///
/// `hit_die + con_mod + (level - 1) * (hit_die / 2 + 1 + con_mod)`
///
/// The raw result is returned as-is: a low enough constitution at high
/// level drives it negative, and that is the sheet the player gets.
pub fn max_hit_points(level: i32, constitution: i32, class: &str) -> i32 {
    let hit_die = class_data::hit_die(class);
    let con_mod = ability_modifier(constitution);
    hit_die + con_mod + (level - 1) * (hit_die / 2 + 1 + con_mod)
}

/// Saving-throw bonus for one ability.
pub fn saving_throw_bonus(score: i32, proficient: bool, proficiency_bonus: i32) -> i32 {
    ability_modifier(score) + if proficient { proficiency_bonus } else { 0 }
}

/// Saving-throw bonuses for all six abilities.
pub fn saving_throws(
    scores: &AbilityScores,
    proficiencies: &HashSet<Ability>,
    proficiency_bonus: i32,
) -> HashMap<Ability, i32> {
    Ability::all()
        .into_iter()
        .map(|ability| {
            (
                ability,
                saving_throw_bonus(
                    scores.get(ability),
                    proficiencies.contains(&ability),
                    proficiency_bonus,
                ),
            )
        })
        .collect()
}

/// What happens to current hit points when the maximum changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HpPolicy {
    /// Fresh sheet: current = maximum, temporary cleared.
    Reset,
    /// Existing sheet: keep the fraction of health, floored, at least 1.
    /// Temporary hit points are untouched.
    PreserveRatio,
}

/// The complete derived-field set, computed together so a caller can adopt
/// it atomically, with no frame where armor class reflects a new dexterity
/// but maximum HP still reflects the old constitution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedStats {
    pub proficiency_bonus: i32,
    pub armor_class: i32,
    pub hit_points: HitPoints,
    pub saving_throws: HashMap<Ability, i32>,
}

impl DerivedStats {
    pub fn apply(self, character: &mut Character) {
        character.proficiency_bonus = self.proficiency_bonus;
        character.armor_class = self.armor_class;
        character.hit_points = self.hit_points;
        character.saving_throws = self.saving_throws;
    }
}

/// Compute every derived field from the sheet's level, class, ability
/// scores, and saving-throw proficiencies.
pub fn derive(character: &Character, policy: HpPolicy) -> DerivedStats {
    let proficiency = proficiency_bonus(character.level);
    let new_maximum = max_hit_points(
        character.level,
        character.ability_scores.constitution,
        &character.class,
    );

    let hit_points = match policy {
        HpPolicy::Reset => HitPoints::new(new_maximum),
        HpPolicy::PreserveRatio => {
            let old = &character.hit_points;
            let ratio = old.current as f64 / old.maximum as f64;
            HitPoints {
                current: ((new_maximum as f64 * ratio).floor() as i32).max(1),
                maximum: new_maximum,
                temporary: old.temporary,
            }
        }
    };

    DerivedStats {
        proficiency_bonus: proficiency,
        armor_class: armor_class(character.ability_scores.dexterity),
        hit_points,
        saving_throws: saving_throws(
            &character.ability_scores,
            &character.saving_throw_proficiencies,
            proficiency,
        ),
    }
}

/// Recompute and adopt all derived fields in place.
pub fn recompute(character: &mut Character, policy: HpPolicy) {
    derive(character, policy).apply(character);
}
