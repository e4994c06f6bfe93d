//! Static 5e data for character creation.
//!
//! Class names are matched as plain strings so a homebrew class still
//! produces a working sheet: the hit-die lookup falls back to a d8 and the
//! quick-start preset becomes a no-op.

use crate::character::{Ability, AbilityScores};

/// The twelve PHB classes, in picker order.
pub const CLASSES: [&str; 12] = [
    "Barbarian",
    "Bard",
    "Cleric",
    "Druid",
    "Fighter",
    "Monk",
    "Paladin",
    "Ranger",
    "Rogue",
    "Sorcerer",
    "Warlock",
    "Wizard",
];

/// The PHB races, in picker order.
pub const RACES: [&str; 9] = [
    "Human",
    "Elf",
    "Dwarf",
    "Halfling",
    "Dragonborn",
    "Gnome",
    "Half-Elf",
    "Half-Orc",
    "Tiefling",
];

/// The PHB backgrounds, in picker order.
pub const BACKGROUNDS: [&str; 12] = [
    "Acolyte",
    "Criminal",
    "Folk Hero",
    "Noble",
    "Sage",
    "Soldier",
    "Charlatan",
    "Entertainer",
    "Guild Artisan",
    "Hermit",
    "Outlander",
    "Sailor",
];

/// Hit die size per class. Unknown names get a d8.
pub fn hit_die(class: &str) -> i32 {
    match class {
        "Barbarian" => 12,
        "Fighter" | "Paladin" | "Ranger" => 10,
        "Monk" | "Bard" | "Cleric" | "Druid" | "Rogue" | "Warlock" => 8,
        "Sorcerer" | "Wizard" => 6,
        _ => 8,
    }
}

/// Suggested starting scores for the three abilities a class leans on.
pub fn class_base_stats(class: &str) -> Option<[(Ability, i32); 3]> {
    use Ability::*;
    Some(match class {
        "Barbarian" | "Fighter" => [(Strength, 15), (Constitution, 14), (Dexterity, 13)],
        "Paladin" => [(Strength, 15), (Charisma, 14), (Constitution, 13)],
        "Ranger" | "Monk" => [(Dexterity, 15), (Wisdom, 14), (Constitution, 13)],
        "Rogue" => [(Dexterity, 15), (Intelligence, 14), (Charisma, 13)],
        "Bard" => [(Charisma, 15), (Dexterity, 14), (Intelligence, 13)],
        "Cleric" => [(Wisdom, 15), (Constitution, 14), (Strength, 13)],
        "Druid" => [(Wisdom, 15), (Constitution, 14), (Dexterity, 13)],
        "Sorcerer" | "Warlock" => [(Charisma, 15), (Constitution, 14), (Dexterity, 13)],
        "Wizard" => [(Intelligence, 15), (Constitution, 14), (Dexterity, 13)],
        _ => return None,
    })
}

/// Overlay a class's suggested scores onto existing ones.
///
/// Exactly the abilities named in the preset are overwritten; the other
/// three keep whatever the player had. Unknown classes change nothing.
pub fn apply_base_stats(scores: &AbilityScores, class: &str) -> AbilityScores {
    let mut out = scores.clone();
    if let Some(preset) = class_base_stats(class) {
        for (ability, value) in preset {
            out.set(ability, value);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_classes_have_hit_dice() {
        for class in CLASSES {
            let die = hit_die(class);
            assert!([6, 8, 10, 12].contains(&die), "{class} -> d{die}");
        }
        assert_eq!(hit_die("Barbarian"), 12);
        assert_eq!(hit_die("Wizard"), 6);
        assert_eq!(hit_die("Artificer"), 8);
    }

    #[test]
    fn test_all_classes_have_base_stats() {
        for class in CLASSES {
            assert!(class_base_stats(class).is_some(), "{class} has no preset");
        }
        assert!(class_base_stats("Artificer").is_none());
    }

    #[test]
    fn test_fighter_preset_overwrites_only_named_abilities() {
        let scores = AbilityScores::new(8, 9, 11, 12, 17, 18);
        let applied = apply_base_stats(&scores, "Fighter");

        assert_eq!(applied.strength, 15);
        assert_eq!(applied.constitution, 14);
        assert_eq!(applied.dexterity, 13);
        // The other three are exactly as supplied
        assert_eq!(applied.intelligence, 12);
        assert_eq!(applied.wisdom, 17);
        assert_eq!(applied.charisma, 18);
    }

    #[test]
    fn test_unknown_class_preset_is_a_noop() {
        let scores = AbilityScores::new(8, 9, 11, 12, 17, 18);
        assert_eq!(apply_base_stats(&scores, "Bloodhunter"), scores);
    }

    #[test]
    fn test_wizard_preset() {
        let applied = apply_base_stats(&AbilityScores::default(), "Wizard");
        assert_eq!(applied.intelligence, 15);
        assert_eq!(applied.constitution, 14);
        assert_eq!(applied.dexterity, 13);
        assert_eq!(applied.strength, 10);
    }
}
