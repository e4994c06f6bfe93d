//! Dice rolling.
//!
//! Supports the notation the game room chat accepts (`1d20`, `2d6+3`,
//! `4d4-1`) plus the 4d6-drop-lowest ability-score procedure. All rolling
//! goes through [`RollSource`], so tests can script exact die sequences
//! instead of mocking a global RNG.

use crate::character::{Ability, AbilityScores};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error type for dice parsing.
#[derive(Debug, Error)]
pub enum DiceError {
    #[error("Invalid dice notation: {0}")]
    InvalidNotation(String),
    #[error("Invalid die size: {0}")]
    InvalidDieSize(u32),
    #[error("No dice specified")]
    NoDice,
}

/// A source of individual die rolls.
///
/// Implementations must return a value in `1..=sides`.
pub trait RollSource {
    fn roll_die(&mut self, sides: u32) -> u32;
}

/// [`RollSource`] backed by any `rand` RNG.
pub struct RandomSource<R>(R);

impl RandomSource<rand::rngs::ThreadRng> {
    /// The default source for gameplay rolls.
    pub fn from_entropy() -> Self {
        Self(rand::thread_rng())
    }
}

impl<R: Rng> RandomSource<R> {
    /// Wrap a specific RNG, e.g. a seeded one for reproducible sequences.
    pub fn new(rng: R) -> Self {
        Self(rng)
    }
}

impl<R: Rng> RollSource for RandomSource<R> {
    fn roll_die(&mut self, sides: u32) -> u32 {
        self.0.gen_range(1..=sides)
    }
}

/// Standard die sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DieKind {
    D4,
    D6,
    D8,
    D10,
    D12,
    D20,
    D100,
}

impl DieKind {
    pub fn sides(&self) -> u32 {
        match self {
            DieKind::D4 => 4,
            DieKind::D6 => 6,
            DieKind::D8 => 8,
            DieKind::D10 => 10,
            DieKind::D12 => 12,
            DieKind::D20 => 20,
            DieKind::D100 => 100,
        }
    }

    pub fn from_sides(sides: u32) -> Option<DieKind> {
        match sides {
            4 => Some(DieKind::D4),
            6 => Some(DieKind::D6),
            8 => Some(DieKind::D8),
            10 => Some(DieKind::D10),
            12 => Some(DieKind::D12),
            20 => Some(DieKind::D20),
            100 => Some(DieKind::D100),
            _ => None,
        }
    }
}

impl fmt::Display for DieKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "d{}", self.sides())
    }
}

/// A parsed dice expression: `count` dice of one kind plus a flat modifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceExpression {
    pub count: u32,
    pub die: DieKind,
    pub modifier: i32,
    pub original: String,
}

impl DiceExpression {
    /// Parse notation like `1d20`, `d8`, `2d6+3`, or `4d4-1`.
    pub fn parse(notation: &str) -> Result<Self, DiceError> {
        let cleaned: String = notation
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        if cleaned.is_empty() {
            return Err(DiceError::NoDice);
        }

        let d_pos = cleaned
            .find('d')
            .ok_or_else(|| DiceError::InvalidNotation(notation.to_string()))?;

        let count_str = &cleaned[..d_pos];
        let count: u32 = if count_str.is_empty() {
            1
        } else {
            count_str
                .parse()
                .map_err(|_| DiceError::InvalidNotation(notation.to_string()))?
        };

        let rest = &cleaned[d_pos + 1..];
        let (sides_str, modifier) = match rest.find(['+', '-']) {
            Some(sign_pos) => {
                let modifier: i32 = rest[sign_pos..]
                    .parse()
                    .map_err(|_| DiceError::InvalidNotation(notation.to_string()))?;
                (&rest[..sign_pos], modifier)
            }
            None => (rest, 0),
        };

        let sides: u32 = sides_str
            .parse()
            .map_err(|_| DiceError::InvalidNotation(notation.to_string()))?;
        let die = DieKind::from_sides(sides).ok_or(DiceError::InvalidDieSize(sides))?;

        Ok(DiceExpression {
            count,
            die,
            modifier,
            original: cleaned,
        })
    }

    /// Roll the expression against the given source.
    pub fn roll_with(&self, source: &mut impl RollSource) -> RollResult {
        let rolls: Vec<u32> = (0..self.count)
            .map(|_| source.roll_die(self.die.sides()))
            .collect();
        let dice_total: i32 = rolls.iter().map(|&r| r as i32).sum();

        // Natural 1/20 only means anything on a single d20
        let d20 = if self.count == 1 && self.die == DieKind::D20 {
            rolls.first().copied()
        } else {
            None
        };

        RollResult {
            notation: self.original.clone(),
            rolls,
            modifier: self.modifier,
            total: dice_total + self.modifier,
            natural_20: d20 == Some(20),
            natural_1: d20 == Some(1),
        }
    }

    /// Roll with the thread-local RNG.
    pub fn roll(&self) -> RollResult {
        self.roll_with(&mut RandomSource::from_entropy())
    }
}

impl FromStr for DiceExpression {
    type Err = DiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DiceExpression::parse(s)
    }
}

impl fmt::Display for DiceExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.original)
    }
}

/// Outcome of a dice roll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollResult {
    pub notation: String,
    pub rolls: Vec<u32>,
    pub modifier: i32,
    pub total: i32,
    pub natural_20: bool,
    pub natural_1: bool,
}

impl fmt::Display for RollResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rolls: Vec<String> = self.rolls.iter().map(|r| r.to_string()).collect();
        write!(f, "[{}]", rolls.join(", "))?;
        if self.modifier > 0 {
            write!(f, " + {}", self.modifier)?;
        } else if self.modifier < 0 {
            write!(f, " - {}", self.modifier.abs())?;
        }
        write!(f, " = {}", self.total)
    }
}

/// Convenience: parse and roll in one call.
pub fn roll(notation: &str) -> Result<RollResult, DiceError> {
    Ok(DiceExpression::parse(notation)?.roll())
}

/// One ability score: roll four d6, drop the lowest, sum the rest.
pub fn roll_ability_score(source: &mut impl RollSource) -> i32 {
    let mut rolls: Vec<u32> = (0..4).map(|_| source.roll_die(6)).collect();
    rolls.sort_unstable_by(|a, b| b.cmp(a));
    rolls[..3].iter().map(|&r| r as i32).sum()
}

/// A full set of six ability scores, each rolled independently.
pub fn roll_ability_scores(source: &mut impl RollSource) -> AbilityScores {
    let mut scores = AbilityScores::default();
    for ability in Ability::all() {
        scores.set(ability, roll_ability_score(source));
    }
    scores
}
