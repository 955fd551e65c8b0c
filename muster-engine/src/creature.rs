//! Base creatures and the stat ranges that generate them.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::numbers;

const DEFAULT_ABILITY_RANGE: (i64, i64) = (-5, 5);
const DEFAULT_HP_RANGE: (i64, i64) = (1, 200);
const DEFAULT_LEVEL_RANGE: (i64, i64) = (1, 21);

/// Named attributes of a base creature, used as range keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Attribute {
    Strength,
    Dexterity,
    Constitution,
    Intelligence,
    Wisdom,
    Charisma,
    Hp,
    Level,
}

impl Attribute {
    /// Every attribute, in the order random generation draws them.
    pub const ALL: [Self; 8] = [
        Self::Strength,
        Self::Dexterity,
        Self::Constitution,
        Self::Intelligence,
        Self::Wisdom,
        Self::Charisma,
        Self::Hp,
        Self::Level,
    ];

    /// The six ability scores, excluding hit points and level.
    pub const ABILITIES: [Self; 6] = [
        Self::Strength,
        Self::Dexterity,
        Self::Constitution,
        Self::Intelligence,
        Self::Wisdom,
        Self::Charisma,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Strength => "strength",
            Self::Dexterity => "dexterity",
            Self::Constitution => "constitution",
            Self::Intelligence => "intelligence",
            Self::Wisdom => "wisdom",
            Self::Charisma => "charisma",
            Self::Hp => "hp",
            Self::Level => "level",
        }
    }

    /// Whether this attribute is one of the six ability scores.
    #[must_use]
    pub const fn is_ability(self) -> bool {
        !matches!(self, Self::Hp | Self::Level)
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Attribute {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "strength" => Ok(Self::Strength),
            "dexterity" => Ok(Self::Dexterity),
            "constitution" => Ok(Self::Constitution),
            "intelligence" => Ok(Self::Intelligence),
            "wisdom" => Ok(Self::Wisdom),
            "charisma" => Ok(Self::Charisma),
            "hp" => Ok(Self::Hp),
            "level" => Ok(Self::Level),
            _ => Err(()),
        }
    }
}

impl From<Attribute> for String {
    fn from(value: Attribute) -> Self {
        value.as_str().to_string()
    }
}

/// Errors raised when a stat-range configuration cannot generate a creature.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RangeError {
    #[error("no range configured for {attribute}")]
    Missing { attribute: Attribute },
    #[error("range for {attribute} is empty ({lo}..{hi})")]
    Empty { attribute: Attribute, lo: i64, hi: i64 },
    #[error("hp range must start at or above zero (got {lo})")]
    NegativeHp { lo: i64 },
}

/// Inclusive-exclusive sampling bounds per attribute.
///
/// The default covers every attribute: abilities draw from `-5..5`, hit
/// points from `1..200`, level from `1..21`. Custom configurations may
/// cover any subset; generation reports the first missing attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatRanges {
    ranges: HashMap<Attribute, (i64, i64)>,
}

impl StatRanges {
    /// A configuration with no ranges at all.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            ranges: HashMap::new(),
        }
    }

    /// Load a range configuration from a JSON object like
    /// `{"strength": [-5, 5], "hp": [1, 200]}`.
    ///
    /// Parsing does not validate coverage; [`Self::validate`] runs before
    /// any sampling.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into a range map.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Set the bounds for one attribute, replacing any previous pair.
    pub fn insert(&mut self, attribute: Attribute, lo: i64, hi: i64) {
        self.ranges.insert(attribute, (lo, hi));
    }

    /// The configured bounds for an attribute.
    #[must_use]
    pub fn bounds(&self, attribute: Attribute) -> Option<(i64, i64)> {
        self.ranges.get(&attribute).copied()
    }

    /// Check that every attribute has a usable range.
    ///
    /// # Errors
    ///
    /// Returns [`RangeError::Missing`] for the first uncovered attribute in
    /// draw order, [`RangeError::Empty`] when `lo >= hi`, and
    /// [`RangeError::NegativeHp`] when the hit-point range dips below zero.
    pub fn validate(&self) -> Result<(), RangeError> {
        for attribute in Attribute::ALL {
            let Some((lo, hi)) = self.bounds(attribute) else {
                return Err(RangeError::Missing { attribute });
            };
            if lo >= hi {
                return Err(RangeError::Empty { attribute, lo, hi });
            }
            if attribute == Attribute::Hp && lo < 0 {
                return Err(RangeError::NegativeHp { lo });
            }
        }
        Ok(())
    }
}

impl Default for StatRanges {
    fn default() -> Self {
        let mut ranges = Self::empty();
        for attribute in Attribute::ABILITIES {
            ranges.insert(attribute, DEFAULT_ABILITY_RANGE.0, DEFAULT_ABILITY_RANGE.1);
        }
        ranges.insert(Attribute::Hp, DEFAULT_HP_RANGE.0, DEFAULT_HP_RANGE.1);
        ranges.insert(Attribute::Level, DEFAULT_LEVEL_RANGE.0, DEFAULT_LEVEL_RANGE.1);
        ranges
    }
}

/// A basic creature with the stats armies are raised from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Creature {
    #[serde(default)]
    pub strength: i32,
    #[serde(default)]
    pub dexterity: i32,
    #[serde(default)]
    pub constitution: i32,
    #[serde(default)]
    pub intelligence: i32,
    #[serde(default)]
    pub wisdom: i32,
    #[serde(default)]
    pub charisma: i32,
    #[serde(default)]
    pub hp: u32,
    #[serde(default)]
    pub level: i32,
}

impl Creature {
    /// Load a creature from a JSON object.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into a creature.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// One of the six ability scores; `None` for hp and level.
    #[must_use]
    pub fn ability(&self, attribute: Attribute) -> Option<i32> {
        match attribute {
            Attribute::Strength => Some(self.strength),
            Attribute::Dexterity => Some(self.dexterity),
            Attribute::Constitution => Some(self.constitution),
            Attribute::Intelligence => Some(self.intelligence),
            Attribute::Wisdom => Some(self.wisdom),
            Attribute::Charisma => Some(self.charisma),
            Attribute::Hp | Attribute::Level => None,
        }
    }

    /// Draw a creature from the given ranges, validating them first.
    ///
    /// Attributes are drawn independently and uniformly, each from its own
    /// inclusive-exclusive bounds, in [`Attribute::ALL`] order, so a seeded
    /// RNG reproduces the same creature.
    ///
    /// # Errors
    ///
    /// Returns a [`RangeError`] when the configuration misses an attribute
    /// or carries an unusable range; nothing is drawn in that case.
    pub fn random<R: Rng>(ranges: &StatRanges, rng: &mut R) -> Result<Self, RangeError> {
        ranges.validate()?;
        let mut draw = |attribute: Attribute| -> Result<i64, RangeError> {
            let (lo, hi) = ranges
                .bounds(attribute)
                .ok_or(RangeError::Missing { attribute })?;
            Ok(rng.gen_range(lo..hi))
        };
        Ok(Self {
            strength: numbers::clamp_i64_to_i32(draw(Attribute::Strength)?),
            dexterity: numbers::clamp_i64_to_i32(draw(Attribute::Dexterity)?),
            constitution: numbers::clamp_i64_to_i32(draw(Attribute::Constitution)?),
            intelligence: numbers::clamp_i64_to_i32(draw(Attribute::Intelligence)?),
            wisdom: numbers::clamp_i64_to_i32(draw(Attribute::Wisdom)?),
            charisma: numbers::clamp_i64_to_i32(draw(Attribute::Charisma)?),
            hp: numbers::clamp_i64_to_u32(draw(Attribute::Hp)?),
            level: numbers::clamp_i64_to_i32(draw(Attribute::Level)?),
        })
    }
}
