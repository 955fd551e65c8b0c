//! Armies: creatures scaled into groups by fitted adjustments.

use std::borrow::Cow;

use rand::Rng;
use thiserror::Error;

use crate::creature::{Attribute, Creature, RangeError, StatRanges};
use crate::numbers;
use crate::scaling::{ChannelError, ScalingModel};

/// Channel applied once to every ability score.
pub const STAT_CHANNEL: &str = "stat_adjust";
/// Channel added to the creature's hit points.
pub const HP_CHANNEL: &str = "hp_adjust";
/// Channel added to the creature's level.
pub const LEVEL_CHANNEL: &str = "level_adjust";
/// Channel added on top of the derived level to give the army level.
pub const ARMY_LEVEL_CHANNEL: &str = "army_level_adjust";

/// Errors raised when an army cannot be composed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ComposeError {
    #[error(transparent)]
    Channel(#[from] ChannelError),
    #[error(transparent)]
    Range(#[from] RangeError),
}

/// A group entity derived from one creature and a scaling model.
///
/// Armies are immutable once composed; every derived stat is an accessor
/// over the base creature and the rounded adjustments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Army<'a> {
    creature: Cow<'a, Creature>,
    num_units: u32,
    size_name: Option<String>,
    level_adjust: i32,
    stat_adjust: i32,
    hp_adjust: i32,
    army_level_adjust: i32,
}

struct Adjustments {
    level: i32,
    stat: i32,
    hp: i32,
    army_level: i32,
    size_name: Option<String>,
}

fn adjustments_for(model: &ScalingModel, num_units: u32) -> Result<Adjustments, ChannelError> {
    let size = f64::from(num_units);
    Ok(Adjustments {
        level: numbers::round_f64_to_i32(model.evaluate(LEVEL_CHANNEL, size)?),
        stat: numbers::round_f64_to_i32(model.evaluate(STAT_CHANNEL, size)?),
        hp: numbers::round_f64_to_i32(model.evaluate(HP_CHANNEL, size)?),
        army_level: numbers::round_f64_to_i32(model.evaluate(ARMY_LEVEL_CHANNEL, size)?),
        size_name: model.size_label(size).map(ToString::to_string),
    })
}

impl<'a> Army<'a> {
    /// Compose an army from a borrowed creature at the given group size.
    ///
    /// Evaluates the four canonical channels at `num_units` and rounds each
    /// to the nearest integer adjustment.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::Unknown`] unchanged when the model lacks one
    /// of the canonical channels.
    pub fn compose(
        creature: &'a Creature,
        model: &ScalingModel,
        num_units: u32,
    ) -> Result<Self, ChannelError> {
        let adjustments = adjustments_for(model, num_units)?;
        Ok(Self::from_parts(Cow::Borrowed(creature), num_units, adjustments))
    }

    fn from_parts(creature: Cow<'a, Creature>, num_units: u32, adjustments: Adjustments) -> Self {
        Self {
            creature,
            num_units,
            size_name: adjustments.size_name,
            level_adjust: adjustments.level,
            stat_adjust: adjustments.stat,
            hp_adjust: adjustments.hp,
            army_level_adjust: adjustments.army_level,
        }
    }

    /// The base creature the army was raised from.
    #[must_use]
    pub fn creature(&self) -> &Creature {
        &self.creature
    }

    /// Number of units in the group.
    #[must_use]
    pub fn num_units(&self) -> u32 {
        self.num_units
    }

    /// Qualitative size tier, when the model's table named tiers.
    #[must_use]
    pub fn size_name(&self) -> Option<&str> {
        self.size_name.as_deref()
    }

    /// Rounded level adjustment evaluated at the group size.
    #[must_use]
    pub fn level_adjust(&self) -> i32 {
        self.level_adjust
    }

    /// Rounded ability adjustment evaluated at the group size.
    #[must_use]
    pub fn stat_adjust(&self) -> i32 {
        self.stat_adjust
    }

    /// Rounded hit-point adjustment evaluated at the group size.
    #[must_use]
    pub fn hp_adjust(&self) -> i32 {
        self.hp_adjust
    }

    /// Rounded army-level adjustment evaluated at the group size.
    #[must_use]
    pub fn army_level_adjust(&self) -> i32 {
        self.army_level_adjust
    }

    /// A derived ability score: base ability plus the shared adjustment.
    ///
    /// `None` for [`Attribute::Hp`] and [`Attribute::Level`], which have
    /// their own channels.
    #[must_use]
    pub fn ability(&self, attribute: Attribute) -> Option<i32> {
        self.creature
            .ability(attribute)
            .map(|score| score.saturating_add(self.stat_adjust))
    }

    /// Derived hit points. Signed, because extrapolated adjustments may be
    /// negative and the model's output is reported as-is.
    #[must_use]
    pub fn hp(&self) -> i64 {
        i64::from(self.creature.hp) + i64::from(self.hp_adjust)
    }

    /// Derived level of a unit in the group.
    #[must_use]
    pub fn level(&self) -> i32 {
        self.creature.level.saturating_add(self.level_adjust)
    }

    /// Overall army level: derived level plus the army-level adjustment.
    #[must_use]
    pub fn army_level(&self) -> i32 {
        self.level().saturating_add(self.army_level_adjust)
    }
}

impl Army<'static> {
    /// Compose an army from a freshly drawn random creature.
    ///
    /// # Errors
    ///
    /// Returns [`ComposeError::Range`] when the range configuration cannot
    /// generate a creature and [`ComposeError::Channel`] when the model
    /// lacks a canonical channel.
    pub fn compose_random<R: Rng>(
        model: &ScalingModel,
        ranges: &StatRanges,
        num_units: u32,
        rng: &mut R,
    ) -> Result<Self, ComposeError> {
        let creature = Creature::random(ranges, rng)?;
        let adjustments = adjustments_for(model, num_units)?;
        Ok(Self::from_parts(Cow::Owned(creature), num_units, adjustments))
    }
}
