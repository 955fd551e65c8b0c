//! Muster Scaling Engine
//!
//! Platform-agnostic core logic for scaling single creatures into mass-combat
//! armies. This crate fits smooth curves to a small reference table of known
//! adjustment points, evaluates them at any group size, and applies the
//! results to a base creature, without any file or UI dependencies.

pub mod army;
pub mod creature;
pub mod numbers;
pub mod scaling;
pub mod spline;
pub mod table;

// Re-export commonly used types
pub use army::{ARMY_LEVEL_CHANNEL, Army, ComposeError, HP_CHANNEL, LEVEL_CHANNEL, STAT_CHANNEL};
pub use creature::{Attribute, Creature, RangeError, StatRanges};
pub use scaling::{ChannelError, MIN_FIT_ROWS, ScalingModel};
pub use spline::CubicSpline;
pub use table::{ADJUST_SUFFIX, ReferenceTable, SIZE_COLUMN, SIZE_NAME_COLUMN, TableError};
