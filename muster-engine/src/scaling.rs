//! Channel scaling model: one fitted curve per adjustment channel.
//!
//! [`ScalingModel::fit`] validates the fit contract (enough rows, strictly
//! increasing positive sizes) once, then fits a [`CubicSpline`] per channel.
//! The model is immutable afterwards; evaluation is pure and safe to share
//! across threads.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::numbers;
use crate::spline::CubicSpline;
use crate::table::{ReferenceTable, SIZE_NAME_COLUMN, TableError};

/// Minimum number of table rows a fit will accept.
pub const MIN_FIT_ROWS: usize = 4;

/// Error raised when a channel name has no fitted curve.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChannelError {
    #[error("no channel named {name:?}")]
    Unknown { name: String },
}

/// Fitted adjustment curves over a shared group-size axis.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalingModel {
    sizes: Vec<f64>,
    tiers: Vec<(i64, String)>,
    splines: BTreeMap<String, CubicSpline>,
}

impl ScalingModel {
    /// Fit one curve per adjustment channel against `independent`.
    ///
    /// Every integer column whose header ends in
    /// [`ADJUST_SUFFIX`](crate::table::ADJUST_SUFFIX) becomes a channel.
    /// When the table carries a [`SIZE_NAME_COLUMN`] label column, the
    /// model keeps its tier names for [`Self::size_label`].
    ///
    /// # Errors
    ///
    /// Returns a [`TableError`] when `independent` is not an integer column,
    /// holds fewer than [`MIN_FIT_ROWS`] rows, is not strictly increasing,
    /// dips to zero or below, or when the table defines no channels at all.
    pub fn fit(table: &ReferenceTable, independent: &str) -> Result<Self, TableError> {
        let Some(sizes_raw) = table.series(independent) else {
            return Err(TableError::MissingColumn {
                name: independent.to_string(),
            });
        };
        if sizes_raw.len() < MIN_FIT_ROWS {
            return Err(TableError::TooFewRows {
                name: independent.to_string(),
                min: MIN_FIT_ROWS,
                got: sizes_raw.len(),
            });
        }
        for (row, value) in sizes_raw.iter().enumerate() {
            if *value <= 0 {
                return Err(TableError::NonPositiveSize {
                    name: independent.to_string(),
                    row,
                    value: *value,
                });
            }
        }

        let sizes: Vec<f64> = sizes_raw.iter().copied().map(numbers::i64_to_f64).collect();
        // The splines fit in f64, where adjacent sizes past 2^53 can collapse
        // even when the integers are distinct.
        for (row, pair) in sizes.windows(2).enumerate() {
            if pair[1] <= pair[0] {
                return Err(TableError::NotIncreasing {
                    name: independent.to_string(),
                    row: row + 1,
                    prev: sizes_raw[row],
                    next: sizes_raw[row + 1],
                });
            }
        }

        let mut splines = BTreeMap::new();
        for name in table.channel_names() {
            if name == independent {
                continue;
            }
            let Some(series) = table.series(name) else {
                continue;
            };
            if series.len() != sizes.len() {
                return Err(TableError::LengthMismatch {
                    name: name.to_string(),
                    expected: sizes.len(),
                    got: series.len(),
                });
            }
            let ys: Vec<f64> = series.iter().copied().map(numbers::i64_to_f64).collect();
            let Some(spline) = CubicSpline::fit(&sizes, &ys) else {
                return Err(TableError::Unfittable {
                    name: name.to_string(),
                });
            };
            splines.insert(name.to_string(), spline);
        }
        if splines.is_empty() {
            return Err(TableError::NoChannels);
        }

        let tiers = table
            .labels(SIZE_NAME_COLUMN)
            .map(|labels| {
                sizes_raw
                    .iter()
                    .copied()
                    .zip(labels.iter().cloned())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            sizes,
            tiers,
            splines,
        })
    }

    /// Evaluate `channel` at group size `x`.
    ///
    /// Inside the sampled domain this interpolates; outside it the boundary
    /// segment's cubic keeps going, unclamped. Callers who want to stay on
    /// tabulated ground can clamp `x` to [`Self::domain`] first.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::Unknown`] when no such channel was fitted.
    pub fn evaluate(&self, channel: &str, x: f64) -> Result<f64, ChannelError> {
        let Some(spline) = self.splines.get(channel) else {
            return Err(ChannelError::Unknown {
                name: channel.to_string(),
            });
        };
        Ok(spline.eval(x))
    }

    /// Evaluate `channel` at every `x` in order.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::Unknown`] when no such channel was fitted.
    pub fn evaluate_many(&self, channel: &str, xs: &[f64]) -> Result<Vec<f64>, ChannelError> {
        let Some(spline) = self.splines.get(channel) else {
            return Err(ChannelError::Unknown {
                name: channel.to_string(),
            });
        };
        Ok(xs.iter().map(|&x| spline.eval(x)).collect())
    }

    /// Fitted channel names, sorted.
    pub fn channels(&self) -> impl Iterator<Item = &str> {
        self.splines.keys().map(String::as_str)
    }

    /// Inclusive size range the fit was anchored on.
    #[must_use]
    pub fn domain(&self) -> (f64, f64) {
        (self.sizes[0], self.sizes[self.sizes.len() - 1])
    }

    /// The original `(size, value)` knots of a channel.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::Unknown`] when no such channel was fitted.
    pub fn knots(&self, channel: &str) -> Result<Vec<(f64, f64)>, ChannelError> {
        let Some(spline) = self.splines.get(channel) else {
            return Err(ChannelError::Unknown {
                name: channel.to_string(),
            });
        };
        Ok(spline.knots().collect())
    }

    /// Sample the fitted curve at `steps` evenly spaced sizes across the
    /// domain, endpoints included. Intended for plots and inspection.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::Unknown`] when no such channel was fitted.
    pub fn sample_curve(
        &self,
        channel: &str,
        steps: usize,
    ) -> Result<Vec<(f64, f64)>, ChannelError> {
        let Some(spline) = self.splines.get(channel) else {
            return Err(ChannelError::Unknown {
                name: channel.to_string(),
            });
        };
        let steps = steps.max(2);
        let (lo, hi) = self.domain();
        let span = hi - lo;
        let denominator = numbers::usize_to_f64(steps - 1);
        let mut samples = Vec::with_capacity(steps);
        for step in 0..steps {
            let x = lo + span * (numbers::usize_to_f64(step) / denominator);
            samples.push((x, spline.eval(x)));
        }
        Ok(samples)
    }

    /// Qualitative tier label for a group size, when the table named tiers.
    ///
    /// Picks the largest tier at or below `x`; sizes below the smallest tier
    /// fall back to that smallest tier.
    #[must_use]
    pub fn size_label(&self, x: f64) -> Option<&str> {
        let mut best = self.tiers.first().map(|(_, label)| label.as_str())?;
        for (size, label) in &self.tiers {
            if numbers::i64_to_f64(*size) <= x {
                best = label.as_str();
            }
        }
        Some(best)
    }
}
