//! Report payloads and rendering for muster runs.

use std::io::Write;

use anyhow::Result;
use chrono::Utc;
use colored::Colorize;
use muster_engine::{Army, Attribute, Creature, ReferenceTable, ScalingModel};
use serde::Serialize;

/// One column of a parsed reference table.
#[derive(Debug, Serialize)]
pub struct ColumnReport {
    pub name: String,
    pub kind: &'static str,
    pub values: Vec<String>,
}

/// Snapshot of a parsed reference table.
#[derive(Debug, Serialize)]
pub struct TableReport {
    pub generated_at: String,
    pub rows: usize,
    pub channels: Vec<String>,
    pub columns: Vec<ColumnReport>,
}

impl TableReport {
    #[must_use]
    pub fn new(table: &ReferenceTable) -> Self {
        let columns = table
            .headers()
            .iter()
            .map(|name| {
                if let Some(series) = table.series(name) {
                    ColumnReport {
                        name: name.clone(),
                        kind: "integer",
                        values: series.iter().map(ToString::to_string).collect(),
                    }
                } else {
                    ColumnReport {
                        name: name.clone(),
                        kind: "label",
                        values: table.labels(name).unwrap_or_default().to_vec(),
                    }
                }
            })
            .collect();
        Self {
            generated_at: Utc::now().to_rfc3339(),
            rows: table.rows(),
            channels: table.channel_names().map(ToString::to_string).collect(),
            columns,
        }
    }
}

/// A `(size, value)` point on a fitted curve.
#[derive(Debug, Serialize)]
pub struct CurvePoint {
    pub size: f64,
    pub value: f64,
}

impl From<(f64, f64)> for CurvePoint {
    fn from((size, value): (f64, f64)) -> Self {
        Self { size, value }
    }
}

/// Knots, dense samples and spot evaluations of one channel.
#[derive(Debug, Serialize)]
pub struct CurveReport {
    pub generated_at: String,
    pub channel: String,
    pub domain: (f64, f64),
    pub knots: Vec<CurvePoint>,
    pub samples: Vec<CurvePoint>,
    pub spot_checks: Vec<CurvePoint>,
}

impl CurveReport {
    /// Gather knots, samples and requested spot evaluations for a channel.
    ///
    /// # Errors
    ///
    /// Fails when the model does not know the channel.
    pub fn new(model: &ScalingModel, channel: &str, steps: usize, at: &[f64]) -> Result<Self> {
        let knots = model.knots(channel)?.into_iter().map(Into::into).collect();
        let samples = model
            .sample_curve(channel, steps)?
            .into_iter()
            .map(Into::into)
            .collect();
        let spot_checks = model
            .evaluate_many(channel, at)?
            .into_iter()
            .zip(at)
            .map(|(value, &size)| CurvePoint { size, value })
            .collect();
        Ok(Self {
            generated_at: Utc::now().to_rfc3339(),
            channel: channel.to_string(),
            domain: model.domain(),
            knots,
            samples,
            spot_checks,
        })
    }
}

/// Derived ability scores of a composed army.
#[derive(Debug, Serialize)]
pub struct AbilityBlock {
    pub strength: i32,
    pub dexterity: i32,
    pub constitution: i32,
    pub intelligence: i32,
    pub wisdom: i32,
    pub charisma: i32,
}

/// Full record of one composition run.
#[derive(Debug, Serialize)]
pub struct ComposeReport {
    pub generated_at: String,
    pub seed: Option<u64>,
    pub num_units: u32,
    pub size_name: Option<String>,
    pub creature: Creature,
    pub level_adjust: i32,
    pub stat_adjust: i32,
    pub hp_adjust: i32,
    pub army_level_adjust: i32,
    pub abilities: AbilityBlock,
    pub hp: i64,
    pub level: i32,
    pub army_level: i32,
}

impl ComposeReport {
    #[must_use]
    pub fn new(army: &Army<'_>, seed: Option<u64>) -> Self {
        let ability = |attribute: Attribute| army.ability(attribute).unwrap_or_default();
        Self {
            generated_at: Utc::now().to_rfc3339(),
            seed,
            num_units: army.num_units(),
            size_name: army.size_name().map(ToString::to_string),
            creature: army.creature().clone(),
            level_adjust: army.level_adjust(),
            stat_adjust: army.stat_adjust(),
            hp_adjust: army.hp_adjust(),
            army_level_adjust: army.army_level_adjust(),
            abilities: AbilityBlock {
                strength: ability(Attribute::Strength),
                dexterity: ability(Attribute::Dexterity),
                constitution: ability(Attribute::Constitution),
                intelligence: ability(Attribute::Intelligence),
                wisdom: ability(Attribute::Wisdom),
                charisma: ability(Attribute::Charisma),
            },
            hp: army.hp(),
            level: army.level(),
            army_level: army.army_level(),
        }
    }
}

/// Serialize any report as pretty JSON.
///
/// # Errors
///
/// Fails when the writer rejects output.
pub fn write_json<W: Write, T: Serialize>(out: &mut W, payload: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, payload)?;
    writeln!(out)?;
    Ok(())
}

/// Render a table report as an aligned console grid.
///
/// # Errors
///
/// Fails when the writer rejects output.
pub fn write_console_table<W: Write>(out: &mut W, report: &TableReport) -> Result<()> {
    writeln!(out, "{}", "📋 Reference Table".bright_cyan().bold())?;
    writeln!(out, "{}", "==================".cyan())?;
    writeln!(out, "Rows: {}", report.rows)?;
    writeln!(out, "Channels: {}", report.channels.join(", "))?;
    writeln!(out)?;

    let widths: Vec<usize> = report
        .columns
        .iter()
        .map(|column| {
            column
                .values
                .iter()
                .map(String::len)
                .chain(std::iter::once(column.name.len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let header = report
        .columns
        .iter()
        .zip(&widths)
        .map(|(column, &width)| format!("{:>width$}", column.name))
        .collect::<Vec<_>>()
        .join("  ");
    writeln!(out, "{}", header.bold())?;
    for row in 0..report.rows {
        let line = report
            .columns
            .iter()
            .zip(&widths)
            .map(|(column, &width)| format!("{:>width$}", column.values[row]))
            .collect::<Vec<_>>()
            .join("  ");
        writeln!(out, "{line}")?;
    }
    Ok(())
}

/// Render a curve report with knots, spot checks and dense samples.
///
/// # Errors
///
/// Fails when the writer rejects output.
pub fn write_console_curve<W: Write>(out: &mut W, report: &CurveReport) -> Result<()> {
    writeln!(
        out,
        "{} {}",
        "📈 Channel".bright_cyan().bold(),
        report.channel.bold()
    )?;
    writeln!(out, "{}", "==================".cyan())?;
    writeln!(
        out,
        "Domain: {} to {} units",
        report.domain.0, report.domain.1
    )?;
    writeln!(out)?;

    writeln!(out, "{}", "Knots".bright_yellow())?;
    for point in &report.knots {
        writeln!(out, "  {:>10} -> {:.3}", point.size, point.value)?;
    }
    if !report.spot_checks.is_empty() {
        writeln!(out, "{}", "Spot checks".bright_yellow())?;
        for point in &report.spot_checks {
            writeln!(out, "  {:>10} -> {:.3}", point.size, point.value)?;
        }
    }
    writeln!(out, "{}", "Fitted samples".bright_yellow())?;
    for point in &report.samples {
        writeln!(out, "  {:>10.1} -> {:.3}", point.size, point.value)?;
    }
    Ok(())
}

/// Render a composition report.
///
/// # Errors
///
/// Fails when the writer rejects output.
pub fn write_console_compose<W: Write>(out: &mut W, report: &ComposeReport) -> Result<()> {
    let tier = report.size_name.as_deref().unwrap_or("unnamed");
    writeln!(
        out,
        "{} {} ({} units)",
        "⚔️  Army".bright_cyan().bold(),
        tier.bold(),
        report.num_units
    )?;
    writeln!(out, "{}", "==================".cyan())?;
    if let Some(seed) = report.seed {
        writeln!(out, "Creature: random (seed {seed})")?;
    } else {
        writeln!(out, "Creature: explicit")?;
    }
    writeln!(
        out,
        "Base: hp {} level {}",
        report.creature.hp, report.creature.level
    )?;
    writeln!(
        out,
        "Adjustments: level {:+} stat {:+} hp {:+} army-level {:+}",
        report.level_adjust, report.stat_adjust, report.hp_adjust, report.army_level_adjust
    )?;
    writeln!(out)?;
    writeln!(out, "{}", "Derived army".bright_yellow())?;
    writeln!(
        out,
        "  STR {:+}  DEX {:+}  CON {:+}  INT {:+}  WIS {:+}  CHA {:+}",
        report.abilities.strength,
        report.abilities.dexterity,
        report.abilities.constitution,
        report.abilities.intelligence,
        report.abilities.wisdom,
        report.abilities.charisma
    )?;
    writeln!(
        out,
        "  HP {}  level {}  army level {}",
        report.hp.to_string().green(),
        report.level,
        report.army_level.to_string().green()
    )?;
    Ok(())
}
