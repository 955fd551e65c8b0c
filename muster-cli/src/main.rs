mod report;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::{Path, PathBuf};

use muster_engine::{Army, Creature, ReferenceTable, SIZE_COLUMN, ScalingModel, StatRanges};
use report::{ComposeReport, CurveReport, TableReport};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RunMode {
    /// Print the parsed reference table
    Table,
    /// Sample one fitted channel across the size domain
    Curve,
    /// Compose an army from a base creature
    Compose,
}

#[derive(Debug, Parser)]
#[command(name = "muster", version = "0.1.0")]
#[command(about = "Scale single creatures into mass-combat armies from a reference table")]
struct Args {
    /// What to run: table inspection, curve sampling, or composition
    #[arg(long, value_enum, default_value_t = RunMode::Compose)]
    mode: RunMode,

    /// CSV reference table (defaults to the built-in canonical table)
    #[arg(long)]
    table: Option<PathBuf>,

    /// Integer column holding the group sizes
    #[arg(long, default_value = SIZE_COLUMN)]
    independent: String,

    /// Channel to sample in curve mode
    #[arg(long, default_value = "hp_adjust")]
    channel: String,

    /// Number of fitted samples across the domain in curve mode
    #[arg(long, default_value_t = 24)]
    steps: usize,

    /// Extra sizes to evaluate in curve mode (repeatable)
    #[arg(long)]
    at: Vec<f64>,

    /// Group size to compose at
    #[arg(long, default_value_t = 100)]
    size: u32,

    /// JSON file with an explicit base creature (otherwise one is rolled)
    #[arg(long)]
    creature: Option<PathBuf>,

    /// JSON file with sampling ranges for the rolled creature
    #[arg(long)]
    ranges: Option<PathBuf>,

    /// Seed for the rolled creature
    #[arg(long, default_value_t = 1337)]
    seed: u64,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["console", "json"])]
    report: String,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let table = load_table(args.table.as_deref())?;
    let model = ScalingModel::fit(&table, &args.independent)
        .context("reference table cannot anchor a fit")?;
    log::debug!(
        "fitted {} channels over sizes {:?}",
        model.channels().count(),
        model.domain()
    );

    if args.report == "console" {
        announce_banner();
    }

    let mut output = OutputTarget::new(args.output.clone())?;
    match args.mode {
        RunMode::Table => run_table(&args, &table, &mut output)?,
        RunMode::Curve => run_curve(&args, &model, &mut output)?,
        RunMode::Compose => run_compose(&args, &model, &mut output)?,
    }
    output.flush_inner()?;
    Ok(())
}

fn announce_banner() {
    println!("{}", "⚔️  Muster Mass-Combat Scaler".bright_cyan().bold());
    println!("{}", "================================".cyan());
}

fn load_table(path: Option<&Path>) -> Result<ReferenceTable> {
    match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            ReferenceTable::from_csv(&text)
                .with_context(|| format!("failed to parse {}", path.display()))
        }
        None => {
            log::debug!("using the built-in reference table");
            Ok(ReferenceTable::builtin())
        }
    }
}

fn run_table<W: Write>(args: &Args, table: &ReferenceTable, out: &mut W) -> Result<()> {
    let table_report = TableReport::new(table);
    match args.report.as_str() {
        "json" => report::write_json(out, &table_report),
        _ => report::write_console_table(out, &table_report),
    }
}

fn run_curve<W: Write>(args: &Args, model: &ScalingModel, out: &mut W) -> Result<()> {
    let curve = CurveReport::new(model, &args.channel, args.steps, &args.at)?;
    match args.report.as_str() {
        "json" => report::write_json(out, &curve),
        _ => report::write_console_curve(out, &curve),
    }
}

fn run_compose<W: Write>(args: &Args, model: &ScalingModel, out: &mut W) -> Result<()> {
    let compose = build_compose_report(args, model)?;
    match args.report.as_str() {
        "json" => report::write_json(out, &compose),
        _ => report::write_console_compose(out, &compose),
    }
}

fn build_compose_report(args: &Args, model: &ScalingModel) -> Result<ComposeReport> {
    if let Some(path) = &args.creature {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let creature = Creature::from_json(&json)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        let army = Army::compose(&creature, model, args.size)?;
        return Ok(ComposeReport::new(&army, None));
    }

    let ranges = match &args.ranges {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            StatRanges::from_json(&json)
                .with_context(|| format!("failed to parse {}", path.display()))?
        }
        None => StatRanges::default(),
    };
    let mut rng = SmallRng::seed_from_u64(args.seed);
    let army = Army::compose_random(model, &ranges, args.size, &mut rng)?;
    Ok(ComposeReport::new(&army, Some(args.seed)))
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}
