//! geodiagram CLI: parse a diagram image into incidence formulas.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use geodiagram::{detect, DiagramConfig, DiagramParser, DiagramReport, PassThroughSelector};
use log::LevelFilter;

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser, Debug)]
#[command(name = "geodiagram")]
#[command(about = "Parse a geometric diagram image into points, lines, circles and incidence formulas")]
#[command(version)]
struct Cli {
    /// Path to the input image.
    image: PathBuf,

    /// JSON config with optional per-stage parameter overrides.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Path to write the JSON report. Defaults to the config's
    /// `output_path` when a config is given.
    #[arg(long)]
    output: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,

    /// Keep every detected primitive instead of running coverage selection.
    #[arg(long)]
    pass_through: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_filter(self) -> LevelFilter {
        match self {
            Self::Off => LevelFilter::Off,
            Self::Error => LevelFilter::Error,
            Self::Warn => LevelFilter::Warn,
            Self::Info => LevelFilter::Info,
            Self::Debug => LevelFilter::Debug,
            Self::Trace => LevelFilter::Trace,
        }
    }
}

#[cfg(not(feature = "tracing"))]
fn init_logging(level: LogLevel) -> CliResult<()> {
    geodiagram::init_with_level(level.to_filter())?;
    Ok(())
}

#[cfg(feature = "tracing")]
fn init_logging(level: LogLevel) -> CliResult<()> {
    geodiagram::init_tracing(false);
    // No-op when the subscriber already installed the log bridge.
    let _ = tracing_log::LogTracer::init();
    log::set_max_level(level.to_filter());
    Ok(())
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level)?;

    let config = match &cli.config {
        Some(path) => DiagramConfig::load_json(path)
            .map_err(|e| -> CliError { format!("failed to read config {}: {e}", path.display()).into() })?,
        None => DiagramConfig::default(),
    };
    let output = cli
        .output
        .clone()
        .or_else(|| cli.config.as_ref().map(|_| config.output_path()));

    log::info!("loading image: {}", cli.image.display());
    let segment = detect::load_segment(&cli.image)
        .map_err(|e| -> CliError { format!("failed to load image {}: {e}", cli.image.display()).into() })?;
    log::info!(
        "image size: {}x{}, {} ink pixels",
        segment.width(),
        segment.height(),
        segment.pixels().len()
    );

    let parser = DiagramParser::new(config.build_params());
    let result = if cli.pass_through || config.pass_through {
        parser.parse_with(&segment, &PassThroughSelector)
    } else {
        parser.parse(&segment)
    };

    let mut report = DiagramReport::new(&cli.image, cli.config.as_deref(), &segment);
    let outcome = match result {
        Ok(parse) => {
            println!(
                "{} canonical points, {} lines, {} circles",
                parse.core.points.len(),
                parse.graph.line_graph.len(),
                parse.graph.circles.len()
            );
            for formula in parse.formula_strings() {
                println!("{formula}");
            }
            report.set_parse(parse);
            Ok(())
        }
        Err(err) => {
            log::error!("parse failed: {err}");
            report.set_error(&err);
            Err(err)
        }
    };

    if let Some(path) = output {
        report.write_json(&path)?;
        log::info!("report written to {}", path.display());
    }

    Ok(outcome?)
}
