//! kfuzzy - Fuzzy c-means clustering of numeric vectors.

mod config;
mod reader;
mod writer;

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use kfuzzy::{FuzzyCMeans, Options};
use tracing_subscriber::EnvFilter;

use config::RunConfig;
use reader::{Input, InputFormat, InputReader};
use writer::Report;

/// Fuzzy c-means clustering of numeric vectors.
///
/// Reads vectors from INPUT (or stdin), seeds cluster centers with the
/// farthest-point heuristic, runs a fixed number of refinement rounds and
/// prints the most probable cluster of every vector.
#[derive(Parser, Debug)]
#[command(name = "kfuzzy")]
#[command(about = "Fuzzy c-means clustering of numeric vectors")]
#[command(version)]
struct Args {
    /// Input file; "-" or omitted reads stdin
    input: Option<PathBuf>,

    /// Input format (default: guessed from extension, else simple)
    #[arg(short, long, value_enum)]
    format: Option<InputFormat>,

    /// Number of clusters (overrides the input file)
    #[arg(short = 'k', long)]
    clusters: Option<usize>,

    /// Fuzziness exponent, must be greater than 1
    #[arg(short, long)]
    blending: Option<f64>,

    /// Number of refinement rounds
    #[arg(short = 'n', long)]
    iterations: Option<usize>,

    /// Options file (YAML or JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write the report as JSON
    #[arg(long)]
    json: bool,

    /// Verbose logging to stderr
    #[arg(short, long)]
    verbose: bool,
}

/// Fully resolved run parameters.
#[derive(Debug, PartialEq)]
struct Plan {
    format: InputFormat,
    clusters: Option<usize>,
    options: Options,
}

impl Plan {
    /// Flags win over the config file; the config file wins over defaults.
    fn resolve(args: &Args, cfg: &RunConfig) -> Self {
        let format = args
            .format
            .or(cfg.format)
            .or_else(|| args.input.as_deref().and_then(InputFormat::from_path))
            .unwrap_or_default();
        Self {
            format,
            clusters: args.clusters.or(cfg.clusters),
            options: cfg.options(args.blending, args.iterations),
        }
    }

    /// Clusters the input and builds the report.
    fn run(&self, input: Input) -> Result<Report> {
        let clusters = self.clusters.unwrap_or(input.clusters);
        let engine = FuzzyCMeans::new();
        let assignment = engine
            .clusterize(&input.vectors, clusters, &self.options)
            .context("clustering failed")?;

        Ok(Report {
            clusters,
            objects: input.vectors.len(),
            blending: self.options.blending,
            iterations: self.options.max_iterations,
            assignment,
        })
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(p) if p != Path::new("-") => std::fs::read_to_string(p)
            .with_context(|| format!("failed to read input {}", p.display())),
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            Ok(buf)
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let cfg = match &args.config {
        Some(path) => config::load(path)?,
        None => RunConfig::default(),
    };
    let plan = Plan::resolve(&args, &cfg);
    tracing::debug!(?plan, "resolved run plan");

    let text = read_input(args.input.as_deref())?;
    let input = plan
        .format
        .reader()
        .read(&text)
        .with_context(|| format!("failed to parse {:?} input", plan.format))?;
    tracing::info!(
        objects = input.vectors.len(),
        clusters = plan.clusters.unwrap_or(input.clusters),
        "input loaded"
    );

    let report = plan.run(input)?;
    let rendered = if args.json {
        report.to_json()?
    } else {
        report.to_text()
    };

    match &args.output {
        Some(path) => std::fs::write(path, rendered)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => print!("{rendered}"),
    }
    Ok(())
}
