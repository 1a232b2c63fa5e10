//! csim: trace-driven set-associative cache simulator CLI.
//!
//! This binary replays a Valgrind memory trace against a cache geometry and
//! prints the hit, miss and eviction counts. It performs:
//! 1. **Configuration:** Geometry from `-s/-E/-b`, a JSON `--config` file, or both (flags win).
//! 2. **Replay:** Streams the trace through the simulator, optionally echoing every record.
//! 3. **Reporting:** Summary line or JSON on stdout, optional detailed block and results file.
//!
//! Diagnostics go to stderr through `tracing`; set `RUST_LOG=debug` (or `trace`
//! for every access) to see them.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use csim_core::common::SimError;
use csim_core::config::{CacheConfig, Config, MalformedPolicy};
use csim_core::sim::{DispatchReport, RunSummary, Simulator};

#[derive(Parser, Debug)]
#[command(
    name = "csim",
    author,
    version,
    about = "Set-associative cache simulator with LRU replacement",
    long_about = "Replays a Valgrind memory trace (I/L/S/M records) against a cache of 2^s sets, \
E lines per set and 2^b-byte blocks, and reports hits, misses and evictions.\n\n\
Examples:\n  csim -s 4 -E 1 -b 4 -t traces/yi.trace\n  csim -v -s 8 -E 2 -b 4 -t traces/trans.trace\n  \
csim --config cache.json -t traces/long.trace --json"
)]
struct Cli {
    /// Print each trace record followed by its outcomes (e.g. `L 10,1 miss eviction`).
    #[arg(short, long)]
    verbose: bool,

    /// Number of set index bits (2^s sets).
    #[arg(short = 's', value_name = "s", required_unless_present = "config")]
    set_index_bits: Option<u32>,

    /// Associativity (number of lines per set).
    #[arg(short = 'E', value_name = "E", required_unless_present = "config")]
    lines_per_set: Option<usize>,

    /// Number of block offset bits (2^b-byte blocks).
    #[arg(short = 'b', value_name = "b", required_unless_present = "config")]
    block_offset_bits: Option<u32>,

    /// Valgrind trace to replay.
    #[arg(short = 't', value_name = "tracefile")]
    trace: PathBuf,

    /// JSON configuration file; `-s/-E/-b` override its geometry.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Stop at the first malformed trace line instead of skipping it.
    #[arg(long)]
    strict: bool,

    /// Print the summary as JSON.
    #[arg(long)]
    json: bool,

    /// Print a detailed statistics block after the summary.
    #[arg(long)]
    stats: bool,

    /// Also write `<hits> <misses> <evictions>` to this file.
    #[arg(long, value_name = "FILE")]
    results: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = ?e, "run failed");
            eprintln!("csim: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Installs a stderr `tracing` subscriber filtered by `RUST_LOG` (default `warn`).
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Merges the optional JSON file with command-line overrides.
///
/// The geometry is validated with the checked constructor, so `-s 0` or
/// `-b 0` are rejected before any cache is built.
fn resolve_config(cli: &Cli) -> Result<Config, SimError> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    config.cache = CacheConfig::new(
        cli.set_index_bits.unwrap_or(config.cache.set_index_bits()),
        cli.lines_per_set.unwrap_or(config.cache.lines_per_set()),
        cli.block_offset_bits.unwrap_or(config.cache.block_offset_bits()),
    )?;
    config.general.verbose |= cli.verbose;
    if cli.strict {
        config.general.on_malformed = MalformedPolicy::Abort;
    }
    tracing::debug!(?config, "resolved configuration");
    Ok(config)
}

/// Runs one simulation and prints its results.
fn run(cli: &Cli) -> Result<(), SimError> {
    let config = resolve_config(cli)?;
    let verbose = config.general.verbose;

    let mut sim =
        Simulator::new(&config.cache)?.with_malformed_policy(config.general.on_malformed);
    let summary = sim.run_file(&cli.trace, |record, report| {
        if verbose && report != DispatchReport::Ignored {
            println!("{record}{report}");
        }
    })?;

    print_summary(cli, &summary)?;

    if let Some(path) = &cli.results {
        summary.stats.write_results(path)?;
    }
    Ok(())
}

/// Prints the summary in the requested format.
fn print_summary(cli: &Cli, summary: &RunSummary) -> Result<(), SimError> {
    if cli.json {
        let json = serde_json::to_string_pretty(summary).map_err(io::Error::from)?;
        println!("{json}");
    } else {
        println!("{}", summary.stats);
    }

    if cli.stats {
        summary.stats.print();
        if summary.trace.malformed > 0 {
            println!("skipped {} malformed trace line(s)", summary.trace.malformed);
        }
    }
    Ok(())
}
