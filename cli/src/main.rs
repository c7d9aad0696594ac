//! lychrel CLI - searches for the most delayed base-12 palindromes.
//!
//! # Architecture
//!
//! The binary resolves settings and hands off to [`lychrel_engine`]:
//!
//! ```text
//! flags > config file > defaults ──► SessionRequest ──► Orchestrator<SqliteStore>
//!                                                            │
//!                                                            ▼
//!                                             SessionReport ──► stdout
//! ```
//!
//! Logs go to stderr through `tracing`, so stdout carries only results.
//! Running without a subcommand is the same as `lychrel scan`. Scan flags
//! given before `scan` fill in whatever the subcommand leaves unset.

mod output;

use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use num_bigint::BigInt;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use lychrel_config::LychrelConfig;
use lychrel_core::{DigitSequence, IterationCap, check, walk};
use lychrel_engine::{Orchestrator, SessionRequest};
use lychrel_store::SqliteStore;
use lychrel_types::{Number, PartitionMode};

#[derive(Parser, Debug)]
#[command(name = "lychrel", version)]
#[command(about = "Finds the most delayed palindromes in base 12")]
struct Cli {
    /// Path to the database file
    #[arg(short, long, global = true)]
    database: Option<PathBuf>,

    /// Config file (default: $LYCHREL_CONFIG, then ~/.lychrel/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Quiet mode: log warnings only and skip the scan summary
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    scan: ScanArgs,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scan the next window and commit what it finds
    Scan(ScanArgs),
    /// Print every record, ascending by iteration count
    List,
    /// Print the checkpoint and record counts
    Status,
    /// Run the detector on a single number
    Check {
        /// Number to check (decimal unless --base12)
        number: String,
        /// Read NUMBER as duodecimal (digits 0-9, A, B)
        #[arg(long)]
        base12: bool,
        /// Iteration cap, at most the built-in maximum
        #[arg(long)]
        max_iters: Option<u32>,
    },
}

#[derive(Args, Debug, Default, Clone)]
struct ScanArgs {
    /// Number of worker threads
    #[arg(short, long, allow_negative_numbers = true)]
    threads: Option<i64>,

    /// Numbers checked by each worker
    #[arg(short, long, allow_negative_numbers = true)]
    numbers: Option<i64>,

    /// Overrides the starting number (default: stored checkpoint)
    #[arg(short, long, allow_negative_numbers = true)]
    start: Option<BigInt>,

    /// Work split: one range per worker, or small chunks on demand
    #[arg(long)]
    partition: Option<PartitionMode>,

    /// Numbers per chunk with --partition dynamic
    #[arg(long, allow_negative_numbers = true)]
    chunk_size: Option<i64>,
}

impl ScanArgs {
    fn is_empty(&self) -> bool {
        self.threads.is_none()
            && self.numbers.is_none()
            && self.start.is_none()
            && self.partition.is_none()
            && self.chunk_size.is_none()
    }

    /// Values from `self`, falling back to `base` field by field.
    fn or(self, base: ScanArgs) -> ScanArgs {
        ScanArgs {
            threads: self.threads.or(base.threads),
            numbers: self.numbers.or(base.numbers),
            start: self.start.or(base.start),
            partition: self.partition.or(base.partition),
            chunk_size: self.chunk_size.or(base.chunk_size),
        }
    }
}

fn init_tracing(quiet: bool) {
    let default_level = if quiet { "warn" } else { "info" };
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(env_filter)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.quiet);

    let config = load_config(cli.config.as_ref())?;
    let database = cli.database.clone().unwrap_or_else(|| config.database());

    match resolve_command(cli.command, cli.scan)? {
        Command::Scan(ref args) => scan(&database, &config, args, cli.quiet),
        Command::List => {
            let orchestrator = open(&database)?;
            print!("{}", output::records(&orchestrator.list_records()?));
            Ok(())
        }
        Command::Status => {
            let orchestrator = open(&database)?;
            print!("{}", output::status(&orchestrator.status()?));
            Ok(())
        }
        Command::Check {
            ref number,
            base12,
            max_iters,
        } => check_number(number, base12, max_iters),
    }
}

/// No subcommand means scan. Scan flags before the subcommand are only
/// accepted for scan itself.
fn resolve_command(command: Option<Command>, leading: ScanArgs) -> Result<Command> {
    match command {
        None => Ok(Command::Scan(leading)),
        Some(Command::Scan(args)) => Ok(Command::Scan(args.or(leading))),
        Some(other) if leading.is_empty() => Ok(other),
        Some(_) => bail!(
            "scan options (--threads, --numbers, --start, --partition, --chunk-size) only apply to scan"
        ),
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<LychrelConfig> {
    let loaded = match path {
        Some(path) => LychrelConfig::load_from(path)?,
        None => LychrelConfig::load()?,
    };
    Ok(loaded.unwrap_or_default())
}

fn open(database: &Path) -> Result<Orchestrator<SqliteStore>> {
    let store = SqliteStore::open(database)
        .with_context(|| format!("Failed to open database {}", database.display()))?;
    Ok(Orchestrator::new(store))
}

/// Flags win over the config file, which wins over built-in defaults.
fn session_request(args: &ScanArgs, config: &LychrelConfig) -> Result<SessionRequest> {
    let request = SessionRequest::new(
        args.start.clone(),
        args.numbers.unwrap_or_else(|| config.span()),
        args.threads.unwrap_or_else(|| config.workers()),
    )?
    .partitioned(
        args.partition.unwrap_or_else(|| config.partition()),
        args.chunk_size.unwrap_or_else(|| config.chunk_size()),
    )?;
    Ok(request)
}

fn scan(database: &Path, config: &LychrelConfig, args: &ScanArgs, quiet: bool) -> Result<()> {
    // Validate before the database is touched.
    let request = session_request(args, config)?;
    let mut orchestrator = open(database)?;
    let report = orchestrator.run_session(&request)?;
    if !quiet {
        print!("{}", output::session_report(&report));
    }
    Ok(())
}

fn check_number(raw: &str, base12: bool, max_iters: Option<u32>) -> Result<()> {
    let n = parse_number(raw, base12)?;
    let cap = match max_iters {
        Some(cap) => IterationCap::new(cap)?,
        None => IterationCap::MAX,
    };
    let outcome = check(&n, cap);
    let palindrome = outcome.iterations().map(|steps| walk(&n, steps));
    print!("{}", output::check(&n, outcome, palindrome.as_ref()));
    Ok(())
}

fn parse_number(raw: &str, base12: bool) -> Result<Number> {
    let raw = raw.trim();
    if raw.starts_with('-') {
        bail!("number must not be negative (got {raw})");
    }
    if base12 {
        let digits = DigitSequence::from_str(raw)
            .with_context(|| format!("'{raw}' is not a duodecimal number"))?;
        return Ok(digits.value());
    }
    Number::from_str(raw).with_context(|| format!("'{raw}' is not a decimal number"))
}
