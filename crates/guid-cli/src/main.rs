//! Command-line interface for generating, inspecting and tagging GUIDs.

use std::fs;
use std::io::{self, Read, Write};
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, anyhow, bail};
use chrono::{DateTime, Local};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use guid::{Guid, set_global_fingerprint, set_global_prefix_bytes};
use serde::Serialize;
use tracing::{debug, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// ANSI C timestamp layout, e.g. `Fri May 28 12:17:02 2021`.
const ANSIC: &str = "%a %b %e %H:%M:%S %Y";

#[derive(Parser)]
#[command(name = "guid")]
#[command(about = "Generate, inspect and tag sortable GUIDs")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate one or more GUIDs
    #[command(visible_alias = "gen")]
    Generate(GenerateArgs),
    /// Inspect a GUID and print its parts
    Scan {
        /// Full 26-character GUID
        guid: String,
        /// Print the parts as JSON
        #[arg(long)]
        json: bool,
    },
    /// Tag a file (or stdin) with a GUID and print the hex digest
    Sign {
        /// GUID to sign with
        guid: String,
        /// Input file; reads stdin when omitted
        file: Option<PathBuf>,
    },
    /// Check whether a hex digest was tagged by a GUID
    Verify {
        /// GUID that supposedly signed
        guid: String,
        /// 64-character hex digest
        digest: String,
    },
}

#[derive(Args)]
struct GenerateArgs {
    /// GUID prefix (first two bytes are used)
    #[arg(short, long, env = "GUID_PREFIX")]
    prefix: Option<String>,

    /// Device fingerprint
    #[arg(long, env = "GUID_FINGERPRINT")]
    fingerprint: Option<i32>,

    /// Number of GUIDs to generate
    #[arg(short = 'n', long = "count", default_value_t = 1)]
    count: usize,

    /// Separator between GUIDs (default: CRLF)
    #[arg(long)]
    sep: Option<String>,

    /// Generate all GUIDs on the calling thread
    #[arg(long)]
    serial: bool,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output slugs instead of full GUIDs
    #[arg(long)]
    slug: bool,
}

#[derive(Serialize)]
struct ScanReport {
    prefix: String,
    timestamp: String,
    fingerprint: String,
    increment_counter: String,
    decrement_counter: String,
    random: String,
}

impl ScanReport {
    fn new(g: &Guid) -> Self {
        let (b1, b2) = g.prefix_bytes();
        let (incr, decr) = g.counters();
        Self {
            prefix: String::from_utf8_lossy(&[b1, b2]).into_owned(),
            timestamp: DateTime::<Local>::from(g.time()).format(ANSIC).to_string(),
            fingerprint: g.fingerprint().to_string(),
            increment_counter: incr.to_string(),
            decrement_counter: decr.to_string(),
            random: g.random().to_string(),
        }
    }
}

fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate(args) => generate(args).map(|()| ExitCode::SUCCESS),
        Commands::Scan { guid, json } => Ok(scan(&guid, json)),
        Commands::Sign { guid, file } => sign(&guid, file).map(|()| ExitCode::SUCCESS),
        Commands::Verify { guid, digest } => verify(&guid, &digest),
    }
}

fn generate(args: GenerateArgs) -> anyhow::Result<()> {
    if let Some(prefix) = args.prefix.as_deref() {
        match prefix.as_bytes() {
            [b1, b2, ..] => set_global_prefix_bytes(*b1, *b2),
            _ => warn!(prefix, "prefix shorter than two bytes, ignoring"),
        }
    }
    if let Some(fingerprint) = args.fingerprint {
        set_global_fingerprint(fingerprint);
    }

    // must make at least 1
    let count = args.count.max(1);
    let guids = if args.serial {
        generate_serially(count)
    } else {
        generate_parallel(count)?
    };

    let rendered: Vec<String> = guids
        .iter()
        .map(|g| if args.slug { g.slug() } else { g.to_string() })
        .collect();
    let sep = args.sep.unwrap_or_else(|| "\r\n".to_string());
    let out = rendered.join(&sep);

    match args.output {
        Some(path) => {
            let path = if path.is_relative() {
                std::env::current_dir()
                    .context("normalize relative path failed")?
                    .join(path)
            } else {
                path
            };
            fs::write(&path, out.as_bytes())
                .with_context(|| format!("write to {} failed", path.display()))?;
            debug!(path = %path.display(), count, "wrote guids");
        }
        None => {
            io::stdout()
                .write_all(out.as_bytes())
                .context("write error")?;
        }
    }
    Ok(())
}

fn generate_serially(count: usize) -> Vec<Guid> {
    (0..count).map(|_| Guid::new()).collect()
}

fn generate_parallel(count: usize) -> anyhow::Result<Vec<Guid>> {
    let workers = std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
        .min(count);
    let chunk = count.div_ceil(workers);
    debug!(count, workers, "generating guids in parallel");

    std::thread::scope(|s| {
        let handles: Vec<_> = (0..workers)
            .map(|w| {
                let n = count.saturating_sub(w * chunk).min(chunk);
                s.spawn(move || generate_serially(n))
            })
            .collect();

        let mut out = Vec::with_capacity(count);
        for handle in handles {
            let batch = handle
                .join()
                .map_err(|_| anyhow!("generator thread panicked"))?;
            out.extend(batch);
        }
        Ok(out)
    })
}

fn scan(input: &str, json: bool) -> ExitCode {
    let g = match input.parse::<Guid>() {
        Ok(g) => g,
        Err(err) => {
            debug!(error = %err, "scan failed");
            if json {
                let message = format!(
                    "Parse GUID failed. '{}' is not a valid guid. Only a full guid can be scanned.",
                    input
                );
                eprintln!("{}", serde_json::json!({ "error": message }));
            } else {
                eprintln!(
                    "Parse GUID failed\n'{}' is not a valid guid\nOnly a full guid can be scanned.",
                    input
                );
            }
            return ExitCode::FAILURE;
        }
    };

    let report = ScanReport::new(&g);
    if json {
        match serde_json::to_string(&report) {
            Ok(data) => println!("{}", data),
            Err(err) => {
                eprintln!("encode scan report failed: {}", err);
                return ExitCode::FAILURE;
            }
        }
        return ExitCode::SUCCESS;
    }

    eprintln!("{}:      {}", "PREFIX".green(), report.prefix);
    eprintln!("{}:   {}", "TIMESTAMP".green(), report.timestamp);
    eprintln!("{}: {}", "FINGERPRINT".green(), report.fingerprint);
    eprintln!("{}:   {}", "COUNTER \u{2191}".green(), report.increment_counter);
    eprintln!("{}:   {}", "COUNTER \u{2193}".green(), report.decrement_counter);
    eprintln!("{}:      {}", "RANDOM".green(), report.random);
    ExitCode::SUCCESS
}

fn sign(guid: &str, file: Option<PathBuf>) -> anyhow::Result<()> {
    let g: Guid = guid.parse().with_context(|| format!("invalid guid '{}'", guid))?;

    let data = match file {
        Some(path) => {
            fs::read(&path).with_context(|| format!("read {} failed", path.display()))?
        }
        None => {
            let mut buf = Vec::new();
            io::stdin()
                .read_to_end(&mut buf)
                .context("read stdin failed")?;
            buf
        }
    };

    let Some(digest) = g.sign(&data) else {
        bail!("nothing to sign: input is empty");
    };
    println!("{}", digest);
    Ok(())
}

fn verify(guid: &str, digest: &str) -> anyhow::Result<ExitCode> {
    let g: Guid = guid.parse().with_context(|| format!("invalid guid '{}'", guid))?;
    let signed = g.did_sign(digest.trim());
    println!("{}", signed);
    Ok(if signed {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
