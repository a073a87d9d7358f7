//! Page-cache policy simulator CLI.
//!
//! This binary is the user-space side of the page-cache profiler. It performs:
//! 1. **Record:** Drain raw events from the instrumentation channel into a persisted
//!    log, optionally simulating every policy live.
//! 2. **Replay:** Feed a persisted log through FIFO, LRU, MRU and LFU and print the
//!    comparison with the kernel's reconciled hit rate.
//!
//! Both modes stop cleanly on SIGINT/SIGTERM: the current batch is finished, the log
//! is flushed and the report is printed.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use pagesim_core::config::ReportFormat;
use pagesim_core::event::log::{LogReader, LogWriter};
use pagesim_core::sim::{ChannelSource, drain};
use pagesim_core::stats::Report;
use pagesim_core::{Config, Event, SimError, SimResult, Simulation};

/// Raised by the signal handler; polled between batches.
static STOP: AtomicBool = AtomicBool::new(false);

#[derive(Parser, Debug)]
#[command(
    name = "pagesim",
    author,
    version,
    about = "Compare the kernel's page-cache hit rate with FIFO, LRU, MRU and LFU",
    long_about = "Record page-cache events from the instrumentation channel, or replay a recorded log, \
                  and compare the kernel's reconciled hit rate with idealized replacement policies.\n\n\
                  Examples:\n  \
                  pagesim record --source /run/pagesim/events --log page.log\n  \
                  pagesim replay --log page.log --evict-every 10000 --evict-count 64\n  \
                  pagesim --config sim.json replay --json"
)]
struct Cli {
    #[command(flatten)]
    opts: GlobalOpts,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct GlobalOpts {
    /// JSON configuration file; flags below override it.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level (RUST_LOG takes precedence).
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Echo every event to stdout.
    #[arg(long, global = true)]
    echo: bool,

    /// Inject a synthetic eviction every N events.
    #[arg(long, value_name = "N", global = true)]
    evict_every: Option<u64>,

    /// Pages removed by each synthetic eviction.
    #[arg(long, value_name = "K", global = true)]
    evict_count: Option<u64>,

    /// Simulated capacity of each policy, in pages.
    #[arg(long, value_name = "PAGES", global = true)]
    capacity: Option<usize>,

    /// Print the report as JSON.
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Drain raw events from the instrumentation channel into a log.
    Record {
        /// Channel to read raw event records from (FIFO or file).
        #[arg(short, long)]
        source: PathBuf,

        /// Log file to write.
        #[arg(short, long, default_value = "page.log")]
        log: PathBuf,

        /// Also simulate every policy and print the report on exit.
        #[arg(long)]
        simulate: bool,

        /// Print a running event counter.
        #[arg(long)]
        progress: bool,
    },

    /// Replay a recorded log through every policy and print the report.
    Replay {
        /// Log file to read.
        #[arg(short, long, default_value = "page.log")]
        log: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.opts.verbose);

    let result = build_config(&cli.opts).and_then(|config| {
        if let Err(e) = install_stop_handler() {
            warn!(error = %e, "cannot install signal handler; stop with EOF only");
        }
        match cli.command {
            Commands::Record {
                source,
                log,
                simulate,
                progress,
            } => cmd_record(config, &source, &log, simulate, progress),
            Commands::Replay { log } => cmd_replay(&config, &log),
        }
    });

    if let Err(e) = result {
        eprintln!("\n[!] FATAL: {e}");
        process::exit(1);
    }
}

/// Installs the `tracing` subscriber on stderr.
fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Routes SIGINT and SIGTERM to the stop flag.
fn install_stop_handler() -> Result<(), ctrlc::Error> {
    ctrlc::set_handler(|| STOP.store(true, Ordering::Relaxed))
}

/// Loads the configuration file, if any, and applies command-line overrides.
fn build_config(opts: &GlobalOpts) -> SimResult<Config> {
    let mut config = match &opts.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if opts.echo {
        config.general.echo_events = true;
    }
    if let Some(n) = opts.evict_every {
        config.eviction.interval = n;
    }
    if let Some(k) = opts.evict_count {
        config.eviction.count = k;
    }
    if opts.capacity.is_some() {
        config.capacity = opts.capacity;
    }
    if opts.json {
        config.report.format = ReportFormat::Json;
    }
    config.validate()?;
    Ok(config)
}

/// Drains the channel into the log until it closes or a stop signal arrives.
fn cmd_record(
    mut config: Config,
    source: &Path,
    log: &Path,
    simulate: bool,
    progress: bool,
) -> SimResult<()> {
    config.general.progress |= progress;
    let mut channel = ChannelSource::open(source, config.channel.record_size)?;
    let file = File::create(log).map_err(SimError::LogWrite)?;
    let mut writer = LogWriter::new(BufWriter::new(file));
    let mut sim = simulate.then(|| Simulation::new(&config));
    let mut failure = None;

    info!(source = %source.display(), log = %log.display(), "recording");
    let timeout = Duration::from_millis(config.channel.poll_timeout_ms);
    let stats = drain(&mut channel, &STOP, timeout, |event| {
        if failure.is_some() {
            return;
        }
        if let Err(e) = writer.append(event) {
            failure = Some(e);
            STOP.store(true, Ordering::Relaxed);
            return;
        }
        if config.general.echo_events {
            println!("{event}");
        }
        if config.general.progress {
            if let Err(e) = print_progress(&mut io::stdout().lock(), writer.written()) {
                failure = Some(e);
                STOP.store(true, Ordering::Relaxed);
                return;
            }
        }
        if let Some(sim) = sim.as_mut() {
            sim.process(event);
        }
    })?;

    writer.flush()?;
    if let Some(e) = failure {
        return Err(e);
    }
    println!(
        "\nEvents Logged: {} ({} malformed records skipped)",
        stats.records, stats.malformed
    );

    if let Some(sim) = sim {
        sim.log_summaries();
        print_report(&sim.report(), config.report.format)?;
    }
    Ok(())
}

/// Replays a persisted log and prints the comparison.
fn cmd_replay(config: &Config, log: &Path) -> SimResult<()> {
    let reader = LogReader::open(log)?;
    let mut sim = Simulation::new(config);
    let mut malformed = 0u64;

    info!(log = %log.display(), "replaying");
    for item in reader {
        if STOP.load(Ordering::Relaxed) {
            warn!("stopped before end of log");
            break;
        }
        let event: Event = match item {
            Ok(event) => event,
            Err(e) if e.is_recoverable() => {
                malformed += 1;
                warn!(error = %e, "skipping line");
                continue;
            }
            Err(e) => return Err(e),
        };
        if config.general.echo_events {
            println!("{event}");
        }
        sim.process(&event);
    }

    info!(
        events = sim.processed(),
        malformed,
        synthetic_evictions = sim.synthetic_evictions(),
        "replay finished"
    );
    sim.log_summaries();
    print_report(&sim.report(), config.report.format)
}

/// Rewrites the running counter in place.
fn print_progress(out: &mut impl Write, logged: u64) -> SimResult<()> {
    write!(out, "Events Logged: {logged:<32}\r")
        .and_then(|()| out.flush())
        .map_err(SimError::Output)
}

fn print_report(report: &Report, format: ReportFormat) -> SimResult<()> {
    match format {
        ReportFormat::Table => {
            println!();
            print!("{report}");
        }
        ReportFormat::Json => {
            let text = serde_json::to_string_pretty(report)
                .map_err(|e| SimError::Output(io::Error::other(e)))?;
            println!("{text}");
        }
    }
    Ok(())
}
