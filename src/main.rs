//! Airlock console: runs the sequencer against a simulated grid.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  stdin reader thread ──lines──▶ main loop ◀──poll── Ticks    │
//! │                                     │                        │
//! │                                     ▼                        │
//! │                      AirlockService::invoke(arg)             │
//! │                                     │                        │
//! │        SimulatedGrid (Block+Device) · LogEventSink · Ticks   │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every input line is one command argument.  Lines starting with `:`
//! talk to the console itself (`:status`, `:break NAME`, `:repair NAME`,
//! `:quit`).  When stdin closes the console keeps ticking until the
//! running sequence finishes.

use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};
use clap::Parser;
use log::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use airlock::adapters::config_file::JsonConfigFile;
use airlock::adapters::log_sink::LogEventSink;
use airlock::adapters::sim::{GridLayout, SimulatedGrid};
use airlock::app::ports::{ConfigError, ConfigPort};
use airlock::scheduler::TickScheduler;
use airlock::{AirlockConfig, AirlockService, Error};

/// Airlock sequencer console
///
/// Reads commands such as `Depressurize Airlock` from stdin, one per
/// line, and cycles the doors and vent of a simulated grid.
#[derive(Parser, Debug)]
#[command(name = "airlock", version, about, long_about = None)]
struct Cli {
    /// Verbose output. Repeat for more (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// JSON config file.  Defaults apply when absent.
    #[arg(long)]
    config: Option<PathBuf>,

    /// JSON grid layout.  A single demo airlock when absent.
    #[arg(long)]
    grid: Option<PathBuf>,

    /// Fixed airlock group; commands then take no group argument.
    #[arg(long)]
    group: Option<String>,

    /// Override the resume-tick interval in milliseconds.
    #[arg(long)]
    tick_ms: Option<u32>,
}

enum Input {
    Line(String),
    Closed,
    Quiet,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match cli.verbose {
        0 => EnvFilter::new("info"),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    info!("Airlock console v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config(&cli)?;
    let layout = load_layout(cli.grid.as_deref())?;

    let mut grid = SimulatedGrid::from_layout(&layout);
    let mut sink = LogEventSink::new();
    let mut ticks = TickScheduler::new(Duration::from_millis(u64::from(config.tick_interval_ms)));
    let mut service = AirlockService::new(config);

    let lines = spawn_stdin_reader();
    let mut input_open = true;

    loop {
        let now = Instant::now();
        if ticks.poll(now) {
            run(&mut service, "", &mut grid, &mut ticks, &mut sink)?;
            continue;
        }

        match next_input(&lines, input_open, ticks.time_until_due(now)) {
            Input::Line(line) => {
                let line = line.trim();
                if let Some(host) = line.strip_prefix(':') {
                    if !host_command(host, &service, &mut grid) {
                        break;
                    }
                } else if !line.is_empty() {
                    run(&mut service, line, &mut grid, &mut ticks, &mut sink)?;
                }
            }
            Input::Closed => {
                debug!("stdin closed");
                input_open = false;
                if service.is_idle() {
                    break;
                }
            }
            Input::Quiet => {
                if !input_open && service.is_idle() {
                    break;
                }
            }
        }
    }

    info!(
        "Exiting after {} invocation(s), {} tick(s), {} event(s)",
        service.invocations(),
        ticks.fired(),
        sink.emitted()
    );
    Ok(())
}

fn load_config(cli: &Cli) -> Result<AirlockConfig> {
    let mut config = match &cli.config {
        Some(path) => match JsonConfigFile::new(path).load() {
            Ok(config) => config,
            Err(ConfigError::NotFound) => {
                warn!("Config {} not found, using defaults", path.display());
                AirlockConfig::default()
            }
            Err(e) => return Err(e).with_context(|| format!("loading {}", path.display())),
        },
        None => AirlockConfig::default(),
    };

    if let Some(group) = &cli.group {
        config.group_name = Some(group.clone());
    }
    if let Some(ms) = cli.tick_ms {
        config.tick_interval_ms = ms;
    }
    if let Err(field) = config.validate() {
        bail!("invalid configuration: {}", field);
    }
    Ok(config)
}

fn load_layout(path: Option<&Path>) -> Result<GridLayout> {
    let Some(path) = path else {
        return Ok(GridLayout::demo());
    };
    let text =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

fn spawn_stdin_reader() -> Receiver<String> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

/// Wait for the next line, or until the next tick is due.
fn next_input(lines: &Receiver<String>, open: bool, timeout: Option<Duration>) -> Input {
    match (open, timeout) {
        (true, Some(t)) => match lines.recv_timeout(t) {
            Ok(line) => Input::Line(line),
            Err(RecvTimeoutError::Timeout) => Input::Quiet,
            Err(RecvTimeoutError::Disconnected) => Input::Closed,
        },
        (true, None) => lines.recv().map_or(Input::Closed, Input::Line),
        (false, Some(t)) => {
            thread::sleep(t);
            Input::Quiet
        }
        (false, None) => Input::Quiet,
    }
}

/// One engine invocation.  Only a double-armed wait is fatal; every
/// other failure has already been reported through the sink.
fn run(
    service: &mut AirlockService,
    argument: &str,
    grid: &mut SimulatedGrid,
    ticks: &mut TickScheduler,
    sink: &mut LogEventSink,
) -> Result<()> {
    match service.invoke(argument, Instant::now(), grid, ticks, sink) {
        Ok(outcome) => {
            debug!("invoke({:?}) -> {:?}", argument, outcome);
            Ok(())
        }
        Err(Error::OperationAlreadyWaiting) => bail!(Error::OperationAlreadyWaiting),
        Err(e) => {
            debug!("invoke({:?}) failed: {}", argument, e);
            Ok(())
        }
    }
}

/// Console-only commands.  Returns `false` to quit.
fn host_command(line: &str, service: &AirlockService, grid: &mut SimulatedGrid) -> bool {
    let (cmd, arg) = line
        .split_once(' ')
        .map_or((line, ""), |(c, a)| (c, a.trim()));
    match cmd {
        "quit" | "q" => return false,
        "status" => {
            println!(
                "stage {} | verb {} | group {} | demo {} | waiting {}",
                service.stage_index(),
                service.verb(),
                service.group_name().unwrap_or("-"),
                service.demo_mode(),
                service.is_wait_armed(),
            );
            for line in grid.describe() {
                println!("  {line}");
            }
        }
        "break" | "repair" => match grid.find(arg) {
            Some(id) => {
                grid.set_functional(id, cmd == "repair");
                info!("{} {} \"{}\"", cmd, id, arg);
            }
            None => warn!("No block named \"{}\"", arg),
        },
        "remove" => match grid.find(arg) {
            Some(id) => {
                grid.remove_block(id);
                info!("removed {} \"{}\"", id, arg);
            }
            None => warn!("No block named \"{}\"", arg),
        },
        other => warn!("Unknown console command :{}", other),
    }
    true
}
