//! rag-console: live health indicator for the document API.
//!
//! # Architecture Overview
//!
//! ```text
//!   ┌──────────────────────────── rag-console ────────────────────────────┐
//!   │                                                                      │
//!   │   interval tick ──┐                                                  │
//!   │                   ├──▶ HealthMonitor::probe ──GET /health──────────┼──▶ API
//!   │   Enter key ──────┘          │ (timeout)                             │
//!   │                              ▼                                       │
//!   │                  watch::Sender<HealthState>                          │
//!   │                              │                                       │
//!   │                              ▼                                       │
//!   │                  printer: "● API Healthy (Last checked: …)"          │
//!   │                                                                      │
//!   │   Ctrl-C / SIGTERM ──▶ Shutdown ──▶ stop schedule, drain, exit       │
//!   └──────────────────────────────────────────────────────────────────────┘
//! ```

use std::io::BufRead;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tokio::sync::{broadcast, mpsc, watch};

use rag_console::config::validation::validate_config;
use rag_console::config::{load_or_default, ConfigError};
use rag_console::health::display::{status_json, status_line};
use rag_console::lifecycle::signals;
use rag_console::{observability, HealthMonitor, HealthState, Shutdown};

#[derive(Parser)]
#[command(name = "rag-console", version)]
#[command(about = "Live health indicator for the document API", long_about = None)]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Health endpoint URL (overrides the config file)
    #[arg(long)]
    endpoint: Option<String>,

    /// Seconds between scheduled probes (overrides the config file)
    #[arg(long)]
    interval_secs: Option<u64>,

    /// Probe once and exit: 0 when healthy, 1 otherwise
    #[arg(long)]
    once: bool,

    /// Print states as JSON lines
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = load_or_default(args.config.as_deref())?;
    if let Some(endpoint) = args.endpoint {
        config.health.endpoint = endpoint;
    }
    if let Some(secs) = args.interval_secs {
        config.health.interval_secs = secs;
    }
    validate_config(&config).map_err(ConfigError::Validation)?;

    observability::init(&config.observability);
    match &args.config {
        Some(path) => tracing::debug!(path = %path.display(), "Configuration file loaded"),
        None => tracing::debug!("No configuration file given, using defaults"),
    }

    let monitor = HealthMonitor::new(&config.health)?;
    tracing::debug!(endpoint = %monitor.endpoint(), "Health monitor ready");

    if args.once {
        let state = monitor.probe().await;
        print_state(&state, args.json);
        return Ok(if state.is_healthy() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        });
    }

    let shutdown = Shutdown::new();
    let printer = tokio::spawn(print_changes(
        monitor.subscribe(),
        args.json,
        shutdown.subscribe(),
    ));
    let refresher = tokio::spawn(refresh_on_enter(
        monitor.clone(),
        spawn_stdin_reader(),
        shutdown.subscribe(),
    ));

    let schedule = if config.health.enabled {
        Some(monitor.start(config.health.interval()))
    } else {
        tracing::info!("Scheduled probes disabled; press Enter to probe");
        monitor.refresh_now();
        None
    };
    eprintln!("Press Enter to refresh, Ctrl-C to quit.");

    signals::trigger_on_signal(&shutdown).await;
    tracing::debug!(tasks = shutdown.receiver_count(), "Waiting for tasks to stop");

    if let Some(schedule) = schedule {
        schedule.stop();
    }
    let _ = refresher.await;
    let _ = printer.await;

    tracing::info!("Shutdown complete");
    Ok(ExitCode::SUCCESS)
}

fn print_state(state: &HealthState, json: bool) {
    if json {
        println!("{}", status_json(state));
    } else {
        println!("{}", status_line(state));
    }
}

async fn print_changes(
    mut states: watch::Receiver<HealthState>,
    json: bool,
    mut shutdown: broadcast::Receiver<()>,
) {
    let initial = *states.borrow_and_update();
    print_state(&initial, json);

    loop {
        tokio::select! {
            changed = states.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = *states.borrow_and_update();
                print_state(&state, json);
            }
            _ = shutdown.recv() => break,
        }
    }
}

async fn refresh_on_enter(
    monitor: HealthMonitor,
    mut lines: mpsc::UnboundedReceiver<()>,
    mut shutdown: broadcast::Receiver<()>,
) {
    loop {
        tokio::select! {
            Some(()) = lines.recv() => {
                tracing::debug!("Manual refresh requested");
                monitor.refresh_now();
            }
            _ = shutdown.recv() => break,
        }
    }
}

/// Blocking stdin reads live on their own thread so they never hold up
/// runtime shutdown.
fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<()> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            if line.is_err() || tx.send(()).is_err() {
                break;
            }
        }
    });
    rx
}
