//! Bet tracker terminal shell.
//!
//! Entry point. Loads configuration, initialises structured logging,
//! reopens the ledger from disk, optionally serves the dashboard, and then
//! applies line commands from stdin until EOF or Ctrl+C.

use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};

use bet_tracker::commands::{self, Command};
use bet_tracker::config::AppConfig;
use bet_tracker::cues::ChannelSink;
use bet_tracker::dashboard::{self, DashboardState};
use bet_tracker::ledger::Ledger;
use bet_tracker::storage::JsonFileStore;

const BANNER: &str = r#"
  ___      _     _____            _
 | _ ) ___| |_  |_   _| _ __ _ __| |_____ _ _
 | _ \/ -_)  _|   | || '_/ _` / _| / / -_) '_|
 |___/\___|\__|   |_||_| \__,_\__|_\_\___|_|
"#;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    let config_path = std::env::var("BET_TRACKER_CONFIG").unwrap_or_else(|_| "config.toml".into());
    let cfg = AppConfig::load_or_default(&config_path)?;

    init_logging();

    println!("{BANNER}");
    info!(
        name = %cfg.app.name,
        currency = %cfg.app.currency,
        data_dir = %cfg.storage.data_dir.display(),
        "Bet tracker starting up"
    );

    // -- Ledger ----------------------------------------------------------

    let store = JsonFileStore::open(&cfg.storage.data_dir)
        .with_context(|| format!("Failed to open data dir {}", cfg.storage.data_dir.display()))?;
    let (sink, mut cues) = ChannelSink::new();
    let ledger = Ledger::open(Box::new(store))
        .with_sink(Box::new(sink))
        .with_cue_duration(cfg.cues.duration());
    info!(
        bets = ledger.len(),
        totals = %ledger.totals(),
        "Ledger restored"
    );

    let state = Arc::new(DashboardState::new(ledger));

    if cfg.dashboard.enabled {
        dashboard::spawn_dashboard(state.clone(), cfg.dashboard.port).await?;
    }

    // Outcome cues are printed as they arrive; how long they'd stay on a
    // graphical screen is carried in the event.
    tokio::spawn(async move {
        while let Some(event) = cues.recv().await {
            println!("  {event}");
        }
    });

    // -- Command loop ----------------------------------------------------

    println!("{}", commands::HELP);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read stdin")? else {
                    info!("End of input.");
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }

                let command = match line.parse::<Command>() {
                    Ok(c) => c,
                    Err(e) => {
                        println!("  {e}");
                        continue;
                    }
                };
                if command == Command::Quit {
                    break;
                }

                let mut ledger = state.ledger.write().await;
                match commands::apply(&mut ledger, &command) {
                    Ok(text) => println!("{text}"),
                    Err(e) => {
                        warn!(error = %e, "Command rejected");
                        println!("  {e}");
                    }
                }
            }
            _ = &mut shutdown => {
                info!("Shutdown signal received.");
                break;
            }
        }
    }

    // One last attempt if an earlier write failed.
    let mut ledger = state.ledger.write().await;
    if ledger.is_dirty() {
        if let Err(e) = ledger.flush() {
            error!(error = %e, "Final save failed; recent changes may be lost");
        }
    }
    info!(
        bets = ledger.len(),
        totals = %ledger.totals(),
        "Bet tracker shut down cleanly."
    );

    Ok(())
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("bet_tracker=info"));

    let json_logging = std::env::var("BET_TRACKER_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    }
}
