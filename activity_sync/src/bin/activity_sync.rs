use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

use activity_sync::config::{self, TrackerConfig};
use activity_sync::manifest::repo::JsonManifestRepo;
use activity_sync::period::EventType;
use activity_sync::providers::{FileRoster, LogDirSnapshots};
use activity_sync::reconcile::{PassOptions, run_pass};
use activity_sync::store::repo::JsonFileRepo;

#[derive(Parser)]
#[command(version, about = "Clan Activity Sync CLI")]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    History(HistoryCmd),
}

#[derive(Args)]
struct HistoryCmd {
    #[command(subcommand)]
    sub: HistorySub,
}

#[derive(Subcommand)]
enum HistorySub {
    Sync {
        /// Event type to reconcile: "war" or "raid"
        #[arg(long, value_name = "EVENT")]
        event_type: String,
        #[arg(long, value_name = "FILE")]
        config: Option<String>,
        #[arg(long)]
        dry_run: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.cmd {
        Cmd::History(HistoryCmd {
            sub:
                HistorySub::Sync {
                    event_type,
                    config,
                    dry_run,
                },
        }) => {
            let event: EventType = event_type.parse()?;
            let cfg = match config {
                Some(path) => config::load_config_path(&path)?,
                None => TrackerConfig::default(),
            };

            let roster = FileRoster::new(&cfg.data_dir);
            let snapshots = LogDirSnapshots::new(&cfg.data_dir);
            let history = JsonFileRepo::new(&cfg.data_dir);
            let manifest = JsonManifestRepo::new(&cfg.data_dir);

            match run_pass(
                event,
                &roster,
                &snapshots,
                &history,
                &manifest,
                &cfg,
                PassOptions { dry_run },
            ) {
                Ok(report) => println!("{report}"),
                Err(err) if !err.is_fatal() => warn!(%err, "nothing to reconcile"),
                Err(err) => {
                    error!(%err, "pass failed");
                    return Err(err.into());
                }
            }
        }
    }

    Ok(())
}
