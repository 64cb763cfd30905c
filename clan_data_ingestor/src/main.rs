use std::path::PathBuf;

use chrono::Utc;
use clap::{Parser, Subcommand};

use clan_data_ingestor::{
    errors::Error,
    io::sink::{LogDirSink, SnapshotSink},
    models::roster::RosterDoc,
    providers::{ClanDataProvider, coc_rest::CocRestProvider},
};

#[derive(Parser)]
#[command(version, about = "Fetch raw clan activity snapshots")]
struct Cli {
    /// Root directory for the on-disk snapshot logs
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the current member list and replace the roster document
    Roster,
    /// Fetch the current war and store its snapshot document
    War,
    /// Fetch the latest capital raid season and store its snapshot document
    Raid,
    /// Fetch roster, war, and raid in one pass
    All,
}

async fn capture_roster(
    provider: &dyn ClanDataProvider,
    sink: &LogDirSink,
) -> Result<(), Error> {
    let list = provider
        .fetch_roster()
        .await
        .map_err(|e| Error::Provider(e.to_string()))?;
    let doc = RosterDoc::from_member_list(&list, Utc::now().date_naive());
    let path = sink
        .write_roster(&doc)
        .await
        .map_err(|e| Error::Sink(e.to_string()))?;
    println!("{}", path.display());
    Ok(())
}

async fn capture_war(provider: &dyn ClanDataProvider, sink: &LogDirSink) -> Result<(), Error> {
    match provider
        .fetch_current_war()
        .await
        .map_err(|e| Error::Provider(e.to_string()))?
    {
        Some(war) => {
            let path = sink
                .write_war(&war)
                .await
                .map_err(|e| Error::Sink(e.to_string()))?;
            println!("{}", path.display());
        }
        None => eprintln!("clan is not currently in war"),
    }
    Ok(())
}

async fn capture_raid(provider: &dyn ClanDataProvider, sink: &LogDirSink) -> Result<(), Error> {
    match provider
        .fetch_latest_raid()
        .await
        .map_err(|e| Error::Provider(e.to_string()))?
    {
        Some(raid) => {
            let path = sink
                .write_raid(&raid)
                .await
                .map_err(|e| Error::Sink(e.to_string()))?;
            println!("{}", path.display());
        }
        None => eprintln!("no raid seasons reported"),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let cli = Cli::parse();

    let provider = CocRestProvider::new().map_err(|e| Error::Config(e.to_string()))?;
    let sink = LogDirSink::new(&cli.data_dir);

    match cli.command {
        Commands::Roster => capture_roster(&provider, &sink).await?,
        Commands::War => capture_war(&provider, &sink).await?,
        Commands::Raid => capture_raid(&provider, &sink).await?,
        Commands::All => {
            capture_roster(&provider, &sink).await?;
            capture_war(&provider, &sink).await?;
            capture_raid(&provider, &sink).await?;
        }
    }

    Ok(())
}
