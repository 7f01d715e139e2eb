//! Trip planner: runs the trip aggregation service, or drives the planner
//! form and the saved-trip store from the command line.

mod config;
mod print;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing::{error, info};

use common::PlannerConfig;
use trip_client::{
    FileSlot, HttpBackend, ResultPanel, SavedTripStore, TripForm, TripPlanner, ViewAction,
};

#[derive(Parser)]
#[command(name = "trip-planner", about = "Plan trips with weather and a destination photo")]
struct Cli {
    /// Config file (defaults to ./config.toml when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the trip aggregation service.
    Serve {
        /// Overrides PORT and the config file.
        #[arg(long)]
        port: Option<u16>,
    },
    /// Ask the trip service for a trip and show the result.
    Plan {
        #[arg(long)]
        location: String,
        /// YYYY-MM-DD, strictly after today.
        #[arg(long)]
        start_date: String,
        /// Add the planned trip to the saved trips.
        #[arg(long)]
        save: bool,
    },
    /// Show saved trips, soonest first.
    List {
        /// Print the stored records as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Delete a saved trip by the index shown in `list`.
    Delete { index: usize },
    /// Remove every saved trip.
    Clear,
}

type Planner = TripPlanner<HttpBackend, FileSlot>;

fn saved_trip_store(cfg: &PlannerConfig) -> SavedTripStore<FileSlot> {
    SavedTripStore::new(FileSlot::new(&cfg.client.store_path))
}

fn planner(cfg: &PlannerConfig) -> anyhow::Result<Planner> {
    let backend = HttpBackend::new(
        cfg.client.backend_url.clone(),
        Duration::from_secs(cfg.http_timeout_secs),
    )?;
    Ok(TripPlanner::new(TripForm::new(backend), saved_trip_store(cfg)))
}

async fn plan(cfg: &PlannerConfig, location: &str, start_date: &str, save: bool) -> anyhow::Result<()> {
    let planner = planner(cfg)?;

    let panel = planner.submit(location, start_date).await;
    if let ResultPanel::Message(message) = &panel {
        bail!("{message}");
    }
    println!("{}", print::format_result(&panel));

    if save {
        let outcome = planner.dispatch(ViewAction::SaveTrip);
        if let Some(notice) = outcome.notice {
            println!("\n{notice}");
        }
        println!("\n{}", print::format_saved_trips(&outcome.saved_trips));
    }
    Ok(())
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config_path = cli.config.as_deref();

    match cli.command {
        Command::Serve { port } => {
            let mut cfg = config::load_server_config(config_path)?;
            if let Some(port) = port {
                cfg.port = port;
            }
            info!("Trip service starting on port {}", cfg.port);
            trip_service::serve(&cfg).await?;
        }
        Command::Plan {
            location,
            start_date,
            save,
        } => {
            let cfg = config::load_config(config_path)?;
            plan(&cfg, &location, &start_date, save).await?;
        }
        Command::List { json } => {
            let cfg = config::load_config(config_path)?;
            let store = saved_trip_store(&cfg);
            if json {
                let trips = serde_json::to_string_pretty(&store.list())
                    .context("serializing saved trips")?;
                println!("{trips}");
            } else {
                println!("{}", print::format_saved_trips(&store.render()));
            }
        }
        Command::Delete { index } => {
            let cfg = config::load_config(config_path)?;
            let planner = planner(&cfg)?;
            let outcome = planner.dispatch(ViewAction::DeleteTrip(index));
            if let Some(notice) = outcome.notice {
                bail!("{notice}");
            }
            println!("{}", print::format_saved_trips(&outcome.saved_trips));
        }
        Command::Clear => {
            let cfg = config::load_config(config_path)?;
            let planner = planner(&cfg)?;
            let view = planner.clear_saved_trips()?;
            println!("{}", print::format_saved_trips(&view));
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    // Initialize logging. Stdout carries command output.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "trip_planner=info,trip_service=info,trip_client=info,\
                 geonames_client=info,weatherbit_client=info,pixabay_client=info"
                    .into()
            }),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        error!("{:#}", e);
        std::process::exit(1);
    }
}
