use std::process::ExitCode;

use chrono::Local;
use clap::{Args, Parser, Subcommand};
use room_allocation_backend::telemetry::setup_tracing;
use room_allocation_backend::{
    preview_allocation, resolve_week, run_allocation, stored_allocations, AppError, Target,
};
use room_allocation_config::get_config;
use room_allocation_database::PgStore;
use room_allocation_engine::Week;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "allocate",
    about = "Weekly meeting room and Oasis desk allocation",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct Selection {
    /// Which allocations to work on
    #[arg(short, long, value_enum, default_value_t = Target::All)]
    target: Target,
    /// Monday of the week (YYYY-MM-DD), defaults to the admin selected week
    /// and then to the upcoming week
    #[arg(short, long)]
    week: Option<Week>,
    /// Print JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Allocate the week and store the result
    Run {
        #[command(flatten)]
        selection: Selection,
        /// Seed for the random source, overrides the configured seed
        #[arg(long)]
        seed: Option<u64>,
        /// Compute and print the allocation without storing it
        #[arg(long)]
        dry_run: bool,
    },
    /// Print the stored allocation of a week
    Show {
        #[command(flatten)]
        selection: Selection,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode, AppError> {
    setup_tracing();
    let cli = Cli::parse();

    let config = get_config()?;
    let catalog = config.catalog()?;
    let store = PgStore::connect(&config.database_url, catalog.desk_pool().name.clone())?;
    let today = Local::now().date_naive();

    match cli.command {
        Command::Run {
            selection,
            seed,
            dry_run,
        } => {
            let week = resolve_week(&store, selection.week, today).await?;
            let seed = seed.or(config.seed).unwrap_or_else(rand::random);
            info!(%week, seed, dry_run, "allocating");
            let report = if dry_run {
                preview_allocation(&store, &catalog, week, selection.target, seed).await
            } else {
                run_allocation(&store, &catalog, week, selection.target, seed).await
            };
            if selection.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{report}");
            }
            Ok(if report.success {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Command::Show { selection } => {
            let week = resolve_week(&store, selection.week, today).await?;
            let stored = stored_allocations(&store, week, selection.target).await?;
            if selection.json {
                println!("{}", serde_json::to_string_pretty(&stored)?);
            } else {
                for allocations in &stored {
                    print!("{allocations}");
                }
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}
