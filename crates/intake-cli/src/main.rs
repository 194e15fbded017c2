use clap::{Parser, Subcommand};

mod commands;
mod common;

#[derive(Parser)]
#[command(name = "intake-cli", version, about = "Intake CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Questionnaire ingestion and catalog artifacts
    Catalog {
        #[command(subcommand)]
        action: commands::catalog::CatalogAction,
    },
    /// 14-day schedule building
    Schedule {
        #[command(subcommand)]
        action: commands::schedule::ScheduleAction,
    },
    /// Synthetic journey simulation
    Journey {
        #[command(subcommand)]
        action: commands::journey::JourneyAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Catalog { action } => commands::catalog::run(action),
        Commands::Schedule { action } => commands::schedule::run(action),
        Commands::Journey { action } => commands::journey::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
