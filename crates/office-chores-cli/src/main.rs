use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "office-chores", version, about = "Office Chores CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Chore management and occurrence queries
    Chore {
        #[command(subcommand)]
        action: commands::chore::ChoreAction,
    },
    /// Month calendar view
    Calendar(commands::calendar::CalendarArgs),
    /// Week-ahead stats and upcoming chores
    Summary(commands::summary::SummaryArgs),
    /// Team member management
    Team {
        #[command(subcommand)]
        action: commands::team::TeamAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Chore reminders
    Remind {
        #[command(subcommand)]
        action: commands::remind::RemindAction,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Chore { action } => commands::chore::run(action),
        Commands::Calendar(args) => commands::calendar::run(args),
        Commands::Summary(args) => commands::summary::run(args),
        Commands::Team { action } => commands::team::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Remind { action } => commands::remind::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
