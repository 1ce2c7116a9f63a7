use chrono::NaiveDate;
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "studyplan-cli", version, about = "Studyplan CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Exam subject management
    Subject {
        #[command(subcommand)]
        action: commands::subject::SubjectAction,
    },
    /// Rank subjects by study priority
    Recommend {
        /// Evaluate as of this date instead of today
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Timer session control
    Timer {
        #[command(subcommand)]
        action: commands::timer::TimerAction,
    },
    /// Study record queries
    Record {
        #[command(subcommand)]
        action: commands::record::RecordAction,
    },
    /// Calendar exam markers
    Calendar {
        /// Evaluate as of this date instead of today
        #[arg(long)]
        date: Option<NaiveDate>,
        /// List subjects whose exam falls on this day
        #[arg(long)]
        day: Option<NaiveDate>,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Subject { action } => commands::subject::run(action),
        Commands::Recommend { date } => commands::recommend::run(date),
        Commands::Timer { action } => commands::timer::run(action),
        Commands::Record { action } => commands::record::run(action),
        Commands::Calendar { date, day } => commands::calendar::run(date, day),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
