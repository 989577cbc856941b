//! classkit CLI: console front end for the quiz, joke teller, and student
//! record store.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

use commands::students::StudentAction;

#[derive(Parser)]
#[command(
    name = "classkit",
    version,
    about = "Classroom exercises: arithmetic quiz, jokes, and student records"
)]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a ten-question arithmetic quiz
    Quiz {
        /// Difficulty: easy, moderate, advanced (shows a menu if omitted)
        #[arg(long)]
        difficulty: Option<String>,

        /// Seed for reproducible problems
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Hear some jokes
    Joke {
        /// Joke file (overrides config)
        #[arg(long)]
        file: Option<PathBuf>,

        /// Seed for reproducible picks
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Manage student records
    Students {
        /// Student record file (overrides config)
        #[arg(long, global = true)]
        file: Option<PathBuf>,

        #[command(subcommand)]
        action: StudentAction,
    },

    /// Create starter config, joke file, and student file
    Init,
}

fn main() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("classkit_core=warn"));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();

    let cli = Cli::parse();
    let config = cli.config;

    let result = match cli.command {
        Commands::Quiz { difficulty, seed } => commands::quiz::execute(difficulty, seed, config),
        Commands::Joke { file, seed } => commands::joke::execute(file, seed, config),
        Commands::Students { file, action } => commands::students::execute(file, action, config),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
