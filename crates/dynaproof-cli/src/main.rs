//! dynaproof CLI: the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "dynaproof",
    version,
    about = "Adaptive short-answer assessment for rational-number arithmetic"
)]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory for learner profiles and the answer log (overrides config)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// RNG seed for reproducible questions (overrides config)
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a starter dynaproof.toml
    Init,

    /// Register a learner and print their ID
    Start {
        /// First name
        #[arg(long)]
        name: String,

        /// Surname
        #[arg(long)]
        surname: String,

        /// Class label, e.g. "7-A"
        #[arg(long = "class")]
        class_label: String,
    },

    /// Show the learner's current question
    Question {
        /// Learner ID printed by `start`
        #[arg(long)]
        learner: String,
    },

    /// Answer the learner's current question
    Answer {
        /// Learner ID printed by `start`
        #[arg(long)]
        learner: String,

        /// The written explanation
        #[arg(long)]
        text: String,
    },

    /// Summarize a learner's answers so far
    Summary {
        /// Learner ID printed by `start`
        #[arg(long)]
        learner: String,
    },

    /// Register and run a whole session interactively
    Quiz {
        /// First name
        #[arg(long)]
        name: String,

        /// Surname
        #[arg(long)]
        surname: String,

        /// Class label, e.g. "7-A"
        #[arg(long = "class")]
        class_label: String,
    },

    /// Build a cohort report from the answer log
    Report {
        /// Output file (default: <data-dir>/report.<format>)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Output format: html, json
        #[arg(long, default_value = "html")]
        format: String,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("dynaproof=info")),
        )
        .init();

    let cli = Cli::parse();
    let overrides = commands::Overrides {
        config: cli.config,
        data_dir: cli.data_dir,
        seed: cli.seed,
    };

    let result = match cli.command {
        Commands::Init => commands::init::execute(),
        Commands::Start {
            name,
            surname,
            class_label,
        } => commands::start::execute(&overrides, name, surname, class_label),
        Commands::Question { learner } => commands::question::execute(&overrides, learner),
        Commands::Answer { learner, text } => commands::answer::execute(&overrides, learner, text),
        Commands::Summary { learner } => commands::summary::execute(&overrides, learner),
        Commands::Quiz {
            name,
            surname,
            class_label,
        } => commands::quiz::execute(&overrides, name, surname, class_label),
        Commands::Report { output, format } => {
            commands::report::execute(&overrides, output, format)
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
