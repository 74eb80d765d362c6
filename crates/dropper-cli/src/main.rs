//! CLI frontend for the dropper loot engine.

mod commands;

use std::process;

use clap::{Parser, Subcommand};
use dropper_core::{Algorithm, DropEntry, DropItem};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;

#[derive(Parser)]
#[command(
    name = "dropper",
    about = "Roll loot from weighted drop tables",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show raw, guaranteed, effective and gentle chances for each item
    Chances {
        /// Items as id=chances (e.g. gold=150 gem=0.5)
        items: Vec<DropItem>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Run one roll session
    Roll {
        /// Items as id=chances (e.g. gold=150 gem=0.5)
        items: Vec<DropItem>,

        /// Additional items as a JSON array of {"id", "chances"}
        #[arg(long)]
        table_json: Option<String>,

        /// Chance curve: normal or gentle
        #[arg(short, long, default_value = "normal")]
        algorithm: Algorithm,

        /// Minimum number of successful draws
        #[arg(short, long, default_value = "1")]
        required: u32,

        /// Minimum number of trials
        #[arg(short, long, default_value = "0", allow_hyphen_values = true)]
        max: i64,

        /// History length before the rarest item can be gifted (0 = off)
        #[arg(short, long, default_value = "0")]
        gift: u32,

        /// Past drops as id or id:quantity (repeatable)
        #[arg(short = 'H', long = "history")]
        history: Vec<DropEntry>,

        /// RNG seed (random when omitted)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Trial cap per session (0 = unlimited)
        #[arg(long, default_value_t = dropper_core::config::DEFAULT_MAX_TRIALS)]
        max_trials: u64,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

fn init_tracing() {
    let subscriber = tracing_subscriber::Registry::default()
        .with(tracing_subscriber::fmt::Layer::default().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env());

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("warning: logging disabled: {e}");
    }
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Chances { items, json } => commands::chances::run(items, json),
        Commands::Roll {
            items,
            table_json,
            algorithm,
            required,
            max,
            gift,
            history,
            seed,
            max_trials,
            json,
        } => {
            let config = dropper_core::RollConfig::default()
                .with_algorithm(algorithm)
                .with_required(required)
                .with_max(max)
                .with_gift(gift)
                .with_max_trials(max_trials);
            commands::roll::run(items, table_json.as_deref(), &config, &history, seed, json)
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
