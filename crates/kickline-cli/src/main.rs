// Kickline entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file)
// 2. Load config
// 3. Open database
// 4. Run the requested subcommand and print its report

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{error, info};

use kickline::{commands, config};
use kickline_store::Database;

/// Fantasy scoring and ladder engine.
#[derive(Parser, Debug)]
#[command(name = "kickline")]
#[command(about = "Score fantasy rounds, keep the ladder and run the finals")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show one manager's round with per-slot substitutions
    Score {
        #[arg(short, long)]
        round: u32,

        #[arg(short, long)]
        manager: String,
    },

    /// Score every manager in a round and record the totals
    Results {
        #[arg(short, long)]
        round: u32,
    },

    /// Print the ladder as of a round
    Ladder {
        #[arg(short, long)]
        round: u32,
    },

    /// Print the finals bracket
    Finals,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing()?;
    info!(command = ?cli.command, "kickline starting");

    let config = config::load_config().context("failed to load configuration")?;
    let rules = config.rules();
    info!(league = %config.league.name, rounds = rules.regular_season_rounds, "config loaded");

    let db = Database::open(&config.db_path).context("failed to open database")?;
    info!("Database opened at {}", config.db_path);

    let output = match &cli.command {
        Command::Score { round, manager } => commands::score(&db, &rules, *round, manager),
        Command::Results { round } => commands::results(&db, &rules, *round),
        Command::Ladder { round } => commands::ladder(&db, &rules, *round, chrono::Utc::now()),
        Command::Finals => commands::finals(&db, &rules),
    };

    match output {
        Ok(text) => {
            print!("{text}");
            Ok(())
        }
        Err(e) => {
            error!("{:#}", e);
            Err(e)
        }
    }
}

/// Append log output to `logs/kickline.log`. Each subcommand is a separate
/// process, so the file is never truncated. `KICKLINE_LOG` overrides the
/// filter.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("failed to create {}", log_dir.display()))?;
    let log_path = log_dir.join("kickline.log");
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("failed to open {}", log_path.display()))?;

    let filter = EnvFilter::try_from_env("KICKLINE_LOG")
        .unwrap_or_else(|_| EnvFilter::new("kickline=info,warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to set tracing subscriber: {e}"))?;

    Ok(())
}
