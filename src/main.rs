use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use walkshed::{inspect_graph, load_config, run};

#[derive(Parser)]
#[command(name = "walkshed")]
#[command(about = "Walk times from many origins to a set of destinations", long_about = None)]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute walk times and write them to CSV
    Run {
        /// TOML run file
        config: PathBuf,
        /// Worker threads, overrides the config (0 or 1 runs serially)
        #[arg(short, long)]
        workers: Option<usize>,
        /// Output CSV, overrides the config
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Do not draw a progress bar
        #[arg(long)]
        no_progress: bool,
    },
    /// Index the street graph and print its statistics
    Inspect {
        /// TOML run file
        config: PathBuf,
    },
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Run {
            config,
            workers,
            output,
            no_progress,
        } => {
            let mut config = load_config(&config)?;
            if workers.is_some() {
                config.walk_times.worker_count = workers;
            }
            if let Some(output) = output {
                config.output.records = output;
            }
            if no_progress {
                config.output.progress = false;
            }

            let summary = run(&config)?;
            println!(
                "{} walk time records written to {}",
                summary.records,
                summary.records_path.display()
            );
            if !summary.failed_partitions.is_empty() {
                anyhow::bail!(
                    "{} partitions failed, results are incomplete",
                    summary.failed_partitions.len()
                );
            }
        }
        Commands::Inspect { config } => {
            let config = load_config(&config)?;
            let graph = inspect_graph(&config)?;
            println!("{}", serde_json::to_string_pretty(graph.stats())?);
        }
    }

    Ok(())
}
