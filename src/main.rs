use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::debug;

use hotel_dining_collector::{
    assemble_dataset, init_tracing, load_hotels, write_dataset, CheckpointStore, CollectionDriver,
    CollectorConfig,
};

#[derive(Debug, Parser)]
#[command(name = "hotel-dining-collector")]
#[command(about = "Collects nearby dining options for a list of hotels")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Query the places provider for every hotel, checkpoint each result and
    /// write the final dataset.
    Collect(RunArgs),
    /// Rebuild the final dataset from existing checkpoints without touching
    /// the network.
    Assemble(RunArgs),
}

#[derive(Debug, Args)]
struct RunArgs {
    /// Hotel list to enrich.
    #[arg(long)]
    hotels: Option<PathBuf>,
    /// Where to write the combined dataset.
    #[arg(long)]
    output: Option<PathBuf>,
    /// Directory holding the per-hotel checkpoint files.
    #[arg(long)]
    checkpoint_dir: Option<PathBuf>,
}

impl RunArgs {
    fn apply(self, config: &mut CollectorConfig) {
        if let Some(hotels) = self.hotels {
            config.hotels_file = hotels;
        }
        if let Some(output) = self.output {
            config.output_file = output;
        }
        if let Some(dir) = self.checkpoint_dir {
            config.checkpoint_dir = dir;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let mut config = CollectorConfig::from_env();

    match cli.command {
        Commands::Collect(args) => {
            args.apply(&mut config);
            debug!(profile = ?config.public_profile(), "collector configuration loaded");
            let hotels = load_hotels(&config.hotels_file)
                .with_context(|| format!("loading hotel list {}", config.hotels_file.display()))?;
            let driver = CollectionDriver::new(&config)?;
            let dataset = driver.run(&hotels).await?;
            println!(
                "Collection complete: {} hotels written to {}",
                dataset.hotels.len(),
                config.output_file.display()
            );
        }
        Commands::Assemble(args) => {
            args.apply(&mut config);
            let hotels = load_hotels(&config.hotels_file)
                .with_context(|| format!("loading hotel list {}", config.hotels_file.display()))?;
            let checkpoints = CheckpointStore::new(&config.checkpoint_dir);
            let dataset = assemble_dataset(&checkpoints, &hotels);
            write_dataset(&config.output_file, &dataset)?;
            println!(
                "Assembled {} of {} hotels into {}",
                dataset.hotels.len(),
                hotels.len(),
                config.output_file.display()
            );
        }
    }

    Ok(())
}
