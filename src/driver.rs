use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::time::sleep;
use tracing::{info, warn};

use crate::checkpoint::CheckpointStore;
use crate::config::CollectorConfig;
use crate::errors::AppResult;
use crate::models::{FinalDataset, Hotel};
use crate::places::PlacesService;
use crate::processor::HotelProcessor;

/// Drives the whole run: hotels strictly in input order, one at a time, with
/// the checkpoint files as the only state carried across hotel boundaries.
pub struct CollectionDriver {
    processor: HotelProcessor,
    checkpoints: CheckpointStore,
    hotel_pause: Duration,
    output_file: PathBuf,
}

impl CollectionDriver {
    pub fn new(config: &CollectorConfig) -> AppResult<Self> {
        let places = PlacesService::new(config)?;
        Ok(Self::with_places(places, config))
    }

    fn with_places(places: PlacesService, config: &CollectorConfig) -> Self {
        Self {
            processor: HotelProcessor::new(
                places,
                CheckpointStore::new(&config.checkpoint_dir),
                config,
            ),
            checkpoints: CheckpointStore::new(&config.checkpoint_dir),
            hotel_pause: config.hotel_pause,
            output_file: config.output_file.clone(),
        }
    }

    /// Collect every hotel, then reassemble the checkpoints into the final
    /// dataset and persist it.
    pub async fn run(&self, hotels: &[Hotel]) -> AppResult<FinalDataset> {
        self.collect(hotels).await;
        let dataset = self.assemble(hotels);
        self.persist(&dataset)?;
        Ok(dataset)
    }

    /// Nothing is accumulated in memory here; after each hotel the
    /// authoritative record lives solely in its checkpoint file.
    pub async fn collect(&self, hotels: &[Hotel]) {
        for hotel in hotels {
            if let Err(err) = self.processor.process(hotel).await {
                warn!(?err, hotel = %hotel.id, "hotel processing failed, continuing");
            }
            // Coarser pacing at hotel granularity, on top of the per-detail
            // pauses inside the processor.
            sleep(self.hotel_pause).await;
        }
    }

    pub fn assemble(&self, hotels: &[Hotel]) -> FinalDataset {
        assemble_dataset(&self.checkpoints, hotels)
    }

    pub fn persist(&self, dataset: &FinalDataset) -> AppResult<()> {
        write_dataset(&self.output_file, dataset)
    }
}

/// Re-reads every expected checkpoint in input order. A hotel whose
/// checkpoint is missing or corrupt is logged and left out; the gap is
/// documented behavior, not a failure of the run.
pub fn assemble_dataset(checkpoints: &CheckpointStore, hotels: &[Hotel]) -> FinalDataset {
    let mut dataset = FinalDataset::default();
    for hotel in hotels {
        match checkpoints.read(&hotel.id) {
            Ok(Some(result)) => dataset.hotels.push(result),
            Ok(None) => {
                warn!(hotel = %hotel.id, "checkpoint held no hotel entry, skipping")
            }
            Err(err) => {
                warn!(?err, hotel = %hotel.id, "failed to load checkpoint, skipping")
            }
        }
    }
    dataset
}

pub fn write_dataset(path: &Path, dataset: &FinalDataset) -> AppResult<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(&file, dataset)?;
    file.sync_all()?;
    info!(
        path = %path.display(),
        hotels = dataset.hotels.len(),
        "final dataset written"
    );
    Ok(())
}
