use std::fs::{self, File};
use std::path::PathBuf;

use tracing::trace;

use crate::errors::AppResult;
use crate::models::{FinalDataset, HotelResult};

/// Durable per-hotel store. One JSON file per hotel, named by hotel id,
/// overwritten idempotently on rerun. The payload reuses the final dataset
/// shape with a single-element `hotels` list so reassembly parses both
/// uniformly.
pub struct CheckpointStore {
    dir: PathBuf,
}

impl CheckpointStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, hotel_id: &str) -> PathBuf {
        self.dir.join(format!("restaurants_partial_{hotel_id}.json"))
    }

    /// The write is flushed and fsynced before returning; a crash on a later
    /// hotel must not lose this one.
    pub fn write(&self, result: &HotelResult) -> AppResult<()> {
        fs::create_dir_all(&self.dir)?;
        let payload = FinalDataset {
            hotels: vec![result.clone()],
        };
        let path = self.path_for(&result.id);
        let file = File::create(&path)?;
        serde_json::to_writer_pretty(&file, &payload)?;
        file.sync_all()?;
        trace!(path = %path.display(), "checkpoint persisted");
        Ok(())
    }

    /// `Ok(None)` means the file parsed but held no hotel entry; read and
    /// parse failures surface to the caller, who skips that hotel.
    pub fn read(&self, hotel_id: &str) -> AppResult<Option<HotelResult>> {
        let text = fs::read_to_string(self.path_for(hotel_id))?;
        let payload: FinalDataset = serde_json::from_str(&text)?;
        Ok(payload.hotels.into_iter().next())
    }
}
