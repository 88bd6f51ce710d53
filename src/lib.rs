mod checkpoint;
mod config;
mod driver;
mod errors;
mod geo;
mod hotels;
mod models;
mod normalize;
mod places;
mod processor;

use once_cell::sync::OnceCell;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub use checkpoint::CheckpointStore;
pub use config::{CollectorConfig, PublicCollectorConfig};
pub use driver::{assemble_dataset, write_dataset, CollectionDriver};
pub use errors::{AppError, AppResult};
pub use geo::distance_km;
pub use hotels::load_hotels;
pub use models::{
    DetailsResult, FinalDataset, Geometry, Hotel, HotelResult, Location, OpeningHours, PhotoRef,
    ProviderOpeningHours, Restaurant, SearchResult,
};
pub use normalize::RecordNormalizer;
pub use places::{
    DetailsResponse, HttpPlacesClient, NearbySearchResponse, PlacesApi, PlacesService,
};
pub use processor::HotelProcessor;

pub fn init_tracing() {
    static INIT: OnceCell<()> = OnceCell::new();
    let _ = INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("info,hotel_dining_collector=debug"));
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    });
}
