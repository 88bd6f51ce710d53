use std::time::Duration;

use tokio::time::sleep;
use tracing::info;

use crate::checkpoint::CheckpointStore;
use crate::config::CollectorConfig;
use crate::errors::AppResult;
use crate::models::{Hotel, HotelResult};
use crate::normalize::RecordNormalizer;
use crate::places::PlacesService;

/// Per-hotel orchestration: one nearby search, capped detail enrichment,
/// normalization in provider order, then a durable checkpoint write.
pub struct HotelProcessor {
    places: PlacesService,
    normalizer: RecordNormalizer,
    checkpoints: CheckpointStore,
    max_details: usize,
    detail_pause: Duration,
}

impl HotelProcessor {
    pub fn new(places: PlacesService, checkpoints: CheckpointStore, config: &CollectorConfig) -> Self {
        Self {
            normalizer: RecordNormalizer::new(places.clone()),
            places,
            checkpoints,
            max_details: config.max_details_per_hotel,
            detail_pause: config.detail_pause,
        }
    }

    pub async fn process(&self, hotel: &Hotel) -> AppResult<HotelResult> {
        info!(hotel = %hotel.name, "processing hotel");

        let candidates = self.places.nearby_search(hotel.lat, hotel.lng).await;
        let total = candidates.len();
        info!(hotel = %hotel.name, count = total, "found nearby candidates");

        let mut result = HotelResult {
            id: hotel.id.clone(),
            name: hotel.name.clone(),
            restaurants: Vec::with_capacity(total),
        };

        for (i, candidate) in candidates.iter().enumerate() {
            // Only the first few candidates get a detail lookup, bounding the
            // number of remote calls per hotel.
            let fetch_details = i < self.max_details;
            let restaurant = self
                .normalizer
                .normalize(candidate, hotel.lat, hotel.lng, fetch_details)
                .await;
            info!(index = i + 1, total, name = %restaurant.name, "processed candidate");
            result.restaurants.push(restaurant);

            // Pace detail lookups to respect provider rate limits.
            if fetch_details {
                sleep(self.detail_pause).await;
            }
        }

        self.checkpoints.write(&result)?;
        info!(
            hotel = %hotel.name,
            count = result.restaurants.len(),
            "checkpoint written"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::Arc;
    use std::time::Duration;

    use tempfile::tempdir;

    use super::*;
    use crate::models::DetailsResult;
    use crate::places::test_support::ScriptedPlacesApi;
    use crate::places::{DetailsResponse, NearbySearchResponse};

    fn test_config(checkpoint_dir: PathBuf) -> CollectorConfig {
        CollectorConfig {
            radius_km: 8.047,
            max_results_per_hotel: 20,
            max_details_per_hotel: 10,
            request_timeout: Duration::from_secs(10),
            detail_pause: Duration::ZERO,
            hotel_pause: Duration::ZERO,
            places_api_base: "http://unused.invalid".to_string(),
            checkpoint_dir,
            hotels_file: PathBuf::from("hotels.json"),
            output_file: PathBuf::from("restaurants.json"),
            google_places_api_key: None,
        }
    }

    fn hotel() -> Hotel {
        Hotel {
            id: "h1".to_string(),
            name: "Hotel One".to_string(),
            lat: 40.0,
            lng: -73.0,
        }
    }

    fn search_page(count: usize) -> NearbySearchResponse {
        NearbySearchResponse {
            status: "OK".to_string(),
            results: (0..count)
                .map(|i| crate::models::SearchResult {
                    place_id: format!("p{i}"),
                    name: Some(format!("Place {i}")),
                    ..Default::default()
                })
                .collect(),
            error_message: None,
        }
    }

    fn enriched_details(n: usize) -> Vec<crate::errors::AppResult<DetailsResponse>> {
        (0..n)
            .map(|i| {
                Ok(DetailsResponse {
                    status: "OK".to_string(),
                    result: Some(DetailsResult {
                        website: Some(format!("https://example.com/p{i}")),
                        ..DetailsResult::default()
                    }),
                    error_message: None,
                })
            })
            .collect()
    }

    #[tokio::test]
    async fn enriches_only_the_first_ten_candidates() {
        let dir = tempdir().unwrap();
        let api = Arc::new(ScriptedPlacesApi::default());
        api.push_search(Ok(search_page(15)));
        for response in enriched_details(10) {
            api.push_details(response);
        }

        let config = test_config(dir.path().to_path_buf());
        let places = PlacesService::from_api(api.clone(), config.max_results_per_hotel);
        let processor = HotelProcessor::new(
            places,
            CheckpointStore::new(&config.checkpoint_dir),
            &config,
        );

        let result = processor.process(&hotel()).await.unwrap();
        assert_eq!(result.restaurants.len(), 15);
        assert_eq!(api.detail_call_count(), 10);
        for restaurant in &result.restaurants[..10] {
            assert!(!restaurant.website.is_empty());
        }
        for restaurant in &result.restaurants[10..] {
            assert!(restaurant.website.is_empty());
        }
    }

    #[tokio::test]
    async fn caps_candidates_at_twenty() {
        let dir = tempdir().unwrap();
        let api = Arc::new(ScriptedPlacesApi::default());
        api.push_search(Ok(search_page(30)));

        let config = test_config(dir.path().to_path_buf());
        let places = PlacesService::from_api(api, config.max_results_per_hotel);
        let processor = HotelProcessor::new(
            places,
            CheckpointStore::new(&config.checkpoint_dir),
            &config,
        );

        let result = processor.process(&hotel()).await.unwrap();
        assert_eq!(result.restaurants.len(), 20);
    }

    #[tokio::test]
    async fn preserves_provider_order() {
        let dir = tempdir().unwrap();
        let api = Arc::new(ScriptedPlacesApi::default());
        api.push_search(Ok(search_page(5)));

        let config = test_config(dir.path().to_path_buf());
        let places = PlacesService::from_api(api, config.max_results_per_hotel);
        let processor = HotelProcessor::new(
            places,
            CheckpointStore::new(&config.checkpoint_dir),
            &config,
        );

        let result = processor.process(&hotel()).await.unwrap();
        let ids: Vec<_> = result
            .restaurants
            .iter()
            .map(|r| r.place_id.as_str())
            .collect();
        assert_eq!(ids, vec!["p0", "p1", "p2", "p3", "p4"]);
    }

    #[tokio::test]
    async fn writes_checkpoint_before_returning() {
        let dir = tempdir().unwrap();
        let api = Arc::new(ScriptedPlacesApi::default());
        api.push_search(Ok(search_page(2)));

        let config = test_config(dir.path().to_path_buf());
        let places = PlacesService::from_api(api, config.max_results_per_hotel);
        let checkpoints = CheckpointStore::new(&config.checkpoint_dir);
        let processor = HotelProcessor::new(places, checkpoints, &config);

        processor.process(&hotel()).await.unwrap();

        let store = CheckpointStore::new(dir.path());
        let persisted = store.read("h1").unwrap().expect("hotel entry");
        assert_eq!(persisted.restaurants.len(), 2);
    }

    #[tokio::test]
    async fn failed_search_yields_empty_hotel_result() {
        let dir = tempdir().unwrap();
        let api = Arc::new(ScriptedPlacesApi::default());
        api.push_search(Ok(NearbySearchResponse {
            status: "REQUEST_DENIED".to_string(),
            results: Vec::new(),
            error_message: Some("bad key".to_string()),
        }));

        let config = test_config(dir.path().to_path_buf());
        let places = PlacesService::from_api(api, config.max_results_per_hotel);
        let processor = HotelProcessor::new(
            places,
            CheckpointStore::new(&config.checkpoint_dir),
            &config,
        );

        let result = processor.process(&hotel()).await.unwrap();
        assert!(result.restaurants.is_empty());
        // The empty result is still checkpointed.
        let store = CheckpointStore::new(dir.path());
        assert!(store.read("h1").unwrap().is_some());
    }
}
