use std::sync::Arc;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::CollectorConfig;
use crate::errors::{AppError, AppResult};
use crate::models::{DetailsResult, SearchResult};

// Browser identification reduces upstream blocking on both endpoints.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

const DETAILS_FIELDS: &str = "name,formatted_address,geometry,rating,user_ratings_total,\
                              price_level,types,website,formatted_phone_number,opening_hours,vicinity";

const STATUS_OK: &str = "OK";
const STATUS_ZERO_RESULTS: &str = "ZERO_RESULTS";

#[derive(Debug, Deserialize)]
pub struct NearbySearchResponse {
    pub status: String,
    #[serde(default)]
    pub results: Vec<SearchResult>,
    pub error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DetailsResponse {
    pub status: String,
    pub result: Option<DetailsResult>,
    pub error_message: Option<String>,
}

/// Raw transport seam. Implementations perform one HTTP round trip per call
/// and surface provider envelopes untouched; status handling lives in
/// [`PlacesService`].
#[async_trait]
pub trait PlacesApi: Send + Sync {
    async fn nearby_search(&self, lat: f64, lng: f64) -> AppResult<NearbySearchResponse>;
    async fn place_details(&self, place_id: &str) -> AppResult<DetailsResponse>;
}

pub struct HttpPlacesClient {
    http: reqwest::Client,
    base_url: String,
    radius_m: u32,
    api_key: SecretString,
}

impl HttpPlacesClient {
    pub fn new(config: &CollectorConfig, api_key: SecretString) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            http,
            base_url: config.places_api_base.trim_end_matches('/').to_string(),
            radius_m: config.radius_meters(),
            api_key,
        })
    }
}

#[async_trait]
impl PlacesApi for HttpPlacesClient {
    async fn nearby_search(&self, lat: f64, lng: f64) -> AppResult<NearbySearchResponse> {
        let url = format!("{}/nearbysearch/json", self.base_url);
        debug!(%url, lat, lng, radius_m = self.radius_m, "nearby search request");
        let response = self
            .http
            .get(&url)
            .query(&[
                ("location", format!("{lat},{lng}")),
                ("radius", self.radius_m.to_string()),
                ("type", "restaurant".to_string()),
                ("key", self.api_key.expose_secret().to_string()),
            ])
            .send()
            .await?
            .json::<NearbySearchResponse>()
            .await?;
        Ok(response)
    }

    async fn place_details(&self, place_id: &str) -> AppResult<DetailsResponse> {
        let url = format!("{}/details/json", self.base_url);
        debug!(%url, place_id, "place details request");
        let response = self
            .http
            .get(&url)
            .query(&[
                ("place_id", place_id.to_string()),
                ("fields", DETAILS_FIELDS.to_string()),
                ("key", self.api_key.expose_secret().to_string()),
            ])
            .send()
            .await?
            .json::<DetailsResponse>()
            .await?;
        Ok(response)
    }
}

/// Status-aware wrapper over the transport. Provider rejections and transport
/// failures degrade to empty results so a flaky call never costs the run.
#[derive(Clone)]
pub struct PlacesService {
    inner: Arc<dyn PlacesApi>,
    max_results: usize,
}

impl PlacesService {
    pub fn new(config: &CollectorConfig) -> AppResult<Self> {
        let api_key = config
            .google_places_api_key
            .clone()
            .ok_or_else(|| AppError::Config("GOOGLE_PLACES_API_KEY is not set".into()))?;
        let client = HttpPlacesClient::new(config, api_key)?;
        Ok(Self {
            inner: Arc::new(client),
            max_results: config.max_results_per_hotel,
        })
    }

    #[cfg(test)]
    pub fn from_api(api: Arc<dyn PlacesApi>, max_results: usize) -> Self {
        Self {
            inner: api,
            max_results,
        }
    }

    /// First results page only, truncated to the per-hotel candidate cap.
    /// Continuation tokens are deliberately ignored to bound latency.
    pub async fn nearby_search(&self, lat: f64, lng: f64) -> Vec<SearchResult> {
        match self.inner.nearby_search(lat, lng).await {
            Ok(response) => {
                if response.status != STATUS_OK && response.status != STATUS_ZERO_RESULTS {
                    warn!(
                        status = %response.status,
                        error_message = response.error_message.as_deref(),
                        "nearby search rejected by provider"
                    );
                    return Vec::new();
                }
                let mut results = response.results;
                debug!(count = results.len(), "nearby search first page");
                results.truncate(self.max_results);
                results
            }
            Err(err) => {
                warn!(?err, "nearby search request failed");
                Vec::new()
            }
        }
    }

    pub async fn place_details(&self, place_id: &str) -> Option<DetailsResult> {
        match self.inner.place_details(place_id).await {
            Ok(response) => {
                if response.status == STATUS_OK {
                    response.result
                } else {
                    warn!(
                        status = %response.status,
                        error_message = response.error_message.as_deref(),
                        place_id,
                        "place details rejected by provider"
                    );
                    None
                }
            }
            Err(err) => {
                warn!(?err, place_id, "place details request failed");
                None
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use parking_lot::Mutex;

    use super::*;

    /// Scripted transport double. Responses pop in push order; an exhausted
    /// script answers with `ZERO_RESULTS` / `NOT_FOUND`.
    #[derive(Default)]
    pub struct ScriptedPlacesApi {
        pub searches: Mutex<Vec<AppResult<NearbySearchResponse>>>,
        pub details: Mutex<Vec<AppResult<DetailsResponse>>>,
        pub detail_calls: AtomicUsize,
    }

    impl ScriptedPlacesApi {
        pub fn push_search(&self, response: AppResult<NearbySearchResponse>) {
            self.searches.lock().push(response);
        }

        pub fn push_details(&self, response: AppResult<DetailsResponse>) {
            self.details.lock().push(response);
        }

        pub fn detail_call_count(&self) -> usize {
            self.detail_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl PlacesApi for ScriptedPlacesApi {
        async fn nearby_search(&self, _lat: f64, _lng: f64) -> AppResult<NearbySearchResponse> {
            let mut script = self.searches.lock();
            if script.is_empty() {
                return Ok(NearbySearchResponse {
                    status: STATUS_ZERO_RESULTS.to_string(),
                    results: Vec::new(),
                    error_message: None,
                });
            }
            script.remove(0)
        }

        async fn place_details(&self, _place_id: &str) -> AppResult<DetailsResponse> {
            self.detail_calls.fetch_add(1, Ordering::SeqCst);
            let mut script = self.details.lock();
            if script.is_empty() {
                return Ok(DetailsResponse {
                    status: "NOT_FOUND".to_string(),
                    result: None,
                    error_message: None,
                });
            }
            script.remove(0)
        }
    }
}
