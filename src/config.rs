use std::path::PathBuf;
use std::time::Duration;
use std::{env, io};

use secrecy::SecretString;
use serde::Serialize;
use tracing::debug;

const KM_PER_MILE: f64 = 1.60934;
const DEFAULT_RADIUS_MILES: f64 = 5.0;
const DEFAULT_MAX_RESULTS_PER_HOTEL: usize = 20;
const DEFAULT_MAX_DETAILS_PER_HOTEL: usize = 10;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
const DEFAULT_DETAIL_PAUSE_MS: u64 = 200;
const DEFAULT_HOTEL_PAUSE_MS: u64 = 1_000;
const DEFAULT_PLACES_API_BASE: &str = "https://maps.googleapis.com/maps/api/place";

#[derive(Clone, Debug)]
pub struct CollectorConfig {
    pub radius_km: f64,
    pub max_results_per_hotel: usize,
    pub max_details_per_hotel: usize,
    pub request_timeout: Duration,
    pub detail_pause: Duration,
    pub hotel_pause: Duration,
    pub places_api_base: String,
    pub checkpoint_dir: PathBuf,
    pub hotels_file: PathBuf,
    pub output_file: PathBuf,
    pub google_places_api_key: Option<SecretString>,
}

#[derive(Clone, Debug, Serialize)]
pub struct PublicCollectorConfig {
    pub radius_km: f64,
    pub max_results_per_hotel: usize,
    pub max_details_per_hotel: usize,
    pub request_timeout_secs: u64,
    pub detail_pause_ms: u64,
    pub hotel_pause_ms: u64,
    pub places_api_base: String,
    pub checkpoint_dir: String,
    pub hotels_file: String,
    pub output_file: String,
    pub has_places_key: bool,
}

impl CollectorConfig {
    pub fn from_env() -> Self {
        load_dotenv_if_applicable();
        Self {
            radius_km: parse_f64("SEARCH_RADIUS_KM", DEFAULT_RADIUS_MILES * KM_PER_MILE),
            max_results_per_hotel: parse_usize(
                "MAX_RESULTS_PER_HOTEL",
                DEFAULT_MAX_RESULTS_PER_HOTEL,
            ),
            max_details_per_hotel: parse_usize(
                "MAX_DETAILS_PER_HOTEL",
                DEFAULT_MAX_DETAILS_PER_HOTEL,
            ),
            request_timeout: Duration::from_secs(parse_u64(
                "PLACES_TIMEOUT_SECS",
                DEFAULT_REQUEST_TIMEOUT_SECS,
            )),
            detail_pause: Duration::from_millis(parse_u64(
                "DETAIL_PAUSE_MS",
                DEFAULT_DETAIL_PAUSE_MS,
            )),
            hotel_pause: Duration::from_millis(parse_u64("HOTEL_PAUSE_MS", DEFAULT_HOTEL_PAUSE_MS)),
            places_api_base: env::var("PLACES_API_BASE")
                .unwrap_or_else(|_| DEFAULT_PLACES_API_BASE.to_string()),
            checkpoint_dir: env::var("CHECKPOINT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".")),
            hotels_file: env::var("HOTELS_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("hotels.json")),
            output_file: env::var("OUTPUT_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("restaurants.json")),
            google_places_api_key: env::var("GOOGLE_PLACES_API_KEY")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(SecretString::from),
        }
    }

    /// Search radius in whole meters, the unit the provider expects.
    pub fn radius_meters(&self) -> u32 {
        (self.radius_km * 1000.0).round() as u32
    }

    pub fn public_profile(&self) -> PublicCollectorConfig {
        PublicCollectorConfig {
            radius_km: self.radius_km,
            max_results_per_hotel: self.max_results_per_hotel,
            max_details_per_hotel: self.max_details_per_hotel,
            request_timeout_secs: self.request_timeout.as_secs(),
            detail_pause_ms: self.detail_pause.as_millis() as u64,
            hotel_pause_ms: self.hotel_pause.as_millis() as u64,
            places_api_base: self.places_api_base.clone(),
            checkpoint_dir: self.checkpoint_dir.to_string_lossy().to_string(),
            hotels_file: self.hotels_file.to_string_lossy().to_string(),
            output_file: self.output_file.to_string_lossy().to_string(),
            has_places_key: self.google_places_api_key.is_some(),
        }
    }
}

fn load_dotenv_if_applicable() {
    if !should_load_dotenv() {
        debug!("skipping .env load outside dev mode");
        return;
    }

    if let Err(err) = dotenvy::dotenv() {
        match &err {
            dotenvy::Error::Io(io_err) if io_err.kind() == io::ErrorKind::NotFound => {}
            _ => debug!(?err, "unable to load .env file"),
        }
    }
}

fn should_load_dotenv() -> bool {
    cfg!(debug_assertions) || parse_bool("ALLOW_DOTENV", false)
}

fn parse_bool(key: &str, default: bool) -> bool {
    env::var(key)
        .map(|v| matches!(v.trim(), "1" | "true" | "TRUE" | "True"))
        .unwrap_or(default)
}

fn parse_u64(key: &str, default: u64) -> u64 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default)
}

fn parse_usize(key: &str, default: usize) -> usize {
    env::var(key)
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(default)
}

fn parse_f64(key: &str, default: f64) -> f64 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse::<f64>().ok())
        .unwrap_or(default)
}
