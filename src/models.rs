use serde::{Deserialize, Serialize};

/// One row of the input hotel list. The list is read-only source data; the
/// coordinates anchor every enrichment query and distance computation.
#[derive(Debug, Clone, Deserialize)]
pub struct Hotel {
    pub id: String,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Location {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Geometry {
    pub location: Option<Location>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PhotoRef {
    pub photo_reference: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderOpeningHours {
    pub weekday_text: Option<Vec<String>>,
}

/// Abbreviated candidate from the nearby-search endpoint. Everything except
/// `place_id` may be missing; unknown provider fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResult {
    #[serde(default)]
    pub place_id: String,
    pub name: Option<String>,
    pub vicinity: Option<String>,
    pub geometry: Option<Geometry>,
    pub rating: Option<f64>,
    pub user_ratings_total: Option<u64>,
    pub price_level: Option<u8>,
    pub types: Option<Vec<String>>,
    pub photos: Option<Vec<PhotoRef>>,
    pub opening_hours: Option<ProviderOpeningHours>,
}

/// Richer record from the details endpoint for the same `place_id`. Only the
/// requested field set comes back, so every field stays optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DetailsResult {
    pub name: Option<String>,
    pub formatted_address: Option<String>,
    pub vicinity: Option<String>,
    pub geometry: Option<Geometry>,
    pub rating: Option<f64>,
    pub user_ratings_total: Option<u64>,
    pub price_level: Option<u8>,
    pub types: Option<Vec<String>>,
    pub website: Option<String>,
    pub formatted_phone_number: Option<String>,
    pub opening_hours: Option<ProviderOpeningHours>,
}

/// Canonical output unit. Every field is always present: strings default to
/// empty, unknown numerics serialize as `null`, `photos` holds at most one
/// reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Restaurant {
    pub place_id: String,
    pub name: String,
    pub address: String,
    pub vicinity: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub rating: Option<f64>,
    pub user_ratings_total: Option<u64>,
    pub price_level: Option<u8>,
    pub types: Vec<String>,
    pub photos: Vec<String>,
    pub website: String,
    pub phone: String,
    pub opening_hours: OpeningHours,
    pub hotel_distance_km: Option<f64>,
}

/// Serializes as `{}` when no weekday text is known.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OpeningHours {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weekday_text: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HotelResult {
    pub id: String,
    pub name: String,
    pub restaurants: Vec<Restaurant>,
}

/// Final deliverable. Checkpoint files reuse this shape with a single-element
/// `hotels` list so reassembly parses both uniformly.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FinalDataset {
    pub hotels: Vec<HotelResult>,
}
