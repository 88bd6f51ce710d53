use crate::geo;
use crate::models::{
    DetailsResult, Geometry, OpeningHours, PhotoRef, ProviderOpeningHours, Restaurant,
    SearchResult,
};
use crate::places::PlacesService;

/// Overlay of a search result and an optional details result. Ephemeral;
/// exists only between merge and canonicalization.
#[derive(Debug)]
struct MergedRecord {
    place_id: String,
    name: Option<String>,
    formatted_address: Option<String>,
    vicinity: Option<String>,
    geometry: Option<Geometry>,
    rating: Option<f64>,
    user_ratings_total: Option<u64>,
    price_level: Option<u8>,
    types: Option<Vec<String>>,
    photos: Option<Vec<PhotoRef>>,
    website: Option<String>,
    formatted_phone_number: Option<String>,
    opening_hours: Option<ProviderOpeningHours>,
}

pub struct RecordNormalizer {
    places: PlacesService,
}

impl RecordNormalizer {
    pub fn new(places: PlacesService) -> Self {
        Self { places }
    }

    /// Produces the canonical restaurant record for one candidate. When
    /// `fetch_details` is false this performs no network I/O at all.
    pub async fn normalize(
        &self,
        candidate: &SearchResult,
        hotel_lat: f64,
        hotel_lng: f64,
        fetch_details: bool,
    ) -> Restaurant {
        let details = if fetch_details {
            self.places.place_details(&candidate.place_id).await
        } else {
            None
        };
        canonicalize(merge(candidate, details), hotel_lat, hotel_lng)
    }
}

/// Field-by-field overlay; a field present in the details record wins over
/// the search record. Photos come from the search result only, the details
/// request does not ask for them.
fn merge(search: &SearchResult, details: Option<DetailsResult>) -> MergedRecord {
    let details = details.unwrap_or_default();
    MergedRecord {
        place_id: search.place_id.clone(),
        name: details.name.or_else(|| search.name.clone()),
        formatted_address: details.formatted_address,
        vicinity: details.vicinity.or_else(|| search.vicinity.clone()),
        geometry: details.geometry.or_else(|| search.geometry.clone()),
        rating: details.rating.or(search.rating),
        user_ratings_total: details.user_ratings_total.or(search.user_ratings_total),
        price_level: details.price_level.or(search.price_level),
        types: details.types.or_else(|| search.types.clone()),
        photos: search.photos.clone(),
        website: details.website,
        formatted_phone_number: details.formatted_phone_number,
        opening_hours: details.opening_hours.or_else(|| search.opening_hours.clone()),
    }
}

fn canonicalize(merged: MergedRecord, hotel_lat: f64, hotel_lng: f64) -> Restaurant {
    let location = merged.geometry.as_ref().and_then(|g| g.location.as_ref());
    let lat = location.and_then(|l| l.lat);
    let lng = location.and_then(|l| l.lng);
    let hotel_distance_km = match (lat, lng) {
        (Some(lat), Some(lng)) => Some(geo::distance_km(hotel_lat, hotel_lng, lat, lng)),
        _ => None,
    };

    // At most the first photo reference survives; the reference string is the
    // only photo data carried.
    let photos = merged
        .photos
        .as_ref()
        .and_then(|list| list.first())
        .and_then(|photo| photo.photo_reference.clone())
        .into_iter()
        .collect();

    Restaurant {
        place_id: merged.place_id,
        name: merged.name.unwrap_or_default(),
        address: merged.formatted_address.unwrap_or_default(),
        vicinity: merged.vicinity.unwrap_or_default(),
        lat,
        lng,
        rating: merged.rating,
        user_ratings_total: merged.user_ratings_total,
        price_level: merged.price_level,
        types: merged.types.unwrap_or_default(),
        photos,
        website: merged.website.unwrap_or_default(),
        phone: merged.formatted_phone_number.unwrap_or_default(),
        opening_hours: OpeningHours {
            weekday_text: merged.opening_hours.and_then(|h| h.weekday_text),
        },
        hotel_distance_km,
    }
}
