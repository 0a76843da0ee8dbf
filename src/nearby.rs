use std::sync::Arc;
use tracing::{debug, warn};

use crate::cache::{BucketKey, HotelCache};
use crate::config::HotelSearchConfig;
use crate::dedupe::dedupe;
use crate::error::HotelError;
use crate::geo::GeoPoint;
use crate::hotel::HotelRecord;
use crate::provider::{HotelSearchProvider, HttpHotelProvider, SearchRequest};

// Nearby-hotel lookups: bucket cache first, then the provider, with the
// provider's records deduplicated before they are cached.
pub struct NearbyHotels {
    provider: Arc<dyn HotelSearchProvider>,
    cache: Arc<HotelCache>,
}

impl NearbyHotels {
    pub fn new(provider: Arc<dyn HotelSearchProvider>, cache: Arc<HotelCache>) -> Self {
        Self { provider, cache }
    }

    pub fn from_config(config: &HotelSearchConfig) -> Result<Self, HotelError> {
        let provider = HttpHotelProvider::new(&config.client)?;
        let cache = HotelCache::with_system_clock(&config.cache);
        Ok(Self::new(Arc::new(provider), Arc::new(cache)))
    }

    pub fn cache(&self) -> &HotelCache {
        &self.cache
    }

    // Hotels within `radius` meters of the point, nearest first, without the
    // hotel whose id is `exclude_id`
    pub async fn get_hotels_nearby(
        &self,
        latitude: f64,
        longitude: f64,
        radius: u32,
        exclude_id: Option<&str>,
    ) -> Result<Vec<HotelRecord>, HotelError> {
        let key = BucketKey::new(latitude, longitude, radius);

        let hotels = match self.cache.get(&key) {
            Some(hotels) => hotels,
            None => {
                let request = SearchRequest {
                    latitude,
                    longitude,
                    radius,
                };
                let raw = self.provider.search(&request).await.map_err(|e| {
                    warn!("Hotel search near ({}, {}) failed: {}", latitude, longitude, e);
                    e
                })?;

                let fetched = raw.len();
                let hotels = dedupe(raw);
                debug!(
                    fetched,
                    unique = hotels.len(),
                    "Fetched hotels near ({}, {})",
                    latitude,
                    longitude
                );
                self.cache.store(key, hotels.clone());
                hotels
            }
        };

        Ok(shape_results(
            hotels,
            GeoPoint::new(latitude, longitude),
            exclude_id,
        ))
    }
}

fn shape_results(
    hotels: Vec<HotelRecord>,
    center: GeoPoint,
    exclude_id: Option<&str>,
) -> Vec<HotelRecord> {
    let mut results: Vec<(f64, HotelRecord)> = hotels
        .into_iter()
        .filter(|hotel| exclude_id.map_or(true, |id| hotel.id != id))
        .map(|hotel| (center.distance_to(&hotel.location()), hotel))
        .collect();

    results.sort_by(|a, b| a.0.total_cmp(&b.0));
    results.into_iter().map(|(_, hotel)| hotel).collect()
}
