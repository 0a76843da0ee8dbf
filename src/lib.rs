// Nearby hotel search: provider client, deduplication and caching

pub mod cache;
pub mod clock;
pub mod config;
pub mod dedupe;
pub mod error;
pub mod geo;
pub mod hotel;
pub mod nearby;
pub mod provider;
pub mod query;
pub mod scoring;

// Re-export key types for convenience
pub use cache::{BucketKey, CacheStatsReport, HotelCache};
pub use clock::{Clock, SystemClock};
pub use config::{CacheConfig, ClientConfig, HotelSearchConfig, QueryConfig};
pub use dedupe::{dedupe, merge_records, LocationKey};
pub use error::HotelError;
pub use geo::GeoPoint;
pub use hotel::HotelRecord;
pub use nearby::NearbyHotels;
pub use provider::{HotelSearchProvider, HttpHotelProvider, SearchRequest};
pub use query::{FetchOutcome, NearbyHotelsQuery, QueryParams, QueryState};
pub use scoring::completeness_score;
