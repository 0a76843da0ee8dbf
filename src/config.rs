use std::{env, fmt::Display, str::FromStr};
use tracing::{info, warn};

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000/api/hotels/nearby";

// HTTP client configuration for the hotel search provider
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout_ms: u64,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            timeout_ms: 10_000,
            user_agent: concat!("nearby_hotels/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub ttl_seconds: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { ttl_seconds: 1800 }
    }
}

#[derive(Debug, Clone)]
pub struct QueryConfig {
    // Moves within this distance of the last query do not refetch
    pub distance_gate_meters: f64,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            distance_gate_meters: 10_000.0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct HotelSearchConfig {
    pub client: ClientConfig,
    pub cache: CacheConfig,
    pub query: QueryConfig,
}

impl HotelSearchConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            client: ClientConfig {
                base_url: try_load("HOTEL_API_BASE_URL", defaults.client.base_url),
                api_key: env::var("HOTEL_API_KEY").ok().filter(|k| !k.trim().is_empty()),
                timeout_ms: try_load("HOTEL_API_TIMEOUT_MS", defaults.client.timeout_ms),
                user_agent: defaults.client.user_agent,
            },
            cache: CacheConfig {
                ttl_seconds: try_load("HOTEL_CACHE_TTL_SECONDS", defaults.cache.ttl_seconds),
            },
            query: QueryConfig {
                distance_gate_meters: valid_gate(
                    try_load(
                        "HOTEL_DISTANCE_GATE_METERS",
                        defaults.query.distance_gate_meters,
                    ),
                    defaults.query.distance_gate_meters,
                ),
            },
        }
    }
}

// A NaN or negative gate would silently disable or invert the check
fn valid_gate(meters: f64, default: f64) -> f64 {
    if meters.is_finite() && meters >= 0.0 {
        meters
    } else {
        warn!("Invalid HOTEL_DISTANCE_GATE_METERS value {meters}, using default: {default}");
        default
    }
}

fn try_load<T>(key: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|e| {
            warn!("Invalid {key} value {raw:?}: {e}, using default: {default}");
            default
        }),
        Err(_) => {
            info!("{key} not set, using default: {default}");
            default
        }
    }
}
