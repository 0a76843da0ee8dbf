// Nearby-hotels query for interactive callers such as a map view. Holds the
// displayed results, skips refetching while the view only pans a short way,
// and drops responses that a newer request or an unsubscribe has superseded.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::config::QueryConfig;
use crate::error::HotelError;
use crate::geo::GeoPoint;
use crate::hotel::HotelRecord;
use crate::nearby::NearbyHotels;

#[derive(Debug, Clone, PartialEq)]
pub struct QueryParams {
    pub latitude: f64,
    pub longitude: f64,
    pub radius: u32,
    pub enabled: bool,
    pub exclude_id: Option<String>,
}

impl QueryParams {
    pub fn new(latitude: f64, longitude: f64, radius: u32) -> Self {
        Self {
            latitude,
            longitude,
            radius,
            enabled: true,
            exclude_id: None,
        }
    }

    pub fn excluding(mut self, id: &str) -> Self {
        self.exclude_id = Some(id.to_string());
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    // Zero or NaN coordinates mean "no location yet"
    fn is_searchable(&self) -> bool {
        self.enabled && is_set(self.latitude) && is_set(self.longitude)
    }
}

fn is_set(coordinate: f64) -> bool {
    coordinate != 0.0 && !coordinate.is_nan()
}

#[derive(Debug, Clone, Default)]
pub struct QueryState {
    pub results: Vec<HotelRecord>,
    pub loading: bool,
    pub error: Option<Arc<HotelError>>,
}

#[derive(Debug, Clone)]
pub enum FetchOutcome {
    // Results replaced with this many hotels
    Committed(usize),
    // Within the distance gate of the last successful query
    Skipped,
    // Query disabled or without coordinates; results cleared
    Cleared,
    // Superseded by a newer request or the subscriber went away
    Discarded,
    Failed(Arc<HotelError>),
}

// The most recent successfully fetched query
#[derive(Debug, Clone)]
struct LastQuery {
    center: GeoPoint,
    radius: u32,
    exclude_id: Option<String>,
}

#[derive(Default)]
struct QueryInner {
    state: QueryState,
    params: Option<QueryParams>,
    last_query: Option<LastQuery>,
    generation: u64,
}

pub struct NearbyHotelsQuery {
    service: Arc<NearbyHotels>,
    config: QueryConfig,
    inner: Mutex<QueryInner>,
    subscribed: AtomicBool,
}

impl NearbyHotelsQuery {
    pub fn new(service: Arc<NearbyHotels>, config: QueryConfig) -> Self {
        Self {
            service,
            config,
            inner: Mutex::new(QueryInner::default()),
            subscribed: AtomicBool::new(true),
        }
    }

    pub fn snapshot(&self) -> QueryState {
        self.inner.lock().state.clone()
    }

    pub fn results(&self) -> Vec<HotelRecord> {
        self.inner.lock().state.results.clone()
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscribed.load(Ordering::SeqCst)
    }

    // Responses still in flight are dropped once the subscriber goes away
    pub fn unsubscribe(&self) {
        self.subscribed.store(false, Ordering::SeqCst);
    }

    // Apply new parameters, fetching unless the move is within the distance gate
    pub async fn update(&self, params: QueryParams) -> FetchOutcome {
        {
            let mut inner = self.inner.lock();
            inner.params = Some(params.clone());

            if !params.is_searchable() {
                // Invalidate anything in flight and forget the gate origin
                inner.generation += 1;
                inner.state = QueryState::default();
                inner.last_query = None;
                return FetchOutcome::Cleared;
            }

            if let Some(last) = &inner.last_query {
                let moved = last
                    .center
                    .distance_to(&GeoPoint::new(params.latitude, params.longitude));
                if moved <= self.config.distance_gate_meters
                    && last.radius == params.radius
                    && last.exclude_id == params.exclude_id
                {
                    debug!(moved_meters = moved, "Within distance gate, keeping current hotels");
                    return FetchOutcome::Skipped;
                }
            }
        }

        self.fetch(params).await
    }

    // Fetch for the current parameters regardless of the distance gate. The
    // bucket cache still applies.
    pub async fn refetch(&self) -> FetchOutcome {
        let params = self.inner.lock().params.clone();
        match params {
            Some(params) if params.is_searchable() => self.fetch(params).await,
            _ => FetchOutcome::Skipped,
        }
    }

    async fn fetch(&self, params: QueryParams) -> FetchOutcome {
        let generation = {
            let mut inner = self.inner.lock();
            inner.generation += 1;
            inner.state.loading = true;
            inner.generation
        };

        let result = self
            .service
            .get_hotels_nearby(
                params.latitude,
                params.longitude,
                params.radius,
                params.exclude_id.as_deref(),
            )
            .await;

        let mut inner = self.inner.lock();
        if !self.is_subscribed() || inner.generation != generation {
            debug!(generation, "Discarding stale hotel response");
            return FetchOutcome::Discarded;
        }

        inner.state.loading = false;
        match result {
            Ok(hotels) => {
                let count = hotels.len();
                inner.state.results = hotels;
                inner.state.error = None;
                inner.last_query = Some(LastQuery {
                    center: GeoPoint::new(params.latitude, params.longitude),
                    radius: params.radius,
                    exclude_id: params.exclude_id,
                });
                FetchOutcome::Committed(count)
            }
            Err(e) => {
                // Keep the previous results on screen
                warn!("Keeping previous hotel results after failed fetch: {}", e);
                let error = Arc::new(e);
                inner.state.error = Some(error.clone());
                FetchOutcome::Failed(error)
            }
        }
    }
}
