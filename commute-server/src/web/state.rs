//! Application state for the web layer.

use std::sync::Arc;
use std::sync::atomic::AtomicUsize;

use chrono_tz::Tz;
use tokio::time::Duration;

use crate::bike::{BikeMetrics, DirectionMetrics, GbfsClient};
use crate::cache::ResponseCache;
use crate::schedule::{Timetable, resolve_tz};

/// How long bike responses stay fresh.
const BIKE_CACHE_TTL: Duration = Duration::from_secs(60);

/// Shared application state.
///
/// Contains everything the handlers need; the latest count cell is written
/// only by the subscription worker.
#[derive(Clone)]
pub struct AppState {
    /// Static timetable data
    pub timetable: Arc<Timetable>,

    /// GBFS feed client
    pub bike: Arc<GbfsClient>,

    /// Cache for `/bike` responses
    pub bike_cache: Arc<ResponseCache<BikeMetrics>>,

    /// Cache for `/bike-direction` responses, independent of `/bike`
    pub direction_cache: Arc<ResponseCache<DirectionMetrics>>,

    /// Latest object count from the subscription worker
    pub latest_count: Arc<AtomicUsize>,

    /// Display timezone
    pub tz: Tz,

    /// Name the timezone was configured with
    pub tz_name: String,
}

impl AppState {
    /// Create a new app state.
    pub fn new(
        timetable: Timetable,
        bike: GbfsClient,
        latest_count: Arc<AtomicUsize>,
        tz_name: &str,
    ) -> Self {
        Self {
            timetable: Arc::new(timetable),
            bike: Arc::new(bike),
            bike_cache: Arc::new(ResponseCache::new(BIKE_CACHE_TTL)),
            direction_cache: Arc::new(ResponseCache::new(BIKE_CACHE_TTL)),
            latest_count,
            tz: resolve_tz(tz_name),
            tz_name: tz_name.to_string(),
        }
    }
}
