//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::schedule::{DayType, ShapedDeparture, Timetable};

/// Query parameters for `/bus`.
#[derive(Debug, Deserialize)]
pub struct BusRequest {
    /// Restrict results to a single line
    pub line: Option<String>,

    /// Number of departures to return (defaults to 5)
    pub n: Option<usize>,
}

/// Coarse congestion bands for the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CongestionLevel {
    Low,
    Mid,
    High,
}

/// Response for `/congestion`.
#[derive(Debug, Serialize)]
pub struct CongestionResponse {
    /// Latest object count received from the broker
    pub count: usize,

    /// Banded reading of the count
    pub level: CongestionLevel,
}

/// Response for `/bus`.
#[derive(Debug, Serialize)]
pub struct BusResponse {
    /// Reference instant the query ran from (RFC 3339)
    pub from: String,

    /// Number of items returned
    pub count: usize,

    /// Upcoming departures, soonest first
    pub items: Vec<ShapedDeparture>,
}

/// Response for `/timetable`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimetableResponse {
    /// Configured display timezone name
    pub tz: String,

    /// Day-type classification of today
    pub day_type_today: DayType,

    /// Line names in table order
    pub lines: Vec<String>,

    /// The full static timetable
    pub timetable: Timetable,
}

/// Error body returned by all failing endpoints.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
