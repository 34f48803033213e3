//! Presentation shaping for departures.

use std::str::FromStr;

use chrono::DateTime;
use chrono_tz::Tz;
use serde::Serialize;

use super::next::Departure;
use super::timetable::DayType;

/// Fallback zone when the configured name is invalid.
const FALLBACK_TZ: Tz = chrono_tz::Asia::Tokyo;

/// Resolve a timezone name, falling back to Asia/Tokyo when invalid.
pub fn resolve_tz(name: &str) -> Tz {
    Tz::from_str(name).unwrap_or(FALLBACK_TZ)
}

/// A departure shaped for display, computed against "now" and discarded
/// after serialization.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapedDeparture {
    pub line: String,
    pub day_type: DayType,
    /// RFC 3339 instant.
    pub iso: String,
    /// `YYYY/MM/DD HH:MM` in the display zone.
    pub local: String,
    /// `HH:MM` in the display zone.
    pub time: String,
    /// Whole minutes until departure, clamped at zero.
    pub minutes_until: i64,
}

/// Shape a departure for display relative to `now`.
pub fn shape(now: DateTime<Tz>, departure: &Departure) -> ShapedDeparture {
    let minutes = ((departure.at - now).num_seconds() as f64 / 60.0).round() as i64;
    ShapedDeparture {
        line: departure.line.clone(),
        day_type: departure.day_type,
        iso: departure.at.to_rfc3339(),
        local: departure.at.format("%Y/%m/%d %H:%M").to_string(),
        time: departure.at.format("%H:%M").to_string(),
        minutes_until: minutes.max(0),
    }
}
