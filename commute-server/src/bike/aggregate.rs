//! Rentable/returnable aggregation over the fixed commute anchors.

use std::collections::HashMap;

use serde::Serialize;

use super::client::{StationInformation, StationStatus};

/// Origin dock (SFC campus).
const ORIGIN_STATION_ID: &str = "5143";

/// Destination docks closest to Shonandai station.
const PRIMARY_STATION_IDS: [&str; 4] = ["5609", "7395", "11403", "16084"];

/// Overflow docks a short walk from Shonandai station.
/// 12189 appears twice and is summed twice.
const SECONDARY_STATION_IDS: [&str; 5] = ["12189", "5113", "12189", "4035", "11908"];

/// Simple aggregate: bikes at the origin, docks at the destination tiers.
#[derive(Debug, Clone, Serialize)]
pub struct BikeMetrics {
    pub total_available: i64,
    pub returnable_primary: i64,
    pub returnable_secondary: i64,
}

/// Directional aggregate for the outbound and return trips.
#[derive(Debug, Clone, Serialize)]
pub struct DirectionMetrics {
    pub go: GoingLeg,
    pub back: ReturningLeg,
}

/// Outbound: can a bike be returned at the origin, and rented at the
/// destination for the trip back?
#[derive(Debug, Clone, Serialize)]
pub struct GoingLeg {
    pub sfc_returnable: i64,
    pub shonandai_rentable: TierCounts,
}

/// Return trip: mirror image of [`GoingLeg`].
#[derive(Debug, Clone, Serialize)]
pub struct ReturningLeg {
    pub sfc_rentable: i64,
    pub shonandai_returnable: TierCounts,
}

/// Counts per destination tier.
#[derive(Debug, Clone, Serialize)]
pub struct TierCounts {
    pub primary: i64,
    pub secondary: i64,
}

/// Both feeds indexed by station id for the duration of one aggregation.
struct StationIndex<'a> {
    info: HashMap<&'a str, &'a StationInformation>,
    status: HashMap<&'a str, &'a StationStatus>,
}

impl<'a> StationIndex<'a> {
    fn new(info: &'a [StationInformation], status: &'a [StationStatus]) -> Self {
        Self {
            info: info.iter().map(|s| (s.station_id.as_str(), s)).collect(),
            status: status.iter().map(|s| (s.station_id.as_str(), s)).collect(),
        }
    }

    /// Bikes currently available to rent at a station, 0 when the station
    /// is absent from the status feed.
    fn rentable(&self, id: &str) -> i64 {
        self.status.get(id).map_or(0, |s| s.num_bikes_available)
    }

    /// Free docks available to return a bike to.
    ///
    /// The feed's own dock count is taken verbatim when present; otherwise
    /// it is derived from the station capacity, and 0 when neither is known.
    fn returnable(&self, id: &str) -> i64 {
        let Some(status) = self.status.get(id) else {
            return 0;
        };
        if let Some(docks) = status.num_docks_available {
            return docks;
        }
        let capacity = self.info.get(id).and_then(|i| i.capacity).unwrap_or(0);
        (capacity - status.num_bikes_available).max(0)
    }

    fn sum_rentable(&self, ids: &[&str]) -> i64 {
        ids.iter().map(|id| self.rentable(id)).sum()
    }

    fn sum_returnable(&self, ids: &[&str]) -> i64 {
        ids.iter().map(|id| self.returnable(id)).sum()
    }
}

/// Compute the simple aggregate shape.
pub fn simple_metrics(info: &[StationInformation], status: &[StationStatus]) -> BikeMetrics {
    let index = StationIndex::new(info, status);
    BikeMetrics {
        total_available: index.rentable(ORIGIN_STATION_ID),
        returnable_primary: index.sum_returnable(&PRIMARY_STATION_IDS),
        returnable_secondary: index.sum_returnable(&SECONDARY_STATION_IDS),
    }
}

/// Compute the directional aggregate shape.
pub fn direction_metrics(
    info: &[StationInformation],
    status: &[StationStatus],
) -> DirectionMetrics {
    let index = StationIndex::new(info, status);
    DirectionMetrics {
        go: GoingLeg {
            sfc_returnable: index.returnable(ORIGIN_STATION_ID),
            shonandai_rentable: TierCounts {
                primary: index.sum_rentable(&PRIMARY_STATION_IDS),
                secondary: index.sum_rentable(&SECONDARY_STATION_IDS),
            },
        },
        back: ReturningLeg {
            sfc_rentable: index.rentable(ORIGIN_STATION_ID),
            shonandai_returnable: TierCounts {
                primary: index.sum_returnable(&PRIMARY_STATION_IDS),
                secondary: index.sum_returnable(&SECONDARY_STATION_IDS),
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(station_id: &str, capacity: Option<i64>) -> StationInformation {
        StationInformation {
            station_id: station_id.to_string(),
            name: None,
            lat: None,
            lon: None,
            capacity,
        }
    }

    fn status(station_id: &str, bikes: i64, docks: Option<i64>) -> StationStatus {
        StationStatus {
            station_id: station_id.to_string(),
            num_bikes_available: bikes,
            num_docks_available: docks,
        }
    }

    #[test]
    fn returnable_prefers_reported_docks() {
        let info = vec![info("5609", Some(20))];
        let status = vec![status("5609", 15, Some(3))];

        let index = StationIndex::new(&info, &status);
        assert_eq!(index.returnable("5609"), 3);
    }

    #[test]
    fn returnable_derives_from_capacity() {
        let info = vec![info("5609", Some(20))];
        let status = vec![status("5609", 15, None)];

        let index = StationIndex::new(&info, &status);
        assert_eq!(index.returnable("5609"), 5);
    }

    #[test]
    fn returnable_capacity_fallback_clamps_at_zero() {
        let info = vec![info("5609", Some(10))];
        let status = vec![status("5609", 15, None)];

        let index = StationIndex::new(&info, &status);
        assert_eq!(index.returnable("5609"), 0);
    }

    #[test]
    fn returnable_without_docks_or_capacity_is_zero() {
        let info = vec![info("5609", None)];
        let status = vec![status("5609", 15, None)];

        let index = StationIndex::new(&info, &status);
        assert_eq!(index.returnable("5609"), 0);
    }

    #[test]
    fn absent_station_counts_zero_both_ways() {
        let index = StationIndex::new(&[], &[]);
        assert_eq!(index.rentable("5143"), 0);
        assert_eq!(index.returnable("5143"), 0);
    }

    #[test]
    fn simple_metrics_sums_the_tiers() {
        let info = vec![info("11403", Some(8))];
        let status = vec![
            status("5143", 4, Some(6)),
            status("5609", 1, Some(2)),
            status("7395", 0, Some(3)),
            status("11403", 5, None),
            status("5113", 0, Some(7)),
        ];

        let metrics = simple_metrics(&info, &status);
        assert_eq!(metrics.total_available, 4);
        // 2 + 3 + (8 - 5) + 0 (16084 absent)
        assert_eq!(metrics.returnable_primary, 8);
        assert_eq!(metrics.returnable_secondary, 7);
    }

    #[test]
    fn secondary_tier_counts_duplicate_station_twice() {
        let status = vec![status("12189", 2, Some(5))];

        let metrics = simple_metrics(&[], &status);
        assert_eq!(metrics.returnable_secondary, 10);

        let direction = direction_metrics(&[], &status);
        assert_eq!(direction.go.shonandai_rentable.secondary, 4);
        assert_eq!(direction.back.shonandai_returnable.secondary, 10);
    }

    #[test]
    fn direction_metrics_mirror_each_other() {
        let status = vec![
            status("5143", 4, Some(6)),
            status("5609", 1, Some(2)),
            status("16084", 3, Some(9)),
        ];

        let direction = direction_metrics(&[], &status);
        assert_eq!(direction.go.sfc_returnable, 6);
        assert_eq!(direction.back.sfc_rentable, 4);
        assert_eq!(direction.go.shonandai_rentable.primary, 4);
        assert_eq!(direction.back.shonandai_returnable.primary, 11);
        assert_eq!(direction.go.shonandai_rentable.secondary, 0);
    }

    #[test]
    fn serializes_original_wire_shape() {
        let value = serde_json::to_value(direction_metrics(&[], &[])).unwrap();
        assert_eq!(value["go"]["sfc_returnable"], 0);
        assert_eq!(value["go"]["shonandai_rentable"]["primary"], 0);
        assert_eq!(value["back"]["sfc_rentable"], 0);
        assert_eq!(value["back"]["shonandai_returnable"]["secondary"], 0);

        let value = serde_json::to_value(simple_metrics(&[], &[])).unwrap();
        assert_eq!(value["total_available"], 0);
        assert_eq!(value["returnable_primary"], 0);
        assert_eq!(value["returnable_secondary"], 0);
    }
}
