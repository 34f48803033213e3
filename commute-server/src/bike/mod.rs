//! Bike-share availability aggregation.
//!
//! Combines the HelloCycling GBFS station-information and station-status
//! feeds into rentable/returnable counts for the fixed commute anchors.

mod aggregate;
mod client;
mod error;

pub use aggregate::{
    BikeMetrics, DirectionMetrics, GoingLeg, ReturningLeg, TierCounts, direction_metrics,
    simple_metrics,
};
pub use client::{GbfsClient, GbfsConfig, StationInformation, StationStatus};
pub use error::BikeError;
