//! Commute dashboard server.
//!
//! A small read-only JSON API aggregating three unrelated feeds for a
//! local dashboard: a live object-detection count received over MQTT,
//! a static bus timetable, and the HelloCycling bike-share feeds.

pub mod bike;
pub mod cache;
pub mod config;
pub mod schedule;
pub mod subscriber;
pub mod web;
