//! Bus timetable store and departure scheduling.
//!
//! The timetable is static data loaded at process start; queries expand it
//! into concrete departure instants relative to a reference time in the
//! display timezone.

mod next;
mod shape;
mod timetable;

pub use next::{Departure, ScheduleError, day_type_for, next_across_all, next_buses};
pub use shape::{ShapedDeparture, resolve_tz, shape};
pub use timetable::{DaySchedule, DayType, LineTimetable, Timetable};
