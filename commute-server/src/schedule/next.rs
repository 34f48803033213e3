//! Next-departure queries over the static timetable.

use chrono::{DateTime, Datelike, Days, Duration, NaiveDate, NaiveTime, TimeZone, Weekday};
use chrono_tz::Tz;

use super::timetable::{DaySchedule, DayType, Timetable};

/// How many consecutive days to scan before giving up.
///
/// Real timetables always yield enough matches within a week; the bound
/// also guarantees termination when a day-type table is empty.
const SCAN_DAYS: u64 = 7;

/// Errors from departure queries.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScheduleError {
    /// The requested line is not in the timetable.
    #[error("unknown line: {0}")]
    UnknownLine(String),
}

/// A scheduled departure, produced per query and discarded after shaping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Departure {
    pub line: String,
    pub day_type: DayType,
    pub at: DateTime<Tz>,
}

/// Classify a calendar day.
///
/// Every Sunday is a holiday and no weekday is ever upgraded to one;
/// there is no public-holiday calendar.
pub fn day_type_for(date: NaiveDate) -> DayType {
    match date.weekday() {
        Weekday::Sat => DayType::Saturday,
        Weekday::Sun => DayType::Holiday,
        _ => DayType::Weekday,
    }
}

/// Midnight of `date` in the given zone.
fn day_start(tz: Tz, date: NaiveDate) -> DateTime<Tz> {
    let midnight = date.and_time(NaiveTime::MIN);
    tz.from_local_datetime(&midnight)
        .earliest()
        .unwrap_or_else(|| tz.from_utc_datetime(&midnight))
}

/// Expand one day's schedule into instants anchored at `day_start`.
///
/// Hours are applied as durations, so the synthetic hour 24 lands on the
/// following calendar day. The result is sorted ascending.
fn expand_day(schedule: &DaySchedule, day_start: DateTime<Tz>) -> Vec<DateTime<Tz>> {
    let mut out = Vec::new();
    for (&hour, minutes) in schedule {
        for &minute in minutes {
            out.push(day_start + Duration::hours(hour as i64) + Duration::minutes(minute as i64));
        }
    }
    out.sort();
    out
}

/// The next `count` departures for one line, at or after `from`.
///
/// Scans forward day by day; departures on the starting day that are
/// strictly earlier than `from` are dropped, later days contribute their
/// whole table.
pub fn next_buses(
    timetable: &Timetable,
    line: &str,
    from: DateTime<Tz>,
    count: usize,
) -> Result<Vec<Departure>, ScheduleError> {
    let table = timetable
        .line(line)
        .ok_or_else(|| ScheduleError::UnknownLine(line.to_string()))?;

    let tz = from.timezone();
    let mut results = Vec::new();
    'days: for offset in 0..SCAN_DAYS {
        if results.len() >= count {
            break;
        }
        let date = from.date_naive() + Days::new(offset);
        let day_type = day_type_for(date);
        for at in expand_day(table.day(day_type), day_start(tz, date)) {
            if offset == 0 && at < from {
                continue;
            }
            results.push(Departure {
                line: line.to_string(),
                day_type,
                at,
            });
            if results.len() >= count {
                break 'days;
            }
        }
    }
    Ok(results)
}

/// The next `count` departures across every line.
///
/// A full day's candidates are gathered for all lines before any sorting,
/// then the whole bucket is ordered by instant and truncated. Sorting after
/// full-day collection avoids favouring whichever line happens to be
/// enumerated first within a day.
pub fn next_across_all(timetable: &Timetable, from: DateTime<Tz>, count: usize) -> Vec<Departure> {
    let tz = from.timezone();
    let mut bucket = Vec::new();
    for offset in 0..SCAN_DAYS {
        if bucket.len() >= count {
            break;
        }
        let date = from.date_naive() + Days::new(offset);
        let day_type = day_type_for(date);
        let start = day_start(tz, date);
        for (line, table) in timetable.iter() {
            for at in expand_day(table.day(day_type), start) {
                if offset == 0 && at < from {
                    continue;
                }
                bucket.push(Departure {
                    line: line.to_string(),
                    day_type,
                    at,
                });
            }
        }
    }
    bucket.sort_by_key(|d| d.at);
    bucket.truncate(count);
    bucket
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::timetable::LineTimetable;
    use chrono_tz::Asia::Tokyo;

    // 2025-06-02 is a Monday, 2025-06-07 a Saturday, 2025-06-08 a Sunday.
    fn tokyo(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Tz> {
        Tokyo.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn classifies_a_full_week() {
        for d in 2..=6 {
            let date = NaiveDate::from_ymd_opt(2025, 6, d).unwrap();
            assert_eq!(day_type_for(date), DayType::Weekday, "june {d}");
        }
        assert_eq!(
            day_type_for(NaiveDate::from_ymd_opt(2025, 6, 7).unwrap()),
            DayType::Saturday
        );
        assert_eq!(
            day_type_for(NaiveDate::from_ymd_opt(2025, 6, 8).unwrap()),
            DayType::Holiday
        );
    }

    #[test]
    fn next_buses_returns_upcoming_in_order() {
        let timetable = Timetable::builtin();
        let from = tokyo(2025, 6, 2, 14, 0);

        let results = next_buses(&timetable, "湘23", from, 5).unwrap();
        let times: Vec<_> = results
            .iter()
            .map(|d| d.at.format("%H:%M").to_string())
            .collect();
        assert_eq!(times, vec!["14:39", "14:59", "15:08", "15:50", "15:56"]);
        for d in &results {
            assert_eq!(d.line, "湘23");
            assert_eq!(d.day_type, DayType::Weekday);
            assert!(d.at >= from);
        }
    }

    #[test]
    fn departure_at_reference_instant_is_included() {
        let timetable = Timetable::builtin();
        let from = tokyo(2025, 6, 2, 14, 39);

        let results = next_buses(&timetable, "湘23", from, 1).unwrap();
        assert_eq!(results[0].at, from);
    }

    #[test]
    fn spills_into_the_next_day_when_today_is_exhausted() {
        let timetable = Timetable::builtin();
        let from = tokyo(2025, 6, 2, 23, 0);

        let results = next_buses(&timetable, "湘23", from, 2).unwrap();
        assert_eq!(results[0].at, tokyo(2025, 6, 3, 14, 39));
        assert_eq!(results[1].at, tokyo(2025, 6, 3, 14, 59));
    }

    #[test]
    fn saturday_uses_the_saturday_table() {
        let timetable = Timetable::builtin();
        let from = tokyo(2025, 6, 7, 12, 0);

        let results = next_buses(&timetable, "湘23", from, 3).unwrap();
        assert_eq!(results[0].at, tokyo(2025, 6, 7, 13, 13));
        assert_eq!(results[0].day_type, DayType::Saturday);
    }

    #[test]
    fn empty_holiday_table_skips_to_monday() {
        let timetable = Timetable::builtin();
        let from = tokyo(2025, 6, 8, 8, 0);

        let results = next_buses(&timetable, "湘23", from, 1).unwrap();
        assert_eq!(results[0].at, tokyo(2025, 6, 9, 14, 39));
        assert_eq!(results[0].day_type, DayType::Weekday);
    }

    #[test]
    fn line_with_no_service_at_all_returns_empty() {
        let timetable = Timetable::new([(
            "ghost".to_string(),
            LineTimetable {
                description: String::new(),
                weekday: DaySchedule::new(),
                saturday: DaySchedule::new(),
                holiday: DaySchedule::new(),
            },
        )]);
        let results = next_buses(&timetable, "ghost", tokyo(2025, 6, 2, 8, 0), 5).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn unknown_line_is_a_distinct_error() {
        let timetable = Timetable::builtin();
        let err = next_buses(&timetable, "nope", tokyo(2025, 6, 2, 8, 0), 5).unwrap_err();
        assert_eq!(err, ScheduleError::UnknownLine("nope".to_string()));
        assert_eq!(err.to_string(), "unknown line: nope");
    }

    #[test]
    fn hour_24_lands_on_the_following_day() {
        let timetable = Timetable::new([(
            "night".to_string(),
            LineTimetable {
                description: String::new(),
                weekday: DaySchedule::from([(23, vec![50]), (24, vec![15])]),
                saturday: DaySchedule::new(),
                holiday: DaySchedule::new(),
            },
        )]);
        let from = tokyo(2025, 6, 2, 23, 0);

        let results = next_buses(&timetable, "night", from, 2).unwrap();
        assert_eq!(results[0].at, tokyo(2025, 6, 2, 23, 50));
        assert_eq!(results[1].at, tokyo(2025, 6, 3, 0, 15));
        // Both belong to Monday's table.
        assert_eq!(results[1].day_type, DayType::Weekday);
    }

    #[test]
    fn across_all_merges_lines_chronologically() {
        let timetable = Timetable::builtin();
        let from = tokyo(2025, 6, 2, 14, 0);

        let results = next_across_all(&timetable, from, 5);
        let pairs: Vec<_> = results
            .iter()
            .map(|d| (d.line.as_str(), d.at.format("%H:%M").to_string()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("湘25", "14:29".to_string()),
                ("湘23", "14:39".to_string()),
                ("湘25", "14:49".to_string()),
                ("湘23", "14:59".to_string()),
                ("湘23", "15:08".to_string()),
            ]
        );
    }

    #[test]
    fn across_all_is_sorted_and_bounded() {
        let timetable = Timetable::builtin();
        let results = next_across_all(&timetable, tokyo(2025, 6, 2, 6, 0), 40);
        assert!(results.len() <= 40);
        for pair in results.windows(2) {
            assert!(pair[0].at <= pair[1].at);
        }
    }

    #[test]
    fn across_all_with_zero_count_is_empty() {
        let timetable = Timetable::builtin();
        assert!(next_across_all(&timetable, tokyo(2025, 6, 2, 6, 0), 0).is_empty());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::schedule::timetable::LineTimetable;
    use chrono_tz::Asia::Tokyo;
    use proptest::collection::{btree_map, btree_set};
    use proptest::prelude::*;

    // Hour 24 overlaps the following day's hour 0, so the generator stays
    // within a single calendar day to keep cross-day ordering meaningful.
    fn day_schedule() -> impl Strategy<Value = DaySchedule> {
        btree_map(
            0u8..24,
            btree_set(0u8..60, 0..6).prop_map(|s| s.into_iter().collect::<Vec<_>>()),
            0..6,
        )
    }

    fn single_line() -> impl Strategy<Value = Timetable> {
        (day_schedule(), day_schedule(), day_schedule()).prop_map(|(w, s, h)| {
            Timetable::new([(
                "line".to_string(),
                LineTimetable {
                    description: String::new(),
                    weekday: w,
                    saturday: s,
                    holiday: h,
                },
            )])
        })
    }

    proptest! {
        #[test]
        fn next_buses_bounded_sorted_and_after_from(tt in single_line(), n in 1usize..30) {
            let from = Tokyo.with_ymd_and_hms(2025, 6, 2, 12, 0, 0).unwrap();
            let results = next_buses(&tt, "line", from, n).unwrap();

            prop_assert!(results.len() <= n);
            for d in &results {
                prop_assert!(d.at >= from);
                prop_assert_eq!(d.line.as_str(), "line");
            }
            for pair in results.windows(2) {
                prop_assert!(pair[0].at < pair[1].at);
            }
        }

        #[test]
        fn across_all_bounded_and_sorted(tt in single_line(), n in 1usize..30) {
            let from = Tokyo.with_ymd_and_hms(2025, 6, 2, 12, 0, 0).unwrap();
            let results = next_across_all(&tt, from, n);

            prop_assert!(results.len() <= n);
            for pair in results.windows(2) {
                prop_assert!(pair[0].at <= pair[1].at);
            }
        }
    }
}
