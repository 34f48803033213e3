//! Static bus timetable data.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// Which sub-table of a line's timetable applies to a calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DayType {
    Weekday,
    Saturday,
    Holiday,
}

impl fmt::Display for DayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DayType::Weekday => "weekday",
            DayType::Saturday => "saturday",
            DayType::Holiday => "holiday",
        };
        f.write_str(s)
    }
}

/// Hour (0-24) to ordered minute offsets within that hour.
///
/// Hour 24 holds post-midnight departures that still belong to the prior
/// service day's table.
pub type DaySchedule = BTreeMap<u8, Vec<u8>>;

/// One line's schedule across the three day types.
#[derive(Debug, Clone, Serialize)]
pub struct LineTimetable {
    /// Human-readable service description (e.g. stopping pattern).
    pub description: String,
    pub weekday: DaySchedule,
    pub saturday: DaySchedule,
    pub holiday: DaySchedule,
}

impl LineTimetable {
    /// The sub-table for a day type.
    pub fn day(&self, day_type: DayType) -> &DaySchedule {
        match day_type {
            DayType::Weekday => &self.weekday,
            DayType::Saturday => &self.saturday,
            DayType::Holiday => &self.holiday,
        }
    }
}

/// All lines, keyed by display name. Loaded once, never mutated.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct Timetable {
    lines: BTreeMap<String, LineTimetable>,
}

impl Timetable {
    /// Build a timetable from line entries.
    pub fn new(lines: impl IntoIterator<Item = (String, LineTimetable)>) -> Self {
        Self {
            lines: lines.into_iter().collect(),
        }
    }

    /// Line names in table order.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.keys().map(String::as_str)
    }

    /// Iterate over lines and their timetables.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &LineTimetable)> {
        self.lines.iter().map(|(name, table)| (name.as_str(), table))
    }

    /// Look up a line by name.
    pub fn line(&self, name: &str) -> Option<&LineTimetable> {
        self.lines.get(name)
    }

    /// The built-in data set for the SFC / Shonandai corridor.
    pub fn builtin() -> Self {
        Self::new([
            (
                "湘23".to_string(),
                LineTimetable {
                    description: "各駅停車".to_string(),
                    weekday: day(&[
                        (14, &[39, 59]),
                        (15, &[8, 50, 56]),
                        (16, &[18]),
                        (19, &[50]),
                        (20, &[5, 20, 35, 50]),
                        (21, &[0, 15, 35, 50]),
                        (22, &[35]),
                    ]),
                    saturday: day(&[
                        (13, &[13, 17, 21]),
                        (14, &[20]),
                        (15, &[20]),
                        (16, &[20]),
                        (17, &[20]),
                        (18, &[20]),
                        (19, &[17, 47]),
                        (20, &[12]),
                    ]),
                    holiday: day(&[]),
                },
            ),
            (
                "湘25".to_string(),
                LineTimetable {
                    description: "ツインライナー".to_string(),
                    weekday: day(&[
                        (14, &[29, 49]),
                        (15, &[16, 24, 31, 38, 45]),
                        (16, &[4, 14, 24, 31, 39, 47, 55]),
                        (17, &[5, 15, 23, 30, 37, 45, 53]),
                        (18, &[1, 9, 16, 23, 30, 37, 50]),
                        (19, &[5, 30]),
                    ]),
                    saturday: day(&[
                        (12, &[48, 55]),
                        (13, &[2, 9, 27, 35, 43, 51]),
                        (14, &[0, 10, 27, 47]),
                        (15, &[7, 40, 55]),
                        (16, &[10, 40, 55]),
                        (17, &[10, 35, 50]),
                        (18, &[5, 40, 55]),
                    ]),
                    holiday: day(&[]),
                },
            ),
            (
                "湘28".to_string(),
                LineTimetable {
                    description: "直行".to_string(),
                    weekday: day(&[(15, &[28, 34]), (18, &[11, 42])]),
                    saturday: day(&[]),
                    holiday: day(&[]),
                },
            ),
            (
                "辻34".to_string(),
                LineTimetable {
                    description: "各駅停車".to_string(),
                    weekday: day(&[
                        (15, &[19]),
                        (16, &[3, 45, 55]),
                        (17, &[5, 25, 45]),
                        (18, &[25]),
                        (19, &[50]),
                        (20, &[13]),
                        (21, &[13]),
                    ]),
                    saturday: day(&[
                        (12, &[37, 57]),
                        (13, &[17, 37, 57]),
                        (14, &[17, 37]),
                        (15, &[17, 37]),
                        (16, &[17, 37]),
                        (17, &[17, 37]),
                        (18, &[17, 37]),
                        (19, &[36]),
                    ]),
                    holiday: day(&[]),
                },
            ),
            (
                "辻35".to_string(),
                LineTimetable {
                    description: "ツインライナー".to_string(),
                    weekday: day(&[
                        (15, &[43, 58]),
                        (16, &[14, 31]),
                        (17, &[15, 35, 55]),
                        (18, &[5, 54]),
                        (19, &[24]),
                    ]),
                    saturday: day(&[]),
                    holiday: day(&[]),
                },
            ),
        ])
    }
}

fn day(entries: &[(u8, &[u8])]) -> DaySchedule {
    entries.iter().map(|(h, ms)| (*h, ms.to_vec())).collect()
}
