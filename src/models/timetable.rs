use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Timetable name the upstream API uses for the pool schedule, both in the
/// request body and as the response's top-level key.
pub const SWIMMING_TIMETABLE: &str = "Swimming Timetable";

/// The `[start, end)` range a timetable lookup covers. The resolver always
/// produces a window exactly one day long.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateWindow {
    /// Window length in days, rounded up.
    pub fn days(&self) -> i64 {
        let seconds = (self.end - self.start).num_seconds();
        (seconds + 86_399) / 86_400
    }
}

#[derive(Debug, Serialize)]
pub struct TimetableRequest {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "TimetableNames")]
    pub timetable_names: Vec<String>,
    #[serde(rename = "FromDate")]
    pub from_date: String,
    #[serde(rename = "Days")]
    pub days: i64,
}

/// One row as the upstream returns it. `date` is "DD/MM/YYYY" and `time` is
/// "HH:MM - HH:MM"; the two have to be combined to get usable instants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimetableEntry {
    #[serde(rename = "Name", default)]
    pub name: String,
    #[serde(rename = "Date", default)]
    pub date: String,
    #[serde(rename = "Time", default)]
    pub time: String,
    #[serde(rename = "Description", default)]
    pub description: String,
    #[serde(rename = "Duration", default)]
    pub duration: String,
}

#[derive(Debug, Deserialize)]
pub struct TimetableResponse {
    #[serde(rename = "Swimming Timetable")]
    pub swimming_timetable: Vec<TimetableEntry>,
}

/// A timetable entry with its date and time strings resolved into concrete
/// local-timezone instants. Lives only for the duration of one request.
#[derive(Debug, Clone, Serialize)]
pub struct SwimSession {
    pub name: String,
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
}
