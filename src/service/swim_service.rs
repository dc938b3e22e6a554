use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use chrono_tz::Tz;

use crate::clients::timetable_client::{FetchError, TimetableApi};
use crate::models::timetable::{DateWindow, SwimSession, TimetableEntry};
use crate::service::date_window::{DateWindowError, resolve_window};

const SESSION_TIME_FORMAT: &str = "%d/%m/%Y %H:%M";

/// Maps a user-facing keyword onto the exact activity name the upstream API
/// uses. Unknown keywords mean "no filtering".
pub fn filter_target(keyword: &str) -> Option<&'static str> {
    match keyword {
        "lane" => Some("Lane Swim"),
        "aqua" => Some("Aqua Aerobics"),
        _ => None,
    }
}

#[derive(Debug)]
pub enum TimeRangeError {
    MissingSeparator(String),
    BadTimestamp(String),
}

impl fmt::Display for TimeRangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeRangeError::MissingSeparator(raw) => {
                write!(f, "invalid time range \"{}\": expected \"HH:MM - HH:MM\"", raw)
            }
            TimeRangeError::BadTimestamp(raw) => {
                write!(f, "invalid session timestamp \"{}\"", raw)
            }
        }
    }
}

impl std::error::Error for TimeRangeError {}

#[derive(Debug)]
pub enum SwimError {
    Window(DateWindowError),
    Fetch(FetchError),
    Session(TimeRangeError),
}

impl SwimError {
    /// True when the failure was caused by the caller's input rather than the
    /// upstream or its data.
    pub fn is_client_error(&self) -> bool {
        matches!(self, SwimError::Window(_))
    }
}

impl fmt::Display for SwimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SwimError::Window(err) => err.fmt(f),
            SwimError::Fetch(err) => err.fmt(f),
            SwimError::Session(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for SwimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SwimError::Window(err) => Some(err),
            SwimError::Fetch(err) => Some(err),
            SwimError::Session(err) => Some(err),
        }
    }
}

impl From<DateWindowError> for SwimError {
    fn from(err: DateWindowError) -> Self {
        SwimError::Window(err)
    }
}

impl From<FetchError> for SwimError {
    fn from(err: FetchError) -> Self {
        SwimError::Fetch(err)
    }
}

impl From<TimeRangeError> for SwimError {
    fn from(err: TimeRangeError) -> Self {
        SwimError::Session(err)
    }
}

/// Resolves each entry's date and time-range strings against the local
/// timezone, keeping only entries that match the filter keyword and have not
/// yet started. Input order is preserved.
pub fn upcoming_sessions(
    entries: &[TimetableEntry],
    filter: &str,
    now: DateTime<Utc>,
    tz: Tz,
) -> Result<Vec<SwimSession>, TimeRangeError> {
    let target = filter_target(filter);
    let mut sessions = Vec::new();
    for entry in entries {
        if let Some(target) = target {
            if entry.name != target {
                continue;
            }
        }
        let (start, end) = session_times(entry, tz)?;
        if start.with_timezone(&Utc) <= now {
            continue;
        }
        sessions.push(SwimSession {
            name: entry.name.clone(),
            start,
            end,
        });
    }
    Ok(sessions)
}

fn session_times(
    entry: &TimetableEntry,
    tz: Tz,
) -> Result<(DateTime<Tz>, DateTime<Tz>), TimeRangeError> {
    let halves: Vec<&str> = entry.time.split(" - ").collect();
    if halves.len() != 2 {
        return Err(TimeRangeError::MissingSeparator(entry.time.clone()));
    }
    Ok((
        local_timestamp(&entry.date, halves[0], tz)?,
        local_timestamp(&entry.date, halves[1], tz)?,
    ))
}

fn local_timestamp(date: &str, time: &str, tz: Tz) -> Result<DateTime<Tz>, TimeRangeError> {
    let stamp = format!("{} {}", date, time);
    let naive = NaiveDateTime::parse_from_str(&stamp, SESSION_TIME_FORMAT)
        .map_err(|e| TimeRangeError::BadTimestamp(format!("{}: {}", stamp, e)))?;
    naive
        .and_local_timezone(tz)
        .single()
        .ok_or(TimeRangeError::BadTimestamp(stamp))
}

pub struct SwimService;

impl SwimService {
    /// The whole pipeline: phrase to window, window to raw entries, raw
    /// entries to upcoming sessions.
    pub async fn upcoming<A: TimetableApi + ?Sized>(
        api: &A,
        center: &str,
        phrase: &str,
        filter: &str,
        now: DateTime<Utc>,
        tz: Tz,
    ) -> Result<(DateWindow, Vec<SwimSession>), SwimError> {
        let window = resolve_window(phrase, now, tz)?;
        let entries = api.fetch_timetable(&window, center).await?;
        let sessions = upcoming_sessions(&entries, filter, now, tz)?;
        Ok((window, sessions))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn london() -> Tz {
        "Europe/London".parse().unwrap()
    }

    fn entry(name: &str, date: &str, time: &str) -> TimetableEntry {
        TimetableEntry {
            name: name.to_string(),
            date: date.to_string(),
            time: time.to_string(),
            description: String::new(),
            duration: String::new(),
        }
    }

    #[test]
    fn combines_date_and_time_range_in_local_time() {
        let now = Utc.with_ymd_and_hms(2025, 12, 1, 12, 0, 0).unwrap();
        let entries = vec![entry("Lane Swim", "25/12/2025", "09:00 - 10:00")];

        let sessions = upcoming_sessions(&entries, "", now, london()).unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(
            sessions[0].start,
            london().with_ymd_and_hms(2025, 12, 25, 9, 0, 0).unwrap()
        );
        assert_eq!(
            sessions[0].end,
            london().with_ymd_and_hms(2025, 12, 25, 10, 0, 0).unwrap()
        );
    }

    #[test]
    fn lane_filter_is_an_exact_name_match() {
        let now = Utc.with_ymd_and_hms(2025, 12, 1, 12, 0, 0).unwrap();
        let entries = vec![
            entry("Lane Swim", "25/12/2025", "09:00 - 10:00"),
            entry("Pool Party", "25/12/2025", "10:00 - 11:00"),
            entry("Lane Swim", "25/12/2025", "17:00 - 18:00"),
        ];

        let sessions = upcoming_sessions(&entries, "lane", now, london()).unwrap();
        assert_eq!(sessions.len(), 2);
        assert!(sessions.iter().all(|s| s.name == "Lane Swim"));
    }

    #[test]
    fn unknown_filter_keyword_keeps_everything() {
        let now = Utc.with_ymd_and_hms(2025, 12, 1, 12, 0, 0).unwrap();
        let entries = vec![
            entry("Lane Swim", "25/12/2025", "09:00 - 10:00"),
            entry("Pool Party", "25/12/2025", "10:00 - 11:00"),
        ];

        let sessions = upcoming_sessions(&entries, "zumba", now, london()).unwrap();
        assert_eq!(sessions.len(), 2);
    }

    #[test]
    fn sessions_already_started_are_dropped() {
        // 09:00 London on Christmas day, exactly when the first session starts.
        let now = Utc.with_ymd_and_hms(2025, 12, 25, 9, 0, 0).unwrap();
        let entries = vec![
            entry("Lane Swim", "25/12/2025", "08:00 - 09:00"),
            entry("Lane Swim", "25/12/2025", "09:00 - 10:00"),
            entry("Lane Swim", "25/12/2025", "09:01 - 10:00"),
        ];

        let sessions = upcoming_sessions(&entries, "", now, london()).unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(
            sessions[0].start,
            london().with_ymd_and_hms(2025, 12, 25, 9, 1, 0).unwrap()
        );
    }

    #[test]
    fn input_order_is_preserved() {
        let now = Utc.with_ymd_and_hms(2025, 12, 1, 12, 0, 0).unwrap();
        let entries = vec![
            entry("Lane Swim", "25/12/2025", "17:00 - 18:00"),
            entry("Aqua Aerobics", "25/12/2025", "09:00 - 10:00"),
            entry("Lane Swim", "25/12/2025", "12:00 - 13:00"),
        ];

        let sessions = upcoming_sessions(&entries, "", now, london()).unwrap();
        let names: Vec<&str> = sessions.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Lane Swim", "Aqua Aerobics", "Lane Swim"]);
    }

    #[test]
    fn missing_separator_is_an_error() {
        let now = Utc.with_ymd_and_hms(2025, 12, 1, 12, 0, 0).unwrap();
        let entries = vec![entry("Lane Swim", "25/12/2025", "09:00")];

        let result = upcoming_sessions(&entries, "", now, london());
        assert!(matches!(result, Err(TimeRangeError::MissingSeparator(_))));
    }

    #[test]
    fn garbled_timestamp_is_an_error() {
        let now = Utc.with_ymd_and_hms(2025, 12, 1, 12, 0, 0).unwrap();
        let entries = vec![entry("Lane Swim", "25-12-2025", "09:00 - 10:00")];

        let result = upcoming_sessions(&entries, "", now, london());
        assert!(matches!(result, Err(TimeRangeError::BadTimestamp(_))));
    }

    #[test]
    fn filtered_out_entries_never_parse_their_times() {
        let now = Utc.with_ymd_and_hms(2025, 12, 1, 12, 0, 0).unwrap();
        let entries = vec![
            entry("Aqua Aerobics", "25/12/2025", "garbage"),
            entry("Lane Swim", "25/12/2025", "09:00 - 10:00"),
        ];

        let sessions = upcoming_sessions(&entries, "lane", now, london()).unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].name, "Lane Swim");
    }
}
