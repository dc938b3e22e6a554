use std::fmt;

use chrono::{DateTime, Datelike, Duration, Utc, Weekday};
use chrono_tz::Tz;

use crate::models::timetable::DateWindow;

#[derive(Debug)]
pub enum DateWindowError {
    UnrecognizedPhrase(String),
}

impl fmt::Display for DateWindowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateWindowError::UnrecognizedPhrase(phrase) => {
                write!(f, "could not understand \"{}\" as a date", phrase)
            }
        }
    }
}

impl std::error::Error for DateWindowError {}

/// Turns a phrase like "today", "tomorrow" or "next friday" into the one-day
/// window the timetable is fetched for. Ambiguous phrases resolve forwards,
/// never into the past. A blank phrase means "today".
///
/// The start is pushed one hour and one second past the parsed instant, so a
/// "today" lookup skips sessions that have only just begun. The window end is
/// always exactly one day after the start.
pub fn resolve_window(
    phrase: &str,
    now: DateTime<Utc>,
    tz: Tz,
) -> Result<DateWindow, DateWindowError> {
    let normalized = phrase.trim().to_lowercase();
    let normalized = if normalized.is_empty() {
        "today".to_string()
    } else {
        normalized
    };

    let parsed = parse_phrase(&normalized, now, tz)
        .ok_or(DateWindowError::UnrecognizedPhrase(normalized))?;

    let start = parsed + Duration::hours(1) + Duration::seconds(1);
    let end = start + Duration::days(1);
    Ok(DateWindow { start, end })
}

fn parse_phrase(phrase: &str, now: DateTime<Utc>, tz: Tz) -> Option<DateTime<Utc>> {
    match phrase {
        "today" | "now" => return Some(now),
        "tomorrow" => return Some(now + Duration::days(1)),
        "next week" => return Some(now + Duration::days(7)),
        _ => {}
    }

    if let Some(rest) = phrase.strip_prefix("in ") {
        return parse_offset(rest, now);
    }

    // "friday", "this friday" and "on friday" mean the next occurrence on or
    // after today; "next friday" means the following week's occurrence.
    let (following_week, name) = if let Some(rest) = phrase.strip_prefix("next ") {
        (true, rest)
    } else if let Some(rest) = phrase.strip_prefix("this ") {
        (false, rest)
    } else if let Some(rest) = phrase.strip_prefix("on ") {
        (false, rest)
    } else {
        (false, phrase)
    };

    let target = name.parse::<Weekday>().ok()?;
    Some(upcoming_weekday(target, now, tz, following_week))
}

// "in 3 days", "in 2 weeks", "in 5 hours"
fn parse_offset(rest: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let mut parts = rest.split_whitespace();
    let count: i64 = parts.next()?.parse().ok()?;
    let unit = parts.next()?;
    if parts.next().is_some() || count < 0 {
        return None;
    }

    match unit {
        "hour" | "hours" => Some(now + Duration::hours(count)),
        "day" | "days" => Some(now + Duration::days(count)),
        "week" | "weeks" => Some(now + Duration::weeks(count)),
        _ => None,
    }
}

// Weekday arithmetic happens on the local calendar; the clock time of `now`
// is kept.
fn upcoming_weekday(
    target: Weekday,
    now: DateTime<Utc>,
    tz: Tz,
    following_week: bool,
) -> DateTime<Utc> {
    let local = now.with_timezone(&tz);
    let mut ahead = (target.num_days_from_monday() as i64
        - local.weekday().num_days_from_monday() as i64)
        .rem_euclid(7);
    if following_week {
        ahead += 7;
    }
    (local + Duration::days(ahead)).with_timezone(&Utc)
}
