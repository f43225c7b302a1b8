//! Relative formatting of due-date descriptors.
//!
//! All functions take "now" as an explicit parameter so the output is a
//! pure function of its inputs.

use crate::types::TodoistDue;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime};

/// Combined date-time with explicit offset, e.g. `2024-03-10T14:30:00+00:00`.
const DATETIME_LAYOUT: &str = "%Y-%m-%dT%H:%M:%S%:z";
/// Calendar date, e.g. `2024-03-10`.
const DATE_LAYOUT: &str = "%Y-%m-%d";

/// Render a due-date descriptor relative to `now`.
///
/// A `datetime` value wins over the calendar `date`. Date-only descriptors
/// never show a clock time: the phrase is truncated at the literal `" at"`.
/// Descriptors that parse as neither render as the empty string.
pub fn relative_date_time(due: &TodoistDue, now: DateTime<FixedOffset>) -> String {
    if let Some(datetime) = &due.datetime {
        if let Ok(parsed) = DateTime::parse_from_str(datetime, DATETIME_LAYOUT) {
            return relative_phrase(parsed.with_timezone(now.offset()), now);
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(&due.date, DATE_LAYOUT) {
        if let Some(midnight) = date
            .and_time(NaiveTime::MIN)
            .and_local_timezone(*now.offset())
            .earliest()
        {
            let phrase = relative_phrase(midnight, now);
            return match phrase.find(" at") {
                Some(index) => phrase[..index].to_string(),
                None => phrase,
            };
        }
    }

    String::new()
}

/// Resolve a descriptor to a comparable instant in `offset`.
///
/// Date-only descriptors resolve to the end of that day, so a task due
/// "today" does not count as overdue until the day is over.
pub fn due_instant(due: &TodoistDue, offset: FixedOffset) -> Option<DateTime<FixedOffset>> {
    if let Some(datetime) = &due.datetime {
        if let Ok(parsed) = DateTime::parse_from_str(datetime, DATETIME_LAYOUT) {
            return Some(parsed.with_timezone(&offset));
        }
    }

    NaiveDate::parse_from_str(&due.date, DATE_LAYOUT)
        .ok()
        .and_then(|date| date.and_hms_opt(23, 59, 59))
        .and_then(|end_of_day| end_of_day.and_local_timezone(offset).earliest())
}

fn relative_phrase(target: DateTime<FixedOffset>, now: DateTime<FixedOffset>) -> String {
    let days = target
        .date_naive()
        .signed_duration_since(now.date_naive())
        .num_days();
    let time = target.format("%H:%M");

    match days {
        0 => format!("today at {time}"),
        1 => format!("tomorrow at {time}"),
        -1 => format!("yesterday at {time}"),
        2..=6 => format!("in {days} days at {time}"),
        d if d < 0 => format!("{} days ago", -d),
        _ => format!("{} at {time}", target.format("%b %-d")),
    }
}
