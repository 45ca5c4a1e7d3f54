//! Naive natural-language scheduling: literal token checks and one
//! time-of-day pattern. Not a grammar; "with" and "about" match anywhere,
//! including inside other words.

use std::sync::LazyLock;

use chrono::{Duration, NaiveDateTime};
use regex::Regex;

use crate::parse::text::{capitalize, title_case};

/// `<1-2 digit hour>[:<2-digit minute>][am|pm]`, first match wins
static TIME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)([0-9]{1,2})(?::([0-9]{2}))?\s*(am|pm)?").expect("time pattern is valid")
});

const DEFAULT_HOUR: u32 = 10;

/// Fallbacks for sentences that don't name a person or a topic
#[derive(Debug, Clone)]
pub struct ScheduleDefaults {
    pub title: String,
    pub description: String,
}

impl Default for ScheduleDefaults {
    fn default() -> Self {
        ScheduleDefaults {
            title: crate::model::config::default_title(),
            description: crate::model::config::default_description(),
        }
    }
}

/// Fields derived from one sentence, ready for `add_event`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleRequest {
    pub title: String,
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:MM`
    pub time: String,
    pub description: String,
}

/// Derive a meeting from a free-form sentence.
///
/// - "tomorrow" anywhere (any case) schedules for the day after `now`, otherwise today.
/// - The first time-of-day match sets the time; "pm" adds 12 to hours below 12.
///   No match means 10:00.
/// - Text between "with" and the next "about" becomes the title-cased title.
/// - Text after "about" becomes the description, first letter capitalized, the rest lowercased.
///
/// Out-of-range hours such as "45" are carried through as-is and rejected
/// when the event is added.
pub fn interpret(text: &str, now: NaiveDateTime, defaults: &ScheduleDefaults) -> ScheduleRequest {
    let date = if text.to_lowercase().contains("tomorrow") {
        now.date() + Duration::days(1)
    } else {
        now.date()
    };

    let (hour, minute) = extract_time(text).unwrap_or((DEFAULT_HOUR, 0));

    let title = match text.split_once("with") {
        Some((_, rest)) => {
            let before_about = rest.split("about").next().unwrap_or(rest);
            title_case(before_about.trim())
        }
        None => defaults.title.clone(),
    };

    let description = match text.split_once("about") {
        Some((_, rest)) => capitalize(rest.trim()),
        None => defaults.description.clone(),
    };

    ScheduleRequest {
        title,
        date: date.format("%Y-%m-%d").to_string(),
        time: format!("{:02}:{:02}", hour, minute),
        description,
    }
}

fn extract_time(text: &str) -> Option<(u32, u32)> {
    let caps = TIME_RE.captures(text)?;
    let mut hour: u32 = caps.get(1)?.as_str().parse().ok()?;
    let minute: u32 = match caps.get(2) {
        Some(m) => m.as_str().parse().ok()?,
        None => 0,
    };
    if let Some(meridiem) = caps.get(3)
        && meridiem.as_str().eq_ignore_ascii_case("pm")
        && hour < 12
    {
        hour += 12;
    }
    Some((hour, minute))
}
