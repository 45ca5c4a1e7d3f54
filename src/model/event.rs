use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Lexical format of `Event::datetime`; lexical order equals chronological order.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// A scheduled meeting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Human-readable number, unique within the store and never reused
    pub id: u64,
    pub title: String,
    /// Combined date and time, `YYYY-MM-DD HH:MM` (24-hour)
    pub datetime: String,
    #[serde(default)]
    pub description: String,
}

impl Event {
    pub fn new(id: u64, title: String, datetime: String, description: String) -> Self {
        Event {
            id,
            title,
            datetime,
            description,
        }
    }

    /// Parse `datetime` into a timestamp. `None` for hand-edited garbage.
    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.datetime, DATETIME_FORMAT).ok()
    }

    /// Duplicate check: same title (case-insensitive) at the exact same datetime string.
    pub fn is_same_meeting(&self, title: &str, datetime: &str) -> bool {
        self.datetime == datetime && self.title.to_lowercase() == title.to_lowercase()
    }
}

/// Join a date and a time into the store's combined datetime string.
pub fn combine_datetime(date: &str, time: &str) -> String {
    format!("{} {}", date, time)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_stable_field_names() {
        let event = Event::new(3, "Standup".into(), "2025-05-01 09:30".into(), String::new());
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["id"], 3);
        assert_eq!(json["title"], "Standup");
        assert_eq!(json["datetime"], "2025-05-01 09:30");
        assert_eq!(json["description"], "");
    }

    #[test]
    fn missing_description_defaults_to_empty() {
        let event: Event =
            serde_json::from_str(r#"{"id":1,"title":"Sync","datetime":"2025-05-01 10:00"}"#)
                .unwrap();
        assert_eq!(event.description, "");
    }

    #[test]
    fn timestamp_parses_store_format() {
        let event = Event::new(1, "Sync".into(), "2025-05-01 14:30".into(), String::new());
        let ts = event.timestamp().unwrap();
        assert_eq!(ts.format("%H:%M").to_string(), "14:30");

        let bad = Event::new(2, "Sync".into(), "tomorrow-ish".into(), String::new());
        assert!(bad.timestamp().is_none());
    }

    #[test]
    fn same_meeting_ignores_title_case_only() {
        let event = Event::new(1, "Budget Review".into(), "2025-05-01 14:30".into(), String::new());
        assert!(event.is_same_meeting("budget review", "2025-05-01 14:30"));
        assert!(!event.is_same_meeting("budget review", "2025-05-01 14:31"));
        assert!(!event.is_same_meeting("budget", "2025-05-01 14:30"));
    }
}
