use chrono::{Local, NaiveDateTime};

/// Source of "current local date-time" for relative date resolution and
/// window queries.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

/// Wall clock in the local timezone
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock pinned to one instant, for tests and replays
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl FixedClock {
    /// Build from a `YYYY-MM-DD HH:MM` string.
    pub fn parse(s: &str) -> Option<Self> {
        NaiveDateTime::parse_from_str(s, crate::model::event::DATETIME_FORMAT)
            .ok()
            .map(FixedClock)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_parses_store_format() {
        let clock = FixedClock::parse("2025-03-14 09:05").unwrap();
        assert_eq!(clock.now().format("%Y-%m-%d %H:%M").to_string(), "2025-03-14 09:05");
    }

    #[test]
    fn fixed_clock_rejects_other_formats() {
        assert!(FixedClock::parse("2025-03-14T09:05:00").is_none());
    }
}
