use chrono::{Duration, NaiveDateTime};

use crate::io::recovery::{self, RecoveryCategory, RecoveryEntry};
use crate::io::store::{JsonStore, StoreError};
use crate::model::event::{DATETIME_FORMAT, Event, combine_datetime};
use crate::parse::schedule::{ScheduleDefaults, interpret};

/// Error type for calendar operations
#[derive(Debug, thiserror::Error)]
pub enum EventError {
    #[error("please enter a meeting title")]
    EmptyTitle,
    #[error("invalid date/time '{0}' (expected YYYY-MM-DD HH:MM)")]
    InvalidDateTime(String),
    #[error("meeting '{title}' already exists at {datetime}")]
    Duplicate { title: String, datetime: String },
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Schedule a meeting. `date` is `YYYY-MM-DD`, `time` is `HH:MM` (24-hour);
/// both are normalized to the zero-padded store format.
pub fn add_event(
    store: &JsonStore<Event>,
    title: &str,
    date: &str,
    time: &str,
    description: &str,
) -> Result<Event, EventError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(EventError::EmptyTitle);
    }
    let raw = combine_datetime(date.trim(), time.trim());
    let datetime = NaiveDateTime::parse_from_str(&raw, DATETIME_FORMAT)
        .map_err(|_| EventError::InvalidDateTime(raw.clone()))?
        .format(DATETIME_FORMAT)
        .to_string();

    let _lock = store.lock()?;
    let mut events = store.load()?;

    if events.iter().any(|e| e.is_same_meeting(title, &datetime)) {
        return Err(EventError::Duplicate {
            title: title.to_string(),
            datetime,
        });
    }

    let id = next_event_id(store, &events);
    let event = Event::new(id, title.to_string(), datetime, description.trim().to_string());
    events.push(event.clone());

    // Counter before records: a failed save can skip an id, never repeat one.
    store.write_sequence(id + 1)?;
    store.save(&events)?;
    log::info!("scheduled meeting {} '{}' at {}", event.id, event.title, event.datetime);
    Ok(event)
}

/// Next id: past the persisted counter and past every id still present.
fn next_event_id(store: &JsonStore<Event>, events: &[Event]) -> u64 {
    let past_max = events.iter().map(|e| e.id).max().unwrap_or(0) + 1;
    store.read_sequence().max(past_max)
}

/// Interpret a spoken/typed sentence and schedule the result.
pub fn schedule_from_text(
    store: &JsonStore<Event>,
    text: &str,
    now: NaiveDateTime,
    defaults: &ScheduleDefaults,
) -> Result<Event, EventError> {
    let req = interpret(text, now, defaults);
    log::debug!("interpreted {:?} as {:?}", text, req);
    add_event(store, &req.title, &req.date, &req.time, &req.description)
}

/// All meetings in insertion order.
pub fn list_events(store: &JsonStore<Event>) -> Result<Vec<Event>, StoreError> {
    store.load()
}

/// Meetings starting within `[now, now + window]`, both ends inclusive.
/// Past meetings are excluded however close they are.
pub fn events_within(
    store: &JsonStore<Event>,
    now: NaiveDateTime,
    window: Duration,
) -> Result<Vec<Event>, StoreError> {
    let events = store.load()?;
    Ok(events
        .into_iter()
        .filter(|e| match e.timestamp() {
            Some(ts) => {
                let offset = ts - now;
                offset >= Duration::zero() && offset <= window
            }
            None => {
                log::warn!("skipping meeting {} with unreadable datetime '{}'", e.id, e.datetime);
                false
            }
        })
        .collect())
}

/// Meetings in the next `minutes` minutes (reminders). A negative window is empty.
pub fn list_events_next(
    store: &JsonStore<Event>,
    now: NaiveDateTime,
    minutes: i64,
) -> Result<Vec<Event>, StoreError> {
    // Windows too large for a Duration saturate instead of overflowing.
    let window = Duration::try_minutes(minutes).unwrap_or(if minutes < 0 {
        Duration::MIN
    } else {
        Duration::MAX
    });
    events_within(store, now, window)
}

/// Meetings in the coming seven days.
pub fn list_events_week(
    store: &JsonStore<Event>,
    now: NaiveDateTime,
) -> Result<Vec<Event>, StoreError> {
    events_within(store, now, Duration::days(7))
}

/// Spoken/printed digest of the coming week.
pub fn weekly_summary(store: &JsonStore<Event>, now: NaiveDateTime) -> Result<String, StoreError> {
    let events = list_events_week(store, now)?;
    if events.is_empty() {
        return Ok("No meetings scheduled for this week.".to_string());
    }
    let mut out = String::from("This week's meetings:\n");
    for e in &events {
        out.push_str(&format!("- {} at {}\n", e.title, e.datetime));
    }
    Ok(out)
}

/// Remove the meeting with `id`. `Ok(None)` when no meeting has that id;
/// nothing is written in that case.
pub fn delete_event(store: &JsonStore<Event>, id: u64) -> Result<Option<Event>, EventError> {
    let _lock = store.lock()?;
    let mut events = store.load()?;
    let Some(idx) = events.iter().position(|e| e.id == id) else {
        log::debug!("no meeting {} to delete", id);
        return Ok(None);
    };
    let removed = events.remove(idx);
    store.save(&events)?;

    log_removed(store, &format!("meeting {} deleted", id), std::slice::from_ref(&removed));
    Ok(Some(removed))
}

/// Drop every meeting. Succeeds even when the store is unreadable; the
/// corrupt content is already in the recovery log at that point.
/// Returns how many meetings were removed. Ids keep counting upward afterwards.
pub fn clear_events(store: &JsonStore<Event>) -> Result<usize, EventError> {
    let _lock = store.lock()?;
    let removed = store.load().unwrap_or_default();
    store.save(&[])?;
    if !removed.is_empty() {
        log_removed(store, "all meetings cleared", &removed);
    }
    Ok(removed.len())
}

fn log_removed(store: &JsonStore<Event>, description: &str, events: &[Event]) {
    let body = serde_json::to_string_pretty(events).unwrap_or_default();
    recovery::log_recovery(
        store.data_dir(),
        RecoveryEntry::new(RecoveryCategory::Delete, description)
            .field("Store", store.name())
            .body(body),
    );
}
