use chrono::NaiveDateTime;

use crate::io::store::{JsonStore, StoreError};
use crate::model::email::{EMAIL_TIMESTAMP_FORMAT, Email};

/// Error type for the simulated inbox
#[derive(Debug, thiserror::Error)]
pub enum InboxError {
    #[error("please fill in recipient, subject and body before sending")]
    MissingFields,
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// "Send" an email by storing it at the front of the inbox (newest first).
pub fn send_email(
    store: &JsonStore<Email>,
    to: &str,
    subject: &str,
    body: &str,
    now: NaiveDateTime,
    source: Option<&str>,
) -> Result<Email, InboxError> {
    let (to, subject, body) = (to.trim(), subject.trim(), body.trim());
    if to.is_empty() || subject.is_empty() || body.is_empty() {
        return Err(InboxError::MissingFields);
    }

    let email = Email {
        to: to.to_string(),
        subject: subject.to_string(),
        body: body.to_string(),
        timestamp: now.format(EMAIL_TIMESTAMP_FORMAT).to_string(),
        source: source.map(str::to_string),
    };

    let _lock = store.lock()?;
    let mut inbox = store.load()?;
    inbox.insert(0, email.clone());
    store.save(&inbox)?;
    log::info!("sent email to {}: {}", email.to, email.subject);
    Ok(email)
}

/// The `limit` most recent emails.
pub fn read_inbox(store: &JsonStore<Email>, limit: usize) -> Result<Vec<Email>, StoreError> {
    let mut inbox = store.load()?;
    inbox.truncate(limit);
    Ok(inbox)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
    }

    #[test]
    fn newest_first_with_limit() {
        let tmp = TempDir::new().unwrap();
        let s: JsonStore<Email> = JsonStore::new(tmp.path(), "email_inbox.json");
        for i in 0..3 {
            send_email(
                &s,
                "ana@example.com",
                &format!("Update {}", i),
                "Body",
                at("2025-06-10 09:00"),
                None,
            )
            .unwrap();
        }
        let latest = read_inbox(&s, 2).unwrap();
        assert_eq!(latest.len(), 2);
        assert_eq!(latest[0].subject, "Update 2");
        assert_eq!(latest[1].subject, "Update 1");
        assert_eq!(latest[0].timestamp, "2025-06-10 09:00:00");
    }

    #[test]
    fn missing_fields_rejected() {
        let tmp = TempDir::new().unwrap();
        let s: JsonStore<Email> = JsonStore::new(tmp.path(), "email_inbox.json");
        let result = send_email(&s, "ana@example.com", " ", "Body", at("2025-06-10 09:00"), None);
        assert!(matches!(result, Err(InboxError::MissingFields)));
        assert!(read_inbox(&s, 5).unwrap().is_empty());
    }

    #[test]
    fn source_only_serialized_when_set() {
        let tmp = TempDir::new().unwrap();
        let s: JsonStore<Email> = JsonStore::new(tmp.path(), "email_inbox.json");
        send_email(&s, "a@b.c", "Hi", "Body", at("2025-06-10 09:00"), None).unwrap();
        send_email(&s, "a@b.c", "Auto", "Body", at("2025-06-10 09:01"), Some("auto")).unwrap();

        let raw = std::fs::read_to_string(s.path()).unwrap();
        assert_eq!(raw.matches("\"source\"").count(), 1);
        assert_eq!(read_inbox(&s, 5).unwrap()[0].source.as_deref(), Some("auto"));
    }
}
