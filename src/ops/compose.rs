use chrono::NaiveDateTime;

use crate::io::store::JsonStore;
use crate::model::email::Email;
use crate::ops::backend::{BackendError, TextBackend};
use crate::ops::inbox_ops::{InboxError, send_email};
use crate::parse::email_text::split_generated_email;

#[derive(Debug, thiserror::Error)]
pub enum ComposeError {
    #[error("please enter a subject before generating")]
    EmptySubject,
    #[error("error generating email: {0}")]
    Backend(#[from] BackendError),
    #[error(transparent)]
    Inbox(#[from] InboxError),
}

fn draft_prompt(subject: &str, purpose: &str, sender: &str) -> String {
    let purpose = if purpose.trim().is_empty() {
        "General business communication"
    } else {
        purpose.trim()
    };
    format!(
        "Write a professional email about '{}'.\n\
         Context/Purpose: {}.\n\
         Sender Name: {}.\n\
         Keep it short, polite, and structured (Subject, Greeting, Body, Closing).",
        subject, purpose, sender
    )
}

fn auto_prompt(topic: &str, recipient: &str, sender: &str, context: &str) -> String {
    format!(
        "Write a professional email about '{}'.\n\
         Sender: {}\n\
         Recipient: {}\n\
         Context: {}\n\n\
         The email should have a subject and body, concise and natural tone.",
        topic, sender, recipient, context
    )
}

/// Ask the backend for a complete email about `subject`.
pub fn draft_email(
    backend: &dyn TextBackend,
    subject: &str,
    purpose: &str,
    sender: &str,
) -> Result<String, ComposeError> {
    let subject = subject.trim();
    if subject.is_empty() {
        return Err(ComposeError::EmptySubject);
    }
    let text = backend.complete(&draft_prompt(subject, purpose, sender))?;
    Ok(text.trim().to_string())
}

/// Draft an email about `topic`, split out its subject line, and file it in
/// the inbox tagged `source = "auto"`.
pub fn auto_email(
    backend: &dyn TextBackend,
    inbox: &JsonStore<Email>,
    now: NaiveDateTime,
    topic: &str,
    recipient: &str,
    sender: &str,
    context: &str,
) -> Result<Email, ComposeError> {
    let text = backend.complete(&auto_prompt(topic.trim(), recipient, sender, context))?;
    let split = split_generated_email(&text);
    log::debug!("auto email to {} subject {:?}", recipient, split.subject);
    Ok(send_email(
        inbox,
        recipient,
        &split.subject,
        &split.body,
        now,
        Some("auto"),
    )?)
}
