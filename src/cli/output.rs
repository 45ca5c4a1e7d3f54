use serde::Serialize;

use crate::model::{Email, Event, Task};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct TaskJson<'a> {
    pub number: usize,
    pub task: &'a str,
    pub done: bool,
}

pub fn tasks_to_json(tasks: &[(usize, Task)]) -> Vec<TaskJson<'_>> {
    tasks
        .iter()
        .map(|(n, t)| TaskJson {
            number: *n,
            task: &t.text,
            done: t.done,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

pub const NO_MEETINGS: &str = "No meetings scheduled.";
pub const NO_TASKS: &str = "No tasks found.";
pub const NO_PENDING_TASKS: &str = "No pending tasks.";
pub const NO_EMAILS: &str = "No emails found.";

pub fn format_event_line(event: &Event) -> String {
    if event.description.is_empty() {
        format!("{}. {} | {}", event.id, event.title, event.datetime)
    } else {
        format!(
            "{}. {} | {} | {}",
            event.id, event.title, event.datetime, event.description
        )
    }
}

/// Full meeting listing, or the empty-state message
pub fn format_event_listing(events: &[Event]) -> Vec<String> {
    if events.is_empty() {
        return vec![NO_MEETINGS.to_string()];
    }
    let mut lines = vec!["Upcoming meetings:".to_string()];
    lines.extend(events.iter().map(format_event_line));
    lines
}

pub fn format_scheduled(event: &Event) -> String {
    format!(
        "Meeting '{}' scheduled for {} (ID {})",
        event.title, event.datetime, event.id
    )
}

pub fn format_task_line(number: usize, task: &Task) -> String {
    let status = if task.done { "done" } else { "pending" };
    format!("{}. {} [{}]", number, task.text, status)
}

/// Task listing with 1-based numbers. When nothing is shown, `store_empty`
/// picks between "no tasks at all" and "everything is done".
pub fn format_task_listing(tasks: &[(usize, Task)], store_empty: bool) -> Vec<String> {
    if tasks.is_empty() {
        let message = if store_empty { NO_TASKS } else { NO_PENDING_TASKS };
        return vec![message.to_string()];
    }
    tasks.iter().map(|(n, t)| format_task_line(*n, t)).collect()
}

pub fn format_email(email: &Email) -> Vec<String> {
    let mut lines = vec![
        format!("To: {}", email.to),
        format!("Subject: {}", email.subject),
        format!("Time: {}", email.timestamp),
        String::new(),
    ];
    lines.extend(email.body.lines().map(str::to_string));
    lines
}

pub fn format_inbox(emails: &[Email]) -> Vec<String> {
    if emails.is_empty() {
        return vec![NO_EMAILS.to_string()];
    }
    let mut lines = Vec::new();
    for (i, email) in emails.iter().enumerate() {
        if i > 0 {
            lines.push("---".to_string());
        }
        lines.extend(format_email(email));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_lines() {
        let e = Event::new(2, "Sync".into(), "2025-06-10 09:00".into(), String::new());
        assert_eq!(format_event_line(&e), "2. Sync | 2025-06-10 09:00");
        let e = Event::new(3, "Demo".into(), "2025-06-10 15:00".into(), "v2".into());
        assert_eq!(format_event_line(&e), "3. Demo | 2025-06-10 15:00 | v2");
        assert_eq!(format_event_listing(&[]), vec![NO_MEETINGS]);
    }

    #[test]
    fn task_lines_keep_numbers() {
        let tasks = vec![
            (1, Task::new("a".into())),
            (
                3,
                Task {
                    text: "c".into(),
                    done: true,
                },
            ),
        ];
        assert_eq!(
            format_task_listing(&tasks, false),
            vec!["1. a [pending]", "3. c [done]"]
        );
        assert_eq!(format_task_listing(&[], true), vec![NO_TASKS]);
        assert_eq!(format_task_listing(&[], false), vec![NO_PENDING_TASKS]);
    }

    #[test]
    fn inbox_separates_emails() {
        let email = Email {
            to: "a@b.c".into(),
            subject: "Hi".into(),
            body: "line one\nline two".into(),
            timestamp: "2025-06-10 09:00:00".into(),
            source: None,
        };
        let lines = format_inbox(&[email.clone(), email]);
        assert_eq!(lines.iter().filter(|l| *l == "---").count(), 1);
        assert_eq!(lines[0], "To: a@b.c");
        assert_eq!(lines[5], "line two");
    }
}
