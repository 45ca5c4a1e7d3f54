use serde::{Deserialize, Serialize};

/// Configuration from agenda.toml. Every key is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgendaConfig {
    #[serde(default)]
    pub calendar: CalendarConfig,
    #[serde(default)]
    pub tasks: TasksConfig,
    #[serde(default)]
    pub inbox: InboxConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarConfig {
    #[serde(default = "default_calendar_file")]
    pub file: String,
    /// Title used when a spoken command names nobody ("with ...")
    #[serde(default = "default_title")]
    pub default_title: String,
    /// Description used when a spoken command has no "about ..."
    #[serde(default = "default_description")]
    pub default_description: String,
    /// Window for `calendar next`
    #[serde(default = "default_reminder_minutes")]
    pub reminder_minutes: i64,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        CalendarConfig {
            file: default_calendar_file(),
            default_title: default_title(),
            default_description: default_description(),
            reminder_minutes: default_reminder_minutes(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TasksConfig {
    #[serde(default = "default_tasks_file")]
    pub file: String,
}

impl Default for TasksConfig {
    fn default() -> Self {
        TasksConfig {
            file: default_tasks_file(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboxConfig {
    #[serde(default = "default_inbox_file")]
    pub file: String,
    #[serde(default = "default_read_limit")]
    pub read_limit: usize,
}

impl Default for InboxConfig {
    fn default() -> Self {
        InboxConfig {
            file: default_inbox_file(),
            read_limit: default_read_limit(),
        }
    }
}

fn default_calendar_file() -> String {
    "calendar_data.json".to_string()
}

pub fn default_title() -> String {
    "Voice Scheduled Meeting".to_string()
}

pub fn default_description() -> String {
    "Auto-created from voice input".to_string()
}

fn default_reminder_minutes() -> i64 {
    10
}

fn default_tasks_file() -> String {
    "focusflow_tasks.json".to_string()
}

fn default_inbox_file() -> String {
    "email_inbox.json".to_string()
}

fn default_read_limit() -> usize {
    5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config: AgendaConfig = toml::from_str("").unwrap();
        assert_eq!(config.calendar.file, "calendar_data.json");
        assert_eq!(config.calendar.default_title, "Voice Scheduled Meeting");
        assert_eq!(config.calendar.reminder_minutes, 10);
        assert_eq!(config.tasks.file, "focusflow_tasks.json");
        assert_eq!(config.inbox.read_limit, 5);
    }

    #[test]
    fn partial_table_keeps_other_defaults() {
        let config: AgendaConfig = toml::from_str(
            r#"
[calendar]
reminder_minutes = 30
"#,
        )
        .unwrap();
        assert_eq!(config.calendar.reminder_minutes, 30);
        assert_eq!(config.calendar.default_description, "Auto-created from voice input");
    }
}
