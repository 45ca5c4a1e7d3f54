use serde::{Deserialize, Serialize};

/// Format of `Email::timestamp`
pub const EMAIL_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A locally "sent" email kept in the simulated inbox
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Email {
    pub to: String,
    pub subject: String,
    pub body: String,
    pub timestamp: String,
    /// `"auto"` for mail drafted by the text backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}
