use serde::{Deserialize, Serialize};

/// A to-do entry. Its 1-based position in the store is its only identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    #[serde(rename = "task")]
    pub text: String,
    #[serde(default)]
    pub done: bool,
}

impl Task {
    pub fn new(text: String) -> Self {
        Task { text, done: false }
    }

    /// Case-insensitive text match used for duplicate rejection
    pub fn matches_text(&self, text: &str) -> bool {
        self.text.to_lowercase() == text.to_lowercase()
    }
}
