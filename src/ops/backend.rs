/// A hosted generative-text service. Implementations live outside this crate;
/// failures are reported once and never retried.
pub trait TextBackend {
    fn complete(&self, prompt: &str) -> Result<String, BackendError>;
}

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("text backend error: {0}")]
    Failed(String),
}
