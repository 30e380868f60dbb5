use serde::{Deserialize, Serialize};

/// One question/answer pair. Lives for a single request and is never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatExchange {
    pub prompt: String,
    /// Set once by the pipeline. Any value sent by the caller is overwritten.
    #[serde(default)]
    pub response: Option<String>,
}

impl ChatExchange {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            response: None,
        }
    }
}
