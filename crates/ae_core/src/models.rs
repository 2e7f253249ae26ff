use async_trait::async_trait;
use std::fmt;
use crate::Result;

/// One chat-style completion: a system instruction plus a single user turn.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub system: String,
    pub user: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[async_trait]
pub trait InferenceModel: Send + Sync + fmt::Debug {
    /// Returns the backend name, used in logs
    fn name(&self) -> &str;

    /// Runs a completion and returns the assistant text verbatim
    async fn complete(&self, request: &CompletionRequest) -> Result<String>;
}
