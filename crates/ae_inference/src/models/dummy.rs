use std::fmt;
use async_trait::async_trait;
use ae_core::{CompletionRequest, InferenceModel, Result};

const WORDS_KEPT: usize = 60;

/// Offline stand-in that echoes the prompt's title and opening words as
/// Markdown, so pipelines can run without a provider.
pub struct DummyModel;

impl fmt::Debug for DummyModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DummyModel").finish()
    }
}

impl DummyModel {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DummyModel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InferenceModel for DummyModel {
    fn name(&self) -> &str {
        "Dummy"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let title = request
            .user
            .lines()
            .find_map(|line| line.trim().strip_prefix("Title:"))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or("Untitled");

        let body = request
            .user
            .split_once("Content:")
            .map(|(_, rest)| rest)
            .unwrap_or(&request.user);
        let words: Vec<&str> = body.split_whitespace().take(WORDS_KEPT).collect();

        Ok(format!("# {}\n\n{}", title, words.join(" ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_dummy_model() {
        let model = DummyModel::new();
        let request = CompletionRequest {
            model: "none".to_string(),
            system: String::new(),
            user: "Intro\nTitle: Test Article\n\nContent:\nThis is a test article. It has multiple sentences.".to_string(),
            temperature: 0.7,
            max_tokens: 10,
        };

        let result = model.complete(&request).await.unwrap();
        assert!(result.starts_with("# Test Article\n\n"));
        assert!(result.contains("This is a test article"));
    }

    #[tokio::test]
    async fn test_dummy_model_without_title() {
        let request = CompletionRequest {
            model: "none".to_string(),
            system: String::new(),
            user: "just some words".to_string(),
            temperature: 0.0,
            max_tokens: 10,
        };
        let result = DummyModel::new().complete(&request).await.unwrap();
        assert_eq!(result, "# Untitled\n\njust some words");
    }
}
