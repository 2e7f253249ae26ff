use std::sync::Arc;
use ae_core::{
    CompletionRequest, EnhancedArticle, ExtractedArticle, InferenceModel, Reference, Result,
    SourceArticle,
};
use chrono::Utc;
use tracing::{error, info};

pub const MODEL: &str = "gpt-4-turbo-preview";
pub const TEMPERATURE: f32 = 0.7;
pub const MAX_OUTPUT_TOKENS: u32 = 3000;

/// Characters of each reference shown to the model.
pub const PREVIEW_CHARS: usize = 1500;

pub const SYSTEM_PROMPT: &str = "You are an expert content writer and SEO specialist. Your task is to improve articles by analyzing top-ranking content and applying best practices for formatting, structure, and readability.";

const TASK_INSTRUCTIONS: &str = "## Your Task

1. Analyze the formatting, structure, and content style of the reference articles
2. Improve the original article by:
   - Enhancing the formatting (use proper headings, bullet points, etc.)
   - Improving readability and flow
   - Adding relevant information from reference articles where appropriate
   - Maintaining the core message of the original article
   - Making it more comprehensive and valuable to readers
   - Optimizing for SEO while keeping it natural

3. Return ONLY the improved article content in Markdown format
4. DO NOT include phrases like \"Here's the improved version\" or meta-commentary
5. Start directly with the article title as H1 (# Title)

Please provide the enhanced article now:";

/// Rewrites a source article with competing articles as reference material.
#[derive(Debug, Clone)]
pub struct ContentGenerator {
    model: Arc<dyn InferenceModel>,
}

impl ContentGenerator {
    pub fn new(model: Arc<dyn InferenceModel>) -> Self {
        Self { model }
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    /// The user message sent alongside [`SYSTEM_PROMPT`].
    pub fn build_prompt(original: &SourceArticle, references: &[ExtractedArticle]) -> String {
        let references_text = references
            .iter()
            .enumerate()
            .map(|(index, reference)| {
                format!(
                    "### Reference Article {}: {}\nURL: {}\n\nContent Preview:\n{}...\n\n---\n",
                    index + 1,
                    reference.title,
                    reference.url,
                    preview(&reference.content)
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "I need you to improve the following article by analyzing top-ranking content from Google search results.\n\n\
             ## Original Article\nTitle: {}\n\nContent:\n{}\n\n---\n\n\
             ## Top-Ranking Reference Articles\n\n{}\n---\n\n{}",
            original.title, original.content, references_text, TASK_INSTRUCTIONS
        )
    }

    pub fn completion_request(original: &SourceArticle, references: &[ExtractedArticle]) -> CompletionRequest {
        CompletionRequest {
            model: MODEL.to_string(),
            system: SYSTEM_PROMPT.to_string(),
            user: Self::build_prompt(original, references),
            temperature: TEMPERATURE,
            max_tokens: MAX_OUTPUT_TOKENS,
        }
    }

    /// Produces the enhanced body. Provider failures are returned unchanged;
    /// there is no local fallback.
    pub async fn generate(
        &self,
        original: &SourceArticle,
        references: &[ExtractedArticle],
    ) -> Result<EnhancedArticle> {
        info!(
            "🤖 Enhancing {:?} with {} references ({})",
            original.title,
            references.len(),
            self.model.name()
        );

        let request = Self::completion_request(original, references);
        let content = self.model.complete(&request).await.map_err(|e| {
            error!("❌ Error enhancing article: {}", e);
            e
        })?;

        info!("✨ Article enhanced successfully");
        Ok(EnhancedArticle {
            content,
            original_content: original.content.clone(),
            references: references.iter().map(Reference::from).collect(),
            enhanced_at: Utc::now(),
        })
    }
}

fn preview(content: &str) -> &str {
    match content.char_indices().nth(PREVIEW_CHARS) {
        Some((cut, _)) => &content[..cut],
        None => content,
    }
}
