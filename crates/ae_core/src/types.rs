use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The article a pipeline run sets out to improve, as served by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceArticle {
    pub id: u64,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub excerpt: Option<String>,
}

/// A search result that may point at a competing article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateLink {
    pub url: String,
    pub title: String,
    pub snippet: String,
}

/// Best-effort readable text pulled from a page.
///
/// Exactly one of `content` (non-empty) or `error` is populated. Build values
/// through [`ExtractedArticle::new`] and [`ExtractedArticle::failed`] so that
/// `word_count` always matches `content`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedArticle {
    pub url: String,
    pub title: String,
    pub content: String,
    pub word_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExtractedArticle {
    pub fn new(url: impl Into<String>, title: impl Into<String>, content: impl Into<String>) -> Self {
        let content = content.into();
        Self {
            url: url.into(),
            title: title.into(),
            word_count: word_count(&content),
            content,
            error: None,
        }
    }

    pub fn failed(url: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: String::new(),
            content: String::new(),
            word_count: 0,
            error: Some(error.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none() && !self.content.is_empty()
    }
}

/// Number of whitespace-separated tokens; `0` for empty or blank text.
pub fn word_count(content: &str) -> usize {
    content.split_whitespace().count()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    pub title: String,
    pub url: String,
}

impl From<&ExtractedArticle> for Reference {
    fn from(article: &ExtractedArticle) -> Self {
        Self {
            title: article.title.clone(),
            url: article.url.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnhancedArticle {
    pub content: String,
    pub original_content: String,
    pub references: Vec<Reference>,
    pub enhanced_at: DateTime<Utc>,
}

/// Body of the create call that publishes an enhanced article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishPayload {
    pub title: String,
    pub content: String,
    pub original_content: String,
    pub excerpt: String,
    pub url: Option<String>,
    pub references: Vec<Reference>,
    pub is_updated: bool,
}

/// An article record as returned by the store after a write or lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredArticle {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub original_content: Option<String>,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub references: Option<Vec<Reference>>,
    #[serde(default)]
    pub is_updated: bool,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl From<StoredArticle> for SourceArticle {
    fn from(article: StoredArticle) -> Self {
        Self {
            id: article.id,
            title: article.title,
            content: article.content,
            url: article.url,
            excerpt: article.excerpt,
        }
    }
}

/// Partial update; unset fields are left untouched by the store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArticleUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub references: Option<Vec<Reference>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_updated: Option<bool>,
}

/// One page of the store's article listing, newest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticlePage {
    #[serde(default)]
    pub current_page: u32,
    #[serde(default)]
    pub data: Vec<StoredArticle>,
    #[serde(default)]
    pub last_page: u32,
    #[serde(default)]
    pub per_page: u32,
    #[serde(default)]
    pub total: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_count_matches_whitespace_tokens() {
        let article = ExtractedArticle::new(
            "https://example.com/a",
            "Title",
            "First paragraph with five words\n\nSecond   one\there",
        );
        assert_eq!(article.word_count, 8);
        assert!(article.is_success());
    }

    #[test]
    fn test_word_count_is_zero_for_empty_content() {
        assert_eq!(word_count(""), 0);
        assert_eq!(word_count("   \n\t"), 0);

        let article = ExtractedArticle::new("https://example.com/a", "Title", "");
        assert_eq!(article.word_count, 0);
    }

    #[test]
    fn test_failed_article_has_error_and_no_content() {
        let article = ExtractedArticle::failed("https://example.com/a", "timed out");
        assert_eq!(article.content, "");
        assert_eq!(article.word_count, 0);
        assert_eq!(article.error.as_deref(), Some("timed out"));
        assert!(!article.is_success());
    }

    #[test]
    fn test_stored_article_tolerates_missing_fields() {
        let json = r#"{"id": 7, "title": "Hello", "content": "Body", "url": null}"#;
        let stored: StoredArticle = serde_json::from_str(json).unwrap();
        assert_eq!(stored.id, 7);
        assert!(stored.references.is_none());

        let source: SourceArticle = stored.into();
        assert_eq!(source.title, "Hello");
        assert!(source.url.is_none());
    }

    #[test]
    fn test_article_update_skips_unset_fields() {
        let update = ArticleUpdate {
            title: Some("New".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json, serde_json::json!({"title": "New"}));
    }
}
