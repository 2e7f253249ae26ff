use ae_core::{EnhancedArticle, PublishPayload, Reference, SourceArticle};
use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;

pub const EXCERPT_CHARS: usize = 200;
const TITLE_SUFFIX: &str = " (Enhanced)";

lazy_static! {
    static ref HEADERS: Regex = Regex::new(r"#{1,6}\s").unwrap();
    static ref LINKS: Regex = Regex::new(r"\[([^\]]+)\]\([^)]+\)").unwrap();
    static ref EMPHASIS: Regex = Regex::new(r"[*_~`]").unwrap();
}

/// The trailing "References" block listing every reference in order.
pub fn format_references(references: &[Reference], updated: NaiveDate) -> String {
    let list = references
        .iter()
        .enumerate()
        .map(|(index, reference)| format!("{}. [{}]({})", index + 1, reference.title, reference.url))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "---\n\n## References\n\nThis article was enhanced based on analysis of the following top-ranking articles:\n\n{}\n\n*Last updated: {}*",
        list,
        updated.format("%-m/%-d/%Y")
    )
}

/// Plain-text preview: Markdown headers, link syntax and emphasis removed,
/// cut to [`EXCERPT_CHARS`] characters and suffixed with an ellipsis.
pub fn derive_excerpt(content: &str) -> String {
    let plain = HEADERS.replace_all(content, "");
    let plain = LINKS.replace_all(&plain, "$1");
    let plain = EMPHASIS.replace_all(&plain, "");
    let preview: String = plain.trim().chars().take(EXCERPT_CHARS).collect();
    format!("{}...", preview)
}

/// Final publishable artifact: enhanced body plus reference section.
pub fn build_payload(source: &SourceArticle, enhanced: &EnhancedArticle, updated: NaiveDate) -> PublishPayload {
    let content = format!(
        "{}\n\n{}",
        enhanced.content,
        format_references(&enhanced.references, updated)
    );

    PublishPayload {
        title: format!("{}{}", source.title, TITLE_SUFFIX),
        excerpt: derive_excerpt(&content),
        content,
        original_content: source.content.clone(),
        url: source.url.clone(),
        references: enhanced.references.clone(),
        is_updated: true,
    }
}
