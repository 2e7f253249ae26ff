//! Content selection shared by every extraction tier.
//!
//! Third-party markup has no dependable structure, so selection is a cascade
//! of named probes tried in priority order. The first probe that matches an
//! element with visible text wins.

use ae_core::{Error, Result};
use scraper::{ElementRef, Html, Selector};

/// Fragments must be longer than this many characters to be kept.
pub const MIN_FRAGMENT_LEN: usize = 20;

const STRIP_SELECTOR: &str = "script, style, nav, footer, aside, .advertisement, .ads";
const FRAGMENT_SELECTOR: &str = "p, h2, h3, h4, li";
const FRAGMENT_SEPARATOR: &str = "\n\n";

/// A named CSS probe in a selection cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Probe {
    pub name: &'static str,
    pub css: &'static str,
}

pub const CONTAINER_PROBES: &[Probe] = &[
    Probe { name: "article", css: "article" },
    Probe { name: "main", css: "main" },
    Probe { name: "post-content", css: ".post-content" },
    Probe { name: "article-content", css: ".article-content" },
    Probe { name: "content", css: ".content" },
];

pub const TITLE_PROBES: &[Probe] = &[
    Probe { name: "h1", css: "h1" },
    Probe { name: "title-class", css: ".title" },
    Probe { name: "post-title", css: ".post-title" },
    Probe { name: "page-title", css: "title" },
];

impl Probe {
    fn selector(&self) -> Result<Selector> {
        parse_selector(self.css)
    }

    /// First element matched by this probe whose text is not blank.
    pub fn first_match<'a>(&self, root: ElementRef<'a>) -> Result<Option<ElementRef<'a>>> {
        let selector = self.selector()?;
        Ok(root.select(&selector).find(|el| !element_text(el).trim().is_empty()))
    }
}

/// Outcome of running the cascades over one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub title: String,
    pub content: String,
    /// Name of the container probe that matched, `None` for the whole-document fallback.
    pub container: Option<&'static str>,
}

/// Runs the title and content cascades over raw HTML.
pub fn select_article(html: &str) -> Result<Selection> {
    let mut document = Html::parse_document(html);
    strip_non_content(&mut document)?;
    let root = document.root_element();

    let title = first_text(root, TITLE_PROBES)?.unwrap_or_default();

    let mut container = None;
    for probe in CONTAINER_PROBES {
        if let Some(el) = probe.first_match(root)? {
            container = Some((probe.name, el));
            break;
        }
    }

    let (container_name, scope) = match container {
        Some((name, el)) => (Some(name), el),
        None => (None, root),
    };

    Ok(Selection {
        title,
        content: collect_fragments(scope)?,
        container: container_name,
    })
}

/// Trimmed text of the first probe that yields something non-empty.
pub fn first_text(root: ElementRef<'_>, probes: &[Probe]) -> Result<Option<String>> {
    for probe in probes {
        if let Some(el) = probe.first_match(root)? {
            return Ok(Some(element_text(&el).trim().to_string()));
        }
    }
    Ok(None)
}

fn collect_fragments(scope: ElementRef<'_>) -> Result<String> {
    let selector = parse_selector(FRAGMENT_SELECTOR)?;
    let fragments: Vec<String> = scope
        .select(&selector)
        .map(|el| element_text(&el).trim().to_string())
        .filter(|text| text.chars().count() > MIN_FRAGMENT_LEN)
        .collect();
    Ok(fragments.join(FRAGMENT_SEPARATOR))
}

fn strip_non_content(document: &mut Html) -> Result<()> {
    let selector = parse_selector(STRIP_SELECTOR)?;
    let ids: Vec<_> = document.select(&selector).map(|el| el.id()).collect();
    for id in ids {
        if let Some(mut node) = document.tree.get_mut(id) {
            node.detach();
        }
    }
    Ok(())
}

pub(crate) fn element_text(el: &ElementRef<'_>) -> String {
    el.text().collect::<String>()
}

pub(crate) fn parse_selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| Error::Scraping(format!("Invalid selector {:?}: {}", css, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const LONG_A: &str = "The first paragraph is comfortably long enough.";
    const LONG_B: &str = "A second paragraph that also passes the filter.";

    #[test]
    fn test_article_container_wins_over_main() {
        let html = format!(
            r#"<html><head><title>Page</title></head><body>
                <main><p>Main text that should never be selected here.</p></main>
                <article><h1>Headline</h1><p>{}</p><p>{}</p></article>
            </body></html>"#,
            LONG_A, LONG_B
        );
        let selection = select_article(&html).unwrap();
        assert_eq!(selection.container, Some("article"));
        assert_eq!(selection.title, "Headline");
        assert_eq!(selection.content, format!("{}\n\n{}", LONG_A, LONG_B));
    }

    #[test]
    fn test_empty_article_falls_through_to_next_probe() {
        let html = format!(
            r#"<body><article>   </article><div class="post-content"><p>{}</p></div></body>"#,
            LONG_A
        );
        let selection = select_article(&html).unwrap();
        assert_eq!(selection.container, Some("post-content"));
        assert_eq!(selection.content, LONG_A);
    }

    #[test]
    fn test_short_fragments_are_dropped() {
        let html = format!(
            r#"<article><p>Too short.</p><p>Exactly twenty chars</p><li>{}</li><h3>Tiny</h3></article>"#,
            LONG_A
        );
        let selection = select_article(&html).unwrap();
        assert_eq!(selection.content, LONG_A);
        for segment in selection.content.split("\n\n") {
            assert!(segment.chars().count() > MIN_FRAGMENT_LEN);
        }
    }

    #[test]
    fn test_headings_and_list_items_are_collected_in_order() {
        let html = format!(
            r#"<article><h2>A heading long enough to keep around</h2><p>{}</p><ul><li>{}</li></ul><h5>Level five headings are ignored entirely</h5></article>"#,
            LONG_A, LONG_B
        );
        let selection = select_article(&html).unwrap();
        let segments: Vec<&str> = selection.content.split("\n\n").collect();
        assert_eq!(segments, vec!["A heading long enough to keep around", LONG_A, LONG_B]);
    }

    #[test]
    fn test_non_content_elements_are_stripped() {
        let html = format!(
            r#"<article>
                <nav><p>Navigation links should disappear completely.</p></nav>
                <div class="ads"><p>Buy things now with this great offer today.</p></div>
                <p>{}</p>
                <footer><p>Copyright notice that is long enough to keep.</p></footer>
                <aside><p>Related stories sidebar content goes here.</p></aside>
            </article>"#,
            LONG_A
        );
        let selection = select_article(&html).unwrap();
        assert_eq!(selection.content, LONG_A);
    }

    #[test]
    fn test_whole_document_fallback() {
        let html = format!(r#"<body><div><p>{}</p></div></body>"#, LONG_B);
        let selection = select_article(&html).unwrap();
        assert_eq!(selection.container, None);
        assert_eq!(selection.content, LONG_B);
    }

    #[test]
    fn test_title_cascade() {
        let html = r#"<html><head><title> Page Title </title></head><body><h1>  </h1><div class="post-title">Post Title</div></body></html>"#;
        assert_eq!(select_article(html).unwrap().title, "Post Title");

        let html = r#"<html><head><title> Page Title </title></head><body><p>x</p></body></html>"#;
        assert_eq!(select_article(html).unwrap().title, "Page Title");

        let html = r#"<body><p>nothing</p></body>"#;
        assert_eq!(select_article(html).unwrap().title, "");
    }

    #[test]
    fn test_no_content_yields_empty_string() {
        let html = r#"<article><p>short</p></article>"#;
        let selection = select_article(html).unwrap();
        assert_eq!(selection.content, "");
    }
}
