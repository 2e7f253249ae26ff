use std::sync::atomic::{AtomicBool, Ordering};
use async_trait::async_trait;
use ae_core::{
    ArticlePage, ArticleStore, ArticleUpdate, Error, PublishPayload, Result, SourceArticle,
    StoredArticle,
};
use chrono::Utc;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct MemoryState {
    articles: Vec<StoredArticle>,
    last_id: u64,
}

impl MemoryState {
    fn insert(&mut self, mut article: StoredArticle) -> StoredArticle {
        if article.id == 0 {
            self.last_id += 1;
            article.id = self.last_id;
        } else {
            self.last_id = self.last_id.max(article.id);
        }
        self.articles.push(article.clone());
        article
    }

    fn find_mut(&mut self, id: u64) -> Result<&mut StoredArticle> {
        self.articles
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| Error::Storage(format!("Article {} not found", id)))
    }
}

/// Process-local store. Useful for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
    reject_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-populated with the given articles, oldest first.
    pub fn with_articles(articles: impl IntoIterator<Item = SourceArticle>) -> Self {
        let mut state = MemoryState::default();
        for article in articles {
            state.insert(StoredArticle {
                id: article.id,
                title: article.title,
                content: article.content,
                original_content: None,
                excerpt: article.excerpt,
                url: article.url,
                references: None,
                is_updated: false,
                created_at: Some(Utc::now().to_rfc3339()),
                updated_at: None,
            });
        }
        Self {
            state: RwLock::new(state),
            reject_writes: AtomicBool::new(false),
        }
    }

    /// Makes every create/update/delete answer like a store reporting `success: false`.
    pub fn reject_writes(&self, reject: bool) {
        self.reject_writes.store(reject, Ordering::SeqCst);
    }

    pub async fn articles(&self) -> Vec<StoredArticle> {
        self.state.read().await.articles.clone()
    }

    fn check_writable(&self, action: &str) -> Result<()> {
        if self.reject_writes.load(Ordering::SeqCst) {
            return Err(Error::Storage(format!("{} failed: store rejected the write", action)));
        }
        Ok(())
    }
}

#[async_trait]
impl ArticleStore for MemoryStore {
    async fn latest(&self) -> Result<SourceArticle> {
        let state = self.state.read().await;
        state
            .articles
            .iter()
            .max_by_key(|a| a.id)
            .cloned()
            .map(SourceArticle::from)
            .ok_or_else(|| Error::Storage("fetch latest article failed: No articles found".to_string()))
    }

    async fn create(&self, payload: &PublishPayload) -> Result<StoredArticle> {
        self.check_writable("create article")?;
        let now = Utc::now().to_rfc3339();
        let mut state = self.state.write().await;
        Ok(state.insert(StoredArticle {
            id: 0,
            title: payload.title.clone(),
            content: payload.content.clone(),
            original_content: Some(payload.original_content.clone()),
            excerpt: Some(payload.excerpt.clone()),
            url: payload.url.clone(),
            references: Some(payload.references.clone()),
            is_updated: payload.is_updated,
            created_at: Some(now.clone()),
            updated_at: Some(now),
        }))
    }

    async fn get(&self, id: u64) -> Result<StoredArticle> {
        let state = self.state.read().await;
        state
            .articles
            .iter()
            .find(|a| a.id == id)
            .cloned()
            .ok_or_else(|| Error::Storage(format!("Article {} not found", id)))
    }

    async fn list(&self, page: u32, per_page: u32) -> Result<ArticlePage> {
        let page = page.max(1);
        let per_page = per_page.max(1);
        let state = self.state.read().await;

        let mut articles = state.articles.clone();
        articles.sort_by(|a, b| b.id.cmp(&a.id));
        let total = articles.len() as u64;
        let last_page = ((total + per_page as u64 - 1) / per_page as u64).max(1) as u32;
        let data = articles
            .into_iter()
            .skip((page as usize - 1).saturating_mul(per_page as usize))
            .take(per_page as usize)
            .collect();

        Ok(ArticlePage {
            current_page: page,
            data,
            last_page,
            per_page,
            total,
        })
    }

    async fn update(&self, id: u64, update: &ArticleUpdate) -> Result<StoredArticle> {
        self.check_writable("update article")?;
        let mut state = self.state.write().await;
        let article = state.find_mut(id)?;
        if let Some(ref title) = update.title {
            article.title = title.clone();
        }
        if let Some(ref content) = update.content {
            article.content = content.clone();
        }
        if let Some(ref original) = update.original_content {
            article.original_content = Some(original.clone());
        }
        if let Some(ref excerpt) = update.excerpt {
            article.excerpt = Some(excerpt.clone());
        }
        if let Some(ref url) = update.url {
            article.url = Some(url.clone());
        }
        if let Some(ref references) = update.references {
            article.references = Some(references.clone());
        }
        if let Some(is_updated) = update.is_updated {
            article.is_updated = is_updated;
        }
        article.updated_at = Some(Utc::now().to_rfc3339());
        Ok(article.clone())
    }

    async fn delete(&self, id: u64) -> Result<()> {
        self.check_writable("delete article")?;
        let mut state = self.state.write().await;
        let before = state.articles.len();
        state.articles.retain(|a| a.id != id);
        if state.articles.len() == before {
            return Err(Error::Storage(format!("Article {} not found", id)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(id: u64, title: &str) -> SourceArticle {
        SourceArticle {
            id,
            title: title.to_string(),
            content: format!("{} body", title),
            url: None,
            excerpt: None,
        }
    }

    fn payload(title: &str) -> PublishPayload {
        PublishPayload {
            title: title.to_string(),
            content: "content".to_string(),
            original_content: "original".to_string(),
            excerpt: "excerpt...".to_string(),
            url: None,
            references: vec![],
            is_updated: true,
        }
    }

    #[tokio::test]
    async fn test_memory_store_latest_and_create() {
        let store = MemoryStore::with_articles([source(1, "Old"), source(2, "New")]);
        assert_eq!(store.latest().await.unwrap().title, "New");

        let created = store.create(&payload("Newest")).await.unwrap();
        assert_eq!(created.id, 3);
        assert!(created.is_updated);
        assert_eq!(store.latest().await.unwrap().id, 3);
    }

    #[tokio::test]
    async fn test_empty_store_has_no_latest() {
        let store = MemoryStore::new();
        assert!(matches!(store.latest().await, Err(Error::Storage(_))));
    }

    #[tokio::test]
    async fn test_rejected_writes() {
        let store = MemoryStore::with_articles([source(1, "Only")]);
        store.reject_writes(true);
        assert!(store.create(&payload("Nope")).await.is_err());
        assert!(store.delete(1).await.is_err());
        assert_eq!(store.articles().await.len(), 1);
    }

    #[tokio::test]
    async fn test_list_update_delete() {
        let store = MemoryStore::with_articles((1..=5).map(|i| source(i, &format!("A{}", i))));

        let page = store.list(2, 2).await.unwrap();
        assert_eq!(page.total, 5);
        assert_eq!(page.last_page, 3);
        let ids: Vec<u64> = page.data.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![3, 2]);

        let update = ArticleUpdate {
            title: Some("Renamed".to_string()),
            is_updated: Some(true),
            ..Default::default()
        };
        let updated = store.update(4, &update).await.unwrap();
        assert_eq!(updated.title, "Renamed");
        assert!(updated.is_updated);
        assert_eq!(updated.content, "A4 body");

        store.delete(4).await.unwrap();
        assert!(store.get(4).await.is_err());
        assert!(store.delete(4).await.is_err());
    }

    #[tokio::test]
    async fn test_list_far_past_the_end_is_empty() {
        let store = MemoryStore::with_articles((1..=3).map(|i| source(i, &format!("A{}", i))));

        let page = store.list(u32::MAX, u32::MAX).await.unwrap();
        assert!(page.data.is_empty());
        assert_eq!(page.total, 3);
        assert_eq!(page.last_page, 1);
    }
}
