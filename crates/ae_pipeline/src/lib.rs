use std::fmt;
use std::sync::Arc;
use ae_core::config::PipelineConfig;
use ae_core::{
    ArticleExtractor, ArticleStore, CandidateLink, Config, ExtractedArticle, LinkDiscovery, Result,
    StoredArticle,
};
use ae_inference::{create_model, ContentGenerator};
use ae_scrapers::{DiscoveryService, ExtractionEngine};
use ae_storage::create_store;
use chrono::Local;
use tracing::{error, info, warn};

pub mod assembly;

pub use assembly::{build_payload, derive_excerpt, format_references};

/// Steps of a run, in the order they execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    FetchSource,
    Discover,
    ExtractEach,
    Generate,
    AssembleReferences,
    Publish,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::FetchSource => "FETCH_SOURCE",
            Stage::Discover => "DISCOVER",
            Stage::ExtractEach => "EXTRACT_EACH",
            Stage::Generate => "GENERATE",
            Stage::AssembleReferences => "ASSEMBLE_REFERENCES",
            Stage::Publish => "PUBLISH",
            Stage::Done => "DONE",
        };
        f.write_str(name)
    }
}

/// How a successful run ended.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    Published(StoredArticle),
    /// Discovery found nothing worth referencing; nothing was written.
    NoCandidates,
}

pub struct Pipeline {
    store: Arc<dyn ArticleStore>,
    discovery: Arc<dyn LinkDiscovery>,
    extractor: Arc<dyn ArticleExtractor>,
    generator: ContentGenerator,
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(
        store: Arc<dyn ArticleStore>,
        discovery: Arc<dyn LinkDiscovery>,
        extractor: Arc<dyn ArticleExtractor>,
        generator: ContentGenerator,
        config: PipelineConfig,
    ) -> Self {
        Self {
            store,
            discovery,
            extractor,
            generator,
            config,
        }
    }

    /// Wires the production components: the HTTP store, render-then-static
    /// fetching for both discovery and extraction, and the named model.
    pub fn from_config(config: &Config, model: &str) -> Result<Self> {
        let store = create_store("http", &config.store)?;
        let discovery = Arc::new(DiscoveryService::from_config(config)?);
        let extractor = Arc::new(ExtractionEngine::from_config(config)?);
        let generator = ContentGenerator::new(create_model(model, &config.inference)?);
        info!("🧠 Inference model initialized (using {})", generator.model_name());

        Ok(Self::new(store, discovery, extractor, generator, config.pipeline.clone()))
    }

    /// One end-to-end run. Store and generation failures abort the run;
    /// discovery and extraction problems never do.
    pub async fn run(&self) -> Result<RunOutcome> {
        enter(Stage::FetchSource);
        let source = self.store.latest().await?;
        info!("📰 Source article #{}: {}", source.id, source.title);

        enter(Stage::Discover);
        let candidates = self
            .discovery
            .discover(&source.title, self.config.discovery_limit)
            .await;
        if candidates.is_empty() {
            warn!("⚠️ No competing articles found for {:?}, nothing to publish", source.title);
            return Ok(RunOutcome::NoCandidates);
        }
        info!("🔗 Found {} candidate articles", candidates.len());

        enter(Stage::ExtractEach);
        let extracted = self.extract_each(&candidates).await;

        enter(Stage::Generate);
        let enhanced = self.generator.generate(&source, &extracted).await?;

        enter(Stage::AssembleReferences);
        let payload = build_payload(&source, &enhanced, Local::now().date_naive());

        enter(Stage::Publish);
        let stored = self.store.create(&payload).await.map_err(|e| {
            error!("❌ Publishing failed: {}", e);
            e
        })?;

        enter(Stage::Done);
        info!("🎉 Published enhanced article #{}: {}", stored.id, stored.title);
        Ok(RunOutcome::Published(stored))
    }

    /// Extracts candidates one at a time, pausing between requests.
    async fn extract_each(&self, candidates: &[CandidateLink]) -> Vec<ExtractedArticle> {
        let delay = self.config.effective_delay();
        let mut extracted = Vec::with_capacity(candidates.len());

        for (index, candidate) in candidates.iter().enumerate() {
            if index > 0 {
                tokio::time::sleep(delay).await;
            }

            let mut article = self.extractor.extract(&candidate.url).await;
            match article.error {
                Some(ref e) => warn!("⚠️ Could not extract {}: {}", candidate.url, e),
                None => info!("📄 Extracted {} words from {}", article.word_count, candidate.url),
            }
            if article.title.trim().is_empty() {
                article.title = candidate.title.clone();
            }
            extracted.push(article);
        }

        extracted
    }
}

fn enter(stage: Stage) {
    info!("▶️ {}", stage);
}
