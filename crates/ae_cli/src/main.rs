use clap::Parser;
use ae_core::{Config, Result};
use ae_pipeline::{Pipeline, RunOutcome};
use tracing::{error, info};

mod logging;

/// Improves the newest stored article using top-ranking search results.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[arg(long, env = "STORE_API_URL", default_value = "http://localhost:8000/api")]
    store_url: String,
    /// Path of the latest-article endpoint, relative to the store URL
    #[arg(long, env = "STORE_LATEST_PATH", default_value = "/articles/latest")]
    latest_path: String,
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,
    #[arg(long, env = "OPENAI_BASE_URL", default_value = "https://api.openai.com/v1")]
    openai_url: String,
    #[arg(long, env = "BROWSERLESS_URL", default_value = "http://localhost:3000")]
    browserless_url: String,
    #[arg(long, env = "BROWSERLESS_TOKEN", hide_env_values = true)]
    browserless_token: Option<String>,
    #[arg(long, env = "SEARCH_BASE_URL", default_value = "https://www.google.com")]
    search_url: String,
    #[arg(long, default_value = "openai", help = "Model to use for generation. Available models: openai (default), dummy")]
    inference: String,
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn config(&self) -> Config {
        Config::default()
            .with_store_url(&self.store_url)
            .with_latest_path(&self.latest_path)
            .with_api_key(self.api_key.clone())
            .with_inference_url(&self.openai_url)
            .with_render(&self.browserless_url, self.browserless_token.clone())
            .with_search_url(&self.search_url)
    }
}

async fn run(cli: &Cli) -> Result<()> {
    let config = cli.config();
    config.validate()?;
    info!("💾 Store API: {}", config.store.base_url);

    let pipeline = Pipeline::from_config(&config, &cli.inference)?;
    match pipeline.run().await? {
        RunOutcome::Published(article) => {
            info!("✅ Done: article #{} ({} characters)", article.id, article.content.len());
        }
        RunOutcome::NoCandidates => info!("✅ Done: no reference articles, nothing published"),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    run(&cli).await.map_err(|e| {
        error!("❌ Run failed: {}", e);
        e
    })
}
