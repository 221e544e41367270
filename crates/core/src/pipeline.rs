//! Top level extraction API.
//!
//! [`Pipeline`] ties the stages together: classification, layout
//! extraction, then the optional secondary enrichment (live feed posts or
//! reader comments) fetched through a [`Fetcher`].
//!
//! # Example
//!
//! ```rust
//! use depeche_core::{Config, Layout, Pipeline};
//!
//! let html = r#"<h1 class="article__title">Titre</h1><section class="article__content"></section>"#;
//! let page = Pipeline::new(Config::default()).extract_page(html).unwrap();
//! assert_eq!(page.layout, Layout::Standard);
//! assert_eq!(page.blocks.len(), 5);
//! ```

use std::sync::Arc;

use serde::Serialize;

use crate::Result;
use crate::block::ContentBlock;
use crate::classify::{Layout, classify};
use crate::comments::{comments_uri, fetch_comments};
use crate::config::Config;
use crate::extract::{LayoutSelectors, extract_article};
use crate::fetch::Fetcher;
#[cfg(feature = "fetch")]
use crate::fetch::{FetchConfig, HttpFetcher};
use crate::live::{LiveFeedRequest, extract_live, find_live_event_id};
use crate::parse::Document;
use crate::posts::expand_feed_json;

/// Output of the synchronous stages for one page.
///
/// Owns everything it holds, so it can cross an `.await` after the parsed
/// document has been dropped.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageExtraction {
    pub layout: Layout,
    pub blocks: Vec<ContentBlock>,
    /// Identifier of the post feed of a live page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub live_event_id: Option<String>,
    /// Absolute URL of the comments page of an article.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments_uri: Option<String>,
}

/// The extraction pipeline.
///
/// Holds no per-page state and can be shared between tasks.
#[derive(Clone)]
pub struct Pipeline {
    config: Config,
    fetcher: Option<Arc<dyn Fetcher>>,
}

impl Pipeline {
    /// Creates a pipeline without a fetcher: [`Pipeline::run`] returns only
    /// the primary blocks.
    pub fn new(config: Config) -> Self {
        Self { config, fetcher: None }
    }

    /// Creates a pipeline that uses `fetcher` for secondary enrichment.
    pub fn with_fetcher(config: Config, fetcher: Arc<dyn Fetcher>) -> Self {
        Self { config, fetcher: Some(fetcher) }
    }

    /// Creates a pipeline backed by an [`HttpFetcher`].
    #[cfg(feature = "fetch")]
    pub fn with_http(config: Config, fetch_config: FetchConfig) -> Result<Self> {
        let fetcher = HttpFetcher::new(fetch_config)?;
        Ok(Self::with_fetcher(config, Arc::new(fetcher)))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Classifies the page and runs its layout extractor.
    pub fn extract_page(&self, html: &str) -> Result<PageExtraction> {
        let doc = Document::parse(html);
        let layout = classify(&doc);
        tracing::debug!(?layout, "Classified page");

        let page = match LayoutSelectors::for_layout(layout) {
            Some(selectors) => PageExtraction {
                layout,
                blocks: extract_article(&doc, selectors, &self.config)?,
                live_event_id: None,
                comments_uri: match layout {
                    Layout::Standard => comments_uri(&doc, &self.config),
                    _ => None,
                },
            },
            None => PageExtraction {
                layout,
                blocks: extract_live(&doc, &self.config)?,
                live_event_id: find_live_event_id(&doc)?,
                comments_uri: None,
            },
        };

        tracing::debug!(blocks = page.blocks.len(), "Extracted primary blocks");
        Ok(page)
    }

    /// Extracts a page and appends its secondary enrichment.
    ///
    /// Enrichment never fails the page: fetch and decode problems are
    /// logged and the primary blocks are returned alone.
    pub async fn run(&self, html: &str) -> Result<Vec<ContentBlock>> {
        let page = self.extract_page(html)?;
        Ok(self.enrich(page).await)
    }

    /// Appends live feed posts or comments to an extracted page.
    pub async fn enrich(&self, page: PageExtraction) -> Vec<ContentBlock> {
        let mut blocks = page.blocks;
        let Some(fetcher) = self.fetcher.as_deref() else {
            tracing::debug!("No fetcher configured, skipping enrichment");
            return blocks;
        };

        match page.layout {
            Layout::Live => {
                if let Some(event_id) = page.live_event_id {
                    match self.live_posts(fetcher, &LiveFeedRequest::new(event_id)).await {
                        Ok(posts) => blocks.extend(posts),
                        Err(e) => tracing::warn!(error = %e, category = ?e.category(), "Live posts unavailable"),
                    }
                }
            }
            Layout::LongForm => {}
            Layout::Standard => {
                if self.config.fetch_comments
                    && let Some(uri) = page.comments_uri
                {
                    let comments = fetch_comments(fetcher, &uri).await;
                    if !comments.is_empty() {
                        blocks.push(ContentBlock::Blank);
                        blocks.extend(comments);
                    }
                }
            }
        }

        blocks
    }

    /// Fetches and expands one page of a live post feed.
    pub async fn fetch_live_posts(&self, request: &LiveFeedRequest) -> Result<Vec<ContentBlock>> {
        match self.fetcher.as_deref() {
            Some(fetcher) => self.live_posts(fetcher, request).await,
            None => Ok(Vec::new()),
        }
    }

    async fn live_posts(&self, fetcher: &dyn Fetcher, request: &LiveFeedRequest) -> Result<Vec<ContentBlock>> {
        let url = request.url(&self.config.live_api);
        tracing::debug!(event_id = %request.event_id, page = request.page, "Fetching live posts");
        let json = fetcher.fetch(&url).await?;
        expand_feed_json(&json, &self.config)
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("config", &self.config)
            .field("fetcher", &self.fetcher.is_some())
            .finish()
    }
}

/// Runs the synchronous stages with the default configuration.
pub fn extract_page(html: &str) -> Result<PageExtraction> {
    Pipeline::default().extract_page(html)
}

/// Extracts a page and fetches its enrichment over HTTP.
#[cfg(feature = "fetch")]
pub async fn extract_page_with_enrichment(html: &str, config: Config) -> Result<Vec<ContentBlock>> {
    Pipeline::with_http(config, FetchConfig::default())?.run(html).await
}
