//! Article extraction for URL submissions.
//!
//! Two strategies, tried in order:
//! - **article-body**: locate the main article container and convert it to text
//! - **paragraphs**: join every `<p>` longer than a minimum length
//!
//! Each strategy reports a typed `FetchError`; `ArticleFetcher` collapses
//! failures into "no text" and logs the reason.

use async_trait::async_trait;
use html2text::render::text_renderer::TrivialDecorator;
use reqwest::Client;
use scraper::{Html, Selector};
use std::time::Duration;
use thiserror::Error;

use crate::config::FetchConfig;
use crate::models::ArticleContent;

/// Containers probed by the article-body strategy, most specific first.
const ARTICLE_SELECTORS: &[&str] = &[
    "article",
    "[itemprop=\"articleBody\"]",
    "main",
    "[role=\"main\"]",
    "body",
];

/// Wrap width for HTML-to-text conversion.
const TEXT_WIDTH: usize = 10_000;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server returned HTTP {0}")]
    Status(u16),

    #[error("could not parse page: {0}")]
    Parse(String),

    #[error("no article text found")]
    Empty,
}

/// One way of turning a URL into article text.
#[async_trait]
pub trait ArticleSource: Send + Sync {
    async fn extract(&self, url: &str) -> Result<String, FetchError>;

    /// Strategy name for logging.
    fn name(&self) -> &str;
}

// ============================================================================
// Shared download
// ============================================================================

/// HTTP downloader shared by the built-in strategies.
#[derive(Debug, Clone)]
pub struct PageClient {
    client: Client,
}

impl PageClient {
    pub fn new(config: &FetchConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        Ok(Self { client })
    }

    pub async fn get_html(&self, url: &str) -> Result<String, FetchError> {
        let parsed = reqwest::Url::parse(url).map_err(|e| FetchError::InvalidUrl(e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(FetchError::InvalidUrl(format!(
                "unsupported scheme {}",
                parsed.scheme()
            )));
        }

        let response = self.client.get(parsed).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        Ok(response.text().await?)
    }
}

fn selector(css: &str) -> Result<Selector, FetchError> {
    Selector::parse(css).map_err(|e| FetchError::Parse(format!("selector {css}: {e:?}")))
}

// ============================================================================
// Primary: article body
// ============================================================================

/// Extracts readable text from the page's main article container.
#[derive(Debug, Clone)]
pub struct ArticleBodySource {
    pages: PageClient,
}

impl ArticleBodySource {
    pub fn new(pages: PageClient) -> Self {
        Self { pages }
    }
}

/// Text of the first non-empty article container in `html`.
pub fn extract_article_body(html: &str) -> Result<String, FetchError> {
    let document = Html::parse_document(html);
    let skip = selector("script, style, noscript, nav, header, footer, aside, form")?;

    for css in ARTICLE_SELECTORS {
        let sel = selector(css)?;
        let Some(container) = document.select(&sel).next() else {
            continue;
        };

        let mut markup = container.html();
        for noise in container.select(&skip) {
            markup = markup.replacen(&noise.html(), "", 1);
        }

        let text = html_to_text(&markup);
        if !text.is_empty() {
            return Ok(text);
        }
    }
    Err(FetchError::Empty)
}

/// Plain text only: no heading marks, emphasis markers or link footnotes.
fn html_to_text(markup: &str) -> String {
    html2text::from_read_with_decorator(markup.as_bytes(), TEXT_WIDTH, TrivialDecorator::new())
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[async_trait]
impl ArticleSource for ArticleBodySource {
    async fn extract(&self, url: &str) -> Result<String, FetchError> {
        let html = self.pages.get_html(url).await?;
        extract_article_body(&html)
    }

    fn name(&self) -> &str {
        "article-body"
    }
}

// ============================================================================
// Secondary: paragraphs
// ============================================================================

/// Joins every paragraph longer than `min_chars`, one per line.
#[derive(Debug, Clone)]
pub struct ParagraphSource {
    pages: PageClient,
    min_chars: usize,
}

impl ParagraphSource {
    pub fn new(pages: PageClient, min_chars: usize) -> Self {
        Self { pages, min_chars }
    }
}

/// Paragraph text longer than `min_chars` characters, newline-joined. May be empty.
pub fn extract_paragraphs(html: &str, min_chars: usize) -> Result<String, FetchError> {
    let document = Html::parse_document(html);
    let p = selector("p")?;
    Ok(document
        .select(&p)
        .map(|el| el.text().collect::<String>())
        .filter(|text| text.chars().count() > min_chars)
        .collect::<Vec<_>>()
        .join("\n"))
}

#[async_trait]
impl ArticleSource for ParagraphSource {
    async fn extract(&self, url: &str) -> Result<String, FetchError> {
        let html = self.pages.get_html(url).await?;
        extract_paragraphs(&html, self.min_chars)
    }

    fn name(&self) -> &str {
        "paragraphs"
    }
}

// ============================================================================
// ArticleFetcher
// ============================================================================

/// Primary strategy with a secondary fallback.
pub struct ArticleFetcher {
    primary: Box<dyn ArticleSource>,
    secondary: Box<dyn ArticleSource>,
}

impl ArticleFetcher {
    pub fn new(primary: Box<dyn ArticleSource>, secondary: Box<dyn ArticleSource>) -> Self {
        Self { primary, secondary }
    }

    /// Article-body extraction first, paragraph scraping as fallback.
    pub fn from_config(config: &FetchConfig) -> Result<Self, FetchError> {
        let pages = PageClient::new(config)?;
        Ok(Self::new(
            Box::new(ArticleBodySource::new(pages.clone())),
            Box::new(ParagraphSource::new(pages, config.min_paragraph_chars)),
        ))
    }

    pub async fn fetch_primary(&self, url: &str) -> Option<String> {
        attempt(self.primary.as_ref(), url).await
    }

    pub async fn fetch_secondary(&self, url: &str) -> Option<String> {
        attempt(self.secondary.as_ref(), url).await
    }

    /// Returns `None` only when both strategies come back empty.
    pub async fn fetch(&self, url: &str) -> Option<ArticleContent> {
        if let Some(text) = self.fetch_primary(url).await {
            return Some(ArticleContent {
                url: url.to_string(),
                text,
                strategy: self.primary.name().to_string(),
            });
        }
        let text = self.fetch_secondary(url).await?;
        Some(ArticleContent {
            url: url.to_string(),
            text,
            strategy: self.secondary.name().to_string(),
        })
    }
}

/// Run one strategy, mapping errors and blank text to `None`.
async fn attempt(source: &dyn ArticleSource, url: &str) -> Option<String> {
    match source.extract(url).await {
        Ok(text) if !text.trim().is_empty() => {
            tracing::debug!(url, strategy = source.name(), chars = text.len(), "Extracted article text");
            Some(text)
        }
        Ok(_) => {
            tracing::warn!(url, strategy = source.name(), error = %FetchError::Empty, "Extraction yielded no text");
            None
        }
        Err(e) => {
            tracing::warn!(url, strategy = source.name(), error = %e, "Extraction failed");
            None
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
