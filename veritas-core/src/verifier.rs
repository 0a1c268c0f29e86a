//! Verification router. Picks one strategy per request and turns collaborator
//! output into a `Verdict`.
//!
//! Text input: short claims (fewer than `short_claim_tokens` tokens) are checked
//! against web search snippets; longer text goes to the classifier.
//! URL input: the article is extracted and always classified.

use std::sync::Arc;

use crate::classifier::{self, BackendConfig, TextClassifier};
use crate::config::{RoutingConfig, VeritasConfig};
use crate::error::{VeritasError, VerifyError};
use crate::fetcher::ArticleFetcher;
use crate::models::{Claim, UrlReport, Verdict};
use crate::search::{EvidenceSearch, SerpApiConfig, SerpApiSearch};

pub struct VerificationRouter {
    classifier: Arc<dyn TextClassifier>,
    search: Arc<dyn EvidenceSearch>,
    fetcher: Arc<ArticleFetcher>,
    routing: RoutingConfig,
}

impl VerificationRouter {
    pub fn new(
        classifier: Arc<dyn TextClassifier>,
        search: Arc<dyn EvidenceSearch>,
        fetcher: Arc<ArticleFetcher>,
        routing: RoutingConfig,
    ) -> Self {
        Self {
            classifier,
            search,
            fetcher,
            routing,
        }
    }

    /// Build the production router: load classifier artifacts, set up the
    /// SerpApi client and the two-strategy article fetcher.
    ///
    /// Fails if either classifier artifact cannot be loaded.
    pub fn from_config(config: &VeritasConfig) -> Result<Self, VeritasError> {
        let backend = BackendConfig::from_config(&config.classifier)?;
        let classifier: Arc<dyn TextClassifier> = Arc::from(classifier::create_backend(backend)?);
        tracing::info!(
            backend = classifier.name(),
            features = classifier.n_features(),
            "Classifier loaded"
        );

        let search = SerpApiSearch::new(SerpApiConfig::from_config(&config.search))?;
        let fetcher = ArticleFetcher::from_config(&config.fetch)?;

        Ok(Self::new(
            classifier,
            Arc::new(search),
            Arc::new(fetcher),
            config.routing.clone(),
        ))
    }

    pub fn classifier(&self) -> &dyn TextClassifier {
        self.classifier.as_ref()
    }

    pub fn search(&self) -> &dyn EvidenceSearch {
        self.search.as_ref()
    }

    pub async fn verify_text(&self, claim: &Claim) -> Result<Verdict, VerifyError> {
        if claim.is_empty() {
            tracing::debug!("Empty text submission");
            return Ok(Verdict::empty_input());
        }

        let words = claim.word_count();
        if words < self.routing.short_claim_tokens {
            tracing::info!(words, provider = self.search.name(), "Short claim, checking web search");
            Ok(self.check_with_search(claim).await)
        } else {
            tracing::info!(words, backend = self.classifier.name(), "Long text, classifying");
            self.classify(claim.trimmed()).await
        }
    }

    pub async fn verify_url(&self, url: &str) -> Result<UrlReport, VerifyError> {
        let url = url.trim();
        if url.is_empty() {
            tracing::debug!("Empty URL submission");
            return Ok(UrlReport {
                url: String::new(),
                verdict: Verdict::empty_input(),
                preview: None,
            });
        }

        let Some(article) = self.fetcher.fetch(url).await else {
            tracing::info!(url, "Both extraction strategies failed");
            return Ok(UrlReport {
                url: url.to_string(),
                verdict: Verdict::extraction_failed(),
                preview: None,
            });
        };

        tracing::info!(
            url,
            strategy = %article.strategy,
            chars = article.text.chars().count(),
            "Article extracted, classifying"
        );
        let verdict = self.classify(&article.text).await?;
        Ok(UrlReport {
            url: article.url.clone(),
            verdict,
            preview: Some(article.preview(self.routing.preview_chars)),
        })
    }

    async fn check_with_search(&self, claim: &Claim) -> Verdict {
        let evidence = self.search.search(claim.trimmed()).await;
        if evidence.is_empty() {
            return Verdict::search_unavailable();
        }
        let supported = evidence.supports(claim.tokens());
        tracing::debug!(snippets = evidence.len(), supported, "Evidence evaluated");
        Verdict::from_evidence(evidence, supported)
    }

    async fn classify(&self, text: &str) -> Result<Verdict, VerifyError> {
        let result = self.classifier.classify(text).await.map_err(|e| {
            tracing::error!(backend = self.classifier.name(), error = %e, "Classifier failed");
            e
        })?;
        Ok(Verdict::from_classification(result))
    }
}

// ============================================================================
// TESTS
// ============================================================================
