pub mod article;
pub mod error;
pub mod fetcher;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use article::{
    classify, extract_article_links, ArticleLink, ArticleStatus, LinkFilter,
    DEFAULT_MAX_LINK_LENGTH, MISSING_ARTICLE_NOTICE,
};
pub use error::{PagesError, Result};
pub use fetcher::ArticleFetcher;
pub use wiki_client::{ClientError, WikiClient, DEFAULT_BASE_URL, DEFAULT_USER_AGENT};

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::{debug, info, warn};

/// Wikipedia as a link graph: existence checks and outgoing links per article.
///
/// Fetched HTML is kept for the lifetime of the instance, so checking that an
/// article exists and then reading its links costs a single request.
pub struct WikipediaPages {
    fetcher: Box<dyn ArticleFetcher>,
    filter: LinkFilter,
    cache: Mutex<HashMap<String, Option<Arc<String>>>>,
}

impl WikipediaPages {
    pub fn new(fetcher: impl ArticleFetcher + 'static, filter: LinkFilter) -> Self {
        info!(
            base_url = fetcher.base_url(),
            max_link_length = filter.max_link_length,
            "WikipediaPages initialized"
        );
        Self {
            fetcher: Box::new(fetcher),
            filter,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// True iff `name` is a real article (not missing, disambiguation or redirect).
    pub async fn exists(&self, name: &str) -> Result<bool> {
        let Some(html) = self.html(name).await? else {
            return Ok(false);
        };

        let status = classify(&html);
        if !status.exists() {
            info!(name, ?status, "Not an article");
        }
        Ok(status.exists())
    }

    /// Playable outgoing links from the body of `name`.
    pub async fn links(&self, name: &str) -> Result<Vec<ArticleLink>> {
        let html = self
            .html(name)
            .await?
            .ok_or_else(|| PagesError::NotFound(name.to_string()))?;

        let links = extract_article_links(&html, name, &self.filter)
            .ok_or_else(|| PagesError::MissingBody(name.to_string()))?;

        if links.is_empty() {
            warn!(name, "Article body has no playable links");
        } else {
            debug!(name, count = links.len(), "Extracted links");
        }
        Ok(links)
    }

    async fn html(&self, name: &str) -> Result<Option<Arc<String>>> {
        if let Some(cached) = self.cached(name) {
            return Ok(cached);
        }

        let html = self.fetcher.article_html(name).await?.map(Arc::new);
        if let Ok(mut cache) = self.cache.lock() {
            cache.insert(name.to_string(), html.clone());
        }
        Ok(html)
    }

    fn cached(&self, name: &str) -> Option<Option<Arc<String>>> {
        self.cache.lock().ok()?.get(name).cloned()
    }
}
