// ArticleFetcher: where WikipediaPages gets raw HTML from.
//
// WikiClient is the real implementation; StubFetcher in `testing` serves
// canned pages and counts requests.

use std::sync::Arc;

use async_trait::async_trait;
use wiki_client::WikiClient;

use crate::error::Result;

#[async_trait]
pub trait ArticleFetcher: Send + Sync {
    /// Where articles are fetched from, for logging.
    fn base_url(&self) -> &str;

    /// Rendered HTML of `name`, or `None` when the server has no such page.
    async fn article_html(&self, name: &str) -> Result<Option<String>>;
}

#[async_trait]
impl ArticleFetcher for WikiClient {
    fn base_url(&self) -> &str {
        WikiClient::base_url(self)
    }

    async fn article_html(&self, name: &str) -> Result<Option<String>> {
        Ok(WikiClient::article_html(self, name).await?)
    }
}

#[async_trait]
impl<F: ArticleFetcher> ArticleFetcher for Arc<F> {
    fn base_url(&self) -> &str {
        (**self).base_url()
    }

    async fn article_html(&self, name: &str) -> Result<Option<String>> {
        (**self).article_html(name).await
    }
}
