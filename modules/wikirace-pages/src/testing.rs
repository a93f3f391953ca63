//! In-memory fetcher for tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use wiki_client::ClientError;

use crate::error::Result;
use crate::fetcher::ArticleFetcher;

/// Serves registered HTML by name. Unregistered names come back as `None`,
/// names marked `failing` as a network error. Every call is counted.
#[derive(Default)]
pub struct StubFetcher {
    pages: HashMap<String, String>,
    failing: HashSet<String>,
    requests: AtomicUsize,
}

impl StubFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, name: &str, html: impl Into<String>) -> Self {
        self.pages.insert(name.to_string(), html.into());
        self
    }

    pub fn failing(mut self, name: &str) -> Self {
        self.failing.insert(name.to_string());
        self
    }

    /// Number of `article_html` calls so far.
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

/// Minimal article page with `body` inside `div#bodyContent`.
pub fn article_page(body: &str) -> String {
    format!(r#"<html><body><div id="bodyContent">{body}</div></body></html>"#)
}

#[async_trait]
impl ArticleFetcher for StubFetcher {
    fn base_url(&self) -> &str {
        "stub://wiki"
    }

    async fn article_html(&self, name: &str) -> Result<Option<String>> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        if self.failing.contains(name) {
            return Err(ClientError::Network(format!("StubFetcher: {name} is unreachable")).into());
        }
        Ok(self.pages.get(name).cloned())
    }
}
