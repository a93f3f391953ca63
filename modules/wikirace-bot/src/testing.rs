// Test double for the PageSource boundary.
//
// MockPageSource is a HashMap graph: name -> outgoing link names. No network,
// no HTML. Builder pattern: `.page()`, `.failing()`, `.default_links()`.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use crate::traits::PageSource;
use crate::types::{Candidate, Node};

/// HashMap-based page source. Only registered pages exist; `links()` on an
/// unregistered page falls back to the default links if any were set and
/// errors otherwise.
#[derive(Default)]
pub struct MockPageSource {
    pages: HashMap<String, Vec<String>>,
    failing: HashSet<String>,
    default_links: Option<Vec<String>>,
    link_requests: AtomicUsize,
}

impl MockPageSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an existing page and its outgoing links.
    pub fn page(mut self, name: &str, links: &[&str]) -> Self {
        self.pages.insert(
            name.to_lowercase(),
            links.iter().map(|l| l.to_string()).collect(),
        );
        self
    }

    /// Every request for this page fails.
    pub fn failing(mut self, name: &str) -> Self {
        self.failing.insert(name.to_lowercase());
        self
    }

    /// Links served for any page that was not registered explicitly.
    pub fn default_links(mut self, links: &[&str]) -> Self {
        self.default_links = Some(links.iter().map(|l| l.to_string()).collect());
        self
    }

    /// Number of `links()` calls served so far.
    pub fn link_requests(&self) -> usize {
        self.link_requests.load(Ordering::SeqCst)
    }

    fn candidates(names: &[String]) -> Result<Vec<Candidate>> {
        names
            .iter()
            .map(|name| Candidate::from_name(name).map_err(Into::into))
            .collect()
    }
}

#[async_trait]
impl PageSource for MockPageSource {
    async fn exists(&self, node: &Node) -> Result<bool> {
        if self.failing.contains(node.key()) {
            return Err(anyhow!("MockPageSource: fetch failed for {node}"));
        }
        Ok(self.pages.contains_key(node.key()))
    }

    async fn links(&self, node: &Node) -> Result<Vec<Candidate>> {
        self.link_requests.fetch_add(1, Ordering::SeqCst);
        if self.failing.contains(node.key()) {
            return Err(anyhow!("MockPageSource: fetch failed for {node}"));
        }
        match self.pages.get(node.key()).or(self.default_links.as_ref()) {
            Some(links) => Self::candidates(links),
            None => Err(anyhow!("MockPageSource: no page registered for {node}")),
        }
    }
}
