// PageSource: the navigation engine's only view of the link graph.
//
// The engine asks two questions per node: does it exist, and where can I go
// from here. WikipediaPages answers them over HTTP; MockPageSource answers
// them from a HashMap in tests.

use anyhow::Result;
use async_trait::async_trait;

use wikirace_pages::WikipediaPages;

use crate::types::{Candidate, Node};

#[async_trait]
pub trait PageSource: Send + Sync {
    /// True iff `node` is a real document. Soft 404s (missing-article,
    /// disambiguation and redirect pages) are `false`, not errors.
    async fn exists(&self, node: &Node) -> Result<bool>;

    /// Eligible outgoing document links from `node`'s body content.
    async fn links(&self, node: &Node) -> Result<Vec<Candidate>>;
}

#[async_trait]
impl PageSource for WikipediaPages {
    async fn exists(&self, node: &Node) -> Result<bool> {
        Ok(self.exists(node.name()).await?)
    }

    async fn links(&self, node: &Node) -> Result<Vec<Candidate>> {
        let links = self.links(node.name()).await?;
        Ok(links
            .into_iter()
            .filter_map(|link| {
                Node::new(&link.name)
                    .ok()
                    .map(|node| Candidate::new(node, link.href))
            })
            .collect())
    }
}
