use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::{BotError, Result};

/// A document in the link graph, identified by its article name.
///
/// Names compare case-insensitively: `Iran` and `IRAN` are the same node.
#[derive(Debug, Clone)]
pub struct Node {
    name: String,
    key: String,
}

impl Node {
    /// Build a node from a user- or page-supplied name. Surrounding whitespace
    /// is trimmed and inner spaces become underscores, matching article URLs.
    pub fn new(name: &str) -> Result<Self> {
        let name = name.split_whitespace().collect::<Vec<_>>().join("_");
        if name.is_empty() {
            return Err(BotError::EmptyNodeName);
        }
        let key = name.to_lowercase();
        Ok(Self { name, key })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Lower-cased comparison key.
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Node {}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A node reachable from the current one through a single outgoing link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub node: Node,
    /// The link reference as it appeared on the page.
    pub href: String,
}

impl Candidate {
    pub fn new(node: Node, href: impl Into<String>) -> Self {
        Self {
            node,
            href: href.into(),
        }
    }

    /// Candidate for a bare article name, with the conventional `/wiki/` href.
    pub fn from_name(name: &str) -> Result<Self> {
        let node = Node::new(name)?;
        let href = format!("/wiki/{}", node.name());
        Ok(Self { node, href })
    }

    pub fn name(&self) -> &str {
        self.node.name()
    }
}

/// Which end of the run a node was supplied for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Start,
    Target,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Start => f.write_str("start"),
            Role::Target => f.write_str("target"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn names_compare_case_insensitively() {
        assert_eq!(Node::new("Iran").unwrap(), Node::new("IRAN").unwrap());
        assert_ne!(Node::new("Iran").unwrap(), Node::new("Iraq").unwrap());
    }

    #[test]
    fn hashing_follows_equality() {
        let mut set = HashSet::new();
        set.insert(Node::new("Dog").unwrap());
        assert!(set.contains(&Node::new("dog").unwrap()));
    }

    #[test]
    fn spaces_become_underscores() {
        let node = Node::new("  Iranian   Revolution ").unwrap();
        assert_eq!(node.name(), "Iranian_Revolution");
    }

    #[test]
    fn original_casing_is_kept_for_display() {
        let node = Node::new("Tehran").unwrap();
        assert_eq!(node.to_string(), "Tehran");
        assert_eq!(node.key(), "tehran");
    }

    #[test]
    fn empty_names_are_rejected() {
        assert!(matches!(Node::new(""), Err(BotError::EmptyNodeName)));
        assert!(matches!(Node::new("   "), Err(BotError::EmptyNodeName)));
    }

    #[test]
    fn candidate_from_name_builds_wiki_href() {
        let c = Candidate::from_name("Persia").unwrap();
        assert_eq!(c.href, "/wiki/Persia");
        assert_eq!(c.name(), "Persia");
    }
}
