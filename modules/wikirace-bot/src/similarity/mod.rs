//! Name-to-name similarity in `[0, 1]`.
//!
//! Both names are split into word tokens and every token pair is compared
//! through a [`LexicalOntology`]; the best pair wins. Pairs the ontology
//! cannot resolve contribute nothing. Without a usable ontology the scorer
//! falls back to a normalized edit similarity over the raw names.

pub mod ontology;

use std::sync::Arc;

pub use ontology::{LexicalOntology, Taxonomy};

/// Split an article name into lower-cased word tokens.
///
/// Any non-alphanumeric character separates words, so `Mercury_(planet)`
/// yields `mercury` and `planet`.
pub fn tokenize(name: &str) -> Vec<String> {
    name.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// True when the two names share at least one word.
pub fn keyword_overlap(name1: &str, name2: &str) -> bool {
    let words2 = tokenize(name2);
    tokenize(name1).iter().any(|w| words2.contains(w))
}

/// Edit similarity between the raw names, ignoring case.
pub fn sequence_ratio(name1: &str, name2: &str) -> f64 {
    strsim::normalized_levenshtein(&name1.to_lowercase(), &name2.to_lowercase())
}

#[derive(Clone, Default)]
pub struct SimilarityScorer {
    ontology: Option<Arc<dyn LexicalOntology>>,
}

impl SimilarityScorer {
    pub fn new(ontology: Option<Arc<dyn LexicalOntology>>) -> Self {
        Self { ontology }
    }

    /// Scorer with no ontology; always uses the edit-similarity fallback.
    pub fn sequence_only() -> Self {
        Self { ontology: None }
    }

    pub fn uses_ontology(&self) -> bool {
        self.ontology
            .as_ref()
            .is_some_and(|o| !o.is_degenerate())
    }

    /// Similarity of two names. Pure: identical inputs give identical output.
    pub fn score(&self, name1: &str, name2: &str) -> f64 {
        if name1.to_lowercase() == name2.to_lowercase() {
            return 1.0;
        }

        match self.ontology.as_deref() {
            Some(ontology) if !ontology.is_degenerate() => {
                let words1 = tokenize(name1);
                let words2 = tokenize(name2);
                words1
                    .iter()
                    .flat_map(|w1| words2.iter().map(move |w2| (w1, w2)))
                    .filter_map(|(w1, w2)| ontology.similarity(w1, w2))
                    .fold(0.0, f64::max)
            }
            _ => sequence_ratio(name1, name2),
        }
    }
}

impl std::fmt::Debug for SimilarityScorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimilarityScorer")
            .field("uses_ontology", &self.uses_ontology())
            .finish()
    }
}
