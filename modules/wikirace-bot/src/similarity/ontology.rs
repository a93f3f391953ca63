// Lexical ontology: a taxonomy of word senses with a depth-based similarity
// metric between two senses.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::Deserialize;

use crate::error::{BotError, Result};

const BUILTIN_TAXONOMY: &str = include_str!("../../data/taxonomy.json");

/// Similarity between words through their senses.
pub trait LexicalOntology: Send + Sync {
    /// Similarity in `[0, 1]` between the primary senses of two words, or
    /// `None` when either word does not resolve to a sense.
    fn similarity(&self, word1: &str, word2: &str) -> Option<f64>;

    /// True when the ontology cannot resolve anything at all.
    fn is_degenerate(&self) -> bool {
        false
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TaxonomyFile {
    senses: Vec<SenseEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SenseEntry {
    id: String,
    lemmas: Vec<String>,
    #[serde(default)]
    hypernym: Option<String>,
}

/// Single-inheritance sense taxonomy scored with Wu-Palmer similarity.
#[derive(Debug, Default)]
pub struct Taxonomy {
    /// Sense id -> parent sense id.
    hypernyms: HashMap<String, String>,
    /// Lemma -> primary sense id (first sense listing the lemma).
    primary_sense: HashMap<String, String>,
    sense_count: usize,
}

impl Taxonomy {
    pub fn from_json(json: &str) -> Result<Self> {
        let file: TaxonomyFile = serde_json::from_str(json)?;

        let mut taxonomy = Taxonomy::default();
        for sense in file.senses {
            taxonomy.sense_count += 1;
            for lemma in &sense.lemmas {
                taxonomy
                    .primary_sense
                    .entry(lemma.to_lowercase())
                    .or_insert_with(|| sense.id.clone());
            }
            if let Some(parent) = sense.hypernym {
                taxonomy.hypernyms.insert(sense.id, parent);
            }
        }
        Ok(taxonomy)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| BotError::TaxonomyIo {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// The taxonomy shipped with the crate.
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_TAXONOMY)
    }

    pub fn len(&self) -> usize {
        self.sense_count
    }

    pub fn is_empty(&self) -> bool {
        self.sense_count == 0
    }

    /// Primary sense for a word, if any.
    pub fn resolve(&self, word: &str) -> Option<&str> {
        self.primary_sense
            .get(&word.to_lowercase())
            .map(String::as_str)
    }

    /// Path from `sense` up to its root, `sense` first. Stops on a cycle.
    fn root_path<'a>(&'a self, sense: &'a str) -> Vec<&'a str> {
        let mut path = vec![sense];
        let mut seen: HashSet<&str> = HashSet::from([sense]);
        let mut current = sense;
        while let Some(parent) = self.hypernyms.get(current) {
            if !seen.insert(parent.as_str()) {
                break;
            }
            path.push(parent.as_str());
            current = parent.as_str();
        }
        path
    }

    /// Wu-Palmer similarity between two senses: `2 * depth(lcs) / (depth(a) + depth(b))`,
    /// with the root at depth 1. Senses in disjoint trees score 0.
    pub fn wup_similarity(&self, a: &str, b: &str) -> f64 {
        if a == b {
            return 1.0;
        }

        let path_a = self.root_path(a);
        let path_b = self.root_path(b);
        let ancestors_b: HashSet<&str> = path_b.iter().copied().collect();

        // First shared node walking up from `a` is the lowest common subsumer.
        let Some(lcs) = path_a.iter().copied().find(|s| ancestors_b.contains(s)) else {
            return 0.0;
        };

        let depth_a = path_a.len() as f64;
        let depth_b = path_b.len() as f64;
        let depth_lcs = self.root_path(lcs).len() as f64;

        (2.0 * depth_lcs / (depth_a + depth_b)).clamp(0.0, 1.0)
    }
}

impl LexicalOntology for Taxonomy {
    fn similarity(&self, word1: &str, word2: &str) -> Option<f64> {
        let a = self.resolve(word1)?;
        let b = self.resolve(word2)?;
        Some(self.wup_similarity(a, b))
    }

    fn is_degenerate(&self) -> bool {
        self.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL: &str = r#"{
        "senses": [
            {"id": "entity", "lemmas": ["entity"]},
            {"id": "animal", "lemmas": ["animal"], "hypernym": "entity"},
            {"id": "mammal", "lemmas": ["mammal"], "hypernym": "animal"},
            {"id": "dog", "lemmas": ["dog", "hound"], "hypernym": "mammal"},
            {"id": "cat", "lemmas": ["cat"], "hypernym": "mammal"},
            {"id": "fish", "lemmas": ["fish"], "hypernym": "animal"},
            {"id": "hotdog", "lemmas": ["dog"], "hypernym": "food"},
            {"id": "food", "lemmas": ["food"]}
        ]
    }"#;

    fn small() -> Taxonomy {
        Taxonomy::from_json(SMALL).unwrap()
    }

    #[test]
    fn first_sense_is_primary() {
        assert_eq!(small().resolve("Dog"), Some("dog"));
        assert_eq!(small().resolve("hound"), Some("dog"));
        assert_eq!(small().resolve("unicorn"), None);
    }

    #[test]
    fn identical_senses_score_one() {
        assert_eq!(small().similarity("dog", "hound"), Some(1.0));
    }

    #[test]
    fn siblings_score_by_shared_depth() {
        // dog and cat: depth 4 each, lcs mammal at depth 3 -> 6/8.
        let sim = small().similarity("dog", "cat").unwrap();
        assert!((sim - 0.75).abs() < 1e-9, "got {sim}");
    }

    #[test]
    fn closer_relatives_score_higher() {
        let t = small();
        let cat = t.similarity("dog", "cat").unwrap();
        let fish = t.similarity("dog", "fish").unwrap();
        assert!(cat > fish);
    }

    #[test]
    fn disjoint_trees_score_zero() {
        assert_eq!(small().similarity("cat", "food"), Some(0.0));
    }

    #[test]
    fn unknown_words_do_not_resolve() {
        assert_eq!(small().similarity("dog", "zeppelin"), None);
    }

    #[test]
    fn hypernym_cycles_terminate() {
        let json = r#"{"senses": [
            {"id": "a", "lemmas": ["a"], "hypernym": "b"},
            {"id": "b", "lemmas": ["b"], "hypernym": "a"}
        ]}"#;
        let t = Taxonomy::from_json(json).unwrap();
        let sim = t.similarity("a", "b").unwrap();
        assert!((0.0..=1.0).contains(&sim));
    }

    #[test]
    fn empty_taxonomy_is_degenerate() {
        let t = Taxonomy::from_json(r#"{"senses": []}"#).unwrap();
        assert!(t.is_degenerate());
        assert!(!small().is_degenerate());
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            Taxonomy::from_json("{not json"),
            Err(BotError::TaxonomyParse(_))
        ));
    }

    #[test]
    fn builtin_taxonomy_loads() {
        let t = Taxonomy::builtin().unwrap();
        assert!(!t.is_empty());
        assert!(t.resolve("dog").is_some());
        assert!(t.resolve("revolution").is_some());
    }
}
