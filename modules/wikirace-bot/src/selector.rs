//! Greedy one-hop link choice.
//!
//! Every candidate is scored against the target, the score is perturbed, and
//! the best perturbed score wins. An exact name match short-circuits with no
//! noise. With a visited memory, unvisited candidates always beat visited
//! ones; a visited candidate is only returned when nothing else is left.

use rand::Rng;
use tracing::debug;

use crate::error::{BotError, Result};
use crate::memory::VisitedMemory;
use crate::perturbation::perturb;
use crate::similarity::{keyword_overlap, SimilarityScorer};
use crate::types::{Candidate, Node};

/// A candidate with its scores for one selection round.
#[derive(Debug, Clone)]
pub struct ScoredCandidate<'a> {
    pub candidate: &'a Candidate,
    pub raw: f64,
    pub perturbed: f64,
    pub keyword_overlap: bool,
}

/// The outcome of a selection round.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub candidate: Candidate,
    pub raw: f64,
    pub perturbed: f64,
    /// Chosen because its name is the target's name.
    pub exact_match: bool,
    /// Every candidate had been visited already.
    pub revisit: bool,
}

impl Selection {
    pub fn node(&self) -> &Node {
        &self.candidate.node
    }
}

#[derive(Debug, Clone)]
pub struct LinkSelector {
    scorer: SimilarityScorer,
    variance_fraction: f64,
}

impl LinkSelector {
    pub fn new(scorer: SimilarityScorer, variance_fraction: f64) -> Self {
        Self {
            scorer,
            variance_fraction,
        }
    }

    /// Raw and perturbed scores for every candidate, in input order.
    pub fn score_all<'a, R: Rng + ?Sized>(
        &self,
        candidates: &'a [Candidate],
        target: &Node,
        rng: &mut R,
    ) -> Vec<ScoredCandidate<'a>> {
        candidates
            .iter()
            .map(|candidate| {
                let raw = self.scorer.score(candidate.name(), target.name());
                ScoredCandidate {
                    candidate,
                    raw,
                    perturbed: perturb(raw, self.variance_fraction, rng),
                    keyword_overlap: keyword_overlap(candidate.name(), target.name()),
                }
            })
            .collect()
    }

    /// Pick the next node to move to.
    pub fn choose<R: Rng + ?Sized>(
        &self,
        candidates: &[Candidate],
        target: &Node,
        visited: Option<&VisitedMemory>,
        rng: &mut R,
    ) -> Result<Selection> {
        if candidates.is_empty() {
            return Err(BotError::NoCandidates);
        }

        if let Some(hit) = candidates.iter().find(|c| c.node == *target) {
            return Ok(Selection {
                candidate: hit.clone(),
                raw: 1.0,
                perturbed: 1.0,
                exact_match: true,
                revisit: false,
            });
        }

        let scored = self.score_all(candidates, target, rng);

        let unvisited: Vec<&ScoredCandidate> = scored
            .iter()
            .filter(|s| !visited.is_some_and(|m| m.contains(&s.candidate.node)))
            .collect();
        let revisit = unvisited.is_empty();
        let pool: Vec<&ScoredCandidate> = if revisit {
            scored.iter().collect()
        } else {
            unvisited
        };

        let best = pick_best(&pool, rng).ok_or(BotError::NoCandidates)?;
        debug!(
            node = best.candidate.name(),
            raw = best.raw,
            perturbed = best.perturbed,
            pool = pool.len(),
            revisit,
            "Selected candidate"
        );

        Ok(Selection {
            candidate: best.candidate.clone(),
            raw: best.raw,
            perturbed: best.perturbed,
            exact_match: false,
            revisit,
        })
    }
}

/// Running best by perturbed score. Exact ties prefer keyword overlap with
/// the target, then fall to a fair coin flip.
fn pick_best<'p, 'a, R: Rng + ?Sized>(
    pool: &[&'p ScoredCandidate<'a>],
    rng: &mut R,
) -> Option<&'p ScoredCandidate<'a>> {
    let mut best: Option<&ScoredCandidate> = None;
    for &current in pool {
        best = match best {
            None => Some(current),
            Some(leader) if current.perturbed > leader.perturbed => Some(current),
            Some(leader) if current.perturbed == leader.perturbed => {
                if current.keyword_overlap != leader.keyword_overlap {
                    Some(if current.keyword_overlap { current } else { leader })
                } else if rng.random_bool(0.5) {
                    Some(current)
                } else {
                    Some(leader)
                }
            }
            keep => keep,
        };
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn candidates(names: &[&str]) -> Vec<Candidate> {
        names.iter().map(|n| Candidate::from_name(n).unwrap()).collect()
    }

    fn node(name: &str) -> Node {
        Node::new(name).unwrap()
    }

    fn sequence_selector() -> LinkSelector {
        LinkSelector::new(SimilarityScorer::sequence_only(), 0.0)
    }

    #[test]
    fn empty_candidates_is_an_error() {
        let mut rng = StdRng::seed_from_u64(0);
        let err = sequence_selector()
            .choose(&[], &node("Dog"), None, &mut rng)
            .unwrap_err();
        assert!(matches!(err, BotError::NoCandidates));
    }

    #[test]
    fn exact_match_wins_under_any_seed() {
        let links = candidates(&["Cat", "Dog", "Mouse"]);
        let selector = LinkSelector::new(SimilarityScorer::sequence_only(), 0.2);
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let pick = selector.choose(&links, &node("Dog"), None, &mut rng).unwrap();
            assert_eq!(pick.candidate.name(), "Dog");
            assert!(pick.exact_match);
        }
    }

    #[test]
    fn exact_match_ignores_case() {
        let links = candidates(&["Persia", "IRAN"]);
        let mut rng = StdRng::seed_from_u64(3);
        let pick = sequence_selector()
            .choose(&links, &node("iran"), None, &mut rng)
            .unwrap();
        assert_eq!(pick.candidate.name(), "IRAN");
    }

    #[test]
    fn highest_score_wins_without_noise() {
        let links = candidates(&["Zebra", "Persian", "Quartz"]);
        let mut rng = StdRng::seed_from_u64(9);
        let pick = sequence_selector()
            .choose(&links, &node("Persia"), None, &mut rng)
            .unwrap();
        assert_eq!(pick.candidate.name(), "Persian");
        assert!(!pick.exact_match);
    }

    #[test]
    fn visited_candidates_are_passed_over() {
        let links = candidates(&["Persian", "Zebra"]);
        let mut memory = VisitedMemory::new();
        memory.record(&node("Persian"));
        let mut rng = StdRng::seed_from_u64(9);
        let pick = sequence_selector()
            .choose(&links, &node("Persia"), Some(&memory), &mut rng)
            .unwrap();
        assert_eq!(pick.candidate.name(), "Zebra");
        assert!(!pick.revisit);
    }

    #[test]
    fn all_visited_falls_back_to_best_overall() {
        let links = candidates(&["Persian", "Zebra"]);
        let mut memory = VisitedMemory::new();
        memory.record(&node("Persian"));
        memory.record(&node("Zebra"));
        let mut rng = StdRng::seed_from_u64(9);
        let pick = sequence_selector()
            .choose(&links, &node("Persia"), Some(&memory), &mut rng)
            .unwrap();
        assert_eq!(pick.candidate.name(), "Persian");
        assert!(pick.revisit);
    }

    #[test]
    fn ties_prefer_keyword_overlap() {
        // No token resolves in the taxonomy, so both score zero and only the
        // shared word separates them.
        let taxonomy = crate::similarity::Taxonomy::builtin().unwrap();
        let scorer = SimilarityScorer::new(Some(std::sync::Arc::new(taxonomy)));
        let selector = LinkSelector::new(scorer, 0.1);
        let links = candidates(&["Xyzzy_Plugh", "Xyzzy_Frobozz"]);
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let pick = selector
                .choose(&links, &node("Frobozz_Magic"), None, &mut rng)
                .unwrap();
            assert_eq!(pick.candidate.name(), "Xyzzy_Frobozz");
        }
    }

    #[test]
    fn plain_ties_are_broken_both_ways() {
        let taxonomy = crate::similarity::Taxonomy::builtin().unwrap();
        let scorer = SimilarityScorer::new(Some(std::sync::Arc::new(taxonomy)));
        let selector = LinkSelector::new(scorer, 0.1);
        let links = candidates(&["Xyzzy", "Plugh"]);
        let picks: std::collections::HashSet<String> = (0..64)
            .map(|seed| {
                let mut rng = StdRng::seed_from_u64(seed);
                selector
                    .choose(&links, &node("Frobozz"), None, &mut rng)
                    .unwrap()
                    .candidate
                    .name()
                    .to_string()
            })
            .collect();
        assert_eq!(picks.len(), 2, "a fair coin should pick each side for some seed");
    }

    #[test]
    fn same_seed_same_choice() {
        let links = candidates(&["Alpha", "Alps", "Alpaca", "Alto"]);
        let selector = LinkSelector::new(SimilarityScorer::sequence_only(), 0.2);
        let run = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            selector.choose(&links, &node("Alpine"), None, &mut rng).unwrap()
        };
        assert_eq!(run(11), run(11));
    }
}
