//! LinkSelector behaviour: exact-match short circuit, semantic ranking with
//! the builtin taxonomy, the visited-memory bias, and default-config scoring.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;

use wikirace_bot::{
    AppConfig, Candidate, LinkSelector, Node, SimilarityScorer, Taxonomy, VisitedMemory,
};

fn selector(variance: f64) -> LinkSelector {
    let taxonomy = Taxonomy::builtin().expect("builtin taxonomy parses");
    LinkSelector::new(SimilarityScorer::new(Some(Arc::new(taxonomy))), variance)
}

fn candidates(names: &[&str]) -> Vec<Candidate> {
    names.iter().map(|n| Candidate::from_name(n).unwrap()).collect()
}

fn node(name: &str) -> Node {
    Node::new(name).unwrap()
}

#[test]
fn target_among_candidates_is_always_chosen() {
    let links = candidates(&["Cat", "Dog", "Mouse"]);
    let selector = selector(0.2);
    for seed in 0..100 {
        let mut rng = StdRng::seed_from_u64(seed);
        let pick = selector.choose(&links, &node("Dog"), None, &mut rng).unwrap();
        assert_eq!(pick.node(), &node("Dog"), "seed {seed}");
    }
}

#[test]
fn semantically_closest_candidate_wins() {
    // Wolf shares the canine branch with Dog; a computer is an artifact.
    let links = candidates(&["Computer", "Wolf", "Tehran"]);
    let mut rng = StdRng::seed_from_u64(0);
    let pick = selector(0.0)
        .choose(&links, &node("Dog"), None, &mut rng)
        .unwrap();
    assert_eq!(pick.candidate.name(), "Wolf");
    assert!(pick.raw > 0.8);
}

#[test]
fn multi_word_titles_match_on_their_best_word() {
    let links = candidates(&["Battle_of_Hastings", "Iranian_Revolution_of_1979", "Blue_Whale"]);
    let mut rng = StdRng::seed_from_u64(0);
    let pick = selector(0.0)
        .choose(&links, &node("French_Revolution"), None, &mut rng)
        .unwrap();
    assert_eq!(pick.candidate.name(), "Iranian_Revolution_of_1979");
}

#[test]
fn visited_favourite_loses_to_unvisited_alternative() {
    let links = candidates(&["Wolf", "Computer"]);
    let mut memory = VisitedMemory::new();
    memory.record(&node("Wolf"));

    for seed in 0..20 {
        let mut rng = StdRng::seed_from_u64(seed);
        let pick = selector(0.1)
            .choose(&links, &node("Dog"), Some(&memory), &mut rng)
            .unwrap();
        assert_eq!(pick.candidate.name(), "Computer", "seed {seed}");
    }
}

#[test]
fn scores_are_reported_for_every_candidate() {
    let links = candidates(&["Wolf", "Computer", "Xyzzy"]);
    let mut rng = StdRng::seed_from_u64(0);
    let scored = selector(0.1).score_all(&links, &node("Dog"), &mut rng);

    assert_eq!(scored.len(), 3);
    assert!(scored[0].raw > scored[1].raw);
    assert_eq!(scored[2].raw, 0.0);
    assert_eq!(scored[2].perturbed, 0.0);
    for s in &scored {
        let margin = 0.1 * s.raw;
        assert!((s.perturbed - s.raw).abs() <= margin + 1e-12);
    }
}

#[test]
fn default_config_ranks_real_article_titles() {
    let config = AppConfig::default();
    let scorer = SimilarityScorer::new(config.taxonomy.load().unwrap());
    let selector = LinkSelector::new(scorer, 0.0);
    let links = candidates(&[
        "Germany",
        "World_War_II",
        "Adolf_Hitler",
        "Berlin",
        "Europe",
        "Nazi_Party",
        "Weimar_Republic",
        "Chancellor_of_Germany",
    ]);

    let mut rng = StdRng::seed_from_u64(0);
    let scored = selector.score_all(&links, &node("Albert_Einstein"), &mut rng);

    let berlin = scored
        .iter()
        .find(|s| s.candidate.name() == "Berlin")
        .unwrap();
    assert!(berlin.raw > 0.25);
    assert!(scored.iter().any(|s| s.raw != berlin.raw));
}
