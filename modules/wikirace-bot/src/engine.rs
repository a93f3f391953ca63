//! The turn loop.
//!
//! A run validates both ends, then repeatedly fetches the current node's
//! links, lets the [`LinkSelector`] pick one, and moves. It ends in exactly
//! one way: the target is reached, the turn budget runs out (or the walk
//! strands on a node with no links), or a validation/fetch step fails.

use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn};

use crate::config::NavConfig;
use crate::memory::VisitedMemory;
use crate::observer::{NavObserver, NoopObserver, TurnReport};
use crate::selector::LinkSelector;
use crate::similarity::SimilarityScorer;
use crate::traits::PageSource;
use crate::types::{Node, Role};

/// How a run ended.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Won {
        moves: u32,
        elapsed: Duration,
        turns_remaining: u32,
        path: Vec<Node>,
    },
    LostTurnsExhausted {
        moves: u32,
        elapsed: Duration,
        turns_remaining: u32,
        path: Vec<Node>,
        /// Set when the walk ended early on a node with no eligible links.
        stranded_at: Option<Node>,
    },
    ValidationFailed {
        which: Role,
        node: Node,
        reason: String,
    },
    FetchFailed {
        node: Node,
        reason: String,
    },
}

impl Outcome {
    pub fn is_win(&self) -> bool {
        matches!(self, Outcome::Won { .. })
    }

    /// Moves made, for outcomes where a walk happened.
    pub fn moves(&self) -> Option<u32> {
        match self {
            Outcome::Won { moves, .. } | Outcome::LostTurnsExhausted { moves, .. } => Some(*moves),
            _ => None,
        }
    }

    /// Validation and fetch failures; a lost game is not an error.
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Outcome::ValidationFailed { .. } | Outcome::FetchFailed { .. }
        )
    }
}

/// Mutable state of one run. Lives only inside [`NavigationEngine::run`].
struct GameState {
    current: Node,
    turns_remaining: u32,
    visited: Option<VisitedMemory>,
    moves: u32,
    started: Instant,
    path: Vec<Node>,
}

impl GameState {
    fn new(start: &Node, turn_budget: u32, memory_enabled: bool) -> Self {
        Self {
            current: start.clone(),
            turns_remaining: turn_budget,
            visited: memory_enabled.then(VisitedMemory::new),
            moves: 0,
            started: Instant::now(),
            path: vec![start.clone()],
        }
    }

    fn won(self) -> Outcome {
        Outcome::Won {
            moves: self.moves,
            elapsed: self.started.elapsed(),
            turns_remaining: self.turns_remaining,
            path: self.path,
        }
    }

    fn lost(self, stranded_at: Option<Node>) -> Outcome {
        Outcome::LostTurnsExhausted {
            moves: self.moves,
            elapsed: self.started.elapsed(),
            turns_remaining: self.turns_remaining,
            path: self.path,
            stranded_at,
        }
    }
}

pub struct NavigationEngine<'a> {
    source: &'a dyn PageSource,
    selector: LinkSelector,
    memory_enabled: bool,
    observer: Box<dyn NavObserver>,
    rng: StdRng,
}

impl<'a> NavigationEngine<'a> {
    pub fn new(source: &'a dyn PageSource, scorer: SimilarityScorer, config: &NavConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            source,
            selector: LinkSelector::new(scorer, config.variance_fraction),
            memory_enabled: config.memory_enabled,
            observer: Box::new(NoopObserver),
            rng,
        }
    }

    pub fn with_observer(mut self, observer: impl NavObserver + 'static) -> Self {
        self.observer = Box::new(observer);
        self
    }

    /// Walk from `start` toward `target` in at most `turn_budget` moves.
    pub async fn run(&mut self, start: &Node, target: &Node, turn_budget: u32) -> Outcome {
        for (role, node) in [(Role::Start, start), (Role::Target, target)] {
            match self.source.exists(node).await {
                Ok(true) => self.observer.on_validated(role, node, true),
                Ok(false) => {
                    self.observer.on_validated(role, node, false);
                    warn!(%role, node = node.name(), "Node does not exist");
                    return Outcome::ValidationFailed {
                        which: role,
                        node: node.clone(),
                        reason: format!("'{node}' does not exist"),
                    };
                }
                Err(e) => {
                    warn!(%role, node = node.name(), error = %e, "Existence check failed");
                    return Outcome::FetchFailed {
                        node: node.clone(),
                        reason: format!("{e:#}"),
                    };
                }
            }
        }

        info!(
            start = start.name(),
            target = target.name(),
            turn_budget,
            memory = self.memory_enabled,
            "Run started"
        );

        let mut state = GameState::new(start, turn_budget, self.memory_enabled);

        while state.current != *target && state.turns_remaining > 0 {
            if let Some(memory) = state.visited.as_mut() {
                memory.record(&state.current);
            }

            let candidates = match self.source.links(&state.current).await {
                Ok(candidates) => candidates,
                Err(e) => {
                    warn!(node = state.current.name(), error = %e, "Link fetch failed");
                    return Outcome::FetchFailed {
                        node: state.current.clone(),
                        reason: format!("{e:#}"),
                    };
                }
            };

            if candidates.is_empty() {
                warn!(node = state.current.name(), "No eligible links, run stranded");
                let stranded = state.current.clone();
                return state.lost(Some(stranded));
            }

            let selection = match self.selector.choose(
                &candidates,
                target,
                state.visited.as_ref(),
                &mut self.rng,
            ) {
                Ok(selection) => selection,
                Err(e) => {
                    warn!(node = state.current.name(), error = %e, "Selection failed");
                    let stranded = state.current.clone();
                    return state.lost(Some(stranded));
                }
            };

            let from = std::mem::replace(&mut state.current, selection.node().clone());
            state.moves += 1;
            state.turns_remaining -= 1;
            state.path.push(state.current.clone());

            self.observer.on_move(&TurnReport {
                turn: state.moves,
                from: &from,
                selection: &selection,
                turns_remaining: state.turns_remaining,
            });
        }

        let outcome = if state.current == *target {
            state.won()
        } else {
            state.lost(None)
        };
        info!(
            won = outcome.is_win(),
            moves = outcome.moves().unwrap_or_default(),
            "Run finished"
        );
        outcome
    }
}
