use tracing::info;

use crate::selector::Selection;
use crate::types::{Node, Role};

/// One completed move.
#[derive(Debug, Clone)]
pub struct TurnReport<'a> {
    /// 1-based turn number.
    pub turn: u32,
    pub from: &'a Node,
    pub selection: &'a Selection,
    pub turns_remaining: u32,
}

/// Progress hook for a navigation run.
///
/// Observers only watch; nothing they do feeds back into the run's choices.
pub trait NavObserver: Send + Sync {
    fn on_validated(&self, _role: Role, _node: &Node, _exists: bool) {}

    fn on_move(&self, _turn: &TurnReport<'_>) {}
}

/// Observer that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl NavObserver for NoopObserver {}

/// Observer that logs progress through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl NavObserver for TracingObserver {
    fn on_validated(&self, role: Role, node: &Node, exists: bool) {
        info!(%role, node = node.name(), exists, "Validated node");
    }

    fn on_move(&self, turn: &TurnReport<'_>) {
        info!(
            turn = turn.turn,
            from = turn.from.name(),
            to = turn.selection.node().name(),
            score = turn.selection.raw,
            exact_match = turn.selection.exact_match,
            revisit = turn.selection.revisit,
            turns_remaining = turn.turns_remaining,
            "Moved"
        );
    }
}

/// Forwards every event to each inner observer in order.
#[derive(Default)]
pub struct Observers(Vec<Box<dyn NavObserver>>);

impl Observers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, observer: impl NavObserver + 'static) -> Self {
        self.0.push(Box::new(observer));
        self
    }
}

impl NavObserver for Observers {
    fn on_validated(&self, role: Role, node: &Node, exists: bool) {
        for o in &self.0 {
            o.on_validated(role, node, exists);
        }
    }

    fn on_move(&self, turn: &TurnReport<'_>) {
        for o in &self.0 {
            o.on_move(turn);
        }
    }
}
