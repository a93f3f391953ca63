//! Wikipedia game bot: walk from a start article to a target article using
//! only the links visible on each page, within a fixed number of moves.

pub mod config;
pub mod engine;
pub mod error;
pub mod memory;
pub mod observer;
pub mod perturbation;
pub mod selector;
pub mod similarity;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;
pub mod traits;
pub mod types;

pub use config::{AppConfig, NavConfig, OntologySource};
pub use engine::{NavigationEngine, Outcome};
pub use error::{BotError, Result};
pub use memory::VisitedMemory;
pub use observer::{NavObserver, NoopObserver, Observers, TracingObserver, TurnReport};
pub use perturbation::perturb;
pub use selector::{LinkSelector, ScoredCandidate, Selection};
pub use similarity::{LexicalOntology, SimilarityScorer, Taxonomy};
pub use traits::PageSource;
pub use types::{Candidate, Node, Role};
