pub mod engine;
pub mod sampler;
pub mod table;

pub use engine::{BaserunningEngine, PlayTransition};
pub use sampler::{OutcomeDistribution, PrecomputedOutcome, TransitionOutcome};
pub use table::{ProbabilityDeviation, RawOutcome, RawTransitionMap, TransitionTable};
