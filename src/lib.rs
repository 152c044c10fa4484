pub mod analyze;
pub mod operon;
pub mod report;
pub mod rules;

pub use operon::{Feature, Operon};
pub use rules::{EvaluationResult, Rule, RuleSet};
