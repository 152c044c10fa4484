//! Batch classification of many operons against one rule set.
//!
//! Operons are independent and a built rule set is read-only, so the
//! per-operon work is spread across the rayon pool. Output order follows
//! input order.

use crate::operon::Operon;
use crate::report;
use crate::rules::{EvaluationResult, RuleSet};
use rayon::prelude::*;

pub fn evaluate_operons(rule_set: &RuleSet, operons: &[Operon]) -> Vec<EvaluationResult> {
    operons
        .par_iter()
        .map(|operon| rule_set.evaluate(operon))
        .collect()
}

/// Evaluate all operons and render the text report.
pub fn analyze(rule_set: &RuleSet, operons: &[Operon]) -> String {
    let results = evaluate_operons(rule_set, operons);
    let passing = results.iter().filter(|result| result.is_passing()).count();
    tracing::debug!(
        total = results.len(),
        passing,
        "operon classification finished"
    );
    report::render_report(rule_set, &results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operon::Feature;

    fn operon(contig: &str, gene: &str) -> Operon {
        let feature = Feature::new(
            gene,
            (100, 700),
            "lcl|100|700|1|1",
            0,
            "ATG",
            1e-20,
            "a good gene",
            "M",
        );
        Operon::new(contig, 0, 1000, vec![feature])
    }

    #[test]
    fn test_batch_matches_sequential_evaluation() {
        let rs = RuleSet::new().require("cas1");
        let operons = vec![
            operon("AAA", "cas1"),
            operon("BBB", "cas2"),
            operon("CCC", "cas1"),
        ];
        let batch = evaluate_operons(&rs, &operons);
        let sequential: Vec<_> = operons.iter().map(|o| rs.evaluate(o)).collect();
        assert_eq!(batch, sequential);
    }

    #[test]
    fn test_batch_preserves_input_order() {
        let rs = RuleSet::new().require("cas1");
        let operons: Vec<_> = (0..64)
            .map(|i| operon(&format!("contig{i}"), "cas1"))
            .collect();
        let results = evaluate_operons(&rs, &operons);
        let contigs: Vec<_> = results.iter().map(|r| r.contig().to_owned()).collect();
        let expected: Vec<_> = (0..64).map(|i| format!("contig{i}")).collect();
        assert_eq!(contigs, expected);
    }

    #[test]
    fn test_analyze_renders_full_report() {
        let rs = RuleSet::new().require("cas1");
        let operons = vec![operon("AAA", "cas1"), operon("BBB", "cas2")];
        let report = analyze(&rs, &operons);
        assert_eq!(
            report,
            "# require:cas1\nAAA,0..1000,pass\nBBB,0..1000,fail require:cas1"
        );
    }
}
