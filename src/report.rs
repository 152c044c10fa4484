//! Line-oriented text report for classification runs.
//!
//! The format is stable so reports can be diffed across runs: one header
//! line carrying the rule set description, then one line per operon with
//! `pass` or `fail <rule token>`. It is write-only; nothing in this crate
//! parses it back.

use crate::rules::{EvaluationResult, RuleSet};

pub fn serialize_results(rule_set: &RuleSet, results: &[EvaluationResult]) -> Vec<String> {
    let mut lines = Vec::with_capacity(results.len() + 1);
    lines.push(format!("# {}", rule_set.description()));
    for result in results {
        let status = match result.failing_rule() {
            Some(rule) => format!("fail {rule}"),
            None => "pass".to_owned(),
        };
        lines.push(format!(
            "{},{}..{},{}",
            result.contig(),
            result.start(),
            result.end(),
            status
        ));
    }
    lines
}

pub fn render_report(rule_set: &RuleSet, results: &[EvaluationResult]) -> String {
    serialize_results(rule_set, results).join("\n")
}
