//! Rule predicates and their composition into an ordered rule set.

use crate::operon::Operon;
use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Normalize an interval so strand encoding does not affect geometry.
#[inline(always)]
fn normalized(interval: (u64, u64)) -> (u64, u64) {
    if interval.0 <= interval.1 {
        interval
    } else {
        (interval.1, interval.0)
    }
}

/// Closest-edge gap in base pairs between two intervals, 0 if they overlap.
fn interval_gap(a: (u64, u64), b: (u64, u64)) -> u64 {
    let (a0, a1) = normalized(a);
    let (b0, b1) = normalized(b);
    if a0 <= b1 && b0 <= a1 {
        return 0;
    }
    b0.saturating_sub(a1).max(a0.saturating_sub(b1))
}

/// One testable condition against an operon's feature list.
///
/// A rule that names genes absent from the operon is vacuously satisfied,
/// except `require`, whose whole point is presence.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Rule {
    Require {
        gene: String,
    },
    Exclude {
        gene: String,
    },
    MaxDistance {
        gene_a: String,
        gene_b: String,
        distance_bp: u64,
    },
    Ordering {
        first: String,
        second: String,
    },
    RequireAnyOf {
        genes: Vec<String>,
    },
    SameOrientation,
}

impl Rule {
    /// Returns true iff the condition holds for `operon`.
    pub fn test(&self, operon: &Operon) -> bool {
        match self {
            Rule::Require { gene } => operon.contains_gene(gene),
            Rule::Exclude { gene } => !operon.contains_gene(gene),
            Rule::MaxDistance {
                gene_a,
                gene_b,
                distance_bp,
            } => {
                // Every pair of matching features must be within range.
                operon.features_named(gene_a).all(|a| {
                    operon
                        .features_named(gene_b)
                        .all(|b| interval_gap(a.interval, b.interval) <= *distance_bp)
                })
            }
            Rule::Ordering { first, second } => operon
                .features_named(first)
                .all(|a| operon.features_named(second).all(|b| a.rank < b.rank)),
            Rule::RequireAnyOf { genes } => genes.iter().any(|gene| operon.contains_gene(gene)),
            Rule::SameOrientation => {
                let mut features = operon.features.iter();
                match features.next() {
                    Some(head) => features.all(|f| f.is_reverse() == head.is_reverse()),
                    None => true,
                }
            }
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Rule::Require { gene } => write!(f, "require:{gene}"),
            Rule::Exclude { gene } => write!(f, "exclude:{gene}"),
            Rule::MaxDistance {
                gene_a,
                gene_b,
                distance_bp,
            } => write!(f, "max_distance:{gene_a},{gene_b},{distance_bp}"),
            Rule::Ordering { first, second } => write!(f, "ordering:{first},{second}"),
            Rule::RequireAnyOf { genes } => write!(f, "require_any_of:{}", genes.join(",")),
            Rule::SameOrientation => write!(f, "same_orientation"),
        }
    }
}

impl FromStr for Rule {
    type Err = anyhow::Error;

    fn from_str(token: &str) -> Result<Self> {
        let (kind, args) = match token.split_once(':') {
            Some((kind, args)) => (kind, args),
            None => (token, ""),
        };
        let args: Vec<&str> = if args.is_empty() {
            vec![]
        } else {
            args.split(',').collect()
        };
        match (kind, args.as_slice()) {
            ("require", [gene]) => Ok(Rule::Require {
                gene: (*gene).to_owned(),
            }),
            ("exclude", [gene]) => Ok(Rule::Exclude {
                gene: (*gene).to_owned(),
            }),
            ("max_distance", [gene_a, gene_b, distance_bp]) => {
                let distance_bp = distance_bp
                    .parse()
                    .map_err(|_| anyhow!("Bad distance in rule token '{token}'"))?;
                Ok(Rule::MaxDistance {
                    gene_a: (*gene_a).to_owned(),
                    gene_b: (*gene_b).to_owned(),
                    distance_bp,
                })
            }
            ("ordering", [first, second]) => Ok(Rule::Ordering {
                first: (*first).to_owned(),
                second: (*second).to_owned(),
            }),
            ("require_any_of", genes) if !genes.is_empty() => Ok(Rule::RequireAnyOf {
                genes: genes.iter().map(|gene| (*gene).to_owned()).collect(),
            }),
            ("same_orientation", []) => Ok(Rule::SameOrientation),
            (
                "require" | "exclude" | "max_distance" | "ordering" | "require_any_of"
                | "same_orientation",
                _,
            ) => Err(anyhow!("Wrong arguments in rule token '{token}'")),
            _ => Err(anyhow!("Unknown rule kind '{kind}'")),
        }
    }
}

/// The verdict for one operon against one rule set.
///
/// Carries the first rule that failed, in declaration order, or nothing
/// when all rules held.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    contig: String,
    start: u64,
    end: u64,
    is_passing: bool,
    failing_rule: Option<Rule>,
}

impl EvaluationResult {
    pub fn pass(operon: &Operon) -> Self {
        EvaluationResult {
            contig: operon.contig.clone(),
            start: operon.start,
            end: operon.end,
            is_passing: true,
            failing_rule: None,
        }
    }

    pub fn fail(operon: &Operon, rule: Rule) -> Self {
        EvaluationResult {
            contig: operon.contig.clone(),
            start: operon.start,
            end: operon.end,
            is_passing: false,
            failing_rule: Some(rule),
        }
    }

    #[inline(always)]
    pub fn contig(&self) -> &str {
        &self.contig
    }

    #[inline(always)]
    pub fn start(&self) -> u64 {
        self.start
    }

    #[inline(always)]
    pub fn end(&self) -> u64 {
        self.end
    }

    #[inline(always)]
    pub fn is_passing(&self) -> bool {
        self.is_passing
    }

    #[inline(always)]
    pub fn failing_rule(&self) -> Option<&Rule> {
        self.failing_rule.as_ref()
    }
}

/// An ordered collection of rules with short-circuit evaluation.
///
/// Rules are appended through the chainable builder methods; declaration
/// order decides which violation gets reported. A rule set handed to
/// `evaluate` is never mutated again.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn require(self, gene: &str) -> Self {
        self.add(Rule::Require {
            gene: gene.to_owned(),
        })
    }

    pub fn exclude(self, gene: &str) -> Self {
        self.add(Rule::Exclude {
            gene: gene.to_owned(),
        })
    }

    pub fn max_distance(self, gene_a: &str, gene_b: &str, distance_bp: u64) -> Self {
        self.add(Rule::MaxDistance {
            gene_a: gene_a.to_owned(),
            gene_b: gene_b.to_owned(),
            distance_bp,
        })
    }

    pub fn ordering(self, first: &str, second: &str) -> Self {
        self.add(Rule::Ordering {
            first: first.to_owned(),
            second: second.to_owned(),
        })
    }

    pub fn require_any_of(self, genes: &[&str]) -> Self {
        self.add(Rule::RequireAnyOf {
            genes: genes.iter().map(|gene| (*gene).to_owned()).collect(),
        })
    }

    pub fn same_orientation(self) -> Self {
        self.add(Rule::SameOrientation)
    }

    /// Build a rule set from textual rule tokens, e.g. from a config file
    /// already read by the caller. Unknown kinds are a hard error.
    pub fn from_tokens<'a, I>(tokens: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut rules = vec![];
        for token in tokens {
            rules.push(token.trim().parse()?);
        }
        Ok(RuleSet { rules })
    }

    #[inline(always)]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Canonical comma-joined token list, in declaration order.
    pub fn description(&self) -> String {
        self.rules
            .iter()
            .map(|rule| rule.to_string())
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Test rules in declaration order and stop at the first violation.
    pub fn evaluate(&self, operon: &Operon) -> EvaluationResult {
        for rule in &self.rules {
            if !rule.test(operon) {
                return EvaluationResult::fail(operon, rule.clone());
            }
        }
        EvaluationResult::pass(operon)
    }
}
