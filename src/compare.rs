//! Comparing several crediting rules on one transcript.
//!
//! A student typically holds one transcript and several candidate policies
//! (one per major or track). [`Comparison`] runs every rule against the
//! same subjects and ranks the outcomes by normalized score
//! (`score / max_score`).

use tracing::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::allocation::{allocate, AllocationResult};
use crate::rule::Rule;
use crate::subject::Subject;

/// A rule with a display name, e.g. the major it belongs to.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NamedRule {
    pub name: String,
    pub rule: Rule,
}

impl NamedRule {
    pub fn new(name: impl Into<String>, rule: impl Into<Rule>) -> Self {
        Self {
            name: name.into(),
            rule: rule.into(),
        }
    }
}

/// The result of one rule in a comparison.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RuleOutcome {
    pub name: String,
    pub result: AllocationResult,
}

impl RuleOutcome {
    pub fn ratio(&self) -> f64 {
        self.result.ratio()
    }
}

/// Parses a rule catalog: a JSON array of `{ "name": ..., "rule": {...} }`.
#[cfg(feature = "serde")]
pub fn load_catalog_json(json: &str) -> crate::error::Result<Vec<NamedRule>> {
    Ok(serde_json::from_str(json)?)
}

/// Evaluates a set of rules against one transcript.
///
/// # Examples
///
/// ```
/// use u_credit::compare::{Comparison, NamedRule};
/// use u_credit::rule::{Group, GroupedRule, TieredRule};
/// use u_credit::subject::Subject;
///
/// let subjects = vec![Subject::new("Mechanics", 92.0, 2.0), Subject::new("Poetry", 60.0, 2.0)];
/// let comparison = Comparison::new(vec![
///     NamedRule::new("literature", GroupedRule::default().with_group(Group::named("lit", ["Poetry"]))),
///     NamedRule::new("physics", TieredRule::default().with_priority_subjects(["Mechanics"])),
/// ]);
///
/// let best = comparison.best(&subjects).unwrap();
/// assert_eq!(best.name, "physics");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Comparison {
    rules: Vec<NamedRule>,
    parallel: bool,
}

impl Comparison {
    pub fn new(rules: Vec<NamedRule>) -> Self {
        Self {
            rules,
            parallel: false,
        }
    }

    /// Evaluates rules on rayon's thread pool.
    ///
    /// Only takes effect with the `parallel` feature; results are the same
    /// either way.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_rule(mut self, rule: NamedRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn rules(&self) -> &[NamedRule] {
        &self.rules
    }

    /// Allocates under every rule, in declaration order.
    pub fn evaluate(&self, subjects: &[Subject]) -> Vec<RuleOutcome> {
        debug!(
            rules = self.rules.len(),
            subjects = subjects.len(),
            parallel = self.parallel,
            "comparing rules"
        );

        let run = |named: &NamedRule| RuleOutcome {
            name: named.name.clone(),
            result: allocate(subjects, &named.rule),
        };

        #[cfg(feature = "parallel")]
        if self.parallel {
            return self.rules.par_iter().map(run).collect();
        }

        self.rules.iter().map(run).collect()
    }

    /// Outcomes sorted by ratio, highest first. Equal ratios keep
    /// declaration order.
    pub fn rank(&self, subjects: &[Subject]) -> Vec<RuleOutcome> {
        let mut outcomes = self.evaluate(subjects);
        outcomes.sort_by(|a, b| b.ratio().total_cmp(&a.ratio()));
        outcomes
    }

    /// The highest-ratio outcome, or `None` without rules.
    pub fn best(&self, subjects: &[Subject]) -> Option<RuleOutcome> {
        self.rank(subjects).into_iter().next()
    }

    /// Outcomes whose ratio reaches `required_ratio`, in declaration order.
    pub fn meeting(&self, subjects: &[Subject], required_ratio: f64) -> Vec<RuleOutcome> {
        self.evaluate(subjects)
            .into_iter()
            .filter(|o| o.ratio() >= required_ratio)
            .collect()
    }
}
