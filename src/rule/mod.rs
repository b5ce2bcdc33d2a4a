//! Crediting rules.
//!
//! A [`Rule`] is a declarative policy document. Its variant selects the
//! allocator: [`Rule::Grouped`] buckets subjects into ordered groups,
//! [`Rule::Tiered`] ranks them into a priority tier and an overflow tier.
//!
//! Every field is optional in a rule document; an absent field takes its
//! documented default. Caps use `0` for "unlimited".
//!
//! # JSON
//!
//! With the `serde` feature, rules load from JSON documents tagged by
//! `type` with camelCase field names:
//!
//! ```
//! # #[cfg(feature = "serde")] {
//! use u_credit::rule::Rule;
//!
//! let rule = Rule::from_json_str(r#"{
//!     "type": "grouped",
//!     "totalCap": 20,
//!     "groups": [
//!         { "name": "core", "subjects": ["Calculus", "Mechanics"], "weight": 2, "cap": 8 },
//!         { "name": "labs", "keywords": ["Lab"], "matchType": "partial", "weight": 1.5 }
//!     ]
//! }"#).unwrap();
//!
//! assert!(matches!(rule, Rule::Grouped(ref g) if g.groups.len() == 2));
//! # }
//! ```

mod grouped;
mod tiered;

use std::collections::HashSet;

pub use grouped::{CombinedLimit, Group, GroupedRule, MatchType};
pub use tiered::{
    CapBoundary, TieredMode, TieredRule, DEFAULT_OTHER_PRIORITY_CAP, DEFAULT_OVERFLOW_WEIGHT,
    DEFAULT_PRIORITY_WEIGHT, STANDARD_PRIORITY_CREDIT_CAP, STANDARD_TOTAL_CAP,
};

use crate::error::{Result, RuleError};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A crediting policy.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "camelCase"))]
pub enum Rule {
    Grouped(GroupedRule),
    Tiered(TieredRule),
}

impl Default for Rule {
    fn default() -> Self {
        Rule::Grouped(GroupedRule::default())
    }
}

impl From<GroupedRule> for Rule {
    fn from(rule: GroupedRule) -> Self {
        Rule::Grouped(rule)
    }
}

impl From<TieredRule> for Rule {
    fn from(rule: TieredRule) -> Self {
        Rule::Tiered(rule)
    }
}

impl Rule {
    /// Parses a rule document.
    #[cfg(feature = "serde")]
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Checks a rule for authoring mistakes.
    ///
    /// Allocation does not require a valid rule: it treats non-positive caps
    /// as unlimited and ignores limits naming unknown groups. This check is
    /// for tools that author rule documents.
    pub fn validate(&self) -> Result<()> {
        match self {
            Rule::Grouped(g) => validate_grouped(g),
            Rule::Tiered(t) => validate_tiered(t),
        }
    }
}

fn check_non_negative(field: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(RuleError::Invalid(format!(
            "{field} must be a non-negative number, got {value}"
        )));
    }
    Ok(())
}

fn validate_grouped(rule: &GroupedRule) -> Result<()> {
    check_non_negative("totalCap", rule.total_cap)?;
    check_non_negative("otherWeight", rule.other_weight)?;

    let mut names = HashSet::new();
    for group in &rule.groups {
        if !names.insert(group.name.as_str()) {
            return Err(RuleError::DuplicateGroup(group.name.clone()));
        }
        check_non_negative(&format!("groups[{}].weight", group.name), group.weight)?;
        check_non_negative(&format!("groups[{}].cap", group.name), group.cap)?;
    }

    for limit in &rule.combined_limits {
        check_non_negative(&format!("combinedLimits[{}].cap", limit.name), limit.cap)?;
        if let Some(unknown) = limit.group_names.iter().find(|g| !names.contains(g.as_str())) {
            return Err(RuleError::UnknownGroup {
                limit: limit.name.clone(),
                group: unknown.clone(),
            });
        }
    }
    Ok(())
}

fn validate_tiered(rule: &TieredRule) -> Result<()> {
    check_non_negative("priorityWeight", rule.priority_weight)?;
    check_non_negative("priorityCreditCap", rule.priority_credit_cap)?;
    check_non_negative("totalCap", rule.total_cap)?;
    check_non_negative("overflowWeight", rule.overflow_weight)?;
    check_non_negative("otherPriorityCap", rule.other_priority_cap)?;
    if rule.overflow_weight > 1.0 {
        return Err(RuleError::Invalid(format!(
            "overflowWeight must not exceed 1, got {}",
            rule.overflow_weight
        )));
    }
    Ok(())
}

/// Slack allowed when comparing accumulated credits against a cap, so that
/// fractional credits summing to the cap still fill it.
pub(crate) const CREDIT_EPSILON: f64 = 1e-9;

/// Returns the cap as a limit, or `None` when it means "unlimited".
pub(crate) fn active_cap(cap: f64) -> Option<f64> {
    (cap.is_finite() && cap > 0.0).then_some(cap)
}

/// Weight actually applied when scoring. Negative or non-finite weights
/// count as 0 so that `score <= max_score` holds.
pub(crate) fn effective_weight(weight: f64) -> f64 {
    weight_or(weight, 0.0)
}

/// Returns `weight` when it is positive and finite, `fallback` otherwise.
pub(crate) fn weight_or(weight: f64, fallback: f64) -> f64 {
    if weight.is_finite() && weight > 0.0 {
        weight
    } else {
        fallback
    }
}
