//! Grouped allocation.
//!
//! # Algorithm
//!
//! 1. Walk `groups` in declaration order
//! 2. For each group:
//!    a. Collect matching subjects not yet admitted
//!    b. Rank them by grade, descending (stable)
//!    c. Admit each one whose credits fit the group cap, the total cap and
//!       every combined limit spanning the group; skip the rest and keep
//!       going, so smaller subjects can still fill the remaining room
//! 3. Rank leftovers by `grade * other_weight` and admit them into the
//!    "other" bucket while the total cap allows
//! 4. Exclude everything else

use tracing::{debug, trace};

use super::ledger::{fits, sort_desc_by, Ledger, Placement};
use super::result::{AllocationResult, ExclusionReason};
use crate::rule::{active_cap, effective_weight, GroupedRule};
use crate::subject::Subject;

/// Breakdown label for subjects admitted by the fallback pass.
pub const OTHER_LABEL: &str = "other";

/// Allocates subjects under a grouped rule.
///
/// # Examples
///
/// ```
/// use u_credit::allocation::allocate_grouped;
/// use u_credit::rule::{CombinedLimit, Group, GroupedRule};
/// use u_credit::subject::Subject;
///
/// let subjects = vec![
///     Subject::new("Mechanics", 85.0, 2.0),
///     Subject::new("Organic Chemistry", 75.0, 2.0),
/// ];
/// let rule = GroupedRule::default()
///     .with_group(Group::named("phys", ["Mechanics"]))
///     .with_group(Group::named("chem", ["Organic Chemistry"]))
///     .with_combined_limit(CombinedLimit::new("science", ["phys", "chem"], 3.0));
///
/// let result = allocate_grouped(&subjects, &rule);
/// assert!(result.is_included("Mechanics"));
/// assert!(!result.is_included("Organic Chemistry"));
/// ```
pub fn allocate_grouped(subjects: &[Subject], rule: &GroupedRule) -> AllocationResult {
    debug!(
        subjects = subjects.len(),
        groups = rule.groups.len(),
        total_cap = rule.total_cap,
        "grouped allocation start"
    );

    let mut ledger = Ledger::new(subjects);
    let total_cap = active_cap(rule.total_cap);
    let mut limit_usage = vec![0.0; rule.combined_limits.len()];
    // Subjects some group looked at; the rest never matched anything.
    let mut considered = vec![false; subjects.len()];

    for group in &rule.groups {
        let group_cap = active_cap(group.cap);
        let weight = effective_weight(group.weight);
        let limits = rule.limits_for(&group.name);

        let mut candidates: Vec<usize> = (0..subjects.len())
            .filter(|&i| !ledger.is_included(i) && group.matches(&subjects[i].name))
            .collect();
        sort_desc_by(&mut candidates, |i| subjects[i].grade);

        let mut group_credits = 0.0;
        for i in candidates {
            considered[i] = true;
            let credits = subjects[i].credits;

            if !fits(group_credits, credits, group_cap) || !fits(ledger.credits(), credits, total_cap) {
                trace!(subject = %subjects[i].name, group = %group.name, "skipped: cap");
                continue;
            }
            let blocked_by = limits.iter().copied().find(|&l| {
                !fits(limit_usage[l], credits, active_cap(rule.combined_limits[l].cap))
            });
            if let Some(l) = blocked_by {
                trace!(
                    subject = %subjects[i].name,
                    limit = %rule.combined_limits[l].name,
                    "skipped: combined limit"
                );
                continue;
            }

            group_credits += credits;
            for &l in &limits {
                limit_usage[l] += credits;
            }
            ledger.include(i, Placement::new(&group.name, weight));
        }
    }

    let other_weight = effective_weight(rule.other_weight);
    let other_active = other_weight > 0.0;
    if other_active {
        let mut leftovers = ledger.remaining();
        sort_desc_by(&mut leftovers, |i| subjects[i].grade * other_weight);
        for i in leftovers {
            if fits(ledger.credits(), subjects[i].credits, total_cap) {
                ledger.include(i, Placement::new(OTHER_LABEL, other_weight));
            }
        }
    }

    let result = ledger.finish(|i| {
        if considered[i] || other_active {
            ExclusionReason::CapExceeded
        } else {
            ExclusionReason::NoMatchingGroup
        }
    });

    debug!(
        score = result.score,
        max_score = result.max_score,
        credits = result.credits,
        "grouped allocation end"
    );
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::{CombinedLimit, Group, MatchType};

    fn two_subjects() -> Vec<Subject> {
        vec![Subject::new("A", 90.0, 2.0), Subject::new("B", 80.0, 2.0)]
    }

    #[test]
    fn test_no_caps() {
        let rule = GroupedRule::default().with_group(Group::named("g", ["A", "B"]));
        let r = allocate_grouped(&two_subjects(), &rule);

        assert!((r.score - 340.0).abs() < 1e-9);
        assert!((r.max_score - 400.0).abs() < 1e-9);
        assert!((r.credits - 4.0).abs() < 1e-9);
        assert_eq!(r.included().count(), 2);
    }

    #[test]
    fn test_group_cap_truncates_lower_grade() {
        let rule = GroupedRule::default().with_group(Group::named("g", ["A", "B"]).with_cap(2.0));
        let r = allocate_grouped(&two_subjects(), &rule);

        assert!(r.is_included("A"));
        assert_eq!(r.entry("B").unwrap().reason, Some(ExclusionReason::CapExceeded));
        assert!((r.credits - 2.0).abs() < 1e-9);
        assert!((r.score - 180.0).abs() < 1e-9);
    }

    #[test]
    fn test_skip_and_continue() {
        // The 3-credit subject ranks first but does not fit; the smaller
        // one behind it still does.
        let subjects = vec![
            Subject::new("Big", 95.0, 3.0),
            Subject::new("Small", 70.0, 1.0),
        ];
        let rule =
            GroupedRule::default().with_group(Group::named("g", ["Big", "Small"]).with_cap(2.0));
        let r = allocate_grouped(&subjects, &rule);

        assert!(!r.is_included("Big"));
        assert!(r.is_included("Small"));
    }

    #[test]
    fn test_first_group_wins() {
        let subjects = vec![Subject::new("Physics Lab", 80.0, 1.0)];
        let rule = GroupedRule::default()
            .with_group(Group::keywords("labs", ["Lab"], MatchType::Partial).with_weight(2.0))
            .with_group(Group::keywords("phys", ["Physics"], MatchType::Partial));
        let r = allocate_grouped(&subjects, &rule);

        assert_eq!(r.included().count(), 1);
        let c = r.entry("Physics Lab").unwrap().contribution.as_ref().unwrap();
        assert_eq!(c.label, "labs");
        assert!((r.score - 160.0).abs() < 1e-9);
    }

    #[test]
    fn test_catch_all_takes_rest() {
        let subjects = vec![
            Subject::new("A", 90.0, 2.0),
            Subject::new("B", 80.0, 2.0),
            Subject::new("C", 70.0, 2.0),
        ];
        let rule = GroupedRule::default()
            .with_group(Group::named("core", ["A"]).with_weight(2.0))
            .with_group(Group::catch_all("rest").with_weight(0.5).with_cap(2.0));
        let r = allocate_grouped(&subjects, &rule);

        assert!(r.is_included("A"));
        assert!(r.is_included("B"));
        assert!(!r.is_included("C"));
        assert!((r.score - (90.0 * 2.0 * 2.0 + 80.0 * 2.0 * 0.5)).abs() < 1e-9);
    }

    #[test]
    fn test_combined_limit() {
        let subjects = vec![
            Subject::new("P", 90.0, 2.0),
            Subject::new("Q", 85.0, 1.0),
            Subject::new("R", 80.0, 1.0),
        ];
        let rule = GroupedRule::default()
            .with_group(Group::named("G1", ["P"]))
            .with_group(Group::named("G2", ["Q", "R"]))
            .with_combined_limit(CombinedLimit::new("G1+G2", ["G1", "G2"], 3.0));
        let r = allocate_grouped(&subjects, &rule);

        assert!((r.credits - 3.0).abs() < 1e-9);
        assert!(r.is_included("P"));
        assert!(r.is_included("Q"));
        assert!(!r.is_included("R"));
    }

    #[test]
    fn test_total_cap_spans_other_pass() {
        let subjects = vec![
            Subject::new("A", 90.0, 2.0),
            Subject::new("X", 60.0, 2.0),
            Subject::new("Y", 70.0, 2.0),
        ];
        let rule = GroupedRule::default()
            .with_group(Group::named("g", ["A"]))
            .with_other_weight(0.5)
            .with_total_cap(4.0);
        let r = allocate_grouped(&subjects, &rule);

        assert!(r.is_included("Y"));
        assert!(!r.is_included("X"));
        assert_eq!(
            r.entry("Y").unwrap().contribution.as_ref().unwrap().label,
            OTHER_LABEL
        );
        assert!((r.credits - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_unmatched_reason_without_other_pass() {
        let subjects = vec![Subject::new("A", 90.0, 2.0), Subject::new("Z", 50.0, 1.0)];
        let rule = GroupedRule::default().with_group(Group::named("g", ["A"]));
        let r = allocate_grouped(&subjects, &rule);

        assert_eq!(r.entry("Z").unwrap().reason, Some(ExclusionReason::NoMatchingGroup));
    }

    #[test]
    fn test_empty_rule_excludes_everything() {
        let r = allocate_grouped(&two_subjects(), &GroupedRule::default());
        assert_eq!(r.score, 0.0);
        assert_eq!(r.credits, 0.0);
        assert_eq!(r.excluded().count(), 2);
    }

    #[test]
    fn test_equal_grades_keep_input_order() {
        let subjects = vec![
            Subject::new("First", 80.0, 2.0),
            Subject::new("Second", 80.0, 2.0),
        ];
        let rule = GroupedRule::default()
            .with_group(Group::named("g", ["Second", "First"]).with_cap(2.0));
        let r = allocate_grouped(&subjects, &rule);

        assert!(r.is_included("First"));
        assert!(!r.is_included("Second"));
    }
}
