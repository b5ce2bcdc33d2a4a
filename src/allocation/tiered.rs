//! Tiered allocation.
//!
//! # Algorithm (two-pass)
//!
//! 1. Classify subjects: tier-1 (priority, weighted `priority_weight`) or
//!    tier-other
//! 2. Promote the top-graded tier-other subjects, up to
//!    `other_priority_cap` credits, into the priority pool at weight 1.0
//! 3. Rank the pool by `grade * weight` and admit while the priority cap and
//!    the total cap allow
//! 4. Rank everything left by `grade * weight * overflow_weight` and admit
//!    at the overflow rate while the total cap allows
//! 5. Exclude everything else
//!
//! The single-pass mode ranks all subjects once and lowers the multiplier
//! to `overflow_weight` from the first subject that no longer fits under
//! the priority cap onward.

use tracing::{debug, trace};

use super::ledger::{fits, sort_desc_by, Ledger, Placement};
use super::result::{AllocationResult, ExclusionReason};
use crate::rule::{
    active_cap, weight_or, TieredMode, TieredRule, DEFAULT_OVERFLOW_WEIGHT,
    DEFAULT_PRIORITY_WEIGHT,
};
use crate::subject::Subject;

/// Breakdown label for tier-1 subjects.
pub const PRIORITY_LABEL: &str = "priority";
/// Breakdown label for promoted tier-other subjects.
pub const PROMOTED_LABEL: &str = "promoted";
/// Breakdown label for tier-other subjects admitted at full rate in
/// single-pass mode.
pub const STANDARD_LABEL: &str = "standard";
/// Breakdown label for reduced-rate admissions.
pub const OVERFLOW_LABEL: &str = "overflow";

/// Per-subject derived values; inputs stay untouched.
#[derive(Debug, Clone, Copy)]
struct Working {
    weight: f64,
    tier_one: bool,
}

/// Allocates subjects under a tiered rule.
///
/// # Examples
///
/// ```
/// use u_credit::allocation::allocate_tiered;
/// use u_credit::rule::TieredRule;
/// use u_credit::subject::Subject;
///
/// let subjects = vec![Subject::new("C", 70.0, 2.0), Subject::new("D", 60.0, 2.0)];
/// let rule = TieredRule::default().with_other_priority_cap(2.0);
///
/// let result = allocate_tiered(&subjects, &rule);
/// assert!((result.score - (140.0 + 12.0)).abs() < 1e-9);
/// ```
pub fn allocate_tiered(subjects: &[Subject], rule: &TieredRule) -> AllocationResult {
    debug!(
        subjects = subjects.len(),
        mode = ?rule.mode,
        priority_cap = rule.priority_credit_cap,
        total_cap = rule.total_cap,
        "tiered allocation start"
    );

    let priority_weight = weight_or(rule.priority_weight, DEFAULT_PRIORITY_WEIGHT);
    let working: Vec<Working> = subjects
        .iter()
        .map(|s| {
            let tier_one = rule.is_priority(&s.name);
            Working {
                weight: if tier_one { priority_weight } else { 1.0 },
                tier_one,
            }
        })
        .collect();

    let result = match rule.mode {
        TieredMode::TwoPass => two_pass(subjects, &working, rule),
        TieredMode::SinglePass => single_pass(subjects, &working, rule),
    };

    debug!(
        score = result.score,
        max_score = result.max_score,
        credits = result.credits,
        "tiered allocation end"
    );
    result
}

fn two_pass(subjects: &[Subject], working: &[Working], rule: &TieredRule) -> AllocationResult {
    let mut ledger = Ledger::new(subjects);
    let total_cap = active_cap(rule.total_cap);
    let overflow_weight = weight_or(rule.overflow_weight, DEFAULT_OVERFLOW_WEIGHT);

    let (mut pool, mut others): (Vec<usize>, Vec<usize>) =
        (0..subjects.len()).partition(|&i| working[i].tier_one);

    // Promotion: top grades first, skipping any subject that would overrun
    // the promotion budget.
    sort_desc_by(&mut others, |i| subjects[i].grade);
    let promotion_cap = active_cap(rule.other_priority_cap);
    let mut promoted_credits = 0.0;
    for i in others {
        if fits(promoted_credits, subjects[i].credits, promotion_cap) {
            promoted_credits += subjects[i].credits;
            pool.push(i);
        }
    }

    // Tier-1 subjects precede promoted ones on equal efficiency.
    sort_desc_by(&mut pool, |i| subjects[i].grade * working[i].weight);
    let priority_cap = active_cap(rule.priority_credit_cap);
    let mut priority_credits = 0.0;
    for i in pool {
        let credits = subjects[i].credits;
        let under_priority = priority_cap
            .map_or(true, |cap| rule.cap_boundary.admits(priority_credits, credits, cap));
        if !under_priority || !fits(ledger.credits(), credits, total_cap) {
            trace!(subject = %subjects[i].name, "priority pass: skipped");
            continue;
        }
        priority_credits += credits;
        let label = if working[i].tier_one {
            PRIORITY_LABEL
        } else {
            PROMOTED_LABEL
        };
        ledger.include(i, Placement::new(label, working[i].weight));
    }

    let mut rest = ledger.remaining();
    sort_desc_by(&mut rest, |i| {
        subjects[i].grade * working[i].weight * overflow_weight
    });
    for i in rest {
        if fits(ledger.credits(), subjects[i].credits, total_cap) {
            ledger.include(
                i,
                Placement::new(OVERFLOW_LABEL, working[i].weight)
                    .with_multiplier(overflow_weight),
            );
        }
    }

    ledger.finish(|_| ExclusionReason::CapExceeded)
}

fn single_pass(subjects: &[Subject], working: &[Working], rule: &TieredRule) -> AllocationResult {
    let mut ledger = Ledger::new(subjects);
    let total_cap = active_cap(rule.total_cap);
    let priority_cap = active_cap(rule.priority_credit_cap);
    let overflow_weight = weight_or(rule.overflow_weight, DEFAULT_OVERFLOW_WEIGHT);

    let mut order: Vec<usize> = (0..subjects.len()).collect();
    sort_desc_by(&mut order, |i| subjects[i].grade * working[i].weight);

    let mut priority_credits = 0.0;
    let mut overflowing = false;
    for i in order {
        let credits = subjects[i].credits;
        if !fits(ledger.credits(), credits, total_cap) {
            continue;
        }

        if !overflowing {
            overflowing = priority_cap
                .is_some_and(|cap| !rule.cap_boundary.admits(priority_credits, credits, cap));
            if overflowing {
                trace!(subject = %subjects[i].name, priority_credits, "switching to overflow rate");
            }
        }

        if overflowing {
            ledger.include(
                i,
                Placement::new(OVERFLOW_LABEL, working[i].weight)
                    .with_multiplier(overflow_weight),
            );
        } else {
            priority_credits += credits;
            let label = if working[i].tier_one {
                PRIORITY_LABEL
            } else {
                STANDARD_LABEL
            };
            ledger.include(i, Placement::new(label, working[i].weight));
        }
    }

    ledger.finish(|_| ExclusionReason::CapExceeded)
}
