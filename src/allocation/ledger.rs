//! Allocation state shared by every pass.
//!
//! The ledger owns the inclusion bookkeeping for one allocation call. Each
//! input subject is tracked by position, so a subject can be admitted at
//! most once no matter how many groups or tiers consider it, and
//! [`Ledger::finish`] reports every subject exactly once.

use tracing::trace;

use super::result::{AllocationResult, BreakdownEntry, Contribution, EntryStatus, ExclusionReason};
use crate::rule::CREDIT_EPSILON;
use crate::subject::Subject;

/// Where and how a subject is admitted.
#[derive(Debug, Clone)]
pub(crate) struct Placement<'r> {
    pub label: &'r str,
    pub weight: f64,
    pub multiplier: f64,
}

impl<'r> Placement<'r> {
    pub fn new(label: &'r str, weight: f64) -> Self {
        Self {
            label,
            weight,
            multiplier: 1.0,
        }
    }

    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = multiplier;
        self
    }
}

pub(crate) struct Ledger<'a> {
    subjects: &'a [Subject],
    included: Vec<bool>,
    entries: Vec<BreakdownEntry>,
    score: f64,
    max_score: f64,
    credits: f64,
}

impl<'a> Ledger<'a> {
    pub fn new(subjects: &'a [Subject]) -> Self {
        Self {
            subjects,
            included: vec![false; subjects.len()],
            entries: Vec::with_capacity(subjects.len()),
            score: 0.0,
            max_score: 0.0,
            credits: 0.0,
        }
    }

    pub fn is_included(&self, index: usize) -> bool {
        self.included[index]
    }

    /// Credits admitted so far across all passes.
    pub fn credits(&self) -> f64 {
        self.credits
    }

    /// Indices of subjects not yet admitted, in input order.
    pub fn remaining(&self) -> Vec<usize> {
        (0..self.subjects.len())
            .filter(|&i| !self.included[i])
            .collect()
    }

    /// Admits a subject and records its breakdown line.
    ///
    /// Admitting an already-included subject is a no-op.
    pub fn include(&mut self, index: usize, placement: Placement<'_>) {
        if self.included[index] {
            return;
        }
        let subject = &self.subjects[index];
        let factor = placement.weight * placement.multiplier;
        let points = subject.grade * subject.credits * factor;

        self.included[index] = true;
        self.credits += subject.credits;
        self.score += points;
        self.max_score += 100.0 * subject.credits * factor;

        trace!(
            subject = %subject.name,
            label = placement.label,
            points,
            credits = self.credits,
            "admitted"
        );

        let mut text = format!(
            "{} ({}) [+{:.2}] (x{})",
            subject.name, placement.label, points, placement.weight
        );
        if placement.multiplier != 1.0 {
            text.push_str(&format!(" @ x{}", placement.multiplier));
        }

        self.entries.push(BreakdownEntry {
            subject: subject.name.clone(),
            text,
            status: EntryStatus::Included,
            contribution: Some(Contribution {
                label: placement.label.to_string(),
                weight: placement.weight,
                multiplier: placement.multiplier,
                points,
            }),
            reason: None,
        });
    }

    /// Closes the ledger, excluding every subject not admitted.
    pub fn finish(self, reason: impl Fn(usize) -> ExclusionReason) -> AllocationResult {
        let mut breakdown = self.entries;
        for (i, subject) in self.subjects.iter().enumerate() {
            if self.included[i] {
                continue;
            }
            let reason = reason(i);
            breakdown.push(BreakdownEntry {
                subject: subject.name.clone(),
                text: format!("{}: {}", subject.name, reason),
                status: EntryStatus::Excluded,
                contribution: None,
                reason: Some(reason),
            });
        }

        AllocationResult {
            score: self.score,
            credits: self.credits,
            max_score: self.max_score,
            breakdown,
        }
    }
}

/// Tests whether `used + credits` stays within an optional cap.
pub(crate) fn fits(used: f64, credits: f64, cap: Option<f64>) -> bool {
    cap.map_or(true, |cap| used + credits <= cap + CREDIT_EPSILON)
}

/// Sorts indices by `key` descending.
///
/// `sort_by` is stable, so indices with equal keys keep their current
/// relative order. Callers rely on this for tie-breaks: input order within
/// a group, declaration order between tiers.
pub(crate) fn sort_desc_by(indices: &mut [usize], key: impl Fn(usize) -> f64) {
    indices.sort_by(|&a, &b| key(b).total_cmp(&key(a)));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subjects() -> Vec<Subject> {
        vec![
            Subject::new("A", 90.0, 2.0),
            Subject::new("B", 80.0, 1.0),
            Subject::new("C", 80.0, 3.0),
        ]
    }

    #[test]
    fn test_include_accumulates() {
        let s = subjects();
        let mut ledger = Ledger::new(&s);
        ledger.include(0, Placement::new("core", 2.0));
        ledger.include(1, Placement::new("extra", 1.0).with_multiplier(0.1));
        let r = ledger.finish(|_| ExclusionReason::CapExceeded);

        assert!((r.score - (90.0 * 2.0 * 2.0 + 80.0 * 1.0 * 0.1)).abs() < 1e-9);
        assert!((r.max_score - (100.0 * 2.0 * 2.0 + 100.0 * 1.0 * 0.1)).abs() < 1e-9);
        assert!((r.credits - 3.0).abs() < 1e-12);
        assert_eq!(r.breakdown.len(), 3);
        assert_eq!(r.breakdown[0].text, "A (core) [+360.00] (x2)");
        assert_eq!(r.breakdown[1].text, "B (extra) [+8.00] (x1) @ x0.1");
        assert_eq!(r.breakdown[2].subject, "C");
        assert_eq!(r.breakdown[2].reason, Some(ExclusionReason::CapExceeded));
    }

    #[test]
    fn test_excluded_text_carries_reason() {
        let s = subjects();
        let mut ledger = Ledger::new(&s);
        ledger.include(0, Placement::new("core", 1.0));
        let r = ledger.finish(|i| {
            if i == 1 {
                ExclusionReason::NoMatchingGroup
            } else {
                ExclusionReason::CapExceeded
            }
        });

        assert_eq!(r.breakdown[1].text, "B: belongs to no group");
        assert_eq!(
            r.breakdown[2].text,
            "C: insufficient priority or cap exceeded"
        );
    }

    #[test]
    fn test_double_include_is_noop() {
        let s = subjects();
        let mut ledger = Ledger::new(&s);
        ledger.include(0, Placement::new("a", 1.0));
        ledger.include(0, Placement::new("b", 1.0));
        assert!((ledger.credits() - 2.0).abs() < 1e-12);
        let r = ledger.finish(|_| ExclusionReason::CapExceeded);
        assert_eq!(r.breakdown.iter().filter(|e| e.subject == "A").count(), 1);
    }

    #[test]
    fn test_remaining_in_input_order() {
        let s = subjects();
        let mut ledger = Ledger::new(&s);
        ledger.include(1, Placement::new("a", 1.0));
        assert_eq!(ledger.remaining(), vec![0, 2]);
    }

    #[test]
    fn test_sort_desc_is_stable() {
        let s = subjects();
        let mut idx = vec![2, 1, 0];
        sort_desc_by(&mut idx, |i| s[i].grade);
        // B and C tie at 80; their incoming order (C then B) is kept.
        assert_eq!(idx, vec![0, 2, 1]);
    }

    #[test]
    fn test_fits() {
        assert!(fits(10.0, 100.0, None));
        assert!(fits(1.0, 1.0, Some(2.0)));
        assert!(!fits(1.5, 1.0, Some(2.0)));
        assert!(fits(0.1 + 0.2, 0.7, Some(1.0)));
    }
}
