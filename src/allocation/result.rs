//! Allocation results and breakdown entries.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Whether a subject counted toward the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum EntryStatus {
    Included,
    Excluded,
}

/// Why a subject was left out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum ExclusionReason {
    /// Outranked by other subjects, or admitting it would break a cap.
    CapExceeded,
    /// No group matched the subject and no fallback bucket was active.
    NoMatchingGroup,
}

impl fmt::Display for ExclusionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExclusionReason::CapExceeded => f.write_str("insufficient priority or cap exceeded"),
            ExclusionReason::NoMatchingGroup => f.write_str("belongs to no group"),
        }
    }
}

/// How an included subject contributed to the score.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Contribution {
    /// Group or tier that admitted the subject.
    pub label: String,
    /// Group or tier weight.
    pub weight: f64,
    /// Extra factor on top of `weight`; below 1 for overflow admissions.
    pub multiplier: f64,
    /// `grade * credits * weight * multiplier`.
    pub points: f64,
}

/// One line of the per-subject ledger.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct BreakdownEntry {
    /// Subject name.
    pub subject: String,
    /// Human-readable line. Excluded entries read `"{subject}: {reason}"`.
    pub text: String,
    pub status: EntryStatus,
    /// Present on included entries.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub contribution: Option<Contribution>,
    /// Present on excluded entries.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub reason: Option<ExclusionReason>,
}

impl BreakdownEntry {
    pub fn is_included(&self) -> bool {
        self.status == EntryStatus::Included
    }
}

/// Outcome of allocating a transcript under one rule.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct AllocationResult {
    /// Weighted sum over included subjects.
    pub score: f64,
    /// Total included credits.
    pub credits: f64,
    /// `score` with every grade replaced by 100.
    pub max_score: f64,
    /// Exactly one entry per input subject: included entries in admission
    /// order, then excluded entries in input order.
    pub breakdown: Vec<BreakdownEntry>,
}

impl AllocationResult {
    /// `score / max_score`, or 0 when nothing weighted was included.
    pub fn ratio(&self) -> f64 {
        if self.max_score > 0.0 {
            self.score / self.max_score
        } else {
            0.0
        }
    }

    pub fn included(&self) -> impl Iterator<Item = &BreakdownEntry> {
        self.breakdown.iter().filter(|e| e.is_included())
    }

    pub fn excluded(&self) -> impl Iterator<Item = &BreakdownEntry> {
        self.breakdown.iter().filter(|e| !e.is_included())
    }

    /// Looks up the entry for a subject name.
    pub fn entry(&self, subject: &str) -> Option<&BreakdownEntry> {
        self.breakdown.iter().find(|e| e.subject == subject)
    }

    /// Returns `true` if the named subject counted toward the score.
    pub fn is_included(&self, subject: &str) -> bool {
        self.entry(subject).is_some_and(BreakdownEntry::is_included)
    }
}
