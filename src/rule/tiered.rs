//! Tiered rule configuration.

use super::CREDIT_EPSILON;
use crate::subject::normalize_name;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Priority-tier credit cap used by [`TieredRule::with_standard_caps`].
pub const STANDARD_PRIORITY_CREDIT_CAP: f64 = 18.0;

/// Total credit cap used by [`TieredRule::with_standard_caps`].
pub const STANDARD_TOTAL_CAP: f64 = 24.0;

/// Tier-1 weight used when a rule leaves `priority_weight` unset or
/// non-positive.
pub const DEFAULT_PRIORITY_WEIGHT: f64 = 2.0;

/// Overflow multiplier used when a rule leaves `overflow_weight` unset or
/// non-positive.
pub const DEFAULT_OVERFLOW_WEIGHT: f64 = 0.1;

/// Default promotion budget, in credits.
pub const DEFAULT_OTHER_PRIORITY_CAP: f64 = 4.0;

/// How the priority pool and the overflow tier are filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum TieredMode {
    /// Promotion, then a priority pass, then a separate overflow pass with
    /// its own ranking.
    #[default]
    TwoPass,
    /// One ranking over every subject. The score multiplier drops to the
    /// overflow weight as soon as a subject no longer fits under the
    /// priority cap, and stays there.
    SinglePass,
}

/// Whether a credit cap may be filled exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum CapBoundary {
    /// `used + credits <= cap`.
    #[default]
    Inclusive,
    /// `used + credits < cap`.
    Exclusive,
}

impl CapBoundary {
    /// Tests whether `used + credits` stays within `cap`.
    pub fn admits(self, used: f64, credits: f64, cap: f64) -> bool {
        match self {
            CapBoundary::Inclusive => used + credits <= cap + CREDIT_EPSILON,
            CapBoundary::Exclusive => used + credits < cap - CREDIT_EPSILON,
        }
    }
}

/// Policy with a high-weight priority tier and a reduced-rate overflow tier.
///
/// # Examples
///
/// ```
/// use u_credit::rule::{TieredMode, TieredRule};
///
/// let rule = TieredRule::default()
///     .with_priority_keywords(["物理"])
///     .with_priority_weight(2.0)
///     .with_priority_credit_cap(18.0)
///     .with_mode(TieredMode::SinglePass);
/// assert!(rule.is_priority("物理学 Ｉ"));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct TieredRule {
    /// Exact names of tier-1 subjects.
    pub priority_subjects: Vec<String>,
    /// Substrings of the normalized name marking tier-1 subjects.
    pub priority_keywords: Vec<String>,
    /// Weight of tier-1 subjects. 0 means [`DEFAULT_PRIORITY_WEIGHT`].
    #[cfg_attr(
        feature = "serde",
        serde(deserialize_with = "crate::lenient::priority_weight")
    )]
    pub priority_weight: f64,
    /// Ceiling on credits admitted through the priority pool. 0 = unlimited.
    #[cfg_attr(feature = "serde", serde(deserialize_with = "crate::lenient::zero"))]
    pub priority_credit_cap: f64,
    /// Ceiling on total included credits. 0 = unlimited.
    #[cfg_attr(feature = "serde", serde(deserialize_with = "crate::lenient::zero"))]
    pub total_cap: f64,
    /// Multiplier for subjects admitted after the priority pool.
    /// 0 means [`DEFAULT_OVERFLOW_WEIGHT`].
    #[cfg_attr(
        feature = "serde",
        serde(deserialize_with = "crate::lenient::overflow_weight")
    )]
    pub overflow_weight: f64,
    /// Credits of top-graded non-priority subjects promoted at weight 1.0.
    /// 0 promotes every non-priority subject.
    #[cfg_attr(
        feature = "serde",
        serde(deserialize_with = "crate::lenient::other_priority_cap")
    )]
    pub other_priority_cap: f64,
    pub mode: TieredMode,
    /// Boundary applied to `priority_credit_cap`.
    pub cap_boundary: CapBoundary,
}

impl Default for TieredRule {
    fn default() -> Self {
        Self {
            priority_subjects: Vec::new(),
            priority_keywords: Vec::new(),
            priority_weight: DEFAULT_PRIORITY_WEIGHT,
            priority_credit_cap: 0.0,
            total_cap: 0.0,
            overflow_weight: DEFAULT_OVERFLOW_WEIGHT,
            other_priority_cap: DEFAULT_OTHER_PRIORITY_CAP,
            mode: TieredMode::TwoPass,
            cap_boundary: CapBoundary::Inclusive,
        }
    }
}

impl TieredRule {
    /// Applies the fixed-default caps some policies assume when the rule
    /// document leaves them out.
    pub fn with_standard_caps(self) -> Self {
        self.with_priority_credit_cap(STANDARD_PRIORITY_CREDIT_CAP)
            .with_total_cap(STANDARD_TOTAL_CAP)
    }

    pub fn with_priority_subjects<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.priority_subjects = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_priority_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.priority_keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_priority_weight(mut self, weight: f64) -> Self {
        self.priority_weight = weight;
        self
    }

    pub fn with_priority_credit_cap(mut self, cap: f64) -> Self {
        self.priority_credit_cap = cap;
        self
    }

    pub fn with_total_cap(mut self, cap: f64) -> Self {
        self.total_cap = cap;
        self
    }

    pub fn with_overflow_weight(mut self, weight: f64) -> Self {
        self.overflow_weight = weight;
        self
    }

    pub fn with_other_priority_cap(mut self, cap: f64) -> Self {
        self.other_priority_cap = cap;
        self
    }

    pub fn with_mode(mut self, mode: TieredMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_cap_boundary(mut self, boundary: CapBoundary) -> Self {
        self.cap_boundary = boundary;
        self
    }

    /// Tests whether a subject name belongs to the priority tier.
    ///
    /// `priority_subjects` compares raw names; `priority_keywords` compares
    /// normalized names against normalized keywords.
    pub fn is_priority(&self, name: &str) -> bool {
        if self.priority_subjects.iter().any(|s| s == name) {
            return true;
        }
        if self.priority_keywords.is_empty() {
            return false;
        }
        let normalized = normalize_name(name);
        self.priority_keywords.iter().any(|k| {
            let k = normalize_name(k);
            !k.is_empty() && normalized.contains(k.as_str())
        })
    }
}
