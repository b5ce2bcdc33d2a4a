//! Grouped rule configuration.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How a group's `keywords` are matched against subject names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum MatchType {
    /// The subject name must equal one of the keywords.
    #[default]
    Exact,
    /// Any keyword occurring in the raw subject name is a match.
    Partial,
}

/// A scoring group: a candidate set of subjects with its own weight and cap.
///
/// A group with neither `subjects` nor `keywords` is a catch-all: it takes
/// every subject not yet included when the group is reached.
///
/// # Examples
///
/// ```
/// use u_credit::rule::{Group, MatchType};
///
/// let lab = Group::keywords("lab", ["実験"], MatchType::Partial)
///     .with_weight(1.5)
///     .with_cap(6.0);
/// assert!(!lab.is_catch_all());
/// assert!(Group::catch_all("rest").is_catch_all());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct Group {
    /// Label used in the breakdown and referenced by combined limits.
    pub name: String,
    /// Exact subject names. Takes precedence over `keywords`.
    pub subjects: Vec<String>,
    /// Keywords matched according to `match_type`.
    pub keywords: Vec<String>,
    pub match_type: MatchType,
    /// Weight applied to `grade * credits` of included subjects.
    #[cfg_attr(feature = "serde", serde(deserialize_with = "crate::lenient::one"))]
    pub weight: f64,
    /// Credit ceiling for this group. 0 = unlimited.
    #[cfg_attr(feature = "serde", serde(deserialize_with = "crate::lenient::zero"))]
    pub cap: f64,
}

impl Default for Group {
    fn default() -> Self {
        Self {
            name: String::new(),
            subjects: Vec::new(),
            keywords: Vec::new(),
            match_type: MatchType::Exact,
            weight: 1.0,
            cap: 0.0,
        }
    }
}

impl Group {
    /// Creates a group matching the given subject names exactly.
    pub fn named<I, S>(name: impl Into<String>, subjects: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            subjects: subjects.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Creates a keyword-matched group.
    pub fn keywords<I, S>(name: impl Into<String>, keywords: I, match_type: MatchType) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            keywords: keywords.into_iter().map(Into::into).collect(),
            match_type,
            ..Self::default()
        }
    }

    /// Creates a catch-all group.
    pub fn catch_all(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_cap(mut self, cap: f64) -> Self {
        self.cap = cap;
        self
    }

    /// Returns `true` if the group declares no subjects and no keywords.
    pub fn is_catch_all(&self) -> bool {
        self.subjects.is_empty() && self.keywords.is_empty()
    }

    /// Tests whether a subject name belongs to this group's candidate set.
    ///
    /// Catch-all groups match every name; the allocator filters out
    /// subjects that earlier groups already took.
    pub fn matches(&self, name: &str) -> bool {
        if !self.subjects.is_empty() {
            return self.subjects.iter().any(|s| s == name);
        }
        if self.keywords.is_empty() {
            return true;
        }
        match self.match_type {
            MatchType::Partial => self.keywords.iter().any(|k| name.contains(k.as_str())),
            MatchType::Exact => self.keywords.iter().any(|k| k == name),
        }
    }
}

/// A credit ceiling shared across several named groups.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct CombinedLimit {
    pub name: String,
    /// Names of the groups whose included credits count against `cap`.
    pub group_names: Vec<String>,
    /// 0 = unlimited.
    #[cfg_attr(feature = "serde", serde(deserialize_with = "crate::lenient::zero"))]
    pub cap: f64,
}

impl CombinedLimit {
    pub fn new<I, S>(name: impl Into<String>, group_names: I, cap: f64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            group_names: group_names.into_iter().map(Into::into).collect(),
            cap,
        }
    }

    /// Returns `true` if this limit spans the named group.
    pub fn covers(&self, group: &str) -> bool {
        self.group_names.iter().any(|g| g == group)
    }
}

/// Policy that buckets subjects into ordered groups.
///
/// Groups are processed in declaration order; an earlier group gets first
/// pick of the subjects it matches.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct GroupedRule {
    pub groups: Vec<Group>,
    /// Ceiling on total included credits. 0 = unlimited.
    #[cfg_attr(feature = "serde", serde(deserialize_with = "crate::lenient::zero"))]
    pub total_cap: f64,
    /// Weight for subjects no group admitted. 0 disables the "other" pass.
    #[cfg_attr(feature = "serde", serde(deserialize_with = "crate::lenient::zero"))]
    pub other_weight: f64,
    pub combined_limits: Vec<CombinedLimit>,
}

impl GroupedRule {
    pub fn with_group(mut self, group: Group) -> Self {
        self.groups.push(group);
        self
    }

    pub fn with_total_cap(mut self, cap: f64) -> Self {
        self.total_cap = cap;
        self
    }

    pub fn with_other_weight(mut self, weight: f64) -> Self {
        self.other_weight = weight;
        self
    }

    pub fn with_combined_limit(mut self, limit: CombinedLimit) -> Self {
        self.combined_limits.push(limit);
        self
    }

    /// Indices into `combined_limits` of every limit spanning `group`.
    pub(crate) fn limits_for(&self, group: &str) -> Vec<usize> {
        self.combined_limits
            .iter()
            .enumerate()
            .filter(|(_, l)| l.covers(group))
            .map(|(i, _)| i)
            .collect()
    }
}
