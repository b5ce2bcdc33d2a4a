//! Graded subjects and name normalization.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A graded subject on a transcript.
///
/// A subject is never split: an allocator either includes all of its
/// credits or none of them.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Subject {
    /// Subject name. Exact-name rules match against this verbatim.
    #[cfg_attr(
        feature = "serde",
        serde(default, deserialize_with = "crate::lenient::string_or_empty")
    )]
    pub name: String,
    /// Numeric grade, 0 to 100.
    #[cfg_attr(feature = "serde", serde(default, deserialize_with = "crate::lenient::zero"))]
    pub grade: f64,
    /// Credit units carried by the subject.
    #[cfg_attr(feature = "serde", serde(default, deserialize_with = "crate::lenient::zero"))]
    pub credits: f64,
}

impl Subject {
    pub fn new(name: impl Into<String>, grade: f64, credits: f64) -> Self {
        Self {
            name: name.into(),
            grade,
            credits,
        }
    }

    /// Name with full-width digits folded and whitespace removed.
    pub fn normalized_name(&self) -> String {
        normalize_name(&self.name)
    }
}

/// Normalizes a subject name for keyword matching.
///
/// Full-width digits (`０`..`９`) become ASCII digits and every whitespace
/// character, including the ideographic space, is dropped.
///
/// # Examples
///
/// ```
/// use u_credit::subject::normalize_name;
///
/// assert_eq!(normalize_name("物理学 ２"), "物理学2");
/// assert_eq!(normalize_name("  Linear\tAlgebra "), "LinearAlgebra");
/// ```
pub fn normalize_name(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| match c {
            '\u{FF10}'..='\u{FF19}' => {
                char::from_u32(c as u32 - 0xFEE0).unwrap_or(c)
            }
            _ => c,
        })
        .collect()
}
