//! Error types for rule documents.
//!
//! Allocation itself never fails; these errors only arise when parsing a
//! rule document or when a caller explicitly asks for validation.

use thiserror::Error;

/// Errors produced while loading or validating rules.
#[derive(Debug, Error)]
pub enum RuleError {
    /// The rule document is not valid JSON or does not match the schema.
    #[cfg(feature = "serde")]
    #[error("rule document parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// A combined limit names a group the rule does not declare.
    #[error("combined limit '{limit}' names unknown group '{group}'")]
    UnknownGroup { limit: String, group: String },

    /// Two groups share a name, so combined limits would be ambiguous.
    #[error("duplicate group name '{0}'")]
    DuplicateGroup(String),

    /// A numeric field is out of range.
    #[error("invalid rule: {0}")]
    Invalid(String),
}

/// Result type alias for rule operations.
pub type Result<T> = std::result::Result<T, RuleError>;
