//! Greedy credit allocation.
//!
//! Selects which subjects count toward a composite score under a
//! [`Rule`]. Both allocators are greedy: they rank candidates, admit each
//! one whose credits fit every applicable cap, and skip the rest without
//! stopping, so smaller subjects can still fill leftover room.
//!
//! - [`allocate_grouped`]: ordered groups with per-group caps, combined
//!   limits, a total cap and an "other" fallback bucket.
//! - [`allocate_tiered`]: priority tier, promotion, overflow tier, in
//!   two-pass or single-pass mode.
//!
//! Every result lists each input subject exactly once in its breakdown.

mod grouped;
mod ledger;
mod result;
mod tiered;

pub use grouped::{allocate_grouped, OTHER_LABEL};
pub use result::{AllocationResult, BreakdownEntry, Contribution, EntryStatus, ExclusionReason};
pub use tiered::{
    allocate_tiered, OVERFLOW_LABEL, PRIORITY_LABEL, PROMOTED_LABEL, STANDARD_LABEL,
};

use crate::rule::Rule;
use crate::subject::Subject;

/// Allocates subjects under a rule, dispatching on the rule's variant.
///
/// Never fails: a rule that admits nothing yields a result with every
/// subject excluded and a score of 0.
pub fn allocate(subjects: &[Subject], rule: &Rule) -> AllocationResult {
    match rule {
        Rule::Grouped(r) => allocate_grouped(subjects, r),
        Rule::Tiered(r) => allocate_tiered(subjects, r),
    }
}
