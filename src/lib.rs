//! Rule-driven credit allocation.
//!
//! Computes a capped, weighted composite score from a list of graded
//! subjects. A [`Rule`](rule::Rule) declares how subjects are bucketed and
//! weighted; an allocator greedily selects which subjects count under the
//! rule's credit caps and reports a per-subject breakdown.
//!
//! - **Grouped allocation**: named, keyword-matched, or catch-all groups,
//!   each with its own cap and weight, shared combined limits, a total cap
//!   and a fallback "other" bucket.
//! - **Tiered allocation**: a high-weight priority tier, promotion of
//!   top-graded remaining subjects, and a reduced-rate overflow tier.
//!   Available as a two-pass or a single-pass policy.
//! - **Comparison**: evaluates several named rules against the same
//!   transcript and ranks them by normalized score.
//!
//! # Architecture
//!
//! Allocation is a pure, synchronous function of its inputs. Subjects are
//! borrowed immutably; every pass threads an explicit ledger that owns the
//! inclusion bookkeeping, so no subject is counted twice and every subject
//! is reported exactly once. All orderings use stable sorts: equal ranking
//! keys keep their input (or declaration) order.
//!
//! # Examples
//!
//! ```
//! use u_credit::allocation::allocate;
//! use u_credit::rule::{Group, GroupedRule, Rule};
//! use u_credit::subject::Subject;
//!
//! let subjects = vec![Subject::new("A", 90.0, 2.0), Subject::new("B", 80.0, 2.0)];
//! let rule = Rule::Grouped(
//!     GroupedRule::default().with_group(Group::named("core", ["A", "B"]).with_cap(2.0)),
//! );
//!
//! let result = allocate(&subjects, &rule);
//! assert!((result.score - 180.0).abs() < 1e-9);
//! assert!((result.credits - 2.0).abs() < 1e-9);
//! ```

pub mod allocation;
pub mod compare;
pub mod error;
pub mod rule;
pub mod subject;

#[cfg(feature = "serde")]
mod lenient;

#[cfg(feature = "wasm")]
pub mod wasm;
