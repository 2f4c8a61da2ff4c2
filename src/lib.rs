//! # Ranked
//!
//! *Lazy ranking functions: grading alternatives by degrees of surprise.*
//!
//! ## Intuition First
//!
//! A probability distribution asks "how likely is each alternative?" and
//! answers with real numbers that must sum to one. A ranking function asks
//! a coarser question, "how surprised would I be?", and answers with
//! integers: rank 0 for the normal case, 1 for an exception, 2 for an
//! exception to the exception, infinity for the impossible. Coarseness is
//! the point. You rarely know that a sensor fails with probability
//! 0.0003, but you can commit to "it normally works, and failure is one
//! degree surprising", and still condition on evidence, compose beliefs,
//! and revise them, all without inventing numbers.
//!
//! ## The Problem
//!
//! A ranking function is semantically a (possibly countably infinite)
//! multiset of `(value, rank)` pairs enumerated in non-decreasing rank
//! order. Infinite rankings rule out eager data structures: the sequence
//! must be demand-driven, with every operation (mapping, filtering,
//! merging, conditioning, monadic bind) building a *plan* that forces no
//! more of its inputs than the caller actually observes. The engine here
//! is a lazy ranked cons-list: nodes carry an eagerly realized rank (so
//! ordering decisions never touch payloads), a suspended value, and a
//! suspended tail, with memoization making repeated traversal cheap and
//! failures sticky.
//!
//! ## Historical Context
//!
//! ```text
//! 1988  Spohn       Ordinal conditional functions: ranks as graded belief
//! 1996  Goldszmidt  Qualitative probabilities via rankings (with Pearl)
//! 2012  Spohn       The Laws of Belief: ranking theory in full
//! 2019  Rienstra    Ranked programming: nrm/exc as a programming model
//! ```
//!
//! ## Mathematical Formulation
//!
//! A negative ranking function is a map `κ : Ω → ℕ ∪ {∞}` with
//! `min κ = 0`. For a set `A`, `κ(A) = min over ω in A of κ(ω)`;
//! disjunction is minimum, which is why [`Ranking::merge`] interleaves by
//! rank. Conditioning subtracts: `κ(ω | A) = κ(ω) − κ(A)` for `ω ∈ A`,
//! which is exactly [`Ranking::observe`]'s renormalization. Chaining adds:
//! [`Ranking::merge_apply`] emits `f(v)` shifted by `κ(v)`, the ranking
//! analogue of the law of total probability with `(+, min)` in place of
//! `(×, +)`.
//!
//! ## Complexity Analysis
//!
//! - **Time**: `O(1)` to build any operation; forcing a prefix of `k`
//!   elements costs `O(k)` merge steps per operation layer (plus user
//!   closure time), independent of the unobserved remainder.
//! - **Space**: `O(1)` per node; a forced prefix of `k` elements retains
//!   `O(k)` memoized cells per layer.
//!
//! ## Failure Modes
//!
//! 1. **Rank overflow**: shifting or summing ranks past `2^63 - 1` fails
//!    the force that needed the rank; nothing is silently clamped.
//! 2. **Divergence**: [`Ranking::size`] and exhaustive iteration do not
//!    terminate on infinite rankings. Use [`Ranking::take_n`] or
//!    [`Ranking::take_while_rank`] to bound observation.
//! 3. **Sticky failures**: a failing user closure poisons exactly the
//!    suspension that ran it; the error resurfaces, identical, on every
//!    re-observation of that element.
//!
//! ## Implementation Notes
//!
//! This crate provides:
//! - **Core types**: [`Rank`], [`Suspension`], [`Node`], [`Ranking`] with
//!   pull-based, optionally deduplicating iteration.
//! - **The operation algebra**: map / filter / take / merge / shift /
//!   merge-apply / observe / normal-exceptional / point-wise lifting,
//!   all lazy.
//! - **Boundaries**: a type-erased value façade ([`erased`]) and an
//!   opaque-handle C interface ([`c_api`]).
//!
//! ## References
//!
//! - Spohn, W. (2012). "The Laws of Belief: Ranking Theory and Its
//!   Philosophical Applications."
//! - Rienstra, T. (2019). "Ranked Programming." IJCAI.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod c_api;
pub mod construct;
pub mod erased;
pub mod error;
pub mod iter;
pub mod node;
pub mod ops;
pub mod rank;
pub mod ranking;
pub mod suspension;

pub use erased::{erase, merge_erased, observe_erased_value, register_equality, ErasedValue};
pub use error::{Error, Result};
pub use iter::RankedIter;
pub use node::Node;
pub use rank::Rank;
pub use ranking::{Deduplication, Ranking};
pub use suspension::Suspension;
