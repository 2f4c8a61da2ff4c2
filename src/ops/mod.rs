//! The operation algebra over ranking sequences.
//!
//! Every operation consumes one or more node-headed sequences and returns a
//! new sequence whose tails, when forced, recursively re-invoke the
//! operation on the inputs' tails: the closure graph is the computation
//! plan. Two rules hold throughout:
//!
//! - ranks on produced nodes are realized eagerly, so downstream ordering
//!   decisions never force a payload;
//! - values stay suspended, shared from the input node wherever the
//!   operation does not transform them.

mod filter;
mod lift;
mod map;
mod merge;
mod merge_apply;
mod nrm_exc;
mod observe;

use std::sync::Arc;

use crate::error::Result;

pub(crate) use merge::merge_link;
pub(crate) use merge_apply::{merge_bounded, shift_link};

/// A shared fallible predicate.
pub(crate) type SharedPredicate<T> = Arc<dyn Fn(&T) -> Result<bool> + Send + Sync>;
