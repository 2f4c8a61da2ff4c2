//! Pull-based iteration over ranking sequences.
//!
//! The iterator walks the node graph on demand and, when deduplication is
//! enabled, skips runs of consecutive equal values while advancing. It
//! never backtracks. Because nodes memoize, independent iterators over the
//! same ranking force each underlying computation at most once between
//! them.

use crate::error::{Error, Result};
use crate::node::{Link, Node};
use crate::rank::Rank;
use crate::ranking::Deduplication;

/// Single-pass iterator yielding `(value, rank)` pairs in sequence order.
///
/// Forcing a value or a tail can fail (rank arithmetic, user closures);
/// such failures are yielded as `Err` items. After yielding an error the
/// iterator is fused: all later calls return `None`. A fresh iterator over
/// the same ranking will hit the identical, memoized error at the same
/// step.
pub struct RankedIter<T> {
    current: Link<T>,
    dedup: bool,
    /// Error found while advancing past an already-yielded element; it is
    /// delivered on the following call.
    pending: Option<Error>,
    fused: bool,
}

impl<T: Clone + PartialEq + Send + Sync + 'static> RankedIter<T> {
    pub(crate) fn new(head: Link<T>, dedup: Deduplication) -> RankedIter<T> {
        RankedIter {
            current: head,
            dedup: dedup.is_enabled(),
            pending: None,
            fused: false,
        }
    }

    /// The `(value, rank)` pair at the current position, without advancing.
    ///
    /// Returns `None` when the iterator is exhausted (or fused).
    pub fn peek(&self) -> Option<Result<(T, Rank)>> {
        if self.fused {
            return None;
        }
        let node = self.current.as_ref()?;
        Some(node.value().map(|v| (v.clone(), node.rank())))
    }

    /// Walk past `node`, skipping consecutive values equal to `value` when
    /// dedup is on. May force many tails in one step.
    fn advance_past(&self, node: &Node<T>, value: &T) -> Result<Link<T>> {
        let mut next = node.next()?;
        if !self.dedup {
            return Ok(next);
        }
        while let Some(candidate) = next {
            if candidate.value()? == value {
                next = candidate.next()?;
            } else {
                return Ok(Some(candidate));
            }
        }
        Ok(None)
    }
}

impl<T: Clone + PartialEq + Send + Sync + 'static> Iterator for RankedIter<T> {
    type Item = Result<(T, Rank)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.fused {
            return None;
        }
        if let Some(err) = self.pending.take() {
            self.fused = true;
            return Some(Err(err));
        }
        let node = self.current.take()?;
        let value = match node.value() {
            Ok(v) => v.clone(),
            Err(err) => {
                self.fused = true;
                return Some(Err(err));
            }
        };
        match self.advance_past(&node, &value) {
            Ok(next) => self.current = next,
            // Deliver the element we already have; the error surfaces on
            // the next call.
            Err(err) => self.pending = Some(err),
        }
        Some(Ok((value, node.rank())))
    }
}
