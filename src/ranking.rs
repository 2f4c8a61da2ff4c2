//! Ranking functions: lazy sequences of `(value, rank)` pairs.
//!
//! A [`Ranking`] is a head node (or nothing) plus a deduplication flag.
//! The flag selects iterator behaviour only; it never rewrites the node
//! graph. Every operation of the algebra promises non-decreasing ranks on
//! the sequences it produces; raw constructors accept whatever the caller
//! supplies.

use std::fmt;

use crate::error::Result;
use crate::iter::RankedIter;
use crate::node::{Link, Node};
use crate::rank::Rank;

/// Controls whether iterators skip consecutive equal values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deduplication {
    /// Skip consecutive elements with equal values, keeping the first.
    Enabled,
    /// Visit every element.
    Disabled,
}

impl Deduplication {
    /// Whether deduplication is on.
    #[must_use]
    pub fn is_enabled(self) -> bool {
        matches!(self, Deduplication::Enabled)
    }
}

impl From<bool> for Deduplication {
    fn from(enabled: bool) -> Self {
        if enabled {
            Deduplication::Enabled
        } else {
            Deduplication::Disabled
        }
    }
}

/// A lazy, possibly infinite ranking function.
///
/// Rankings are immutable values. Cloning shares the node graph, so any
/// prefix forced through one handle is memoized for all of them.
pub struct Ranking<T> {
    head: Link<T>,
    dedup: Deduplication,
}

impl<T> Clone for Ranking<T> {
    fn clone(&self) -> Self {
        Ranking {
            head: self.head.clone(),
            dedup: self.dedup,
        }
    }
}

impl<T> fmt::Debug for Ranking<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ranking")
            .field("head", &self.head)
            .field("dedup", &self.dedup)
            .finish()
    }
}

impl<T: Send + Sync + 'static> Ranking<T> {
    /// Build a ranking from a head node and a deduplication flag.
    #[must_use]
    pub fn from_head(head: Link<T>, dedup: Deduplication) -> Ranking<T> {
        Ranking { head, dedup }
    }

    /// The head node, shared. `None` for the empty ranking.
    #[must_use]
    pub fn head(&self) -> Link<T> {
        self.head.clone()
    }

    /// The deduplication flag carried by this ranking.
    #[must_use]
    pub fn dedup(&self) -> Deduplication {
        self.dedup
    }

    /// Whether the ranking has no elements at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// The first `(value, rank)` pair, forcing only the head's value.
    ///
    /// # Errors
    /// Propagates a failure of the head's value suspension.
    pub fn first(&self) -> Result<Option<(T, Rank)>>
    where
        T: Clone,
    {
        match &self.head {
            None => Ok(None),
            Some(node) => Ok(Some((node.value()?.clone(), node.rank()))),
        }
    }

    /// The most normal value: the head's payload.
    ///
    /// # Errors
    /// Propagates a failure of the head's value suspension.
    pub fn most_normal(&self) -> Result<Option<T>>
    where
        T: Clone,
    {
        Ok(self.first()?.map(|(value, _)| value))
    }
}

impl<T: Clone + PartialEq + Send + Sync + 'static> Ranking<T> {
    /// A fresh pull iterator over this ranking, honouring the dedup flag.
    ///
    /// Iterators are single-pass; construct a new one for another pass.
    /// The shared node graph memoizes whatever earlier passes forced.
    #[must_use]
    pub fn iter(&self) -> RankedIter<T> {
        RankedIter::new(self.head.clone(), self.dedup)
    }

    /// Materialize up to `count` leading `(value, rank)` pairs.
    ///
    /// Only the inspected prefix is forced; the remainder of the ranking
    /// stays suspended.
    ///
    /// # Errors
    /// Propagates the first failure encountered while forcing the prefix.
    pub fn take_n(&self, count: usize) -> Result<Vec<(T, Rank)>> {
        let mut out = Vec::with_capacity(count.min(64));
        for pair in self.iter().take(count) {
            out.push(pair?);
        }
        Ok(out)
    }

    /// Count the elements by walking the whole sequence.
    ///
    /// Honours the dedup flag. Diverges on infinite rankings; use only
    /// when the sequence is known to be finite.
    ///
    /// # Errors
    /// Propagates the first failure encountered during the walk.
    pub fn size(&self) -> Result<usize> {
        let mut count = 0;
        for pair in self.iter() {
            pair?;
            count += 1;
        }
        Ok(count)
    }
}

impl<'a, T: Clone + PartialEq + Send + Sync + 'static> IntoIterator for &'a Ranking<T> {
    type Item = Result<(T, Rank)>;
    type IntoIter = RankedIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A sequence head produced by an operation step, before it is wrapped
/// back into a [`Ranking`].
pub(crate) fn head_rank_or_infinity<T: Send + Sync + 'static>(head: &Link<T>) -> Rank {
    head.as_ref().map_or(Rank::INFINITY, Node::rank)
}
