//! Lazy rank-ordered union of two sequences.
//!
//! The merged sequence interleaves both inputs in non-decreasing rank
//! order. At equal ranks, elements of the left input come first; across a
//! run of equal ranks the left side is drained before the right side is
//! consulted again. Each merged node's tail is a suspension of the next
//! merge step, so merging infinite sequences costs nothing until forced.
//!
//! Merging a ranking with itself needs care: recursing over
//! pointer-identical nodes walks one shared spine from both sides. With
//! deduplication enabled the union of a sequence with itself *is* the
//! sequence, so the input is returned unchanged. With deduplication
//! disabled the right argument is lazily re-celled first, restoring
//! distinct-node iteration so every element appears twice.

use crate::node::{Link, Node};
use crate::rank::Rank;
use crate::ranking::{Deduplication, Ranking};
use crate::suspension::Suspension;

impl<T: Clone + Send + Sync + 'static> Ranking<T> {
    /// Merge with `other` in non-decreasing rank order; ties favour `self`.
    #[must_use]
    pub fn merge(&self, other: &Ranking<T>, dedup: Deduplication) -> Ranking<T> {
        if let (Some(left), Some(right)) = (&self.head(), &other.head()) {
            if Node::ptr_eq(left, right) {
                if dedup.is_enabled() {
                    return Ranking::from_head(self.head(), dedup);
                }
                let copied = copy_link(other.head());
                return Ranking::from_head(merge_link(self.head(), copied, Rank::ZERO), dedup);
            }
        }
        Ranking::from_head(merge_link(self.head(), other.head(), Rank::ZERO), dedup)
    }

    /// Left fold of pairwise [`merge`](Ranking::merge) over `rankings`.
    /// At equal ranks, earlier rankings take precedence.
    #[must_use]
    pub fn merge_all(rankings: &[Ranking<T>], dedup: Deduplication) -> Ranking<T> {
        let Some((first, rest)) = rankings.split_first() else {
            return Ranking::from_head(None, dedup);
        };
        let mut merged = Ranking::from_head(first.head(), dedup);
        for ranking in rest {
            merged = merged.merge(ranking, dedup);
        }
        merged
    }
}

/// One merge step over realized heads. `last_rank` is the rank emitted
/// immediately before (zero at the start); a left head matching it is
/// drained before ranks are compared again.
pub(crate) fn merge_link<T>(a: Link<T>, b: Link<T>, last_rank: Rank) -> Link<T>
where
    T: Clone + Send + Sync + 'static,
{
    let Some(left) = a else { return b };
    let Some(right) = b else { return Some(left) };

    let take_left = left.rank() == last_rank || left.rank() <= right.rank();
    if take_left {
        let rank = left.rank();
        let value = left.value_suspension();
        let tail = Suspension::new(move || Ok(merge_link(left.next()?, Some(right), rank)));
        Some(Node::from_suspensions(value, rank, tail))
    } else {
        let rank = right.rank();
        let value = right.value_suspension();
        let tail = Suspension::new(move || Ok(merge_link(Some(left), right.next()?, rank)));
        Some(Node::from_suspensions(value, rank, tail))
    }
}

/// Lazily rebuild a sequence in fresh cells. Value suspensions are shared
/// (payloads stay memoized once); only node identity changes.
fn copy_link<T>(link: Link<T>) -> Link<T>
where
    T: Clone + Send + Sync + 'static,
{
    let node = link?;
    let rank = node.rank();
    let value = node.value_suspension();
    let tail = Suspension::new(move || Ok(copy_link(node.next()?)));
    Some(Node::from_suspensions(value, rank, tail))
}
