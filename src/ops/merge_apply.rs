//! Rank shifting and the monadic bind.
//!
//! `merge_apply` applies a ranking-valued function to every element and
//! interleaves all the results, adding each input element's rank to its
//! sub-ranking. The hard part is staying lazy: the sub-ranking produced for
//! element *i* must be emittable without applying the function to element
//! *i+1*.
//!
//! The bound that makes this sound: everything contributed by the
//! unprocessed remainder of the input carries at least the next input
//! node's rank (infinity if there is none). [`merge_bounded`] carries that
//! lower bound alongside a thunk for the remainder, and only forces the
//! thunk once the realized side runs out of ranks below the bound. The one
//! concession is a single-node lookahead into the input, needed to know the
//! bound at all.

use std::sync::Arc;

use crate::error::Result;
use crate::node::{Link, Node};
use crate::ops::merge_link;
use crate::rank::Rank;
use crate::ranking::{head_rank_or_infinity, Deduplication, Ranking};
use crate::suspension::Suspension;

impl<T: Clone + Send + Sync + 'static> Ranking<T> {
    /// The same values with every rank increased by `delta`. Keeps the
    /// ranking's dedup flag.
    ///
    /// # Errors
    /// Fails if the head's shifted rank overflows; overflow on later
    /// elements surfaces when their node is forced.
    pub fn shift_ranks(&self, delta: Rank) -> Result<Ranking<T>> {
        Ok(Ranking::from_head(
            shift_link(self.head(), delta)?,
            self.dedup(),
        ))
    }

    /// Monadic bind: for each `(v @ r)`, emit `f(v)` shifted by `r`, all
    /// interleaved in non-decreasing rank order.
    ///
    /// # Errors
    /// Fails if `f` (or a force it depends on) fails while the head is
    /// being produced; later failures surface lazily.
    pub fn merge_apply<U, F>(&self, f: F, dedup: Deduplication) -> Result<Ranking<U>>
    where
        U: Clone + Send + Sync + 'static,
        F: Fn(&T) -> Result<Ranking<U>> + Send + Sync + 'static,
    {
        Ok(Ranking::from_head(
            bind_link(self.head(), Arc::new(f))?,
            dedup,
        ))
    }
}

pub(crate) fn shift_link<T>(link: Link<T>, delta: Rank) -> Result<Link<T>>
where
    T: Clone + Send + Sync + 'static,
{
    if delta == Rank::ZERO {
        return Ok(link);
    }
    let Some(node) = link else {
        return Ok(None);
    };
    let rank = node.rank().checked_add(delta)?;
    let value = node.value_suspension();
    let tail = Suspension::new(move || shift_link(node.next()?, delta));
    Ok(Some(Node::from_suspensions(value, rank, tail)))
}

fn bind_link<T, U>(
    link: Link<T>,
    f: Arc<dyn Fn(&T) -> Result<Ranking<U>> + Send + Sync>,
) -> Result<Link<U>>
where
    T: Clone + Send + Sync + 'static,
    U: Clone + Send + Sync + 'static,
{
    let Some(node) = link else {
        return Ok(None);
    };
    let sub = f(node.value()?)?;
    let shifted = shift_link(sub.head(), node.rank())?;

    // One-node lookahead: the next input node's rank bounds everything the
    // remainder can contribute.
    let next_input = node.next()?;
    let rest_min = head_rank_or_infinity(&next_input);
    let rest = next_input.map(|next| {
        let f = Arc::clone(&f);
        Suspension::new(move || bind_link(Some(next), f))
    });

    merge_bounded(shifted, rest, rest_min)
}

/// Merge a realized sequence against a suspended one whose ranks are known
/// to be at least `rest_min`. Emits from `first` without forcing `rest`
/// while the bound allows; once it does not, realizes `rest` and finishes
/// as an ordinary two-sided merge (the realized head already chains the
/// remainder lazily).
pub(crate) fn merge_bounded<T>(
    first: Link<T>,
    rest: Option<Suspension<Link<T>>>,
    rest_min: Rank,
) -> Result<Link<T>>
where
    T: Clone + Send + Sync + 'static,
{
    let Some(first_node) = first else {
        return match rest {
            Some(rest) => Ok(rest.force()?.clone()),
            None => Ok(None),
        };
    };
    let Some(rest) = rest else {
        return Ok(Some(first_node));
    };
    if rest_min.is_infinity() {
        return Ok(Some(first_node));
    }
    if first_node.rank() <= rest_min {
        let rank = first_node.rank();
        let value = first_node.value_suspension();
        let tail =
            Suspension::new(move || merge_bounded(first_node.next()?, Some(rest), rest_min));
        return Ok(Some(Node::from_suspensions(value, rank, tail)));
    }
    match rest.force()?.clone() {
        None => Ok(Some(first_node)),
        // `rest_min` was only a lower bound; the realized head may still
        // outrank `first`, so fall back to rank comparison.
        Some(second) => Ok(merge_link(Some(first_node), Some(second), Rank::ZERO)),
    }
}
