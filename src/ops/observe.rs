//! Conditioning: filter on evidence, then renormalize.
//!
//! `observe` keeps the alternatives compatible with the evidence and slides
//! their ranks down so the best survivor sits at rank 0, preserving all
//! pairwise rank differences. Impossible (infinite-rank) survivors are
//! dropped outright; conditioning never surfaces them.

use std::sync::Arc;

use crate::error::Result;
use crate::node::{Link, Node};
use crate::ops::filter::filter_link;
use crate::rank::Rank;
use crate::ranking::{Deduplication, Ranking};
use crate::suspension::Suspension;

impl<T: Clone + Send + Sync + 'static> Ranking<T> {
    /// Condition on `predicate`: filter, then renormalize so the first
    /// surviving rank is zero.
    ///
    /// # Errors
    /// Fails if the predicate (or a force it needs) fails while locating
    /// the first survivor; later failures surface lazily.
    pub fn observe<P>(&self, predicate: P, dedup: Deduplication) -> Result<Ranking<T>>
    where
        P: Fn(&T) -> Result<bool> + Send + Sync + 'static,
    {
        let filtered = filter_link(self.head(), Arc::new(predicate))?;
        let Some(head) = &filtered else {
            return Ok(Ranking::from_head(None, dedup));
        };
        let delta = head.rank();
        if delta.is_infinity() {
            // Nothing survives as finite evidence.
            return Ok(Ranking::from_head(None, dedup));
        }
        Ok(Ranking::from_head(normalize_link(filtered, delta)?, dedup))
    }

    /// Condition on equality with `value`.
    ///
    /// # Errors
    /// As [`observe`](Ranking::observe).
    pub fn observe_value(&self, value: T, dedup: Deduplication) -> Result<Ranking<T>>
    where
        T: PartialEq,
    {
        self.observe(move |candidate| Ok(*candidate == value), dedup)
    }
}

/// Lazily subtract `delta` from every rank, truncating at the first
/// infinite rank. Values are untouched; ranks are rewritten eagerly on
/// each produced node.
fn normalize_link<T>(link: Link<T>, delta: Rank) -> Result<Link<T>>
where
    T: Clone + Send + Sync + 'static,
{
    let Some(node) = link else {
        return Ok(None);
    };
    if node.rank().is_infinity() {
        return Ok(None);
    }
    let rank = node.rank().checked_sub(delta)?;
    let value = node.value_suspension();
    let tail = Suspension::new(move || normalize_link(node.next()?, delta));
    Ok(Some(Node::from_suspensions(value, rank, tail)))
}
