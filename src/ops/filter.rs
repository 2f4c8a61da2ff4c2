//! Predicate filtering and prefix-taking.
//!
//! `filter` cannot delay finding its first match: producing the head means
//! evaluating the predicate on candidates until one passes. That eager
//! probing repeats inside each surviving node's tail closure. The surviving
//! node shares the source value suspension, so the payload itself is forced
//! at most once no matter how often the predicate ran.
//!
//! `take` and `take_while_rank` never run user code at all; the first
//! counts down through tail closures, the second reads the eager ranks.

use std::sync::Arc;

use crate::error::Result;
use crate::node::{Link, Node};
use crate::ops::SharedPredicate;
use crate::rank::Rank;
use crate::ranking::{Deduplication, Ranking};
use crate::suspension::Suspension;

impl<T: Clone + Send + Sync + 'static> Ranking<T> {
    /// Keep only the values satisfying `predicate`, preserving ranks.
    ///
    /// # Errors
    /// Fails if the predicate (or a value force) fails while searching for
    /// the first surviving element; later failures surface lazily.
    pub fn filter<P>(&self, predicate: P, dedup: Deduplication) -> Result<Ranking<T>>
    where
        P: Fn(&T) -> Result<bool> + Send + Sync + 'static,
    {
        Ok(Ranking::from_head(
            filter_link(self.head(), Arc::new(predicate))?,
            dedup,
        ))
    }

    /// The first `count` elements, lazily.
    #[must_use]
    pub fn take(&self, count: usize, dedup: Deduplication) -> Ranking<T> {
        Ranking::from_head(take_link(self.head(), count), dedup)
    }

    /// The leading elements whose rank is at most `max_rank`. Ranks are
    /// eager on every node, so no value is forced.
    #[must_use]
    pub fn take_while_rank(&self, max_rank: Rank, dedup: Deduplication) -> Ranking<T> {
        Ranking::from_head(take_rank_link(self.head(), max_rank), dedup)
    }
}

pub(crate) fn filter_link<T>(mut link: Link<T>, predicate: SharedPredicate<T>) -> Result<Link<T>>
where
    T: Clone + Send + Sync + 'static,
{
    loop {
        let Some(node) = link else {
            return Ok(None);
        };
        if predicate(node.value()?)? {
            let rank = node.rank();
            let value = node.value_suspension();
            let tail = Suspension::new(move || filter_link(node.next()?, predicate));
            return Ok(Some(Node::from_suspensions(value, rank, tail)));
        }
        link = node.next()?;
    }
}

fn take_link<T>(link: Link<T>, remaining: usize) -> Link<T>
where
    T: Clone + Send + Sync + 'static,
{
    if remaining == 0 {
        return None;
    }
    let node = link?;
    let rank = node.rank();
    let value = node.value_suspension();
    let tail = Suspension::new(move || Ok(take_link(node.next()?, remaining - 1)));
    Some(Node::from_suspensions(value, rank, tail))
}

fn take_rank_link<T>(link: Link<T>, max_rank: Rank) -> Link<T>
where
    T: Clone + Send + Sync + 'static,
{
    let node = link?;
    if node.rank() > max_rank {
        return None;
    }
    let rank = node.rank();
    let value = node.value_suspension();
    let tail = Suspension::new(move || Ok(take_rank_link(node.next()?, max_rank)));
    Some(Node::from_suspensions(value, rank, tail))
}
