//! Lazy value transformation.
//!
//! `map` copies ranks eagerly onto the new nodes and suspends the function
//! application, so a mapped sequence can be merged and ordered without ever
//! running the mapping function. `map_with_rank` is the exception: the
//! function chooses the new rank, and ranks must be realized on every node,
//! so the function runs once at node-construction time and the value
//! component is extracted lazily from the same memoized computation.

use std::sync::Arc;

use crate::error::Result;
use crate::node::{Link, Node};
use crate::rank::Rank;
use crate::ranking::{Deduplication, Ranking};
use crate::suspension::Suspension;

impl<T: Clone + Send + Sync + 'static> Ranking<T> {
    /// Transform every value, preserving ranks. Fully lazy: `f` runs only
    /// when a produced node's value is forced.
    pub fn map<U, F>(&self, f: F, dedup: Deduplication) -> Ranking<U>
    where
        U: Clone + Send + Sync + 'static,
        F: Fn(&T) -> Result<U> + Send + Sync + 'static,
    {
        Ranking::from_head(map_link(self.head(), Arc::new(f)), dedup)
    }

    /// Like [`map`](Ranking::map), but `f` also receives the zero-based
    /// position of the element.
    pub fn map_with_index<U, F>(&self, f: F, dedup: Deduplication) -> Ranking<U>
    where
        U: Clone + Send + Sync + 'static,
        F: Fn(&T, usize) -> Result<U> + Send + Sync + 'static,
    {
        Ranking::from_head(map_index_link(self.head(), Arc::new(f), 0), dedup)
    }

    /// Transform value *and* rank. The produced rank is realized once per
    /// node, which runs `f` eagerly as each node is built; the value side
    /// stays lazy, reading from the same memoized pair.
    ///
    /// # Errors
    /// Fails immediately if `f` fails on the head element; failures on
    /// later elements surface when their node is forced.
    pub fn map_with_rank<U, F>(&self, f: F, dedup: Deduplication) -> Result<Ranking<U>>
    where
        U: Clone + Send + Sync + 'static,
        F: Fn(&T, Rank) -> Result<(U, Rank)> + Send + Sync + 'static,
    {
        Ok(Ranking::from_head(
            map_rank_link(self.head(), Arc::new(f))?,
            dedup,
        ))
    }
}

fn map_link<T, U>(link: Link<T>, f: Arc<dyn Fn(&T) -> Result<U> + Send + Sync>) -> Link<U>
where
    T: Clone + Send + Sync + 'static,
    U: Clone + Send + Sync + 'static,
{
    let node = link?;
    let rank = node.rank();
    let value = {
        let node = node.clone();
        let f = Arc::clone(&f);
        Suspension::new(move || f(node.value()?))
    };
    let tail = Suspension::new(move || Ok(map_link(node.next()?, f)));
    Some(Node::from_suspensions(value, rank, tail))
}

fn map_index_link<T, U>(
    link: Link<T>,
    f: Arc<dyn Fn(&T, usize) -> Result<U> + Send + Sync>,
    index: usize,
) -> Link<U>
where
    T: Clone + Send + Sync + 'static,
    U: Clone + Send + Sync + 'static,
{
    let node = link?;
    let rank = node.rank();
    let value = {
        let node = node.clone();
        let f = Arc::clone(&f);
        Suspension::new(move || f(node.value()?, index))
    };
    let tail = Suspension::new(move || Ok(map_index_link(node.next()?, f, index + 1)));
    Some(Node::from_suspensions(value, rank, tail))
}

fn map_rank_link<T, U>(
    link: Link<T>,
    f: Arc<dyn Fn(&T, Rank) -> Result<(U, Rank)> + Send + Sync>,
) -> Result<Link<U>>
where
    T: Clone + Send + Sync + 'static,
    U: Clone + Send + Sync + 'static,
{
    let Some(node) = link else {
        return Ok(None);
    };
    let pair = {
        let node = node.clone();
        let f = Arc::clone(&f);
        Suspension::new(move || f(node.value()?, node.rank()))
    };
    // Downstream merges sort by this rank, so it cannot stay suspended.
    let rank = pair.force()?.1;
    let value = {
        let pair = pair.clone();
        Suspension::new(move || Ok(pair.force()?.0.clone()))
    };
    let tail = Suspension::new(move || map_rank_link(node.next()?, f));
    Ok(Some(Node::from_suspensions(value, rank, tail)))
}
