//! Ways to build ranking sequences.
//!
//! Everything here except [`Ranking::from_generator`] builds its nodes
//! eagerly: the inputs are already materialized, so there is nothing to
//! defer. The generator constructor is the gateway to infinite rankings:
//! node *i* holds the generator's output for index *i* and a tail
//! suspension that computes node *i+1* on demand.
//!
//! Constructors do not validate rank monotonicity of user-supplied pairs
//! or rankers. Non-decreasing rank order is a promise of the operation
//! algebra, not of raw construction.

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::node::{Link, Node};
use crate::rank::Rank;
use crate::ranking::{Deduplication, Ranking};
use crate::suspension::Suspension;

impl<T: Clone + Send + Sync + 'static> Ranking<T> {
    /// The ranking with no elements.
    #[must_use]
    pub fn empty() -> Ranking<T> {
        Ranking::from_head(None, Deduplication::Enabled)
    }

    /// A single `(value, rank)` pair. Deduplication is irrelevant for one
    /// element.
    #[must_use]
    pub fn singleton(value: T, rank: Rank) -> Ranking<T> {
        Ranking::from_head(Some(Node::new(value, rank, None)), Deduplication::Enabled)
    }

    /// One node per pair, in input order, tails realized eagerly.
    #[must_use]
    pub fn from_list<I>(pairs: I, dedup: Deduplication) -> Ranking<T>
    where
        I: IntoIterator<Item = (T, Rank)>,
    {
        let mut link: Link<T> = None;
        let pairs: Vec<(T, Rank)> = pairs.into_iter().collect();
        for (value, rank) in pairs.into_iter().rev() {
            link = Some(Node::new(value, rank, link));
        }
        Ranking::from_head(link, dedup)
    }

    /// Every value at the same rank: equally plausible alternatives.
    #[must_use]
    pub fn from_values_uniform<I>(values: I, rank: Rank, dedup: Deduplication) -> Ranking<T>
    where
        I: IntoIterator<Item = T>,
    {
        Ranking::from_list(values.into_iter().map(|v| (v, rank)), dedup)
    }

    /// Value *i* at rank `start + i`.
    ///
    /// # Errors
    /// Fails with [`Error::RankOverflow`] if a computed rank exceeds the
    /// finite maximum.
    pub fn from_values_sequential<I>(
        values: I,
        start: Rank,
        dedup: Deduplication,
    ) -> Result<Ranking<T>>
    where
        I: IntoIterator<Item = T>,
    {
        let mut pairs = Vec::new();
        for (index, value) in values.into_iter().enumerate() {
            let offset = Rank::from_value(index as u64)?;
            pairs.push((value, start.checked_add(offset)?));
        }
        Ok(Ranking::from_list(pairs, dedup))
    }

    /// Value *i* at rank `ranker(v_i, i)`.
    ///
    /// # Errors
    /// Propagates the first ranker failure.
    pub fn from_values_with_ranker<I, F>(
        values: I,
        ranker: F,
        dedup: Deduplication,
    ) -> Result<Ranking<T>>
    where
        I: IntoIterator<Item = T>,
        F: Fn(&T, usize) -> Result<Rank>,
    {
        let mut pairs = Vec::new();
        for (index, value) in values.into_iter().enumerate() {
            let rank = ranker(&value, index)?;
            pairs.push((value, rank));
        }
        Ok(Ranking::from_list(pairs, dedup))
    }

    /// An infinite ranking: node *i* carries `generator(start_index + i)`,
    /// and its tail computes node *i+1* when forced.
    ///
    /// Construction calls the generator exactly once, since the head's rank
    /// must be realized. Every later call happens when the corresponding
    /// tail is first forced, and is memoized from then on.
    ///
    /// # Errors
    /// Fails if the generator fails on the starting index; failures on
    /// later indices surface (stickily) at the force that reaches them.
    pub fn from_generator<G>(
        generator: G,
        start_index: u64,
        dedup: Deduplication,
    ) -> Result<Ranking<T>>
    where
        G: Fn(u64) -> Result<(T, Rank)> + Send + Sync + 'static,
    {
        let head = generator_node(Arc::new(generator), start_index)?;
        Ok(Ranking::from_head(Some(head), dedup))
    }

    /// Materialize any iterator, then assign sequential ranks from `start`.
    ///
    /// # Errors
    /// As [`Ranking::from_values_sequential`].
    pub fn from_range<I>(values: I, start: Rank, dedup: Deduplication) -> Result<Ranking<T>>
    where
        I: IntoIterator<Item = T>,
    {
        Ranking::from_values_sequential(values, start, dedup)
    }
}

fn generator_node<T>(
    generator: Arc<dyn Fn(u64) -> Result<(T, Rank)> + Send + Sync>,
    index: u64,
) -> Result<Node<T>>
where
    T: Clone + Send + Sync + 'static,
{
    let (value, rank) = generator(index)?;
    let tail = Suspension::new(move || {
        let next_index = index
            .checked_add(1)
            .ok_or_else(|| Error::invalid("generator index overflow"))?;
        Ok(Some(generator_node(generator, next_index)?))
    });
    Ok(Node::from_suspensions(Suspension::ready(value), rank, tail))
}
