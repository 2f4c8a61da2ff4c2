//! Ranked cons cells: the spine of every ranking sequence.
//!
//! A [`Node`] pairs a lazily produced value with an eagerly realized rank
//! and a lazily produced tail. The asymmetry is deliberate: the operation
//! algebra orders and merges by rank, so ranks must be available without
//! touching payloads, while values stay suspended until someone actually
//! reads them. Nodes are immutable and shared; several live sequences may
//! reference the same node and its transitive tails.

use std::fmt;
use std::sync::Arc;

use crate::error::Result;
use crate::rank::Rank;
use crate::suspension::Suspension;

/// A forced tail: the next node, or the end of the sequence.
pub type Link<T> = Option<Node<T>>;

struct NodeInner<T> {
    value: Suspension<T>,
    rank: Rank,
    tail: Suspension<Link<T>>,
}

/// An immutable ranked cons cell.
///
/// Cloning a `Node` clones a shared handle; the underlying cell, its
/// memoized value, and its memoized tail are never duplicated.
pub struct Node<T> {
    inner: Arc<NodeInner<T>>,
}

impl<T> Clone for Node<T> {
    fn clone(&self) -> Self {
        Node {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Send + Sync + 'static> Node<T> {
    /// An eager node: realized value, realized tail.
    pub fn new(value: T, rank: Rank, tail: Link<T>) -> Node<T> {
        Node::from_suspensions(Suspension::ready(value), rank, Suspension::ready(tail))
    }

    /// A node from pre-built suspensions. The rank is always realized.
    pub fn from_suspensions(
        value: Suspension<T>,
        rank: Rank,
        tail: Suspension<Link<T>>,
    ) -> Node<T> {
        Node {
            inner: Arc::new(NodeInner { value, rank, tail }),
        }
    }

    /// A node with a realized value and a deferred tail computation.
    pub fn with_lazy_tail<F>(value: T, rank: Rank, tail: F) -> Node<T>
    where
        F: FnOnce() -> Result<Link<T>> + Send + 'static,
    {
        Node::from_suspensions(Suspension::ready(value), rank, Suspension::new(tail))
    }

    /// Force and borrow the payload.
    ///
    /// # Errors
    /// Propagates the stored failure of the value suspension.
    pub fn value(&self) -> Result<&T> {
        self.inner.value.force()
    }

    /// The rank of this node. Never forces anything.
    #[must_use]
    pub fn rank(&self) -> Rank {
        self.inner.rank
    }

    /// Force the tail and return the next node, if any.
    ///
    /// # Errors
    /// Propagates the stored failure of the tail suspension.
    pub fn next(&self) -> Result<Link<T>> {
        Ok(self.inner.tail.force()?.clone())
    }

    /// Whether this is the last node. Forces the tail.
    ///
    /// # Errors
    /// Propagates the stored failure of the tail suspension.
    pub fn is_last(&self) -> Result<bool> {
        Ok(self.inner.tail.force()?.is_none())
    }

    /// Handle identity: do two handles name the same cell?
    #[must_use]
    pub fn ptr_eq(a: &Node<T>, b: &Node<T>) -> bool {
        Arc::ptr_eq(&a.inner, &b.inner)
    }

    /// Share the value suspension so an operation can re-emit the payload
    /// without forcing or re-wrapping it.
    pub(crate) fn value_suspension(&self) -> Suspension<T> {
        self.inner.value.clone()
    }

    /// Share the tail suspension.
    pub(crate) fn tail_suspension(&self) -> Suspension<Link<T>> {
        self.inner.tail.clone()
    }
}

impl<T> fmt::Debug for Node<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("rank", &self.inner.rank)
            .field("value", &self.inner.value)
            .field("tail", &self.inner.tail)
            .finish()
    }
}
