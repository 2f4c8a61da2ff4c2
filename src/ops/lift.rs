//! Point-wise lifting of binary operations over rankings.
//!
//! Lifting forms the cartesian product of two rankings: for every pair of
//! values it emits `op(lhs, rhs)` at the sum of their ranks, in
//! non-decreasing rank order. Two independently graded beliefs combine
//! into a graded belief about the combination, with surprise adding up.
//! Built on the bind: apply to each left value a mapped copy of the right
//! ranking, so the product is as lazy as its factors.
//!
//! The named wrappers lift the standard arithmetic and comparison
//! operators. Arithmetic behaves exactly as it does on the value type,
//! including its overflow discipline.

use std::sync::Arc;

use crate::error::Result;
use crate::ranking::{Deduplication, Ranking};

impl<T: Clone + Send + Sync + 'static> Ranking<T> {
    /// Combine with `other` point-wise: every pair of values, ranks added.
    ///
    /// The inner traversal of `other` keeps `other`'s dedup flag; `dedup`
    /// selects the flag of the result.
    ///
    /// # Errors
    /// Fails if `op` (or a force it depends on) fails while the head is
    /// being produced; later failures surface lazily.
    pub fn lift2<U, V, F>(
        &self,
        other: &Ranking<U>,
        op: F,
        dedup: Deduplication,
    ) -> Result<Ranking<V>>
    where
        U: Clone + Send + Sync + 'static,
        V: Clone + Send + Sync + 'static,
        F: Fn(&T, &U) -> Result<V> + Send + Sync + 'static,
    {
        let rhs = other.clone();
        let rhs_dedup = other.dedup();
        let op = Arc::new(op);
        self.merge_apply(
            move |lhs_value| {
                let lhs_value = lhs_value.clone();
                let op = Arc::clone(&op);
                Ok(rhs.map(move |rhs_value| op(&lhs_value, rhs_value), rhs_dedup))
            },
            dedup,
        )
    }

    /// Point-wise sum.
    ///
    /// # Errors
    /// As [`lift2`](Ranking::lift2).
    pub fn lift_add(&self, other: &Ranking<T>, dedup: Deduplication) -> Result<Ranking<T>>
    where
        T: std::ops::Add<Output = T>,
    {
        self.lift2(other, |a, b| Ok(a.clone() + b.clone()), dedup)
    }

    /// Point-wise difference.
    ///
    /// # Errors
    /// As [`lift2`](Ranking::lift2).
    pub fn lift_sub(&self, other: &Ranking<T>, dedup: Deduplication) -> Result<Ranking<T>>
    where
        T: std::ops::Sub<Output = T>,
    {
        self.lift2(other, |a, b| Ok(a.clone() - b.clone()), dedup)
    }

    /// Point-wise product.
    ///
    /// # Errors
    /// As [`lift2`](Ranking::lift2).
    pub fn lift_mul(&self, other: &Ranking<T>, dedup: Deduplication) -> Result<Ranking<T>>
    where
        T: std::ops::Mul<Output = T>,
    {
        self.lift2(other, |a, b| Ok(a.clone() * b.clone()), dedup)
    }

    /// Point-wise quotient. Division follows the value type's own rules,
    /// including its division-by-zero behaviour.
    ///
    /// # Errors
    /// As [`lift2`](Ranking::lift2).
    pub fn lift_div(&self, other: &Ranking<T>, dedup: Deduplication) -> Result<Ranking<T>>
    where
        T: std::ops::Div<Output = T>,
    {
        self.lift2(other, |a, b| Ok(a.clone() / b.clone()), dedup)
    }

    /// Point-wise equality test.
    ///
    /// # Errors
    /// As [`lift2`](Ranking::lift2).
    pub fn lift_eq(&self, other: &Ranking<T>, dedup: Deduplication) -> Result<Ranking<bool>>
    where
        T: PartialEq,
    {
        self.lift2(other, |a, b| Ok(a == b), dedup)
    }

    /// Point-wise inequality test.
    ///
    /// # Errors
    /// As [`lift2`](Ranking::lift2).
    pub fn lift_ne(&self, other: &Ranking<T>, dedup: Deduplication) -> Result<Ranking<bool>>
    where
        T: PartialEq,
    {
        self.lift2(other, |a, b| Ok(a != b), dedup)
    }

    /// Point-wise `<` test.
    ///
    /// # Errors
    /// As [`lift2`](Ranking::lift2).
    pub fn lift_lt(&self, other: &Ranking<T>, dedup: Deduplication) -> Result<Ranking<bool>>
    where
        T: PartialOrd,
    {
        self.lift2(other, |a, b| Ok(a < b), dedup)
    }

    /// Point-wise `<=` test.
    ///
    /// # Errors
    /// As [`lift2`](Ranking::lift2).
    pub fn lift_le(&self, other: &Ranking<T>, dedup: Deduplication) -> Result<Ranking<bool>>
    where
        T: PartialOrd,
    {
        self.lift2(other, |a, b| Ok(a <= b), dedup)
    }

    /// Point-wise `>` test.
    ///
    /// # Errors
    /// As [`lift2`](Ranking::lift2).
    pub fn lift_gt(&self, other: &Ranking<T>, dedup: Deduplication) -> Result<Ranking<bool>>
    where
        T: PartialOrd,
    {
        self.lift2(other, |a, b| Ok(a > b), dedup)
    }

    /// Point-wise `>=` test.
    ///
    /// # Errors
    /// As [`lift2`](Ranking::lift2).
    pub fn lift_ge(&self, other: &Ranking<T>, dedup: Deduplication) -> Result<Ranking<bool>>
    where
        T: PartialOrd,
    {
        self.lift2(other, |a, b| Ok(a >= b), dedup)
    }
}
