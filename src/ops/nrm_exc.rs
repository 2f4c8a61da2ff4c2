//! Normal/exceptional composition.
//!
//! The standard ranked-programming construct for "normally X, but
//! occasionally Y": the normal ranking merged with an exceptional ranking
//! shifted `delta` ranks less plausible. The exceptional side is supplied
//! as a thunk and realized through a suspension, so exceptional
//! alternatives are only ever built when the forced prefix actually
//! reaches rank `delta`. Since exceptional ranks start at zero, `delta`
//! is a sound lower bound for the entire shifted branch, which is exactly
//! what the bounded merge needs.
//!
//! When `delta` is below the normal head's rank, exceptional elements come
//! out first; the merge handles that case, there is no normal-head
//! shortcut.

use crate::error::Result;
use crate::ops::{merge_bounded, shift_link};
use crate::rank::Rank;
use crate::ranking::{Deduplication, Ranking};
use crate::suspension::Suspension;

impl<T: Clone + Send + Sync + 'static> Ranking<T> {
    /// Compose this ranking with an exceptional alternative `delta` ranks
    /// less plausible. Ties favour the normal side.
    ///
    /// # Errors
    /// Fails if this ranking is empty and the thunk or the shift fails
    /// while realizing the exceptional branch; later failures surface at
    /// the force that needs the exceptional elements.
    pub fn normal_exceptional<F>(
        &self,
        exceptional: F,
        delta: Rank,
        dedup: Deduplication,
    ) -> Result<Ranking<T>>
    where
        F: FnOnce() -> Result<Ranking<T>> + Send + 'static,
    {
        let Some(normal_head) = self.head() else {
            let realized = exceptional()?;
            return Ok(Ranking::from_head(
                shift_link(realized.head(), delta)?,
                dedup,
            ));
        };
        let rest = Suspension::new(move || {
            let realized = exceptional()?;
            shift_link(realized.head(), delta)
        });
        Ok(Ranking::from_head(
            merge_bounded(Some(normal_head), Some(rest), delta)?,
            dedup,
        ))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    use super::*;

    fn rank(v: u64) -> Rank {
        Rank::from_value(v).unwrap()
    }

    fn from_pairs(pairs: &[(i32, u64)]) -> Ranking<i32> {
        Ranking::from_list(
            pairs.iter().map(|&(v, r)| (v, rank(r))).collect::<Vec<_>>(),
            Deduplication::Disabled,
        )
    }

    #[test]
    fn exceptional_sits_delta_ranks_below_normal() {
        let composed = from_pairs(&[(1, 0)])
            .normal_exceptional(
                || Ok(Ranking::singleton(2, Rank::ZERO)),
                rank(1),
                Deduplication::Disabled,
            )
            .unwrap();
        assert_eq!(
            composed.take_n(10).unwrap(),
            vec![(1, Rank::ZERO), (2, rank(1))]
        );
    }

    #[test]
    fn empty_normal_yields_the_shifted_exceptional() {
        let composed = Ranking::<i32>::empty()
            .normal_exceptional(
                || Ok(from_pairs(&[(7, 0), (8, 1)])),
                rank(2),
                Deduplication::Disabled,
            )
            .unwrap();
        assert_eq!(
            composed.take_n(10).unwrap(),
            vec![(7, rank(2)), (8, rank(3))]
        );
    }

    #[test]
    fn exceptional_elements_can_precede_a_late_normal_head() {
        // Normal head at rank 3, exceptional shifted to rank 1: the
        // exceptional branch must come out first.
        let composed = from_pairs(&[(1, 3)])
            .normal_exceptional(
                || Ok(from_pairs(&[(2, 0), (3, 5)])),
                rank(1),
                Deduplication::Disabled,
            )
            .unwrap();
        assert_eq!(
            composed.take_n(10).unwrap(),
            vec![(2, rank(1)), (1, rank(3)), (3, rank(6))]
        );
    }

    #[test]
    fn normal_wins_ties_with_the_exceptional_branch() {
        let composed = from_pairs(&[(1, 0), (2, 1)])
            .normal_exceptional(
                || Ok(Ranking::singleton(9, Rank::ZERO)),
                rank(1),
                Deduplication::Disabled,
            )
            .unwrap();
        assert_eq!(
            composed.take_n(10).unwrap(),
            vec![(1, Rank::ZERO), (2, rank(1)), (9, rank(1))]
        );
    }

    #[test]
    fn thunk_runs_only_when_the_prefix_reaches_it() {
        let fired = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&fired);
        let normal = from_pairs(&[(1, 0), (2, 0), (3, 0)]);
        let composed = normal
            .normal_exceptional(
                move || {
                    flag.store(true, Ordering::SeqCst);
                    Ok(Ranking::singleton(99, Rank::ZERO))
                },
                rank(1),
                Deduplication::Disabled,
            )
            .unwrap();
        assert!(!fired.load(Ordering::SeqCst));
        // Two normal elements, both at rank 0 <= delta: no realization.
        assert_eq!(
            composed.take_n(2).unwrap(),
            vec![(1, Rank::ZERO), (2, Rank::ZERO)]
        );
        assert!(!fired.load(Ordering::SeqCst));
        // Walking past the normal branch finally builds the exceptional one.
        assert_eq!(composed.take_n(4).unwrap().len(), 4);
        assert!(fired.load(Ordering::SeqCst));
    }

    #[test]
    fn nested_composition_builds_graded_alternatives() {
        let composed = Ranking::singleton(1, Rank::ZERO)
            .normal_exceptional(
                || {
                    Ranking::singleton(2, Rank::ZERO).normal_exceptional(
                        || Ok(Ranking::singleton(3, Rank::ZERO)),
                        rank(1),
                        Deduplication::Disabled,
                    )
                },
                rank(1),
                Deduplication::Disabled,
            )
            .unwrap();
        assert_eq!(
            composed.take_n(10).unwrap(),
            vec![(1, Rank::ZERO), (2, rank(1)), (3, rank(2))]
        );
    }
}
