use proptest::prelude::*;
use ranked::{Deduplication, Rank, Ranking};

fn rank(v: u64) -> Rank {
    Rank::from_value(v).unwrap()
}

/// Pairs with non-decreasing ranks, as the operation algebra produces.
fn sorted_pairs() -> impl Strategy<Value = Vec<(i32, Rank)>> {
    prop::collection::vec((any::<i32>(), 0..1000u64), 0..40).prop_map(|mut raw| {
        raw.sort_by_key(|&(_, r)| r);
        raw.into_iter().map(|(v, r)| (v, rank(r))).collect()
    })
}

fn ranking_of(pairs: Vec<(i32, Rank)>) -> Ranking<i32> {
    Ranking::from_list(pairs, Deduplication::Disabled)
}

fn drain(ranking: &Ranking<i32>) -> Vec<(i32, Rank)> {
    ranking.iter().map(Result::unwrap).collect()
}

fn is_non_decreasing(pairs: &[(i32, Rank)]) -> bool {
    pairs.windows(2).all(|w| w[0].1 <= w[1].1)
}

fn multiset(pairs: &[(i32, Rank)]) -> Vec<(i32, Rank)> {
    let mut sorted = pairs.to_vec();
    sorted.sort_by_key(|&(v, r)| (r, v));
    sorted
}

proptest! {
    #[test]
    fn rank_addition_laws(a in 0..Rank::MAX_FINITE / 2, b in 0..Rank::MAX_FINITE / 2) {
        let ra = rank(a);
        let rb = rank(b);
        prop_assert_eq!(Rank::ZERO.checked_add(ra).unwrap(), ra);
        prop_assert_eq!(ra.checked_add(Rank::INFINITY).unwrap(), Rank::INFINITY);
        prop_assert_eq!(ra.min(Rank::INFINITY), ra);
        prop_assert_eq!(ra.checked_sub(ra).unwrap(), Rank::ZERO);
        prop_assert_eq!(
            ra.checked_add(rb).unwrap(),
            rb.checked_add(ra).unwrap()
        );
        // Exactly one of <, =, > holds.
        let relations = [ra < rb, ra == rb, ra > rb];
        prop_assert_eq!(relations.iter().filter(|&&x| x).count(), 1);
    }

    #[test]
    fn operations_preserve_rank_monotonicity(
        pairs_a in sorted_pairs(),
        pairs_b in sorted_pairs(),
        delta in 0..1000u64,
        threshold in 0..1000u64,
        n in 0..20usize,
    ) {
        let a = ranking_of(pairs_a);
        let b = ranking_of(pairs_b);

        prop_assert!(is_non_decreasing(&drain(&a.merge(&b, Deduplication::Disabled))));
        prop_assert!(is_non_decreasing(&drain(&a.shift_ranks(rank(delta)).unwrap())));
        prop_assert!(is_non_decreasing(&drain(&a.map(|x| Ok(x.wrapping_mul(3)), Deduplication::Disabled))));
        prop_assert!(is_non_decreasing(&drain(
            &a.filter(|x| Ok(x % 2 == 0), Deduplication::Disabled).unwrap()
        )));
        prop_assert!(is_non_decreasing(&drain(&a.take(n, Deduplication::Disabled))));
        prop_assert!(is_non_decreasing(&drain(&a.take_while_rank(rank(threshold), Deduplication::Disabled))));
        prop_assert!(is_non_decreasing(&drain(
            &a.observe(|x| Ok(*x >= 0), Deduplication::Disabled).unwrap()
        )));
        let bound = a
            .merge_apply(
                |x| {
                    Ok(Ranking::from_list(
                        vec![(*x, Rank::ZERO), (x.wrapping_add(1), Rank::from_value(2)?)],
                        Deduplication::Disabled,
                    ))
                },
                Deduplication::Disabled,
            )
            .unwrap();
        prop_assert!(is_non_decreasing(&drain(&bound)));
    }

    #[test]
    fn map_composes(pairs in sorted_pairs()) {
        let source = ranking_of(pairs);
        let two_steps = source
            .map(|x| Ok(x.wrapping_add(1)), Deduplication::Disabled)
            .map(|x| Ok(x.wrapping_mul(2)), Deduplication::Disabled);
        let one_step = source.map(|x| Ok(x.wrapping_add(1).wrapping_mul(2)), Deduplication::Disabled);
        prop_assert_eq!(drain(&two_steps), drain(&one_step));
    }

    #[test]
    fn filter_is_idempotent(pairs in sorted_pairs()) {
        let source = ranking_of(pairs);
        let once = source.filter(|x| Ok(x % 3 != 0), Deduplication::Disabled).unwrap();
        let twice = once.filter(|x| Ok(x % 3 != 0), Deduplication::Disabled).unwrap();
        prop_assert_eq!(drain(&once), drain(&twice));
    }

    #[test]
    fn take_commutes_with_prefix_materialization(
        pairs in sorted_pairs(),
        n in 0..30usize,
        m in 0..30usize,
    ) {
        let source = ranking_of(pairs);
        let taken = source.take(n, Deduplication::Disabled);
        prop_assert_eq!(
            taken.take_n(m).unwrap(),
            source.take_n(n.min(m)).unwrap()
        );
    }

    #[test]
    fn merge_content_is_order_independent(
        pairs_a in sorted_pairs(),
        pairs_b in sorted_pairs(),
    ) {
        let a = ranking_of(pairs_a);
        let b = ranking_of(pairs_b);
        let ab = drain(&a.merge(&b, Deduplication::Disabled));
        let ba = drain(&b.merge(&a, Deduplication::Disabled));
        prop_assert_eq!(multiset(&ab), multiset(&ba));
        prop_assert_eq!(ab.len(), drain(&a).len() + drain(&b).len());
    }

    #[test]
    fn merge_tie_break_prefers_the_left_argument(
        values_a in prop::collection::vec(any::<i32>(), 1..10),
        values_b in prop::collection::vec(any::<i32>(), 1..10),
        tie in 0..100u64,
    ) {
        let a = Ranking::from_values_uniform(values_a.clone(), rank(tie), Deduplication::Disabled);
        let b = Ranking::from_values_uniform(values_b.clone(), rank(tie), Deduplication::Disabled);
        let merged = drain(&a.merge(&b, Deduplication::Disabled));
        let expected: Vec<(i32, Rank)> = values_a
            .into_iter()
            .chain(values_b)
            .map(|v| (v, rank(tie)))
            .collect();
        prop_assert_eq!(merged, expected);
    }

    #[test]
    fn merge_apply_ranks_are_sums(pairs in sorted_pairs()) {
        let source = ranking_of(pairs.clone());
        let bound = source
            .merge_apply(
                |x| {
                    Ok(Ranking::from_list(
                        vec![(*x, Rank::ZERO), (*x, Rank::from_value(5)?)],
                        Deduplication::Disabled,
                    ))
                },
                Deduplication::Disabled,
            )
            .unwrap();
        for (value, emitted_rank) in drain(&bound) {
            let explainable = pairs.iter().any(|&(v, r)| {
                v == value
                    && (emitted_rank == r
                        || emitted_rank == r.checked_add(rank(5)).unwrap())
            });
            prop_assert!(explainable, "unexplained pair ({}, {})", value, emitted_rank);
        }
    }

    #[test]
    fn observe_renormalizes_and_keeps_differences(pairs in sorted_pairs()) {
        let source = ranking_of(pairs);
        let observed = source.observe(|x| Ok(x % 2 == 0), Deduplication::Disabled).unwrap();
        let filtered = source.filter(|x| Ok(x % 2 == 0), Deduplication::Disabled).unwrap();

        let observed_pairs = drain(&observed);
        let filtered_pairs = drain(&filtered);
        prop_assert_eq!(observed_pairs.len(), filtered_pairs.len());
        if let Some(&(_, first)) = observed_pairs.first() {
            prop_assert_eq!(first, Rank::ZERO);
        }
        for (obs, fil) in observed_pairs.windows(2).zip(filtered_pairs.windows(2)) {
            let obs_diff = obs[1].1.checked_sub(obs[0].1).unwrap();
            let fil_diff = fil[1].1.checked_sub(fil[0].1).unwrap();
            prop_assert_eq!(obs_diff, fil_diff);
        }
    }

    #[test]
    fn normal_exceptional_is_a_shifted_merge(
        pairs_a in sorted_pairs(),
        pairs_b in sorted_pairs(),
        delta in 0..100u64,
    ) {
        let normal = ranking_of(pairs_a);
        let exceptional = ranking_of(pairs_b);
        let thunk_source = exceptional.clone();
        let composed = normal
            .normal_exceptional(move || Ok(thunk_source), rank(delta), Deduplication::Disabled)
            .unwrap();
        let reference = normal.merge(
            &exceptional.shift_ranks(rank(delta)).unwrap(),
            Deduplication::Disabled,
        );
        prop_assert_eq!(multiset(&drain(&composed)), multiset(&drain(&reference)));
        prop_assert!(is_non_decreasing(&drain(&composed)));
    }

    #[test]
    fn dedup_iteration_collapses_consecutive_runs(
        values in prop::collection::vec(0..4i32, 0..30),
    ) {
        let source = Ranking::from_values_sequential(values.clone(), Rank::ZERO, Deduplication::Enabled).unwrap();
        let got: Vec<i32> = source.iter().map(|p| p.unwrap().0).collect();
        let mut expected = Vec::new();
        for v in values {
            if expected.last() != Some(&v) {
                expected.push(v);
            }
        }
        prop_assert_eq!(got, expected);
    }
}
