//! End-to-end scenarios exercising the algebra the way ranked programs
//! compose it: chained binds, conditioning, call-counting for laziness,
//! and failure replay.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use ranked::{Deduplication, Error, Rank, Ranking};

fn rank(v: u64) -> Rank {
    Rank::from_value(v).unwrap()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Game {
    prize: u8,
    pick: u8,
    host: u8,
}

/// Minimum rank at which `target` appears, scanning a rank-sorted prefix.
fn min_rank_of<T: Clone + PartialEq + Send + Sync + 'static>(
    ranking: &Ranking<T>,
    target: &T,
    horizon: usize,
) -> Option<Rank> {
    ranking
        .take_n(horizon)
        .unwrap()
        .into_iter()
        .find(|(value, _)| value == target)
        .map(|(_, rank)| rank)
}

#[test]
fn monty_hall_favours_switching() {
    let doors: Vec<u8> = vec![0, 1, 2];

    let prize = Ranking::from_values_uniform(doors.clone(), Rank::ZERO, Deduplication::Disabled);
    let games = prize
        .merge_apply(
            move |&prize| {
                let picks =
                    Ranking::from_values_uniform(vec![0u8, 1, 2], Rank::ZERO, Deduplication::Disabled);
                picks.merge_apply(
                    move |&pick| {
                        let options: Vec<Game> = (0u8..3)
                            .filter(|&door| door != prize && door != pick)
                            .map(|host| Game { prize, pick, host })
                            .collect();
                        if options.len() == 1 {
                            // The host's hand is forced.
                            Ok(Ranking::from_values_uniform(
                                options,
                                Rank::ZERO,
                                Deduplication::Disabled,
                            ))
                        } else {
                            // A free choice is one degree surprising
                            // whichever door it lands on.
                            Ok(Ranking::from_values_uniform(
                                options,
                                Rank::from_value(1)?,
                                Deduplication::Disabled,
                            ))
                        }
                    },
                    Deduplication::Disabled,
                )
            },
            Deduplication::Disabled,
        )
        .unwrap();

    let host_opened_one = games
        .observe(|game| Ok(game.host == 1), Deduplication::Disabled)
        .unwrap();

    let switch_wins = host_opened_one
        .map(|game| Ok(game.prize != game.pick), Deduplication::Disabled);
    let stay_wins = host_opened_one
        .map(|game| Ok(game.prize == game.pick), Deduplication::Disabled);

    let switch_true = min_rank_of(&switch_wins, &true, 32).unwrap();
    let switch_false = min_rank_of(&switch_wins, &false, 32).unwrap();
    assert!(switch_true < switch_false);

    let stay_true = min_rank_of(&stay_wins, &true, 32).unwrap();
    let stay_false = min_rank_of(&stay_wins, &false, 32).unwrap();
    assert!(stay_true > stay_false);
}

#[test]
fn fibonacci_generator_forces_only_the_observed_prefix() {
    fn fib(n: u64) -> u64 {
        let (mut a, mut b) = (0u64, 1u64);
        for _ in 0..n {
            let next = a + b;
            a = b;
            b = next;
        }
        a
    }

    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let fibs = Ranking::from_generator(
        move |i| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok((fib(i), Rank::from_value(i)?))
        },
        0,
        Deduplication::Disabled,
    )
    .unwrap();

    // Construction realizes exactly the head.
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(fibs.first().unwrap(), Some((0, Rank::ZERO)));
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    let prefix = fibs.take_n(7).unwrap();
    assert_eq!(
        prefix,
        vec![
            (0, rank(0)),
            (1, rank(1)),
            (1, rank(2)),
            (2, rank(3)),
            (3, rank(4)),
            (5, rank(5)),
            (8, rank(6)),
        ]
    );
    let total = calls.load(Ordering::SeqCst);
    assert!((7..=8).contains(&total), "forced {total} generator calls");
}

#[test]
fn failing_computation_replays_identically() {
    let source =
        Ranking::from_values_sequential(vec![1, 2, 0, 4], Rank::ZERO, Deduplication::Disabled)
            .unwrap();
    let quotients = source.map(
        |x| {
            if *x == 0 {
                Err(Error::callback("division by zero"))
            } else {
                Ok(10 / x)
            }
        },
        Deduplication::Disabled,
    );

    let err = quotients.take_n(4).unwrap_err();
    assert_eq!(err, Error::callback("division by zero"));

    // A fresh pass yields the same elements and then the identical error
    // at the same step.
    let mut replay = quotients.iter();
    assert_eq!(replay.next().unwrap().unwrap(), (10, rank(0)));
    assert_eq!(replay.next().unwrap().unwrap(), (5, rank(1)));
    assert_eq!(replay.next().unwrap().unwrap_err(), err);
    assert!(replay.next().is_none());
}

#[test]
fn memoization_spans_independent_iterators() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let source =
        Ranking::from_values_sequential(vec![1, 2, 3], Rank::ZERO, Deduplication::Disabled)
            .unwrap();
    let mapped = source.map(
        move |x| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(x * x)
        },
        Deduplication::Disabled,
    );

    let first_pass: Vec<_> = mapped.iter().map(Result::unwrap).collect();
    let second_pass: Vec<_> = mapped.iter().map(Result::unwrap).collect();
    assert_eq!(first_pass, second_pass);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[test]
fn sensor_pipeline_composes_nrm_exc_bind_and_observe() {
    // A sensor normally reports the true level, exceptionally drifts +1;
    // two chained readings conditioned on the second reading being 6.
    let level = Ranking::from_values_uniform(vec![4i64, 5, 6], Rank::ZERO, Deduplication::Disabled);

    let readings = level
        .merge_apply(
            |&actual| {
                Ranking::singleton(actual, Rank::ZERO).normal_exceptional(
                    move || Ok(Ranking::singleton(actual + 1, Rank::ZERO)),
                    Rank::from_value(1)?,
                    Deduplication::Disabled,
                )
            },
            Deduplication::Disabled,
        )
        .unwrap();

    let observed = readings
        .observe_value(6, Deduplication::Disabled)
        .unwrap();

    // Normally a true 6; one degree surprising, a drifted 5.
    assert_eq!(observed.first().unwrap(), Some((6, Rank::ZERO)));
    assert_eq!(observed.size().unwrap(), 2);
    assert_eq!(
        observed.take_n(10).unwrap(),
        vec![(6, Rank::ZERO), (6, rank(1))]
    );
}
