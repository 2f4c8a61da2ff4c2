#![no_main]
use libfuzzer_sys::fuzz_target;
use ranked::{Deduplication, Rank, Ranking};

fuzz_target!(|data: (Vec<(i32, u16)>, Vec<(i32, u16)>, u16)| {
    let (raw_a, raw_b, delta) = data;

    fn build(mut raw: Vec<(i32, u16)>) -> Ranking<i32> {
        // Operations promise monotonic output only for monotonic input.
        raw.sort_by_key(|&(_, r)| r);
        let pairs: Vec<(i32, Rank)> = raw
            .into_iter()
            .map(|(v, r)| (v, Rank::from_value(r as u64).unwrap()))
            .collect();
        Ranking::from_list(pairs, Deduplication::Disabled)
    }

    fn is_monotonic(ranking: &Ranking<i32>) -> bool {
        let pairs: Vec<(i32, Rank)> = ranking.iter().map(Result::unwrap).collect();
        pairs.windows(2).all(|w| w[0].1 <= w[1].1)
    }

    let a = build(raw_a);
    let b = build(raw_b);
    let a_len = a.size().unwrap();
    let b_len = b.size().unwrap();

    let merged = a.merge(&b, Deduplication::Disabled);
    assert!(is_monotonic(&merged));
    assert_eq!(merged.size().unwrap(), a_len + b_len);

    let shifted = a.shift_ranks(Rank::from_value(delta as u64).unwrap()).unwrap();
    assert!(is_monotonic(&shifted));
    assert_eq!(shifted.size().unwrap(), a_len);

    let observed = a.observe(|v| Ok(v % 2 == 0), Deduplication::Disabled).unwrap();
    assert!(is_monotonic(&observed));
    if let Some((_, first_rank)) = observed.first().unwrap() {
        assert_eq!(first_rank, Rank::ZERO);
    }

    let composed = a
        .normal_exceptional(
            move || Ok(b),
            Rank::from_value(delta as u64).unwrap(),
            Deduplication::Disabled,
        )
        .unwrap();
    assert!(is_monotonic(&composed));
    assert_eq!(composed.size().unwrap(), a_len + b_len);
});
