use ranked::{Deduplication, Rank, Ranking};

fn main() {
    for _ in 0..200 {
        let naturals = Ranking::from_generator(
            |i| Ok((i, Rank::from_value(i / 3)?)),
            0,
            Deduplication::Disabled,
        )
        .unwrap();

        let bound = naturals
            .merge_apply(
                |&n| {
                    Ok(Ranking::from_list(
                        vec![(n, Rank::ZERO), (n + 7, Rank::from_value(2)?)],
                        Deduplication::Disabled,
                    ))
                },
                Deduplication::Disabled,
            )
            .unwrap();

        let observed = bound
            .observe(|n| Ok(n % 3 != 1), Deduplication::Disabled)
            .unwrap();

        let prefix = observed.take_n(2000).unwrap();
        assert_eq!(prefix.len(), 2000);
    }
}
