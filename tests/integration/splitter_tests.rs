//! Splitter property tests
//!
//! Seeded random workloads checked against the packing rules.

#[cfg(test)]
mod tests {
    use adaptive_dispatch::{ItemCost, TokenBudget, split_batches};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn random_costs(seed: u64, count: usize, max_input: u32, max_output: u32) -> Vec<ItemCost> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..count)
            .map(|_| ItemCost::new(rng.gen_range(0..=max_input), rng.gen_range(0..=max_output)))
            .collect()
    }

    #[test]
    fn test_every_item_placed_once_in_order() {
        for seed in 0..20 {
            let costs = random_costs(seed, 200, 800, 300);
            let items: Vec<(usize, ItemCost)> = costs.into_iter().enumerate().collect();
            let budget = TokenBudget::new(2000, 600).with_system_overhead(150);

            let batches = split_batches(items.clone(), &budget, |(_, cost)| *cost);

            let flattened: Vec<usize> = batches
                .iter()
                .flat_map(|b| b.items.iter().map(|(i, _)| *i))
                .collect();
            assert_eq!(flattened, (0..200).collect::<Vec<_>>(), "seed {}", seed);
            assert!(batches.iter().all(|b| !b.is_empty()));
        }
    }

    #[test]
    fn test_multi_item_batches_respect_budgets() {
        for seed in 0..20 {
            let costs = random_costs(seed, 300, 1500, 500);
            let budget = TokenBudget::new(3000, 900).with_system_overhead(200);

            let batches = split_batches(costs, &budget, |cost| *cost);

            for batch in &batches {
                let input: u64 = 200 + batch.items.iter().map(|c| u64::from(c.input_tokens)).sum::<u64>();
                let output: u64 = batch.items.iter().map(|c| u64::from(c.output_tokens)).sum();
                assert_eq!(batch.input_tokens, input);
                assert_eq!(batch.output_tokens, output);
                if batch.len() > 1 {
                    assert!(input <= 3000, "seed {} batch {}", seed, batch.index);
                    assert!(output <= 900, "seed {} batch {}", seed, batch.index);
                }
            }
        }
    }

    #[test]
    fn test_batches_are_maximal() {
        // Closing a batch early would waste a call: the next item must not have fit
        let costs = random_costs(7, 150, 700, 200);
        let budget = TokenBudget::new(2500, 500).with_system_overhead(100);

        let batches = split_batches(costs, &budget, |cost| *cost);

        for pair in batches.windows(2) {
            let next = pair[1].items[0];
            let fits_input = pair[0].input_tokens + u64::from(next.input_tokens) <= 2500;
            let fits_output = pair[0].output_tokens + u64::from(next.output_tokens) <= 500;
            assert!(!(fits_input && fits_output), "batch {} closed early", pair[0].index);
        }
    }

    #[test]
    fn test_oversized_items_stand_alone() {
        let costs = vec![
            ItemCost::new(100, 10),
            ItemCost::new(90_000, 10),
            ItemCost::new(100, 10),
            ItemCost::new(100, 5_000),
            ItemCost::new(100, 10),
        ];
        let budget = TokenBudget::new(60_000, 3_000).with_system_overhead(500);

        let batches = split_batches(costs, &budget, |cost| *cost);

        let sizes: Vec<usize> = batches.iter().map(|b| b.len()).collect();
        assert_eq!(sizes, vec![1, 1, 1, 1, 1]);
    }

    #[test]
    fn test_same_input_same_boundaries() {
        let costs = random_costs(99, 500, 400, 100);
        let budget = TokenBudget::new(1800, 450).with_system_overhead(60);

        let first = split_batches(costs.clone(), &budget, |cost| *cost);
        let second = split_batches(costs, &budget, |cost| *cost);

        assert_eq!(first, second);
    }
}
