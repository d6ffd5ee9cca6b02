//! Property-Based Tests for the pedigree ID sequence

use proptest::prelude::*;
use std::sync::Arc;

use crate::pedigree::{
    IdScheme, InMemoryPedigreeRepository, NewPedigree, PedigreeIdGenerator, PedigreeRepository,
};

fn suffix(id: &str) -> u64 {
    id.trim_start_matches("JCU").parse().unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // The suggestion is max(existing) + 1, padded to the scheme width.
    #[test]
    fn prop_next_is_max_plus_one(numbers in prop::collection::hash_set(1..9_999_998u64, 1..20)) {
        let scheme = IdScheme::default();
        let ids: Vec<String> = numbers.iter().map(|n| scheme.render(*n)).collect();
        let latest = ids.iter().max().cloned();

        let next = scheme.next_after(latest.as_deref()).unwrap();

        let max = numbers.iter().max().copied().unwrap();
        prop_assert_eq!(next.len(), 3 + 7);
        prop_assert_eq!(suffix(&next), max + 1);
        prop_assert!(ids.iter().all(|id| id.as_str() < next.as_str()));
    }

    // Rendering keeps the fixed width for every number that fits it.
    #[test]
    fn prop_render_fixed_width(n in 0..10_000_000u64) {
        let rendered = IdScheme::default().render(n);
        prop_assert_eq!(rendered.len(), 10);
        prop_assert!(rendered.starts_with("JCU"));
        prop_assert_eq!(suffix(&rendered), n);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    // End to end through the repository: the generator reads the greatest stored ID.
    #[test]
    fn prop_generator_reads_store(numbers in prop::collection::hash_set(1..100_000u64, 1..10)) {
        let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
        let max = numbers.iter().max().copied().unwrap();

        let next = runtime.block_on(async {
            let repository = Arc::new(InMemoryPedigreeRepository::new());
            for n in &numbers {
                repository
                    .insert(NewPedigree {
                        pedigree_id: IdScheme::default().render(*n),
                        ..Default::default()
                    })
                    .await
                    .unwrap();
            }
            PedigreeIdGenerator::new(IdScheme::default(), repository)
                .next_id()
                .await
                .unwrap()
        });

        prop_assert_eq!(next, IdScheme::default().render(max + 1));
    }
}
