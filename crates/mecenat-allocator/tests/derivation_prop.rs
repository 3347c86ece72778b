//! Property: every derived euro amount equals `round(percent/100 × base)`,
//! whichever engine produced it.

use mecenat_allocator::{CapAllocator, DonationAllocator, samples};
use mecenat_types::{FundingLevel, LevelKind};
use proptest::prelude::*;

proptest! {
    #[test]
    fn donor_amounts_follow_the_derivation_rule(
        percent in 5..=75i32,
        amount in 1.0..10_000.0f64,
    ) {
        let mut alloc = DonationAllocator::new(
            samples::territorial_levels(),
            samples::project_catalog(),
            amount,
        );
        alloc.set_level_percent("region", percent).unwrap();
        let expected = (f64::from(percent) / 100.0 * amount).round() as i64;
        prop_assert_eq!(alloc.level_amount("region").unwrap(), expected);
    }

    #[test]
    fn owner_amounts_follow_the_mean_adjustment_rule(
        percent in -15..=15i32,
        total in 0.0..500_000.0f64,
        projects in 8..=2000u32,
    ) {
        // pools this size always carry the full structural cap
        let mut alloc = CapAllocator::new(1000.0, vec![FundingLevel {
            key: "pool".into(),
            kind: LevelKind::Region,
            label: "pool".into(),
            total,
            projects,
        }]);
        let mean = alloc.mean("pool").unwrap();
        let c = alloc.set_percent("pool", percent).unwrap();
        prop_assert!(!c.clamped);
        let expected = (mean * (1.0 + f64::from(percent) / 100.0)).round() as i64;
        prop_assert_eq!(alloc.proposed("pool").unwrap(), expected);
    }
}
