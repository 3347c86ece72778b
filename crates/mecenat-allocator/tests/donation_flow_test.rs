//! End-to-end donor scenarios: allocate, submit, reset, receipts.

use mecenat_allocator::donation::PROJECT_DEFAULT_PERCENT;
use mecenat_allocator::{AllocError, DonationAllocator, SummaryStatus, receipt, samples};

#[test]
fn default_allocation_at_100_euros_submits_and_resets() {
    let mut alloc = DonationAllocator::sample();
    alloc.set_total_amount(100.0);

    let summary = alloc.summary();
    assert_eq!(summary.total_percent, 100);
    assert_eq!(summary.total_amount, 100);
    assert!(summary.valid);
    assert_eq!(summary.status, SummaryStatus::Complete);
    assert_eq!(summary.status.to_string(), "Répartition complète.");

    let record = alloc.submit().expect("valid allocation should submit");
    assert_eq!(record.id, "d3"); // two seeded records already in history
    assert_eq!(record.amount, 100.0);
    assert_eq!(
        record.breakdown,
        vec![
            ("commune".to_string(), 20),
            ("commu".to_string(), 20),
            ("dept".to_string(), 20),
            ("region".to_string(), 20),
            ("country".to_string(), 20),
        ]
    );
    assert!(record.targets.is_empty());

    // history is most-recent-first and the session reset to defaults
    assert_eq!(alloc.history().len(), 3);
    assert_eq!(alloc.history()[0], record);
    assert!(alloc.selected_projects().is_empty());
    for row in alloc.level_rows() {
        assert_eq!(row.percent, 20);
    }
    assert_eq!(alloc.total_amount(), 100.0);
}

#[test]
fn submission_with_targeted_project_snapshots_the_breakdown() {
    let mut alloc =
        DonationAllocator::new(samples::territorial_levels(), samples::project_catalog(), 100.0);
    alloc.add_project(3);
    // pull commune back so the total lands on 100
    alloc.set_level_percent("commune", 15).unwrap();

    let summary = alloc.summary();
    assert_eq!(summary.total_percent, 100);
    assert!(summary.valid);

    let record = alloc.submit().expect("valid allocation should submit");
    assert_eq!(record.breakdown_percent("commune"), Some(15));
    assert_eq!(record.breakdown_percent("proj_3"), Some(PROJECT_DEFAULT_PERCENT));
    assert_eq!(record.targets.len(), 1);
    assert_eq!(record.targets[0].amount, 5);

    // projects are cleared, the record keeps them
    assert!(alloc.selected_projects().is_empty());
    assert_eq!(alloc.level_percent("commune").unwrap(), 20);
}

#[test]
fn submit_is_refused_while_the_allocation_is_invalid() {
    let mut alloc =
        DonationAllocator::new(samples::territorial_levels(), samples::project_catalog(), 100.0);
    alloc.set_level_percent("commune", 10).unwrap();

    let err = alloc.submit().unwrap_err();
    assert!(matches!(err, AllocError::PreconditionNotMet { operation: "submit", .. }));
    assert_eq!(err.category(), "precondition");
    // nothing was recorded
    assert!(alloc.history().is_empty());
}

#[test]
fn live_receipt_lists_every_level_and_targeted_project() {
    let mut alloc =
        DonationAllocator::new(samples::territorial_levels(), samples::project_catalog(), 120.0);
    alloc.add_project(1);

    let text = receipt::render_live_with_reference(&alloc, "r-1");
    assert!(text.starts_with("Mécénat culturel — Reçu de don\nRéférence : r-1\n"));
    assert!(text.contains("Montant : 120 €"));
    assert!(text.contains(" - Ma commune : 20% → 24 €"));
    assert!(text.contains(" - Mon pays : 20% → 24 €"));
    assert!(text.contains("Projets ciblés :"));
    assert!(text.contains(" - MJC - Atelier théâtre : 5% → 6 €"));
}

#[test]
fn stored_receipt_uses_the_recorded_breakdown() {
    let alloc = DonationAllocator::sample();
    let record = &alloc.history()[1]; // d2: 50 €, includes a 40% special line
    let text = receipt::render_record(record);
    assert!(text.contains("Référence : d2"));
    assert!(text.contains(" - special : 40% → 20 €"));
}
