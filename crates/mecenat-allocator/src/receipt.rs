//! Plain-text donation receipts.
//!
//! Pure formatting over either the live allocator state (preview before
//! submission) or a stored [`DonationRecord`]. The line format is fixed;
//! a download/export collaborator is expected to wrap the text into a file.

use chrono::Utc;
use mecenat_types::{DonationRecord, derive_amount, fmt_euro};

use crate::donation::DonationAllocator;

const HEADER: &str = "Mécénat culturel — Reçu de don";
const FOOTER: &str = "Merci pour votre soutien à la vie culturelle.";

/// Render a preview receipt from the live allocator state, with a
/// timestamp-based reference. Zero-percent territorial lines are kept so
/// the donor sees the full configuration.
pub fn render_live(allocator: &DonationAllocator) -> String {
    let reference = format!("r-{}", Utc::now().timestamp_millis());
    render_live_with_reference(allocator, &reference)
}

/// Same as [`render_live`] with a caller-chosen reference.
pub fn render_live_with_reference(allocator: &DonationAllocator, reference: &str) -> String {
    let total = allocator.total_amount();
    let mut lines = vec![
        HEADER.to_string(),
        format!("Référence : {reference}"),
        format!("Date : {}", Utc::now().date_naive()),
        format!("Montant : {}", fmt_euro(total)),
        String::new(),
        "Répartition :".to_string(),
    ];
    for row in allocator.level_rows() {
        lines.push(format!(
            " - {} : {}% → {}",
            row.label,
            row.percent,
            fmt_euro(row.amount as f64)
        ));
    }
    if !allocator.selected_projects().is_empty() {
        lines.push("Projets ciblés :".to_string());
        for project in allocator.selected_projects() {
            lines.push(format!(
                " - {} : {}% → {}",
                project.title,
                project.percent,
                fmt_euro(project.amount as f64)
            ));
        }
    }
    lines.push(String::new());
    lines.push(FOOTER.to_string());
    lines.join("\n")
}

/// Render the receipt of a stored record. Breakdown lines are keyed by the
/// raw level key and zero-percent lines are omitted.
pub fn render_record(record: &DonationRecord) -> String {
    let mut lines = vec![
        HEADER.to_string(),
        format!("Référence : {}", record.id),
        format!("Date : {}", record.date),
        format!("Montant : {}", fmt_euro(record.amount)),
        String::new(),
        "Répartition :".to_string(),
    ];
    for (key, percent) in &record.breakdown {
        if *percent == 0 {
            continue;
        }
        let amount = derive_amount(f64::from(*percent), record.amount);
        lines.push(format!(" - {key} : {percent}% → {}", fmt_euro(amount as f64)));
    }
    lines.push(String::new());
    lines.push(FOOTER.to_string());
    lines.join("\n")
}

/// File name an export collaborator should use for a rendered receipt.
pub fn receipt_file_name(reference: &str) -> String {
    format!("mecenat_recu_{reference}.txt")
}
