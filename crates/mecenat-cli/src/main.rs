//! Terminal demo adapter for the Mécénat allocation engines.
//!
//! Plays the role of the dashboard rendering layer: translates commands
//! into engine calls and prints the query results back. Holds no state of
//! its own.

use anyhow::Result;
use clap::{Parser, Subcommand};
use mecenat_allocator::{AdjustmentBand, CapAllocator, DonationAllocator, receipt};
use mecenat_types::fmt_euro;
use tracing::info;

#[derive(Parser)]
#[command(name = "mecenat", about = "Demo dashboards of the Mécénat allocation engines")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Donor dashboard: distribute a donation across territorial levels
    Donor {
        /// Donation amount in euros
        #[arg(long, default_value_t = 120.0)]
        amount: f64,
        /// Target a catalog project (may be repeated)
        #[arg(long = "project")]
        projects: Vec<u32>,
        /// Split evenly across levels and targeted projects first
        #[arg(long)]
        auto: bool,
    },
    /// Owner dashboard: draw the project cost from the funding levels
    Owner {
        /// Run the fill heuristic before reporting
        #[arg(long)]
        auto: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mecenat=info".into()),
        )
        .with_target(false)
        .init();

    match Cli::parse().command {
        Command::Donor { amount, projects, auto } => run_donor(amount, &projects, auto),
        Command::Owner { auto } => run_owner(auto),
    }
}

fn run_donor(amount: f64, projects: &[u32], auto: bool) -> Result<()> {
    let mut allocator = DonationAllocator::sample();
    let clamped = allocator.set_total_amount(amount);
    if clamped.clamped {
        info!(requested = amount, stored = clamped.value, "amount clamped");
    }
    for &id in projects {
        if !allocator.add_project(id) {
            info!(id, "project not added (unknown or already targeted)");
        }
    }
    if auto {
        allocator.auto_distribute();
    }

    println!("Don : {}  (coût net estimé : {})", fmt_euro(allocator.total_amount()), fmt_euro(allocator.net_cost() as f64));
    println!();
    for row in allocator.level_rows() {
        println!("  {:<28} {:>3}%  {:>10}", row.label, row.percent, fmt_euro(row.amount as f64));
    }
    for project in allocator.selected_projects() {
        println!("  {:<28} {:>3}%  {:>10}", project.title, project.percent, fmt_euro(project.amount as f64));
    }
    println!();

    let summary = allocator.summary();
    println!("Total : {}% — {}", summary.total_percent, summary.status);
    if summary.valid {
        let record = allocator.submit()?;
        println!();
        println!("{}", receipt::render_record(&record));
    }
    Ok(())
}

fn run_owner(auto: bool) -> Result<()> {
    let mut allocator = CapAllocator::sample();
    if auto {
        let outcome = allocator.auto_fill();
        if let Some(missing) = outcome.shortfall {
            println!("⚠ Capacité insuffisante : {} manquants.", fmt_euro(missing as f64));
        }
    }

    println!("Coût du projet : {}", fmt_euro(allocator.project_cost()));
    println!();
    for row in allocator.rows() {
        println!(
            "  {:<26} moyenne {:>9}  plafond {:>3}%  proposé {:>9} ({:+.1}%) {}",
            row.label,
            fmt_euro(row.mean),
            row.cap,
            fmt_euro(row.proposed as f64),
            row.percent,
            band_label(row.band),
        );
    }
    println!();

    let status = allocator.funding_status();
    println!("Total proposé : {} — {}", fmt_euro(allocator.total_allocated() as f64), status);
    if status.is_funded() {
        let applied = allocator.validate()?;
        println!();
        println!("Affectation validée. Ajustements enregistrés :");
        for adjustment in applied {
            println!("  {:<26} {:+}", adjustment.key, adjustment.delta);
        }
    }
    Ok(())
}

fn band_label(band: AdjustmentBand) -> &'static str {
    match band {
        AdjustmentBand::StrongBonus => "[bonus fort]",
        AdjustmentBand::Bonus => "[bonus]",
        AdjustmentBand::Balanced => "[équilibre]",
        AdjustmentBand::Raised => "[au-dessus]",
        AdjustmentBand::High => "[proche du plafond]",
        AdjustmentBand::Refused => "[refusé]",
    }
}
