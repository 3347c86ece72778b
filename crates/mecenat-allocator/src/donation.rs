//! Donor-side allocation engine: spread a donation across territorial
//! levels and optional targeted projects.
//!
//! The donor owns the distribution entirely: moving one slider never
//! rebalances the others. Validity (percentages summing to exactly 100 with
//! every territorial minimum met) is surfaced through [`DonationAllocator::summary`]
//! and enforced only at submission time.

use chrono::Utc;
use mecenat_types::{
    Clamped, DonationRecord, DonationTarget, SelectedProject, TerritorialLevel, derive_amount,
    fmt_euro,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, info, instrument};

use crate::catalog::ProjectCatalog;
use crate::error::{AllocError, AllocResult};

/// Share given to a freshly targeted project.
pub const PROJECT_DEFAULT_PERCENT: i32 = 5;
/// Lower bound of a targeted project's share.
pub const PROJECT_MIN_PERCENT: i32 = 5;
/// Upper bound of a targeted project's share.
pub const PROJECT_MAX_PERCENT: i32 = 75;
/// Fiscal reduction rate used to estimate the net cost of a donation.
pub const TAX_REDUCTION_RATE: f64 = 0.66;
/// Smallest accepted donation, in euros.
pub const MIN_AMOUNT: f64 = 1.0;

/// Completeness of the percent distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SummaryStatus {
    /// Percentages sum to exactly 100.
    Complete,
    /// Percentages fall short of 100 by `percent`, i.e. `amount` euros.
    Short {
        /// Missing percent.
        percent: i32,
        /// Missing euro amount.
        amount: i64,
    },
    /// Percentages exceed 100 by `percent`, i.e. `amount` euros.
    Over {
        /// Excess percent.
        percent: i32,
        /// Excess euro amount.
        amount: i64,
    },
}

impl fmt::Display for SummaryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SummaryStatus::Complete => write!(f, "Répartition complète."),
            SummaryStatus::Short { percent, amount } => write!(
                f,
                "Il manque {percent}% soit {} à répartir — ajustez vos curseurs.",
                fmt_euro(*amount as f64)
            ),
            SummaryStatus::Over { percent, amount } => write!(
                f,
                "Surcharge de {percent}% soit {} — ajustez vos curseurs.",
                fmt_euro(*amount as f64)
            ),
        }
    }
}

/// Aggregate view over the current allocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DonationSummary {
    /// Sum of every territorial and project percent.
    pub total_percent: i32,
    /// Euro amount currently distributed: `round(total_percent/100 × total)`.
    pub total_amount: i64,
    /// True iff `total_percent == 100` and every territorial level meets its
    /// configured minimum. Gates submission.
    pub valid: bool,
    /// Completeness status with the user-facing message via `Display`.
    pub status: SummaryStatus,
}

/// Query row for one territorial level: current percent and derived amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelRow {
    /// Level key.
    pub key: String,
    /// Display label.
    pub label: String,
    /// Current percent.
    pub percent: i32,
    /// Derived euro amount.
    pub amount: i64,
}

/// Donor-side allocation engine.
///
/// Owns the whole donor session state: total amount, per-level percents,
/// targeted projects, and the most-recent-first submission history.
#[derive(Debug, Clone)]
pub struct DonationAllocator {
    levels: Vec<TerritorialLevel>,
    level_percents: HashMap<String, i32>,
    selected: Vec<SelectedProject>,
    total_amount: f64,
    catalog: ProjectCatalog,
    history: Vec<DonationRecord>,
}

impl DonationAllocator {
    /// Build an engine over a territorial configuration and a project
    /// catalog. Every level starts at its default percent; the initial
    /// amount is clamped to at least [`MIN_AMOUNT`].
    pub fn new(
        levels: Vec<TerritorialLevel>,
        catalog: ProjectCatalog,
        initial_amount: f64,
    ) -> Self {
        let level_percents =
            levels.iter().map(|l| (l.key.clone(), l.default_percent)).collect::<HashMap<_, _>>();
        let total_amount = Self::coerce_amount(initial_amount).value;
        Self { levels, level_percents, selected: Vec::new(), total_amount, catalog, history: Vec::new() }
    }

    /// Seed the submission history (most recent first).
    pub fn with_history(mut self, history: Vec<DonationRecord>) -> Self {
        self.history = history;
        self
    }

    fn coerce_amount(requested: f64) -> Clamped<f64> {
        if !requested.is_finite() {
            return Clamped { value: MIN_AMOUNT, clamped: true };
        }
        Clamped::at_least(requested, MIN_AMOUNT)
    }

    /// Current donation amount.
    pub fn total_amount(&self) -> f64 {
        self.total_amount
    }

    /// Territorial configuration.
    pub fn levels(&self) -> &[TerritorialLevel] {
        &self.levels
    }

    /// Currently targeted projects, in selection order.
    pub fn selected_projects(&self) -> &[SelectedProject] {
        &self.selected
    }

    /// Submission history, most recent first.
    pub fn history(&self) -> &[DonationRecord] {
        &self.history
    }

    /// The project catalog backing the search feature.
    pub fn catalog(&self) -> &ProjectCatalog {
        &self.catalog
    }

    /// Set the donation amount, clamped to at least [`MIN_AMOUNT`].
    /// Percentages are untouched; every derived euro amount changes.
    #[instrument(skip(self))]
    pub fn set_total_amount(&mut self, amount: f64) -> Clamped<f64> {
        let coerced = Self::coerce_amount(amount);
        self.total_amount = coerced.value;
        for project in &mut self.selected {
            project.amount = derive_amount(f64::from(project.percent), self.total_amount);
        }
        debug!(amount = self.total_amount, clamped = coerced.clamped, "amount updated");
        coerced
    }

    /// Current percent for a territorial level.
    pub fn level_percent(&self, key: &str) -> AllocResult<i32> {
        self.level_percents.get(key).copied().ok_or_else(|| AllocError::unknown_level(key))
    }

    /// Derived euro amount for a territorial level.
    pub fn level_amount(&self, key: &str) -> AllocResult<i64> {
        Ok(derive_amount(f64::from(self.level_percent(key)?), self.total_amount))
    }

    /// One query row per territorial level, in configuration order.
    pub fn level_rows(&self) -> Vec<LevelRow> {
        self.levels
            .iter()
            .map(|level| {
                let percent = self.level_percents.get(&level.key).copied().unwrap_or(0);
                LevelRow {
                    key: level.key.clone(),
                    label: level.label.clone(),
                    percent,
                    amount: derive_amount(f64::from(percent), self.total_amount),
                }
            })
            .collect()
    }

    /// Set a territorial level's percent, clamped into the level's
    /// `[min, max]` range. No cross-level rebalancing happens; the donor is
    /// responsible for reaching a 100% total.
    #[instrument(skip(self))]
    pub fn set_level_percent(&mut self, key: &str, percent: i32) -> AllocResult<Clamped<i32>> {
        let level = self
            .levels
            .iter()
            .find(|l| l.key == key)
            .ok_or_else(|| AllocError::unknown_level(key))?;
        let clamped = Clamped::into_range(percent, level.min_percent, level.max_percent);
        self.level_percents.insert(key.to_string(), clamped.value);
        debug!(key, percent = clamped.value, clamped = clamped.clamped, "level percent set");
        Ok(clamped)
    }

    /// Target a catalog project with the default 5% share. Returns false
    /// (and changes nothing) when the project is unknown or already
    /// selected.
    #[instrument(skip(self))]
    pub fn add_project(&mut self, id: u32) -> bool {
        if self.selected.iter().any(|p| p.id == id) {
            return false;
        }
        let Some(project) = self.catalog.get(id) else {
            return false;
        };
        let amount = derive_amount(f64::from(PROJECT_DEFAULT_PERCENT), self.total_amount);
        self.selected.push(SelectedProject {
            id: project.id,
            title: project.title.clone(),
            percent: PROJECT_DEFAULT_PERCENT,
            amount,
        });
        info!(id, "project targeted");
        true
    }

    /// Drop a targeted project. Returns false when it was not selected.
    #[instrument(skip(self))]
    pub fn remove_project(&mut self, id: u32) -> bool {
        let before = self.selected.len();
        self.selected.retain(|p| p.id != id);
        before != self.selected.len()
    }

    /// Set a targeted project's share, clamped into
    /// `[PROJECT_MIN_PERCENT, PROJECT_MAX_PERCENT]`.
    #[instrument(skip(self))]
    pub fn set_project_percent(&mut self, id: u32, percent: i32) -> AllocResult<Clamped<i32>> {
        let total = self.total_amount;
        let project = self
            .selected
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| AllocError::unknown_project(id))?;
        let clamped = Clamped::into_range(percent, PROJECT_MIN_PERCENT, PROJECT_MAX_PERCENT);
        project.percent = clamped.value;
        project.amount = derive_amount(f64::from(clamped.value), total);
        Ok(clamped)
    }

    /// Give every territorial level and every targeted project the same
    /// integer share, `floor(100 / N)`.
    ///
    /// The floor remainder is not redistributed: with 6 entries each gets
    /// 16% and the donor still has 4% to place by hand. Shares are stored
    /// as computed, even below a level's minimum; validity is checked by
    /// [`DonationAllocator::summary`], not here.
    #[instrument(skip(self))]
    pub fn auto_distribute(&mut self) {
        let count = self.levels.len() + self.selected.len();
        if count == 0 {
            return;
        }
        let share = 100 / count as i32;
        for level in &self.levels {
            self.level_percents.insert(level.key.clone(), share);
        }
        for project in &mut self.selected {
            project.percent = share;
            project.amount = derive_amount(f64::from(share), self.total_amount);
        }
        info!(share, entries = count, "equal shares distributed");
    }

    /// Aggregate the current allocation: total percent, derived total
    /// amount, completeness status, and the validity flag gating submission.
    pub fn summary(&self) -> DonationSummary {
        let level_total: i32 =
            self.levels.iter().filter_map(|l| self.level_percents.get(&l.key)).sum();
        let project_total: i32 = self.selected.iter().map(|p| p.percent).sum();
        let total_percent = level_total + project_total;
        let total_amount = derive_amount(f64::from(total_percent), self.total_amount);

        let status = if total_percent == 100 {
            SummaryStatus::Complete
        } else if total_percent < 100 {
            let percent = 100 - total_percent;
            SummaryStatus::Short {
                percent,
                amount: derive_amount(f64::from(percent), self.total_amount),
            }
        } else {
            let percent = total_percent - 100;
            SummaryStatus::Over {
                percent,
                amount: derive_amount(f64::from(percent), self.total_amount),
            }
        };

        let minima_met = self
            .levels
            .iter()
            .all(|l| self.level_percents.get(&l.key).copied().unwrap_or(0) >= l.min_percent);
        let valid = total_percent == 100 && minima_met;

        DonationSummary { total_percent, total_amount, valid, status }
    }

    /// Net cost of the donation after the 66 % fiscal reduction.
    pub fn net_cost(&self) -> i64 {
        derive_amount((1.0 - TAX_REDUCTION_RATE) * 100.0, self.total_amount)
    }

    /// Commit the current allocation.
    ///
    /// Fails with [`AllocError::PreconditionNotMet`] unless the summary is
    /// valid. On success: snapshots the allocation into a
    /// [`DonationRecord`] (sequential id, today's date, insertion-ordered
    /// breakdown of territorial keys then `proj_<id>` keys), prepends it to
    /// the history, clears the targeted projects and resets every
    /// territorial level to its default percent. The amount is kept for the
    /// next donation.
    #[instrument(skip(self))]
    pub fn submit(&mut self) -> AllocResult<DonationRecord> {
        let summary = self.summary();
        if !summary.valid {
            return Err(AllocError::precondition("submit", summary.status.to_string()));
        }

        let mut breakdown: Vec<(String, i32)> = self
            .levels
            .iter()
            .map(|l| (l.key.clone(), self.level_percents.get(&l.key).copied().unwrap_or(0)))
            .collect();
        for project in &self.selected {
            breakdown.push((format!("proj_{}", project.id), project.percent));
        }
        let targets = self
            .selected
            .iter()
            .map(|p| DonationTarget { id: p.id, percent: p.percent, amount: p.amount })
            .collect();

        let record = DonationRecord {
            id: format!("d{}", self.history.len() + 1),
            date: Utc::now().date_naive(),
            amount: self.total_amount,
            breakdown,
            targets,
        };
        self.history.insert(0, record.clone());

        self.selected.clear();
        for level in &self.levels {
            self.level_percents.insert(level.key.clone(), level.default_percent);
        }

        info!(id = %record.id, amount = record.amount, "donation recorded");
        Ok(record)
    }
}
