//! Owner-side allocation engine: draw a project's funding from territorial
//! pools, each bounded by an adjustment cap that evolves with the level's
//! bonus/malus history.
//!
//! Each funding level contributes its mean donation by default (0 %
//! adjustment). The owner may push a level up to its cap or down to the
//! −15 % floor. Validating an allocation records a bonus for every level
//! asked for less than its mean and a malus for every level asked for more,
//! which moves that level's cap for all future allocations.

use chrono::{Datelike, Utc};
use mecenat_types::{
    AdjustmentEntry, AdjustmentHistory, Clamped, FundingLevel, LevelKind, fmt_euro, round_euro,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, info, instrument, warn};

use crate::error::{AllocError, AllocResult};

/// Lowest adjustment any level can be pushed to.
pub const ADJUSTMENT_FLOOR: i32 = -15;
/// Structural scale of the adjustment system: the largest base cap, and the
/// magnitude bound of a recorded bonus/malus delta.
pub const ADJUSTMENT_SPAN: i32 = 15;

/// Structural cap by pool size: levels shared by few projects have no
/// upward headroom at all.
pub fn base_cap(projects: u32) -> i32 {
    if projects <= 2 {
        0
    } else if projects <= 4 {
        5
    } else if projects <= 7 {
        10
    } else {
        ADJUSTMENT_SPAN
    }
}

/// Whether the proposed allocation covers the project cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FundingStatus {
    /// Total proposed funding meets or exceeds the project cost.
    Funded {
        /// Coverage, `round(total / cost × 100)`.
        percent: i32,
    },
    /// Total proposed funding falls short of the project cost.
    Short {
        /// Euros still to find.
        missing: i64,
        /// Coverage, `round(total / cost × 100)`.
        percent: i32,
    },
}

impl FundingStatus {
    /// True when the allocation covers the cost.
    pub fn is_funded(&self) -> bool {
        matches!(self, FundingStatus::Funded { .. })
    }
}

impl fmt::Display for FundingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FundingStatus::Funded { percent } => write!(f, "Projet financé ({percent}%)."),
            FundingStatus::Short { missing, percent } => {
                write!(f, "{} à trouver ({percent}%).", fmt_euro(*missing as f64))
            }
        }
    }
}

/// Result of [`CapAllocator::auto_fill`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoFillOutcome {
    /// Euros the heuristic could not place because every level hit its cap.
    /// `None` when the cost is fully covered.
    pub shortfall: Option<i64>,
    /// Total proposed after the fill.
    pub total_allocated: i64,
}

/// One bonus/malus delta recorded by [`CapAllocator::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedAdjustment {
    /// Level the delta was recorded against.
    pub key: String,
    /// Recording year.
    pub year: i32,
    /// Signed delta: positive bonus, negative malus.
    pub delta: i32,
}

/// Presentational severity of a level's deviation from its mean.
/// Informational only; no engine behavior depends on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdjustmentBand {
    /// 10 to 15 % below the mean.
    StrongBonus,
    /// 5 to 10 % below the mean.
    Bonus,
    /// Within 5 % of the mean.
    Balanced,
    /// Up to two thirds of the structural span above the mean.
    Raised,
    /// Close to the structural span above the mean.
    High,
    /// Beyond the structural span (or a positive ask against an empty pool).
    Refused,
}

/// Query row for one funding level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundingRow {
    /// Level key.
    pub key: String,
    /// Display label.
    pub label: String,
    /// Pool total in euros.
    pub total: f64,
    /// Projects sharing the pool.
    pub projects: u32,
    /// Mean donation per project.
    pub mean: f64,
    /// Current adjustment cap.
    pub cap: i32,
    /// Current adjustment percent.
    pub percent: f64,
    /// Proposed euro amount (rounded).
    pub proposed: i64,
    /// Severity band of the deviation from the mean.
    pub band: AdjustmentBand,
}

/// Owner-side allocation engine.
#[derive(Debug, Clone)]
pub struct CapAllocator {
    project_cost: f64,
    levels: Vec<FundingLevel>,
    histories: HashMap<String, AdjustmentHistory>,
    percents: HashMap<String, f64>,
    proposed: HashMap<String, f64>,
}

impl CapAllocator {
    /// Build an engine for a project cost over a funding configuration.
    /// Every level starts at 0 % adjustment (its raw mean) with an empty
    /// bonus/malus history.
    pub fn new(project_cost: f64, levels: Vec<FundingLevel>) -> Self {
        let histories =
            levels.iter().map(|l| (l.key.clone(), AdjustmentHistory::new())).collect();
        let percents = levels.iter().map(|l| (l.key.clone(), 0.0)).collect();
        let proposed = levels.iter().map(|l| (l.key.clone(), l.mean().round())).collect();
        Self { project_cost, levels, histories, percents, proposed }
    }

    /// Replace a level's bonus/malus history (seed data from past years).
    pub fn seed_history(&mut self, key: &str, history: AdjustmentHistory) -> AllocResult<()> {
        if !self.histories.contains_key(key) {
            return Err(AllocError::unknown_level(key));
        }
        self.histories.insert(key.to_string(), history);
        Ok(())
    }

    /// Project cost in euros.
    pub fn project_cost(&self) -> f64 {
        self.project_cost
    }

    /// Funding configuration.
    pub fn levels(&self) -> &[FundingLevel] {
        &self.levels
    }

    /// Bonus/malus history of a level.
    pub fn history(&self, key: &str) -> AllocResult<&AdjustmentHistory> {
        self.histories.get(key).ok_or_else(|| AllocError::unknown_level(key))
    }

    fn level(&self, key: &str) -> AllocResult<&FundingLevel> {
        self.levels.iter().find(|l| l.key == key).ok_or_else(|| AllocError::unknown_level(key))
    }

    /// Mean donation per project at a level.
    pub fn mean(&self, key: &str) -> AllocResult<f64> {
        Ok(self.level(key)?.mean())
    }

    fn cap_of(&self, level: &FundingLevel) -> i32 {
        let base = f64::from(base_cap(level.projects));
        let cumulated =
            self.histories.get(&level.key).map(AdjustmentHistory::cumulated).unwrap_or(0);
        // accumulated bonus can only restore the cap up to its structural
        // base; accumulated malus can push it down to the floor
        let raw = (base + f64::from(cumulated)).min(base);
        raw.clamp(f64::from(ADJUSTMENT_FLOOR), base).round() as i32
    }

    /// Current adjustment cap of a level: the structural base lowered by the
    /// cumulated malus, bounded by `[−15, base]`.
    pub fn cap(&self, key: &str) -> AllocResult<i32> {
        Ok(self.cap_of(self.level(key)?))
    }

    /// Current adjustment percent of a level.
    pub fn percent(&self, key: &str) -> AllocResult<f64> {
        self.percents.get(key).copied().ok_or_else(|| AllocError::unknown_level(key))
    }

    /// Proposed euro amount for a level, rounded.
    pub fn proposed(&self, key: &str) -> AllocResult<i64> {
        self.proposed
            .get(key)
            .map(|amount| round_euro(*amount))
            .ok_or_else(|| AllocError::unknown_level(key))
    }

    /// Set a level's adjustment percent, clamped into `[−15, cap]`. The
    /// proposed amount becomes `round(mean × (1 + pct/100))`.
    #[instrument(skip(self))]
    pub fn set_percent(&mut self, key: &str, percent: i32) -> AllocResult<Clamped<i32>> {
        let level = self.level(key)?;
        let cap = self.cap_of(level);
        let mean = level.mean();
        let clamped = Clamped::into_range(percent, ADJUSTMENT_FLOOR, cap);
        self.percents.insert(key.to_string(), f64::from(clamped.value));
        let amount = (mean * (1.0 + f64::from(clamped.value) / 100.0)).round();
        self.proposed.insert(key.to_string(), amount);
        debug!(key, percent = clamped.value, amount, "adjustment set");
        Ok(clamped)
    }

    /// Total proposed funding across every level, rounded.
    pub fn total_allocated(&self) -> i64 {
        round_euro(self.proposed.values().sum())
    }

    /// Whether the proposed total covers the project cost.
    pub fn funding_status(&self) -> FundingStatus {
        let total = self.total_allocated();
        let percent = if self.project_cost > 0.0 {
            ((total as f64 / self.project_cost) * 100.0).round() as i32
        } else {
            0
        };
        if total as f64 >= self.project_cost {
            FundingStatus::Funded { percent }
        } else {
            FundingStatus::Short { missing: round_euro(self.project_cost - total as f64), percent }
        }
    }

    /// Deterministic fill heuristic (not an optimizer).
    ///
    /// Walks the levels by descending mean: seeds every level at its raw
    /// mean, scales everything down uniformly when the means alone exceed
    /// the cost, otherwise raises each level toward its cap until the cost
    /// is covered. Percents are back-derived from the final amounts. A
    /// residual shortfall (total capacity insufficient) is reported in the
    /// outcome while the partial allocation stays applied.
    #[instrument(skip(self))]
    pub fn auto_fill(&mut self) -> AutoFillOutcome {
        let mut order: Vec<usize> = (0..self.levels.len()).collect();
        order.sort_by(|&a, &b| {
            self.levels[b]
                .mean()
                .partial_cmp(&self.levels[a].mean())
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        // seed every level at its raw mean
        let mut total_means = 0.0;
        for level in &self.levels {
            let mean = level.mean();
            self.proposed.insert(level.key.clone(), mean);
            total_means += mean;
        }
        let mut remaining = self.project_cost - total_means;

        if remaining < 0.0 {
            // means alone already exceed the cost: scale down to land
            // exactly on the cost
            let scale = self.project_cost / total_means;
            for level in &self.levels {
                if let Some(amount) = self.proposed.get_mut(&level.key) {
                    *amount *= scale;
                }
            }
            remaining = 0.0;
        } else {
            for &idx in &order {
                if remaining <= 0.0 {
                    break;
                }
                let level = &self.levels[idx];
                let cap = self.cap_of(level);
                let mean = level.mean();
                let max_amount = mean * (1.0 + f64::from(cap) / 100.0);
                let current = self.proposed.get(&level.key).copied().unwrap_or(0.0);
                let add = (max_amount - current).min(remaining);
                self.proposed.insert(level.key.clone(), current + add);
                remaining -= add;
            }
        }

        // back-derive the percents from the final amounts
        for level in &self.levels {
            let mean = level.mean();
            let amount = self.proposed.get(&level.key).copied().unwrap_or(0.0);
            let percent = if mean > 0.0 { (amount / mean - 1.0) * 100.0 } else { 0.0 };
            let cap = self.cap_of(level);
            self.percents
                .insert(level.key.clone(), percent.clamp(f64::from(ADJUSTMENT_FLOOR), f64::from(cap)));
        }

        let total_allocated = self.total_allocated();
        let shortfall = if remaining > 0.0 {
            let missing = round_euro(remaining);
            warn!(missing, "total capacity insufficient to fund the project");
            Some(missing)
        } else {
            None
        };
        info!(total_allocated, ?shortfall, "auto fill applied");
        AutoFillOutcome { shortfall, total_allocated }
    }

    /// Commit the allocation: record one bonus/malus delta per funding
    /// level (skipping the project's own pool and empty pools) into its
    /// history, moving that level's cap for future allocations.
    ///
    /// Fails with [`AllocError::PreconditionNotMet`] unless the proposed
    /// total covers the project cost.
    #[instrument(skip(self))]
    pub fn validate(&mut self) -> AllocResult<Vec<AppliedAdjustment>> {
        let status = self.funding_status();
        if !status.is_funded() {
            return Err(AllocError::precondition("validate", status.to_string()));
        }

        let year = Utc::now().year();
        let span = f64::from(ADJUSTMENT_SPAN);
        let mut applied = Vec::new();
        for level in &self.levels {
            if level.kind == LevelKind::Project {
                continue;
            }
            let mean = level.mean();
            if mean <= 0.0 {
                continue;
            }
            let requested = self.proposed.get(&level.key).copied().unwrap_or(0.0);
            let diff_pct = (requested - mean) / mean * 100.0;
            let delta = if diff_pct < 0.0 {
                // asked for less than the mean: bonus
                diff_pct.abs().min(span).round() as i32
            } else {
                // asked for more: malus
                (-diff_pct.min(span)).round() as i32
            };
            if let Some(history) = self.histories.get_mut(&level.key) {
                history.record(AdjustmentEntry { year, delta });
            }
            info!(key = %level.key, delta, "adjustment recorded");
            applied.push(AppliedAdjustment { key: level.key.clone(), year, delta });
        }
        Ok(applied)
    }

    /// Presentational severity of a level's deviation from its mean.
    pub fn adjustment_band(&self, key: &str) -> AllocResult<AdjustmentBand> {
        let level = self.level(key)?;
        let mean = level.mean();
        let amount = self.proposed.get(key).copied().unwrap_or(0.0);
        let diff = if mean > 0.0 {
            (amount - mean) / mean * 100.0
        } else if amount > 0.0 {
            f64::INFINITY
        } else {
            0.0
        };
        let span = f64::from(ADJUSTMENT_SPAN);
        let band = if (-span..=-10.0).contains(&diff) {
            AdjustmentBand::StrongBonus
        } else if diff > -10.0 && diff < -5.0 {
            AdjustmentBand::Bonus
        } else if (-5.0..=span / 3.0).contains(&diff) {
            AdjustmentBand::Balanced
        } else if diff > span / 3.0 && diff <= 2.0 * span / 3.0 {
            AdjustmentBand::Raised
        } else if diff > 2.0 * span / 3.0 && diff <= span {
            AdjustmentBand::High
        } else {
            AdjustmentBand::Refused
        };
        Ok(band)
    }

    /// One query row per funding level, in configuration order.
    pub fn rows(&self) -> Vec<FundingRow> {
        self.levels
            .iter()
            .map(|level| FundingRow {
                key: level.key.clone(),
                label: level.label.clone(),
                total: level.total,
                projects: level.projects,
                mean: level.mean(),
                cap: self.cap_of(level),
                percent: self.percents.get(&level.key).copied().unwrap_or(0.0),
                proposed: round_euro(self.proposed.get(&level.key).copied().unwrap_or(0.0)),
                band: self
                    .adjustment_band(&level.key)
                    .unwrap_or(AdjustmentBand::Balanced),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mecenat_types::LevelKind;

    fn level(key: &str, kind: LevelKind, total: f64, projects: u32) -> FundingLevel {
        FundingLevel { key: key.into(), kind, label: key.into(), total, projects }
    }

    #[test]
    fn base_cap_steps_by_pool_size() {
        assert_eq!(base_cap(0), 0);
        assert_eq!(base_cap(2), 0);
        assert_eq!(base_cap(3), 5);
        assert_eq!(base_cap(4), 5);
        assert_eq!(base_cap(7), 10);
        assert_eq!(base_cap(8), 15);
        assert_eq!(base_cap(1242), 15);
    }

    #[test]
    fn bonus_cannot_raise_cap_above_structural_base() {
        let mut alloc =
            CapAllocator::new(1000.0, vec![level("project", LevelKind::Project, 700.0, 1)]);
        alloc.seed_history("project", AdjustmentHistory::seeded(2025, 3)).unwrap();
        // base cap 0 for a single-project pool; +3 bonus stays capped at 0
        assert_eq!(alloc.cap("project").unwrap(), 0);
    }

    #[test]
    fn malus_pushes_cap_down_to_the_floor() {
        let mut alloc =
            CapAllocator::new(1000.0, vec![level("commune", LevelKind::Commune, 950.0, 22)]);
        assert_eq!(alloc.cap("commune").unwrap(), 15);

        alloc.seed_history("commune", AdjustmentHistory::seeded(2025, -8)).unwrap();
        assert_eq!(alloc.cap("commune").unwrap(), 7);

        alloc.seed_history("commune", AdjustmentHistory::seeded(2025, -40)).unwrap();
        assert_eq!(alloc.cap("commune").unwrap(), ADJUSTMENT_FLOOR);
    }

    #[test]
    fn set_percent_clamps_into_floor_and_cap() {
        let mut alloc = CapAllocator::new(
            1000.0,
            vec![level("establishment", LevelKind::Establishment, 3500.0, 7)],
        );
        // cap is 10 for a 7-project pool
        let c = alloc.set_percent("establishment", 12).unwrap();
        assert_eq!(c.value, 10);
        assert!(c.clamped);
        assert_eq!(alloc.proposed("establishment").unwrap(), 550); // 500 × 1.10

        let c = alloc.set_percent("establishment", -20).unwrap();
        assert_eq!(c.value, ADJUSTMENT_FLOOR);
        assert_eq!(alloc.proposed("establishment").unwrap(), 425); // 500 × 0.85

        assert_eq!(
            alloc.set_percent("nowhere", 0).unwrap_err(),
            AllocError::unknown_level("nowhere")
        );
    }

    #[test]
    fn funding_status_reports_shortfall() {
        let mut alloc = CapAllocator::new(
            1120.0,
            vec![
                level("project", LevelKind::Project, 700.0, 1),
                level("establishment", LevelKind::Establishment, 3500.0, 7),
            ],
        );
        // 700 + 500 = 1200 >= 1120
        assert!(alloc.funding_status().is_funded());

        alloc.set_percent("establishment", -15).unwrap();
        // 700 + 425 = 1125 >= 1120, still funded
        assert!(alloc.funding_status().is_funded());

        alloc.set_percent("project", -15).unwrap();
        // project pool has cap 0 but floor still applies: 595 + 425 = 1020
        let status = alloc.funding_status();
        assert_eq!(status, FundingStatus::Short { missing: 100, percent: 91 });
        assert_eq!(status.to_string(), "100 € à trouver (91%).");
    }

    #[test]
    fn adjustment_bands_bucket_the_deviation() {
        let mut alloc = CapAllocator::new(
            1000.0,
            vec![level("region", LevelKind::Region, 49500.0, 907)],
        );
        assert_eq!(alloc.adjustment_band("region").unwrap(), AdjustmentBand::Balanced);

        alloc.set_percent("region", -12).unwrap();
        assert_eq!(alloc.adjustment_band("region").unwrap(), AdjustmentBand::StrongBonus);

        alloc.set_percent("region", -7).unwrap();
        assert_eq!(alloc.adjustment_band("region").unwrap(), AdjustmentBand::Bonus);

        alloc.set_percent("region", 8).unwrap();
        assert_eq!(alloc.adjustment_band("region").unwrap(), AdjustmentBand::Raised);

        alloc.set_percent("region", 14).unwrap();
        assert_eq!(alloc.adjustment_band("region").unwrap(), AdjustmentBand::High);
    }
}
