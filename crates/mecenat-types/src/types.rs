//! Domain types shared by the donor-side and owner-side allocation engines.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error raised when a level descriptor is configured inconsistently.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid level '{key}': {message}")]
pub struct InvalidLevel {
    /// Key of the offending level.
    pub key: String,
    /// Human-readable description of the violated constraint.
    pub message: String,
}

/// Result of a clamping mutation: the value actually stored, plus whether
/// the requested value had to be pulled back into range.
///
/// Out-of-range input is never rejected by the engines, only clamped; this
/// type makes the clamping observable without changing that behavior.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Clamped<T> {
    /// The value stored after clamping.
    pub value: T,
    /// True when the requested value was out of range.
    pub clamped: bool,
}

impl<T: PartialOrd + Copy> Clamped<T> {
    /// Clamp `requested` into `[min, max]`.
    pub fn into_range(requested: T, min: T, max: T) -> Self {
        if requested < min {
            Self { value: min, clamped: true }
        } else if requested > max {
            Self { value: max, clamped: true }
        } else {
            Self { value: requested, clamped: false }
        }
    }

    /// Clamp `requested` to at least `floor`.
    pub fn at_least(requested: T, floor: T) -> Self {
        if requested < floor {
            Self { value: floor, clamped: true }
        } else {
            Self { value: requested, clamped: false }
        }
    }
}

/// Immutable per-session descriptor of a territorial tier on the donor side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerritorialLevel {
    /// Unique key ("commune", "dept", ...).
    pub key: String,
    /// Display label.
    pub label: String,
    /// Number of projects currently funded through this tier (informational).
    pub projects: u32,
    /// Lowest percent a donor may assign to this tier.
    pub min_percent: i32,
    /// Highest percent a donor may assign to this tier.
    pub max_percent: i32,
    /// Percent this tier starts at, and returns to after a submission.
    pub default_percent: i32,
}

impl TerritorialLevel {
    /// Build a descriptor, checking `min ≤ default ≤ max`.
    pub fn new(
        key: impl Into<String>,
        label: impl Into<String>,
        projects: u32,
        min_percent: i32,
        max_percent: i32,
        default_percent: i32,
    ) -> Result<Self, InvalidLevel> {
        let key = key.into();
        if min_percent > max_percent {
            return Err(InvalidLevel {
                key,
                message: format!("min {min_percent}% exceeds max {max_percent}%"),
            });
        }
        if default_percent < min_percent || default_percent > max_percent {
            return Err(InvalidLevel {
                key,
                message: format!(
                    "default {default_percent}% outside [{min_percent}%, {max_percent}%]"
                ),
            });
        }
        Ok(Self { key, label: label.into(), projects, min_percent, max_percent, default_percent })
    }
}

/// A project as listed in the donor search catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectInfo {
    /// Catalog identifier.
    pub id: u32,
    /// Project title.
    pub title: String,
    /// City or place the project runs in.
    pub location: String,
    /// Free-form category ("mjc", "theatre", "musique", ...).
    pub category: String,
    /// Total budget in euros.
    pub budget: i64,
    /// Amount already raised in euros.
    pub raised: i64,
    /// Thumbnail URL (informational).
    pub thumb: String,
}

/// A project the donor chose to target with part of the donation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedProject {
    /// Catalog identifier of the targeted project.
    pub id: u32,
    /// Title copied from the catalog entry.
    pub title: String,
    /// Share of the donation, bounded [5, 75].
    pub percent: i32,
    /// Derived amount: `round(percent / 100 × total)`.
    pub amount: i64,
}

/// One targeted project inside a stored donation record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonationTarget {
    /// Catalog identifier.
    pub id: u32,
    /// Share of the donation at submission time.
    pub percent: i32,
    /// Euro amount at submission time.
    pub amount: i64,
}

/// Immutable snapshot of a submitted donation.
///
/// The breakdown keeps insertion order: territorial keys first, then one
/// `proj_<id>` entry per targeted project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DonationRecord {
    /// Sequential identifier ("d1", "d2", ...).
    pub id: String,
    /// Submission date.
    pub date: NaiveDate,
    /// Total donated amount in euros.
    pub amount: f64,
    /// Percent per level key, insertion-ordered.
    pub breakdown: Vec<(String, i32)>,
    /// Targeted projects with their share at submission time.
    pub targets: Vec<DonationTarget>,
}

impl DonationRecord {
    /// Percent recorded for a level key, if present.
    pub fn breakdown_percent(&self, key: &str) -> Option<i32> {
        self.breakdown.iter().find(|(k, _)| k == key).map(|(_, p)| *p)
    }
}

/// Kind of a funding tier on the owner side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LevelKind {
    /// Donations targeted at the project itself.
    Project,
    /// The hosting establishment's pool.
    Establishment,
    /// Municipal pool.
    Commune,
    /// Intercommunal pool ("communauté de communes").
    Intercommunality,
    /// Departmental pool.
    Department,
    /// Regional pool.
    Region,
    /// National pool.
    Country,
}

impl fmt::Display for LevelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LevelKind::Project => "Projet",
            LevelKind::Establishment => "Établissement",
            LevelKind::Commune => "Commune",
            LevelKind::Intercommunality => "Communauté de communes",
            LevelKind::Department => "Département",
            LevelKind::Region => "Région",
            LevelKind::Country => "Pays",
        };
        write!(f, "{label}")
    }
}

/// A funding tier the owner draws from: a donation pool shared by a number
/// of projects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundingLevel {
    /// Unique key ("commune", "dept_59", ...).
    pub key: String,
    /// Tier kind.
    pub kind: LevelKind,
    /// Display label.
    pub label: String,
    /// Total historical donations received at this tier, in euros.
    pub total: f64,
    /// Number of projects sharing the pool.
    pub projects: u32,
}

impl FundingLevel {
    /// Mean contribution available per project: `total / projects`,
    /// 0 when the pool is shared by no project.
    pub fn mean(&self) -> f64 {
        if self.projects > 0 { self.total / f64::from(self.projects) } else { 0.0 }
    }
}

/// One bonus/malus adjustment recorded against a funding level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjustmentEntry {
    /// Year the adjustment was recorded.
    pub year: i32,
    /// Positive = bonus (the level asked for less than its mean),
    /// negative = malus.
    pub delta: i32,
}

/// Per-level bonus/malus history, most recent first.
///
/// Entries are only ever prepended; `cumulated` always equals the sum of all
/// deltas.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjustmentHistory {
    entries: Vec<AdjustmentEntry>,
    cumulated: i32,
}

impl AdjustmentHistory {
    /// Empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// History seeded with a single base entry.
    pub fn seeded(year: i32, delta: i32) -> Self {
        Self { entries: vec![AdjustmentEntry { year, delta }], cumulated: delta }
    }

    /// Prepend an entry and recompute the cumulated delta.
    pub fn record(&mut self, entry: AdjustmentEntry) {
        self.entries.insert(0, entry);
        self.cumulated = self.entries.iter().map(|e| e.delta).sum();
    }

    /// All entries, most recent first.
    pub fn entries(&self) -> &[AdjustmentEntry] {
        &self.entries
    }

    /// Sum of all recorded deltas.
    pub fn cumulated(&self) -> i32 {
        self.cumulated
    }
}
