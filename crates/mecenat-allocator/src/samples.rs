//! Demonstration data for both dashboards.
//!
//! Everything here mirrors the browser prototype's in-page data: a donor
//! session over five territorial levels and a five-project catalog, and an
//! owner session over seven funding levels with seeded bonus/malus history.

use chrono::NaiveDate;
use mecenat_types::{
    AdjustmentHistory, DonationRecord, DonationTarget, FundingLevel, LevelKind, ProjectInfo,
    TerritorialLevel,
};

use crate::cap::CapAllocator;
use crate::catalog::ProjectCatalog;
use crate::donation::DonationAllocator;
use crate::portfolio::{OwnedProject, ProjectStatus};

/// Default donor amount, in euros.
pub const SAMPLE_DONATION_AMOUNT: f64 = 120.0;
/// Cost of the owner's sample project, in euros.
pub const SAMPLE_PROJECT_COST: f64 = 1120.0;
/// Year the seeded bonus/malus entries were recorded.
pub const SEED_YEAR: i32 = 2025;

fn territorial(key: &str, label: &str, projects: u32) -> TerritorialLevel {
    TerritorialLevel {
        key: key.into(),
        label: label.into(),
        projects,
        min_percent: 5,
        max_percent: 75,
        default_percent: 20,
    }
}

/// The donor-side territorial configuration: five tiers, each bounded
/// [5, 75] and starting at 20%.
pub fn territorial_levels() -> Vec<TerritorialLevel> {
    vec![
        territorial("commune", "Ma commune", 4),
        territorial("commu", "Ma communauté de communes", 23),
        territorial("dept", "Mon département", 188),
        territorial("region", "Ma région", 478),
        territorial("country", "Mon pays", 5786),
    ]
}

fn catalog_entry(
    id: u32,
    title: &str,
    location: &str,
    category: &str,
    budget: i64,
    raised: i64,
) -> ProjectInfo {
    ProjectInfo {
        id,
        title: title.into(),
        location: location.into(),
        category: category.into(),
        budget,
        raised,
        thumb: "https://via.placeholder.com/120x80".into(),
    }
}

/// The searchable donor catalog.
pub fn project_catalog() -> ProjectCatalog {
    ProjectCatalog::new(vec![
        catalog_entry(1, "MJC - Atelier théâtre", "Grenoble", "mjc", 3800, 3200),
        catalog_entry(2, "Théâtre municipal - Création", "Nantes", "theatre", 6500, 4200),
        catalog_entry(3, "École de musique - Matériel", "Lyon", "musique", 3800, 3200),
        catalog_entry(4, "Renovation patrimoine - Chapelle", "Bordeaux", "patrimoine", 12000, 7500),
        catalog_entry(5, "Festival local - scène", "Le Mans", "musique", 9000, 6300),
    ])
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("sample date is valid")
}

/// Two past donations, most recent first.
pub fn seed_donation_history() -> Vec<DonationRecord> {
    vec![
        DonationRecord {
            id: "d1".into(),
            date: date(2025, 8, 12),
            amount: 100.0,
            breakdown: vec![
                ("commune".into(), 20),
                ("commu".into(), 20),
                ("dept".into(), 20),
                ("region".into(), 20),
                ("country".into(), 20),
            ],
            targets: vec![],
        },
        DonationRecord {
            id: "d2".into(),
            date: date(2025, 6, 2),
            amount: 50.0,
            breakdown: vec![
                ("commune".into(), 10),
                ("commu".into(), 10),
                ("dept".into(), 10),
                ("region".into(), 10),
                ("country".into(), 10),
                ("special".into(), 40),
            ],
            targets: vec![DonationTarget { id: 3, percent: 40, amount: 20 }],
        },
    ]
}

fn funding(key: &str, kind: LevelKind, label: &str, total: f64, projects: u32) -> FundingLevel {
    FundingLevel { key: key.into(), kind, label: label.into(), total, projects }
}

/// The owner-side funding configuration: the project's own pool plus six
/// territorial pools.
pub fn funding_levels() -> Vec<FundingLevel> {
    vec![
        funding("project", LevelKind::Project, "Création : Soleil Levant", 700.0, 1),
        funding("establishment", LevelKind::Establishment, "Théâtre du Soleil Levant", 500.0, 7),
        funding("commune", LevelKind::Commune, "Douai", 950.0, 22),
        funding("commu", LevelKind::Intercommunality, "Douaisi agglo", 4730.0, 52),
        funding("dept_59", LevelKind::Department, "Nord-pas-de-calais", 17520.0, 428),
        funding("region_hdf", LevelKind::Region, "Haut-de-France", 49500.0, 907),
        funding("country_fr", LevelKind::Country, "France", 128000.0, 1242),
    ]
}

/// Seed bonus/malus deltas shown on the owner dashboard.
pub fn base_adjustments() -> Vec<(&'static str, i32)> {
    vec![
        ("commune", 3),
        ("commu", 0),
        ("dept_59", -2),
        ("region_hdf", 1),
        ("country_fr", 0),
    ]
}

/// The owner's project portfolio.
pub fn owner_portfolio() -> Vec<OwnedProject> {
    vec![
        OwnedProject {
            id: 1,
            title: "Création : Soleil Levant".into(),
            subtitle: "Théâtre contemporain".into(),
            status: ProjectStatus::Published,
            date: date(2025, 9, 15),
        },
        OwnedProject {
            id: 2,
            title: "Atelier jeunesse - Découverte scénique".into(),
            subtitle: "Projet d'éducation artistique".into(),
            status: ProjectStatus::Funded,
            date: date(2025, 10, 3),
        },
        OwnedProject {
            id: 3,
            title: "Festival MJC en scène".into(),
            subtitle: "Événement annuel".into(),
            status: ProjectStatus::Pending,
            date: date(2025, 11, 1),
        },
        OwnedProject {
            id: 4,
            title: "Création partagée : Horizon".into(),
            subtitle: "Théâtre musical".into(),
            status: ProjectStatus::Closed,
            date: date(2025, 5, 1),
        },
    ]
}

impl DonationAllocator {
    /// Demo donor session: sample levels, catalog, seed history, 120 €.
    pub fn sample() -> Self {
        Self::new(territorial_levels(), project_catalog(), SAMPLE_DONATION_AMOUNT)
            .with_history(seed_donation_history())
    }
}

impl CapAllocator {
    /// Demo owner session: sample funding levels with seeded bonus/malus
    /// history against the 1 120 € project.
    pub fn sample() -> Self {
        let mut allocator = Self::new(SAMPLE_PROJECT_COST, funding_levels());
        for (key, delta) in base_adjustments() {
            allocator
                .seed_history(key, AdjustmentHistory::seeded(SEED_YEAR, delta))
                .expect("sample level keys are configured");
        }
        allocator
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn donor_sample_starts_complete() {
        let alloc = DonationAllocator::sample();
        let summary = alloc.summary();
        assert_eq!(summary.total_percent, 100);
        assert!(summary.valid);
        assert_eq!(alloc.history().len(), 2);
    }

    #[test]
    fn owner_sample_caps_reflect_seeded_history() {
        let alloc = CapAllocator::sample();
        // 22-project pool, +3 bonus: capped at the structural 15
        assert_eq!(alloc.cap("commune").unwrap(), 15);
        // 428-project pool, -2 malus: 13
        assert_eq!(alloc.cap("dept_59").unwrap(), 13);
        // single-project pool: no headroom
        assert_eq!(alloc.cap("project").unwrap(), 0);
    }
}
