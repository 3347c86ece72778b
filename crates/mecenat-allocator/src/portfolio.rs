//! Owner landing page: ordering of a project owner's portfolio.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of an owned project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectStatus {
    /// Submitted, waiting for publication.
    Pending,
    /// Published, waiting for donation allocation.
    Published,
    /// Donations allocated, waiting for the activity report.
    Funded,
    /// Finalized.
    Closed,
}

impl ProjectStatus {
    /// Display rank: pending projects first, closed ones last.
    pub fn display_order(self) -> u8 {
        match self {
            ProjectStatus::Pending => 1,
            ProjectStatus::Published => 2,
            ProjectStatus::Funded => 3,
            ProjectStatus::Closed => 4,
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ProjectStatus::Pending => "Déposé (en attente de publication)",
            ProjectStatus::Published => "Publié (en attente d'attribution de dons)",
            ProjectStatus::Funded => "Dons attribués (en attente du rapport d'activité)",
            ProjectStatus::Closed => "Finalisé",
        };
        write!(f, "{label}")
    }
}

/// A project as listed on the owner's landing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnedProject {
    /// Identifier.
    pub id: u32,
    /// Title.
    pub title: String,
    /// Subtitle ("Théâtre contemporain", ...).
    pub subtitle: String,
    /// Lifecycle status.
    pub status: ProjectStatus,
    /// Publication date.
    pub date: NaiveDate,
}

/// Sort a portfolio for display: by status rank, then most recent first.
pub fn sort_for_display(projects: &mut [OwnedProject]) {
    projects.sort_by(|a, b| {
        a.status
            .display_order()
            .cmp(&b.status.display_order())
            .then(b.date.cmp(&a.date))
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(id: u32, status: ProjectStatus, date: &str) -> OwnedProject {
        OwnedProject {
            id,
            title: format!("Projet {id}"),
            subtitle: String::new(),
            status,
            date: date.parse().expect("valid date"),
        }
    }

    #[test]
    fn portfolio_sorts_by_status_then_recency() {
        let mut projects = vec![
            project(1, ProjectStatus::Published, "2025-09-15"),
            project(2, ProjectStatus::Funded, "2025-10-03"),
            project(3, ProjectStatus::Pending, "2025-11-01"),
            project(4, ProjectStatus::Closed, "2025-05-01"),
            project(5, ProjectStatus::Published, "2025-12-01"),
        ];
        sort_for_display(&mut projects);
        let ids: Vec<u32> = projects.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![3, 5, 1, 2, 4]);
    }
}
