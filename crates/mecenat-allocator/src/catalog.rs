//! Searchable catalog of projects the donor can target.

use mecenat_types::ProjectInfo;

/// In-memory project catalog with free-text and category search.
#[derive(Debug, Clone, Default)]
pub struct ProjectCatalog {
    projects: Vec<ProjectInfo>,
}

impl ProjectCatalog {
    /// Build a catalog from a list of projects.
    pub fn new(projects: Vec<ProjectInfo>) -> Self {
        Self { projects }
    }

    /// Look up a project by id.
    pub fn get(&self, id: u32) -> Option<&ProjectInfo> {
        self.projects.iter().find(|p| p.id == id)
    }

    /// All catalog entries.
    pub fn projects(&self) -> &[ProjectInfo] {
        &self.projects
    }

    /// Number of catalog entries.
    pub fn len(&self) -> usize {
        self.projects.len()
    }

    /// True when the catalog holds no project.
    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    /// Case-insensitive substring search over title, location and category,
    /// optionally restricted to a category. An empty query matches every
    /// project of the selected category.
    pub fn search(&self, query: &str, category: Option<&str>) -> Vec<&ProjectInfo> {
        let query = query.trim().to_lowercase();
        self.projects
            .iter()
            .filter(|p| match category {
                Some(cat) if !cat.is_empty() => p.category == cat,
                _ => true,
            })
            .filter(|p| {
                if query.is_empty() {
                    return true;
                }
                let haystack =
                    format!("{} {} {}", p.title, p.location, p.category).to_lowercase();
                haystack.contains(&query)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::samples;

    #[test]
    fn search_matches_title_location_and_category() {
        let catalog = samples::project_catalog();

        let by_title = catalog.search("théâtre", None);
        assert!(by_title.iter().any(|p| p.title.contains("théâtre")));

        let by_location = catalog.search("lyon", None);
        assert_eq!(by_location.len(), 1);
        assert_eq!(by_location[0].location, "Lyon");

        let by_category = catalog.search("patrimoine", None);
        assert_eq!(by_category.len(), 1);
    }

    #[test]
    fn category_filter_restricts_results() {
        let catalog = samples::project_catalog();

        let musique = catalog.search("", Some("musique"));
        assert_eq!(musique.len(), 2);
        assert!(musique.iter().all(|p| p.category == "musique"));

        // empty category behaves like no filter
        let all = catalog.search("", Some(""));
        assert_eq!(all.len(), catalog.len());
    }

    #[test]
    fn no_match_yields_empty_result() {
        let catalog = samples::project_catalog();
        assert!(catalog.search("opéra de pékin", None).is_empty());
        assert!(catalog.search("grenoble", Some("musique")).is_empty());
    }
}
