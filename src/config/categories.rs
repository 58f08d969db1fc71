//! The category table used by the keyword classifier

use crate::config::types::{CategoryEntry, Config};

/// Built-in career/HR categories and their indicative keywords
const DEFAULT_CATEGORIES: &[(&str, &[&str])] = &[
    (
        "Internship",
        &["internship", "internships", "work with us internship"],
    ),
    ("Apprenticeship", &["apprenticeship", "apprenticeships"]),
    ("Traineeship", &["traineeship", "traineeships"]),
    ("WorkExperience", &["work experience", "experience with us"]),
    (
        "JobOrJobs",
        &["job", "jobs", "work with us", "career opportunities"],
    ),
    (
        "CareerOrCareers",
        &["career", "careers", "profession", "vocation", "occupation"],
    ),
    (
        "HROrHumanResources",
        &[
            "HR",
            "human resources",
            "talent acquisition",
            "people operations",
        ],
    ),
];

/// Returns the built-in category entries
pub fn default_categories() -> Vec<CategoryEntry> {
    DEFAULT_CATEGORIES
        .iter()
        .map(|(name, keywords)| CategoryEntry {
            name: name.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        })
        .collect()
}

/// A single category with lower-cased keywords
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    pub keywords: Vec<String>,
}

/// Static mapping from category name to keyword substrings
///
/// Order is preserved from the configuration; it determines the output
/// column order. Fixed for the duration of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTable {
    categories: Vec<Category>,
}

impl CategoryTable {
    /// Builds a table from entries, lower-casing every keyword
    pub fn new(entries: &[CategoryEntry]) -> Self {
        let categories = entries
            .iter()
            .map(|entry| Category {
                name: entry.name.clone(),
                keywords: entry
                    .keywords
                    .iter()
                    .map(|k| k.to_lowercase())
                    .filter(|k| !k.is_empty())
                    .collect(),
            })
            .collect();
        Self { categories }
    }

    /// Builds the table for a configuration, falling back to the built-in table
    pub fn from_config(config: &Config) -> Self {
        if config.categories.is_empty() {
            Self::new(&default_categories())
        } else {
            Self::new(&config.categories)
        }
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter()
    }

    /// Category names in table order
    pub fn names(&self) -> Vec<&str> {
        self.categories.iter().map(|c| c.name.as_str()).collect()
    }
}

impl Default for CategoryTable {
    fn default() -> Self {
        Self::new(&default_categories())
    }
}
