//! Filter and sort settings

use resource_types::ResourceType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Size bucket selected in the size filter
///
/// Buckets are half-open: a 10 000 byte resource is `Small`, never `Tiny`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeCategory {
    #[default]
    All,
    /// [0, 10 000)
    Tiny,
    /// [10 000, 100 000)
    Small,
    /// [100 000, 1 000 000)
    Medium,
    /// [1 000 000, ∞)
    Large,
}

impl SizeCategory {
    /// Whether `size` falls in this bucket
    pub fn contains(&self, size: u64) -> bool {
        match self {
            SizeCategory::All => true,
            SizeCategory::Tiny => size < 10_000,
            SizeCategory::Small => (10_000..100_000).contains(&size),
            SizeCategory::Medium => (100_000..1_000_000).contains(&size),
            SizeCategory::Large => size >= 1_000_000,
        }
    }
}

/// Field the view is sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Keep the order records were logged in
    #[default]
    #[serde(alias = "default")]
    None,
    Size,
    Time,
    Name,
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    #[serde(alias = "asc")]
    Ascending,
    #[serde(alias = "desc")]
    Descending,
}

/// Current filter and sort configuration of the popup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterConfig {
    /// Case-insensitive substring matched against name or URL
    pub search: String,
    /// Size bucket
    pub size_category: SizeCategory,
    /// Categories to show; empty shows nothing
    pub selected_types: BTreeSet<ResourceType>,
    /// Sort field
    pub sort_key: SortKey,
    /// Sort direction
    pub sort_direction: SortDirection,
}

impl Default for FilterConfig {
    /// All types selected, no search, every size, logged order
    fn default() -> Self {
        Self {
            search: String::new(),
            size_category: SizeCategory::All,
            selected_types: ResourceType::ALL.into_iter().collect(),
            sort_key: SortKey::None,
            sort_direction: SortDirection::Ascending,
        }
    }
}

impl FilterConfig {
    /// Merge a partial update; fields left `None` keep their value
    pub fn apply(&mut self, update: FilterUpdate) {
        if let Some(search) = update.search {
            self.search = search;
        }
        if let Some(size_category) = update.size_category {
            self.size_category = size_category;
        }
        if let Some(selected_types) = update.selected_types {
            self.selected_types = selected_types;
        }
        if let Some(sort_key) = update.sort_key {
            self.sort_key = sort_key;
        }
        if let Some(sort_direction) = update.sort_direction {
            self.sort_direction = sort_direction;
        }
    }

    /// Whether every category is selected (the "All" checkbox state)
    pub fn all_types_selected(&self) -> bool {
        ResourceType::ALL
            .iter()
            .all(|t| self.selected_types.contains(t))
    }
}

/// Partial [`FilterConfig`] produced by a single user interaction
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterUpdate {
    pub search: Option<String>,
    pub size_category: Option<SizeCategory>,
    pub selected_types: Option<BTreeSet<ResourceType>>,
    pub sort_key: Option<SortKey>,
    pub sort_direction: Option<SortDirection>,
}

impl FilterUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn size_category(mut self, size_category: SizeCategory) -> Self {
        self.size_category = Some(size_category);
        self
    }

    pub fn selected_types<I>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = ResourceType>,
    {
        self.selected_types = Some(types.into_iter().collect());
        self
    }

    pub fn sort_key(mut self, sort_key: SortKey) -> Self {
        self.sort_key = Some(sort_key);
        self
    }

    pub fn sort_direction(mut self, sort_direction: SortDirection) -> Self {
        self.sort_direction = Some(sort_direction);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = FilterConfig::default();
        assert!(config.search.is_empty());
        assert_eq!(config.size_category, SizeCategory::All);
        assert_eq!(config.selected_types.len(), 7);
        assert!(config.all_types_selected());
        assert_eq!(config.sort_key, SortKey::None);
        assert_eq!(config.sort_direction, SortDirection::Ascending);
    }

    #[test]
    fn test_bucket_boundaries() {
        assert!(SizeCategory::Tiny.contains(0));
        assert!(SizeCategory::Tiny.contains(9_999));
        assert!(!SizeCategory::Tiny.contains(10_000));
        assert!(SizeCategory::Small.contains(10_000));
        assert!(SizeCategory::Small.contains(99_999));
        assert!(SizeCategory::Medium.contains(100_000));
        assert!(SizeCategory::Medium.contains(999_999));
        assert!(!SizeCategory::Medium.contains(1_000_000));
        assert!(SizeCategory::Large.contains(1_000_000));
        assert!(SizeCategory::All.contains(u64::MAX));
    }

    #[test]
    fn test_apply_partial_update() {
        let mut config = FilterConfig::default();
        config.apply(FilterUpdate::new().search("cdn").sort_key(SortKey::Size));

        assert_eq!(config.search, "cdn");
        assert_eq!(config.sort_key, SortKey::Size);
        // Untouched fields keep their values
        assert_eq!(config.size_category, SizeCategory::All);
        assert!(config.all_types_selected());

        config.apply(FilterUpdate::new().selected_types([ResourceType::Image]));
        assert!(!config.all_types_selected());
        assert_eq!(config.search, "cdn");
    }

    #[test]
    fn test_legacy_option_spellings() {
        let key: SortKey = serde_json::from_str("\"default\"").unwrap();
        assert_eq!(key, SortKey::None);
        let direction: SortDirection = serde_json::from_str("\"desc\"").unwrap();
        assert_eq!(direction, SortDirection::Descending);
        let size: SizeCategory = serde_json::from_str("\"medium\"").unwrap();
        assert_eq!(size, SizeCategory::Medium);
    }
}
