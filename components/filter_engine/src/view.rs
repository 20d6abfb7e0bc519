//! Deriving the visible list from the working set

use crate::config::{FilterConfig, SortDirection, SortKey};
use resource_types::ResourceRecord;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Filter and sort `records` according to `config`
///
/// Stages run in a fixed order, each on the previous stage's output: search,
/// type, size bucket, then a stable sort. Pure: the same inputs always give
/// the same output.
///
/// # Example
/// ```
/// use filter_engine::{compute_view, FilterConfig, FilterUpdate};
/// use resource_types::{ResourceRecord, ResourceType};
///
/// let records = vec![
///     ResourceRecord::new("1", "https://x.test/a.js", ResourceType::Script, 5000, 100),
///     ResourceRecord::new("2", "https://x.test/b.png", ResourceType::Image, 200000, 50),
/// ];
/// let mut config = FilterConfig::default();
/// config.apply(FilterUpdate::new().search("a."));
///
/// let view = compute_view(&records, &config);
/// assert_eq!(view.len(), 1);
/// assert_eq!(view[0].name, "a.js");
/// ```
pub fn compute_view(records: &[ResourceRecord], config: &FilterConfig) -> Vec<ResourceRecord> {
    // An empty type selection means "show nothing", not "no filter"
    if config.selected_types.is_empty() {
        return Vec::new();
    }

    let needle = config.search.to_lowercase();

    let mut view: Vec<ResourceRecord> = records
        .iter()
        .filter(|r| needle.is_empty() || matches_search(r, &needle))
        .filter(|r| config.selected_types.contains(&r.resource_type))
        .filter(|r| config.size_category.contains(r.size))
        .cloned()
        .collect();

    sort_view(&mut view, config.sort_key, config.sort_direction);
    view
}

fn matches_search(record: &ResourceRecord, needle: &str) -> bool {
    record.name.to_lowercase().contains(needle) || record.url.to_lowercase().contains(needle)
}

/// Stable sort; equal keys keep their relative order in both directions
pub fn sort_view(view: &mut [ResourceRecord], key: SortKey, direction: SortDirection) {
    let ascending = direction == SortDirection::Ascending;

    match key {
        SortKey::None => {}
        SortKey::Size => view.sort_by(|a, b| {
            let ord = b.size.cmp(&a.size);
            if ascending {
                ord.reverse()
            } else {
                ord
            }
        }),
        SortKey::Time => view.sort_by(|a, b| {
            let ord = b.time.cmp(&a.time);
            if ascending {
                ord.reverse()
            } else {
                ord
            }
        }),
        SortKey::Name => view.sort_by(|a, b| {
            let ord = locale_compare(&a.name, &b.name);
            if ascending {
                ord
            } else {
                ord.reverse()
            }
        }),
    }
}

/// Collation-style string comparison
///
/// Letters compare case-insensitively first; on a tie lowercase sorts before
/// uppercase, and byte order settles whatever remains.
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));

    folded
        .then_with(|| {
            a.chars()
                .zip(b.chars())
                .map(|(x, y)| x.is_uppercase().cmp(&y.is_uppercase()))
                .find(|ord| *ord != Ordering::Equal)
                .unwrap_or(Ordering::Equal)
        })
        .then_with(|| a.cmp(b))
}

/// Human-readable byte count: `B` below 1 KiB, then `KB`, then `MB`
pub fn format_size(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = 1024 * 1024;

    if bytes < KIB {
        format!("{} B", bytes)
    } else if bytes < MIB {
        format!("{:.1} KB", bytes as f64 / KIB as f64)
    } else {
        format!("{:.1} MB", bytes as f64 / MIB as f64)
    }
}

/// Aggregates shown under the list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewSummary {
    /// Number of records in the view
    pub count: usize,
    /// Sum of `size` over the view
    pub total_size: u64,
}

impl ViewSummary {
    pub fn of(records: &[ResourceRecord]) -> Self {
        Self {
            count: records.len(),
            total_size: records.iter().map(|r| r.size).sum(),
        }
    }

    /// Total size label; an empty view reads "0 KB"
    pub fn total_size_label(&self) -> String {
        if self.count == 0 {
            "0 KB".to_string()
        } else {
            format_size(self.total_size)
        }
    }
}

/// What the list area should show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ViewStatus {
    /// No snapshot has been loaded yet
    NotLoaded,
    /// A snapshot is loaded but nothing matches ("no matching resources")
    Empty,
    /// At least one record is visible
    Populated,
}

/// The derived view handed to the presentation layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceView {
    pub records: Vec<ResourceRecord>,
    pub summary: ViewSummary,
    pub status: ViewStatus,
}

impl ResourceView {
    /// View shown before any snapshot arrives
    pub fn not_loaded() -> Self {
        Self {
            records: Vec::new(),
            summary: ViewSummary::default(),
            status: ViewStatus::NotLoaded,
        }
    }

    /// Wrap filtered records for a loaded snapshot
    pub fn loaded(records: Vec<ResourceRecord>) -> Self {
        let summary = ViewSummary::of(&records);
        let status = if records.is_empty() {
            ViewStatus::Empty
        } else {
            ViewStatus::Populated
        };
        Self {
            records,
            summary,
            status,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Default for ResourceView {
    fn default() -> Self {
        Self::not_loaded()
    }
}
