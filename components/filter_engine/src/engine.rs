//! Popup-side engine: working set, filter state and the derived view

use crate::config::{FilterConfig, FilterUpdate, SizeCategory, SortDirection, SortKey};
use crate::error::{EngineError, Result};
use crate::presenter::{Presenter, CLEARED_MESSAGE, COPIED_MESSAGE};
use crate::view::{compute_view, ResourceView};
use message_channel::ResourceSource;
use parking_lot::Mutex;
use resource_types::{name_from_url, ExclusionRules, ResourceRecord, ResourceType};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Lifecycle of the engine's snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EngineState {
    /// Freshly created, nothing requested yet
    Idle,
    /// A snapshot request is outstanding
    Loading,
    /// The working set reflects the latest snapshot
    Ready,
    /// The latest snapshot request failed; the previous working set is kept
    LoadError,
}

/// How a [`FilterEngine::load_snapshot`] call ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The working set was replaced; carries the number of records kept
    Loaded(usize),
    /// A newer load or a clear started meanwhile; the response was discarded
    Superseded,
}

#[derive(Debug)]
struct EngineInner {
    state: EngineState,
    has_snapshot: bool,
    /// Generation of the load that produced the working set
    applied_generation: u64,
    /// Loads at or below this generation were overtaken by a clear
    superseded_upto: u64,
    working_set: Vec<ResourceRecord>,
    config: FilterConfig,
    view: ResourceView,
}

impl EngineInner {
    fn new() -> Self {
        Self {
            state: EngineState::Idle,
            has_snapshot: false,
            applied_generation: 0,
            superseded_upto: 0,
            working_set: Vec::new(),
            config: FilterConfig::default(),
            view: ResourceView::not_loaded(),
        }
    }

    fn refresh_view(&mut self) -> ResourceView {
        self.view = if self.has_snapshot {
            ResourceView::loaded(compute_view(&self.working_set, &self.config))
        } else {
            ResourceView::not_loaded()
        };
        self.view.clone()
    }
}

/// Filter-sort engine
///
/// Owns the popup's copy of the records plus the [`FilterConfig`], and
/// recomputes the view on every change. Only [`load_snapshot`] and [`clear`]
/// await; everything else is synchronous.
///
/// Each load takes a generation number. A response is applied only if no
/// newer load started while it was in flight and no clear issued after it
/// has completed. The working set and view are replaced under one lock.
///
/// [`load_snapshot`]: FilterEngine::load_snapshot
/// [`clear`]: FilterEngine::clear
pub struct FilterEngine {
    source: Arc<dyn ResourceSource>,
    presenter: Arc<dyn Presenter>,
    exclusion: ExclusionRules,
    inner: Mutex<EngineInner>,
    generation: AtomicU64,
}

impl FilterEngine {
    /// Create an engine in the `Idle` state
    ///
    /// # Arguments
    /// * `source` - Where snapshots come from (normally a channel client)
    /// * `presenter` - Receives rendered views and status messages
    pub fn new(source: Arc<dyn ResourceSource>, presenter: Arc<dyn Presenter>) -> Self {
        Self::with_exclusion(source, presenter, ExclusionRules::default())
    }

    /// Create an engine with custom self-instrumentation rules
    pub fn with_exclusion(
        source: Arc<dyn ResourceSource>,
        presenter: Arc<dyn Presenter>,
        exclusion: ExclusionRules,
    ) -> Self {
        Self {
            source,
            presenter,
            exclusion,
            inner: Mutex::new(EngineInner::new()),
            generation: AtomicU64::new(0),
        }
    }

    /// Fetch a fresh snapshot from the tracker and replace the working set
    ///
    /// On failure the working set is untouched, the engine enters
    /// `LoadError` and the presenter gets a status message. Calling this
    /// again retries.
    pub async fn load_snapshot(&self) -> Result<LoadOutcome> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.inner.lock().state = EngineState::Loading;
        debug!("Loading snapshot (generation {})", generation);

        let result = self.source.get_resources().await;

        let mut inner = self.inner.lock();
        if self.generation.load(Ordering::SeqCst) != generation
            || generation <= inner.superseded_upto
        {
            debug!("Discarding superseded snapshot (generation {})", generation);
            return Ok(LoadOutcome::Superseded);
        }

        match result {
            Ok(records) => {
                let received = records.len();
                inner.working_set = self.sanitize(records);
                inner.applied_generation = generation;
                inner.has_snapshot = true;
                inner.state = EngineState::Ready;
                let kept = inner.working_set.len();
                let view = inner.refresh_view();
                drop(inner);

                if kept != received {
                    debug!("Dropped {} extension records from snapshot", received - kept);
                }
                info!("Loaded {} resources", kept);
                self.presenter.render(&view);
                Ok(LoadOutcome::Loaded(kept))
            }
            Err(e) => {
                inner.state = EngineState::LoadError;
                drop(inner);

                warn!("Failed to load resources: {}", e);
                self.presenter
                    .show_status(&format!("Failed to load resources: {}", e));
                Err(EngineError::Channel(e))
            }
        }
    }

    /// Fill in missing names and drop the extension's own assets again
    fn sanitize(&self, records: Vec<ResourceRecord>) -> Vec<ResourceRecord> {
        records
            .into_iter()
            .map(|mut record| {
                if record.name.is_empty() {
                    record.name = name_from_url(&record.url);
                }
                record
            })
            .filter(|record| {
                !(self.exclusion.mentions_extension(&record.url)
                    || self.exclusion.is_excluded_name(&record.name))
            })
            .collect()
    }

    /// Ask the tracker to drop its log, then empty the local working set
    ///
    /// Snapshots requested before the clear are superseded; one requested
    /// while the clear is in flight already sees the emptied log and is kept.
    /// If the tracker cannot be reached nothing changes locally.
    pub async fn clear(&self) -> Result<()> {
        let issued_at = self.generation.load(Ordering::SeqCst);

        if let Err(e) = self.source.clear_resources().await {
            warn!("Failed to clear resources: {}", e);
            self.presenter
                .show_status(&format!("Failed to clear resources: {}", e));
            return Err(EngineError::Channel(e));
        }

        let view = {
            let mut inner = self.inner.lock();
            inner.superseded_upto = inner.superseded_upto.max(issued_at);
            if inner.applied_generation <= issued_at {
                inner.working_set.clear();
                inner.applied_generation = issued_at;
                inner.has_snapshot = true;
            }
            if self.generation.load(Ordering::SeqCst) == issued_at {
                inner.state = EngineState::Ready;
            }
            inner.refresh_view()
        };

        info!("Resource list cleared");
        self.presenter.render(&view);
        self.presenter.show_status(CLEARED_MESSAGE);
        Ok(())
    }

    /// Merge a partial filter update and recompute the view
    pub fn set_filter(&self, update: FilterUpdate) -> ResourceView {
        let view = {
            let mut inner = self.inner.lock();
            inner.config.apply(update);
            inner.refresh_view()
        };
        self.presenter.render(&view);
        view
    }

    /// Set the search text
    pub fn set_search(&self, search: impl Into<String>) -> ResourceView {
        self.set_filter(FilterUpdate::new().search(search))
    }

    /// Set the size bucket
    pub fn set_size_category(&self, size_category: SizeCategory) -> ResourceView {
        self.set_filter(FilterUpdate::new().size_category(size_category))
    }

    /// Set sort key and direction
    pub fn set_sort(&self, key: SortKey, direction: SortDirection) -> ResourceView {
        self.set_filter(FilterUpdate::new().sort_key(key).sort_direction(direction))
    }

    /// Toggle one category's checkbox
    pub fn set_type_selected(&self, resource_type: ResourceType, selected: bool) -> ResourceView {
        let mut types = self.inner.lock().config.selected_types.clone();
        if selected {
            types.insert(resource_type);
        } else {
            types.remove(&resource_type);
        }
        self.set_filter(FilterUpdate::new().selected_types(types))
    }

    /// The "All" checkbox: select or deselect every category
    pub fn select_all_types(&self, selected: bool) -> ResourceView {
        let types: Vec<ResourceType> = if selected {
            ResourceType::ALL.to_vec()
        } else {
            Vec::new()
        };
        self.set_filter(FilterUpdate::new().selected_types(types))
    }

    /// Whether every category is currently selected
    pub fn all_types_selected(&self) -> bool {
        self.inner.lock().config.all_types_selected()
    }

    /// Recompute the view from the current working set and config
    pub fn compute_view(&self) -> Vec<ResourceRecord> {
        let inner = self.inner.lock();
        compute_view(&inner.working_set, &inner.config)
    }

    /// Copy the URL of the view entry at `index` to the clipboard
    pub fn copy_url(&self, index: usize) -> Result<String> {
        let url = {
            let inner = self.inner.lock();
            let len = inner.view.records.len();
            inner
                .view
                .records
                .get(index)
                .map(|r| r.url.clone())
                .ok_or(EngineError::IndexOutOfRange { index, len })?
        };

        self.presenter.copy_to_clipboard(&url);
        self.presenter.show_status(COPIED_MESSAGE);
        Ok(url)
    }

    /// Return to `Idle` with an empty working set and default filters
    ///
    /// Outstanding loads are superseded.
    pub fn reset(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        *self.inner.lock() = EngineInner::new();
        debug!("Engine reset");
    }

    /// Last computed view
    pub fn view(&self) -> ResourceView {
        self.inner.lock().view.clone()
    }

    /// Current lifecycle state
    pub fn state(&self) -> EngineState {
        self.inner.lock().state
    }

    /// Current filter configuration
    pub fn config(&self) -> FilterConfig {
        self.inner.lock().config.clone()
    }

    /// Number of records in the working set (before filtering)
    pub fn working_set_len(&self) -> usize {
        self.inner.lock().working_set.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presenter::NullPresenter;
    use async_trait::async_trait;
    use resource_types::ChannelError;

    struct StaticSource(Vec<ResourceRecord>);

    #[async_trait]
    impl ResourceSource for StaticSource {
        async fn get_resources(&self) -> std::result::Result<Vec<ResourceRecord>, ChannelError> {
            Ok(self.0.clone())
        }

        async fn clear_resources(&self) -> std::result::Result<(), ChannelError> {
            Ok(())
        }
    }

    fn engine_with(records: Vec<ResourceRecord>) -> FilterEngine {
        FilterEngine::new(Arc::new(StaticSource(records)), Arc::new(NullPresenter))
    }

    #[tokio::test]
    async fn test_new_engine_is_idle() {
        let engine = engine_with(Vec::new());
        assert_eq!(engine.state(), EngineState::Idle);
        assert_eq!(engine.view().status, crate::ViewStatus::NotLoaded);
    }

    #[tokio::test]
    async fn test_sanitize_recomputes_name_and_drops_extension_records() {
        let mut unnamed = ResourceRecord::new("1", "https://example.com/lib/d3.js", ResourceType::Script, 1, 1);
        unnamed.name.clear();
        let records = vec![
            unnamed,
            ResourceRecord::new("2", "moz-extension://abc/popup.js", ResourceType::Script, 1, 1),
            ResourceRecord::new("3", "https://example.com/style.css", ResourceType::Stylesheet, 1, 1),
            ResourceRecord::new("4", "https://example.com/?ref=chrome-extension://x", ResourceType::Document, 1, 1),
        ];
        let engine = engine_with(records);

        let outcome = engine.load_snapshot().await.unwrap();
        assert_eq!(outcome, LoadOutcome::Loaded(1));
        assert_eq!(engine.view().records[0].name, "d3.js");
        assert_eq!(engine.state(), EngineState::Ready);
    }

    #[tokio::test]
    async fn test_reset_returns_to_idle() {
        let engine = engine_with(vec![ResourceRecord::new(
            "1",
            "https://example.com/a.js",
            ResourceType::Script,
            1,
            1,
        )]);
        engine.load_snapshot().await.unwrap();
        engine.set_search("zzz");

        engine.reset();
        assert_eq!(engine.state(), EngineState::Idle);
        assert_eq!(engine.working_set_len(), 0);
        assert_eq!(engine.config(), FilterConfig::default());
    }

    #[tokio::test]
    async fn test_copy_url_out_of_range() {
        let engine = engine_with(Vec::new());
        engine.load_snapshot().await.unwrap();

        assert_eq!(
            engine.copy_url(0),
            Err(EngineError::IndexOutOfRange { index: 0, len: 0 })
        );
    }
}
