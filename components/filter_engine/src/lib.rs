//! Popup filter and sort engine
//!
//! Holds the last snapshot fetched from the background tracker together with
//! the user's filter settings, and derives the ordered list the popup shows.
//!
//! # Pipeline
//! 1. **Search**: case-insensitive substring on name or URL
//! 2. **Type**: keep selected categories; no selection shows nothing
//! 3. **Size**: half-open byte buckets
//! 4. **Sort**: stable, by size, time or name in either direction
//!
//! # Example
//!
//! ```no_run
//! use filter_engine::{FilterEngine, NullPresenter, SortDirection, SortKey};
//! use message_channel::{message_channel, DEFAULT_REQUEST_TIMEOUT};
//! use std::sync::Arc;
//!
//! # async fn run() -> filter_engine::Result<()> {
//! let (client, _server) = message_channel(16, DEFAULT_REQUEST_TIMEOUT);
//! let engine = FilterEngine::new(Arc::new(client), Arc::new(NullPresenter));
//!
//! engine.load_snapshot().await?;
//! let view = engine.set_sort(SortKey::Size, SortDirection::Descending);
//! println!("{} resources, {}", view.summary.count, view.summary.total_size_label());
//! # Ok(())
//! # }
//! ```

mod config;
mod engine;
mod error;
mod presenter;
mod view;

pub use config::{FilterConfig, FilterUpdate, SizeCategory, SortDirection, SortKey};
pub use engine::{EngineState, FilterEngine, LoadOutcome};
pub use error::{EngineError, Result};
pub use presenter::{NullPresenter, Presenter, CLEARED_MESSAGE, COPIED_MESSAGE, TOAST_DURATION};
pub use view::{
    compute_view, format_size, locale_compare, sort_view, ResourceView, ViewStatus, ViewSummary,
};
