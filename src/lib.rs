//! Browser resource monitor
//!
//! Records the network requests a browser tab makes (name, URL, category,
//! header bytes, load time) and lets a popup search, filter and sort them.
//!
//! - [`ResourceTracker`] receives request start/complete/error events and
//!   keeps a capped, newest-last log.
//! - [`FilterEngine`] fetches snapshots over the message channel and derives
//!   the list the popup renders.
//! - [`MonitorComponent`] wires the two together and runs the background
//!   tasks.
//!
//! # Example
//!
//! ```no_run
//! use resource_monitor::{
//!     now_millis, CompletedRequest, MonitorComponent, MonitorConfig, NullPresenter, SizeCategory,
//! };
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let monitor = MonitorComponent::new(MonitorConfig::default())?;
//!     monitor.start().await?;
//!
//!     // Host timestamps are epoch milliseconds
//!     monitor.tracker().on_request_start("1", now_millis());
//!     monitor
//!         .tracker()
//!         .on_request_completed(CompletedRequest::new("1", "https://example.com/app.js", "script", now_millis()));
//!
//!     let popup = monitor.open_popup(Arc::new(NullPresenter)).await?;
//!     popup.load_snapshot().await?;
//!     let view = popup.set_size_category(SizeCategory::Tiny);
//!     println!("{} resources ({})", view.summary.count, view.summary.total_size_label());
//!
//!     monitor.stop().await?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]

pub use filter_engine::{
    compute_view, format_size, EngineError, EngineState, FilterConfig, FilterEngine, FilterUpdate,
    LoadOutcome, NullPresenter, Presenter, ResourceView, SizeCategory, SortDirection, SortKey,
    ViewStatus, ViewSummary,
};
pub use message_channel::{
    message_channel, ChannelClient, ChannelServer, MessageRouter, RequestHandler, ResourceSource,
};
pub use monitor_component::{MonitorComponent, MonitorConfig, MonitorConfigBuilder, MonitorError};
pub use resource_tracker::{
    now_millis, CompletedRequest, ResourceTracker, TrackerConfig, TrackerError,
};
pub use resource_types::{
    ChannelError, ExclusionRules, HttpHeader, ProtocolError, ResourceRecord, ResourceType,
    TrackerRequest, TrackerResponse,
};
