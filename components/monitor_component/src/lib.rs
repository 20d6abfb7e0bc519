//! Resource monitor orchestration
//!
//! This crate provides the MonitorComponent that wires the request tracker,
//! the message channel between background and popup, and the periodic sweep
//! of stale pending requests, and hands out popup filter engines.
//!
//! # Example
//!
//! ```no_run
//! use filter_engine::NullPresenter;
//! use monitor_component::{MonitorComponent, MonitorConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = MonitorConfig::builder()
//!         .max_log_entries(1000)
//!         .extension_base_url("moz-extension://0f1e2d/")
//!         .build();
//!
//!     let monitor = MonitorComponent::new(config)?;
//!     monitor.start().await?;
//!
//!     let popup = monitor.open_popup(Arc::new(NullPresenter)).await?;
//!     popup.load_snapshot().await?;
//!     Ok(())
//! }
//! ```

mod component;
mod config;
mod error;

pub use component::MonitorComponent;
pub use config::{MonitorConfig, MonitorConfigBuilder};
pub use error::{MonitorError, Result};

#[cfg(test)]
mod tests {
    use super::*;
    use resource_tracker::CompletedRequest;
    use resource_types::HttpHeader;

    #[tokio::test]
    async fn test_events_reach_popup() {
        let monitor = MonitorComponent::new(MonitorConfig::default()).unwrap();
        monitor.start().await.unwrap();

        let tracker = monitor.tracker();
        let started = resource_tracker::now_millis();
        tracker.on_request_start("7", started);
        tracker.on_request_completed(
            CompletedRequest::new("7", "https://example.com/app.js", "script", started + 40)
                .with_headers(vec![HttpHeader::new("a", "bc")]),
        );

        let popup = monitor
            .open_popup(std::sync::Arc::new(filter_engine::NullPresenter))
            .await
            .unwrap();
        popup.load_snapshot().await.unwrap();

        let view = popup.view();
        assert_eq!(view.summary.count, 1);
        assert_eq!(view.records[0].name, "app.js");
        assert_eq!(view.records[0].size, 3);
        assert_eq!(view.records[0].time, 40);
    }

    #[tokio::test]
    async fn test_stop_closes_popup_channel() {
        let monitor = MonitorComponent::new(MonitorConfig::default()).unwrap();
        monitor.start().await.unwrap();
        let popup = monitor
            .open_popup(std::sync::Arc::new(filter_engine::NullPresenter))
            .await
            .unwrap();

        monitor.stop().await.unwrap();
        assert!(popup.load_snapshot().await.is_err());
    }
}
