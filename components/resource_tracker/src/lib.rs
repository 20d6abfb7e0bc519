//! Background resource tracking
//!
//! Turns the host's network lifecycle events into [`ResourceRecord`]s and keeps
//! them in a bounded, insertion-ordered log that the popup reads through the
//! message channel.
//!
//! # Features
//! - **Load timing**: start timestamps are held per request id until the
//!   request completes or fails
//! - **Bounded log**: oldest records are evicted once the cap is exceeded
//! - **Pending sweep**: a timer task forgets requests that never finished
//! - **Self-instrumentation guard**: the extension's own assets are never logged

mod config;
mod error;

pub use config::{
    TrackerConfig, DEFAULT_MAX_ENTRIES, DEFAULT_PENDING_TIMEOUT, DEFAULT_SWEEP_INTERVAL,
};
pub use error::TrackerError;

use async_trait::async_trait;
use dashmap::DashMap;
use message_channel::RequestHandler;
use parking_lot::RwLock;
use resource_types::{
    header_size, name_from_parsed, HttpHeader, ProtocolError, RequestId, ResourceRecord,
    ResourceType, TrackerRequest, TrackerResponse,
};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};
use url::Url;

/// Current wall-clock time in milliseconds since the epoch
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// A request-completed event as delivered by the host network layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedRequest {
    /// Request identifier
    pub request_id: RequestId,
    /// Request URL
    pub url: String,
    /// Raw host category (`script`, `xmlhttprequest`, `main_frame`, ...)
    #[serde(rename = "type")]
    pub resource_type: String,
    /// Response headers, if the host exposed them
    pub response_headers: Option<Vec<HttpHeader>>,
    /// Completion time (ms since epoch)
    pub timestamp: u64,
}

impl CompletedRequest {
    /// Create a completion event without headers
    pub fn new(
        request_id: impl Into<RequestId>,
        url: impl Into<String>,
        resource_type: impl Into<String>,
        timestamp: u64,
    ) -> Self {
        Self {
            request_id: request_id.into(),
            url: url.into(),
            resource_type: resource_type.into(),
            response_headers: None,
            timestamp,
        }
    }

    /// Attach response headers
    pub fn with_headers(mut self, headers: Vec<HttpHeader>) -> Self {
        self.response_headers = Some(headers);
        self
    }
}

/// Resource tracker
///
/// All state lives behind `Arc`s, so clones share the same log and pending
/// map. Event handlers may be called concurrently for different request ids.
#[derive(Debug, Clone)]
pub struct ResourceTracker {
    /// In-flight requests (RequestId → start timestamp in ms)
    pending: Arc<DashMap<RequestId, u64>>,
    /// Completed records, oldest first
    log: Arc<RwLock<VecDeque<ResourceRecord>>>,
    /// Tracker settings
    config: TrackerConfig,
}

impl ResourceTracker {
    /// Create a tracker with default settings
    ///
    /// # Example
    /// ```
    /// use resource_tracker::ResourceTracker;
    ///
    /// let tracker = ResourceTracker::new();
    /// assert!(tracker.is_empty());
    /// ```
    pub fn new() -> Self {
        Self::with_config(TrackerConfig::default())
    }

    /// Create a tracker with custom settings
    pub fn with_config(config: TrackerConfig) -> Self {
        Self {
            pending: Arc::new(DashMap::new()),
            log: Arc::new(RwLock::new(VecDeque::with_capacity(config.max_entries.min(1024)))),
            config,
        }
    }

    /// Active configuration
    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// A request started; remember when
    ///
    /// `timestamp` is wall-clock milliseconds since the Unix epoch, the same
    /// clock as [`now_millis`]. The background sweep ages entries against that
    /// clock, so a timestamp from any other origin is swept on the next pass.
    ///
    /// Calling this twice for the same id keeps the later timestamp.
    pub fn on_request_start(&self, request_id: impl Into<RequestId>, timestamp: u64) {
        let request_id = request_id.into();
        debug!("Request started: {} at {}", request_id, timestamp);
        self.pending.insert(request_id, timestamp);
    }

    /// A request failed; forget its start time
    pub fn on_request_error(&self, request_id: &str) {
        if self.pending.remove(request_id).is_some() {
            debug!("Request failed: {}", request_id);
        }
    }

    /// A request completed; build its record and append it to the log
    ///
    /// The pending entry for the id is consumed whether or not a record is
    /// produced.
    ///
    /// # Returns
    /// The appended record, or `None` when the event was excluded or malformed
    pub fn on_request_completed(&self, event: CompletedRequest) -> Option<ResourceRecord> {
        let started_at = self.pending.remove(&event.request_id).map(|(_, start)| start);

        match self.build_record(&event, started_at) {
            Ok(record) => {
                self.append(record.clone());
                Some(record)
            }
            Err(TrackerError::Excluded(url)) => {
                debug!("Skipping extension resource: {}", url);
                None
            }
            Err(e) => {
                warn!("Dropping completion event {}: {}", event.request_id, e);
                None
            }
        }
    }

    fn build_record(
        &self,
        event: &CompletedRequest,
        started_at: Option<u64>,
    ) -> Result<ResourceRecord, TrackerError> {
        let exclusion = &self.config.exclusion;

        if exclusion.is_extension_url(&event.url) {
            return Err(TrackerError::Excluded(event.url.clone()));
        }

        let parsed = Url::parse(&event.url).map_err(|e| TrackerError::InvalidUrl {
            url: event.url.clone(),
            reason: e.to_string(),
        })?;

        let name = name_from_parsed(&parsed);
        if exclusion.is_excluded_name(&name) {
            return Err(TrackerError::Excluded(event.url.clone()));
        }

        let size = event
            .response_headers
            .as_deref()
            .map(header_size)
            .unwrap_or(0);

        // Clock skew between start and completion must not go negative
        let time = started_at
            .map(|start| event.timestamp.saturating_sub(start))
            .unwrap_or(0);

        Ok(ResourceRecord {
            id: event.request_id.clone(),
            name,
            url: event.url.clone(),
            resource_type: ResourceType::normalize(&event.resource_type),
            size,
            time,
        })
    }

    /// Append under one write guard so the cap holds under interleaving
    fn append(&self, record: ResourceRecord) {
        let mut log = self.log.write();
        log.push_back(record);
        while log.len() > self.config.max_entries {
            log.pop_front();
        }
    }

    /// Snapshot of the log in insertion order
    pub fn get_resources(&self) -> Vec<ResourceRecord> {
        self.log.read().iter().cloned().collect()
    }

    /// Drop every logged record
    pub fn clear_resources(&self) {
        let mut log = self.log.write();
        let count = log.len();
        log.clear();
        info!("Cleared {} resource records", count);
    }

    /// Number of logged records
    pub fn len(&self) -> usize {
        self.log.read().len()
    }

    /// Whether the log is empty
    pub fn is_empty(&self) -> bool {
        self.log.read().is_empty()
    }

    /// Number of requests still waiting for completion
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Whether a start timestamp is held for `request_id`
    pub fn is_pending(&self, request_id: &str) -> bool {
        self.pending.contains_key(request_id)
    }

    /// Forget pending requests that started more than the configured timeout
    /// before `now`
    ///
    /// # Returns
    /// Number of entries removed
    pub fn sweep_expired(&self, now: u64) -> usize {
        let timeout = self.config.pending_timeout.as_millis() as u64;
        let before = self.pending.len();
        self.pending
            .retain(|_, started_at| now.saturating_sub(*started_at) <= timeout);
        before.saturating_sub(self.pending.len())
    }

    /// Run [`sweep_expired`](Self::sweep_expired) on a fixed cadence
    ///
    /// The first sweep happens one interval after spawning. Abort the returned
    /// handle to stop it.
    pub fn spawn_sweeper(&self) -> JoinHandle<()> {
        let tracker = self.clone();
        let period = self.config.effective_sweep_interval();
        if period != self.config.sweep_interval {
            warn!("Zero sweep interval configured, using {:?}", period);
        }

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately
            ticker.tick().await;

            loop {
                ticker.tick().await;
                let removed = tracker.sweep_expired(now_millis());
                if removed > 0 {
                    debug!("Swept {} stale pending requests", removed);
                }
            }
        })
    }
}

impl Default for ResourceTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RequestHandler for ResourceTracker {
    async fn handle_request(
        &self,
        request: TrackerRequest,
    ) -> Result<TrackerResponse, ProtocolError> {
        match request {
            TrackerRequest::GetResources => Ok(TrackerResponse::resources(self.get_resources())),
            TrackerRequest::ClearResources => {
                self.clear_resources();
                Ok(TrackerResponse::cleared())
            }
        }
    }
}
