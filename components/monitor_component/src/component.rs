//! Main monitor component implementation

use crate::{MonitorConfig, MonitorError, Result};
use filter_engine::{FilterEngine, Presenter};
use message_channel::{message_channel, ChannelClient, MessageRouter, ResourceSource};
use resource_tracker::ResourceTracker;
use resource_types::ResourceRecord;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Background half of the extension plus the factory for popup engines
///
/// This component is responsible for:
/// - Owning the [`ResourceTracker`] that receives host request events
/// - Serving `getResources` / `clearResources` over the message channel
/// - Running the periodic sweep of stale pending requests
/// - Handing popup sessions a [`FilterEngine`] wired to the channel
///
/// # Example
///
/// ```no_run
/// use filter_engine::NullPresenter;
/// use monitor_component::{MonitorComponent, MonitorConfig};
/// use resource_tracker::now_millis;
/// use std::sync::Arc;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let monitor = MonitorComponent::new(MonitorConfig::default())?;
///     monitor.start().await?;
///
///     monitor.tracker().on_request_start("1", now_millis());
///
///     let popup = monitor.open_popup(Arc::new(NullPresenter)).await?;
///     popup.load_snapshot().await?;
///     Ok(())
/// }
/// ```
pub struct MonitorComponent {
    /// Configuration for this component
    config: MonitorConfig,

    /// Request log shared by the event entry points and the channel server
    tracker: ResourceTracker,

    /// Requester handle for the running channel
    client: Arc<RwLock<Option<ChannelClient>>>,

    /// Channel server and sweeper tasks (when running)
    tasks: Arc<RwLock<Vec<JoinHandle<()>>>>,

    /// Whether the background tasks are running
    running: Arc<AtomicBool>,
}

impl MonitorComponent {
    /// Create a new MonitorComponent with the given configuration
    ///
    /// The tracker starts accepting events immediately; the channel server
    /// and sweeper only run after [`start`](Self::start).
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::InvalidConfiguration`] for zero caps,
    /// intervals, timeouts or capacities.
    pub fn new(config: MonitorConfig) -> Result<Self> {
        debug!("Creating MonitorComponent with config: {:?}", config);
        config.validate()?;

        let tracker = ResourceTracker::with_config(config.tracker_config());

        Ok(Self {
            config,
            tracker,
            client: Arc::new(RwLock::new(None)),
            tasks: Arc::new(RwLock::new(Vec::new())),
            running: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Start the channel server and the pending-request sweeper
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::AlreadyRunning`] if called twice without a
    /// [`stop`](Self::stop) in between.
    pub async fn start(&self) -> Result<()> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(MonitorError::AlreadyRunning);
        }

        info!("Starting resource monitor");

        let (client, server) =
            message_channel(self.config.channel_capacity(), self.config.request_timeout());
        let router = Arc::new(MessageRouter::new(Arc::new(self.tracker.clone())));

        let server_handle = tokio::spawn(server.serve(router));
        let sweeper_handle = self.tracker.spawn_sweeper();

        *self.client.write().await = Some(client);
        self.tasks.write().await.extend([server_handle, sweeper_handle]);

        info!(
            "Resource monitor started (cap {}, sweep every {:?})",
            self.config.max_log_entries(),
            self.config.sweep_interval()
        );

        Ok(())
    }

    /// Stop the background tasks
    ///
    /// Engines created earlier keep their data but their next request fails
    /// with a closed channel. The log itself is left intact.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::NotRunning`] if the monitor was not started.
    pub async fn stop(&self) -> Result<()> {
        if !self.running.load(Ordering::SeqCst) {
            return Err(MonitorError::NotRunning);
        }

        info!("Stopping resource monitor");

        self.client.write().await.take();
        let handles: Vec<JoinHandle<()>> = self.tasks.write().await.drain(..).collect();
        for handle in handles {
            handle.abort();
            // Wait for the task to finish (it should abort quickly)
            let _ = handle.await;
        }

        self.running.store(false, Ordering::SeqCst);

        info!("Resource monitor stopped");

        Ok(())
    }

    /// Check if the background tasks are running
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Event entry points and direct log access
    pub fn tracker(&self) -> &ResourceTracker {
        &self.tracker
    }

    /// Get the configuration used by this component
    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Requester handle for the running channel
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::NotRunning`] before [`start`](Self::start).
    pub async fn client(&self) -> Result<ChannelClient> {
        self.client
            .read()
            .await
            .clone()
            .ok_or(MonitorError::NotRunning)
    }

    /// Fetch the log through the channel, the same round trip a popup makes
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::NotRunning`] before [`start`](Self::start) and
    /// [`MonitorError::Channel`] when the server task does not answer.
    pub async fn snapshot(&self) -> Result<Vec<ResourceRecord>> {
        let client = self.client().await?;
        Ok(client.get_resources().await?)
    }

    /// Create a popup engine talking to this monitor over the channel
    ///
    /// Every call returns an independent engine with default filters, as a
    /// freshly opened popup would have.
    pub async fn open_popup(&self, presenter: Arc<dyn Presenter>) -> Result<FilterEngine> {
        let client = self.client().await?;
        debug!("Opening popup engine");
        Ok(FilterEngine::with_exclusion(
            Arc::new(client),
            presenter,
            self.config.exclusion_rules(),
        ))
    }
}
