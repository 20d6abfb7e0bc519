//! Async transport between caller and responder
//!
//! A bounded tokio mpsc queue carries [`Envelope`]s; each envelope owns a
//! oneshot sender for its reply. The caller bounds the whole round trip with a
//! timeout so a stalled responder surfaces as [`ChannelError::Timeout`].

use crate::MessageRouter;
use resource_types::{ChannelError, TrackerRequest, TrackerResponse};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

/// Default bound on a single request/response round trip
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// A serialized request plus the slot its reply goes into
#[derive(Debug)]
pub struct Envelope {
    /// JSON request payload
    pub payload: String,
    /// Where the JSON reply is delivered
    pub reply: oneshot::Sender<String>,
}

/// Create a connected client/server pair
///
/// # Arguments
/// * `capacity` - Number of requests that may queue before senders wait
/// * `timeout` - Bound on each round trip made through the client
pub fn message_channel(capacity: usize, timeout: Duration) -> (ChannelClient, ChannelServer) {
    let (sender, receiver) = mpsc::channel(capacity.max(1));
    (
        ChannelClient { sender, timeout },
        ChannelServer { receiver },
    )
}

/// Caller side of the channel; cheap to clone
#[derive(Debug, Clone)]
pub struct ChannelClient {
    sender: mpsc::Sender<Envelope>,
    timeout: Duration,
}

impl ChannelClient {
    /// Send a typed request and decode the typed reply
    ///
    /// An `{"error": ...}` reply is returned as [`ChannelError::Remote`].
    pub async fn request(&self, request: TrackerRequest) -> Result<TrackerResponse, ChannelError> {
        let payload = serde_json::to_string(&request)?;
        let raw = self.request_raw(payload).await?;

        match serde_json::from_str::<TrackerResponse>(&raw)? {
            TrackerResponse::Failure { error } => {
                warn!("{:?} rejected by responder: {}", request, error);
                Err(ChannelError::Remote(error))
            }
            response => Ok(response),
        }
    }

    /// Send a raw payload and wait for the raw reply
    pub async fn request_raw(&self, payload: String) -> Result<String, ChannelError> {
        let (reply, reply_rx) = oneshot::channel();

        let round_trip = async {
            self.sender
                .send(Envelope { payload, reply })
                .await
                .map_err(|_| ChannelError::Closed)?;
            reply_rx.await.map_err(|_| ChannelError::Closed)
        };

        match tokio::time::timeout(self.timeout, round_trip).await {
            Ok(result) => result,
            Err(_) => {
                let millis = self.timeout.as_millis() as u64;
                warn!("Request timed out after {} ms", millis);
                Err(ChannelError::Timeout(millis))
            }
        }
    }

    /// Configured round-trip timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Whether the responder has gone away
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

/// Responder side of the channel
#[derive(Debug)]
pub struct ChannelServer {
    receiver: mpsc::Receiver<Envelope>,
}

impl ChannelServer {
    /// Serve requests until every client is dropped
    ///
    /// Requests are answered one at a time, in arrival order.
    pub async fn serve(mut self, router: Arc<MessageRouter>) {
        info!("Message channel server started");

        while let Some(envelope) = self.receiver.recv().await {
            let reply = router.handle_message(&envelope.payload).await;
            if envelope.reply.send(reply).is_err() {
                debug!("Caller went away before the reply was delivered");
            }
        }

        info!("All clients dropped, message channel server stopped");
    }

    /// Take the next raw envelope without routing it
    pub async fn next_envelope(&mut self) -> Option<Envelope> {
        self.receiver.recv().await
    }
}
