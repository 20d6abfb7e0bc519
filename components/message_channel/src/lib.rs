//! Request/response messaging between the popup and the background tracker
//!
//! The two sides never share memory. Requests and replies cross the channel as
//! serialized JSON payloads, the same shape the browser runtime messaging API
//! carries:
//!
//! - `{"action": "getResources"}` → `{"resources": [...]}`
//! - `{"action": "clearResources"}` → `{"status": "cleared"}`
//!
//! The responder side implements [`RequestHandler`]; a [`MessageRouter`] turns
//! raw payloads into typed requests and typed replies back into payloads. The
//! caller side uses a [`ChannelClient`], usually through the [`ResourceSource`]
//! trait.

pub mod channel;
pub mod source;

pub use channel::{message_channel, ChannelClient, ChannelServer, Envelope, DEFAULT_REQUEST_TIMEOUT};
pub use source::ResourceSource;

use async_trait::async_trait;
use resource_types::{ProtocolError, TrackerRequest, TrackerResponse};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error};

/// Trait implemented by the responder side of the channel
///
/// The handler receives already-decoded requests and returns the typed reply,
/// or a protocol error that is sent back as `{"error": {...}}`.
#[async_trait]
pub trait RequestHandler: Send + Sync {
    /// Handle a single request
    async fn handle_request(&self, request: TrackerRequest) -> Result<TrackerResponse, ProtocolError>;
}

/// Decodes incoming payloads, dispatches them to a [`RequestHandler`] and
/// encodes the reply
pub struct MessageRouter {
    handler: Arc<dyn RequestHandler>,
}

impl MessageRouter {
    /// Create a router around a request handler
    pub fn new(handler: Arc<dyn RequestHandler>) -> Self {
        Self { handler }
    }

    /// Handle an incoming JSON payload
    ///
    /// Never fails: malformed payloads and handler errors become error replies.
    ///
    /// # Arguments
    /// * `message` - JSON string containing the request
    ///
    /// # Returns
    /// JSON string containing the reply
    pub async fn handle_message(&self, message: &str) -> String {
        let request = match self.parse_request(message) {
            Ok(req) => req,
            Err(error) => return self.encode(TrackerResponse::failure(error)),
        };

        debug!("Routing request {:?}", request);

        match self.handler.handle_request(request).await {
            Ok(response) => self.encode(response),
            Err(error) => self.encode(TrackerResponse::failure(error)),
        }
    }

    /// Parse a JSON string into a request
    fn parse_request(&self, message: &str) -> Result<TrackerRequest, ProtocolError> {
        // Distinguish invalid JSON from valid JSON with the wrong shape
        let json: Value = serde_json::from_str(message).map_err(|e| {
            error!("Invalid JSON: {}", e);
            ProtocolError::parse_error()
        })?;

        serde_json::from_value::<TrackerRequest>(json).map_err(|e| {
            error!("Invalid request structure: {}", e);
            ProtocolError::invalid_request()
        })
    }

    fn encode(&self, response: TrackerResponse) -> String {
        serde_json::to_string(&response).unwrap_or_else(|e| {
            error!("Failed to serialize reply: {}", e);
            r#"{"error":{"code":-32603,"message":"Internal error"}}"#.to_string()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use resource_types::{ResourceRecord, ResourceType};

    struct FixedHandler;

    #[async_trait]
    impl RequestHandler for FixedHandler {
        async fn handle_request(
            &self,
            request: TrackerRequest,
        ) -> Result<TrackerResponse, ProtocolError> {
            match request {
                TrackerRequest::GetResources => Ok(TrackerResponse::resources(vec![
                    ResourceRecord::new("1", "https://example.com/a.js", ResourceType::Script, 10, 1),
                ])),
                TrackerRequest::ClearResources => Err(ProtocolError::internal_error("read only")),
            }
        }
    }

    fn router() -> MessageRouter {
        MessageRouter::new(Arc::new(FixedHandler))
    }

    #[tokio::test]
    async fn test_handle_message_success() {
        let response = router().handle_message(r#"{"action":"getResources"}"#).await;
        let json: Value = serde_json::from_str(&response).unwrap();

        assert_eq!(json["resources"][0]["name"], "a.js");
        assert!(json["error"].is_null());
    }

    #[tokio::test]
    async fn test_handle_message_handler_error() {
        let response = router().handle_message(r#"{"action":"clearResources"}"#).await;
        let json: Value = serde_json::from_str(&response).unwrap();

        assert_eq!(json["error"]["code"], -32603);
    }

    #[tokio::test]
    async fn test_handle_message_parse_error() {
        let response = router().handle_message("invalid json {{{").await;
        let json: Value = serde_json::from_str(&response).unwrap();

        assert_eq!(json["error"]["code"], -32700);
    }

    #[tokio::test]
    async fn test_handle_message_unknown_action() {
        let response = router().handle_message(r#"{"action":"reload"}"#).await;
        let json: Value = serde_json::from_str(&response).unwrap();

        assert_eq!(json["error"]["code"], -32600);
    }
}
