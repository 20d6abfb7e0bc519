//! Caller-facing view of the tracker

use crate::ChannelClient;
use async_trait::async_trait;
use resource_types::{ChannelError, ResourceRecord, TrackerRequest, TrackerResponse};

/// Where the popup engine gets its records from
///
/// Implemented by [`ChannelClient`]; tests substitute in-memory sources.
#[async_trait]
pub trait ResourceSource: Send + Sync {
    /// Fetch a snapshot of every logged record, in insertion order
    async fn get_resources(&self) -> Result<Vec<ResourceRecord>, ChannelError>;

    /// Ask the tracker to drop its log
    async fn clear_resources(&self) -> Result<(), ChannelError>;
}

#[async_trait]
impl ResourceSource for ChannelClient {
    async fn get_resources(&self) -> Result<Vec<ResourceRecord>, ChannelError> {
        match self.request(TrackerRequest::GetResources).await? {
            TrackerResponse::Resources { resources } => Ok(resources),
            other => Err(ChannelError::UnexpectedResponse(format!("{:?}", other))),
        }
    }

    async fn clear_resources(&self) -> Result<(), ChannelError> {
        match self.request(TrackerRequest::ClearResources).await? {
            TrackerResponse::Cleared { .. } => Ok(()),
            other => Err(ChannelError::UnexpectedResponse(format!("{:?}", other))),
        }
    }
}
