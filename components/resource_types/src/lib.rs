// Resource record types, exclusion rules, wire messages and error definitions
//
// Shared by the background tracker and the popup engine; neither side depends
// on the other, only on this crate.

pub mod errors;
pub mod exclusion;
pub mod record;

// Re-export commonly used types
pub use errors::{ChannelError, ProtocolError};
pub use exclusion::{ExclusionRules, EXCLUDED_FILE_NAMES, EXTENSION_SCHEMES};
pub use record::{
    header_size, name_from_parsed, name_from_url, HttpHeader, RequestId, ResourceRecord,
    ResourceType, UNKNOWN_NAME,
};

use serde::{Deserialize, Serialize};

/// Request sent from the popup to the tracker
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum TrackerRequest {
    /// Snapshot of every logged record
    GetResources,
    /// Drop every logged record
    ClearResources,
}

/// Acknowledgement value for a clear request
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ClearStatus {
    Cleared,
}

/// Reply sent from the tracker to the popup
///
/// Untagged on the wire: `{"resources": [...]}`, `{"status": "cleared"}` or
/// `{"error": {...}}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum TrackerResponse {
    /// Answer to [`TrackerRequest::GetResources`]
    Resources {
        #[serde(deserialize_with = "record::lenient_records")]
        resources: Vec<ResourceRecord>,
    },
    /// Answer to [`TrackerRequest::ClearResources`]
    Cleared { status: ClearStatus },
    /// The request could not be served
    Failure { error: ProtocolError },
}

impl TrackerResponse {
    pub fn resources(resources: Vec<ResourceRecord>) -> Self {
        TrackerResponse::Resources { resources }
    }

    pub fn cleared() -> Self {
        TrackerResponse::Cleared {
            status: ClearStatus::Cleared,
        }
    }

    pub fn failure(error: ProtocolError) -> Self {
        TrackerResponse::Failure { error }
    }
}
