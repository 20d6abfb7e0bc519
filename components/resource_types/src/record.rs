// Resource record types shared by the tracker and the filter engine

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;
use url::Url;

/// Name used when a URL yields neither a file name nor a host
pub const UNKNOWN_NAME: &str = "unknown";

/// Opaque request identifier assigned by the host network layer
pub type RequestId = String;

/// Coarse resource category
///
/// Host environments report their own spellings (Firefox uses
/// `xmlhttprequest`, Chromium uses `xhr`), so deserialization always goes
/// through [`ResourceType::normalize`]. Anything outside the closed set ends up
/// as [`ResourceType::Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum ResourceType {
    Image,
    Script,
    Stylesheet,
    Font,
    Media,
    Xhr,
    Document,
}

impl ResourceType {
    /// Every category, in display order
    pub const ALL: [ResourceType; 7] = [
        ResourceType::Image,
        ResourceType::Script,
        ResourceType::Stylesheet,
        ResourceType::Font,
        ResourceType::Media,
        ResourceType::Xhr,
        ResourceType::Document,
    ];

    /// Map a raw host category onto the closed set
    ///
    /// # Example
    /// ```
    /// use resource_types::ResourceType;
    ///
    /// assert_eq!(ResourceType::normalize("xmlhttprequest"), ResourceType::Xhr);
    /// assert_eq!(ResourceType::normalize("main_frame"), ResourceType::Document);
    /// ```
    pub fn normalize(raw: &str) -> Self {
        match raw {
            "image" => ResourceType::Image,
            "script" => ResourceType::Script,
            "stylesheet" => ResourceType::Stylesheet,
            "font" => ResourceType::Font,
            "media" => ResourceType::Media,
            "xmlhttprequest" | "xhr" => ResourceType::Xhr,
            _ => ResourceType::Document,
        }
    }

    /// Canonical wire spelling
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Image => "image",
            ResourceType::Script => "script",
            ResourceType::Stylesheet => "stylesheet",
            ResourceType::Font => "font",
            ResourceType::Media => "media",
            ResourceType::Xhr => "xhr",
            ResourceType::Document => "document",
        }
    }

    /// Short label shown on the type badge
    pub fn label(&self) -> &'static str {
        match self {
            ResourceType::Image => "Image",
            ResourceType::Script => "JS",
            ResourceType::Stylesheet => "CSS",
            ResourceType::Font => "Font",
            ResourceType::Media => "Media",
            ResourceType::Xhr => "XHR",
            ResourceType::Document => "Document",
        }
    }
}

impl From<String> for ResourceType {
    fn from(raw: String) -> Self {
        ResourceType::normalize(&raw)
    }
}

impl From<&str> for ResourceType {
    fn from(raw: &str) -> Self {
        ResourceType::normalize(raw)
    }
}

impl std::fmt::Display for ResourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single response header as delivered by the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpHeader {
    /// Header name
    pub name: String,
    /// Header value
    pub value: String,
}

impl HttpHeader {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Approximate resource weight: total characters of header names and values
///
/// This is the size metric the size buckets are calibrated against; it never
/// looks at the body.
pub fn header_size(headers: &[HttpHeader]) -> u64 {
    headers
        .iter()
        .map(|h| (h.name.chars().count() + h.value.chars().count()) as u64)
        .sum()
}

/// Last path segment of a parsed URL, or its host when the path ends in `/`
pub fn name_from_parsed(url: &Url) -> String {
    let path = url.path();
    let file_name = path.rsplit('/').next().unwrap_or_default();
    if !file_name.is_empty() {
        return file_name.to_string();
    }
    match url.host_str() {
        Some(host) if !host.is_empty() => host.to_string(),
        _ => UNKNOWN_NAME.to_string(),
    }
}

/// Display name for a raw URL string, `"unknown"` if it does not parse
pub fn name_from_url(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) => name_from_parsed(&parsed),
        Err(_) => UNKNOWN_NAME.to_string(),
    }
}

/// One observed network exchange
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRecord {
    /// Request identifier (only unique among in-flight requests)
    pub id: RequestId,
    /// Display name; empty when the sender left it out
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Full request URL
    pub url: String,
    /// Normalized category
    #[serde(rename = "type")]
    pub resource_type: ResourceType,
    /// Header-derived size in bytes
    #[serde(default, deserialize_with = "null_as_default")]
    pub size: u64,
    /// Load time in milliseconds
    #[serde(default, deserialize_with = "null_as_default")]
    pub time: u64,
}

impl ResourceRecord {
    /// Create a record, deriving the display name from the URL
    pub fn new(
        id: impl Into<RequestId>,
        url: impl Into<String>,
        resource_type: ResourceType,
        size: u64,
        time: u64,
    ) -> Self {
        let url = url.into();
        Self {
            id: id.into(),
            name: name_from_url(&url),
            url,
            resource_type,
            size,
            time,
        }
    }
}

/// Treat an explicit `null` like a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Decode a record list entry by entry, skipping the ones that do not fit
///
/// One malformed record must not cost the caller the rest of the snapshot.
pub(crate) fn lenient_records<'de, D>(deserializer: D) -> Result<Vec<ResourceRecord>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries = Vec::<Value>::deserialize(deserializer)?;
    let total = entries.len();

    let records: Vec<ResourceRecord> = entries
        .into_iter()
        .filter_map(|entry| match serde_json::from_value(entry) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("Skipping malformed resource record: {}", e);
                None
            }
        })
        .collect();

    if records.len() != total {
        warn!("Dropped {} of {} resource records", total - records.len(), total);
    }
    Ok(records)
}
