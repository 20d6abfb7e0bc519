// Self-instrumentation guard
//
// The extension must never report on its own UI assets. Both the tracker and
// the popup engine consult the same rules.

use serde::{Deserialize, Serialize};

/// URL schemes that identify extension-owned resources
pub const EXTENSION_SCHEMES: [&str; 2] = ["chrome-extension", "moz-extension"];

/// File names of the extension's own assets (case-sensitive)
pub const EXCLUDED_FILE_NAMES: [&str; 4] = ["main.html", "function.js", "background.js", "style.css"];

/// Rules deciding whether a resource belongs to the extension itself
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExclusionRules {
    /// Base URL the host assigned to this extension, if known
    pub extension_base_url: Option<String>,
    /// Exact file names to drop
    pub excluded_file_names: Vec<String>,
}

impl Default for ExclusionRules {
    fn default() -> Self {
        Self {
            extension_base_url: None,
            excluded_file_names: EXCLUDED_FILE_NAMES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ExclusionRules {
    /// Rules with the default file list and a known extension base URL
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            extension_base_url: Some(base_url.into()),
            ..Default::default()
        }
    }

    /// Whether `url` starts with an extension scheme or the extension base URL
    pub fn is_extension_url(&self, url: &str) -> bool {
        let by_scheme = EXTENSION_SCHEMES.iter().any(|scheme| {
            url.strip_prefix(scheme)
                .map(|rest| rest.starts_with("://"))
                .unwrap_or(false)
        });
        by_scheme || self.matches_base_url(url)
    }

    /// Whether an extension scheme appears anywhere in `url`
    ///
    /// The popup re-validates snapshots with this looser check, which also
    /// catches extension URLs embedded in query strings or redirects.
    pub fn mentions_extension(&self, url: &str) -> bool {
        let by_scheme = EXTENSION_SCHEMES
            .iter()
            .any(|scheme| url.contains(&format!("{}://", scheme)));
        by_scheme || self.matches_base_url(url)
    }

    /// Whether `name` is one of the extension's own file names
    pub fn is_excluded_name(&self, name: &str) -> bool {
        self.excluded_file_names.iter().any(|excluded| excluded == name)
    }

    fn matches_base_url(&self, url: &str) -> bool {
        match self.extension_base_url.as_deref() {
            Some(base) if !base.is_empty() => url.starts_with(base),
            _ => false,
        }
    }
}
