//! Presentation layer seam
//!
//! Rendering markup, clipboard access and toast animation live outside this
//! crate. The engine only talks to them through [`Presenter`].

use crate::view::ResourceView;
use std::time::Duration;

/// How long a status toast stays visible
pub const TOAST_DURATION: Duration = Duration::from_secs(2);

/// Status shown after the log was cleared
pub const CLEARED_MESSAGE: &str = "Resource list cleared";

/// Status shown after a URL was copied
pub const COPIED_MESSAGE: &str = "URL copied to clipboard";

/// Receives every recomputed view and transient status messages
pub trait Presenter: Send + Sync {
    /// Draw the list and its aggregates
    fn render(&self, view: &ResourceView);

    /// Show a toast for [`TOAST_DURATION`]
    fn show_status(&self, message: &str);

    /// Put `text` on the clipboard
    fn copy_to_clipboard(&self, text: &str);
}

/// Presenter that discards everything, for headless use
#[derive(Debug, Default, Clone, Copy)]
pub struct NullPresenter;

impl Presenter for NullPresenter {
    fn render(&self, _view: &ResourceView) {}

    fn show_status(&self, _message: &str) {}

    fn copy_to_clipboard(&self, _text: &str) {}
}
