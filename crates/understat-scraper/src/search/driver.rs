//! Browser-automation seam used by the search service.
//!
//! Every call blocks and may fail with a [`DriverError`]; the search service
//! treats any such failure as fatal to the current resolution call.

use crate::error::DriverError;

/// Something that can start an independent browser session.
pub trait BrowserDriver {
    type Session: DriverSession;

    /// Starts a fresh session. Each resolution call owns its own session.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError`] if the browser cannot be launched.
    fn open(&self) -> Result<Self::Session, DriverError>;
}

/// One live browser session (a single tab).
pub trait DriverSession {
    /// # Errors
    ///
    /// Returns [`DriverError`] if navigation fails.
    fn navigate(&mut self, url: &str) -> Result<(), DriverError>;

    /// Focuses the element matched by `selector` and types `text` into it.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError`] if the element is missing or rejects input.
    fn submit_text(&mut self, selector: &str, text: &str) -> Result<(), DriverError>;

    /// Clicks the first element matched by `selector`.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError`] if the element is missing or the click fails.
    fn click(&mut self, selector: &str) -> Result<(), DriverError>;

    /// Snapshots every element currently matched by `selector`, in document
    /// order. No match is an empty vector, not an error.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError`] if the page cannot be queried.
    fn query_all(&mut self, selector: &str) -> Result<Vec<ElementSnapshot>, DriverError>;

    /// Ends the session. Called exactly once per session by the search service.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError`] if the browser does not shut down cleanly.
    fn close(&mut self) -> Result<(), DriverError>;
}

/// Text and link target of a rendered element, read at query time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementSnapshot {
    text: String,
    link_target: Option<String>,
}

impl ElementSnapshot {
    pub fn new(text: impl Into<String>, link_target: Option<String>) -> Self {
        Self {
            text: text.into(),
            link_target,
        }
    }

    /// Rendered text, lines separated by `\n`.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// `href` of the element itself or of its first link descendant.
    #[must_use]
    pub fn link_target(&self) -> Option<&str> {
        self.link_target.as_deref()
    }
}
