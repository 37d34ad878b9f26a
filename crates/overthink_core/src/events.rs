//! Events extracted from a video.

use serde::{Deserialize, Serialize};

/// Ordered list of textual event descriptions.
///
/// May hold a single general-summary string when the video has no discrete
/// events.
///
/// # Examples
///
/// ```
/// use overthink_core::EventSummary;
///
/// let events = EventSummary::new(vec![
///     "Alice gave a talk".to_string(),
///     "Bob spilled coffee".to_string(),
/// ]);
/// assert_eq!(events.joined(), "Alice gave a talk\nBob spilled coffee");
/// assert!(!events.is_blank());
///
/// assert!(EventSummary::new(vec!["  ".to_string()]).is_blank());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, derive_more::From)]
#[serde(transparent)]
pub struct EventSummary(Vec<String>);

impl EventSummary {
    /// Create a summary from event strings.
    pub fn new(events: Vec<String>) -> Self {
        Self(events)
    }

    /// The events in order.
    pub fn events(&self) -> &[String] {
        &self.0
    }

    /// Newline-joined event text, the form every downstream prompt receives.
    pub fn joined(&self) -> String {
        self.0.join("\n")
    }

    /// True when the joined text trims to empty.
    pub fn is_blank(&self) -> bool {
        self.0.iter().all(|event| event.trim().is_empty())
    }

    /// Number of events.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no events were extracted.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
