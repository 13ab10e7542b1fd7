//! Diagram source normalization.
//!
//! The engine only renders text enclosed in `@startuml` / `@enduml`. Block
//! authors usually omit the markers, so [`DiagramSource`] adds them when the
//! start marker is missing and leaves the text alone otherwise.

use std::fmt;

/// Marker that opens a diagram.
pub const START_MARKER: &str = "@startuml";

/// Marker that closes a diagram.
pub const END_MARKER: &str = "@enduml";

/// Diagram text that is guaranteed to carry the start marker.
///
/// # Examples
///
/// ```
/// use umlblock_core::source::DiagramSource;
///
/// let source = DiagramSource::new("A -> B");
/// assert_eq!(source.as_str(), "@startuml\nA -> B\n@enduml");
///
/// // Already wrapped text is kept verbatim
/// let wrapped = DiagramSource::new(source.as_str());
/// assert_eq!(wrapped, source);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DiagramSource(String);

impl DiagramSource {
    /// Normalizes raw block text.
    pub fn new(text: impl Into<String>) -> Self {
        Self(normalize(text.into()))
    }

    /// Returns the normalized text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the source and returns the normalized text.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for DiagramSource {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DiagramSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Wraps `text` in start and end markers unless it already contains the start marker.
pub fn normalize(text: String) -> String {
    if text.contains(START_MARKER) {
        text
    } else {
        format!("{START_MARKER}\n{text}\n{END_MARKER}")
    }
}
